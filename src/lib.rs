//! A sales analytics pipeline.
//!
//! The pipeline reads a pipe-delimited sales feed, discards malformed and invalid records,
//! optionally filters by region and amount, enriches each record from a product catalog, then
//! writes the enriched records and a plain-text analytics report. The `sales` binary drives it
//! through the [`commands`] module.

pub mod analysis;
pub mod api;
pub mod args;
pub mod commands;
mod config;
pub mod enrich;
mod error;
pub mod files;
pub mod model;
pub mod parse;
mod prompt;
pub mod report;
mod utils;
pub mod validate;


pub use api::Mode;
pub use config::Config;
pub use error::Error;
pub use error::Result;
