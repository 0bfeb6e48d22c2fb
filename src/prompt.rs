//! Collects filter parameters from the user.
//!
//! The prompt reads from any `BufRead` and writes to any `Write`, so the binary passes stdin and
//! stdout while tests pass in-memory buffers.

use crate::model::Amount;
use crate::validate::{FilterOptions, Filters};
use crate::Result;
use anyhow::Context;
use std::io::{BufRead, Write};
use tracing::warn;

/// Shows what can be filtered on, asks whether to filter and, if so, asks for each filter. Blank
/// answers skip that filter. An invalid min skips both amount filters and the max is never asked
/// for. An invalid max skips only the max.
pub fn prompt_filters<R, W>(
    input: &mut R,
    output: &mut W,
    options: &FilterOptions,
) -> Result<Filters>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "Filter Options Available:")?;
    writeln!(output, "   Available Regions: {}", options.regions.join(", "))?;
    if let Some((min, max)) = options.amount_range {
        writeln!(
            output,
            "   Amount Range:      {} - {}",
            Amount::new(min),
            Amount::new(max)
        )?;
    }

    let answer = ask(input, output, "Apply filters before analysis? (y/n): ")?;
    if !answer.eq_ignore_ascii_case("y") {
        return Ok(Filters::default());
    }

    let region = ask(input, output, "   Filter by Region (press Enter to skip): ")?;
    let mut filters = Filters {
        region: (!region.is_empty()).then_some(region),
        ..Filters::default()
    };

    let min = ask(
        input,
        output,
        "   Filter by Min Total Price (press Enter to skip): ",
    )?;
    match optional_amount(&min) {
        Ok(min) => filters.min_amount = min,
        Err(_) => {
            warn!("Invalid numeric input. Proceeding without price filters.");
            return Ok(filters);
        }
    }

    let max = ask(
        input,
        output,
        "   Filter by Max Total Price (press Enter to skip): ",
    )?;
    match optional_amount(&max) {
        Ok(max) => filters.max_amount = max,
        Err(_) => warn!("Invalid numeric input. Proceeding without a max price filter."),
    }

    Ok(filters)
}

/// Writes `question`, then reads one trimmed line. End of input reads as a blank answer.
fn ask<R, W>(input: &mut R, output: &mut W, question: &str) -> Result<String>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{question}")?;
    output.flush().context("Unable to flush the prompt")?;
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Unable to read the answer")?;
    Ok(line.trim().to_string())
}

fn optional_amount(s: &str) -> std::result::Result<Option<f64>, crate::model::AmountError> {
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<Amount>().map(|a| Some(a.value()))
}
