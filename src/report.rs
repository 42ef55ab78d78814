use crate::classifier::Key;
use crate::error::AgehistError;
use crate::histogram::Histogram;
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;

/// Leading words of each text report line.
pub const ENTITY_LABEL: &str = "La edad";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// `La edad <key> tiene <count> ocurrencias`, one line per key.
    #[default]
    Text,
    /// A single JSON object with the histogram and its total.
    Json,
}

pub fn format_line(key: Key, count: u64) -> String {
    format!("{} {} tiene {} ocurrencias", ENTITY_LABEL, key, count)
}

#[derive(Serialize)]
struct JsonReport<'a> {
    histogram: &'a Histogram,
    total: u64,
}

/// Writes the histogram in ascending key order. Keys with a zero count are
/// never present in a [`Histogram`], so nothing is printed for them.
pub fn write_report<W: Write>(
    histogram: &Histogram,
    format: ReportFormat,
    out: &mut W,
) -> Result<(), AgehistError> {
    match format {
        ReportFormat::Text => {
            for (key, count) in histogram {
                writeln!(out, "{}", format_line(key, count))?;
            }
        }
        ReportFormat::Json => {
            let report = JsonReport {
                histogram,
                total: histogram.total(),
            };
            serde_json::to_writer(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
