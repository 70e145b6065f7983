//! CSV export of a [SimulationSummary]: a timestamp row, the two life histograms as
//! `side,life,count`, then the sample battle log one line per row.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use csv::WriterBuilder;
use thiserror::Error;

use crate::simulator::monte_carlo::SimulationSummary;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create {path}")]
    Create {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv: {0}")]
    Io(#[from] std::io::Error),
}

pub fn write_summary_csv<W: Write>(
    summary: &SimulationSummary,
    generated_at: DateTime<Utc>,
    writer: W,
) -> Result<(), ExportError> {
    let mut csv = WriterBuilder::new().flexible(true).from_writer(writer);
    let stamp = generated_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    csv.write_record(["generated_at", stamp.as_str()])?;
    csv.write_record(["side", "life", "count"])?;
    for (side, histogram) in [
        ("attacker", &summary.attacker_life),
        ("defender", &summary.defender_life),
    ] {
        for (life, count) in histogram {
            let (life, count) = (life.to_string(), count.to_string());
            csv.write_record([side, life.as_str(), count.as_str()])?;
        }
    }
    csv.write_record(["log"])?;
    for line in &summary.sample_log {
        csv.write_record([line.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

pub fn export_summary_csv(summary: &SimulationSummary, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.display().to_string(),
        source,
    })?;
    write_summary_csv(summary, Utc::now(), file)
}
