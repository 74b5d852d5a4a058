//! Delivery of rendered reports.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Write `report` to `destination`, or to stdout when no file was requested.
pub fn emit(report: &str, destination: Option<&Path>) -> Result<()> {
    match destination {
        Some(path) => {
            fs::write(path, report)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(report.as_bytes())
                .context("failed to write report to stdout")?;
            stdout.flush().context("failed to flush stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        emit("<html></html>\n", Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>\n");
    }

    #[test]
    fn unwritable_destination_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.txt");
        let err = emit("text", Some(&path)).unwrap_err();
        assert!(err.to_string().contains("report.txt"));
    }
}
