//! Report sinks.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};

use tetcon_engine::report::embed_timestamp;
use tetcon_engine::ReportSink;

/// Appends each round line to a file.
#[derive(Debug, Clone)]
pub struct FileReport {
    path: PathBuf,
}

impl FileReport {
    /// Expand `<yymmdd>`/`<hhmmss>` in `template` with the current local time.
    pub fn new(template: &str) -> Self {
        Self::at(template, &Local::now().naive_local())
    }

    pub fn at(template: &str, now: &NaiveDateTime) -> Self {
        Self {
            path: PathBuf::from(embed_timestamp(template, now)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for FileReport {
    fn submit(&mut self, content: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening report {}", self.path.display()))?;
        writeln!(file, "{content}")
            .with_context(|| format!("writing report {}", self.path.display()))?;
        Ok(())
    }
}

/// Prints each round line on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReport;

impl ReportSink for StdoutReport {
    fn submit(&mut self, content: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{content}")?;
        out.flush()?;
        Ok(())
    }
}
