use std::fs;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use card_sort::distribute::{CopyEvent, CopyPlan, Summary};
use chrono::Local;

use crate::config::Config;

/// Run log file with buffered writes
pub struct FileLogger {
    writer: BufWriter<File>,
}

impl FileLogger {
    /// Create a new file logger, appending to the given log file.
    pub(crate) fn new(log_path: &Path) -> Result<Self> {
        if let Some(log_dir) = log_path.parent()
            && !log_dir.as_os_str().is_empty()
            && !log_dir.exists()
        {
            fs::create_dir_all(log_dir).context("Failed to create log directory")?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Log the effective settings for this run
    pub(crate) fn log_init(
        &mut self,
        config: &Config,
        source: &Path,
        output: &Path,
        template: &str,
        labels: &[String],
    ) {
        let _ = writeln!(self.writer, "[{}] INIT \"{}\"", Self::timestamp(), source.display());
        let _ = writeln!(self.writer, "  output: {}", output.display());
        let _ = writeln!(self.writer, "  template: {template}");
        let _ = writeln!(self.writer, "  labels: {labels:?}");
        let _ = writeln!(self.writer, "  data_dir: {}", config.data_dir.display());
        let _ = writeln!(self.writer, "  dryrun: {}", config.dryrun);
        let _ = writeln!(self.writer, "  verbose: {}", config.verbose);
        let _ = self.writer.flush();
    }

    /// Log the planned work before copying starts
    pub(crate) fn log_start(&mut self, plan: &CopyPlan) {
        let _ = writeln!(
            self.writer,
            "[{}] START   {} people, {} images per person, {} images",
            Self::timestamp(),
            plan.record_count(),
            plan.per_record,
            plan.total_files()
        );
        let _ = self.writer.flush();
    }

    /// Log a single copy result
    pub(crate) fn log_event(&mut self, event: &CopyEvent) {
        let level = match event {
            CopyEvent::Copied { .. } => "SUCCESS",
            CopyEvent::FileFailed { .. } | CopyEvent::RecordFailed { .. } => "ERROR  ",
            CopyEvent::Cancelled { .. } => "ABORT  ",
        };
        let _ = writeln!(self.writer, "[{}] {level} {event}", Self::timestamp());
        let _ = self.writer.flush();
    }

    /// Log an error that stopped the run before copying
    pub(crate) fn log_failure(&mut self, error: &str) {
        let _ = writeln!(self.writer, "[{}] ERROR   {error}", Self::timestamp());
        let _ = self.writer.flush();
    }

    /// Log final statistics
    pub(crate) fn log_stats(&mut self, summary: &Summary, duration: Duration) {
        let _ = writeln!(self.writer, "[{}] STATISTICS", Self::timestamp());
        let _ = writeln!(self.writer, "  People:        {}", summary.records);
        let _ = writeln!(self.writer, "  Files copied:  {}", summary.processed);
        let _ = writeln!(self.writer, "  Files missing: {}", summary.missing());
        let _ = writeln!(self.writer, "  Total files:   {}", summary.total);
        if summary.cancelled {
            let _ = writeln!(self.writer, "  Aborted by user");
        }
        let _ = writeln!(self.writer, "  Total time: {}", card_sort::format_duration(duration));
        let _ = writeln!(self.writer, "[{}] END", Self::timestamp());
        let _ = self.writer.flush();
    }
}
