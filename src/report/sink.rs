use crate::error::Result;
use crate::report::UtilityReport;
use crate::tasks::RunDiagnostics;
use serde::Serialize;
use serde_json::json;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const OVERALL_DIFF_FILE: &str = "utility_overall_diff.json";
pub const DIFF_FILE: &str = "utility_diff.json";
pub const ORIGINAL_METRICS_FILE: &str = "utility_o_o.json";
pub const RELEASED_METRICS_FILE: &str = "utility_r_o.json";
pub const ORIGINAL_CONFUSION_FILE: &str = "utility_confusion_o_o.json";
pub const RELEASED_CONFUSION_FILE: &str = "utility_confusion_r_o.json";
pub const DIAGNOSTICS_FILE: &str = "utility_diagnostics.json";

/// Destination for the artifacts of a finished run.
pub trait ArtifactSink {
    fn write(&mut self, report: &UtilityReport, diagnostics: &RunDiagnostics) -> Result<()>;
}

/// Writes one JSON file per artifact into a directory, creating it if needed.
pub struct JsonDirectorySink {
    dir: PathBuf,
    pretty: bool,
}

impl JsonDirectorySink {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            pretty: true,
        }
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let mut w = BufWriter::new(File::create(self.dir.join(name))?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut w, value)?;
        } else {
            serde_json::to_writer(&mut w, value)?;
        }
        writeln!(w)?;
        w.flush()?;
        Ok(())
    }
}

impl ArtifactSink for JsonDirectorySink {
    fn write(&mut self, report: &UtilityReport, diagnostics: &RunDiagnostics) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        self.write_json(OVERALL_DIFF_FILE, &json!({ "overall": report.overall_diff() }))?;
        self.write_json(DIFF_FILE, &report.by_classifier(|c| &c.diff)?)?;
        self.write_json(ORIGINAL_METRICS_FILE, &report.by_classifier(|c| &c.trained_on_original)?)?;
        self.write_json(RELEASED_METRICS_FILE, &report.by_classifier(|c| &c.trained_on_released)?)?;
        self.write_json(ORIGINAL_CONFUSION_FILE, &report.by_classifier(|c| &c.confusion_original)?)?;
        self.write_json(RELEASED_CONFUSION_FILE, &report.by_classifier(|c| &c.confusion_released)?)?;
        self.write_json(DIAGNOSTICS_FILE, diagnostics)?;
        info!(dir = %self.dir.display(), "wrote utility artifacts");
        Ok(())
    }
}
