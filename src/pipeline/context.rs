use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use tempfile::TempDir;
use tracing::{Span, debug, info_span};

use crate::error::PipelineError;
use crate::util::utc_compact_string;

/// Per-request execution state. Owns the scratch directory, which is removed when the
/// context drops, on success and on every error path alike.
pub struct ExecutionContext {
    run_id: String,
    started_at: DateTime<Utc>,
    scratch: TempDir,
    span: Span,
}

impl ExecutionContext {
    pub fn new() -> Result<Self, PipelineError> {
        Self::new_in(&std::env::temp_dir())
    }

    /// Opens a context whose scratch directory lives under `parent`.
    pub fn new_in(parent: &Path) -> Result<Self, PipelineError> {
        let started_at = Utc::now();
        let run_id = format!("report-{}", utc_compact_string(started_at));
        let scratch = tempfile::Builder::new()
            .prefix("geotec-")
            .tempdir_in(parent)
            .with_context(|| {
                format!(
                    "failed to create report scratch directory in {}",
                    parent.display()
                )
            })?;
        let span = info_span!("report", run_id = %run_id);

        debug!(run_id = %run_id, scratch = %scratch.path().display(), "execution context opened");

        Ok(Self {
            run_id,
            started_at,
            scratch,
            span,
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn report_date(&self) -> NaiveDate {
        self.started_at.date_naive()
    }

    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    /// Writes `contents` into the scratch directory and returns its path.
    pub fn stage(&self, file_name: &str, contents: &str) -> Result<PathBuf, PipelineError> {
        let path = self.scratch_dir().join(file_name);
        fs::write(&path, contents)
            .with_context(|| format!("failed to stage {}", path.display()))?;
        Ok(path)
    }

    /// Copies a staged artifact to the caller's destination.
    pub fn hand_over(&self, staged: &Path, destination: &Path) -> Result<(), PipelineError> {
        if let Some(parent) = destination.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            crate::util::ensure_directory(parent)?;
        }
        fs::copy(staged, destination).with_context(|| {
            format!(
                "failed to copy {} to {}",
                staged.display(),
                destination.display()
            )
        })?;
        Ok(())
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) {
        debug!(run_id = %self.run_id, "execution context released");
    }
}
