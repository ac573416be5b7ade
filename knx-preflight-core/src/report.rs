//! Accumulation of findings and the derived verdict.
use serde::Serialize;
use std::fmt;

/// Outcome of a validation run. FAIL if and only if at least one error was
/// recorded; warnings never affect the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Fail => f.write_str("FAIL"),
        }
    }
}

/// Accumulator for one validation run: three append-only finding lists
/// whose order is the order of presentation. Owned by the run that creates
/// it; never shared.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    passed: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a condition the importer is known to choke on.
    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Record a suspicious condition not proven to crash the importer.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Record a check the document satisfied.
    pub fn add_pass(&mut self, msg: impl Into<String>) {
        self.passed.push(msg.into());
    }

    pub fn passed(&self) -> &[String] {
        &self.passed
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn verdict(&self) -> Verdict {
        if self.errors.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}
