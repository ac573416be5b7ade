//! Pre-flight validation of KNX device-description XML.
//!
//! Checks a device description against the catalogued crash points of the
//! Kaenx Creator importer before the file is handed to it. The document is
//! only read, never modified; the outcome is a [`Report`] of passes,
//! warnings and errors with a PASS/FAIL verdict.
//!
//! # Examples
//! ```rust
//! use knx_preflight_core::{validate_xml, Verdict};
//!
//! let report = validate_xml("<not really xml");
//! assert_eq!(report.verdict(), Verdict::Fail);
//! assert_eq!(report.errors().len(), 1);
//! ```
pub mod document;
pub mod entities;
pub mod importer;
pub mod report;
pub mod rules;
pub mod validator;

use thiserror::Error;

pub use report::{Report, Verdict};
pub use validator::{validate_file, validate_xml};

/// Top-level error wrapper for callers using the loader or extractor
/// directly. The validator entry points never return it; they convert
/// every failure into a report finding.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Document(#[from] document::DocumentError),
    #[error(transparent)]
    Extract(#[from] entities::ExtractError),
}
