//! Validation entry points: load, extract, run the checks.
use crate::document::DeviceDocument;
use crate::entities;
use crate::report::Report;
use crate::rules;
use std::path::Path;

/// Validate a device description file.
///
/// Never fails at the type level: malformed XML and missing mandatory
/// entities each become a single error finding with an immediate FAIL, and
/// rule violations accumulate while the run continues.
pub fn validate_file(path: impl AsRef<Path>) -> Report {
    tracing::debug!(path = %path.as_ref().display(), "validating document");
    run(DeviceDocument::from_file(path.as_ref()))
}

/// Validate a device description held in memory.
///
/// # Examples
/// ```rust
/// use knx_preflight_core::{validate_xml, Verdict};
///
/// let report = validate_xml(
///     r#"<KNX xmlns="http://knx.org/xml/project/11"></KNX>"#,
/// );
/// // Well-formed, but the mandatory Manufacturer is missing.
/// assert_eq!(report.verdict(), Verdict::Fail);
/// ```
pub fn validate_xml(xml: &str) -> Report {
    run(DeviceDocument::from_xml(xml))
}

fn run(loaded: Result<DeviceDocument, crate::document::DocumentError>) -> Report {
    let mut report = Report::new();

    let mut doc = match loaded {
        Ok(doc) => doc,
        Err(err) => {
            report.add_error(err.to_string());
            return report;
        }
    };
    report.add_pass("XML syntax is valid");
    tracing::debug!(namespace = doc.namespace(), "document loaded");

    let entities = match entities::extract(&mut doc) {
        Ok(entities) => entities,
        Err(err) => {
            report.add_error(err.to_string());
            return report;
        }
    };

    rules::run_all(&entities, &mut report);
    report
}
