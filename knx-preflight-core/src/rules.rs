//! The rule engine: eight independent check groups, each predicting one
//! family of importer failures.
//!
//! Every check is a pure function of the extracted entities appending
//! findings to the report; checks never consult each other's output and
//! never fail themselves. Offsets and marker tokens are the ones of the
//! analyzed importer version and are deliberately hard-coded.
use crate::entities::DeviceEntities;
use crate::importer;
use crate::report::Report;

/// Marker token inside a Hardware2ProgramRefId ahead of the segment the
/// importer slices fixed ranges out of.
const HW2PROG_MARKER: &str = "_HP-";

/// Minimum character count after the marker; anything shorter makes the
/// importer's fixed-range Substring throw ArgumentOutOfRangeException.
const HW2PROG_MIN_SUFFIX: usize = 13;

const DPT_PREFIXES: [&str; 2] = ["DPST-", "DPT-"];

const OBJECT_SIZE_UNITS: [&str; 4] = ["Bit", "Bits", "Byte", "Bytes"];

/// Run all eight check groups in presentation order.
pub fn run_all(entities: &DeviceEntities, report: &mut Report) {
    tracing::debug!("running rule checks");
    check_manufacturer_identity(entities, report);
    check_application_program(entities, report);
    check_hardware(entities, report);
    check_catalog_linkage(entities, report);
    check_order_number_encoding(entities, report);
    check_identifier_suffixes(entities, report);
    check_datapoint_types(entities, report);
    check_object_sizes(entities, report);
}

/// The importer strips a two-character prefix off the Manufacturer RefId,
/// so anything shorter than 3 characters is fatal to it.
fn check_manufacturer_identity(entities: &DeviceEntities, report: &mut Report) {
    // An empty RefId counts as absent, like every optional id below.
    match entities.manufacturer.ref_id().filter(|id| !id.is_empty()) {
        Some(ref_id) => {
            if ref_id.chars().count() < 3 {
                report.add_error(format!(
                    "Manufacturer RefId '{ref_id}' too short for Substring(2)"
                ));
            } else {
                report.add_pass(format!("Manufacturer RefId format OK: {ref_id}"));
            }
        }
        None => report.add_error("Manufacturer missing RefId attribute"),
    }
}

/// Four attributes the importer reads unconditionally; the two numbers go
/// straight into integer parses.
fn check_application_program(entities: &DeviceEntities, report: &mut Report) {
    let app = &entities.application_program;
    let attributes = [
        ("ApplicationNumber", app.application_number(), true),
        ("ApplicationVersion", app.application_version(), true),
        ("MaskVersion", app.mask_version(), false),
        ("DefaultLanguage", app.default_language(), false),
    ];
    for (name, value, numeric) in attributes {
        match value {
            None => report.add_error(format!(
                "ApplicationProgram missing required attribute: {name}"
            )),
            Some(value) if numeric => {
                if all_digits(&value) {
                    report.add_pass(format!("ApplicationProgram.{name} = {value}"));
                } else {
                    report.add_error(format!(
                        "ApplicationProgram.{name} must be integer, got: {value}"
                    ));
                }
            }
            Some(_) => {}
        }
    }
}

/// The importer dereferences `VersionNumber` without a null check. A
/// `Version` attribute in its place is a common mis-authoring and gets a
/// distinguishing message. The boolean capability flags only warn.
fn check_hardware(entities: &DeviceEntities, report: &mut Report) {
    let Some(hardware) = &entities.hardware else {
        report.add_error("Hardware node with attributes not found");
        return;
    };

    match hardware.version_number() {
        Some(version) => report.add_pass(format!("Hardware.VersionNumber = {version}")),
        None => {
            if hardware.version().is_some() {
                report.add_error(
                    "Hardware uses 'Version' instead of 'VersionNumber' - causes \
                     NullReferenceException in the importer",
                );
            } else {
                report.add_error(
                    "Hardware missing 'VersionNumber' attribute - causes \
                     NullReferenceException in the importer",
                );
            }
        }
    }

    match hardware.bus_current() {
        Some(value) => report.add_pass(format!("Hardware.BusCurrent = {value}")),
        None => report.add_warning("Hardware missing 'BusCurrent' attribute"),
    }

    check_capability_flag(
        "HasIndividualAddress",
        hardware.has_individual_address(),
        report,
    );
    check_capability_flag(
        "HasApplicationProgram",
        hardware.has_application_program(),
        report,
    );
}

fn check_capability_flag(name: &str, value: Option<String>, report: &mut Report) {
    match value {
        None => report.add_warning(format!("Hardware missing '{name}' attribute")),
        Some(value) if is_true(&value) => report.add_pass(format!("Hardware.{name} = true")),
        Some(_) => report.add_warning(format!("Hardware.{name} is not 'true'")),
    }
}

fn is_true(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1")
}

/// The importer slices a fixed 13-character range out of the segment after
/// `_HP-`; shorter linkage ids fault out of range.
fn check_catalog_linkage(entities: &DeviceEntities, report: &mut Report) {
    for item in &entities.catalog_items {
        let Some(ref_id) = item.hardware2program_ref_id() else {
            continue;
        };
        let Some(marker_idx) = ref_id.find(HW2PROG_MARKER) else {
            continue;
        };
        let suffix = &ref_id[marker_idx + HW2PROG_MARKER.len()..];
        let length = suffix.chars().count();
        if length < HW2PROG_MIN_SUFFIX {
            report.add_error(format!(
                "Hardware2ProgramRefId suffix '{suffix}' length is {length}. \
                 MUST be at least {HW2PROG_MIN_SUFFIX} characters to avoid \
                 ArgumentOutOfRangeException in the importer"
            ));
        } else {
            report.add_pass(format!(
                "Hardware2ProgramRefId suffix length OK: {length}"
            ));
        }
    }
}

/// Every product order number is expected, in its importer-escaped form,
/// inside some catalog item identifier. Absence alone is not known to
/// crash the importer, so this only warns.
fn check_order_number_encoding(entities: &DeviceEntities, report: &mut Report) {
    for product in &entities.products {
        let Some(order_number) = product.order_number() else {
            continue;
        };
        if order_number.is_empty() {
            continue;
        }
        let encoded = importer::encoded(&order_number);
        let found = entities.catalog_items.iter().any(|item| {
            item.id()
                .is_some_and(|id| id.contains(&encoded))
        });
        if found {
            report.add_pass(format!(
                "CatalogItem ID contains encoded OrderNumber '{encoded}'"
            ));
        } else if encoded != order_number {
            report.add_warning(format!(
                "OrderNumber '{order_number}' should be encoded as '{encoded}' in CatalogItem IDs"
            ));
        }
    }
}

/// Identifier tails the importer feeds to int/long parses, each with the
/// offset its call site uses. ComObject ids follow a different convention
/// and split on the last hyphen instead.
fn check_identifier_suffixes(entities: &DeviceEntities, report: &mut Report) {
    for parameter in &entities.parameters {
        let id = parameter.id().unwrap_or_default();
        check_numeric_suffix(&id, "Parameter", 2, report);
    }

    for parameter_ref in &entities.parameter_refs {
        let id = parameter_ref.id().unwrap_or_default();
        check_numeric_suffix(&id, "ParameterRef", 2, report);
        if let Some(ref_id) = parameter_ref.ref_id().filter(|id| !id.is_empty()) {
            check_numeric_suffix(&ref_id, "ParameterRef.RefId", 2, report);
        }
    }

    for com_object in &entities.com_objects {
        let id = com_object.id().unwrap_or_default();
        if let Some(pos) = id.rfind('-') {
            let suffix = &id[pos + 1..];
            if !all_digits(suffix) {
                report.add_error(format!(
                    "ComObject ID '{id}' has non-numeric suffix '{suffix}' after last '-'"
                ));
            }
        }
    }

    for com_object_ref in &entities.com_object_refs {
        let id = com_object_ref.id().unwrap_or_default();
        check_numeric_suffix(&id, "ComObjectRef", 2, report);
    }

    for block in &entities.parameter_blocks {
        if let Some(id) = block.id().filter(|id| !id.is_empty()) {
            check_numeric_suffix(&id, "ParameterBlock", 3, report);
        }
    }

    for choose in &entities.chooses {
        if let Some(param_ref_id) = choose.param_ref_id().filter(|id| !id.is_empty()) {
            check_numeric_suffix(&param_ref_id, "choose.ParamRefId", 2, report);
        }
    }

    for parameter_ref_ref in &entities.parameter_ref_refs {
        if let Some(ref_id) = parameter_ref_ref.ref_id().filter(|id| !id.is_empty()) {
            check_numeric_suffix(&ref_id, "ParameterRefRef.RefId", 2, report);
        }
    }

    for com_object_ref_ref in &entities.com_object_ref_refs {
        if let Some(ref_id) = com_object_ref_ref.ref_id().filter(|id| !id.is_empty()) {
            check_numeric_suffix(&ref_id, "ComObjectRefRef.RefId", 2, report);
        }
    }
}

/// Require the tail of `id` after [`importer::last_split`] to be a plain
/// integer token, one optional leading minus allowed.
fn check_numeric_suffix(id: &str, element: &str, offset: usize, report: &mut Report) {
    let mut suffix = importer::last_split(id, offset);
    if let Some(stripped) = suffix.strip_prefix('-') {
        suffix = stripped;
    }

    if suffix.is_empty() {
        report.add_error(format!(
            "{element} ID '{id}' has empty suffix after offset {offset}"
        ));
    } else if !all_digits(suffix) {
        report.add_error(format!(
            "{element} ID '{id}' has non-numeric suffix '{suffix}' (offset {offset}). \
             This causes FormatException in the importer"
        ));
    }
}

/// Datapoint types must carry one of the two prefixes the importer's
/// format dispatch recognizes.
fn check_datapoint_types(entities: &DeviceEntities, report: &mut Report) {
    for com_object in &entities.com_objects {
        let Some(dpt) = com_object.datapoint_type().filter(|v| !v.is_empty()) else {
            continue;
        };
        if DPT_PREFIXES.iter().any(|prefix| dpt.starts_with(prefix)) {
            report.add_pass(format!("DatapointType format OK: {dpt}"));
        } else {
            report.add_error(format!(
                "ComObject DatapointType '{dpt}' must start with 'DPST-' or 'DPT-'"
            ));
        }
    }
}

/// Object sizes must be exactly "<digits> <unit>" with a unit from the
/// importer's fixed table; the splits are on single spaces.
fn check_object_sizes(entities: &DeviceEntities, report: &mut Report) {
    for com_object in &entities.com_objects {
        let Some(size) = com_object.object_size().filter(|v| !v.is_empty()) else {
            continue;
        };
        let parts: Vec<&str> = size.split(' ').collect();
        if parts.len() != 2 {
            report.add_error(format!(
                "ObjectSize '{size}' invalid format. Expected 'X Bit(s)' or 'X Byte(s)'"
            ));
        } else if !OBJECT_SIZE_UNITS.contains(&parts[1]) {
            report.add_error(format!(
                "ObjectSize '{size}' unit must be Bit/Bits/Byte/Bytes"
            ));
        } else if !all_digits(parts[0]) {
            report.add_error(format!("ObjectSize '{size}' size must be numeric"));
        } else {
            report.add_pass(format!("ObjectSize format OK: {size}"));
        }
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
