use knx_preflight_core::{validate_file, validate_xml, Verdict};
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Minimal well-formed device description with the given bodies spliced
/// under the ApplicationProgram and Manufacturer elements.
fn device_doc(app_body: &str, manu_body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<KNX xmlns="http://knx.org/xml/project/11">
  <Manufacturer RefId="M-00FA">
    <ApplicationProgram ApplicationNumber="1" ApplicationVersion="1"
                        MaskVersion="MV-0701" DefaultLanguage="en-US">
      {app_body}
    </ApplicationProgram>
    <Hardware>
      <Hardware Id="M-00FA_H-1-1" Name="Dev" VersionNumber="1" BusCurrent="10"
                HasIndividualAddress="true" HasApplicationProgram="true"/>
    </Hardware>
    {manu_body}
  </Manufacturer>
</KNX>"#
    )
}

#[test]
fn sample_device_passes() {
    let report = validate_file(fixture("sample-device.xml"));
    for error in report.errors() {
        println!("Validation error: {error}");
    }
    for warning in report.warnings() {
        println!("Validation warning: {warning}");
    }
    assert_eq!(report.verdict(), Verdict::Pass);
    assert!(report.errors().is_empty());
    assert!(report.warnings().is_empty());
    assert!(report
        .passed()
        .iter()
        .any(|msg| msg.contains("Manufacturer RefId format OK")));
}

#[test]
fn hardware_version_typo_fails_with_one_error() {
    let report = validate_file(fixture("hardware-version-typo.xml"));
    assert_eq!(report.verdict(), Verdict::Fail);
    assert_eq!(report.error_count(), 1);
    let error = &report.errors()[0];
    assert!(error.contains("'Version' instead of 'VersionNumber'"));
    assert!(error.contains("NullReferenceException"));
}

#[test]
fn unreadable_path_reports_a_parse_error() {
    let report = validate_file(fixture("does-not-exist.xml"));
    assert_eq!(report.verdict(), Verdict::Fail);
    assert_eq!(report.error_count(), 1);
    assert!(report.errors()[0].contains("XML parsing failed"));
}

#[test]
fn minimal_device_with_com_object_passes() {
    let xml = device_doc(
        r#"<ComObject Id="M-00FA_A-0001_O-1" DatapointType="DPST-1-1" ObjectSize="1 Bit"/>"#,
        "",
    );
    let report = validate_xml(&xml);
    assert_eq!(report.verdict(), Verdict::Pass);
    assert!(report.errors().is_empty());
}

#[test]
fn short_catalog_linkage_suffix_is_one_error() {
    let xml = device_doc(
        "",
        r#"<CatalogItem Id="M-00FA_CI-1"
                        Hardware2ProgramRefId="M-00FA_H-1-1_HP-0123456789"/>"#,
    );
    let report = validate_xml(&xml);
    assert_eq!(report.verdict(), Verdict::Fail);
    assert_eq!(report.error_count(), 1);
    assert!(report.errors()[0].contains("length is 10"));
}

#[test]
fn thirteen_char_catalog_linkage_suffix_passes() {
    let xml = device_doc(
        "",
        r#"<CatalogItem Id="M-00FA_CI-1"
                        Hardware2ProgramRefId="M-00FA_H-1-1_HP-0123456789012"/>"#,
    );
    let report = validate_xml(&xml);
    assert!(report.errors().is_empty());
    assert!(report
        .passed()
        .iter()
        .any(|msg| msg.contains("suffix length OK: 13")));
}

#[test]
fn catalog_linkage_without_marker_is_ignored() {
    let xml = device_doc(
        "",
        r#"<CatalogItem Id="M-00FA_CI-1" Hardware2ProgramRefId="M-00FA_H-1-1"/>"#,
    );
    let report = validate_xml(&xml);
    assert!(report.errors().is_empty());
}

#[test]
fn object_size_wrong_unit_case_fails() {
    let xml = device_doc(r#"<ComObject Id="M-00FA_A-0001_O-1" ObjectSize="1 bit"/>"#, "");
    let report = validate_xml(&xml);
    assert_eq!(report.error_count(), 1);
    assert!(report.errors()[0].contains("unit must be Bit/Bits/Byte/Bytes"));
}

#[test]
fn object_size_without_space_fails() {
    let xml = device_doc(r#"<ComObject Id="M-00FA_A-0001_O-1" ObjectSize="1Bit"/>"#, "");
    let report = validate_xml(&xml);
    assert_eq!(report.error_count(), 1);
    assert!(report.errors()[0].contains("invalid format"));
}

#[test]
fn object_size_with_word_count_fails() {
    let xml = device_doc(r#"<ComObject Id="M-00FA_A-0001_O-1" ObjectSize="one Bit"/>"#, "");
    let report = validate_xml(&xml);
    assert_eq!(report.error_count(), 1);
    assert!(report.errors()[0].contains("size must be numeric"));
}

#[test]
fn datapoint_type_prefixes() {
    for (dpt, ok) in [("DPST-1-1", true), ("DPT-5", true), ("1.001", false)] {
        let xml = device_doc(
            &format!(r#"<ComObject Id="M-00FA_A-0001_O-1" DatapointType="{dpt}"/>"#),
            "",
        );
        let report = validate_xml(&xml);
        if ok {
            assert!(report.errors().is_empty(), "expected pass for {dpt}");
        } else {
            assert_eq!(report.error_count(), 1, "expected error for {dpt}");
            assert!(report.errors()[0].contains("must start with 'DPST-' or 'DPT-'"));
        }
    }
}

#[test]
fn non_numeric_parameter_suffix_fails() {
    let xml = device_doc(r#"<Parameter Id="M-00FA_A-0001_P-x"/>"#, "");
    let report = validate_xml(&xml);
    assert_eq!(report.error_count(), 1);
    assert!(report.errors()[0].contains("non-numeric suffix 'x'"));
    assert!(report.errors()[0].contains("FormatException"));
}

#[test]
fn com_object_hyphen_suffix_must_be_numeric() {
    let xml = device_doc(r#"<ComObject Id="M-00FA_A-0001_O-2a"/>"#, "");
    let report = validate_xml(&xml);
    assert_eq!(report.error_count(), 1);
    assert!(report.errors()[0].contains("after last '-'"));
}

#[test]
fn unencoded_order_number_only_warns() {
    let xml = device_doc(
        "",
        r#"<Product Id="M-00FA_H-1-1_P-1" OrderNumber="AB 12"/>
           <CatalogItem Id="M-00FA_CI-1"/>"#,
    );
    let report = validate_xml(&xml);
    assert_eq!(report.verdict(), Verdict::Pass);
    assert_eq!(report.warnings().len(), 1);
    assert!(report.warnings()[0].contains("'AB.2012'"));
}

#[test]
fn order_number_without_special_characters_needs_no_encoding() {
    let xml = device_doc(
        "",
        r#"<Product Id="M-00FA_H-1-1_P-1" OrderNumber="AB12"/>
           <CatalogItem Id="M-00FA_CI-1"/>"#,
    );
    let report = validate_xml(&xml);
    assert!(report.warnings().is_empty());
    assert!(report.errors().is_empty());
}

#[test]
fn encoded_order_number_in_catalog_id_passes() {
    let xml = device_doc(
        "",
        r#"<Product Id="M-00FA_H-1-1_P-1" OrderNumber="AB-12"/>
           <CatalogItem Id="M-00FA_CI-AB.2D12-1"/>"#,
    );
    let report = validate_xml(&xml);
    assert!(report.warnings().is_empty());
    assert!(report
        .passed()
        .iter()
        .any(|msg| msg.contains("encoded OrderNumber 'AB.2D12'")));
}

#[test]
fn missing_application_number_is_an_error() {
    let xml = r#"<KNX xmlns="http://knx.org/xml/project/11">
  <Manufacturer RefId="M-00FA">
    <ApplicationProgram ApplicationVersion="1" MaskVersion="MV-0701"
                        DefaultLanguage="en-US"/>
    <Hardware>
      <Hardware Id="M-00FA_H-1-1" Name="Dev" VersionNumber="1" BusCurrent="10"
                HasIndividualAddress="true" HasApplicationProgram="true"/>
    </Hardware>
  </Manufacturer>
</KNX>"#;
    let report = validate_xml(xml);
    assert_eq!(report.error_count(), 1);
    assert!(report.errors()[0].contains("missing required attribute: ApplicationNumber"));
}

#[test]
fn missing_capability_flags_warn_but_pass() {
    let xml = r#"<KNX xmlns="http://knx.org/xml/project/11">
  <Manufacturer RefId="M-00FA">
    <ApplicationProgram ApplicationNumber="1" ApplicationVersion="1"
                        MaskVersion="MV-0701" DefaultLanguage="en-US"/>
    <Hardware>
      <Hardware Id="M-00FA_H-1-1" Name="Dev" VersionNumber="1"/>
    </Hardware>
  </Manufacturer>
</KNX>"#;
    let report = validate_xml(xml);
    assert_eq!(report.verdict(), Verdict::Pass);
    assert_eq!(report.warnings().len(), 3);
}
