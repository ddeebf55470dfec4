use std::io::Write;

use lead_model::{
    ColumnAssignment, Confidence, FieldAssignment, FieldCatalog, FieldGroup, FieldTarget,
    ModelError,
};
use tempfile::NamedTempFile;

#[test]
fn catalog_loads_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[[field]]
key = "address"
label = "Address"
required = true

[[field]]
key = "owner_phone"
label = "Owner Phone"
group = "owner"
"#
    )
    .unwrap();

    let catalog = FieldCatalog::from_path(file.path()).unwrap();
    assert_eq!(catalog.len(), 2);
    assert!(catalog.contains("owner_phone"));
    assert_eq!(catalog.get("owner_phone").unwrap().group, FieldGroup::Owner);
}

#[test]
fn catalog_reports_missing_file() {
    let err = FieldCatalog::from_path(std::path::Path::new("/nonexistent/fields.toml")).unwrap_err();
    assert!(matches!(err, ModelError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/fields.toml"));
}

#[test]
fn catalog_reports_malformed_toml() {
    let err = FieldCatalog::from_toml_str("[[field]]\nkey = ").unwrap_err();
    assert!(matches!(err, ModelError::Toml { .. }));
}

#[test]
fn assignment_serializes_with_skip_sentinel() {
    let assignment = ColumnAssignment {
        source_name: "Notes".to_string(),
        assignment: FieldAssignment::skip("no correspondence found"),
    };
    let json = serde_json::to_value(&assignment).unwrap();
    assert_eq!(json["source_name"], "Notes");
    assert_eq!(json["assignment"]["field"], "skip");
    assert_eq!(json["assignment"]["confidence"], "low");

    let mapped = FieldAssignment {
        field: FieldTarget::field("address"),
        confidence: Confidence::High,
        reason: "address data format detected".to_string(),
        score: 0.9,
    };
    let json = serde_json::to_value(&mapped).unwrap();
    assert_eq!(json["field"], "address");
    assert_eq!(json["confidence"], "high");
}
