use lead_map::{
    AliasTable, KNOWN_ALIAS, MappingEngine, MappingState, NO_CORRESPONDENCE_FOUND,
    ScoringConfig, map_columns,
};
use lead_model::{Confidence, DestinationField, FieldCatalog, SourceColumn, property_catalog};

fn small_fields() -> Vec<DestinationField> {
    vec![
        DestinationField::new("address", "Address", true),
        DestinationField::new("owner_phone", "Owner Phone", false),
    ]
}

fn property_engine() -> MappingEngine {
    MappingEngine::new(property_catalog().unwrap(), ScoringConfig::default()).unwrap()
}

fn mailing_address() -> SourceColumn {
    SourceColumn::new(
        "Mailing Address",
        ["100 Elm St", "200 Birch Ave", "300 Cedar Ln"],
    )
}

fn notes() -> SourceColumn {
    SourceColumn::new("Notes", ["called twice", "no answer", "left voicemail"])
}

#[test]
fn mailing_address_maps_to_address_with_high_confidence() {
    let result = map_columns(&[mailing_address()], &small_fields()).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].source_name, "Mailing Address");
    let assignment = &result[0].assignment;
    assert_eq!(assignment.field.key(), Some("address"));
    assert_eq!(assignment.confidence, Confidence::High);
    assert!(assignment.reason.contains("address data format detected"));
}

#[test]
fn notes_column_is_skipped() {
    let result = map_columns(&[notes()], &small_fields()).unwrap();
    let assignment = &result[0].assignment;
    assert!(assignment.is_skip());
    assert_eq!(assignment.confidence, Confidence::Low);
    assert_eq!(assignment.reason, NO_CORRESPONDENCE_FOUND);
    assert_eq!(assignment.score, 0.0);
}

#[test]
fn same_scenarios_hold_against_full_property_schema() {
    let engine = property_engine();
    let result = engine.map_columns(&[mailing_address(), notes()]);
    assert_eq!(result[0].assignment.field.key(), Some("address"));
    assert_eq!(result[0].assignment.confidence, Confidence::High);
    assert!(result[1].assignment.is_skip());
}

#[test]
fn column_without_samples_is_decided_on_its_name() {
    let engine = property_engine();
    let assignment = engine.assign(&SourceColumn::header_only("Owner Phone"));
    assert_eq!(assignment.field.key(), Some("owner_phone"));
    assert_eq!(assignment.confidence, Confidence::Medium);
    assert!((assignment.score - 0.5).abs() < 1e-9);

    let assignment = engine.assign(&SourceColumn::header_only(""));
    assert!(assignment.is_skip());
}

#[test]
fn phone_content_rescues_an_opaque_header() {
    let engine = property_engine();
    let column = SourceColumn::new("Contact 1", ["(305) 555-0101", "305-555-0199", "305.555.0142"]);
    let assignment = engine.assign(&column);
    assert_eq!(assignment.field.key(), Some("owner_phone"));
    assert!(assignment.reason.contains("phone data format detected"));
}

#[test]
fn mapping_is_deterministic_and_order_preserving() {
    let engine = property_engine();
    let columns = vec![
        notes(),
        mailing_address(),
        SourceColumn::new("Zip", ["33101", "33139", "33125"]),
        SourceColumn::new("Yr Built", ["1978", "2004", "1995"]),
    ];
    let first = engine.map_columns(&columns);
    let second = engine.map_columns(&columns);
    assert_eq!(first, second);
    let names: Vec<&str> = first.iter().map(|c| c.source_name.as_str()).collect();
    assert_eq!(names, ["Notes", "Mailing Address", "Zip", "Yr Built"]);
    assert_eq!(first[2].assignment.field.key(), Some("zip_code"));
    assert_eq!(first[3].assignment.field.key(), Some("year_built"));
}

#[test]
fn rank_lists_every_field_best_first() {
    let engine = property_engine();
    let ranked = engine.rank(&mailing_address());
    assert_eq!(ranked.len(), engine.catalog().len());
    assert_eq!(ranked[0].field_key, "address");
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn aliases_assign_known_headers_directly() {
    let engine = property_engine().with_aliases(AliasTable::standard().unwrap());

    let assignment = engine.assign(&SourceColumn::header_only("Situs Address"));
    assert_eq!(assignment.field.key(), Some("address"));
    assert_eq!(assignment.confidence, Confidence::High);
    assert_eq!(assignment.reason, KNOWN_ALIAS);

    // Mailing addresses belong to the owner once aliases are known.
    let assignment = engine.assign(&mailing_address());
    assert_eq!(assignment.field.key(), Some("owner_address"));

    // owner_city is not a property schema field, so scoring decides.
    let assignment = engine.assign(&SourceColumn::header_only("Mailing City"));
    assert_ne!(assignment.reason, KNOWN_ALIAS);
}

#[test]
fn stricter_thresholds_reject_more() {
    // Name-only match at 0.35: accepted by default, rejected when strict.
    let column = SourceColumn::header_only("Bedroom");
    let default = property_engine().assign(&column);
    assert_eq!(default.field.key(), Some("bedrooms"));
    assert_eq!(default.confidence, Confidence::Low);

    let strict = MappingEngine::new(property_catalog().unwrap(), ScoringConfig::strict())
        .unwrap()
        .assign(&column);
    assert!(strict.is_skip());
}

#[test]
fn custom_catalog_from_toml() {
    let catalog = FieldCatalog::from_toml_str(
        r#"
[[field]]
key = "parcel_id"
label = "Parcel ID"
required = true

[[field]]
key = "owner_email"
label = "Owner Email"
"#,
    )
    .unwrap();
    let config = ScoringConfig::from_toml_str(
        r#"
[pattern_fields]
email = "owner_email"
"#,
    )
    .unwrap();
    let engine = MappingEngine::new(catalog, config).unwrap();
    let assignment = engine.assign(&SourceColumn::new(
        "Contact",
        ["jane@example.com", "bob@example.org"],
    ));
    assert_eq!(assignment.field.key(), Some("owner_email"));
}

#[test]
fn review_state_from_engine() {
    let engine = property_engine();
    let mut state = MappingState::from_engine(&engine, &[mailing_address(), notes()]);
    let summary = state.summary();
    assert_eq!(summary.mapped, 1);
    assert_eq!(summary.missing_required, vec!["estimated_value".to_string()]);

    state.assign("Notes", "estimated_value").unwrap();
    assert!(state.summary().is_complete());
}
