use lead_map::{MappingEngine, MatchScorer, ScoringConfig, name_similarity};
use lead_model::{Confidence, SourceColumn, property_catalog};
use proptest::prelude::*;

fn arb_column() -> impl Strategy<Value = SourceColumn> {
    (
        "[A-Za-z _#-]{0,24}",
        prop::collection::vec(
            prop_oneof![
                "[0-9]{1,5} [A-Z][a-z]{2,8} (St|Ave|Rd|Ln)",
                "\\([0-9]{3}\\) [0-9]{3}-[0-9]{4}",
                "\\$[0-9]{1,3}(,[0-9]{3}){0,2}",
                "[0-9]{5}",
                "(19|20)[0-9]{2}",
                "[A-Z]{2}",
                "[a-z ]{0,16}",
            ],
            0..20,
        ),
    )
        .prop_map(|(name, samples)| SourceColumn::new(name, samples))
}

proptest! {
    #[test]
    fn similarity_stays_in_unit_interval(a in "\\PC{0,20}", b in "\\PC{0,20}") {
        let sim = name_similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&sim));
    }

    #[test]
    fn scores_stay_in_unit_interval(column in arb_column()) {
        let scorer = MatchScorer::new(ScoringConfig::default()).unwrap();
        let catalog = property_catalog().unwrap();
        for result in scorer.score_all(&column, &catalog) {
            prop_assert!((0.0..=1.0).contains(&result.score), "{}: {}", result.field_key, result.score);
            prop_assert!(!result.reason.is_empty());
        }
    }

    #[test]
    fn assignments_are_deterministic(columns in prop::collection::vec(arb_column(), 0..6)) {
        let engine = MappingEngine::new(property_catalog().unwrap(), ScoringConfig::default()).unwrap();
        prop_assert_eq!(engine.map_columns(&columns), engine.map_columns(&columns));
    }

    #[test]
    fn low_scores_always_skip(column in arb_column()) {
        let engine = MappingEngine::new(property_catalog().unwrap(), ScoringConfig::default()).unwrap();
        let assignment = engine.assign(&column);
        if assignment.is_skip() {
            prop_assert_eq!(assignment.confidence, Confidence::Low);
            prop_assert_eq!(assignment.score, 0.0);
        } else {
            prop_assert!(assignment.score >= 0.3);
            let expected = engine.config().thresholds.categorize(assignment.score);
            prop_assert_eq!(assignment.confidence, expected);
        }
    }

    #[test]
    fn one_assignment_per_column(columns in prop::collection::vec(arb_column(), 0..6)) {
        let engine = MappingEngine::new(property_catalog().unwrap(), ScoringConfig::default()).unwrap();
        let result = engine.map_columns(&columns);
        prop_assert_eq!(result.len(), columns.len());
        for (column, assigned) in columns.iter().zip(&result) {
            prop_assert_eq!(&column.name, &assigned.source_name);
        }
    }
}
