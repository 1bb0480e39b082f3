use gemmatalk_types::{AppState, Mood, Progress};
use proptest::prelude::*;

proptest! {
    #[test]
    fn percent_stays_in_range(total in 0u64..u64::MAX / 2, frac in 0.0f64..=1.0) {
        let completed = (total as f64 * frac) as u64;
        let progress = Progress { digest: "sha256:x".into(), completed: completed.min(total), total };
        let pct = progress.percent();
        prop_assert!((0.0..=100.0).contains(&pct), "got {pct}");
    }

    #[test]
    fn display_has_two_decimals(completed in 0u64..1_000_000, total in 1u64..1_000_000) {
        let progress = Progress { digest: "d".into(), completed, total };
        let shown = progress.to_string();
        let number = shown.strip_prefix("d: ").and_then(|s| s.strip_suffix('%')).unwrap();
        prop_assert_eq!(number.split('.').nth(1).map(str::len), Some(2));
    }

    #[test]
    fn graph_values_invert(value in 0u8..=255) {
        match Mood::from_graph_value(value) {
            Some(mood) => prop_assert_eq!(mood.graph_value(), value),
            None => prop_assert!(value > 2),
        }
    }

    #[test]
    fn goals_survive_json(texts in proptest::collection::vec("[a-z ]{0,12}", 0..8)) {
        let mut state = AppState::default();
        for text in &texts {
            state.add_goal(text);
        }
        prop_assert_eq!(state.goals.len(), texts.iter().filter(|t| !t.trim().is_empty()).count());
        let json = serde_json::to_value(&state).unwrap();
        let back: AppState = serde_json::from_value(json).unwrap();
        prop_assert_eq!(back, state);
    }
}
