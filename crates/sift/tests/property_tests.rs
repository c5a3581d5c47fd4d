//! Property-based tests for Sift filters and joins.
//!
//! These tests use proptest to generate random datasets and selections and
//! verify that filters and joins keep their invariants.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p sift --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p sift --test property_tests
//! ```

use std::collections::HashSet;

use proptest::prelude::*;

use sift::{
    build_filter, Column, Dataset, DatasetPool, JoinKind, JoinSpec, SimpleFilter, Value,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Non-empty integer column values.
fn ages() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-1000i64..1000, 1..60)
}

/// City names drawn from a small alphabet so subsets are meaningful.
fn cities() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::sample::select(vec!["NY", "LA", "SF", "TX", "WA"]).prop_map(str::to_string),
        1..60,
    )
}

/// Join keys, possibly repeated.
fn keys() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..20, 0..30)
}

/// Unique join keys.
fn unique_keys() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::hash_set(0i64..40, 0..25).prop_map(|s| s.into_iter().collect())
}

fn age_dataset(values: &[i64]) -> Dataset {
    Dataset::new(vec![Column::integer("age", values.iter().copied())]).unwrap()
}

fn keyed(name: &str, keys: &[i64]) -> Dataset {
    let payload: Vec<i64> = (0..keys.len() as i64).collect();
    Dataset::new(vec![
        Column::integer("key", keys.iter().copied()),
        Column::integer(name, payload),
    ])
    .unwrap()
}

fn join_rows(left: &[i64], right: &[i64], kind: JoinKind) -> usize {
    let pool = DatasetPool::new()
        .with("left", keyed("l", left))
        .with("right", keyed("r", right));
    let spec = JoinSpec::new("left", "right", "key", "key").with_kind(kind);
    let (joined, _) = sift::join(&pool, &spec, &sift::FilterConfig::default()).unwrap();
    joined.row_count()
}

// =============================================================================
// Numeric Filter Properties
// =============================================================================

mod numeric_tests {
    use super::*;

    proptest! {
        #[test]
        fn range_keeps_only_values_within_bounds(
            values in ages(),
            a in -1000i64..1000,
            b in -1000i64..1000,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let mut session = build_filter(age_dataset(&values));
            let outcome = session.apply_simple_filters(&[SimpleFilter::numeric("age", lo as f64, hi as f64)]);

            prop_assert!(outcome.is_clean());
            let kept = outcome.dataset.column("age").unwrap();
            for v in kept.values() {
                let x = v.as_f64().unwrap();
                prop_assert!(lo as f64 <= x && x <= hi as f64);
            }
            let expected = values.iter().filter(|&&v| lo <= v && v <= hi).count();
            prop_assert_eq!(kept.len(), expected);
        }

        #[test]
        fn full_range_is_not_applied(values in ages()) {
            let min = *values.iter().min().unwrap() as f64;
            let max = *values.iter().max().unwrap() as f64;
            let mut session = build_filter(age_dataset(&values));
            let outcome = session.apply_simple_filters(&[SimpleFilter::numeric("age", min, max)]);

            prop_assert!(!outcome.applied);
            prop_assert_eq!(outcome.dataset.row_count(), values.len());
            prop_assert!(!session.metadata().active);
        }
    }
}

// =============================================================================
// Categorical Filter Properties
// =============================================================================

mod categorical_tests {
    use super::*;

    proptest! {
        #[test]
        fn subset_keeps_exactly_selected_values(
            values in cities(),
            mask in prop::collection::vec(any::<bool>(), 5),
        ) {
            let all = ["NY", "LA", "SF", "TX", "WA"];
            let selected: Vec<&str> = all
                .iter()
                .zip(&mask)
                .filter(|(_, keep)| **keep)
                .map(|(c, _)| *c)
                .collect();
            let dataset = Dataset::new(vec![Column::text("city", values.iter().cloned())]).unwrap();
            let distinct: HashSet<&str> = values.iter().map(String::as_str).collect();
            let effective: HashSet<&str> = selected.iter().copied().filter(|c| distinct.contains(c)).collect();

            let mut session = build_filter(dataset);
            let outcome = session.apply_simple_filters(&[SimpleFilter::values("city", selected.clone())]);

            prop_assert!(outcome.is_clean());
            if effective.len() == distinct.len() {
                prop_assert!(!outcome.applied);
                prop_assert_eq!(outcome.dataset.row_count(), values.len());
            } else {
                prop_assert!(outcome.applied);
                for v in outcome.dataset.column("city").unwrap().values() {
                    let Value::Text(city) = v else {
                        return Err(TestCaseError::fail("non-text city"));
                    };
                    prop_assert!(effective.contains(city.as_str()));
                }
                let expected = values.iter().filter(|v| effective.contains(v.as_str())).count();
                prop_assert_eq!(outcome.dataset.row_count(), expected);
            }
        }

        #[test]
        fn search_matches_case_insensitively(
            words in prop::collection::vec("[a-zA-Z]{1,6}", 51..80),
            term in "[a-zA-Z]{1,2}",
        ) {
            // Make every value distinct so the column is searched, not subset-selected.
            let values: Vec<String> = words.iter().enumerate().map(|(i, w)| format!("{}{}", w, i)).collect();
            let dataset = Dataset::new(vec![Column::text("code", values.iter().cloned())]).unwrap();

            let mut session = build_filter(dataset);
            let outcome = session.apply_simple_filters(&[SimpleFilter::search("code", term.clone())]);

            prop_assert!(outcome.applied);
            let needle = term.to_lowercase();
            let expected = values.iter().filter(|v| v.to_lowercase().contains(&needle)).count();
            prop_assert_eq!(outcome.dataset.row_count(), expected);
        }
    }
}

// =============================================================================
// Session Properties
// =============================================================================

mod session_tests {
    use super::*;

    proptest! {
        #[test]
        fn reset_returns_original(values in ages(), a in -1000i64..1000) {
            let original = age_dataset(&values);
            let mut session = build_filter(original.clone());
            session.apply_simple_filters(&[SimpleFilter::numeric("age", a as f64, 1000.0)]);

            let reset = session.reset();
            prop_assert_eq!(&reset, &original);
            prop_assert!(!session.metadata().active);
            prop_assert_eq!(session.current(), &original);
        }
    }
}

// =============================================================================
// Join Properties
// =============================================================================

mod join_tests {
    use super::*;

    proptest! {
        #[test]
        fn outer_join_at_least_larger_side(left in keys(), right in keys()) {
            let rows = join_rows(&left, &right, JoinKind::Outer);
            prop_assert!(rows >= left.len().max(right.len()));
        }

        #[test]
        fn inner_join_with_unique_keys_at_most_smaller_side(
            left in unique_keys(),
            right in unique_keys(),
        ) {
            let rows = join_rows(&left, &right, JoinKind::Inner);
            prop_assert!(rows <= left.len().min(right.len()));
        }

        #[test]
        fn left_join_keeps_every_left_row_with_unique_right_keys(
            left in keys(),
            right in unique_keys(),
        ) {
            let rows = join_rows(&left, &right, JoinKind::Left);
            prop_assert_eq!(rows, left.len());
        }
    }
}
