use proptest::prelude::*;

use super::common::*;
use crate::preferences::ahp::{
    build_reciprocal_matrix, consistency_ratio, evaluate, evaluate_strict,
    geometric_mean_weights, principal_eigenvalue_estimate, random_index, AhpError,
    ComparisonMatrix, CR_THRESHOLD,
};
use crate::preferences::comparison::{PairJudgment, PairwiseComparison, SAATY_MAX, SAATY_MIN};
use crate::preferences::criteria::CriteriaOrder;

fn letters(n: usize) -> CriteriaOrder {
    CriteriaOrder::new((0..n).map(|index| format!("c{index}"))).expect("distinct keys")
}

#[test]
fn neutral_judgments_yield_equal_weights_and_zero_ratio() {
    for n in 1..=10 {
        let order = letters(n);
        let preview = evaluate(&order, &[]);

        assert_eq!(preview.weights.len(), n);
        for weight in &preview.weights {
            assert_close(*weight, 1.0 / n as f64);
        }
        assert!(preview.consistency_ratio >= 0.0);
        assert!(preview.consistency_ratio < 1e-12, "n={n}");
    }
}

#[test]
fn empty_order_produces_empty_preview() {
    let preview = evaluate(&letters(0), &[]);
    assert!(preview.weights.is_empty());
    assert_eq!(preview.consistency_ratio, 0.0);
}

#[test]
fn near_consistent_example_matches_reference_values() {
    let preview = evaluate(&order(), &near_consistent_comparisons());

    let expected = [
        0.5806149999980099,
        0.23178381661440986,
        0.12129654360552856,
        0.0663046397820517,
    ];
    for (actual, expected) in preview.weights.iter().zip(expected) {
        assert_close(*actual, expected);
    }
    assert_close(preview.consistency_ratio, 0.010469938209544402);
    assert!(preview.consistency_ratio < CR_THRESHOLD);
}

#[test]
fn near_consistent_example_ranks_price_first_and_area_last() {
    let preview = evaluate(&order(), &near_consistent_comparisons());
    let weights = &preview.weights;
    assert!(weights[0] > weights[1]);
    assert!(weights[1] > weights[2]);
    assert!(weights[2] > weights[3]);
}

#[test]
fn cyclic_judgments_are_far_above_threshold() {
    let preview = evaluate(&order(), &cyclic_comparisons());
    for weight in &preview.weights {
        assert_close(*weight, 0.25);
    }
    assert_close(preview.consistency_ratio, 2.633744855967078);
}

#[test]
fn consistency_ratio_matches_evaluate() {
    let comparisons = near_consistent_comparisons();
    assert_eq!(
        consistency_ratio(&order(), &comparisons),
        evaluate(&order(), &comparisons).consistency_ratio
    );
}

#[test]
fn two_criteria_never_report_inconsistency() {
    let order = letters(2);
    for value in [SAATY_MIN, 0.5, 1.0, 7.0, SAATY_MAX] {
        let preview = evaluate(&order, &[PairwiseComparison::new("c0", "c1", value)]);
        assert_eq!(preview.consistency_ratio, 0.0);
    }

    let preview = evaluate(&order, &[PairwiseComparison::new("c0", "c1", 7.0)]);
    assert_close(preview.weights[0], 0.875);
    assert_close(preview.weights[1], 0.125);
}

#[test]
fn single_criterion_takes_all_weight() {
    let preview = evaluate(&letters(1), &[]);
    assert_eq!(preview.weights, vec![1.0]);
    assert_eq!(preview.consistency_ratio, 0.0);
}

#[test]
fn built_matrix_is_reciprocal_with_unit_diagonal() {
    let matrix = build_reciprocal_matrix(&order(), &near_consistent_comparisons());
    assert!(matrix.is_reciprocal(1e-12));
    assert_eq!(matrix.get(0, 1), 3.0);
    assert_close(matrix.get(1, 0), 1.0 / 3.0);
}

#[test]
fn matrix_builder_skips_unknown_keys_and_self_comparisons() {
    let comparisons = vec![
        PairwiseComparison::new("price", "parking", 9.0),
        PairwiseComparison::new("size", "size", 4.0),
    ];
    let matrix = build_reciprocal_matrix(&order(), &comparisons);
    assert_eq!(matrix, build_reciprocal_matrix(&order(), &[]));
}

#[test]
fn later_comparison_for_same_pair_wins() {
    let comparisons = vec![
        PairwiseComparison::new("price", "size", 3.0),
        PairwiseComparison::new("price", "size", 5.0),
    ];
    let matrix = build_reciprocal_matrix(&order(), &comparisons);
    assert_eq!(matrix.get(0, 1), 5.0);
}

#[test]
fn reversed_comparison_produces_the_same_matrix() {
    let forward = vec![PairwiseComparison::new("price", "size", 4.0)];
    let backward = vec![forward[0].reversed()];

    let a = build_reciprocal_matrix(&order(), &forward);
    let b = build_reciprocal_matrix(&order(), &backward);
    for i in 0..4 {
        for j in 0..4 {
            assert_close(a.get(i, j), b.get(i, j));
        }
    }
}

#[test]
fn direction_swap_transposes_the_pair_entries() {
    let a_over_b =
        PairwiseComparison::from_judgment("price", "size", PairJudgment::favoring_a(5.0));
    let b_over_a =
        PairwiseComparison::from_judgment("price", "size", PairJudgment::favoring_b(5.0));

    let first = build_reciprocal_matrix(&order(), &[a_over_b]);
    let second = build_reciprocal_matrix(&order(), &[b_over_a]);
    assert_close(first.get(0, 1), second.get(1, 0));
    assert_close(first.get(1, 0), second.get(0, 1));
}

#[test]
fn swapping_an_isolated_direction_keeps_the_ratio() {
    let forward = evaluate(&order(), &[PairwiseComparison::new("price", "size", 5.0)]);
    let swapped = evaluate(&order(), &[PairwiseComparison::new("price", "size", 0.2)]);

    assert!(forward.consistency_ratio > 0.1);
    assert_close(forward.consistency_ratio, 0.12404054794354781);
    assert_close(forward.consistency_ratio, swapped.consistency_ratio);
    assert_close(forward.weights[0], swapped.weights[1]);
    assert_close(forward.weights[1], swapped.weights[0]);
}

#[test]
fn weights_and_eigenvalue_only_need_positive_entries() {
    let matrix = ComparisonMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 1.0]])
        .expect("square rows");
    assert!(!matrix.is_reciprocal(1e-9));

    let weights = geometric_mean_weights(&matrix);
    let expected = 2f64.sqrt() / (2f64.sqrt() + 3f64.sqrt());
    assert_close(weights[0], expected);
    assert_close(weights[1], 1.0 - expected);
    assert_close(principal_eigenvalue_estimate(&matrix, &weights), 1.0 + 6f64.sqrt());

    assert!(ComparisonMatrix::from_rows(vec![vec![1.0, 2.0], vec![1.0]]).is_none());
}

#[test]
fn random_index_covers_sizes_one_through_ten() {
    assert_eq!(random_index(0), None);
    assert_eq!(random_index(1), Some(0.0));
    assert_eq!(random_index(3), Some(0.58));
    assert_eq!(random_index(4), Some(0.90));
    assert_eq!(random_index(10), Some(1.49));
    assert_eq!(random_index(11), None);
}

#[test]
fn out_of_table_sizes_fall_back_to_zero_ratio() {
    let order = letters(11);
    let comparisons = vec![
        PairwiseComparison::new("c0", "c1", 9.0),
        PairwiseComparison::new("c1", "c2", 9.0),
        PairwiseComparison::new("c0", "c2", 1.0 / 9.0),
    ];
    assert_eq!(evaluate(&order, &comparisons).consistency_ratio, 0.0);
}

#[test]
fn strict_evaluation_accepts_near_consistent_judgments() {
    let result = evaluate_strict(&order(), &near_consistent_comparisons(), CR_THRESHOLD)
        .expect("valid comparisons");

    assert!(result.accepted);
    assert_eq!(result.criteria_keys, order().keys().to_vec());
    assert_close(result.cr, 0.010469938209544402);
    assert_close(result.lambda_max, 4.02826883316577);
    assert_close(result.ci, 0.009422944388589963);
    assert_close(
        result.weight_of("price").expect("price weight"),
        0.5806149999980099,
    );
    assert_eq!(result.weight_vector().len(), 4);
}

#[test]
fn strict_evaluation_rejects_cyclic_judgments() {
    let result =
        evaluate_strict(&order(), &cyclic_comparisons(), CR_THRESHOLD).expect("valid comparisons");
    assert!(!result.accepted);
    assert!(result.cr > CR_THRESHOLD);
}

#[test]
fn strict_threshold_is_exclusive() {
    let comparisons = near_consistent_comparisons();
    let cr = evaluate(&order(), &comparisons).consistency_ratio;
    let result = evaluate_strict(&order(), &comparisons, cr).expect("valid comparisons");
    assert!(!result.accepted);
}

#[test]
fn strict_evaluation_rejects_malformed_input() {
    assert_eq!(
        evaluate_strict(&letters(1), &[], CR_THRESHOLD),
        Err(AhpError::TooFewCriteria { count: 1 })
    );
    assert_eq!(
        evaluate_strict(&letters(11), &[], CR_THRESHOLD),
        Err(AhpError::UnsupportedSize { count: 11 })
    );
    assert_eq!(
        evaluate_strict(
            &order(),
            &[PairwiseComparison::new("price", "parking", 2.0)],
            CR_THRESHOLD
        ),
        Err(AhpError::UnknownCriterion {
            a: "price".to_string(),
            b: "parking".to_string(),
        })
    );
    assert_eq!(
        evaluate_strict(
            &order(),
            &[PairwiseComparison::new("size", "size", 1.0)],
            CR_THRESHOLD
        ),
        Err(AhpError::SelfComparison {
            key: "size".to_string()
        })
    );
    assert_eq!(
        evaluate_strict(
            &order(),
            &[PairwiseComparison::new("price", "size", 10.0)],
            CR_THRESHOLD
        ),
        Err(AhpError::InvalidValue { value: 10.0 })
    );
}

#[test]
fn strongest_reverse_judgment_clamps_to_scale_floor() {
    assert_eq!(PairJudgment::favoring_b(9.0).value(), 1.0 / 9.0);
    assert!(PairJudgment::favoring_b(12.0).value() >= SAATY_MIN);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn weights_are_positive_and_normalized(
        values in prop::collection::vec(SAATY_MIN..=SAATY_MAX, 6)
    ) {
        let order = order();
        let comparisons: Vec<PairwiseComparison> = order
            .pairs()
            .into_iter()
            .zip(&values)
            .map(|((a, b), value)| PairwiseComparison::new(a, b, *value))
            .collect();

        let preview = evaluate(&order, &comparisons);
        let total: f64 = preview.weights.iter().sum();

        prop_assert!((total - 1.0).abs() < 1e-9);
        prop_assert!(preview.weights.iter().all(|weight| *weight > 0.0));
        prop_assert!(preview.consistency_ratio >= 0.0);
        prop_assert!(build_reciprocal_matrix(&order, &comparisons).is_reciprocal(1e-9));
    }

    #[test]
    fn pairs_of_criteria_are_always_consistent(value in SAATY_MIN..=SAATY_MAX) {
        let preview = evaluate(&letters(2), &[PairwiseComparison::new("c0", "c1", value)]);
        prop_assert_eq!(preview.consistency_ratio, 0.0);
    }

    #[test]
    fn judgment_values_stay_on_the_scale(intensity in 0.01f64..50.0, favor_a in any::<bool>()) {
        let judgment = if favor_a {
            PairJudgment::favoring_a(intensity)
        } else {
            PairJudgment::favoring_b(intensity)
        };
        let value = judgment.value();
        prop_assert!((SAATY_MIN..=SAATY_MAX).contains(&value));
    }
}
