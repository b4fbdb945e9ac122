use crate::content::Outcome;

/// Map a final score to its outcome bucket.
///
/// Buckets are ordered by ascending threshold (stable, so ties keep their
/// input order) and the first one whose threshold is strictly greater than
/// `score` wins. Scores at or above every threshold land in the last bucket.
/// Returns `None` only for an empty table.
pub fn resolve(score: i64, results: &[Outcome]) -> Option<&Outcome> {
    let mut ordered: Vec<&Outcome> = results.iter().collect();
    ordered.sort_by_key(|outcome| outcome.threshold);

    let resolved = ordered
        .iter()
        .copied()
        .find(|outcome| score < outcome.threshold)
        .or_else(|| ordered.last().copied());

    if let Some(outcome) = resolved {
        tracing::debug!(score, threshold = outcome.threshold, "resolved outcome");
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(threshold: i64, text: &str) -> Outcome {
        Outcome {
            threshold,
            text: text.to_string(),
            image: None,
        }
    }

    fn table() -> Vec<Outcome> {
        // Deliberately out of order
        vec![outcome(300, "top"), outcome(0, "low"), outcome(100, "mid")]
    }

    #[test]
    fn test_below_lowest_threshold() {
        assert_eq!(resolve(-50, &table()).unwrap().threshold, 0);
    }

    #[test]
    fn test_boundary_is_exclusive() {
        assert_eq!(resolve(0, &table()).unwrap().threshold, 100);
        assert_eq!(resolve(99, &table()).unwrap().threshold, 100);
        assert_eq!(resolve(100, &table()).unwrap().threshold, 300);
    }

    #[test]
    fn test_between_thresholds() {
        assert_eq!(resolve(150, &table()).unwrap().threshold, 300);
    }

    #[test]
    fn test_top_bin_absorbs_overflow() {
        assert_eq!(resolve(300, &table()).unwrap().threshold, 300);
        assert_eq!(resolve(1000, &table()).unwrap().threshold, 300);
    }

    #[test]
    fn test_total_over_extreme_scores() {
        let results = table();
        assert_eq!(resolve(i64::MIN, &results).unwrap().text, "low");
        assert_eq!(resolve(i64::MAX, &results).unwrap().text, "top");
    }

    #[test]
    fn test_numeric_not_lexicographic_order() {
        let results = vec![outcome(20, "twenty"), outcome(100, "hundred"), outcome(3, "three")];
        assert_eq!(resolve(5, &results).unwrap().text, "twenty");
        assert_eq!(resolve(-1, &results).unwrap().text, "three");
    }

    #[test]
    fn test_ties_follow_input_order() {
        let results = vec![outcome(50, "first"), outcome(10, "low"), outcome(50, "second")];
        assert_eq!(resolve(20, &results).unwrap().text, "first");
        // Overflow picks the last bucket in sorted order
        assert_eq!(resolve(80, &results).unwrap().text, "second");
    }

    #[test]
    fn test_empty_table() {
        assert!(resolve(0, &[]).is_none());
    }

    #[test]
    fn test_input_is_not_reordered() {
        let results = table();
        let _ = resolve(10, &results);
        assert_eq!(results, table());
    }
}
