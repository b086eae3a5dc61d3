//! Numeric helpers shared by the analysis steps.
//!
//! Undefined values are `None` throughout; every reducer here skips them.

use serde::Serialize;

/// `numerator / denominator`, undefined when the denominator is zero or the
/// result is not finite.
#[must_use]
pub fn safe_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let ratio = numerator / denominator;
    ratio.is_finite().then_some(ratio)
}

/// Mean of the defined values; undefined if there are none.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Sum of the defined values.
pub fn sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().flatten().sum()
}

/// Pearson correlation over pairwise-complete observations.
///
/// Undefined with fewer than two complete pairs or when either side has no
/// variance.
pub fn pearson<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (Option<f64>, Option<f64>)>,
{
    let complete: Vec<(f64, f64)> = pairs
        .into_iter()
        .filter_map(|(x, y)| Some((x?, y?)))
        .collect();
    if complete.len() < 2 {
        return None;
    }

    let n = complete.len() as f64;
    let mean_x = complete.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = complete.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &complete {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Quantile of sorted data with linear interpolation between closest ranks.
///
/// `sorted` must be ascending and non-empty.
#[must_use]
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Five-number summary of one box in a box plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    /// Category the box describes
    pub label: String,
    /// Lowest observation within 1.5 IQR of the first quartile
    pub lower_whisker: f64,
    /// First quartile
    pub q1: f64,
    /// Median
    pub median: f64,
    /// Third quartile
    pub q3: f64,
    /// Highest observation within 1.5 IQR of the third quartile
    pub upper_whisker: f64,
    /// Observations beyond the whiskers
    pub outliers: Vec<f64>,
    /// Number of defined observations
    pub count: usize,
}

impl BoxStats {
    /// Summarise the defined values; `None` when nothing is defined.
    pub fn compute<I>(label: impl Into<String>, values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut sorted: Vec<f64> = values.into_iter().flatten().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = 1.5f64.mul_add(-iqr, q1);
        let high_fence = 1.5f64.mul_add(iqr, q3);

        let is_inside = |v: &f64| *v >= low_fence && *v <= high_fence;
        // whiskers never end inside the box
        let lower_whisker = sorted.iter().copied().find(is_inside).map_or(q1, |v| v.min(q1));
        let upper_whisker = sorted.iter().copied().rev().find(is_inside).map_or(q3, |v| v.max(q3));
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(Self {
            label: label.into(),
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
            count: sorted.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_safe_ratio_zero_denominator() {
        assert_eq!(safe_ratio(20.0, 0.0), None);
        assert_eq!(safe_ratio(0.0, 0.0), None);
        assert_eq!(safe_ratio(20.0, 10.0), Some(2.0));
    }

    #[test]
    fn test_mean_skips_undefined() {
        assert_eq!(mean([Some(0.2), None]), Some(0.2));
        assert_eq!(mean([None, None]), None);
        assert_eq!(mean(std::iter::empty()), None);
    }

    #[test]
    fn test_pearson_perfect_linear() {
        let pairs = (1..=10).map(|c| (Some(f64::from(c)), Some(4.0 * f64::from(c))));
        let r = pearson(pairs).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_negative_and_degenerate() {
        let pairs = (1..=5).map(|c| (Some(f64::from(c)), Some(-f64::from(c))));
        assert!((pearson(pairs).unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(pearson([(Some(1.0), Some(2.0))]), None);
        assert_eq!(pearson([(Some(1.0), Some(2.0)), (Some(1.0), Some(3.0))]), None);
    }

    #[test]
    fn test_pearson_ignores_incomplete_pairs() {
        let pairs = vec![
            (Some(1.0), Some(2.0)),
            (None, Some(100.0)),
            (Some(2.0), Some(4.0)),
            (Some(3.0), None),
            (Some(3.0), Some(6.0)),
        ];
        assert!((pearson(pairs).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile(&data, 0.5) - 2.5).abs() < f64::EPSILON);
        assert!((quantile(&data, 0.25) - 1.75).abs() < f64::EPSILON);
        assert!((quantile(&data, 1.0) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_box_stats_flags_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0].map(Some);
        let stats = BoxStats::compute("clicks", values).unwrap();
        assert_eq!(stats.outliers, vec![100.0]);
        assert!((stats.upper_whisker - 5.0).abs() < f64::EPSILON);
        assert!((stats.lower_whisker - 1.0).abs() < f64::EPSILON);
        assert_eq!(stats.count, 6);
    }

    #[test]
    fn test_box_stats_all_undefined() {
        assert!(BoxStats::compute("cpc", [None, None]).is_none());
    }

    proptest! {
        #[test]
        fn prop_box_stats_ordered(values in prop::collection::vec(-1e6f64..1e6, 1..200)) {
            let stats = BoxStats::compute("p", values.iter().copied().map(Some)).unwrap();
            prop_assert!(stats.lower_whisker <= stats.q1 + 1e-9);
            prop_assert!(stats.q1 <= stats.median + 1e-9);
            prop_assert!(stats.median <= stats.q3 + 1e-9);
            prop_assert!(stats.q3 <= stats.upper_whisker + 1e-9);
            prop_assert_eq!(stats.count, values.len());
        }

        #[test]
        fn prop_pearson_bounded(values in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 2..100)) {
            if let Some(r) = pearson(values.into_iter().map(|(x, y)| (Some(x), Some(y)))) {
                prop_assert!((-1.0..=1.0).contains(&r));
            }
        }
    }
}
