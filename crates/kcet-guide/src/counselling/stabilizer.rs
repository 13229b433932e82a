//! Multi-year cutoff smoothing.
//!
//! A branch's cutoff for one category moves from year to year. When the
//! movement is small the latest year is the best predictor; when the series
//! swings (coefficient of variation above the threshold) the median is used
//! so a single outlier year cannot dominate.

/// Coefficient of variation above which a series is treated as volatile.
pub const DEFAULT_STABILITY_THRESHOLD: f64 = 0.15;

/// Stabilizes a chronological series using [`DEFAULT_STABILITY_THRESHOLD`].
pub fn stabilize(cutoffs: &[u32]) -> Option<u32> {
    stabilize_with(cutoffs, DEFAULT_STABILITY_THRESHOLD)
}

/// Stabilizes a series ordered oldest to newest.
///
/// Returns `None` for an empty series, the sole value for a single year, the
/// median when `stdev / mean > threshold`, and otherwise the last element.
pub fn stabilize_with(cutoffs: &[u32], threshold: f64) -> Option<u32> {
    let latest = *cutoffs.last()?;
    if cutoffs.len() == 1 {
        return Some(latest);
    }

    match coefficient_of_variation(cutoffs) {
        Some(cv) if cv > threshold => Some(median(cutoffs)),
        _ => Some(latest),
    }
}

/// Sample coefficient of variation; `None` when the mean is zero.
pub(crate) fn coefficient_of_variation(values: &[u32]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let count = values.len() as f64;
    let mean = values.iter().map(|value| f64::from(*value)).sum::<f64>() / count;
    if mean <= 0.0 {
        return None;
    }

    let variance = values
        .iter()
        .map(|value| {
            let delta = f64::from(*value) - mean;
            delta * delta
        })
        .sum::<f64>()
        / (count - 1.0);

    Some(variance.sqrt() / mean)
}

/// Median of a sorted copy; even counts take the floor of the two middle values' mean.
pub(crate) fn median(values: &[u32]) -> u32 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        let sum = u64::from(sorted[mid - 1]) + u64::from(sorted[mid]);
        (sum / 2) as u32
    }
}

/// Year-labelled cutoff points for one (branch, category, round).
///
/// "Latest" is derived from the year label, so callers may supply points in
/// any order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CutoffSeries {
    points: Vec<(String, u32)>,
}

impl CutoffSeries {
    pub fn new(mut points: Vec<(String, u32)>) -> Self {
        points.sort_by(|(a, _), (b, _)| year_order(a, b));
        Self { points }
    }

    /// Values ordered oldest to newest.
    pub fn values(&self) -> Vec<u32> {
        self.points.iter().map(|(_, value)| *value).collect()
    }

    pub fn stabilized(&self, threshold: f64) -> Option<u32> {
        stabilize_with(&self.values(), threshold)
    }
}

fn year_order(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.trim().parse::<u32>(), b.trim().parse::<u32>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_single_value_series() {
        assert_eq!(stabilize(&[]), None);
        assert_eq!(stabilize(&[4321]), Some(4321));
    }

    #[test]
    fn steady_series_prefers_latest_year_not_largest() {
        // cv is ~0.03, so the last element wins even though it is the smallest.
        assert_eq!(stabilize(&[4300, 4250, 4150, 4100]), Some(4100));
        assert_eq!(stabilize(&[4000, 4100, 4150, 4200]), Some(4200));
    }

    #[test]
    fn volatile_series_uses_median() {
        // mean 5250, stdev ~3304 -> cv ~0.63
        assert_eq!(stabilize(&[2000, 9000, 3000, 7000]), Some(5000));
        assert_eq!(stabilize(&[1000, 5000, 1200]), Some(1200));
    }

    #[test]
    fn even_median_floors_the_midpoint() {
        assert_eq!(median(&[1, 2]), 1);
        assert_eq!(median(&[100, 301, 9, 4000]), 200);
        assert_eq!(median(&[u32::MAX, u32::MAX]), u32::MAX);
    }

    #[test]
    fn zero_mean_series_falls_through_to_latest() {
        assert_eq!(coefficient_of_variation(&[0, 0]), None);
        assert_eq!(stabilize(&[0, 0]), Some(0));
        assert_eq!(stabilize_with(&[0, 0, 0], 0.0), Some(0));
    }

    #[test]
    fn threshold_is_strictly_greater_than() {
        let values = [100, 200];
        let cv = coefficient_of_variation(&values).expect("mean is positive");
        assert_eq!(stabilize_with(&values, cv), Some(200));
        assert_eq!(stabilize_with(&values, cv - 1e-9), Some(150));
    }

    #[test]
    fn output_stays_within_input_bounds_and_is_deterministic() {
        let inputs: [&[u32]; 5] = [
            &[10, 20, 30, 40],
            &[500, 50_000],
            &[7, 7, 7],
            &[90_000, 1, 45_000],
            &[12_000, 11_800, 12_300, 12_100],
        ];

        for input in inputs {
            let first = stabilize(input).expect("non-empty");
            assert_eq!(stabilize(input), Some(first));

            let min = *input.iter().min().expect("non-empty");
            let max = *input.iter().max().expect("non-empty");
            assert!(first >= min && first <= max, "{first} outside {input:?}");
            assert!(input.contains(&first) || first == median(input));
        }
    }

    #[test]
    fn series_derives_latest_from_year_labels() {
        let series = CutoffSeries::new(vec![
            ("2025".to_string(), 4200),
            ("2022".to_string(), 4000),
            ("2024".to_string(), 4150),
        ]);

        assert_eq!(series.values(), vec![4000, 4150, 4200]);
        assert_eq!(series.stabilized(DEFAULT_STABILITY_THRESHOLD), Some(4200));
        assert!(CutoffSeries::default().stabilized(0.15).is_none());
    }
}
