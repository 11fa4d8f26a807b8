use ordered_float::OrderedFloat;
use serde::Serialize;

/// Five-number summary plus mean over a sample of present values.
///
/// Quartiles use linear interpolation on the sorted sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

impl Distribution {
    /// Build a distribution from a sample. Returns `None` for an empty
    /// sample; NaNs must be filtered out by the caller (readings store
    /// missing values as `None`, never NaN).
    pub fn from_values(mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by_key(|v| OrderedFloat(*v));

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;

        Some(Self {
            count,
            min: values[0],
            q1: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q3: quantile(&values, 0.75),
            max: values[count - 1],
            mean,
        })
    }
}

/// Linear-interpolated quantile of an already sorted, non-empty sample.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = p * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

/// Mean over the present values of an optional-valued sample.
pub fn mean_of(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values.into_iter().flatten() {
        sum += v;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample() {
        assert!(Distribution::from_values(vec![]).is_none());
    }

    #[test]
    fn test_single_value() {
        let d = Distribution::from_values(vec![4.2]).unwrap();
        assert_eq!(d.count, 1);
        assert_eq!(d.min, 4.2);
        assert_eq!(d.median, 4.2);
        assert_eq!(d.max, 4.2);
        assert_eq!(d.mean, 4.2);
    }

    #[test]
    fn test_known_quartiles() {
        // Sorted: [1, 2, 3, 4, 5]; linear interpolation gives exact points.
        let d = Distribution::from_values(vec![3.0, 1.0, 5.0, 2.0, 4.0]).unwrap();
        assert_eq!(d.min, 1.0);
        assert_eq!(d.q1, 2.0);
        assert_eq!(d.median, 3.0);
        assert_eq!(d.q3, 4.0);
        assert_eq!(d.max, 5.0);
        assert_eq!(d.mean, 3.0);
    }

    #[test]
    fn test_interpolated_median() {
        let d = Distribution::from_values(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((d.median - 2.5).abs() < 1e-9);
        assert!((d.q1 - 1.75).abs() < 1e-9);
        assert!((d.q3 - 3.25).abs() < 1e-9);
    }

    #[test]
    fn test_mean_of_skips_missing() {
        assert_eq!(mean_of([Some(1.0), None, Some(3.0)]), Some(2.0));
        assert_eq!(mean_of([None, None]), None);
        assert_eq!(mean_of([]), None);
    }
}
