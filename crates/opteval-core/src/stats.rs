//! Small descriptive statistics over `f64` samples.

use crate::AnalysisError;

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Result<f64, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::EmptyDataset("mean"));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean and population standard deviation.
pub fn mean_and_std(values: &[f64]) -> Result<(f64, f64), AnalysisError> {
    let mean = mean(values)?;
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    Ok((mean, variance.sqrt()))
}

/// Median; an even number of values averages the middle pair.
pub fn median(values: &[f64]) -> Result<f64, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::EmptyDataset("median"));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let len = sorted.len();
    if len % 2 == 0 {
        Ok(0.5 * (sorted[len / 2 - 1] + sorted[len / 2]))
    } else {
        Ok(sorted[len / 2])
    }
}

/// Counts equal elements.
///
/// Returns `(count, value)` pairs in ascending value order; the order of
/// appearance in the input is not preserved.
pub fn count_duplicity<T: Ord + Clone>(values: &[T]) -> Vec<(usize, T)> {
    let mut sorted = values.to_vec();
    sorted.sort();
    let mut counts: Vec<(usize, T)> = Vec::new();
    for value in sorted {
        match counts.last_mut() {
            Some((count, last)) if *last == value => *count += 1,
            _ => counts.push((1, value)),
        }
    }
    counts
}

/// Sorted values with duplicates removed.
pub fn unique_sorted<T: Ord + Clone>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut unique: Vec<T> = values.into_iter().collect();
    unique.sort();
    unique.dedup();
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(left: f64, right: f64) {
        assert!((left - right).abs() < 1e-9, "left={left}, right={right}");
    }

    #[test]
    fn test_mean_and_std_population() {
        let (mean, std) = mean_and_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        approx_eq(mean, 5.0);
        approx_eq(std, 2.0);
    }

    #[test]
    fn test_mean_and_std_single_value() {
        let (mean, std) = mean_and_std(&[3.5]).unwrap();
        approx_eq(mean, 3.5);
        approx_eq(std, 0.0);
    }

    #[test]
    fn test_empty_input_fails() {
        assert_eq!(mean(&[]), Err(AnalysisError::EmptyDataset("mean")));
        assert!(mean_and_std(&[]).is_err());
        assert_eq!(median(&[]), Err(AnalysisError::EmptyDataset("median")));
    }

    #[test]
    fn test_median_odd_and_even() {
        approx_eq(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
        approx_eq(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
    }

    #[test]
    fn test_count_duplicity() {
        let counts = count_duplicity(&[3, 1, 1, 2]);
        assert_eq!(counts.len(), 3);
        for pair in [(1, 3), (2, 1), (1, 2)] {
            assert!(counts.contains(&pair), "missing {pair:?} in {counts:?}");
        }
    }

    #[test]
    fn test_count_duplicity_empty() {
        assert!(count_duplicity::<u32>(&[]).is_empty());
    }

    #[test]
    fn test_unique_sorted() {
        assert_eq!(unique_sorted([5, 1, 5, 3, 1]), vec![1, 3, 5]);
    }
}
