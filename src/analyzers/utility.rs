/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Computes the sample standard deviation (`n - 1` denominator) given a
/// pre-computed mean. Returns `None` for fewer than two values.
pub fn stddev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;

    Some(variance.sqrt())
}

/// Mean and sample standard deviation of `values`.
pub fn mean_std(values: &[f64]) -> (Option<f64>, Option<f64>) {
    match mean(values) {
        Some(m) => (Some(m), stddev(values, m)),
        None => (None, None),
    }
}

/// Trims and capitalizes: first character upper case, the rest lower case.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn test_stddev_sample() {
        assert_eq!(stddev(&[5.0], 5.0), None);
        // sample variance of [2, 4] is 2
        let sd = stddev(&[2.0, 4.0], 3.0).unwrap();
        assert!((sd - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_mean_std_empty() {
        assert_eq!(mean_std(&[]), (None, None));
        assert_eq!(mean_std(&[7.0]), (Some(7.0), None));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("  breakfast "), "Breakfast");
        assert_eq!(capitalize("LUNCH"), "Lunch");
        assert_eq!(capitalize("Type 2 Diabetic"), "Type 2 diabetic");
        assert_eq!(capitalize(""), "");
    }
}
