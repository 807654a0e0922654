//! Small descriptive statistics used by the ranker and the summary report.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
///
/// Returns 0 for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
    variance.max(0.0).sqrt()
}

/// Pearson correlation between two equally long series.
///
/// `None` when the lengths differ, fewer than two points are given, or either
/// series is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        let (dx, dy) = (a - mean_x, b - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Approximation of the error function (Abramowitz & Stegun 7.1.26).
pub fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let coeff_p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + coeff_p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

/// CDF of the standard normal distribution.
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// Two-sided p-value of a z statistic: `2 * (1 - Phi(|z|))`.
pub fn two_sided_p_value(z: f64) -> f64 {
    (2.0 * (1.0 - normal_cdf(z.abs()))).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 6.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_sample_std() {
        assert_relative_eq!(sample_std(&[5.0]), 0.0);
        assert_relative_eq!(sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.138, epsilon = 0.001);
        assert_relative_eq!(sample_std(&[3.0, 3.0, 3.0]), 0.0);
    }

    #[test]
    fn test_pearson() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(pearson(&x, &[2.0, 4.0, 6.0, 8.0]).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pearson(&x, &[8.0, 6.0, 4.0, 2.0]).unwrap(), -1.0, epsilon = 1e-12);
        assert_eq!(pearson(&x, &[1.0, 1.0, 1.0, 1.0]), None);
        assert_eq!(pearson(&x, &[1.0]), None);
    }

    #[test]
    fn test_normal_cdf_known_values() {
        assert_relative_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-6);
        assert_relative_eq!(normal_cdf(1.96), 0.975, epsilon = 1e-4);
        assert_relative_eq!(normal_cdf(-1.96), 0.025, epsilon = 1e-4);
        assert!(normal_cdf(4.0) > 0.99);
    }

    #[test]
    fn test_two_sided_p_value() {
        assert_relative_eq!(two_sided_p_value(0.0), 1.0, epsilon = 1e-6);
        assert_relative_eq!(two_sided_p_value(1.96), 0.05, epsilon = 1e-3);
        assert_relative_eq!(two_sided_p_value(-1.96), two_sided_p_value(1.96));
        assert!(two_sided_p_value(5.0) < 1e-5);
    }
}
