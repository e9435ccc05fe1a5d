use serde::Serialize;

/// `numerator / denominator`, or zero when there is nothing to divide by
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Progress-bar fraction plus its one-decimal percentage label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafePercentage {
    pub progress: f64,
    pub text: String,
}

pub fn calculate_safe_percentage(numerator: u32, denominator: u32) -> SafePercentage {
    let progress = ratio(f64::from(numerator), f64::from(denominator));
    SafePercentage {
        progress,
        text: format_percentage(progress),
    }
}

pub fn format_percentage(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_denominator_is_zero() {
        let pct = calculate_safe_percentage(0, 0);
        assert_eq!(pct.progress, 0.0);
        assert_eq!(pct.text, "0.0%");
        assert_eq!(ratio(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_formats_one_decimal() {
        let pct = calculate_safe_percentage(2, 3);
        assert!((pct.progress - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(pct.text, "66.7%");
        assert_eq!(calculate_safe_percentage(4, 4).text, "100.0%");
    }
}
