/// Rounds half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Hours are reported with two decimals.
pub fn round_hours(value: f64) -> f64 {
    round_to(value, 2)
}

/// Percentages are reported with one decimal.
pub fn round_percent(value: f64) -> f64 {
    round_to(value, 1)
}

/// `numerator / denominator * 100`, or 0 when the denominator is zero.
pub fn percent_of(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_places() {
        assert_eq!(round_hours(1.23456), 1.23);
        assert_eq!(round_hours(7.0 / 3.0), 2.33);
        assert_eq!(round_percent(66.666), 66.7);
        assert_eq!(round_percent(0.04), 0.0);
    }

    #[test]
    fn percent_guards_zero_denominator() {
        assert_eq!(percent_of(7.0, 7.0), 100.0);
        assert_eq!(percent_of(3.0, 0.0), 0.0);
    }
}
