//! Derived-metric arithmetic.
//!
//! The single source of truth for every percentage the service emits. All
//! functions return full-precision values — display rounding belongs to the
//! presentation layer — and treat a non-positive denominator as 0.0 so
//! downstream consumers never see NaN or infinity.

/// Percentage `numerator / denominator * 100`, clamped to [0, 100].
pub fn rate(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    (numerator as f64 / denominator as f64 * 100.0).clamp(0.0, 100.0)
}

/// Stage-over-stage funnel drop-off: the percent decrease from the
/// immediately preceding stage to the current one (never cumulative against
/// the first stage). Floored at 0 when a data anomaly makes the current
/// stage exceed the previous one.
pub fn drop_off(previous: i64, current: i64) -> f64 {
    if previous <= 0 {
        return 0.0;
    }
    (((previous - current) as f64 / previous as f64) * 100.0).max(0.0)
}

/// Share of sessions that bounced, as a percentage.
pub fn bounce_rate(bounced: i64, total: i64) -> f64 {
    rate(bounced, total)
}

/// Plain quotient with the same zero-denominator policy, for non-percentage
/// derived values (events per session and the like).
pub fn ratio(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_handles_zero_denominator() {
        assert_eq!(rate(0, 0), 0.0);
        assert_eq!(rate(5, 0), 0.0);
        assert_eq!(rate(5, -1), 0.0);
    }

    #[test]
    fn rate_computes_percentages() {
        assert_eq!(rate(5, 10), 50.0);
        assert_eq!(rate(0, 10), 0.0);
        assert_eq!(rate(10, 10), 100.0);
        assert!((rate(1, 3) - 33.333333333333336).abs() < 1e-12);
    }

    #[test]
    fn rate_is_clamped_to_hundred() {
        // More conversions than sessions can happen when one session
        // converts repeatedly; the rate contract stays within [0, 100].
        assert_eq!(rate(12, 10), 100.0);
    }

    #[test]
    fn drop_off_is_stage_over_stage() {
        assert_eq!(drop_off(100, 60), 40.0);
        assert_eq!(drop_off(400, 250), 37.5);
    }

    #[test]
    fn drop_off_handles_zero_previous_stage() {
        assert_eq!(drop_off(0, 0), 0.0);
        assert_eq!(drop_off(0, 50), 0.0);
    }

    #[test]
    fn drop_off_floors_anomalous_growth_at_zero() {
        assert_eq!(drop_off(50, 80), 0.0);
    }

    #[test]
    fn bounce_rate_follows_rate_policy() {
        assert_eq!(bounce_rate(25, 100), 25.0);
        assert_eq!(bounce_rate(3, 0), 0.0);
    }

    #[test]
    fn ratio_divides_without_scaling() {
        assert_eq!(ratio(9, 3), 3.0);
        assert_eq!(ratio(9, 0), 0.0);
    }
}
