//! Graduated penalty schedule and holding-year arithmetic

use crate::investment::GraduatedPenaltyTier;
use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Elapsed holding time in years; a `now` before `invested_at` counts as zero
pub fn elapsed_years(invested_at: DateTime<Utc>, now: DateTime<Utc>, days_per_year: f64) -> f64 {
    let millis = (now - invested_at).num_milliseconds().max(0) as f64;
    millis / MILLIS_PER_DAY / days_per_year
}

/// Year of holding for a fractional holding period: year 1 covers [0, 1)
pub fn holding_year_for_years(years_held: f64) -> u32 {
    if !years_held.is_finite() || years_held <= 0.0 {
        return 1;
    }
    (years_held.floor() as u32).saturating_add(1)
}

/// Current year of holding between two timestamps
pub fn holding_year(invested_at: DateTime<Utc>, now: DateTime<Utc>, days_per_year: f64) -> u32 {
    holding_year_for_years(elapsed_years(invested_at, now, days_per_year))
}

/// Penalty tiers with a flat fallback rate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraduatedPenaltySchedule {
    tiers: Vec<GraduatedPenaltyTier>,
    flat_rate: f64,
}

impl GraduatedPenaltySchedule {
    /// Build a schedule; the flat rate is clamped to 0..=100, a non-finite one becomes 0
    pub fn new(tiers: Vec<GraduatedPenaltyTier>, flat_rate: f64) -> Self {
        let flat_rate = if flat_rate.is_finite() { flat_rate.clamp(0.0, 100.0) } else { 0.0 };
        Self { tiers, flat_rate }
    }

    /// Schedule with only a flat rate
    pub fn flat(flat_rate: f64) -> Self {
        Self::new(Vec::new(), flat_rate)
    }

    pub fn tiers(&self) -> &[GraduatedPenaltyTier] {
        &self.tiers
    }

    pub fn flat_rate(&self) -> f64 {
        self.flat_rate
    }

    /// Percentage for a holding year: matching tier, else the flat rate
    pub fn rate_for_year(&self, year: u32) -> f64 {
        self.tiers
            .iter()
            .filter(|t| t.is_valid())
            .find(|t| t.year == year)
            .map(|t| t.penalty_percentage)
            .unwrap_or(self.flat_rate)
    }

    /// Last year covered by a valid tier (0 without tiers)
    pub fn last_tier_year(&self) -> u32 {
        self.tiers.iter().filter(|t| t.is_valid()).map(|t| t.year).max().unwrap_or(0)
    }
}

/// Penalty percentage to charge on a withdrawal at `now`
///
/// Matured investments are never penalised. Otherwise the tier for the current holding
/// year applies, falling back to the flat rate.
pub fn resolve_penalty_percentage(
    schedule: &GraduatedPenaltySchedule,
    invested_at: DateTime<Utc>,
    now: DateTime<Utc>,
    is_after_maturity: bool,
    days_per_year: f64,
) -> f64 {
    if is_after_maturity {
        return 0.0;
    }
    let year = holding_year(invested_at, now, days_per_year);
    let rate = schedule.rate_for_year(year);
    log::debug!("Holding year {} -> penalty {}%", year, rate);
    rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const DPY: f64 = 365.25;

    fn schedule(tiers: &[(u32, f64)], flat: f64) -> GraduatedPenaltySchedule {
        GraduatedPenaltySchedule::new(
            tiers.iter().map(|&(y, p)| GraduatedPenaltyTier::new(y, p)).collect(),
            flat,
        )
    }

    fn invested() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_holding_year_boundaries() {
        let start = invested();
        assert_eq!(holding_year(start, start, DPY), 1);
        assert_eq!(holding_year(start, start + Duration::days(365), DPY), 1);
        // 365.25 days is exactly one year
        assert_eq!(holding_year(start, start + Duration::hours(365 * 24 + 6), DPY), 2);
        assert_eq!(holding_year(start, start + Duration::days(822), DPY), 3);
    }

    #[test]
    fn test_holding_year_clock_skew() {
        let start = invested();
        assert_eq!(holding_year(start, start - Duration::days(30), DPY), 1);
        assert_eq!(elapsed_years(start, start - Duration::days(30), DPY), 0.0);
    }

    #[test]
    fn test_holding_year_for_years() {
        assert_eq!(holding_year_for_years(0.0), 1);
        assert_eq!(holding_year_for_years(0.99), 1);
        assert_eq!(holding_year_for_years(1.0), 2);
        assert_eq!(holding_year_for_years(2.25), 3);
        assert_eq!(holding_year_for_years(-3.0), 1);
        assert_eq!(holding_year_for_years(f64::NAN), 1);
    }

    #[test]
    fn test_no_match_falls_back_to_flat_rate() {
        let sc = schedule(&[(1, 10.0), (2, 5.0)], 2.0);
        assert_eq!(sc.rate_for_year(1), 10.0);
        assert_eq!(sc.rate_for_year(2), 5.0);
        assert_eq!(sc.rate_for_year(3), 2.0);
        assert_eq!(sc.rate_for_year(40), 2.0);
        assert_eq!(sc.last_tier_year(), 2);
    }

    #[test]
    fn test_invalid_tiers_ignored() {
        let sc = schedule(&[(1, 150.0), (2, f64::NAN), (0, 3.0)], 1.0);
        assert_eq!(sc.rate_for_year(1), 1.0);
        assert_eq!(sc.rate_for_year(2), 1.0);
        assert_eq!(sc.last_tier_year(), 0);
    }

    #[test]
    fn test_bad_flat_rate_is_zero() {
        assert_eq!(GraduatedPenaltySchedule::flat(-4.0).flat_rate(), 0.0);
        assert_eq!(GraduatedPenaltySchedule::flat(f64::NAN).flat_rate(), 0.0);
        assert_eq!(GraduatedPenaltySchedule::default().rate_for_year(1), 0.0);
    }

    #[test]
    fn test_flat_rate_capped_at_principal() {
        assert_eq!(GraduatedPenaltySchedule::flat(150.0).flat_rate(), 100.0);
        assert_eq!(GraduatedPenaltySchedule::flat(100.0).flat_rate(), 100.0);
        assert_eq!(GraduatedPenaltySchedule::flat(f64::NEG_INFINITY).flat_rate(), 0.0);
        assert_eq!(schedule(&[(1, 5.0)], 250.0).rate_for_year(2), 100.0);
    }

    #[test]
    fn test_matured_is_always_zero() {
        let sc = schedule(&[(1, 10.0), (2, 5.0)], 7.0);
        let start = invested();
        for days in [0, 100, 400, 5000] {
            let now = start + Duration::days(days);
            assert_eq!(resolve_penalty_percentage(&sc, start, now, true, DPY), 0.0);
        }
    }

    #[test]
    fn test_resolve_uses_current_year() {
        let sc = schedule(&[(1, 8.0), (2, 5.0), (3, 3.0)], 0.0);
        let start = invested();
        let now = start + Duration::days(822); // ~2y3m
        assert_eq!(resolve_penalty_percentage(&sc, start, now, false, DPY), 3.0);
    }
}
