//! Sampling-frequency inference for annualisation

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Observation frequency of a return series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annual,
}

impl Frequency {
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Daily => 252,
            Frequency::Weekly => 52,
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
            Frequency::Annual => 1,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Annual => "annual",
        }
    }
}

/// Classify a date index by the median calendar-day gap between
/// consecutive dates. Weekends and holidays stretch daily gaps to 3–4 days,
/// so anything up to 4 days counts as daily. Fewer than two dates fall back
/// to daily.
#[must_use]
pub fn infer_frequency(dates: &[Date]) -> Frequency {
    let mut gaps: Vec<i32> = dates
        .windows(2)
        .map(|w| (w[1] - w[0]).get_days())
        .collect();
    if gaps.is_empty() {
        return Frequency::Daily;
    }
    gaps.sort_unstable();
    let median = gaps[gaps.len() / 2];

    match median {
        i32::MIN..=4 => Frequency::Daily,
        5..=10 => Frequency::Weekly,
        11..=45 => Frequency::Monthly,
        46..=135 => Frequency::Quarterly,
        _ => Frequency::Annual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::ToSpan;
    use jiff::civil::date;

    fn every(step: jiff::Span, n: usize) -> Vec<Date> {
        let mut d = date(2020, 1, 31);
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(d);
            d = d.saturating_add(step);
        }
        out
    }

    #[test]
    fn test_business_days_are_daily() {
        // Mon..Fri then Mon: gaps 1,1,1,1,3
        let dates: Vec<Date> = (6..=10)
            .chain(13..=17)
            .map(|d| date(2025, 1, d))
            .collect();
        assert_eq!(infer_frequency(&dates), Frequency::Daily);
        assert_eq!(infer_frequency(&dates).periods_per_year(), 252);
    }

    #[test]
    fn test_weekly_monthly_quarterly_annual() {
        assert_eq!(infer_frequency(&every(1.week(), 20)), Frequency::Weekly);
        assert_eq!(infer_frequency(&every(1.month(), 24)), Frequency::Monthly);
        assert_eq!(infer_frequency(&every(3.months(), 12)), Frequency::Quarterly);
        assert_eq!(infer_frequency(&every(1.year(), 8)), Frequency::Annual);
    }

    #[test]
    fn test_too_few_dates_default_daily() {
        assert_eq!(infer_frequency(&[]), Frequency::Daily);
        assert_eq!(infer_frequency(&[date(2024, 1, 1)]), Frequency::Daily);
    }
}
