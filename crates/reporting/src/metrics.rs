//! Rate metrics derived from raw counters.
//!
//! Every rate resolves to `0.0` when its denominator is zero.

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Additive counters summed during aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub spend: f64,
    pub revenue: f64,
}

impl Totals {
    pub fn rates(&self) -> RateMetrics {
        RateMetrics::from_totals(self)
    }
}

impl AddAssign for Totals {
    fn add_assign(&mut self, rhs: Self) {
        self.impressions += rhs.impressions;
        self.clicks += rhs.clicks;
        self.conversions += rhs.conversions;
        self.spend += rhs.spend;
        self.revenue += rhs.revenue;
    }
}

impl Add for Totals {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl Sum for Totals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RateMetrics {
    pub ctr: f64,
    pub conversion_rate: f64,
    pub cpc: f64,
    pub cpa: f64,
    pub roas: f64,
}

impl RateMetrics {
    pub fn from_totals(totals: &Totals) -> Self {
        Self {
            ctr: ctr(totals.clicks, totals.impressions),
            conversion_rate: conversion_rate(totals.conversions, totals.clicks),
            cpc: cpc(totals.spend, totals.clicks),
            cpa: cpa(totals.spend, totals.conversions),
            roas: roas(totals.revenue, totals.spend),
        }
    }
}

/// Click-through rate in percent.
pub fn ctr(clicks: u64, impressions: u64) -> f64 {
    if impressions > 0 {
        clicks as f64 / impressions as f64 * 100.0
    } else {
        0.0
    }
}

/// Conversions per click in percent.
pub fn conversion_rate(conversions: u64, clicks: u64) -> f64 {
    if clicks > 0 {
        conversions as f64 / clicks as f64 * 100.0
    } else {
        0.0
    }
}

pub fn cpc(spend: f64, clicks: u64) -> f64 {
    if clicks > 0 {
        spend / clicks as f64
    } else {
        0.0
    }
}

pub fn cpa(spend: f64, conversions: u64) -> f64 {
    if conversions > 0 {
        spend / conversions as f64
    } else {
        0.0
    }
}

pub fn roas(revenue: f64, spend: f64) -> f64 {
    if spend > 0.0 {
        revenue / spend
    } else {
        0.0
    }
}

/// Two-decimal percentage label, e.g. `5.50%`.
pub fn percent_label(value: f64) -> String {
    format!("{value:.2}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_from_counters() {
        let totals = Totals {
            impressions: 1000,
            clicks: 50,
            conversions: 5,
            spend: 250.0,
            revenue: 1000.0,
        };
        let rates = totals.rates();
        assert_eq!(rates.ctr, 5.0);
        assert_eq!(rates.conversion_rate, 10.0);
        assert_eq!(rates.cpc, 5.0);
        assert_eq!(rates.cpa, 50.0);
        assert_eq!(rates.roas, 4.0);
    }

    #[test]
    fn test_zero_denominators_yield_zero() {
        let rates = Totals::default().rates();
        assert_eq!(rates, RateMetrics::default());

        assert_eq!(ctr(10, 0), 0.0);
        assert_eq!(conversion_rate(3, 0), 0.0);
        assert_eq!(cpc(99.0, 0), 0.0);
        assert_eq!(cpa(99.0, 0), 0.0);
        assert_eq!(roas(500.0, 0.0), 0.0);
        assert!(!ctr(0, 0).is_nan());
    }

    #[test]
    fn test_totals_sum() {
        let a = Totals {
            impressions: 100,
            clicks: 10,
            conversions: 1,
            spend: 20.0,
            revenue: 60.0,
        };
        let b = Totals {
            impressions: 900,
            clicks: 45,
            conversions: 4,
            spend: 80.0,
            revenue: 140.0,
        };
        let total: Totals = [a, b].into_iter().sum();
        assert_eq!(total.impressions, 1000);
        assert_eq!(total.clicks, 55);
        assert_eq!(total.spend, 100.0);
        assert_eq!(total.rates().ctr, 5.5);
    }

    #[test]
    fn test_percent_label() {
        assert_eq!(percent_label(5.5), "5.50%");
        assert_eq!(percent_label(0.0), "0.00%");
        assert_eq!(percent_label(33.33333), "33.33%");
    }
}
