//! Campaign overview figures: headline totals for a (possibly filtered)
//! set of campaigns.

use crate::aggregation::Measured;
use crate::metrics::{RateMetrics, Totals};
use marketing_core::types::Campaign;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueBar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignOverview {
    pub shown: usize,
    pub total: usize,
    pub total_spend: f64,
    pub total_revenue: f64,
    pub total_conversions: u64,
    /// Portfolio totals with rates recomputed from the summed counters.
    pub totals: Totals,
    pub rates: RateMetrics,
}

/// Summarise `filtered` against the size of the unfiltered collection.
pub fn overview(filtered: &[Campaign], total: usize) -> CampaignOverview {
    let totals: Totals = filtered.iter().map(Measured::totals).sum();
    CampaignOverview {
        shown: filtered.len(),
        total,
        total_spend: totals.spend,
        total_revenue: totals.revenue,
        total_conversions: totals.conversions,
        rates: totals.rates(),
        totals,
    }
}

/// Short chart label: the part of the name before the first ` - `.
pub fn short_label(name: &str) -> &str {
    name.split(" - ").next().unwrap_or(name)
}

/// The first `n` campaigns in their current order, as revenue bars.
pub fn revenue_bars(campaigns: &[Campaign], n: usize) -> Vec<RevenueBar> {
    campaigns
        .iter()
        .take(n)
        .map(|c| RevenueBar {
            label: short_label(&c.name).to_string(),
            value: c.revenue,
        })
        .collect()
}

/// The `n` highest-revenue campaigns; ties keep input order.
pub fn top_by_revenue(campaigns: &[Campaign], n: usize) -> Vec<Campaign> {
    let mut ranked: Vec<&Campaign> = campaigns.iter().collect();
    ranked.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    ranked.into_iter().take(n).cloned().collect()
}
