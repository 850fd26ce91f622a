//! Grouping engine: folds nested campaign records into one bucket per
//! distinct key, summing their counters.
//!
//! Keys are matched by exact label across campaigns; there is no shared
//! identity for devices, regions or weeks. Groups come back in first-seen
//! order and a key with no matching record never produces a group.

use crate::metrics::Totals;
use marketing_core::types::{
    Campaign, DemographicBreakdown, DevicePerformance, RegionalPerformance, WeeklyPerformance,
};
use std::collections::HashMap;

/// A record that contributes additive counters to a group.
pub trait Measured {
    fn totals(&self) -> Totals;
}

impl Measured for DevicePerformance {
    fn totals(&self) -> Totals {
        Totals {
            impressions: self.impressions,
            clicks: self.clicks,
            conversions: self.conversions,
            spend: self.spend,
            revenue: self.revenue,
        }
    }
}

impl Measured for RegionalPerformance {
    fn totals(&self) -> Totals {
        Totals {
            impressions: self.impressions,
            clicks: self.clicks,
            conversions: self.conversions,
            spend: self.spend,
            revenue: self.revenue,
        }
    }
}

impl Measured for WeeklyPerformance {
    fn totals(&self) -> Totals {
        Totals {
            impressions: self.impressions,
            clicks: self.clicks,
            conversions: self.conversions,
            spend: self.spend,
            revenue: self.revenue,
        }
    }
}

/// Demographic slices record no spend or revenue of their own; see
/// [`crate::estimation`] for the allocated figures.
impl Measured for DemographicBreakdown {
    fn totals(&self) -> Totals {
        Totals {
            impressions: self.performance.impressions,
            clicks: self.performance.clicks,
            conversions: self.performance.conversions,
            spend: 0.0,
            revenue: 0.0,
        }
    }
}

impl Measured for Campaign {
    fn totals(&self) -> Totals {
        Totals {
            impressions: self.impressions,
            clicks: self.clicks,
            conversions: self.conversions,
            spend: self.spend,
            revenue: self.revenue,
        }
    }
}

/// One aggregated bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a, E> {
    pub key: &'a str,
    /// First record seen for this key, for carrying through static attributes.
    pub first: &'a E,
    pub totals: Totals,
    pub records: usize,
}

/// Group the nested records of every campaign.
///
/// `entries` picks the sub-collection to walk for a campaign and `key`
/// extracts the grouping label, returning `None` to skip a record.
pub fn group_by<'a, E, I, F, K>(campaigns: &'a [Campaign], entries: F, key: K) -> Vec<Group<'a, E>>
where
    E: Measured + 'a,
    I: IntoIterator<Item = &'a E>,
    F: Fn(&'a Campaign) -> I,
    K: Fn(&'a E) -> Option<&'a str>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<Group<'a, E>> = Vec::new();

    for campaign in campaigns {
        for entry in entries(campaign) {
            let Some(label) = key(entry) else {
                continue;
            };
            let slot = *index.entry(label).or_insert_with(|| {
                groups.push(Group {
                    key: label,
                    first: entry,
                    totals: Totals::default(),
                    records: 0,
                });
                groups.len() - 1
            });
            let group = &mut groups[slot];
            group.totals += entry.totals();
            group.records += 1;
        }
    }

    groups
}

/// Sum of every record `entries` yields, without grouping.
pub fn total<'a, E, I, F>(campaigns: &'a [Campaign], entries: F) -> Totals
where
    E: Measured + 'a,
    I: IntoIterator<Item = &'a E>,
    F: Fn(&'a Campaign) -> I,
{
    campaigns
        .iter()
        .flat_map(entries)
        .map(Measured::totals)
        .sum()
}
