//! Weighted estimation of segment spend and revenue.
//!
//! The dataset records spend and revenue per campaign only. A demographic
//! slice is allocated its share as `campaign_total * percentage / 100`.
//! These figures are heuristics and are kept in [`EstimatedTotals`], apart
//! from the measured [`crate::metrics::Totals`].

use marketing_core::types::{Campaign, DemographicBreakdown};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::AddAssign;
use tracing::debug;

/// Allocate `percentage` percent of `total`.
pub fn allocate(total: f64, percentage: f64) -> f64 {
    total * (percentage / 100.0)
}

/// Spend and revenue allocated to a segment by audience share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatedTotals {
    pub estimated_spend: f64,
    pub estimated_revenue: f64,
}

impl EstimatedTotals {
    pub fn for_segment(campaign: &Campaign, segment: &DemographicBreakdown) -> Self {
        Self {
            estimated_spend: allocate(campaign.spend, segment.percentage_of_audience),
            estimated_revenue: allocate(campaign.revenue, segment.percentage_of_audience),
        }
    }
}

impl AddAssign for EstimatedTotals {
    fn add_assign(&mut self, rhs: Self) {
        self.estimated_spend += rhs.estimated_spend;
        self.estimated_revenue += rhs.estimated_revenue;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    /// Case-insensitive match against a dataset label.
    pub fn matches(&self, label: &str) -> bool {
        label.trim().eq_ignore_ascii_case(self.label())
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.matches(label))
    }
}

/// Measured clicks plus allocated spend and revenue for one gender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenderSegment {
    pub clicks: u64,
    #[serde(flatten)]
    pub estimated: EstimatedTotals,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenderSummary {
    pub male: GenderSegment,
    pub female: GenderSegment,
}

impl GenderSummary {
    pub fn get(&self, gender: Gender) -> &GenderSegment {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }

    fn get_mut(&mut self, gender: Gender) -> &mut GenderSegment {
        match gender {
            Gender::Male => &mut self.male,
            Gender::Female => &mut self.female,
        }
    }
}

/// Accumulate clicks and estimated spend/revenue per gender across every
/// campaign. Slices with any other gender label are ignored.
pub fn gender_summary(campaigns: &[Campaign]) -> GenderSummary {
    let mut summary = GenderSummary::default();
    let mut ignored = 0usize;

    for campaign in campaigns {
        for segment in &campaign.demographic_breakdown {
            let Some(gender) = Gender::parse(&segment.gender) else {
                ignored += 1;
                continue;
            };
            let slot = summary.get_mut(gender);
            slot.clicks += segment.performance.clicks;
            slot.estimated += EstimatedTotals::for_segment(campaign, segment);
        }
    }

    if ignored > 0 {
        debug!(ignored, "Demographic slices with unrecognised gender skipped");
    }
    summary
}

/// Estimated spend and revenue for one age group, all genders combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeGroupEstimate {
    pub age_group: String,
    #[serde(flatten)]
    pub estimated: EstimatedTotals,
}

/// Allocated spend and revenue per age group, ordered by age label.
pub fn age_group_estimates(campaigns: &[Campaign]) -> Vec<AgeGroupEstimate> {
    let mut by_age: BTreeMap<&str, EstimatedTotals> = BTreeMap::new();

    for campaign in campaigns {
        for segment in &campaign.demographic_breakdown {
            *by_age.entry(segment.age_group.as_str()).or_default() +=
                EstimatedTotals::for_segment(campaign, segment);
        }
    }

    by_age
        .into_iter()
        .map(|(age_group, estimated)| AgeGroupEstimate {
            age_group: age_group.to_string(),
            estimated,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketing_core::types::DemographicPerformance;

    fn segment(age: &str, gender: &str, pct: f64, clicks: u64) -> DemographicBreakdown {
        DemographicBreakdown {
            age_group: age.into(),
            gender: gender.into(),
            percentage_of_audience: pct,
            performance: DemographicPerformance {
                clicks,
                ..Default::default()
            },
        }
    }

    fn campaign(spend: f64, revenue: f64, segments: Vec<DemographicBreakdown>) -> Campaign {
        Campaign {
            spend,
            revenue,
            demographic_breakdown: segments,
            ..Default::default()
        }
    }

    #[test]
    fn test_allocate_quarter() {
        assert_eq!(allocate(1000.0, 25.0), 250.0);
        assert_eq!(allocate(1000.0, 0.0), 0.0);
    }

    #[test]
    fn test_estimates_accumulate_across_campaigns() {
        let one = campaign(1000.0, 4000.0, vec![segment("25-34", "Male", 25.0, 12)]);
        let summary = gender_summary(std::slice::from_ref(&one));
        assert_eq!(summary.male.estimated.estimated_spend, 250.0);
        assert_eq!(summary.male.estimated.estimated_revenue, 1000.0);

        let summary = gender_summary(&[one.clone(), one]);
        assert_eq!(summary.male.estimated.estimated_spend, 500.0);
        assert_eq!(summary.male.clicks, 24);
        assert_eq!(summary.female, GenderSegment::default());
    }

    #[test]
    fn test_gender_match_is_case_insensitive() {
        let campaigns = vec![campaign(
            200.0,
            0.0,
            vec![
                segment("18-24", "female", 50.0, 3),
                segment("18-24", "FEMALE", 10.0, 1),
                segment("18-24", "Non-binary", 40.0, 9),
            ],
        )];
        let summary = gender_summary(&campaigns);
        assert_eq!(summary.female.clicks, 4);
        assert_eq!(summary.female.estimated.estimated_spend, 120.0);
        assert_eq!(summary.male.clicks, 0);
    }

    #[test]
    fn test_incomplete_audience_shares_are_not_normalised() {
        let campaigns = vec![campaign(
            1000.0,
            1000.0,
            vec![segment("25-34", "Male", 30.0, 0), segment("35-44", "Female", 20.0, 0)],
        )];
        let summary = gender_summary(&campaigns);
        let allocated = summary.male.estimated.estimated_spend + summary.female.estimated.estimated_spend;
        assert_eq!(allocated, 500.0);
    }

    #[test]
    fn test_age_group_estimates_sorted_by_label() {
        let campaigns = vec![
            campaign(
                1000.0,
                2000.0,
                vec![
                    segment("35-44", "Male", 10.0, 0),
                    segment("18-24", "Female", 20.0, 0),
                ],
            ),
            campaign(500.0, 500.0, vec![segment("18-24", "Male", 40.0, 0)]),
        ];
        let rows = age_group_estimates(&campaigns);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].age_group, "18-24");
        assert_eq!(rows[0].estimated.estimated_spend, 400.0);
        assert_eq!(rows[0].estimated.estimated_revenue, 600.0);
        assert_eq!(rows[1].age_group, "35-44");
        assert_eq!(rows[1].estimated.estimated_spend, 100.0);
    }
}
