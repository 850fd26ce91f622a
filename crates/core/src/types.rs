use serde::{Deserialize, Deserializer, Serialize};

/// Full marketing-performance snapshot as delivered by the data endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketingData {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub company_info: CompanyInfo,
    #[serde(default)]
    pub marketing_stats: MarketingStats,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub campaigns: Vec<Campaign>,
    #[serde(default)]
    pub market_insights: MarketInsights,
    #[serde(default)]
    pub filters: AvailableFilters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyInfo {
    pub name: String,
    pub founded: String,
    pub headquarters: String,
    pub industry: String,
    pub description: String,
}

/// Headline figures precomputed by the source. Display only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketingStats {
    pub total_campaigns: u64,
    pub active_campaigns: u64,
    pub total_spend: f64,
    pub total_revenue: f64,
    pub total_conversions: u64,
    pub average_roas: f64,
    pub top_performing_medium: String,
    pub top_performing_region: String,
    pub total_impressions: u64,
    pub total_clicks: u64,
    pub average_ctr: f64,
    pub average_conversion_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketInsights {
    pub last_updated: String,
    pub peak_performance_day: String,
    pub peak_performance_time: String,
    pub top_converting_product: String,
    pub fastest_growing_region: String,
}

/// Option lists the source advertises for its filter controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailableFilters {
    pub available_statuses: Vec<String>,
    pub available_objectives: Vec<String>,
    pub available_mediums: Vec<String>,
    pub available_formats: Vec<String>,
    pub available_product_categories: Vec<String>,
    pub available_regions: Vec<String>,
}

/// A single campaign with its nested breakdowns.
///
/// The campaign-level rate fields (`ctr`, `roas`, ...) are carried for
/// single-campaign display. Cross-campaign aggregates recompute rates from
/// summed counters and never read them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub product_category: String,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub budget_utilization: f64,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub conversions: u64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub average_order_value: f64,
    #[serde(default)]
    pub ctr: f64,
    #[serde(default)]
    pub conversion_rate: f64,
    #[serde(default)]
    pub cpc: f64,
    #[serde(default)]
    pub cpa: f64,
    #[serde(default)]
    pub roas: f64,
    #[serde(default)]
    pub target_demographics: TargetDemographics,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub demographic_breakdown: Vec<DemographicBreakdown>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub device_performance: Vec<DevicePerformance>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub weekly_performance: Vec<WeeklyPerformance>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub regional_performance: Vec<RegionalPerformance>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub creatives: Vec<Creative>,
    #[serde(default)]
    pub timeline: Timeline,
    #[serde(default)]
    pub targeting: Targeting,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetDemographics {
    pub age_groups: Vec<String>,
    pub genders: Vec<String>,
    pub primary_device: String,
}

/// Audience slice of one campaign. `percentage_of_audience` is relative to
/// the parent campaign and the slices of a campaign need not sum to 100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemographicBreakdown {
    pub age_group: String,
    pub gender: String,
    #[serde(default)]
    pub percentage_of_audience: f64,
    #[serde(default)]
    pub performance: DemographicPerformance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemographicPerformance {
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub ctr: f64,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevicePerformance {
    pub device: String,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub conversions: u64,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub ctr: f64,
    #[serde(default)]
    pub conversion_rate: f64,
    #[serde(default)]
    pub percentage_of_traffic: f64,
}

/// One ISO week of a campaign. Dates are kept as delivered (`YYYY-MM-DD`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPerformance {
    pub week_start: String,
    #[serde(default)]
    pub week_end: String,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub conversions: u64,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionalPerformance {
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub conversions: u64,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub ctr: f64,
    #[serde(default)]
    pub conversion_rate: f64,
    #[serde(default)]
    pub cpc: f64,
    #[serde(default)]
    pub cpa: f64,
    #[serde(default)]
    pub roas: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Creative {
    pub id: u64,
    pub name: String,
    pub format: String,
    pub url: String,
    pub performance_score: f64,
    pub is_primary: bool,
    pub impressions: u64,
    pub clicks: u64,
    pub ctr: f64,
    pub a_b_test_variant: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeline {
    pub start_date: String,
    pub created_date: String,
    pub last_updated: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Targeting {
    pub regions: Vec<String>,
    pub interests: Vec<String>,
    pub behaviors: Vec<String>,
    pub custom_audiences: Vec<String>,
}

/// Latitude/longitude pair used by the map view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Treats an explicit `null` collection the same as an absent one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_collections_default_to_empty() {
        let json = r#"{"id": 7, "name": "Ramadan Push", "spend": 1200.5, "clicks": 40}"#;
        let campaign: Campaign = serde_json::from_str(json).unwrap();
        assert_eq!(campaign.id, 7);
        assert!(campaign.device_performance.is_empty());
        assert!(campaign.demographic_breakdown.is_empty());
        assert!(campaign.weekly_performance.is_empty());
        assert!(campaign.regional_performance.is_empty());
        assert_eq!(campaign.clicks, 40);
        assert_eq!(campaign.impressions, 0);
    }

    #[test]
    fn test_null_collections_read_as_empty() {
        let json = r#"{
            "id": 9,
            "name": "Flash Friday",
            "device_performance": null,
            "regional_performance": null,
            "weekly_performance": [{"week_start": "2024-06-03", "clicks": 4}],
            "demographic_breakdown": null,
            "creatives": null
        }"#;
        let campaign: Campaign = serde_json::from_str(json).unwrap();
        assert!(campaign.device_performance.is_empty());
        assert!(campaign.regional_performance.is_empty());
        assert!(campaign.demographic_breakdown.is_empty());
        assert!(campaign.creatives.is_empty());
        assert_eq!(campaign.weekly_performance[0].clicks, 4);

        let data: MarketingData = serde_json::from_str(r#"{"campaigns": null}"#).unwrap();
        assert!(data.campaigns.is_empty());
    }

    #[test]
    fn test_dataset_parses_nested_breakdowns() {
        let json = r#"{
            "message": "ok",
            "campaigns": [{
                "id": 1,
                "name": "Summer Sale",
                "objective": "Sales",
                "device_performance": [
                    {"device": "Mobile", "impressions": 100, "clicks": 10, "conversions": 1, "spend": 50.0, "revenue": 200.0}
                ],
                "demographic_breakdown": [
                    {"age_group": "25-34", "gender": "Female", "percentage_of_audience": 30.0,
                     "performance": {"impressions": 30, "clicks": 3, "conversions": 1}}
                ]
            }]
        }"#;
        let data: MarketingData = serde_json::from_str(json).unwrap();
        assert_eq!(data.campaigns.len(), 1);
        let campaign = &data.campaigns[0];
        assert_eq!(campaign.device_performance[0].device, "Mobile");
        assert_eq!(campaign.demographic_breakdown[0].performance.clicks, 3);
        assert!(data.filters.available_objectives.is_empty());
    }
}
