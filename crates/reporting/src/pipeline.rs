//! End-to-end view computation: snapshot → filter → aggregate → sort → export.
//!
//! Every run recomputes from the immutable snapshot; nothing is cached.

use crate::export::{export, ExportFormat};
use crate::filter::CampaignFilter;
use crate::table::{SortConfig, Table, TableRow};
use crate::views::{self, RegionCoordinates};
use marketing_core::types::{Campaign, MarketingData};
use marketing_core::{InsightsError, InsightsResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Campaigns,
    Devices,
    Mediums,
    Regions,
    /// Age groups of one gender.
    Male,
    Female,
    Weekly,
}

impl ViewKind {
    pub fn table(&self) -> Table {
        match self {
            ViewKind::Campaigns => views::campaign_table(),
            ViewKind::Devices => views::device_table(),
            ViewKind::Mediums => views::medium_table(),
            ViewKind::Regions => views::region_table(),
            ViewKind::Male | ViewKind::Female => views::age_group_table(),
            ViewKind::Weekly => views::weekly_table(),
        }
    }
}

impl FromStr for ViewKind {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "campaigns" | "campaign" => Ok(Self::Campaigns),
            "devices" | "device" => Ok(Self::Devices),
            "mediums" | "medium" => Ok(Self::Mediums),
            "regions" | "region" => Ok(Self::Regions),
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "weekly" | "weeks" => Ok(Self::Weekly),
            other => Err(InsightsError::UnknownView(other.to_string())),
        }
    }
}

/// What to show and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRequest {
    pub view: ViewKind,
    pub filter: CampaignFilter,
    /// Column header clicks, applied in order from the table's default sort.
    pub sort_clicks: Vec<String>,
    /// 0 means all rows.
    pub limit: usize,
    pub format: ExportFormat,
}

impl ViewRequest {
    pub fn new(view: ViewKind) -> Self {
        Self {
            view,
            filter: CampaignFilter::default(),
            sort_clicks: Vec::new(),
            limit: 0,
            format: ExportFormat::Table,
        }
    }
}

/// Resolve the sort state reached after replaying `clicks` on `table`.
pub fn resolve_sort(table: &Table, clicks: &[String]) -> InsightsResult<Option<SortConfig>> {
    let mut state = table.initial_state();
    for key in clicks {
        if table.column(key).is_none() {
            return Err(InsightsError::UnknownColumn(key.clone()));
        }
        state = table.click(state.as_ref(), key);
    }
    Ok(state)
}

fn arrange_and_export<R: TableRow + Clone>(
    table: &Table,
    rows: &[R],
    request: &ViewRequest,
) -> InsightsResult<String> {
    let state = resolve_sort(table, &request.sort_clicks)?;
    let mut ordered = table.arrange(rows, state.as_ref());
    if request.limit > 0 {
        ordered.truncate(request.limit);
    }
    export(table, &ordered, request.format)
}

/// Compute one view from `data` and render it.
pub fn render_view(
    data: &MarketingData,
    coordinates: &RegionCoordinates,
    request: &ViewRequest,
) -> InsightsResult<String> {
    let campaigns: Vec<Campaign> = request.filter.apply(&data.campaigns);
    info!(
        view = ?request.view,
        shown = campaigns.len(),
        total = data.campaigns.len(),
        "Rendering view"
    );

    let table = request.view.table();
    match request.view {
        ViewKind::Campaigns => arrange_and_export(&table, &campaigns, request),
        ViewKind::Devices => arrange_and_export(&table, &views::by_device(&campaigns), request),
        ViewKind::Mediums => arrange_and_export(&table, &views::by_medium(&campaigns), request),
        ViewKind::Regions => arrange_and_export(
            &table,
            &views::by_region(&campaigns, coordinates),
            request,
        ),
        ViewKind::Male => arrange_and_export(
            &table,
            &views::by_age_group(&campaigns, crate::estimation::Gender::Male),
            request,
        ),
        ViewKind::Female => arrange_and_export(
            &table,
            &views::by_age_group(&campaigns, crate::estimation::Gender::Female),
            request,
        ),
        ViewKind::Weekly => arrange_and_export(&table, &views::by_week(&campaigns), request),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SortDirection;
    use marketing_core::types::DevicePerformance;

    fn dataset() -> MarketingData {
        let device = |name: &str, revenue: f64| DevicePerformance {
            device: name.into(),
            revenue,
            ..Default::default()
        };
        MarketingData {
            campaigns: vec![
                Campaign {
                    id: 1,
                    name: "Summer Sale".into(),
                    objective: "Sales".into(),
                    medium: "Social".into(),
                    revenue: 300.0,
                    device_performance: vec![device("Mobile", 200.0), device("Desktop", 100.0)],
                    ..Default::default()
                },
                Campaign {
                    id: 2,
                    name: "Brand Lift".into(),
                    objective: "Awareness".into(),
                    medium: "Video".into(),
                    revenue: 900.0,
                    device_performance: vec![device("Tablet", 900.0)],
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_view_kind_parse() {
        assert_eq!("Regions".parse::<ViewKind>().unwrap(), ViewKind::Regions);
        assert!(matches!(
            "funnels".parse::<ViewKind>(),
            Err(InsightsError::UnknownView(_))
        ));
    }

    #[test]
    fn test_resolve_sort_from_default() {
        let table = views::device_table();
        assert_eq!(
            resolve_sort(&table, &[]).unwrap(),
            Some(SortConfig::new("revenue", SortDirection::Descending))
        );
        assert_eq!(resolve_sort(&table, &["revenue".into()]).unwrap(), None);
        assert_eq!(
            resolve_sort(&table, &["device".into()]).unwrap(),
            Some(SortConfig::new("device", SortDirection::Ascending))
        );
        assert!(matches!(
            resolve_sort(&table, &["bogus".into()]),
            Err(InsightsError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_filtered_device_view_as_csv() {
        let mut request = ViewRequest::new(ViewKind::Devices);
        request.filter.objectives.insert("Sales".into());
        request.format = ExportFormat::Csv;

        let csv = render_view(&dataset(), &RegionCoordinates::default(), &request).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("\"Mobile\",200"));
        assert!(lines[2].starts_with("\"Desktop\",100"));
    }

    #[test]
    fn test_limit_truncates_after_sort() {
        let mut request = ViewRequest::new(ViewKind::Campaigns);
        request.limit = 1;
        request.format = ExportFormat::Json;

        let json = render_view(&dataset(), &RegionCoordinates::default(), &request).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["name"], "Brand Lift");
    }

    #[test]
    fn test_medium_view_follows_filter() {
        let mut request = ViewRequest::new("mediums".parse().unwrap());
        request.format = ExportFormat::Csv;
        let csv = render_view(&dataset(), &RegionCoordinates::default(), &request).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "medium,campaigns,revenue,spend,conversions,roas");
        assert!(lines[1].starts_with("\"Video\",1,900"));
        assert!(lines[2].starts_with("\"Social\",1,300"));

        request.filter.name = "summer".into();
        let csv = render_view(&dataset(), &RegionCoordinates::default(), &request).unwrap();
        assert_eq!(csv.lines().count(), 2);
    }
}
