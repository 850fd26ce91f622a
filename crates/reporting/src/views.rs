//! Per-view aggregates built on [`crate::aggregation::group_by`].
//!
//! Each view sums counters per key and derives its rates from those sums.
//! The embedded per-campaign rates of devices and regions are never read.

use crate::aggregation::{group_by, Group};
use crate::estimation::Gender;
use crate::metrics::{percent_label, RateMetrics, Totals};
use crate::table::{CellFormat, CellValue, Column, ColumnType, SortConfig, SortDirection, Table, TableRow};
use chrono::NaiveDate;
use marketing_core::types::{Campaign, GeoPoint};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

// ─── Region coordinates ─────────────────────────────────────────────────────

/// Region name to map position. Unknown regions resolve to (0, 0).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionCoordinates(HashMap<String, GeoPoint>);

impl RegionCoordinates {
    pub fn lookup(&self, region: &str) -> GeoPoint {
        self.0.get(region).copied().unwrap_or_default()
    }
}

impl FromIterator<(String, GeoPoint)> for RegionCoordinates {
    fn from_iter<T: IntoIterator<Item = (String, GeoPoint)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ─── Row types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRow {
    pub device: String,
    #[serde(flatten)]
    pub totals: Totals,
    #[serde(flatten)]
    pub rates: RateMetrics,
}

/// Campaign-level totals of one advertising medium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediumRow {
    pub medium: String,
    pub campaigns: usize,
    #[serde(flatten)]
    pub totals: Totals,
    #[serde(flatten)]
    pub rates: RateMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRow {
    pub region: String,
    pub country: String,
    #[serde(flatten)]
    pub location: GeoPoint,
    #[serde(flatten)]
    pub totals: Totals,
    #[serde(flatten)]
    pub rates: RateMetrics,
}

/// Demographic performance of one age group within one gender. Spend and
/// revenue are not tracked per slice, so only funnel counters appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeGroupRow {
    pub age_group: String,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub ctr: f64,
    pub conversion_rate: f64,
    pub ctr_label: String,
    pub conversion_rate_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderBreakdown {
    pub male: Vec<AgeGroupRow>,
    pub female: Vec<AgeGroupRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRow {
    pub week_start: String,
    /// Calendar date of `week_start`; `None` when the label does not parse.
    pub week_start_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub totals: Totals,
}

// ─── Aggregations ───────────────────────────────────────────────────────────

fn by_revenue_desc(a: &Totals, b: &Totals) -> Ordering {
    b.revenue.total_cmp(&a.revenue)
}

/// Device performance across all campaigns, highest revenue first.
pub fn by_device(campaigns: &[Campaign]) -> Vec<DeviceRow> {
    let groups = group_by(
        campaigns,
        |c| &c.device_performance,
        |d| Some(d.device.as_str()),
    );

    let mut rows: Vec<DeviceRow> = groups
        .into_iter()
        .map(|g| DeviceRow {
            device: g.key.to_string(),
            rates: g.totals.rates(),
            totals: g.totals,
        })
        .collect();
    rows.sort_by(|a, b| by_revenue_desc(&a.totals, &b.totals));

    debug!(devices = rows.len(), "Device view aggregated");
    rows
}

/// Campaign totals per medium, highest revenue first.
pub fn by_medium(campaigns: &[Campaign]) -> Vec<MediumRow> {
    let groups = group_by(campaigns, std::iter::once, |c| Some(c.medium.as_str()));

    let mut rows: Vec<MediumRow> = groups
        .into_iter()
        .map(|g| MediumRow {
            medium: g.key.to_string(),
            campaigns: g.records,
            rates: g.totals.rates(),
            totals: g.totals,
        })
        .collect();
    rows.sort_by(|a, b| by_revenue_desc(&a.totals, &b.totals));

    debug!(mediums = rows.len(), "Medium view aggregated");
    rows
}

/// Regional performance across all campaigns, highest revenue first.
/// The country is taken from the first record seen for each region.
pub fn by_region(campaigns: &[Campaign], coordinates: &RegionCoordinates) -> Vec<RegionRow> {
    let groups = group_by(
        campaigns,
        |c| &c.regional_performance,
        |r| Some(r.region.as_str()),
    );

    let mut rows: Vec<RegionRow> = groups
        .into_iter()
        .map(|g| RegionRow {
            region: g.key.to_string(),
            country: g.first.country.clone(),
            location: coordinates.lookup(g.key),
            rates: g.totals.rates(),
            totals: g.totals,
        })
        .collect();
    rows.sort_by(|a, b| by_revenue_desc(&a.totals, &b.totals));

    debug!(regions = rows.len(), "Region view aggregated");
    rows
}

fn age_group_row(group: Group<'_, marketing_core::types::DemographicBreakdown>) -> AgeGroupRow {
    let rates = group.totals.rates();
    AgeGroupRow {
        age_group: group.key.to_string(),
        impressions: group.totals.impressions,
        clicks: group.totals.clicks,
        conversions: group.totals.conversions,
        ctr: rates.ctr,
        conversion_rate: rates.conversion_rate,
        ctr_label: percent_label(rates.ctr),
        conversion_rate_label: percent_label(rates.conversion_rate),
    }
}

/// Age-group performance for one gender, ordered by age label.
pub fn by_age_group(campaigns: &[Campaign], gender: Gender) -> Vec<AgeGroupRow> {
    let groups = group_by(
        campaigns,
        |c| &c.demographic_breakdown,
        |d| gender.matches(&d.gender).then_some(d.age_group.as_str()),
    );

    let mut rows: Vec<AgeGroupRow> = groups.into_iter().map(age_group_row).collect();
    rows.sort_by(|a, b| a.age_group.cmp(&b.age_group));
    rows
}

/// Independent age-group aggregations for each gender.
pub fn by_gender_and_age(campaigns: &[Campaign]) -> GenderBreakdown {
    GenderBreakdown {
        male: by_age_group(campaigns, Gender::Male),
        female: by_age_group(campaigns, Gender::Female),
    }
}

/// Parse the date part of a week label.
pub fn parse_week_start(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim().get(..10)?, "%Y-%m-%d").ok()
}

/// Weekly totals across all campaigns, in calendar order. Labels that are
/// not dates follow every dated week, by label.
pub fn by_week(campaigns: &[Campaign]) -> Vec<WeeklyRow> {
    let groups = group_by(
        campaigns,
        |c| &c.weekly_performance,
        |w| Some(w.week_start.as_str()),
    );

    let mut rows: Vec<WeeklyRow> = groups
        .into_iter()
        .map(|g| WeeklyRow {
            week_start: g.key.to_string(),
            week_start_date: parse_week_start(g.key),
            totals: g.totals,
        })
        .collect();
    rows.sort_by(|a, b| match (a.week_start_date, b.week_start_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.week_start.cmp(&b.week_start),
    });

    debug!(weeks = rows.len(), "Weekly view aggregated");
    rows
}

// ─── Table rows ─────────────────────────────────────────────────────────────

fn totals_cell(totals: &Totals, key: &str) -> CellValue {
    match key {
        "impressions" => totals.impressions.into(),
        "clicks" => totals.clicks.into(),
        "conversions" => totals.conversions.into(),
        "spend" => totals.spend.into(),
        "revenue" => totals.revenue.into(),
        _ => CellValue::Missing,
    }
}

fn rates_cell(rates: &RateMetrics, key: &str) -> CellValue {
    match key {
        "ctr" => rates.ctr.into(),
        "conversion_rate" => rates.conversion_rate.into(),
        "cpc" => rates.cpc.into(),
        "cpa" => rates.cpa.into(),
        "roas" => rates.roas.into(),
        _ => CellValue::Missing,
    }
}

impl TableRow for DeviceRow {
    fn cell(&self, key: &str) -> CellValue {
        match key {
            "device" => CellValue::text(&self.device),
            _ => match totals_cell(&self.totals, key) {
                CellValue::Missing => rates_cell(&self.rates, key),
                value => value,
            },
        }
    }
}

impl TableRow for MediumRow {
    fn cell(&self, key: &str) -> CellValue {
        match key {
            "medium" => CellValue::text(&self.medium),
            "campaigns" => (self.campaigns as u64).into(),
            _ => match totals_cell(&self.totals, key) {
                CellValue::Missing => rates_cell(&self.rates, key),
                value => value,
            },
        }
    }
}

impl TableRow for RegionRow {
    fn cell(&self, key: &str) -> CellValue {
        match key {
            "region" => CellValue::text(&self.region),
            "country" => CellValue::text(&self.country),
            "lat" => self.location.lat.into(),
            "lng" => self.location.lng.into(),
            _ => match totals_cell(&self.totals, key) {
                CellValue::Missing => rates_cell(&self.rates, key),
                value => value,
            },
        }
    }
}

impl TableRow for AgeGroupRow {
    fn cell(&self, key: &str) -> CellValue {
        match key {
            "age_group" => CellValue::text(&self.age_group),
            "impressions" => self.impressions.into(),
            "clicks" => self.clicks.into(),
            "conversions" => self.conversions.into(),
            "ctr" => self.ctr.into(),
            "conversion_rate" => self.conversion_rate.into(),
            _ => CellValue::Missing,
        }
    }
}

impl TableRow for WeeklyRow {
    fn cell(&self, key: &str) -> CellValue {
        match key {
            "week_start" => match self.week_start_date {
                Some(date) => date.into(),
                None => CellValue::text(&self.week_start),
            },
            _ => totals_cell(&self.totals, key),
        }
    }
}

impl TableRow for Campaign {
    fn cell(&self, key: &str) -> CellValue {
        match key {
            "name" => CellValue::text(&self.name),
            "status" => CellValue::text(&self.status),
            "objective" => CellValue::text(&self.objective),
            "medium" => CellValue::text(&self.medium),
            "format" => CellValue::text(&self.format),
            "product_category" => CellValue::text(&self.product_category),
            "budget" => self.budget.into(),
            "spend" => self.spend.into(),
            "revenue" => self.revenue.into(),
            "impressions" => self.impressions.into(),
            "clicks" => self.clicks.into(),
            "conversions" => self.conversions.into(),
            "ctr" => self.ctr.into(),
            "conversion_rate" => self.conversion_rate.into(),
            "cpc" => self.cpc.into(),
            "cpa" => self.cpa.into(),
            "roas" => self.roas.into(),
            _ => CellValue::Missing,
        }
    }
}

// ─── Standard tables ────────────────────────────────────────────────────────

fn revenue_desc() -> SortConfig {
    SortConfig::new("revenue", SortDirection::Descending)
}

pub fn campaign_table() -> Table {
    Table::new(vec![
        Column::new("name", "Campaign").sortable(ColumnType::String),
        Column::new("objective", "Type").sortable(ColumnType::String),
        Column::new("status", "Status").sortable(ColumnType::String),
        Column::new("medium", "Medium"),
        Column::numeric("budget", "Budget", CellFormat::Currency),
        Column::numeric("spend", "Spend", CellFormat::Currency),
        Column::numeric("revenue", "Revenue", CellFormat::Currency),
        Column::numeric("conversions", "Conversions", CellFormat::Integer),
        Column::numeric("roas", "ROAS", CellFormat::Multiplier),
    ])
    .with_default_sort(revenue_desc())
}

pub fn device_table() -> Table {
    Table::new(vec![
        Column::new("device", "Device").sortable(ColumnType::String),
        Column::numeric("revenue", "Revenue", CellFormat::Currency),
        Column::numeric("spend", "Spend", CellFormat::Currency),
        Column::numeric("conversions", "Conversions", CellFormat::Integer),
        Column::numeric("clicks", "Clicks", CellFormat::Integer),
        Column::numeric("impressions", "Impressions", CellFormat::Integer),
        Column::numeric("ctr", "CTR", CellFormat::Percent),
        Column::numeric("conversion_rate", "CVR", CellFormat::Percent),
    ])
    .with_default_sort(revenue_desc())
}

pub fn medium_table() -> Table {
    Table::new(vec![
        Column::new("medium", "Medium").sortable(ColumnType::String),
        Column::numeric("campaigns", "Campaigns", CellFormat::Integer),
        Column::numeric("revenue", "Revenue", CellFormat::Currency),
        Column::numeric("spend", "Spend", CellFormat::Currency),
        Column::numeric("conversions", "Conversions", CellFormat::Integer),
        Column::numeric("roas", "ROAS", CellFormat::Multiplier),
    ])
    .with_default_sort(revenue_desc())
}

pub fn region_table() -> Table {
    Table::new(vec![
        Column::new("region", "Region").sortable(ColumnType::String),
        Column::new("country", "Country").sortable(ColumnType::String),
        Column::numeric("revenue", "Revenue", CellFormat::Currency),
        Column::numeric("spend", "Spend", CellFormat::Currency),
        Column::numeric("roas", "ROAS", CellFormat::Multiplier),
        Column::numeric("conversions", "Conversions", CellFormat::Integer),
        Column::numeric("clicks", "Clicks", CellFormat::Integer),
    ])
    .with_default_sort(revenue_desc())
}

pub fn age_group_table() -> Table {
    Table::new(vec![
        Column::new("age_group", "Age Group").sortable(ColumnType::String),
        Column::numeric("impressions", "Impressions", CellFormat::Integer),
        Column::numeric("clicks", "Clicks", CellFormat::Integer),
        Column::numeric("conversions", "Conversions", CellFormat::Integer),
        Column::numeric("ctr", "CTR", CellFormat::Percent),
        Column::numeric("conversion_rate", "CVR", CellFormat::Percent),
    ])
    .with_default_sort(SortConfig::new("age_group", SortDirection::Ascending))
}

pub fn weekly_table() -> Table {
    Table::new(vec![
        Column::new("week_start", "Week")
            .sortable(ColumnType::Date)
            .format(CellFormat::Date),
        Column::numeric("impressions", "Impressions", CellFormat::Integer),
        Column::numeric("clicks", "Clicks", CellFormat::Integer),
        Column::numeric("conversions", "Conversions", CellFormat::Integer),
        Column::numeric("spend", "Spend", CellFormat::Currency),
        Column::numeric("revenue", "Revenue", CellFormat::Currency),
    ])
    .with_default_sort(SortConfig::new("week_start", SortDirection::Ascending))
}
