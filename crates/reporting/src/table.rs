//! Generic table model: typed columns, cell formatting and sorting.
//!
//! Rows expose their cells by column key through [`TableRow`]; the column's
//! declared [`ColumnType`] decides how two cells compare.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ─── Types ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Date,
}

/// Raw value of one cell before formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Missing,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Missing => String::new(),
        }
    }

    /// Numeric view; anything non-numeric coerces to zero.
    fn as_number(&self) -> f64 {
        let n = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            CellValue::Date(d) => date_millis(*d).map_or(0.0, |ms| ms as f64),
            CellValue::Missing => 0.0,
        };
        if n.is_nan() {
            0.0
        } else {
            n
        }
    }

    /// Milliseconds since the epoch, `None` when the value is not a date.
    fn as_instant(&self) -> Option<i64> {
        match self {
            CellValue::Date(d) => date_millis(*d),
            CellValue::Text(s) => parse_instant(s),
            CellValue::Number(n) if n.is_finite() => Some(*n as i64),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u64> for CellValue {
    fn from(value: u64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

fn date_millis(date: NaiveDate) -> Option<i64> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` or RFC 3339 into epoch millis.
pub fn parse_instant(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(date_millis)
}

/// A row whose cells can be looked up by column key.
pub trait TableRow {
    fn cell(&self, key: &str) -> CellValue;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellFormat {
    #[default]
    Plain,
    /// Rounded, thousands separated.
    Integer,
    /// `$1,234.56`
    Currency,
    /// `12.34%`
    Percent,
    /// `2.50x`
    Multiplier,
    /// `YYYY-MM-DD`
    Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub key: String,
    pub header: String,
    pub align: Align,
    pub sortable: bool,
    pub column_type: ColumnType,
    pub format: CellFormat,
}

impl Column {
    /// A left-aligned, unsortable text column.
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            align: Align::Left,
            sortable: false,
            column_type: ColumnType::String,
            format: CellFormat::Plain,
        }
    }

    pub fn sortable(mut self, column_type: ColumnType) -> Self {
        self.sortable = true;
        self.column_type = column_type;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn format(mut self, format: CellFormat) -> Self {
        self.format = format;
        self
    }

    /// Right-aligned sortable numeric column.
    pub fn numeric(key: impl Into<String>, header: impl Into<String>, format: CellFormat) -> Self {
        Self::new(key, header)
            .sortable(ColumnType::Number)
            .align(Align::Right)
            .format(format)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

/// Active sort. `None` in place of a config means input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: String,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }
}

// ─── Sorting ────────────────────────────────────────────────────────────────

enum SortKey {
    Text(String),
    Number(f64),
    Instant(Option<i64>),
}

impl SortKey {
    fn of(value: &CellValue, column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::String => SortKey::Text(value.as_text().to_lowercase()),
            ColumnType::Number => SortKey::Number(value.as_number()),
            ColumnType::Date => SortKey::Instant(value.as_instant()),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            // Unparseable dates sort before every real instant.
            (SortKey::Instant(a), SortKey::Instant(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Return `rows` ordered by the cell under `key`, compared as `column_type`.
/// Equal keys keep their input order in both directions.
pub fn sort_rows<R: TableRow + Clone>(
    rows: &[R],
    key: &str,
    column_type: ColumnType,
    direction: SortDirection,
) -> Vec<R> {
    let mut keyed: Vec<(SortKey, &R)> = rows
        .iter()
        .map(|row| (SortKey::of(&row.cell(key), column_type), row))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Ascending => a.compare(b),
        SortDirection::Descending => b.compare(a),
    });

    keyed.into_iter().map(|(_, row)| row.clone()).collect()
}

/// Header-click transition: new column → ascending, ascending → descending,
/// descending → unsorted.
pub fn next_sort_state(current: Option<&SortConfig>, clicked: &str) -> Option<SortConfig> {
    match current {
        Some(config) if config.key == clicked => match config.direction {
            SortDirection::Ascending => Some(SortConfig::new(clicked, SortDirection::Descending)),
            SortDirection::Descending => None,
        },
        _ => Some(SortConfig::new(clicked, SortDirection::Ascending)),
    }
}

// ─── Table ──────────────────────────────────────────────────────────────────

/// Column set plus optional default sort for one view's table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub default_sort: Option<SortConfig>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            default_sort: None,
        }
    }

    pub fn with_default_sort(mut self, sort: SortConfig) -> Self {
        self.default_sort = Some(sort);
        self
    }

    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    pub fn initial_state(&self) -> Option<SortConfig> {
        self.default_sort.clone()
    }

    /// Apply a header click. Unknown and unsortable columns leave the state as is.
    pub fn click(&self, current: Option<&SortConfig>, key: &str) -> Option<SortConfig> {
        match self.column(key) {
            Some(column) if column.sortable => next_sort_state(current, key),
            _ => current.cloned(),
        }
    }

    /// Rows in display order for `state`; input order when unsorted.
    pub fn arrange<R: TableRow + Clone>(&self, rows: &[R], state: Option<&SortConfig>) -> Vec<R> {
        let Some(config) = state else {
            return rows.to_vec();
        };
        let column_type = self
            .column(&config.key)
            .map_or(ColumnType::String, |c| c.column_type);
        sort_rows(rows, &config.key, column_type, config.direction)
    }

    /// Formatted cells of one row, in column order.
    pub fn render<R: TableRow>(&self, row: &R) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| format_cell(&row.cell(&c.key), c.format))
            .collect()
    }
}

// ─── Formatting ─────────────────────────────────────────────────────────────

pub fn format_cell(value: &CellValue, format: CellFormat) -> String {
    if let CellValue::Missing = value {
        return String::new();
    }
    match format {
        CellFormat::Plain => match value {
            CellValue::Number(n) if n.fract() == 0.0 => format!("{n:.0}"),
            other => other.as_text(),
        },
        CellFormat::Integer => group_thousands(&format!("{:.0}", value.as_number())),
        CellFormat::Currency => {
            let n = value.as_number();
            let sign = if n < 0.0 { "-" } else { "" };
            format!("{sign}${}", group_thousands(&format!("{:.2}", n.abs())))
        }
        CellFormat::Percent => format!("{:.2}%", value.as_number()),
        CellFormat::Multiplier => format!("{:.2}x", value.as_number()),
        CellFormat::Date => match value {
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            other => other.as_text(),
        },
    }
}

/// Insert `,` every three digits of the integer part.
fn group_thousands(formatted: &str) -> String {
    let (sign, digits) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
