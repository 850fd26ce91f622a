//! Row export: render an ordered row collection as CSV, JSON or a
//! plain-text table using a view's column set.

use crate::table::{Align, CellValue, Table, TableRow};
use marketing_core::{InsightsError, InsightsResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Table,
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" | "text" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(InsightsError::Config(format!("unknown output format: {other}"))),
        }
    }
}

pub fn export<R: TableRow>(table: &Table, rows: &[R], format: ExportFormat) -> InsightsResult<String> {
    match format {
        ExportFormat::Table => Ok(export_text(table, rows)),
        ExportFormat::Csv => Ok(export_csv(table, rows)),
        ExportFormat::Json => export_json(table, rows),
    }
}

/// CSV with a header line of column keys. Text cells are quoted; numbers
/// are written raw so they stay machine readable.
pub fn export_csv<R: TableRow>(table: &Table, rows: &[R]) -> String {
    let keys: Vec<&str> = table.columns.iter().map(|c| c.key.as_str()).collect();
    let mut csv = keys.join(",");
    csv.push('\n');
    for row in rows {
        let cells: Vec<String> = keys
            .iter()
            .map(|key| match row.cell(key) {
                CellValue::Text(s) => format!("\"{}\"", s.replace('"', "\"\"")),
                CellValue::Number(n) => n.to_string(),
                CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
                CellValue::Missing => String::new(),
            })
            .collect();
        csv.push_str(&cells.join(","));
        csv.push('\n');
    }
    csv
}

/// JSON array of objects keyed by column key, in column order.
pub fn export_json<R: TableRow>(table: &Table, rows: &[R]) -> InsightsResult<String> {
    let records: Vec<serde_json::Map<String, serde_json::Value>> = rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .map(|c| {
                    let value = match row.cell(&c.key) {
                        CellValue::Text(s) => serde_json::Value::String(s),
                        CellValue::Number(n) => serde_json::json!(n),
                        CellValue::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
                        CellValue::Missing => serde_json::Value::Null,
                    };
                    (c.key.clone(), value)
                })
                .collect()
        })
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Fixed-width text table with formatted cells.
pub fn export_text<R: TableRow>(table: &Table, rows: &[R]) -> String {
    let rendered: Vec<Vec<String>> = rows.iter().map(|r| table.render(r)).collect();
    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            rendered
                .iter()
                .map(|cells| cells[i].chars().count())
                .chain(std::iter::once(c.header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&table.columns)
            .zip(&widths)
            .map(|((cell, column), &width)| match column.align {
                Align::Left => format!("{cell:<width$}"),
                Align::Center => format!("{cell:^width$}"),
                Align::Right => format!("{cell:>width$}"),
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(table.headers());
    out.push('\n');
    for cells in &rendered {
        out.push_str(&line(cells.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{CellFormat, Column, ColumnType};

    struct Row {
        region: &'static str,
        revenue: f64,
    }

    impl TableRow for Row {
        fn cell(&self, key: &str) -> CellValue {
            match key {
                "region" => self.region.into(),
                "revenue" => self.revenue.into(),
                _ => CellValue::Missing,
            }
        }
    }

    fn table() -> Table {
        Table::new(vec![
            Column::new("region", "Region").sortable(ColumnType::String),
            Column::numeric("revenue", "Revenue", CellFormat::Currency),
        ])
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { region: "Abu \"AD\" Dhabi", revenue: 1500.0 },
            Row { region: "Doha", revenue: 20.5 },
        ]
    }

    #[test]
    fn test_csv_export() {
        let csv = export_csv(&table(), &rows());
        assert!(csv.starts_with("region,revenue\n"));
        assert!(csv.contains("\"Abu \"\"AD\"\" Dhabi\",1500"));
        assert!(csv.contains("\"Doha\",20.5"));
        assert_eq!(csv.lines().count(), 3); // header + 2 rows
    }

    #[test]
    fn test_json_export() {
        let json = export_json(&table(), &rows()).unwrap();
        let parsed: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1]["region"], "Doha");
        assert_eq!(parsed[0]["revenue"], 1500.0);
    }

    #[test]
    fn test_text_export_aligns_columns() {
        let text = export_text(&table(), &rows());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Region"));
        assert!(lines[1].ends_with("$1,500.00"));
        assert!(lines[2].ends_with("   $20.50"));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Table);
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
