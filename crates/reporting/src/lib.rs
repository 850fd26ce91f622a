//! Marketing performance reporting: aggregation views, rate derivation,
//! audience-share estimation, filtering, sorting and export over an
//! immutable campaign snapshot.

pub mod aggregation;
pub mod dashboard;
pub mod estimation;
pub mod export;
pub mod filter;
pub mod metrics;
pub mod pipeline;
pub mod table;
pub mod views;

pub use aggregation::{group_by, Group, Measured};
pub use filter::{filter, CampaignFilter, CategoryField, Predicate};
pub use metrics::{RateMetrics, Totals};
pub use pipeline::{render_view, ViewKind, ViewRequest};
pub use table::{sort_rows, ColumnType, SortConfig, SortDirection, Table, TableRow};
pub use views::RegionCoordinates;
