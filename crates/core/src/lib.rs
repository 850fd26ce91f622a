pub mod config;
pub mod error;
pub mod source;
pub mod types;

pub use config::AppConfig;
pub use error::{InsightsError, InsightsResult};
pub use source::{DatasetSource, FileSource, StaticSource};
pub use types::{Campaign, GeoPoint, MarketingData};
