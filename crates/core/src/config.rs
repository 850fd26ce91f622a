use crate::types::GeoPoint;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root application configuration. Loaded from environment variables
/// with the prefix `MARKETING_INSIGHTS__` and an optional TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Region name to map coordinates. Regions missing here plot at (0, 0).
    /// Written as a list of `{ name, lat, lng }` entries: table keys are
    /// lowercased by the config loader, names kept as values are not.
    #[serde(
        default = "default_region_coordinates",
        deserialize_with = "regions_from_entries"
    )]
    pub regions: HashMap<String, GeoPoint>,
}

/// One configured region position.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionEntry {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

fn regions_from_entries<'de, D>(deserializer: D) -> Result<HashMap<String, GeoPoint>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<RegionEntry>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|entry| (entry.name, GeoPoint::new(entry.lat, entry.lng)))
        .collect())
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_format")]
    pub format: String,
    /// Maximum rows printed; 0 means no limit.
    #[serde(default)]
    pub limit: usize,
}

// Default functions
fn default_data_path() -> PathBuf {
    PathBuf::from("data/marketing-data.json")
}
fn default_output_format() -> String {
    "table".to_string()
}

/// Approximate coordinates for the regions present in the dataset.
pub fn default_region_coordinates() -> HashMap<String, GeoPoint> {
    [
        ("Abu Dhabi", GeoPoint::new(24.4539, 54.3773)),
        ("Dubai", GeoPoint::new(25.2048, 55.2708)),
        ("Sharjah", GeoPoint::new(25.3463, 55.4209)),
        ("Riyadh", GeoPoint::new(24.7136, 46.6753)),
        ("Doha", GeoPoint::new(25.2854, 51.5310)),
        ("Kuwait City", GeoPoint::new(29.3759, 47.9774)),
        ("Manama", GeoPoint::new(26.2285, 50.5860)),
    ]
    .into_iter()
    .map(|(name, point)| (name.to_string(), point))
    .collect()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            limit: 0,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            output: OutputConfig::default(),
            regions: default_region_coordinates(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and optional config file.
    pub fn load(file: Option<&str>) -> Result<Self, config::ConfigError> {
        Self::load_with(file, environment())
    }

    /// Load with an explicit environment source. Environment values win
    /// over the file.
    pub fn load_with(
        file: Option<&str>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder.add_source(env).build()?;
        config.try_deserialize()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("MARKETING_INSIGHTS")
        .separator("__")
        .try_parsing(true)
}
