//! Marketing Insights: campaign performance views over a marketing snapshot.
//!
//! Loads the snapshot once, computes the requested view and prints it.

use clap::Parser;
use marketing_core::config::AppConfig;
use marketing_core::{DatasetSource, FileSource};
use marketing_reporting::dashboard;
use marketing_reporting::estimation::{age_group_estimates, gender_summary};
use marketing_reporting::export::ExportFormat;
use marketing_reporting::filter::{distinct_values, CategoryField};
use marketing_reporting::{render_view, CampaignFilter, RegionCoordinates, ViewKind, ViewRequest};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "marketing-insights")]
#[command(about = "Campaign, device, regional, demographic and weekly performance views")]
#[command(version)]
struct Cli {
    /// Optional TOML config file
    #[arg(long, short = 'c')]
    config: Option<String>,

    /// Snapshot JSON file (overrides config)
    #[arg(long, env = "MARKETING_INSIGHTS__DATA__PATH")]
    data: Option<PathBuf>,

    /// campaigns | devices | mediums | regions | male | female | weekly | summary
    #[arg(long, default_value = "campaigns")]
    view: String,

    /// Case-insensitive campaign name search
    #[arg(long, default_value = "")]
    name: String,

    /// Campaign objective to keep (repeatable)
    #[arg(long = "objective")]
    objectives: Vec<String>,

    /// Column header click (repeatable; asc → desc → unsorted)
    #[arg(long = "sort")]
    sort: Vec<String>,

    /// table | csv | json (overrides config)
    #[arg(long)]
    format: Option<String>,

    /// Maximum rows to print (overrides config)
    #[arg(long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketing_insights=info,marketing_reporting=info".into()),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(path) = cli.data {
        config.data.path = path;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(limit) = cli.limit {
        config.output.limit = limit;
    }

    info!(
        data = %config.data.path.display(),
        view = %cli.view,
        format = %config.output.format,
        regions = config.regions.len(),
        "Configuration loaded"
    );

    let source = FileSource::new(config.data.path.clone());
    let data = match source.fetch().await {
        Ok(data) => data,
        Err(e) => {
            error!(error = %e, "Snapshot unavailable");
            return Err(e.into());
        }
    };

    let format: ExportFormat = config.output.format.parse()?;
    let coordinates: RegionCoordinates = config.regions.clone().into_iter().collect();

    if cli.view.eq_ignore_ascii_case("summary") {
        let filter = CampaignFilter {
            name: cli.name,
            objectives: cli.objectives.into_iter().collect(),
        };
        let filtered = filter.apply(&data.campaigns);

        let summary = serde_json::json!({
            "overview": dashboard::overview(&filtered, data.campaigns.len()),
            "top_campaigns": dashboard::revenue_bars(&dashboard::top_by_revenue(&filtered, 6), 6),
            "campaign_types": distinct_values(&data.campaigns, CategoryField::Objective),
            "gender": gender_summary(&filtered),
            "age_groups": age_group_estimates(&filtered),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let request = ViewRequest {
        view: cli.view.parse::<ViewKind>()?,
        filter: CampaignFilter {
            name: cli.name,
            objectives: cli.objectives.into_iter().collect(),
        },
        sort_clicks: cli.sort,
        limit: config.output.limit,
        format,
    };

    let output = render_view(&data, &coordinates, &request)?;
    print!("{output}");

    Ok(())
}
