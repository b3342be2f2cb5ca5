use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use sitetemp_core::{
    Config, Coordinate, ObjectMetadata, PowerProvider, TemperatureProvider, chart, simulate,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "sitetemp", version, about = "Model object inspector with site temperature")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect a viewer selection payload and resolve site temperature.
    Inspect {
        /// Path to the selection payload JSON emitted by the viewer.
        payload: PathBuf,

        /// Write the 24-hour trend chart to this SVG file.
        #[arg(long)]
        chart: Option<PathBuf>,

        /// Also print the raw object record.
        #[arg(long)]
        raw: bool,
    },

    /// Resolve temperature for an explicit coordinate.
    Temp {
        /// Latitude in degrees, -90 to 90.
        latitude: f64,

        /// Longitude in degrees, -180 to 180.
        longitude: f64,

        /// Write the 24-hour trend chart to this SVG file.
        #[arg(long)]
        chart: Option<PathBuf>,
    },

    /// Interactively set defaults: location, community code, fetch gating.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Inspect { payload, chart, raw } => inspect(&payload, chart.as_deref(), raw).await,
            Command::Temp { latitude, longitude, chart } => {
                temp(latitude, longitude, chart.as_deref()).await
            }
            Command::Configure => configure(),
        }
    }
}

async fn inspect(payload: &Path, chart: Option<&Path>, raw: bool) -> anyhow::Result<()> {
    let config = Config::load()?;

    // Failing to read the selection payload is the one fatal path; the
    // temperature lookup below only ever degrades to an inline notice.
    let text = std::fs::read_to_string(payload)
        .with_context(|| format!("Failed to read selection payload: {}", payload.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse selection payload: {}", payload.display()))?;
    let object = ObjectMetadata::from_value(value);

    output::print_object(&object, raw);

    if !config.should_fetch_for(object.id()) {
        tracing::info!("Temperature lookup skipped: not the target object");
        return Ok(());
    }

    let coord = object
        .coordinates()
        .unwrap_or_else(|| config.fallback_coordinate());
    let provider = PowerProvider::from_config(&config);
    resolve_and_report(&provider, coord, chart).await
}

async fn temp(latitude: f64, longitude: f64, chart: Option<&Path>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let coord = Coordinate::new(latitude, longitude)?;
    let provider = PowerProvider::from_config(&config);
    resolve_and_report(&provider, coord, chart).await
}

/// Issue both lookups concurrently so their latencies overlap; neither
/// depends on the other's result.
async fn resolve_and_report(
    provider: &PowerProvider,
    coord: Coordinate,
    chart_path: Option<&Path>,
) -> anyhow::Result<()> {
    let (current, hourly) = tokio::join!(
        provider.resolve_current(coord),
        provider.resolve_hourly(coord),
    );

    let scalar = match current {
        Ok(Some(celsius)) => {
            output::print_temperature(coord, celsius);
            Some(celsius)
        }
        Ok(None) => {
            output::print_temperature_missing(None);
            None
        }
        Err(err) => {
            output::print_temperature_missing(Some(&err.to_string()));
            None
        }
    };

    let Some(chart_path) = chart_path else {
        return Ok(());
    };

    let (series, simulated) = match hourly {
        Some(points) => (points, false),
        None => match scalar {
            Some(celsius) => (simulate::diurnal_series(celsius, chrono::Utc::now()), true),
            None => {
                println!("No hourly data available; chart skipped.");
                return Ok(());
            }
        },
    };

    match chart::render_svg(&series) {
        Some(svg) => {
            std::fs::write(chart_path, svg)
                .with_context(|| format!("Failed to write chart: {}", chart_path.display()))?;
            println!("Trend chart written to {}", chart_path.display());
            if simulated {
                println!("  * Simulated data based on current temperature");
            }
        }
        None => println!("No hourly data available; chart skipped."),
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;
    let current = config.fallback_coordinate();

    let latitude: f64 = inquire::CustomType::new("Default latitude:")
        .with_default(current.latitude)
        .with_help_message("Used when an object carries no coordinates")
        .prompt()?;
    let longitude: f64 = inquire::CustomType::new("Default longitude:")
        .with_default(current.longitude)
        .prompt()?;
    let community = inquire::Text::new("Provider community code:")
        .with_default(&config.community)
        .prompt()?;
    let fetch_all = inquire::Confirm::new("Resolve temperature for every clicked object?")
        .with_default(config.fetch_for_all_objects)
        .prompt()?;

    config.default_location = Some(Coordinate::new(latitude, longitude)?);
    config.community = community;
    config.fetch_for_all_objects = fetch_all;

    if !fetch_all {
        let target = inquire::Text::new("Target object id:")
            .with_default(config.target_object_id.as_deref().unwrap_or(""))
            .prompt()?;
        let target = target.trim();
        config.target_object_id = (!target.is_empty()).then(|| target.to_string());
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
