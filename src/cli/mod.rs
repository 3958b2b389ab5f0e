//! Command-line front end
//!
//! - `args` - clap argument structures
//! - `render` - plain-text views of each result type

pub mod args;
pub mod render;

pub use args::{get_log_level, Cli, Commands};

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::air::{
    AirQualityMonitor, Coordinates, FetchOutcome, FixedLocation, LocationProvider, NoLocation,
    OpenAqClient,
};
use crate::aqi;
use crate::cities::{self, dataset, CityDetails, CityRecord};
use crate::config::EcoTrackConfig;
use crate::footprint::{self, DietCategory, LifestyleInput};
use self::render::{CitiesReport, FootprintReport};

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text(value));
    }
    Ok(())
}

/// Execute a parsed command line with the loaded configuration
pub async fn execute_command(cli: Cli, config: EcoTrackConfig) -> Result<()> {
    let json = cli.json;
    match cli.command {
        Commands::Footprint {
            car_km,
            air_hours,
            electricity_kwh,
            diet,
            waste_kg,
        } => {
            let input = LifestyleInput {
                car_km_per_year: car_km,
                air_hours_per_year: air_hours,
                electricity_kwh_per_month: electricity_kwh,
                diet: DietCategory::parse(&diet),
                waste_kg_per_month: waste_kg,
            };
            let result = footprint::calculate(&input)?;
            emit(json, &FootprintReport::new(input, result), render::footprint)
        }
        Commands::Aqi { pm25 } => {
            let status = aqi::estimate(pm25)?;
            emit(json, &status, |s| render::aqi(pm25, s))
        }
        Commands::Air { lat, lon } => run_air(json, &config, lat.zip(lon)).await,
        Commands::Cities {
            top,
            dataset: dataset_path,
        } => {
            let records = load_cities(dataset_path, &config)?;
            let report = CitiesReport::new(
                cities::statistics(&records),
                cities::top(&records, top),
            );
            emit(json, &report, render::cities)
        }
        Commands::City {
            name,
            dataset: dataset_path,
        } => {
            let records = load_cities(dataset_path, &config)?;
            let city = cities::find(&records, &name)
                .ok_or_else(|| anyhow!("Unknown city '{name}'"))?;
            emit(json, &CityDetails::from(city), render::city)
        }
    }
}

fn load_cities(
    dataset_path: Option<PathBuf>,
    config: &EcoTrackConfig,
) -> Result<Vec<CityRecord>> {
    match dataset_path.or_else(|| config.cities_file.clone()) {
        Some(path) => dataset::load(&path)
            .with_context(|| format!("Failed to load city dataset {}", path.display())),
        None => Ok(dataset::builtin().to_vec()),
    }
}

async fn run_air(
    json: bool,
    config: &EcoTrackConfig,
    flag_coordinates: Option<(f64, f64)>,
) -> Result<()> {
    let coordinates = match flag_coordinates {
        Some((lat, lon)) => Some(Coordinates::new(lat, lon)?),
        None => config.coordinates()?,
    };
    let location: Arc<dyn LocationProvider> = match coordinates {
        Some(coordinates) => Arc::new(FixedLocation::new(coordinates)),
        None => Arc::new(NoLocation),
    };

    let client = OpenAqClient::new(
        &config.openaq.base_url,
        config.openaq.api_key.clone(),
        config.http_timeout(),
    )?;
    let monitor = AirQualityMonitor::new(Arc::new(client), location);

    match monitor.locate().await? {
        FetchOutcome::Applied(report) => emit(json, &report, render::air_quality),
        FetchOutcome::Superseded => {
            debug!("Air quality result superseded");
            Ok(())
        }
    }
}
