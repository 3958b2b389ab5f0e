//! CLI argument structures

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Carbon footprint, air quality and city emissions at a glance
#[derive(Parser)]
#[command(name = "ecotrack")]
#[command(about = "ecotrack - Carbon footprint, live air quality and city emissions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Estimate your annual carbon footprint
    Footprint {
        /// Car travel (km/year)
        #[arg(long, default_value_t = 8000.0, allow_negative_numbers = true)]
        car_km: f64,

        /// Air travel (hours/year)
        #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
        air_hours: f64,

        /// Electricity use (kWh/month)
        #[arg(long, default_value_t = 150.0, allow_negative_numbers = true)]
        electricity_kwh: f64,

        /// Diet: Vegan, Vegetarian, "Light Meat", "Medium Meat" or "Heavy Meat"
        #[arg(long, default_value = "Medium Meat")]
        diet: String,

        /// Waste produced (kg/month)
        #[arg(long, default_value_t = 20.0, allow_negative_numbers = true)]
        waste_kg: f64,
    },

    /// Convert a PM2.5 concentration (µg/m³) to an AQI value
    Aqi {
        /// PM2.5 concentration in µg/m³
        #[arg(allow_negative_numbers = true)]
        pm25: f64,
    },

    /// Look up live air quality near a location
    Air {
        /// Latitude in decimal degrees (overrides configuration)
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in decimal degrees (overrides configuration)
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// Emissions statistics for the city dataset
    Cities {
        /// Number of cities in the ranking
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// JSON file replacing the built-in dataset
        #[arg(long)]
        dataset: Option<PathBuf>,
    },

    /// Details for a single city
    City {
        /// City name (case-insensitive)
        name: String,

        /// JSON file replacing the built-in dataset
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
}

/// Tracing filter for a `-v` count
pub fn get_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        2 => "trace",
        _ => "trace,hyper=debug,reqwest=debug", // -vvv shows everything including dependencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_footprint_defaults() {
        let cli = Cli::try_parse_from(["ecotrack", "footprint"]).unwrap();
        match cli.command {
            Commands::Footprint {
                car_km,
                diet,
                waste_kg,
                ..
            } => {
                assert_eq!(car_km, 8000.0);
                assert_eq!(diet, "Medium Meat");
                assert_eq!(waste_kg, 20.0);
            }
            _ => panic!("expected footprint"),
        }
    }

    #[test]
    fn test_negative_values_reach_validation() {
        let cli = Cli::try_parse_from(["ecotrack", "aqi", "-3"]).unwrap();
        assert!(matches!(cli.command, Commands::Aqi { pm25 } if pm25 == -3.0));
    }

    #[test]
    fn test_air_requires_both_coordinates() {
        assert!(Cli::try_parse_from(["ecotrack", "air", "--lat", "10"]).is_err());
        let cli = Cli::try_parse_from(["ecotrack", "air", "--lat", "10", "--lon", "-20"]).unwrap();
        assert!(matches!(cli.command, Commands::Air { lat: Some(_), lon: Some(_) }));
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(get_log_level(0), "info");
        assert_eq!(get_log_level(1), "debug");
        assert_eq!(get_log_level(2), "trace");
    }
}
