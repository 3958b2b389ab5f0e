//! # EcoTrack
//!
//! Personal carbon footprint estimates, live air quality near a location, and
//! emissions statistics for a dataset of Indian cities.
//!
//! ## Usage
//!
//! ```bash
//! ecotrack footprint [--car-km N] [--air-hours N] [--electricity-kwh N] [--diet LABEL] [--waste-kg N]
//! ecotrack aqi <PM25>
//! ecotrack air [--lat LAT --lon LON]
//! ecotrack cities [--top N]
//! ecotrack city <NAME>
//! ```
//!
//! ## Modules
//!
//! - `aqi` - PM2.5 to US EPA Air Quality Index conversion
//! - `footprint` - Annual personal footprint from lifestyle inputs
//! - `cities` - Per-capita emissions, ranking and tiers over city records
//! - `air` - Geolocation, OpenAQ client and the current-result slot
//! - `config` - Layered configuration (file, environment, flags)
//! - `cli` - Command-line front end
pub mod air;
pub mod aqi;
pub mod cities;
pub mod cli;
pub mod config;
pub mod error;
pub mod footprint;

pub use error::{Error, Result};
