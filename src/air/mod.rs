//! Live air quality near the user's location
//!
//! - `location` - coordinates and the geolocation provider abstraction
//! - `openaq` - HTTP client for OpenAQ's latest-measurements endpoint
//! - `summary` - per-pollutant averaging and AQI estimation
//! - `monitor` - the current-result slot with stale response suppression

pub mod location;
pub mod monitor;
pub mod openaq;
pub mod summary;

pub use location::{Coordinates, FixedLocation, LocationProvider, NoLocation, LOCATION_TIMEOUT};
pub use monitor::{AirQualityMonitor, AirQualityState, FetchOutcome};
pub use openaq::{AirQualityProvider, LatestResponse, OpenAqClient};
pub use summary::{consolidate, AirQualityReport, Pollutant, PollutantAverages};
