//! Consolidation of station measurements into one report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

use super::location::Coordinates;
use super::openaq::LatestResponse;
use crate::aqi::{self, AqiStatus};
use crate::error::Result;

/// Pollutants reported alongside the AQI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    Pm10,
    No2,
    So2,
    O3,
    Co,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::No2,
        Pollutant::O3,
        Pollutant::Co,
        Pollutant::So2,
    ];

    /// Upper-cased parameter name used by the provider
    pub fn parameter(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM25",
            Pollutant::Pm10 => "PM10",
            Pollutant::No2 => "NO2",
            Pollutant::So2 => "SO2",
            Pollutant::O3 => "O3",
            Pollutant::Co => "CO",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::No2 => "NO₂",
            Pollutant::So2 => "SO₂",
            Pollutant::O3 => "O₃",
            Pollutant::Co => "CO",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Pollutant::Co => "mg/m³",
            _ => "µg/m³",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mean concentration per pollutant; `None` when no station reported it
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PollutantAverages {
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub no2: Option<f64>,
    pub so2: Option<f64>,
    pub o3: Option<f64>,
    pub co: Option<f64>,
}

impl PollutantAverages {
    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::No2 => self.no2,
            Pollutant::So2 => self.so2,
            Pollutant::O3 => self.o3,
            Pollutant::Co => self.co,
        }
    }
}

fn mean(values: Option<&Vec<f64>>) -> Option<f64> {
    match values {
        Some(v) if !v.is_empty() => Some(v.iter().sum::<f64>() / v.len() as f64),
        _ => None,
    }
}

/// Average every pollutant across all stations in `response`.
///
/// Parameter names match case-insensitively. Missing, negative and
/// non-finite values (provider sentinels such as -999) are skipped.
pub fn consolidate(response: &LatestResponse) -> PollutantAverages {
    let mut by_parameter: HashMap<String, Vec<f64>> = HashMap::new();
    let mut skipped = 0usize;

    for measurement in response.results.iter().flat_map(|r| &r.measurements) {
        let Some(parameter) = measurement.parameter.as_deref() else {
            continue;
        };
        match measurement.value {
            Some(value) if value.is_finite() && value >= 0.0 => by_parameter
                .entry(parameter.to_uppercase())
                .or_default()
                .push(value),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} measurements without a usable value", skipped);
    }
    debug!(
        "Consolidated parameters: {:?}",
        by_parameter.keys().collect::<Vec<_>>()
    );

    let avg = |p: Pollutant| mean(by_parameter.get(p.parameter()));
    PollutantAverages {
        pm25: avg(Pollutant::Pm25),
        pm10: avg(Pollutant::Pm10),
        no2: avg(Pollutant::No2),
        so2: avg(Pollutant::So2),
        o3: avg(Pollutant::O3),
        co: avg(Pollutant::Co),
    }
}

/// Air quality near a location at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReport {
    pub coordinates: Coordinates,
    pub aqi: AqiStatus,
    pub pollutants: PollutantAverages,
    pub station_count: usize,
    pub fetched_at: DateTime<Utc>,
}

impl AirQualityReport {
    /// Build a report; the AQI comes from the averaged PM2.5 only
    pub fn from_response(coordinates: Coordinates, response: &LatestResponse) -> Result<Self> {
        let pollutants = consolidate(response);
        let aqi = aqi::estimate_sample(pollutants.pm25)?;

        Ok(Self {
            coordinates,
            aqi,
            pollutants,
            station_count: response.results.len(),
            fetched_at: Utc::now(),
        })
    }
}
