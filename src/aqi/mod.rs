//! PM2.5 to Air Quality Index conversion
//!
//! Approximates the US EPA AQI from a single PM2.5 concentration using the
//! published piecewise-linear breakpoint table, and classifies the result into
//! one of six severity bands.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// One row of the PM2.5 breakpoint table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub concentration_low: f64,
    pub concentration_high: f64,
    pub index_low: u32,
    pub index_high: u32,
}

impl Breakpoint {
    const fn new(
        concentration_low: f64,
        concentration_high: f64,
        index_low: u32,
        index_high: u32,
    ) -> Self {
        Self {
            concentration_low,
            concentration_high,
            index_low,
            index_high,
        }
    }

    pub fn contains(&self, pm25: f64) -> bool {
        pm25 >= self.concentration_low && pm25 <= self.concentration_high
    }

    /// Linear interpolation inside this row, unrounded
    fn interpolate(&self, pm25: f64) -> f64 {
        let index_span = f64::from(self.index_high - self.index_low);
        let concentration_span = self.concentration_high - self.concentration_low;
        index_span / concentration_span * (pm25 - self.concentration_low)
            + f64::from(self.index_low)
    }
}

/// US EPA PM2.5 breakpoints (µg/m³)
pub static BREAKPOINTS: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 12.0, 0, 50),
    Breakpoint::new(12.1, 35.4, 51, 100),
    Breakpoint::new(35.5, 55.4, 101, 150),
    Breakpoint::new(55.5, 150.4, 151, 200),
    Breakpoint::new(150.5, 250.4, 201, 300),
    Breakpoint::new(250.5, 500.4, 301, 500),
];

/// Severity tier for an AQI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiBand {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiBand {
    /// All bands in ascending order of severity
    const ALL: [AqiBand; 6] = [
        AqiBand::Good,
        AqiBand::Moderate,
        AqiBand::UnhealthyForSensitiveGroups,
        AqiBand::Unhealthy,
        AqiBand::VeryUnhealthy,
        AqiBand::Hazardous,
    ];

    /// Inclusive upper AQI bound, `None` for the open-ended top band
    pub fn max_aqi(self) -> Option<u32> {
        match self {
            AqiBand::Good => Some(50),
            AqiBand::Moderate => Some(100),
            AqiBand::UnhealthyForSensitiveGroups => Some(150),
            AqiBand::Unhealthy => Some(200),
            AqiBand::VeryUnhealthy => Some(300),
            AqiBand::Hazardous => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiBand::Good => "Good",
            AqiBand::Moderate => "Moderate",
            AqiBand::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiBand::Unhealthy => "Unhealthy",
            AqiBand::VeryUnhealthy => "Very Unhealthy",
            AqiBand::Hazardous => "Hazardous",
        }
    }

    /// Conventional EPA display colour
    pub fn color(self) -> &'static str {
        match self {
            AqiBand::Good => "green",
            AqiBand::Moderate => "yellow",
            AqiBand::UnhealthyForSensitiveGroups => "orange",
            AqiBand::Unhealthy => "red",
            AqiBand::VeryUnhealthy => "purple",
            AqiBand::Hazardous => "maroon",
        }
    }

    /// First band whose bound is at or above `aqi`
    pub fn for_aqi(aqi: u32) -> Self {
        Self::ALL
            .into_iter()
            .find(|band| match band.max_aqi() {
                Some(max) => aqi <= max,
                None => true,
            })
            .unwrap_or(AqiBand::Hazardous)
    }
}

impl fmt::Display for AqiBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of estimating AQI from a possibly missing PM2.5 sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AqiStatus {
    Available { aqi: u32, band: AqiBand },
    /// No PM2.5 sample was reported
    Unavailable,
}

impl AqiStatus {
    pub fn aqi(&self) -> Option<u32> {
        match self {
            AqiStatus::Available { aqi, .. } => Some(*aqi),
            AqiStatus::Unavailable => None,
        }
    }

    pub fn band(&self) -> Option<AqiBand> {
        match self {
            AqiStatus::Available { band, .. } => Some(*band),
            AqiStatus::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, AqiStatus::Available { .. })
    }
}

/// Pick the breakpoint row used for `pm25`.
///
/// Concentrations falling in the 0.1 µg/m³ gaps between published rows go to
/// the row above. Anything past the table uses the last row.
pub fn breakpoint_for(pm25: f64) -> &'static Breakpoint {
    BREAKPOINTS
        .iter()
        .find(|bp| bp.contains(pm25) || pm25 < bp.concentration_low)
        .unwrap_or(&BREAKPOINTS[BREAKPOINTS.len() - 1])
}

/// Convert a PM2.5 concentration to an integer AQI.
///
/// Values above 500.4 µg/m³ extrapolate along the last row and are not capped.
pub fn pm25_to_aqi(pm25: f64) -> Result<u32> {
    let pm25 = Error::check_non_negative("PM2.5 concentration", pm25)?;
    let raw = breakpoint_for(pm25).interpolate(pm25);
    // round half up; the cast saturates for absurd concentrations
    Ok((raw + 0.5).floor() as u32)
}

/// AQI and band for a measured concentration
pub fn estimate(pm25: f64) -> Result<AqiStatus> {
    let aqi = pm25_to_aqi(pm25)?;
    Ok(AqiStatus::Available {
        aqi,
        band: AqiBand::for_aqi(aqi),
    })
}

/// Like [`estimate`], but an absent sample yields [`AqiStatus::Unavailable`]
pub fn estimate_sample(pm25: Option<f64>) -> Result<AqiStatus> {
    match pm25 {
        Some(value) => estimate(value),
        None => Ok(AqiStatus::Unavailable),
    }
}
