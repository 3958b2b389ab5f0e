//! City emissions statistics
//!
//! Per-capita emissions, ranking, severity tiers and aggregate figures over a
//! dataset of city records. The built-in dataset lives in [`dataset`]; any
//! other slice of [`CityRecord`]s can be passed in its place.

pub mod dataset;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{Error, Result};

/// Number of cities in the ranking summary
pub const TOP_N: usize = 10;

/// Map view centre over India (latitude, longitude)
pub const MAP_CENTER: (f64, f64) = (22.9734, 78.6569);
pub const MAP_ZOOM: u8 = 5;

/// Smallest marker radius, in pixels
const MIN_MARKER_RADIUS: f64 = 6.0;

/// Sector contributing to a city's emissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmissionSource {
    Transport,
    Industry,
    Power,
    Residential,
}

impl fmt::Display for EmissionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmissionSource::Transport => "transport",
            EmissionSource::Industry => "industry",
            EmissionSource::Power => "power",
            EmissionSource::Residential => "residential",
        };
        f.write_str(name)
    }
}

/// Display tier by total annual emissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionTier {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl EmissionTier {
    pub fn for_megatonnes(megatonnes: f64) -> Self {
        if megatonnes < 6.0 {
            EmissionTier::Low
        } else if megatonnes < 12.0 {
            EmissionTier::Medium
        } else if megatonnes < 20.0 {
            EmissionTier::High
        } else {
            EmissionTier::VeryHigh
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EmissionTier::Low => "low",
            EmissionTier::Medium => "medium",
            EmissionTier::High => "high",
            EmissionTier::VeryHigh => "very high",
        }
    }

    /// Marker colour on the map legend
    pub fn color(self) -> &'static str {
        match self {
            EmissionTier::Low => "green",
            EmissionTier::Medium => "yellow",
            EmissionTier::High => "orange",
            EmissionTier::VeryHigh => "red",
        }
    }
}

impl fmt::Display for EmissionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A city with its annual emissions and population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub annual_emissions_mt: f64,
    pub population_millions: f64,
    #[serde(default)]
    pub sources: BTreeSet<EmissionSource>,
}

impl CityRecord {
    /// Build a record, enforcing positive emissions and population
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        annual_emissions_mt: f64,
        population_millions: f64,
        sources: impl IntoIterator<Item = EmissionSource>,
    ) -> Result<Self> {
        let record = Self {
            name: name.into(),
            latitude,
            longitude,
            annual_emissions_mt,
            population_millions,
            sources: sources.into_iter().collect(),
        };
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("city name must not be empty".to_string()));
        }
        if !(self.annual_emissions_mt.is_finite() && self.annual_emissions_mt > 0.0) {
            return Err(Error::InvalidInput(format!(
                "{}: annual emissions must be positive, got {}",
                self.name, self.annual_emissions_mt
            )));
        }
        if !(self.population_millions.is_finite() && self.population_millions > 0.0) {
            return Err(Error::InvalidInput(format!(
                "{}: population must be positive, got {}",
                self.name, self.population_millions
            )));
        }
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude)
        {
            return Err(Error::InvalidInput(format!(
                "{}: coordinates ({}, {}) out of range",
                self.name, self.latitude, self.longitude
            )));
        }
        Ok(())
    }

    /// Tonnes per person per year (megatonnes over millions of people)
    pub fn per_capita_tonnes(&self) -> f64 {
        self.annual_emissions_mt / self.population_millions
    }

    pub fn tier(&self) -> EmissionTier {
        EmissionTier::for_megatonnes(self.annual_emissions_mt)
    }

    /// Map marker radius scaled by total emissions
    pub fn marker_radius(&self) -> f64 {
        (self.annual_emissions_mt.sqrt() * 4.0).max(MIN_MARKER_RADIUS)
    }
}

/// Entry in the emissions ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCity {
    /// 1-based position
    pub rank: usize,
    pub name: String,
    pub annual_emissions_mt: f64,
    pub per_capita_tonnes: f64,
}

/// Aggregate figures over a city dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityStatistics {
    pub city_count: usize,
    pub combined_megatonnes: f64,
    /// Unweighted mean of per-city per-capita values
    pub average_per_capita_tonnes: f64,
    pub ranked_top10: Vec<RankedCity>,
    pub tiers: BTreeMap<String, EmissionTier>,
}

/// Everything shown for a single selected city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityDetails {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub annual_emissions_mt: f64,
    pub population_millions: f64,
    pub per_capita_tonnes: f64,
    pub sources: Vec<EmissionSource>,
    pub tier: EmissionTier,
    pub marker_radius: f64,
}

impl From<&CityRecord> for CityDetails {
    fn from(city: &CityRecord) -> Self {
        Self {
            name: city.name.clone(),
            latitude: city.latitude,
            longitude: city.longitude,
            annual_emissions_mt: city.annual_emissions_mt,
            population_millions: city.population_millions,
            per_capita_tonnes: city.per_capita_tonnes(),
            sources: city.sources.iter().copied().collect(),
            tier: city.tier(),
            marker_radius: city.marker_radius(),
        }
    }
}

/// Cities ordered by descending emissions; ties keep dataset order
pub fn rank(records: &[CityRecord]) -> Vec<&CityRecord> {
    let mut ranked: Vec<&CityRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.annual_emissions_mt.total_cmp(&a.annual_emissions_mt));
    ranked
}

/// Top `n` cities by emissions
pub fn top(records: &[CityRecord], n: usize) -> Vec<RankedCity> {
    rank(records)
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(idx, city)| RankedCity {
            rank: idx + 1,
            name: city.name.clone(),
            annual_emissions_mt: city.annual_emissions_mt,
            per_capita_tonnes: city.per_capita_tonnes(),
        })
        .collect()
}

/// Compute aggregate statistics over `records`.
///
/// An empty dataset yields zero totals and a zero average.
pub fn statistics(records: &[CityRecord]) -> CityStatistics {
    let city_count = records.len();
    let combined_megatonnes = records.iter().map(|c| c.annual_emissions_mt).sum();
    let average_per_capita_tonnes = if city_count == 0 {
        0.0
    } else {
        records.iter().map(CityRecord::per_capita_tonnes).sum::<f64>() / city_count as f64
    };
    let tiers = records
        .iter()
        .map(|c| (c.name.clone(), c.tier()))
        .collect();

    CityStatistics {
        city_count,
        combined_megatonnes,
        average_per_capita_tonnes,
        ranked_top10: top(records, TOP_N),
        tiers,
    }
}

/// Look a city up by name, ignoring case and surrounding whitespace
pub fn find<'a>(records: &'a [CityRecord], name: &str) -> Option<&'a CityRecord> {
    let wanted = name.trim();
    records.iter().find(|c| c.name.eq_ignore_ascii_case(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_SOURCES: [EmissionSource; 0] = [];

    fn city(name: &str, mt: f64, pop: f64) -> CityRecord {
        CityRecord::new(name, 20.0, 78.0, mt, pop, [EmissionSource::Transport]).unwrap()
    }

    #[test]
    fn test_delhi_per_capita_is_exact() {
        let delhi = find(dataset::builtin(), "delhi").unwrap();
        assert_eq!(delhi.per_capita_tonnes(), 2.5);
    }

    #[test]
    fn test_builtin_statistics() {
        let stats = statistics(dataset::builtin());
        assert_eq!(stats.city_count, 25);
        assert_eq!(stats.combined_megatonnes, 340.0);
        assert_eq!(stats.ranked_top10.len(), 10);
        assert_eq!(stats.ranked_top10[0].name, "Delhi");
        assert_eq!(stats.ranked_top10[1].name, "Mumbai");
        assert_eq!(stats.ranked_top10[8].name, "Pune");
        assert_eq!(stats.ranked_top10[9].name, "Lucknow");
        assert_eq!(stats.tiers["Delhi"], EmissionTier::VeryHigh);
        assert_eq!(stats.tiers["Shillong"], EmissionTier::Low);
        assert!(stats.average_per_capita_tonnes > 0.0);
    }

    #[test]
    fn test_average_is_unweighted_mean() {
        let records = vec![city("A", 10.0, 10.0), city("B", 30.0, 10.0)];
        let stats = statistics(&records);
        // per-capita 1.0 and 3.0
        assert_eq!(stats.average_per_capita_tonnes, 2.0);
        assert_eq!(stats.combined_megatonnes, 40.0);
    }

    #[test]
    fn test_ranking_is_stable_for_ties() {
        let records = vec![
            city("First", 5.0, 1.0),
            city("Big", 9.0, 1.0),
            city("Second", 5.0, 1.0),
            city("Third", 5.0, 1.0),
        ];
        let names: Vec<&str> = rank(&records).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Big", "First", "Second", "Third"]);
    }

    #[test]
    fn test_top_assigns_one_based_ranks() {
        let records = vec![city("A", 1.0, 1.0), city("B", 2.0, 1.0)];
        let ranked = top(&records, 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].name, "B");
    }

    #[test]
    fn test_empty_dataset() {
        let stats = statistics(&[]);
        assert_eq!(stats.city_count, 0);
        assert_eq!(stats.combined_megatonnes, 0.0);
        assert_eq!(stats.average_per_capita_tonnes, 0.0);
        assert!(stats.ranked_top10.is_empty());
        assert!(stats.tiers.is_empty());
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(EmissionTier::for_megatonnes(5.99), EmissionTier::Low);
        assert_eq!(EmissionTier::for_megatonnes(6.0), EmissionTier::Medium);
        assert_eq!(EmissionTier::for_megatonnes(11.9), EmissionTier::Medium);
        assert_eq!(EmissionTier::for_megatonnes(12.0), EmissionTier::High);
        assert_eq!(EmissionTier::for_megatonnes(19.9), EmissionTier::High);
        assert_eq!(EmissionTier::for_megatonnes(20.0), EmissionTier::VeryHigh);
    }

    #[test]
    fn test_marker_radius_has_floor() {
        assert_eq!(city("Tiny", 1.0, 1.0).marker_radius(), 6.0);
        assert_eq!(city("Huge", 25.0, 1.0).marker_radius(), 20.0);
    }

    #[test]
    fn test_new_rejects_non_positive_values() {
        assert!(CityRecord::new("X", 0.0, 0.0, 0.0, 1.0, NO_SOURCES).is_err());
        assert!(CityRecord::new("X", 0.0, 0.0, 1.0, -1.0, NO_SOURCES).is_err());
        assert!(CityRecord::new("X", 95.0, 0.0, 1.0, 1.0, NO_SOURCES).is_err());
        assert!(CityRecord::new(" ", 0.0, 0.0, 1.0, 1.0, NO_SOURCES).is_err());
    }

    #[test]
    fn test_details_for_selected_city() {
        let shillong = find(dataset::builtin(), "  Shillong ").unwrap();
        let details = CityDetails::from(shillong);
        assert_eq!(details.sources, vec![EmissionSource::Residential]);
        assert_eq!(details.tier, EmissionTier::Low);
        assert!((details.per_capita_tonnes - 2.0 / 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_find_unknown_city() {
        assert!(find(dataset::builtin(), "Atlantis").is_none());
    }
}
