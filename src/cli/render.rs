//! Text rendering for command output

use serde::Serialize;
use std::fmt::Write;

use crate::air::{AirQualityReport, Pollutant};
use crate::aqi::AqiStatus;
use crate::cities::{CityDetails, CityStatistics, RankedCity, MAP_CENTER, MAP_ZOOM};
use crate::footprint::{CategoryShare, Comparison, FootprintResult, LifestyleInput};

/// Everything the footprint command reports
#[derive(Debug, Clone, Serialize)]
pub struct FootprintReport {
    pub input: LifestyleInput,
    pub result: FootprintResult,
    pub breakdown: Vec<CategoryShare>,
    pub comparison: Comparison,
    pub recommendations: Vec<&'static str>,
}

impl FootprintReport {
    pub fn new(input: LifestyleInput, result: FootprintResult) -> Self {
        Self {
            breakdown: result.breakdown(),
            comparison: result.comparison(),
            recommendations: result.recommendations(),
            input,
            result,
        }
    }
}

/// City statistics with the ranking cut to the requested length
#[derive(Debug, Clone, Serialize)]
pub struct CitiesReport {
    #[serde(flatten)]
    pub statistics: CityStatistics,
    pub ranking: Vec<RankedCity>,
    pub map_center: (f64, f64),
    pub map_zoom: u8,
}

impl CitiesReport {
    pub fn new(statistics: CityStatistics, ranking: Vec<RankedCity>) -> Self {
        Self {
            statistics,
            ranking,
            map_center: MAP_CENTER,
            map_zoom: MAP_ZOOM,
        }
    }
}

fn signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.2}")
    } else {
        format!("{value:.2}")
    }
}

pub fn footprint(report: &FootprintReport) -> String {
    let mut out = String::new();
    let result = &report.result;

    let _ = writeln!(out, "Annual footprint: {:.2} t CO2e/yr", result.total);
    for share in &report.breakdown {
        let _ = writeln!(
            out,
            "  {:<10} {:>6.2} t/yr ({:.1}%)",
            share.category.label(),
            share.tonnes,
            share.percent
        );
    }
    let cmp = &report.comparison;
    let _ = writeln!(
        out,
        "Global average {:.1} t/yr ({}), target {:.1} t/yr ({})",
        cmp.global_average,
        signed(cmp.versus_global_average),
        cmp.target,
        signed(cmp.versus_target)
    );
    let _ = writeln!(out, "\nRecommendations:");
    for rec in &report.recommendations {
        let _ = writeln!(out, "  - {rec}");
    }
    out
}

pub fn aqi(pm25: f64, status: &AqiStatus) -> String {
    match status {
        AqiStatus::Available { aqi, band } => format!(
            "PM2.5 {pm25:.1} µg/m³ -> AQI {aqi} ({}, {})\n",
            band.label(),
            band.color()
        ),
        AqiStatus::Unavailable => "AQI unavailable: no PM2.5 sample\n".to_string(),
    }
}

pub fn air_quality(report: &AirQualityReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Location: {} ({} stations within 20 km)",
        report.coordinates, report.station_count
    );
    match report.aqi {
        AqiStatus::Available { aqi, band } => {
            let _ = writeln!(out, "AQI: {aqi} {}", band.label());
        }
        AqiStatus::Unavailable => {
            let _ = writeln!(out, "AQI: — (no PM2.5 data nearby)");
        }
    }
    for pollutant in Pollutant::ALL {
        match report.pollutants.get(pollutant) {
            Some(value) => {
                let _ = writeln!(
                    out,
                    "  {:<6} {:>8.1} {}",
                    pollutant.label(),
                    value,
                    pollutant.unit()
                );
            }
            None => {
                let _ = writeln!(out, "  {:<6} {:>8}", pollutant.label(), "—");
            }
        }
    }
    let _ = writeln!(
        out,
        "Source: OpenAQ, fetched {}. AQI approximated from PM2.5 using US EPA breakpoints.",
        report.fetched_at.format("%Y-%m-%d %H:%M UTC")
    );
    out
}

pub fn cities(report: &CitiesReport) -> String {
    let mut out = String::new();
    let stats = &report.statistics;
    let _ = writeln!(out, "Cities:         {}", stats.city_count);
    let _ = writeln!(out, "Combined:       {:.0} Mt/yr", stats.combined_megatonnes);
    let _ = writeln!(
        out,
        "Avg per capita: {:.2} t",
        stats.average_per_capita_tonnes
    );
    let _ = writeln!(out, "\nTop {} emitting cities:", report.ranking.len());
    for city in &report.ranking {
        let tier = stats
            .tiers
            .get(&city.name)
            .map(|t| t.label())
            .unwrap_or("-");
        let _ = writeln!(
            out,
            "  {:>2}. {:<14} {:>5} Mt  {:>5.2} t/person  [{}]",
            city.rank, city.name, city.annual_emissions_mt, city.per_capita_tonnes, tier
        );
    }
    out
}

pub fn city(details: &CityDetails) -> String {
    let sources: Vec<String> = details.sources.iter().map(|s| s.to_string()).collect();
    let mut out = String::new();
    let _ = writeln!(out, "{}", details.name);
    let _ = writeln!(
        out,
        "  Location:   {:.4}, {:.4}",
        details.latitude, details.longitude
    );
    let _ = writeln!(out, "  Total:      {} Mt/yr", details.annual_emissions_mt);
    let _ = writeln!(out, "  Population: {} M", details.population_millions);
    let _ = writeln!(out, "  Per capita: {:.2} t", details.per_capita_tonnes);
    let _ = writeln!(out, "  Sources:    {}", sources.join(", "));
    let _ = writeln!(
        out,
        "  Tier:       {} ({})",
        details.tier.label(),
        details.tier.color()
    );
    out
}
