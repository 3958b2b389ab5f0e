//! Built-in city emissions dataset and loading of replacement datasets

use once_cell::sync::Lazy;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

use super::CityRecord;
use super::EmissionSource::{Industry, Power, Residential, Transport};
use crate::error::{Error, Result};

/// (name, lat, lon, emissions Mt/yr, population millions, sources)
type Seed = (&'static str, f64, f64, f64, f64, &'static [super::EmissionSource]);

// Values are illustrative.
const SEEDS: [Seed; 25] = [
    // North
    ("Delhi", 28.6139, 77.2090, 80.0, 32.0, &[Transport, Industry, Power]),
    ("Chandigarh", 30.7333, 76.7794, 5.0, 1.1, &[Transport, Residential]),
    ("Lucknow", 26.8467, 80.9462, 10.0, 3.4, &[Transport, Residential]),
    ("Jaipur", 26.9124, 75.7873, 9.0, 3.1, &[Transport, Industry]),
    ("Amritsar", 31.6340, 74.8723, 6.0, 1.5, &[Transport, Residential]),
    // South
    ("Bangalore", 12.9716, 77.5946, 25.0, 13.0, &[Transport, Industry, Power]),
    ("Chennai", 13.0827, 80.2707, 22.0, 11.5, &[Transport, Power]),
    ("Hyderabad", 17.3850, 78.4867, 23.0, 10.5, &[Transport, Industry]),
    ("Kochi", 9.9312, 76.2673, 5.0, 0.7, &[Transport, Residential]),
    ("Coimbatore", 11.0168, 76.9558, 6.0, 2.2, &[Industry, Transport]),
    ("Visakhapatnam", 17.6868, 83.2185, 8.0, 2.3, &[Industry, Power]),
    // West
    ("Mumbai", 19.0760, 72.8777, 30.0, 21.0, &[Transport, Industry, Power]),
    ("Pune", 18.5204, 73.8567, 12.0, 7.6, &[Transport, Industry]),
    ("Ahmedabad", 23.0225, 72.5714, 14.0, 8.2, &[Industry, Power]),
    ("Surat", 21.1702, 72.8311, 13.0, 7.0, &[Industry, Transport]),
    ("Nagpur", 21.1458, 79.0882, 7.0, 3.0, &[Transport, Residential]),
    // East
    ("Kolkata", 22.5726, 88.3639, 20.0, 15.0, &[Transport, Power, Industry]),
    ("Patna", 25.5941, 85.1376, 7.0, 2.5, &[Transport, Residential]),
    ("Bhubaneswar", 20.2961, 85.8245, 5.0, 1.0, &[Industry, Power]),
    ("Ranchi", 23.3441, 85.3096, 4.0, 1.5, &[Industry, Residential]),
    // Northeast
    ("Guwahati", 26.1445, 91.7362, 6.0, 1.1, &[Transport, Residential]),
    ("Shillong", 25.5788, 91.8933, 2.0, 0.3, &[Residential]),
    // Central
    ("Indore", 22.7196, 75.8577, 8.0, 3.2, &[Transport, Industry]),
    ("Bhopal", 23.2599, 77.4126, 6.0, 2.6, &[Transport, Residential]),
    ("Raipur", 21.2514, 81.6296, 7.0, 1.9, &[Power, Industry]),
];

static BUILTIN: Lazy<Vec<CityRecord>> = Lazy::new(|| {
    SEEDS
        .iter()
        .map(|&(name, latitude, longitude, emissions, population, sources)| CityRecord {
            name: name.to_string(),
            latitude,
            longitude,
            annual_emissions_mt: emissions,
            population_millions: population,
            sources: sources.iter().copied().collect::<BTreeSet<_>>(),
        })
        .collect()
});

/// The 25 built-in Indian cities, in dataset order
pub fn builtin() -> &'static [CityRecord] {
    &BUILTIN
}

/// Parse a JSON array of city records, validating every entry.
///
/// Names must be unique, ignoring case and surrounding whitespace, since
/// tiers and lookups are keyed by name.
pub fn from_json(content: &str) -> Result<Vec<CityRecord>> {
    let records: Vec<CityRecord> = serde_json::from_str(content)?;
    let mut seen = BTreeSet::new();
    for record in &records {
        record.validate()?;
        if !seen.insert(record.name.trim().to_lowercase()) {
            return Err(Error::InvalidInput(format!(
                "duplicate city name '{}'",
                record.name.trim()
            )));
        }
    }
    Ok(records)
}

/// Load a replacement dataset from a JSON file
pub fn load(path: &Path) -> Result<Vec<CityRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read city dataset {}: {e}", path.display()))
    })?;
    let records = from_json(&content)?;
    debug!("Loaded {} cities from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_25_valid_cities() {
        let cities = builtin();
        assert_eq!(cities.len(), 25);
        for city in cities {
            city.validate().unwrap();
        }
        assert_eq!(cities[0].name, "Delhi");
        assert_eq!(cities[24].name, "Raipur");
    }

    #[test]
    fn test_builtin_sources_are_sets() {
        let coimbatore = builtin().iter().find(|c| c.name == "Coimbatore").unwrap();
        assert_eq!(coimbatore.sources.len(), 2);
        assert!(coimbatore.sources.contains(&Industry));
        assert!(coimbatore.sources.contains(&Transport));
    }

    #[test]
    fn test_from_json_round_trips_sources() {
        let json = r#"[
            {"name": "Testville", "latitude": 10.0, "longitude": 70.0,
             "annual_emissions_mt": 3.0, "population_millions": 1.5,
             "sources": ["power", "transport"]}
        ]"#;
        let records = from_json(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].per_capita_tonnes(), 2.0);
        assert!(records[0].sources.contains(&Power));
    }

    #[test]
    fn test_from_json_rejects_zero_population() {
        let json = r#"[
            {"name": "Ghost", "latitude": 10.0, "longitude": 70.0,
             "annual_emissions_mt": 3.0, "population_millions": 0.0}
        ]"#;
        assert!(matches!(from_json(json), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_from_json_rejects_duplicate_names() {
        let json = r#"[
            {"name": "Delhi", "latitude": 28.6, "longitude": 77.2,
             "annual_emissions_mt": 80.0, "population_millions": 32.0},
            {"name": " delhi ", "latitude": 28.7, "longitude": 77.1,
             "annual_emissions_mt": 2.0, "population_millions": 1.0}
        ]"#;
        let err = from_json(json).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref m) if m.contains("duplicate city name 'delhi'")));
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let names: BTreeSet<String> = builtin().iter().map(|c| c.name.to_lowercase()).collect();
        assert_eq!(names.len(), builtin().len());
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = load(Path::new("/nonexistent/cities.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
