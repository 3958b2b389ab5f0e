//! Geolocation abstraction
//!
//! A [`LocationProvider`] supplies the coordinates air quality is looked up
//! for. Waits are bounded; every failure surfaces as
//! [`Error::LocationUnavailable`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};

/// Longest wait for a position fix
pub const LOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// A point on the globe in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidInput(format!(
                "latitude must be within [-90, 90], got {latitude}"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidInput(format!(
                "longitude must be within [-180, 180], got {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}, {:.3}", self.latitude, self.longitude)
    }
}

/// Source of the device's current position
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Resolve the current position.
    ///
    /// Implementations report denial or missing capability as
    /// [`Error::LocationUnavailable`].
    async fn current_position(&self) -> Result<Coordinates>;
}

/// Always reports the same coordinates
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    coordinates: Coordinates,
}

impl FixedLocation {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates> {
        Ok(self.coordinates)
    }
}

/// Stand-in when no location capability is available
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationProvider for NoLocation {
    async fn current_position(&self) -> Result<Coordinates> {
        Err(Error::LocationUnavailable(
            "Geolocation not supported".to_string(),
        ))
    }
}

/// Ask `provider` for a position, giving up after `timeout`
pub async fn locate(provider: &dyn LocationProvider, timeout: Duration) -> Result<Coordinates> {
    match tokio::time::timeout(timeout, provider.current_position()).await {
        Ok(Ok(coordinates)) => {
            debug!("Resolved location {}", coordinates);
            Ok(coordinates)
        }
        Ok(Err(Error::LocationUnavailable(msg))) => Err(Error::LocationUnavailable(msg)),
        Ok(Err(other)) => Err(Error::LocationUnavailable(other.to_string())),
        Err(_) => Err(Error::LocationUnavailable(format!(
            "Timed out after {}s waiting for a position",
            timeout.as_secs_f64()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowLocation;

    #[async_trait]
    impl LocationProvider for SlowLocation {
        async fn current_position(&self) -> Result<Coordinates> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Coordinates::new(0.0, 0.0)
        }
    }

    struct DeniedLocation;

    #[async_trait]
    impl LocationProvider for DeniedLocation {
        async fn current_position(&self) -> Result<Coordinates> {
            Err(Error::LocationUnavailable(
                "Location permission denied".to_string(),
            ))
        }
    }

    #[test]
    fn test_coordinates_validation() {
        assert!(Coordinates::new(28.6, 77.2).is_ok());
        assert!(Coordinates::new(-90.0, 180.0).is_ok());
        assert!(Coordinates::new(90.1, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_coordinates_display() {
        let coords = Coordinates::new(28.61394, 77.20902).unwrap();
        assert_eq!(coords.to_string(), "28.614, 77.209");
    }

    #[tokio::test]
    async fn test_fixed_location_resolves() {
        let coords = Coordinates::new(12.97, 77.59).unwrap();
        let provider = FixedLocation::new(coords);
        assert_eq!(locate(&provider, LOCATION_TIMEOUT).await.unwrap(), coords);
    }

    #[tokio::test]
    async fn test_missing_capability() {
        let err = locate(&NoLocation, LOCATION_TIMEOUT).await.unwrap_err();
        assert!(matches!(err, Error::LocationUnavailable(ref m) if m.contains("not supported")));
    }

    #[tokio::test]
    async fn test_denied_permission_is_surfaced() {
        let err = locate(&DeniedLocation, LOCATION_TIMEOUT).await.unwrap_err();
        assert!(matches!(err, Error::LocationUnavailable(ref m) if m.contains("denied")));
    }

    #[tokio::test]
    async fn test_timeout_is_location_unavailable() {
        let err = locate(&SlowLocation, Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LocationUnavailable(ref m) if m.contains("Timed out")));
    }
}
