//! Current air-quality result slot
//!
//! The monitor owns the single "current result" for the air-quality view.
//! Every fetch takes a ticket from a monotonically increasing sequence; when it
//! completes, its result is applied only if no newer fetch has started since.
//! Superseded completions are dropped instead of overwriting newer state.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::location::{self, Coordinates, LocationProvider, LOCATION_TIMEOUT};
use super::openaq::AirQualityProvider;
use super::summary::AirQualityReport;
use crate::error::{Error, Result};

/// What the air-quality view currently shows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum AirQualityState {
    #[default]
    Idle,
    Loading,
    Ready(AirQualityReport),
    Failed(String),
}

/// Result of a completed fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The report became the current result
    Applied(AirQualityReport),
    /// A newer fetch started before this one finished; nothing was applied
    Superseded,
}

impl FetchOutcome {
    pub fn report(&self) -> Option<&AirQualityReport> {
        match self {
            FetchOutcome::Applied(report) => Some(report),
            FetchOutcome::Superseded => None,
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    coordinates: Option<Coordinates>,
    state: AirQualityState,
}

pub struct AirQualityMonitor {
    provider: Arc<dyn AirQualityProvider>,
    location: Arc<dyn LocationProvider>,
    location_timeout: Duration,
    sequence: AtomicU64,
    slot: Mutex<Slot>,
}

impl AirQualityMonitor {
    pub fn new(provider: Arc<dyn AirQualityProvider>, location: Arc<dyn LocationProvider>) -> Self {
        Self {
            provider,
            location,
            location_timeout: LOCATION_TIMEOUT,
            sequence: AtomicU64::new(0),
            slot: Mutex::new(Slot::default()),
        }
    }

    pub fn with_location_timeout(mut self, timeout: Duration) -> Self {
        self.location_timeout = timeout;
        self
    }

    pub async fn state(&self) -> AirQualityState {
        self.slot.lock().await.state.clone()
    }

    /// Coordinates of the most recent lookup, if any
    pub async fn coordinates(&self) -> Option<Coordinates> {
        self.slot.lock().await.coordinates
    }

    /// Resolve the current position, then fetch air quality for it.
    ///
    /// The lookup counts as a new request from the start, so a location
    /// failure supersedes any fetch still in flight.
    pub async fn locate(&self) -> Result<FetchOutcome> {
        let ticket = self.begin(None).await;
        match location::locate(self.location.as_ref(), self.location_timeout).await {
            Ok(coordinates) => {
                {
                    let mut slot = self.slot.lock().await;
                    if self.is_latest(ticket) {
                        slot.coordinates = Some(coordinates);
                    }
                }
                self.complete(ticket, coordinates).await
            }
            Err(e) => self.settle(ticket, Err(e)).await,
        }
    }

    /// Re-fetch for the last known coordinates
    pub async fn refresh(&self) -> Result<FetchOutcome> {
        let coordinates = self.coordinates().await.ok_or_else(|| {
            Error::LocationUnavailable("No location yet; locate before refreshing".to_string())
        })?;
        self.fetch(coordinates).await
    }

    /// Fetch air quality for `coordinates` into the current slot
    pub async fn fetch(&self, coordinates: Coordinates) -> Result<FetchOutcome> {
        let ticket = self.begin(Some(coordinates)).await;
        self.complete(ticket, coordinates).await
    }

    /// Issue a ticket and mark the slot as loading.
    ///
    /// The ticket is taken under the slot lock so ticket order and slot
    /// updates agree.
    async fn begin(&self, coordinates: Option<Coordinates>) -> u64 {
        let mut slot = self.slot.lock().await;
        let ticket = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        if coordinates.is_some() {
            slot.coordinates = coordinates;
        }
        slot.state = AirQualityState::Loading;
        ticket
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) == ticket
    }

    async fn complete(&self, ticket: u64, coordinates: Coordinates) -> Result<FetchOutcome> {
        debug!("Air quality request #{} for {}", ticket, coordinates);
        let result = match self.provider.latest(coordinates).await {
            Ok(response) => AirQualityReport::from_response(coordinates, &response),
            Err(e) => Err(e),
        };
        self.settle(ticket, result).await
    }

    /// Apply a finished request if it is still the newest one
    async fn settle(&self, ticket: u64, result: Result<AirQualityReport>) -> Result<FetchOutcome> {
        let mut slot = self.slot.lock().await;
        let latest = self.sequence.load(Ordering::SeqCst);
        if ticket != latest {
            warn!(
                "Discarding air quality request #{} superseded by #{}",
                ticket, latest
            );
            return Ok(FetchOutcome::Superseded);
        }

        match result {
            Ok(report) => {
                info!(
                    "Air quality for {}: {:?} from {} stations",
                    report.coordinates,
                    report.aqi.aqi(),
                    report.station_count
                );
                slot.state = AirQualityState::Ready(report.clone());
                Ok(FetchOutcome::Applied(report))
            }
            Err(e) => {
                slot.state = AirQualityState::Failed(e.to_string());
                Err(e)
            }
        }
    }
}
