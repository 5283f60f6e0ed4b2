//! Street-address geocoding via OpenStreetMap Nominatim.
//!
//! A failed lookup is fatal to the whole run: without a center coordinate
//! there is nothing to search.

use crate::geo::Coordinate;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub enum GeocodeError {
    Network(String),
    InvalidResponse(String),
    NotFound(String),
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "geocoder network error: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "invalid geocoder response: {}", msg),
            Self::NotFound(addr) => write!(f, "address not found: '{}'", addr),
        }
    }
}

impl std::error::Error for GeocodeError {}

#[derive(Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

pub struct Geocoder {
    base_url: String,
}

impl Geocoder {
    pub fn new() -> Self {
        Self {
            base_url: NOMINATIM_URL.to_string(),
        }
    }

    /// Point the geocoder at a different endpoint (for testing).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Resolve a free-text address to coordinates.
    pub fn lookup(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        let response = ureq::get(&url)
            .query("q", address)
            .query("format", "json")
            .query("limit", "1")
            .set("User-Agent", crate::USER_AGENT)
            .timeout(LOOKUP_TIMEOUT)
            .call()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        let results: Vec<SearchResult> = response
            .into_json()
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        let top = results
            .first()
            .ok_or_else(|| GeocodeError::NotFound(address.to_string()))?;

        let lat: f64 = top
            .lat
            .parse()
            .map_err(|_| GeocodeError::InvalidResponse(format!("unparseable latitude '{}'", top.lat)))?;
        let lon: f64 = top
            .lon
            .parse()
            .map_err(|_| GeocodeError::InvalidResponse(format!("unparseable longitude '{}'", top.lon)))?;

        Coordinate::new(lat, lon).map_err(|e| GeocodeError::InvalidResponse(e.to_string()))
    }
}

impl Default for Geocoder {
    fn default() -> Self {
        Self::new()
    }
}
