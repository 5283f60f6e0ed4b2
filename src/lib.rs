//! geopix — search physical locations for geotagged photos.
//!
//! Geocodes a street address, asks FourSquare, Flickr, and Twitter for
//! photos taken nearby, filters them to a search radius, groups photos that
//! share a coordinate, and renders the groups as markers on a Leaflet map.

use std::time::Duration;

pub mod config;
pub mod geo;
pub mod geocode;
pub mod map;
pub mod photos;

/// User-Agent sent with every outbound request.
pub(crate) const USER_AGENT: &str =
    concat!("geopix/", env!("CARGO_PKG_VERSION"), " (geotagged photo search)");

/// Bounded timeout for provider calls. Expiry surfaces as provider
/// unavailability rather than an unbounded hang.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
