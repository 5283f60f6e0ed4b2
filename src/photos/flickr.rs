//! Flickr photo search.
//!
//! The search call returns photo records without coordinates, so every hit
//! needs a follow-up geo lookup by photo id. Photos whose location cannot be
//! resolved are skipped.

use super::aggregator::PhotoSource;
use super::types::{PhotoCandidate, Provider, ProviderUnavailable};
use crate::config::FlickrKeys;
use crate::geo::{within_radius, Coordinate};
use serde::Deserialize;

const API_URL: &str = "https://api.flickr.com";
const PHOTO_HOST: &str = "https://c2.staticflickr.com";
const SEARCH_ACCURACY: &str = "16";
const SEARCH_CONTENT_TYPE: &str = "4";
const PAGE_SIZE: &str = "500";

pub struct Flickr {
    api_key: String,
    base_url: String,
}

#[derive(Deserialize)]
struct SearchEnvelope {
    photos: SearchPhotos,
}

#[derive(Deserialize)]
struct SearchPhotos {
    #[serde(default)]
    photo: Vec<SearchPhoto>,
}

#[derive(Deserialize)]
struct SearchPhoto {
    id: String,
    secret: String,
    server: String,
    farm: u64,
}

#[derive(Deserialize)]
struct GeoEnvelope {
    photo: GeoPhoto,
}

#[derive(Deserialize)]
struct GeoPhoto {
    location: GeoLocation,
}

#[derive(Deserialize)]
struct GeoLocation {
    latitude: String,
    longitude: String,
}

/// Strip the `jsonFlickrApi(...)` wrapper Flickr adds unless plain JSON is
/// explicitly requested.
fn strip_jsonp(body: &str) -> &str {
    let body = body.trim();
    body.strip_prefix("jsonFlickrApi(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(body)
}

impl Flickr {
    /// Build an adapter when the API key is present; `None` otherwise.
    pub fn from_keys(keys: &FlickrKeys) -> Option<Self> {
        let api_key = keys.credentials()?;
        Some(Self {
            api_key: api_key.to_string(),
            base_url: API_URL.to_string(),
        })
    }

    /// Point the adapter at a different endpoint (for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Second lookup: coordinates for one photo id. `None` when the photo
    /// has no resolvable geo data.
    fn photo_location(&self, photo_id: &str) -> Option<Coordinate> {
        let url = format!("{}/services/rest/", self.base_url);
        let response = ureq::get(&url)
            .query("method", "flickr.photos.geo.getLocation")
            .query("photo_id", photo_id)
            .query("format", "json")
            .query("api_key", &self.api_key)
            .set("User-Agent", crate::USER_AGENT)
            .timeout(crate::REQUEST_TIMEOUT)
            .call()
            .ok()?;
        let body = response.into_string().ok()?;
        let envelope: GeoEnvelope = serde_json::from_str(strip_jsonp(&body)).ok()?;
        let lat: f64 = envelope.photo.location.latitude.parse().ok()?;
        let lon: f64 = envelope.photo.location.longitude.parse().ok()?;
        Coordinate::new(lat, lon).ok()
    }
}

impl PhotoSource for Flickr {
    fn provider(&self) -> Provider {
        Provider::Flickr
    }

    fn fetch(
        &self,
        center: &Coordinate,
        radius_meters: f64,
    ) -> Result<Vec<PhotoCandidate>, ProviderUnavailable> {
        let url = format!("{}/services/rest/", self.base_url);
        let response = ureq::get(&url)
            .query("method", "flickr.photos.search")
            .query("format", "json")
            .query("accuracy", SEARCH_ACCURACY)
            .query("content_type", SEARCH_CONTENT_TYPE)
            .query("lat", &center.lat.to_string())
            .query("lon", &center.lon.to_string())
            .query("radius", &format!("{}", radius_meters / 1000.0))
            .query("per_page", PAGE_SIZE)
            .query("page", "1")
            .query("api_key", &self.api_key)
            .set("User-Agent", crate::USER_AGENT)
            .timeout(crate::REQUEST_TIMEOUT)
            .call()
            .map_err(|e| {
                ProviderUnavailable::new(Provider::Flickr, super::describe_http_error(e))
            })?;

        let body = response.into_string().map_err(|e| {
            ProviderUnavailable::new(Provider::Flickr, format!("unreadable search response: {}", e))
        })?;
        let envelope: SearchEnvelope = serde_json::from_str(strip_jsonp(&body)).map_err(|e| {
            ProviderUnavailable::new(Provider::Flickr, format!("malformed search response: {}", e))
        })?;

        let mut candidates = Vec::new();
        for photo in envelope.photos.photo {
            let coordinate = match self.photo_location(&photo.id) {
                Some(c) => c,
                None => continue, // no resolvable geo data
            };
            if !within_radius(center, &coordinate, radius_meters) {
                continue;
            }
            candidates.push(PhotoCandidate {
                coordinate,
                url: format!(
                    "{}/{}/{}/{}_{}_b.jpg",
                    PHOTO_HOST, photo.farm, photo.server, photo.id, photo.secret
                ),
                provider: Provider::Flickr,
            });
        }
        Ok(candidates)
    }
}
