//! FourSquare venue search.
//!
//! Two-step: a venue search around the center, then a photo listing per
//! in-radius venue. Every photo of a venue shares the venue's resolved
//! coordinate, so one venue can feed many candidates into one group.

use super::aggregator::PhotoSource;
use super::types::{PhotoCandidate, Provider, ProviderUnavailable};
use crate::config::FourSquareKeys;
use crate::geo::{within_radius, Coordinate};
use serde::Deserialize;

const API_URL: &str = "https://api.foursquare.com";
/// Version date the v2 API requires on every call.
const API_VERSION: &str = "20130815";
const VENUE_LIMIT: &str = "50";
const PHOTO_LIMIT: &str = "200";

pub struct FourSquare {
    client_id: String,
    client_secret: String,
    base_url: String,
}

// ─── Wire format ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct VenueSearchEnvelope {
    response: VenueSearchResponse,
}

#[derive(Deserialize)]
struct VenueSearchResponse {
    #[serde(default)]
    venues: Vec<Venue>,
}

#[derive(Deserialize)]
struct Venue {
    id: String,
    location: VenueLocation,
}

#[derive(Deserialize)]
struct VenueLocation {
    lat: Option<f64>,
    lng: Option<f64>,
    #[serde(default, rename = "labeledLatLngs")]
    labeled_lat_lngs: Vec<LabeledLatLng>,
}

#[derive(Deserialize)]
struct LabeledLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct PhotoListEnvelope {
    response: PhotoListResponse,
}

#[derive(Deserialize)]
struct PhotoListResponse {
    photos: PhotoList,
}

#[derive(Deserialize)]
struct PhotoList {
    #[serde(default)]
    items: Vec<PhotoItem>,
}

#[derive(Deserialize)]
struct PhotoItem {
    prefix: String,
    suffix: String,
}

impl VenueLocation {
    /// The labeled coordinate when present, else the venue's top-level
    /// location. `None` when neither yields a valid coordinate.
    fn coordinate(&self) -> Option<Coordinate> {
        if let Some(labeled) = self.labeled_lat_lngs.first() {
            if let Ok(c) = Coordinate::new(labeled.lat, labeled.lng) {
                return Some(c);
            }
        }
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng).ok(),
            _ => None,
        }
    }
}

// ─── Adapter ─────────────────────────────────────────────────────

impl FourSquare {
    /// Build an adapter when both keys are present; `None` otherwise.
    pub fn from_keys(keys: &FourSquareKeys) -> Option<Self> {
        let (client_id, client_secret) = keys.credentials()?;
        Some(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            base_url: API_URL.to_string(),
        })
    }

    /// Point the adapter at a different endpoint (for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Photo listing for one in-radius venue. A failed listing means the
    /// venue contributes nothing; it does not fail the whole fetch.
    fn append_venue_photos(
        &self,
        venue_id: &str,
        coordinate: Coordinate,
        out: &mut Vec<PhotoCandidate>,
    ) {
        let url = format!("{}/v2/venues/{}/photos", self.base_url, venue_id);
        let response = match ureq::get(&url)
            .query("limit", PHOTO_LIMIT)
            .query("offset", "1")
            .query("client_id", &self.client_id)
            .query("client_secret", &self.client_secret)
            .query("v", API_VERSION)
            .set("User-Agent", crate::USER_AGENT)
            .timeout(crate::REQUEST_TIMEOUT)
            .call()
        {
            Ok(r) => r,
            Err(_) => return,
        };

        let envelope: PhotoListEnvelope = match response.into_json() {
            Ok(e) => e,
            Err(_) => return,
        };

        for item in envelope.response.photos.items {
            out.push(PhotoCandidate {
                coordinate,
                url: format!("{}original{}", item.prefix, item.suffix),
                provider: Provider::FourSquare,
            });
        }
    }
}

impl PhotoSource for FourSquare {
    fn provider(&self) -> Provider {
        Provider::FourSquare
    }

    fn fetch(
        &self,
        center: &Coordinate,
        radius_meters: f64,
    ) -> Result<Vec<PhotoCandidate>, ProviderUnavailable> {
        let url = format!("{}/v2/venues/search", self.base_url);
        let response = ureq::get(&url)
            .query("ll", &format!("{},{}", center.lat, center.lon))
            .query("limit", VENUE_LIMIT)
            .query("radius", &format!("{}", radius_meters))
            .query("client_id", &self.client_id)
            .query("client_secret", &self.client_secret)
            .query("v", API_VERSION)
            .set("User-Agent", crate::USER_AGENT)
            .timeout(crate::REQUEST_TIMEOUT)
            .call()
            .map_err(|e| {
                ProviderUnavailable::new(Provider::FourSquare, super::describe_http_error(e))
            })?;

        let envelope: VenueSearchEnvelope = response.into_json().map_err(|e| {
            ProviderUnavailable::new(
                Provider::FourSquare,
                format!("malformed search response: {}", e),
            )
        })?;

        let mut candidates = Vec::new();
        for venue in envelope.response.venues {
            let coordinate = match venue.location.coordinate() {
                Some(c) => c,
                None => continue, // venue without usable geo data
            };
            if !within_radius(center, &coordinate, radius_meters) {
                continue;
            }
            self.append_venue_photos(&venue.id, coordinate, &mut candidates);
        }
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn adapter(base_url: &str) -> FourSquare {
        let keys = FourSquareKeys {
            client_id: Some("id".into()),
            client_secret: Some("secret".into()),
        };
        FourSquare::from_keys(&keys).unwrap().with_base_url(base_url)
    }

    fn center() -> Coordinate {
        Coordinate::new(40.7128, -74.0060).unwrap()
    }

    #[test]
    fn test_from_keys_requires_both() {
        assert!(FourSquare::from_keys(&FourSquareKeys::default()).is_none());
        assert!(FourSquare::from_keys(&FourSquareKeys {
            client_id: Some("id".into()),
            client_secret: None,
        })
        .is_none());
    }

    #[test]
    fn test_fetch_in_radius_venue_photos() {
        // One venue inside the 500 m radius with two photos, one venue well
        // outside: two candidates at one coordinate, nothing from the far
        // venue (its photo listing is never requested).
        let mut server = mockito::Server::new();
        let _search = server
            .mock("GET", "/v2/venues/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"response": {"venues": [
                    {"id": "v1", "location": {"lat": 40.7130, "lng": -74.0061}},
                    {"id": "v2", "location": {"lat": 40.7500, "lng": -74.0500}}
                ]}}"#,
            )
            .create();
        let _photos = server
            .mock("GET", "/v2/venues/v1/photos")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"response": {"photos": {"count": 2, "items": [
                    {"prefix": "https://igx.4sqi.net/img/general/", "suffix": "/photo1.jpg"},
                    {"prefix": "https://igx.4sqi.net/img/general/", "suffix": "/photo2.jpg"}
                ]}}}"#,
            )
            .create();
        let far_photos = server
            .mock("GET", "/v2/venues/v2/photos")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"response": {"photos": {"count": 0, "items": []}}}"#)
            .expect(0)
            .create();

        let candidates = adapter(&server.url()).fetch(&center(), 500.0).unwrap();
        assert_eq!(candidates.len(), 2);
        let expected = Coordinate::new(40.7130, -74.0061).unwrap();
        assert!(candidates.iter().all(|c| c.coordinate == expected));
        assert_eq!(
            candidates[0].url,
            "https://igx.4sqi.net/img/general/original/photo1.jpg"
        );
        assert_eq!(
            candidates[1].url,
            "https://igx.4sqi.net/img/general/original/photo2.jpg"
        );
        far_photos.assert();
    }

    #[test]
    fn test_fetch_prefers_labeled_coordinate() {
        let mut server = mockito::Server::new();
        let _search = server
            .mock("GET", "/v2/venues/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"response": {"venues": [
                    {"id": "v1", "location": {
                        "lat": 40.7200, "lng": -74.0200,
                        "labeledLatLngs": [{"label": "display", "lat": 40.7129, "lng": -74.0062}]
                    }}
                ]}}"#,
            )
            .create();
        let _photos = server
            .mock("GET", "/v2/venues/v1/photos")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"response": {"photos": {"count": 1, "items": [
                    {"prefix": "https://p/", "suffix": "/1.jpg"}
                ]}}}"#,
            )
            .create();

        let candidates = adapter(&server.url()).fetch(&center(), 500.0).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0].coordinate,
            Coordinate::new(40.7129, -74.0062).unwrap()
        );
    }

    #[test]
    fn test_fetch_skips_venue_without_geo() {
        let mut server = mockito::Server::new();
        let _search = server
            .mock("GET", "/v2/venues/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": {"venues": [{"id": "v1", "location": {}}]}}"#)
            .create();

        let candidates = adapter(&server.url()).fetch(&center(), 500.0).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_fetch_search_error_is_unavailable() {
        let mut server = mockito::Server::new();
        let _search = server
            .mock("GET", "/v2/venues/search")
            .match_query(Matcher::Any)
            .with_status(500)
            .create();

        let err = adapter(&server.url()).fetch(&center(), 500.0).unwrap_err();
        assert_eq!(err.provider, Provider::FourSquare);
        assert!(err.reason.contains("500"));
    }

    #[test]
    fn test_fetch_failed_photo_listing_skips_venue_only() {
        let mut server = mockito::Server::new();
        let _search = server
            .mock("GET", "/v2/venues/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"response": {"venues": [
                    {"id": "v1", "location": {"lat": 40.7130, "lng": -74.0061}}
                ]}}"#,
            )
            .create();
        let _photos = server
            .mock("GET", "/v2/venues/v1/photos")
            .match_query(Matcher::Any)
            .with_status(404)
            .create();

        let candidates = adapter(&server.url()).fetch(&center(), 500.0).unwrap();
        assert!(candidates.is_empty());
    }
}
