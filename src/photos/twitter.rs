//! Twitter search.
//!
//! A single call: recent tweets around the center via the `geocode` search
//! operator, retweets excluded. Only tweets carrying both a point geo and
//! native media are kept, and only the first media attachment per tweet.

use super::aggregator::PhotoSource;
use super::types::{PhotoCandidate, Provider, ProviderUnavailable};
use crate::config::TwitterKeys;
use crate::geo::{within_radius, Coordinate};
use serde::Deserialize;

const API_URL: &str = "https://api.twitter.com";
const RESULT_COUNT: &str = "100";

pub struct Twitter {
    bearer_token: String,
    base_url: String,
}

#[derive(Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    statuses: Vec<Tweet>,
}

#[derive(Deserialize)]
struct Tweet {
    #[serde(default)]
    geo: Option<TweetGeo>,
    #[serde(default)]
    entities: TweetEntities,
}

#[derive(Deserialize)]
struct TweetGeo {
    /// `[lat, lon]` for point geometries.
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Deserialize, Default)]
struct TweetEntities {
    #[serde(default)]
    media: Vec<TweetMedia>,
}

#[derive(Deserialize)]
struct TweetMedia {
    media_url: String,
}

impl Twitter {
    /// Build an adapter when all four tokens are present; `None` otherwise.
    ///
    /// The search call itself authenticates with a bearer header; the full
    /// signed OAuth flow is out of scope, but configuration still demands
    /// the complete token set.
    pub fn from_keys(keys: &TwitterKeys) -> Option<Self> {
        let credentials = keys.credentials()?;
        Some(Self {
            bearer_token: credentials.oauth_token.to_string(),
            base_url: API_URL.to_string(),
        })
    }

    /// Point the adapter at a different endpoint (for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl PhotoSource for Twitter {
    fn provider(&self) -> Provider {
        Provider::Twitter
    }

    fn fetch(
        &self,
        center: &Coordinate,
        radius_meters: f64,
    ) -> Result<Vec<PhotoCandidate>, ProviderUnavailable> {
        let query = format!(
            "geocode:{},{},{}km -RT",
            center.lat,
            center.lon,
            radius_meters / 1000.0
        );
        let url = format!("{}/1.1/search/tweets.json", self.base_url);
        let response = ureq::get(&url)
            .query("q", &query)
            .query("count", RESULT_COUNT)
            .set("Authorization", &format!("Bearer {}", self.bearer_token))
            .set("User-Agent", crate::USER_AGENT)
            .timeout(crate::REQUEST_TIMEOUT)
            .call()
            .map_err(|e| {
                ProviderUnavailable::new(Provider::Twitter, super::describe_http_error(e))
            })?;

        let envelope: SearchEnvelope = response.into_json().map_err(|e| {
            ProviderUnavailable::new(Provider::Twitter, format!("malformed search response: {}", e))
        })?;

        let mut candidates = Vec::new();
        for tweet in envelope.statuses {
            let geo = match tweet.geo {
                Some(g) => g,
                None => continue, // untagged tweet
            };
            let media_url = match tweet.entities.media.first() {
                Some(m) => m.media_url.clone(),
                None => continue, // no native media
            };
            if geo.coordinates.len() != 2 {
                continue;
            }
            let coordinate = match Coordinate::new(geo.coordinates[0], geo.coordinates[1]) {
                Ok(c) => c,
                Err(_) => continue,
            };
            if !within_radius(center, &coordinate, radius_meters) {
                continue;
            }
            candidates.push(PhotoCandidate {
                coordinate,
                url: media_url,
                provider: Provider::Twitter,
            });
        }
        Ok(candidates)
    }
}
