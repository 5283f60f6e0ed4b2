//! Photo collection subsystem.
//!
//! One adapter per service (FourSquare, Flickr, Twitter) pulls located
//! photos near a center point and discards anything outside the search
//! radius as it ingests results; the aggregator then merges each adapter's
//! candidates into per-coordinate groups.

pub mod aggregator;
pub mod flickr;
pub mod foursquare;
pub mod twitter;
pub mod types;

pub use aggregator::{group_by_coordinate, Aggregator, PhotoSource, RunReport};
pub use flickr::Flickr;
pub use foursquare::FourSquare;
pub use twitter::Twitter;
pub use types::{PhotoCandidate, PhotoGroup, Provider, ProviderReport, ProviderUnavailable};

/// Human-readable reason for a failed search call.
pub(crate) fn describe_http_error(err: ureq::Error) -> String {
    match err {
        ureq::Error::Status(code, _) => format!("search endpoint returned HTTP {}", code),
        other => other.to_string(),
    }
}
