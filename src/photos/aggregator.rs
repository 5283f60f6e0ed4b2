//! Runs the configured providers one at a time and merges each one's
//! candidates into per-coordinate photo groups.

use super::types::{PhotoCandidate, PhotoGroup, Provider, ProviderReport, ProviderUnavailable};
use super::{Flickr, FourSquare, Twitter};
use crate::config::ApiKeys;
use crate::geo::Coordinate;

/// One source of located photos.
///
/// Implementations query a single external service and return candidates
/// already filtered to the search radius.
pub trait PhotoSource {
    fn provider(&self) -> Provider;
    fn fetch(
        &self,
        center: &Coordinate,
        radius_meters: f64,
    ) -> Result<Vec<PhotoCandidate>, ProviderUnavailable>;
}

/// Per-provider outcomes of a full run, in query order.
#[derive(Debug)]
pub struct RunReport {
    outcomes: Vec<(Provider, ProviderReport)>,
}

impl RunReport {
    pub fn new(outcomes: Vec<(Provider, ProviderReport)>) -> Self {
        Self { outcomes }
    }

    pub fn outcome(&self, provider: Provider) -> Option<&ProviderReport> {
        self.outcomes
            .iter()
            .find(|(p, _)| *p == provider)
            .map(|(_, report)| report)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Provider, &ProviderReport)> {
        self.outcomes.iter().map(|(p, report)| (*p, report))
    }

    /// All groups across providers, in query order.
    pub fn groups(&self) -> impl Iterator<Item = &PhotoGroup> {
        self.outcomes.iter().flat_map(|(_, r)| r.groups().iter())
    }

    /// True when at least one provider produced at least one group.
    pub fn has_photos(&self) -> bool {
        self.groups().next().is_some()
    }
}

/// Queries each configured provider in turn.
pub struct Aggregator {
    sources: Vec<(Provider, Option<Box<dyn PhotoSource>>)>,
}

impl Aggregator {
    /// Build adapters for every fully configured provider. Providers with
    /// missing or partial keys get an empty slot and are never queried.
    pub fn from_keys(keys: &ApiKeys) -> Self {
        let sources: Vec<(Provider, Option<Box<dyn PhotoSource>>)> = vec![
            (
                Provider::FourSquare,
                FourSquare::from_keys(&keys.foursquare)
                    .map(|s| Box::new(s) as Box<dyn PhotoSource>),
            ),
            (
                Provider::Flickr,
                Flickr::from_keys(&keys.flickr).map(|s| Box::new(s) as Box<dyn PhotoSource>),
            ),
            (
                Provider::Twitter,
                Twitter::from_keys(&keys.twitter).map(|s| Box::new(s) as Box<dyn PhotoSource>),
            ),
        ];
        Self { sources }
    }

    /// Build from explicit sources, `None` marking a provider without
    /// credentials (for testing and custom setups).
    pub fn from_sources(sources: Vec<(Provider, Option<Box<dyn PhotoSource>>)>) -> Self {
        Self { sources }
    }

    /// Query providers sequentially and group each one's candidates.
    ///
    /// A failing provider degrades to [`ProviderReport::Unavailable`]
    /// without aborting the others.
    pub fn run(&self, center: &Coordinate, radius_meters: f64) -> RunReport {
        let outcomes = self
            .sources
            .iter()
            .map(|(provider, source)| {
                let report = match source {
                    None => ProviderReport::NotConfigured,
                    Some(source) => match source.fetch(center, radius_meters) {
                        Ok(candidates) => {
                            ProviderReport::Collected(group_by_coordinate(candidates))
                        }
                        Err(err) => ProviderReport::Unavailable(err.reason),
                    },
                };
                (*provider, report)
            })
            .collect();
        RunReport::new(outcomes)
    }
}

/// Merge candidates into per-coordinate groups.
///
/// Coordinates are compared for exact equality, not proximity: two photos
/// centimeters apart form two separate groups. Group order is the first-seen
/// order of each distinct coordinate; URL order within a group is arrival
/// order. Linear scan, O(n²) — fine at provider result caps (≤500 items).
pub fn group_by_coordinate(candidates: Vec<PhotoCandidate>) -> Vec<PhotoGroup> {
    let mut groups: Vec<PhotoGroup> = Vec::new();
    for candidate in candidates {
        match groups
            .iter_mut()
            .find(|g| g.coordinate == candidate.coordinate)
        {
            Some(group) => group.urls.push(candidate.url),
            None => groups.push(PhotoGroup {
                coordinate: candidate.coordinate,
                urls: vec![candidate.url],
            }),
        }
    }
    groups
}
