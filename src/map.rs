//! Self-contained Leaflet map output.
//!
//! The rendered file embeds all marker data as JSON; only the tile layer
//! and the Leaflet assets are fetched when it is opened.

use crate::config::MapboxKeys;
use crate::geo::Coordinate;
use crate::photos::RunReport;
use serde::Serialize;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const OSM_TILES: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const OSM_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";
const MAPBOX_ATTRIBUTION: &str = "&copy; Mapbox &copy; OpenStreetMap contributors";
const INITIAL_ZOOM: u8 = 16;

#[derive(Serialize)]
struct Marker<'a> {
    lat: f64,
    lon: f64,
    urls: &'a [String],
}

/// Satellite tiles when a Mapbox token is configured, street tiles
/// otherwise.
fn tile_layer(mapbox: &MapboxKeys) -> (String, &'static str) {
    match mapbox.token() {
        Some(token) => (
            format!(
                "https://api.mapbox.com/styles/v1/mapbox/satellite-v9/tiles/256/{{z}}/{{x}}/{{y}}?access_token={}",
                token
            ),
            MAPBOX_ATTRIBUTION,
        ),
        None => (OSM_TILES.to_string(), OSM_ATTRIBUTION),
    }
}

/// Render the report as a complete HTML document: the search-radius circle
/// plus one marker per photo group, each popup listing the group's photos.
pub fn render(
    center: &Coordinate,
    radius_meters: f64,
    report: &RunReport,
    mapbox: &MapboxKeys,
) -> String {
    let markers: Vec<Marker> = report
        .groups()
        .map(|g| Marker {
            lat: g.coordinate.lat,
            lon: g.coordinate.lon,
            urls: &g.urls,
        })
        .collect();
    let marker_json = serde_json::to_string(&markers).expect("marker data serializes");
    let (tiles, attribution) = tile_layer(mapbox);
    let generated = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>geopix</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link rel="stylesheet" href="{css}">
<script src="{js}"></script>
<style>
html, body, #map {{ height: 100%; margin: 0; }}
#generated {{ position: absolute; bottom: 4px; left: 8px; z-index: 1000; font: 11px sans-serif; color: #555; }}
</style>
</head>
<body>
<div id="map"></div>
<div id="generated">generated {generated}</div>
<script>
var map = L.map('map').setView([{lat}, {lon}], {zoom});
L.tileLayer('{tiles}', {{ attribution: '{attribution}' }}).addTo(map);
L.circle([{lat}, {lon}], {{
  radius: {radius},
  color: '#3186cc',
  fillColor: '#3186cc',
  fillOpacity: 0.2
}}).addTo(map);
var groups = {markers};
groups.forEach(function (group) {{
  var html = group.urls.map(function (url) {{
    return "<a href='" + url + "' target='_blank'><img src='" + url + "' width='200'></a><br>";
  }}).join('');
  L.circleMarker([group.lat, group.lon], {{
    radius: 3,
    color: 'red',
    fillColor: 'red',
    fillOpacity: 1.0
  }}).addTo(map).bindPopup(html, {{ maxWidth: 260 }});
}});
</script>
</body>
</html>
"#,
        css = LEAFLET_CSS,
        js = LEAFLET_JS,
        generated = generated,
        lat = center.lat,
        lon = center.lon,
        zoom = INITIAL_ZOOM,
        tiles = tiles,
        attribution = attribution,
        radius = radius_meters,
        markers = marker_json,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photos::{PhotoGroup, Provider, ProviderReport};

    fn report_with_one_group() -> RunReport {
        RunReport::new(vec![
            (
                Provider::FourSquare,
                ProviderReport::Collected(vec![PhotoGroup {
                    coordinate: Coordinate::new(40.7130, -74.0061).unwrap(),
                    urls: vec!["https://img.example/a.jpg".into()],
                }]),
            ),
            (Provider::Flickr, ProviderReport::NotConfigured),
            (Provider::Twitter, ProviderReport::NotConfigured),
        ])
    }

    fn center() -> Coordinate {
        Coordinate::new(40.7128, -74.0060).unwrap()
    }

    #[test]
    fn test_render_embeds_markers_and_radius() {
        let html = render(&center(), 500.0, &report_with_one_group(), &MapboxKeys::default());
        assert!(html.contains("setView([40.7128, -74.006]"));
        assert!(html.contains("radius: 500"));
        assert!(html.contains("https://img.example/a.jpg"));
        assert!(html.contains(r#""lat":40.713"#));
    }

    #[test]
    fn test_render_osm_tiles_without_token() {
        let html = render(&center(), 500.0, &report_with_one_group(), &MapboxKeys::default());
        assert!(html.contains("tile.openstreetmap.org"));
        assert!(!html.contains("api.mapbox.com"));
    }

    #[test]
    fn test_render_mapbox_tiles_with_token() {
        let mapbox = MapboxKeys {
            access_token: Some("pk.token".into()),
        };
        let html = render(&center(), 500.0, &report_with_one_group(), &mapbox);
        assert!(html.contains("api.mapbox.com"));
        assert!(html.contains("access_token=pk.token"));
    }

    #[test]
    fn test_render_without_groups_has_empty_marker_list() {
        let report = RunReport::new(vec![
            (Provider::FourSquare, ProviderReport::NotConfigured),
            (Provider::Flickr, ProviderReport::NotConfigured),
            (Provider::Twitter, ProviderReport::NotConfigured),
        ]);
        let html = render(&center(), 500.0, &report, &MapboxKeys::default());
        assert!(html.contains("var groups = []"));
    }
}
