//! Embedded map page
//!
//! A single Leaflet page with three switchable base layers and markers for
//! the known locations. When relay mode is active the tile layers go
//! through the gateway's own endpoints instead of the public tile hosts.

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>tilegate</title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <link rel="stylesheet" href="https://unpkg.com/leaflet/dist/leaflet.css">
    <script src="https://unpkg.com/leaflet/dist/leaflet.js"></script>
    <style>
        body { margin:0; font-family:Arial, sans-serif; }
        #map { height:100vh; width:100vw; }
        #style-picker {
            position:absolute; top:10px; right:10px; z-index:1000;
            background:#20262c; color:#e2e6ea; padding:8px 10px;
            border-radius:6px; font-size:14px;
        }
    </style>
</head>
<body>
    <div id="map"></div>
    <div id="style-picker">
        <select id="layer-select">
            <option value="street" selected>street</option>
            <option value="satellite">satellite</option>
            <option value="dark">dark</option>
        </select>
    </div>
    <script>
        var map = L.map('map').setView([__LAT__, __LON__], 13);

        var layers = {
            street: L.tileLayer('__OSM_TILES__', {
                maxZoom: 19,
                attribution: '&copy; OpenStreetMap contributors'
            }),
            satellite: L.tileLayer('__GOOGLE_TILES__', {
                maxZoom: 20,
                attribution: '&copy; Google'
            }),
            dark: L.tileLayer('__CARTO_TILES__', {
                maxZoom: 19,
                attribution: '&copy; CARTO'
            })
        };
        layers.street.addTo(map);

        document.getElementById('layer-select').addEventListener('change', function (e) {
            Object.values(layers).forEach(function (layer) { map.removeLayer(layer); });
            layers[e.target.value].addTo(map);
        });

        var locations = __LOCATIONS__;
        locations.forEach(function (loc) {
            var label = (loc.as || '') + ' ' + (loc.asname || '');
            if (loc.details) { label += '<br>' + loc.details; }
            L.marker([loc.lat, loc.lon]).addTo(map).bindPopup(label.trim());
        });
    </script>
</body>
</html>
"#;

struct TileUrls {
    osm: &'static str,
    google: &'static str,
    carto: &'static str,
}

const RELAYED_TILES: TileUrls = TileUrls {
    osm: "/proxy/tiles/osm/{z}/{x}/{y}.png",
    google: "/proxy/tiles/google/{z}/{x}/{y}",
    carto: "/proxy/tiles/carto/{z}/{x}/{y}.png",
};

const DIRECT_TILES: TileUrls = TileUrls {
    osm: "https://a.tile.openstreetmap.org/{z}/{x}/{y}.png",
    google: "https://mt1.google.com/vt/lyrs=s&x={x}&y={y}&z={z}",
    carto: "https://a.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png",
};

/// Fills the page template. `locations_json` must already be a serialized
/// JSON array.
pub fn render(lat: f64, lon: f64, locations_json: &str, relay_enabled: bool) -> String {
    let tiles = if relay_enabled {
        RELAYED_TILES
    } else {
        DIRECT_TILES
    };

    PAGE_TEMPLATE
        .replace("__LAT__", &format!("{lat:.6}"))
        .replace("__LON__", &format!("{lon:.6}"))
        .replace("__OSM_TILES__", tiles.osm)
        .replace("__GOOGLE_TILES__", tiles.google)
        .replace("__CARTO_TILES__", tiles.carto)
        .replace("__LOCATIONS__", locations_json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relayed_page_uses_gateway_tile_urls() {
        let html = render(51.1, 17.0, "[]", true);
        assert!(html.contains("/proxy/tiles/osm/{z}/{x}/{y}.png"));
        assert!(html.contains("/proxy/tiles/google/{z}/{x}/{y}"));
        assert!(!html.contains("tile.openstreetmap.org"));
    }

    #[test]
    fn test_direct_page_uses_public_tile_hosts() {
        let html = render(51.1, 17.0, "[]", false);
        assert!(html.contains("https://a.tile.openstreetmap.org/{z}/{x}/{y}.png"));
        assert!(!html.contains("/proxy/tiles/"));
    }

    #[test]
    fn test_coordinates_and_locations_are_embedded() {
        let html = render(
            51.109970,
            17.031984,
            r#"[{"lat":45.0,"lon":20.0,"as":"AS1","asname":"one","details":""}]"#,
            false,
        );
        assert!(html.contains("[51.109970, 17.031984]"));
        assert!(html.contains(r#""asname":"one""#));
    }
}
