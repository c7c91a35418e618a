//! Fixtures shared by the unit tests: page and GeoJSON builders.

use wiremock::ResponseTemplate;

/// A 200 response carrying `body` as an HTML page.
pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html")
}

/// Width and height from the IHDR chunk of a PNG file.
pub fn png_size(bytes: &[u8]) -> (u32, u32) {
    assert_eq!(&bytes[1..4], b"PNG");
    let word = |at: usize| u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
    (word(16), word(20))
}

/// A search results page carrying the weather widget.
pub fn widget(location: &str, status: &str, temp: &str, details: &str) -> String {
    format!(
        r#"<html><body><div id="wob_wc">
            <div id="wob_loc">{location}</div>
            <img id="wob_tci" alt="{status}" src="//ssl.gstatic.com/x.png">
            <span id="wob_tm">{temp}</span>
            <div class="wtsRwe">{details}</div>
        </div></body></html>"#
    )
}

/// A city list page with one sortable wikitable of `(city, state)` rows.
pub fn city_page(rows: &[(&str, &str)]) -> String {
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(i, (city, state))| {
            format!("<tr><td>{}</td><td>{city}</td><td>{state}</td></tr>", i + 1)
        })
        .collect();
    format!(
        r#"<html><body><table class="wikitable sortable"><tbody>
            <tr><th>Rank</th><th>City</th><th>State</th></tr>{body}
        </tbody></table></body></html>"#
    )
}

/// A square polygon feature for a state, `size` degrees wide at (`lon`, `lat`).
pub fn state_feature(name: &str, lon: f64, lat: f64, size: f64) -> String {
    format!(
        r#"{{"type":"Feature","properties":{{"admin1Name":"{name}","admin1Pcod":"NG0"}},
            "geometry":{{"type":"Polygon","coordinates":[[[{lon},{lat}],[{x},{lat}],[{x},{y}],[{lon},{y}],[{lon},{lat}]]]}}}}"#,
        x = lon + size,
        y = lat + size,
    )
}

pub fn feature_collection(features: &[String]) -> String {
    format!(
        r#"{{"type":"FeatureCollection","features":[{}]}}"#,
        features.join(",")
    )
}
