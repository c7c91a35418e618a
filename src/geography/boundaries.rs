//! State boundary polygons loaded from a GeoJSON feature collection.

use crate::geography::error::GeographyError;
use geo::{BoundingRect, MultiPolygon, Rect};
use geojson::{FeatureCollection, GeoJson};
use log::{info, warn};
use polars::prelude::*;
use std::path::Path;

/// Feature property holding the state name.
pub const STATE_PROPERTY: &str = "admin1Name";

pub const COL_STATE: &str = "State";
pub const COL_BOUNDARY_IDX: &str = "boundary_idx";

#[derive(Debug, Clone, PartialEq)]
pub struct StateBoundary {
    pub state: String,
    pub geometry: MultiPolygon<f64>,
}

impl StateBoundary {
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.geometry.bounding_rect()
    }
}

/// Reads the boundary file. A missing or unparsable file is fatal.
pub async fn load_boundaries(path: &Path) -> Result<Vec<StateBoundary>, GeographyError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| GeographyError::Read(path.to_path_buf(), e))?;
    let boundaries = parse_boundaries(&text, path)?;
    info!(
        "Loaded {} state boundaries from {}",
        boundaries.len(),
        path.display()
    );
    Ok(boundaries)
}

/// Parses a feature collection into one [`StateBoundary`] per polygon feature.
///
/// `path` is only used for error messages.
pub fn parse_boundaries(text: &str, path: &Path) -> Result<Vec<StateBoundary>, GeographyError> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e| GeographyError::Parse(path.to_path_buf(), Box::new(e)))?;
    let collection = FeatureCollection::try_from(geojson)
        .map_err(|e| GeographyError::Parse(path.to_path_buf(), Box::new(e)))?;

    let mut boundaries = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.into_iter().enumerate() {
        let state = feature
            .property(STATE_PROPERTY)
            .and_then(|value| value.as_str())
            .ok_or_else(|| GeographyError::MissingProperty {
                path: path.to_path_buf(),
                index,
                property: STATE_PROPERTY,
            })?
            .to_string();

        let Some(geometry) = feature.geometry else {
            warn!("Feature for {} has no geometry, skipping", state);
            continue;
        };
        let geometry = match geo::Geometry::<f64>::try_from(geometry) {
            Ok(geo::Geometry::MultiPolygon(mp)) => mp,
            Ok(geo::Geometry::Polygon(p)) => MultiPolygon(vec![p]),
            Ok(_) => {
                warn!("Feature for {} is not a polygon, skipping", state);
                continue;
            }
            Err(e) => {
                warn!("Invalid geometry for {}: {}", state, e);
                continue;
            }
        };

        boundaries.push(StateBoundary { state, geometry });
    }

    if boundaries.is_empty() {
        return Err(GeographyError::NoBoundaries(path.to_path_buf()));
    }
    Ok(boundaries)
}

/// One row per boundary: its state name and its position in `boundaries`, so the
/// geometry can be found again after the frame has been joined.
pub fn boundaries_frame(boundaries: &[StateBoundary]) -> Result<DataFrame, GeographyError> {
    let states: Vec<&str> = boundaries.iter().map(|b| b.state.as_str()).collect();
    let indices: Vec<u32> = (0..boundaries.len() as u32).collect();
    Ok(df!(
        COL_STATE => states,
        COL_BOUNDARY_IDX => indices
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{feature_collection, state_feature};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_polygons_and_multipolygons() {
        let multi = r#"{"type":"Feature","properties":{"admin1Name":"Lagos"},
            "geometry":{"type":"MultiPolygon","coordinates":[
                [[[3.0,6.4],[3.5,6.4],[3.5,6.7],[3.0,6.4]]],
                [[[3.6,6.4],[3.9,6.4],[3.9,6.6],[3.6,6.4]]]]}}"#;
        let point = r#"{"type":"Feature","properties":{"admin1Name":"Nowhere"},
            "geometry":{"type":"Point","coordinates":[1.0,1.0]}}"#;
        let text = feature_collection(&[
            state_feature("Kano", 8.0, 11.0, 1.5),
            multi.to_string(),
            point.to_string(),
        ]);

        let boundaries = parse_boundaries(&text, Path::new("test.geojson")).unwrap();
        let names: Vec<&str> = boundaries.iter().map(|b| b.state.as_str()).collect();
        assert_eq!(names, ["Kano", "Lagos"]);
        assert_eq!(boundaries[1].geometry.0.len(), 2);

        let bounds = boundaries[0].bounds().unwrap();
        assert_eq!(bounds.min().x, 8.0);
        assert_eq!(bounds.max().y, 12.5);
    }

    #[test]
    fn test_missing_state_property_is_fatal() {
        let text = feature_collection(&[r#"{"type":"Feature","properties":{"name":"Oyo"},
            "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}}"#
            .to_string()]);
        let err = parse_boundaries(&text, Path::new("x.geojson")).unwrap_err();
        assert!(matches!(
            err,
            GeographyError::MissingProperty { index: 0, .. }
        ));
    }

    #[test]
    fn test_not_geojson_is_fatal() {
        let err = parse_boundaries("{\"hello\": 1}", Path::new("x.geojson")).unwrap_err();
        assert!(matches!(err, GeographyError::Parse(..)));
    }

    #[test]
    fn test_boundaries_frame() {
        let text = feature_collection(&[
            state_feature("Abia", 7.0, 5.0, 1.0),
            state_feature("Adamawa", 12.0, 9.0, 2.0),
        ]);
        let boundaries = parse_boundaries(&text, Path::new("x.geojson")).unwrap();
        let df = boundaries_frame(&boundaries).unwrap();
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.column(COL_STATE).unwrap().str().unwrap().get(1), Some("Adamawa"));
        assert_eq!(df.column(COL_BOUNDARY_IDX).unwrap().u32().unwrap().get(1), Some(1));
    }

    #[tokio::test]
    async fn test_load_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        file.write_all(feature_collection(&[state_feature("Borno", 12.0, 11.0, 2.0)]).as_bytes())?;
        file.flush()?;

        let boundaries = load_boundaries(file.path()).await?;
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].state, "Borno");

        let missing = load_boundaries(Path::new("/definitely/not/here.geojson")).await;
        assert!(matches!(missing, Err(GeographyError::Read(..))));
        Ok(())
    }
}
