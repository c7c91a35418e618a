use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeographyError {
    #[error("Failed to read boundary file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse GeoJSON in '{0}'")]
    Parse(PathBuf, #[source] Box<geojson::Error>),

    #[error("Feature {index} in '{path}' has no string '{property}' property")]
    MissingProperty {
        path: PathBuf,
        index: usize,
        property: &'static str,
    },

    #[error("Boundary file '{0}' contains no usable state polygons")]
    NoBoundaries(PathBuf),

    #[error("Failed building the boundary DataFrame")]
    Frame(#[from] polars::error::PolarsError),
}
