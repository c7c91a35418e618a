use crate::cities::error::CityListError;
use crate::geography::error::GeographyError;
use crate::render::error::RenderError;
use crate::report::error::ReportError;
use crate::weather::error::WeatherTableError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherMapError {
    #[error(transparent)]
    CityList(#[from] CityListError),

    #[error(transparent)]
    WeatherTable(#[from] WeatherTableError),

    #[error(transparent)]
    Geography(#[from] GeographyError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to create output directory '{0}'")]
    OutputDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Output path '{0}' exists but is not a directory")]
    OutputDirNotADirectory(PathBuf),

    #[error("Failed to create output file '{0}'")]
    OutputFile(PathBuf, #[source] std::io::Error),

    #[error("Failed writing CSV '{0}'")]
    CsvWrite(PathBuf, #[source] PolarsError),

    #[error("Failed writing summary JSON '{0}'")]
    SummaryWrite(PathBuf, #[source] serde_json::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
