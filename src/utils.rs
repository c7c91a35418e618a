use crate::error::WeatherMapError;
use log::info;
use polars::prelude::*;
use serde::Serialize;
use std::io;
use std::path::Path;
use tokio::task;

pub async fn ensure_output_dir_exists(path: &Path) -> Result<(), WeatherMapError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(WeatherMapError::OutputDirNotADirectory(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating output directory: {}", path.display());
            tokio::fs::create_dir_all(path)
                .await
                .map_err(|e| WeatherMapError::OutputDirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(WeatherMapError::OutputDirCreation(path.to_path_buf(), e)),
    }
}

/// Writes `df` as CSV with a header row and no index column.
pub async fn write_csv(mut df: DataFrame, path: &Path) -> Result<(), WeatherMapError> {
    let path_buf = path.to_path_buf();
    task::spawn_blocking(move || {
        let file = std::fs::File::create(&path_buf)
            .map_err(|e| WeatherMapError::OutputFile(path_buf.clone(), e))?;
        CsvWriter::new(file)
            .include_header(true)
            .finish(&mut df)
            .map_err(|e| WeatherMapError::CsvWrite(path_buf.clone(), e))?;
        info!("Wrote {} rows to {}", df.height(), path_buf.display());
        Ok::<(), WeatherMapError>(())
    })
    .await??;
    Ok(())
}

pub async fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), WeatherMapError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| WeatherMapError::SummaryWrite(path.to_path_buf(), e))?;
    tokio::fs::write(path, text)
        .await
        .map_err(|e| WeatherMapError::OutputFile(path.to_path_buf(), e))
}
