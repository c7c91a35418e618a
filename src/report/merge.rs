//! Joins the city list, the scraped weather and the state boundaries into the
//! table the summary and the map are built from.

use crate::cities::city_scraper::{COL_CITY_NAME, COL_STATE};
use crate::geography::boundaries::COL_BOUNDARY_IDX;
use crate::report::error::ReportError;
use crate::weather::extract;
use crate::weather::weather_scraper::{
    COL_CITY_NAME as COL_WEATHER_CITY, COL_HUMIDITY, COL_PRECIPITATION, COL_STATUS,
    COL_TEMPERATURE, COL_WIND,
};
use polars::prelude::*;

/// Status given to states with no city that has weather.
pub const UNDETERMINED: &str = "Undetermined";

pub const COL_TEMPERATURE_C: &str = "temperature_c";
pub const COL_WIND_SPEED_KMH: &str = "wind_speed_kmh";
pub const COL_PRECIPITATION_PCT: &str = "precipitation_pct";
pub const COL_HUMIDITY_PCT: &str = "humidity_pct";

/// Keeps only cities that appear in both the city list and the weather table.
pub fn join_cities_weather(
    cities: &DataFrame,
    weather: &DataFrame,
) -> Result<DataFrame, ReportError> {
    cities
        .clone()
        .lazy()
        .join(
            weather.clone().lazy(),
            [col(COL_CITY_NAME)],
            [col(COL_WEATHER_CITY)],
            JoinArgs::new(JoinType::Inner),
        )
        .collect()
        .map_err(|e| ReportError::Join {
            on: COL_CITY_NAME.to_string(),
            source: e,
        })
}

/// Attaches city weather to every state boundary.
///
/// All boundaries are kept; a state with several matched cities appears once per
/// city, and a state with none gets a single row with status [`UNDETERMINED`].
/// States in the city list that are missing from the boundary file are dropped.
pub fn join_boundaries(
    boundaries: &DataFrame,
    city_weather: &DataFrame,
) -> Result<DataFrame, ReportError> {
    boundaries
        .clone()
        .lazy()
        .join(
            city_weather.clone().lazy(),
            [col(COL_STATE)],
            [col(COL_STATE)],
            JoinArgs::new(JoinType::Left),
        )
        .with_column(col(COL_STATUS).fill_null(lit(UNDETERMINED)))
        .sort(
            [COL_BOUNDARY_IDX],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()
        .map_err(|e| ReportError::Join {
            on: COL_STATE.to_string(),
            source: e,
        })
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ReportError> {
    df.column(name)
        .map_err(|e| ReportError::ColumnNotFound(name.to_string(), e))
}

fn text_column<'a>(df: &'a DataFrame, name: &str) -> Result<Vec<Option<&'a str>>, ReportError> {
    Ok(column(df, name)?.str()?.into_iter().collect())
}

fn extracted<T: Default>(values: &[Option<&str>], parse: fn(&str) -> T) -> Vec<T> {
    values
        .iter()
        .map(|value| value.map(parse).unwrap_or_default())
        .collect()
}

/// Adds the numeric columns read out of the widget text. Missing text counts as 0.
pub fn derive_numeric_columns(mut df: DataFrame) -> Result<DataFrame, ReportError> {
    let (temperature, wind, precipitation, humidity) = {
        let temperature = extracted(&text_column(&df, COL_TEMPERATURE)?, extract::temperature);
        let wind = extracted(&text_column(&df, COL_WIND)?, extract::wind_speed);
        let precipitation = extracted(
            &text_column(&df, COL_PRECIPITATION)?,
            extract::precipitation,
        );
        let humidity = extracted(&text_column(&df, COL_HUMIDITY)?, extract::humidity);
        (temperature, wind, precipitation, humidity)
    };

    df.with_column(Column::new(COL_TEMPERATURE_C.into(), temperature))?;
    df.with_column(Column::new(COL_WIND_SPEED_KMH.into(), wind))?;
    df.with_column(Column::new(COL_PRECIPITATION_PCT.into(), precipitation))?;
    df.with_column(Column::new(COL_HUMIDITY_PCT.into(), humidity))?;
    Ok(df)
}

/// One row of the final table, as plain Rust values.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub state: String,
    pub boundary_idx: u32,
    /// `None` for states without any city weather.
    pub city: Option<String>,
    pub status: String,
    pub temperature_c: i64,
    pub wind_speed_kmh: u32,
    pub precipitation_pct: u32,
    pub humidity_pct: u32,
}

impl ReportRow {
    pub fn has_weather(&self) -> bool {
        self.city.is_some()
    }
}

/// Reads the derived table back into [`ReportRow`]s.
pub fn report_rows(df: &DataFrame) -> Result<Vec<ReportRow>, ReportError> {
    let states = column(df, COL_STATE)?.str()?;
    let indices = column(df, COL_BOUNDARY_IDX)?.u32()?;
    let cities = column(df, COL_CITY_NAME)?.str()?;
    let statuses = column(df, COL_STATUS)?.str()?;
    let temperature = column(df, COL_TEMPERATURE_C)?.i64()?;
    let wind = column(df, COL_WIND_SPEED_KMH)?.u32()?;
    let precipitation = column(df, COL_PRECIPITATION_PCT)?.u32()?;
    let humidity = column(df, COL_HUMIDITY_PCT)?.u32()?;

    Ok((0..df.height())
        .map(|i| ReportRow {
            state: states.get(i).unwrap_or_default().to_string(),
            boundary_idx: indices.get(i).unwrap_or_default(),
            city: cities.get(i).map(str::to_string),
            status: statuses.get(i).unwrap_or(UNDETERMINED).to_string(),
            temperature_c: temperature.get(i).unwrap_or_default(),
            wind_speed_kmh: wind.get(i).unwrap_or_default(),
            precipitation_pct: precipitation.get(i).unwrap_or_default(),
            humidity_pct: humidity.get(i).unwrap_or_default(),
        })
        .collect())
}

/// Runs both joins and the numeric derivation in order.
pub fn merge_all(
    cities: &DataFrame,
    weather: &DataFrame,
    boundaries: &DataFrame,
) -> Result<DataFrame, ReportError> {
    let city_weather = join_cities_weather(cities, weather)?;
    let merged = join_boundaries(boundaries, &city_weather)?;
    derive_numeric_columns(merged)
}
