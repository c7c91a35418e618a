//! Scrapes the table of Nigerian cities and the states they belong to.

use crate::cities::error::CityListError;
use log::{info, warn};
use polars::prelude::*;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

const TABLE_SELECTOR: &str = "table.wikitable.sortable";

pub const COL_CITY: &str = "City";
pub const COL_CITY_NAME: &str = "City_name";
pub const COL_STATE: &str = "State";

/// Header names and raw cell text of the city table, before any cleanup.
#[derive(Debug, Clone, PartialEq)]
pub struct CityTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

pub struct CityListScraper {
    client: Client,
    url: String,
}

impl CityListScraper {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    /// Downloads the reference page and returns the cleaned city/state frame.
    ///
    /// Any failure here is fatal for the run: without cities there is nothing to
    /// look up weather for.
    pub async fn fetch(&self) -> Result<DataFrame, CityListError> {
        let html = self.download().await?;
        let table = parse_city_table(&html)?;
        info!(
            "Parsed city table with {} columns and {} rows",
            table.headers.len(),
            table.rows.len()
        );
        table.into_frame()
    }

    async fn download(&self) -> Result<String, CityListError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CityListError::NetworkRequest(self.url.clone(), e))?;
        info!("City list page answered with {}", response.status());

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", self.url, e);
                return Err(if let Some(status) = e.status() {
                    CityListError::HttpStatus {
                        url: self.url.clone(),
                        status,
                        source: e,
                    }
                } else {
                    CityListError::NetworkRequest(self.url.clone(), e)
                });
            }
        };

        response
            .text()
            .await
            .map_err(|e| CityListError::NetworkRequest(self.url.clone(), e))
    }
}

fn parse_selector(selector: &str) -> Result<Selector, CityListError> {
    Selector::parse(selector).map_err(|_| CityListError::Selector(selector.to_string()))
}

/// Text of an element up to its first line break.
fn first_line(element: ElementRef<'_>) -> String {
    let text = element.text().collect::<String>();
    text.split('\n').next().unwrap_or_default().trim().to_string()
}

/// Strips footnote markers such as `Lagos[a]` down to `Lagos`.
///
/// ```
/// use naija_weather::clean_city_name;
///
/// assert_eq!(clean_city_name("Port Harcourt[3][4]"), "Port Harcourt");
/// assert_eq!(clean_city_name("Kano"), "Kano");
/// ```
pub fn clean_city_name(raw: &str) -> String {
    raw.split('[').next().unwrap_or_default().trim().to_string()
}

/// Locates the first sortable wikitable and pulls out its header and row cells.
///
/// Headers come from the first row that has `th` cells. Every other row with at
/// least one `td` becomes a data row, padded or truncated to the header width.
pub fn parse_city_table(html: &str) -> Result<CityTable, CityListError> {
    let document = Html::parse_document(html);
    let table_sel = parse_selector(TABLE_SELECTOR)?;
    let row_sel = parse_selector("tr")?;
    let th_sel = parse_selector("th")?;
    let td_sel = parse_selector("td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| CityListError::TableNotFound(TABLE_SELECTOR.to_string()))?;

    let headers: Vec<String> = table
        .select(&row_sel)
        .map(|row| row.select(&th_sel).map(first_line).collect::<Vec<_>>())
        .find(|cells| !cells.is_empty())
        .ok_or(CityListError::NoHeaders)?;

    let width = headers.len();
    let rows = table
        .select(&row_sel)
        .filter_map(|row| {
            let mut cells: Vec<Option<String>> =
                row.select(&td_sel).map(|td| Some(first_line(td))).collect();
            if cells.is_empty() {
                return None;
            }
            cells.resize(width, None);
            Some(cells)
        })
        .collect();

    Ok(CityTable {
        headers: dedupe_headers(headers),
        rows,
    })
}

/// Repeated header names get a numeric suffix so they can live in one frame.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(i, header)| {
            let header = if header.is_empty() {
                format!("column_{i}")
            } else {
                header
            };
            if seen.insert(header.clone()) {
                header
            } else {
                let renamed = format!("{header}_{i}");
                seen.insert(renamed.clone());
                renamed
            }
        })
        .collect()
}

impl CityTable {
    /// Builds the city/state frame: every scraped column as text, with `City`
    /// replaced by the cleaned `City_name`. Rows without a city name are dropped.
    pub fn into_frame(self) -> Result<DataFrame, CityListError> {
        for required in [COL_CITY, COL_STATE] {
            if !self.headers.iter().any(|h| h == required) {
                return Err(CityListError::MissingColumn(required.to_string()));
            }
        }

        let columns = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let values: Vec<Option<String>> =
                    self.rows.iter().map(|row| row[i].clone()).collect();
                Column::new(header.as_str().into(), values)
            })
            .collect::<Vec<_>>();
        let df = DataFrame::new(columns)?;

        let names: Vec<Option<String>> = df
            .column(COL_CITY)?
            .str()?
            .into_iter()
            .map(|city| city.map(clean_city_name).filter(|name| !name.is_empty()))
            .collect();

        let mut df = df.drop(COL_CITY)?;
        df.with_column(Column::new(COL_CITY_NAME.into(), names))?;

        Ok(df
            .lazy()
            .filter(col(COL_CITY_NAME).is_not_null())
            .collect()?)
    }
}

/// City names in table order, the order weather is fetched in.
pub fn city_names(cities: &DataFrame) -> Result<Vec<String>, CityListError> {
    Ok(cities
        .column(COL_CITY_NAME)?
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect())
}
