//! Reads current conditions for a city from the weather widget on a search
//! results page.

use crate::weather::error::{WeatherScrapeError, WeatherTableError};
use crate::weather::throttle::Throttle;
use log::{info, warn};
use polars::prelude::*;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Serialize;

pub const COL_CITY_NAME: &str = "city_name";
pub const COL_STATUS: &str = "Weather Status";
pub const COL_TEMPERATURE: &str = "Temperature";
pub const COL_PRECIPITATION: &str = "Precipitation";
pub const COL_HUMIDITY: &str = "Humidity";
pub const COL_WIND: &str = "Wind";

const LOCATION_SELECTOR: &str = "div#wob_loc";
const STATUS_SELECTOR: &str = "img#wob_tci";
const TEMPERATURE_SELECTOR: &str = "span#wob_tm";
const DETAILS_SELECTOR: &str = "div.wtsRwe";

/// Current conditions for one city, as text straight from the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityWeather {
    /// Location label reported by the widget, without the region/country suffix.
    pub city_name: String,
    pub status: String,
    pub temperature: String,
    /// e.g. `"Precipitation: 0%"`
    pub precipitation: String,
    /// e.g. `"Humidity: 74%"`
    pub humidity: String,
    /// e.g. `"Wind: 10 km/h"`
    pub wind: String,
}

#[derive(Debug)]
pub struct CityFailure {
    pub city: String,
    pub error: WeatherScrapeError,
}

/// Outcome of scraping every city: the records that made it, and why the others didn't.
#[derive(Debug, Default)]
pub struct WeatherScrape {
    pub records: Vec<CityWeather>,
    pub failures: Vec<CityFailure>,
}

pub struct WeatherScraper {
    client: Client,
    search_url: String,
    user_agent: String,
    throttle: Throttle,
}

impl WeatherScraper {
    pub fn new(client: Client, search_url: &str, user_agent: &str, throttle: Throttle) -> Self {
        Self {
            client,
            search_url: search_url.to_string(),
            user_agent: user_agent.to_string(),
            throttle,
        }
    }

    /// Scrapes each city in turn, one request at a time.
    ///
    /// A failed city is logged and skipped; the pause after each request is taken
    /// whatever the outcome.
    pub async fn fetch_all(&mut self, cities: &[String]) -> WeatherScrape {
        let mut scrape = WeatherScrape::default();

        for city in cities {
            info!("Fetching weather for {}", city);
            let rate_limited = match self.fetch_city(city).await {
                Ok(record) => {
                    info!("Added {} weather details", record.city_name);
                    scrape.records.push(record);
                    false
                }
                Err(error) => {
                    warn!("Skipping {}: {}", city, error);
                    let rate_limited = error.is_rate_limited();
                    scrape.failures.push(CityFailure {
                        city: city.clone(),
                        error,
                    });
                    rate_limited
                }
            };
            self.throttle.pause(rate_limited).await;
        }

        info!(
            "Weather scraped for {} of {} cities",
            scrape.records.len(),
            cities.len()
        );
        scrape
    }

    pub async fn fetch_city(&self, city: &str) -> Result<CityWeather, WeatherScrapeError> {
        let request = self
            .client
            .get(&self.search_url)
            .query(&[("q", format!("weather {city}"))])
            .header(USER_AGENT, self.user_agent.as_str())
            .build()
            .map_err(|e| WeatherScrapeError::InvalidRequest(city.to_string(), e))?;
        let url = request.url().to_string();

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| WeatherScrapeError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(if let Some(status) = e.status() {
                    WeatherScrapeError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    WeatherScrapeError::NetworkRequest(url, e)
                });
            }
        };

        let body = response
            .text()
            .await
            .map_err(|e| WeatherScrapeError::NetworkRequest(url, e))?;
        parse_weather_page(&body)
    }
}

fn parse_selector(selector: &'static str) -> Result<Selector, WeatherScrapeError> {
    Selector::parse(selector).map_err(|_| WeatherScrapeError::Selector(selector.to_string()))
}

fn select_text(document: &Html, selector: &'static str) -> Result<String, WeatherScrapeError> {
    let sel = parse_selector(selector)?;
    document
        .select(&sel)
        .next()
        .map(|el| el.text().collect::<String>())
        .ok_or(WeatherScrapeError::MissingField(selector))
}

/// Extracts the widget fields from a search results page.
///
/// The details line reads like `Precipitation: 0%Humidity: 74%Wind: 10 km/h`
/// and is cut on `%` into its three parts.
pub fn parse_weather_page(html: &str) -> Result<CityWeather, WeatherScrapeError> {
    let document = Html::parse_document(html);

    let location = select_text(&document, LOCATION_SELECTOR)?;
    let status_sel = parse_selector(STATUS_SELECTOR)?;
    let status = document
        .select(&status_sel)
        .next()
        .and_then(|img| img.value().attr("alt"))
        .ok_or(WeatherScrapeError::MissingField(STATUS_SELECTOR))?;
    let temperature = select_text(&document, TEMPERATURE_SELECTOR)?;
    let details = select_text(&document, DETAILS_SELECTOR)?;

    let parts: Vec<&str> = details.split('%').collect();
    let [precipitation, humidity, wind, ..] = parts.as_slice() else {
        return Err(WeatherScrapeError::MalformedDetails(details.clone()));
    };

    Ok(CityWeather {
        city_name: location_city(&location),
        status: status.trim().to_string(),
        temperature: temperature.trim().to_string(),
        precipitation: format!("{}%", precipitation.trim()),
        humidity: format!("{}%", humidity.trim()),
        wind: wind.trim().to_string(),
    })
}

/// `"Lagos, Nigeria"` → `"Lagos"`, so the label lines up with the city list.
fn location_city(location: &str) -> String {
    location
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn text_column<'a>(records: &'a [CityWeather], field: fn(&CityWeather) -> &str) -> Vec<&'a str> {
    records.iter().map(field).collect()
}

/// Lays the scraped records out as the weather table.
pub fn weather_frame(records: &[CityWeather]) -> Result<DataFrame, WeatherTableError> {
    Ok(df!(
        COL_CITY_NAME => text_column(records, |r| r.city_name.as_str()),
        COL_STATUS => text_column(records, |r| r.status.as_str()),
        COL_TEMPERATURE => text_column(records, |r| r.temperature.as_str()),
        COL_PRECIPITATION => text_column(records, |r| r.precipitation.as_str()),
        COL_HUMIDITY => text_column(records, |r| r.humidity.as_str()),
        COL_WIND => text_column(records, |r| r.wind.as_str())
    )?)
}
