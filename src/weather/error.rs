use polars::error::PolarsError;
use thiserror::Error;

/// Why the weather for a single city could not be scraped.
///
/// These never abort the run; the city is logged and left out of the weather table.
#[derive(Debug, Error)]
pub enum WeatherScrapeError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not build search request for city '{0}'")]
    InvalidRequest(String, #[source] reqwest::Error),

    #[error("Weather widget field '{0}' not found in page")]
    MissingField(&'static str),

    #[error("Weather details '{0}' did not split into precipitation, humidity and wind")]
    MalformedDetails(String),

    #[error("Invalid CSS selector '{0}'")]
    Selector(String),
}

impl WeatherScrapeError {
    /// True when the server signalled that we are sending requests too fast.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            WeatherScrapeError::HttpStatus { status, .. }
                if *status == reqwest::StatusCode::TOO_MANY_REQUESTS
                    || *status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        )
    }
}

#[derive(Debug, Error)]
pub enum WeatherTableError {
    #[error("Failed building the weather DataFrame")]
    Frame(#[from] PolarsError),
}
