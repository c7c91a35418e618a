use thiserror::Error;

#[derive(Debug, Error)]
pub enum CityListError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("No table matching '{0}' found on the city list page")]
    TableNotFound(String),

    #[error("City table has no header cells")]
    NoHeaders,

    #[error("Required column '{0}' not found in the city table")]
    MissingColumn(String),

    #[error("Invalid CSS selector '{0}'")]
    Selector(String),

    #[error("Failed building the city DataFrame")]
    Frame(#[from] polars::error::PolarsError),
}
