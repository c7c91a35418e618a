//! Run configuration for the weather map pipeline.
//!
//! Every field has a default matching the values the pipeline has always used, so
//! `PipelineConfig::builder().build()` reproduces a standard run.

use bon::Builder;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Reference page listing Nigerian cities by population.
pub const DEFAULT_CITIES_URL: &str =
    "https://en.wikipedia.org/wiki/List_of_Nigerian_cities_by_population";

/// Search endpoint queried once per city; the query is `weather {city}`.
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";

/// Browser-like agent sent with the search requests only.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/107.0.0.0 Safari/537.36";

pub const DEFAULT_BOUNDARY_FILE: &str = "Niger_geojson.geojson";
pub const DEFAULT_STATES_CSV: &str = "states.csv";
pub const DEFAULT_WEATHER_CSV: &str = "weather.csv";
pub const DEFAULT_FIGURE: &str = "figure.png";
pub const DEFAULT_CREDIT: &str = "Made by Enoch";

pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_FETCH_DELAY: Duration = Duration::from_secs(60);

/// Settings for a single pipeline run.
///
/// # Examples
///
/// ```
/// use naija_weather::PipelineConfig;
/// use std::time::Duration;
///
/// let config = PipelineConfig::builder()
///     .output_dir("out")
///     .fetch_delay(Duration::from_secs(2))
///     .build();
/// assert_eq!(config.figure_path().to_str(), Some("out/figure.png"));
/// ```
#[derive(Debug, Clone, Builder)]
pub struct PipelineConfig {
    #[builder(into, default = DEFAULT_CITIES_URL.to_string())]
    pub cities_url: String,

    #[builder(into, default = DEFAULT_SEARCH_URL.to_string())]
    pub search_url: String,

    #[builder(into, default = DEFAULT_USER_AGENT.to_string())]
    pub user_agent: String,

    /// GeoJSON file with one feature per state, keyed by `admin1Name`.
    #[builder(into, default = PathBuf::from(DEFAULT_BOUNDARY_FILE))]
    pub boundary_file: PathBuf,

    /// Directory the CSVs, figure and summary are written into.
    #[builder(into, default = PathBuf::from("."))]
    pub output_dir: PathBuf,

    #[builder(into, default = DEFAULT_STATES_CSV.to_string())]
    pub states_csv: String,

    #[builder(into, default = DEFAULT_WEATHER_CSV.to_string())]
    pub weather_csv: String,

    #[builder(into, default = DEFAULT_FIGURE.to_string())]
    pub figure: String,

    /// File name for the JSON summary. Not written when unset.
    #[builder(into)]
    pub summary_json: Option<String>,

    /// Pause after every weather request, successful or not.
    #[builder(default = DEFAULT_FETCH_DELAY)]
    pub fetch_delay: Duration,

    /// Ceiling for the delay when the search engine keeps rate limiting.
    #[builder(default = DEFAULT_MAX_FETCH_DELAY)]
    pub max_fetch_delay: Duration,

    /// Only scrape weather for the first `n` cities.
    pub city_limit: Option<usize>,

    #[builder(into, default = DEFAULT_CREDIT.to_string())]
    pub credit: String,

    #[builder(default = (1400, 1000))]
    pub figure_size: (u32, u32),
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PipelineConfig {
    pub fn states_csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.states_csv)
    }

    pub fn weather_csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.weather_csv)
    }

    pub fn figure_path(&self) -> PathBuf {
        self.output_dir.join(&self.figure)
    }

    pub fn summary_json_path(&self) -> Option<PathBuf> {
        self.summary_json
            .as_deref()
            .map(|name| self.output_dir.join(name))
    }

    pub fn boundary_file(&self) -> &Path {
        &self.boundary_file
    }
}
