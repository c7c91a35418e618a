//! The end-to-end run: city list, weather scrape, join with the state boundaries,
//! summary and figure.

use crate::cities::city_scraper::{city_names, CityListScraper};
use crate::config::PipelineConfig;
use crate::error::WeatherMapError;
use crate::geography::boundaries::{boundaries_frame, load_boundaries, StateBoundary};
use crate::render::choropleth::render_choropleth;
use crate::report::merge::{merge_all, report_rows, ReportRow};
use crate::report::palette::{legend_order, StatusPalette};
use crate::report::summary::WeatherSummary;
use crate::utils::{ensure_output_dir_exists, write_csv, write_json};
use crate::weather::throttle::Throttle;
use crate::weather::weather_scraper::{weather_frame, CityFailure, WeatherScraper};
use chrono::NaiveDate;
use log::{info, warn};
use polars::prelude::DataFrame;
use reqwest::Client;
use std::path::PathBuf;
use tokio::task;

/// Everything a run produced before the figure is drawn.
#[derive(Debug)]
pub struct WeatherReport {
    /// Cleaned city list, as written to the states CSV.
    pub cities: DataFrame,
    /// Scraped weather, as written to the weather CSV.
    pub weather: DataFrame,
    /// Cities whose weather could not be read.
    pub failures: Vec<CityFailure>,
    pub boundaries: Vec<StateBoundary>,
    /// One entry per drawn state/city pair, in boundary order.
    pub rows: Vec<ReportRow>,
    pub summary: WeatherSummary,
    pub palette: StatusPalette,
    pub legend: Vec<String>,
}

/// Runs the weather map pipeline.
///
/// # Examples
///
/// ```rust,no_run
/// # use naija_weather::{PipelineConfig, WeatherMap, WeatherMapError};
/// # async fn run() -> Result<(), WeatherMapError> {
/// let map = WeatherMap::new(PipelineConfig::builder().output_dir("out").build()).await?;
/// let figure = map.run().await?;
/// println!("saved {}", figure.display());
/// # Ok(())
/// # }
/// ```
pub struct WeatherMap {
    config: PipelineConfig,
    client: Client,
}

impl WeatherMap {
    /// Prepares a run, creating the output directory if needed.
    pub async fn new(config: PipelineConfig) -> Result<Self, WeatherMapError> {
        ensure_output_dir_exists(&config.output_dir).await?;
        Ok(Self {
            config,
            client: Client::new(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs every stage for today's date and returns the figure path.
    pub async fn run(&self) -> Result<PathBuf, WeatherMapError> {
        let today = chrono::Local::now().date_naive();
        let report = self.report(today).await?;
        self.render(&report).await
    }

    /// Scrapes, joins and summarises, writing both CSVs and the optional summary
    /// JSON along the way.
    pub async fn report(&self, date: NaiveDate) -> Result<WeatherReport, WeatherMapError> {
        let cities = CityListScraper::new(self.client.clone(), &self.config.cities_url)
            .fetch()
            .await?;
        info!("Found {} cities", cities.height());
        write_csv(cities.clone(), &self.config.states_csv_path()).await?;

        let mut names = city_names(&cities)?;
        if let Some(limit) = self.config.city_limit {
            names.truncate(limit);
        }

        let mut scraper = WeatherScraper::new(
            self.client.clone(),
            &self.config.search_url,
            &self.config.user_agent,
            Throttle::new(self.config.fetch_delay, self.config.max_fetch_delay),
        );
        let scrape = scraper.fetch_all(&names).await;
        if scrape.records.is_empty() {
            warn!("No city weather was collected; every state will be undetermined");
        }
        let weather = weather_frame(&scrape.records)?;
        write_csv(weather.clone(), &self.config.weather_csv_path()).await?;

        let boundaries = load_boundaries(self.config.boundary_file()).await?;
        let merged = merge_all(&cities, &weather, &boundaries_frame(&boundaries)?)?;
        let rows = report_rows(&merged)?;

        let summary = WeatherSummary::from_rows(&rows, date);
        for line in summary.lines() {
            info!("{}", line);
        }
        if let Some(path) = self.config.summary_json_path() {
            write_json(&summary, &path).await?;
            info!("Summary saved to {}", path.display());
        }

        let palette = StatusPalette::new(rows.iter().map(|r| r.status.as_str()));
        let legend = legend_order(rows.iter().map(|r| r.status.as_str()));

        Ok(WeatherReport {
            cities,
            weather,
            failures: scrape.failures,
            boundaries,
            rows,
            summary,
            palette,
            legend,
        })
    }

    /// Draws the figure for `report` and returns where it was written.
    pub async fn render(&self, report: &WeatherReport) -> Result<PathBuf, WeatherMapError> {
        let path = self.config.figure_path();
        let boundaries = report.boundaries.clone();
        let rows = report.rows.clone();
        let palette = report.palette.clone();
        let legend = report.legend.clone();
        let title = report.summary.title();
        let lines = report.summary.lines();
        let credit = self.config.credit.clone();
        let size = self.config.figure_size;

        let figure = path.clone();
        task::spawn_blocking(move || {
            render_choropleth()
                .path(&figure)
                .boundaries(&boundaries)
                .rows(&rows)
                .palette(&palette)
                .legend(&legend)
                .title(&title)
                .lines(&lines)
                .credit(&credit)
                .size(size)
                .call()
        })
        .await??;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{city_page, feature_collection, html, png_size, state_feature, widget};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use crate::render::error::RenderError;
    use crate::report::merge::UNDETERMINED;
    use std::time::Duration;
    use tempfile::tempdir;

    const CITIES: [(&str, &str); 12] = [
        ("Lagos", "Lagos"),
        ("Kano", "Kano"),
        ("Ibadan", "Oyo"),
        ("Abuja", "FCT"),
        ("Port Harcourt", "Rivers"),
        ("Benin City", "Edo"),
        ("Maiduguri", "Borno"),
        ("Zaria", "Kaduna"),
        ("Aba", "Abia"),
        ("Jos", "Plateau"),
        ("Ilorin", "Kwara"),
        ("Atlantis", "Nowhere"),
    ];

    fn weather_for(city: &str) -> Option<String> {
        let (status, temp, wind) = match city {
            "Lagos" => ("Sunny", "31", 9),
            "Kano" => ("Sunny", "35", 25),
            "Ibadan" => ("Cloudy", "27", 12),
            "Abuja" => ("Sunny", "29", 14),
            "Port Harcourt" => ("Rain", "24", 10),
            "Benin City" => ("Cloudy", "26", 20),
            "Maiduguri" => ("Haze", "38", 30),
            "Zaria" => ("Haze", "33", 18),
            "Aba" => ("Rain", "25", 8),
            "Jos" => ("Thunderstorm", "21", 16),
            _ => return None,
        };
        Some(widget(
            &format!("{city}, Nigeria"),
            status,
            temp,
            &format!("Precipitation: 10%Humidity: 50%Wind: {wind} km/h"),
        ))
    }

    async fn fixture_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cities"))
            .respond_with(html(&city_page(&CITIES)))
            .mount(&server)
            .await;
        for (city, _) in CITIES {
            let response = match weather_for(city) {
                Some(body) => html(&body),
                None => ResponseTemplate::new(503),
            };
            Mock::given(method("GET"))
                .and(path("/search"))
                .and(query_param("q", format!("weather {city}")))
                .respond_with(response)
                .mount(&server)
                .await;
        }
        server
    }

    fn config_for(server: &MockServer, dir: &std::path::Path) -> PipelineConfig {
        PipelineConfig::builder()
            .cities_url(format!("{}/cities", server.uri()))
            .search_url(format!("{}/search", server.uri()))
            .boundary_file(boundary_file(dir))
            .output_dir(dir.join("out"))
            .summary_json("summary.json")
            .fetch_delay(Duration::ZERO)
            .max_fetch_delay(Duration::ZERO)
            .figure_size((900, 700))
            .build()
    }

    fn boundary_file(dir: &std::path::Path) -> PathBuf {
        let mut states: Vec<&str> = CITIES
            .iter()
            .map(|(_, state)| *state)
            .filter(|state| *state != "Nowhere")
            .collect();
        states.push("Yobe");
        let features: Vec<String> = states
            .iter()
            .enumerate()
            .map(|(i, state)| state_feature(state, 3.0 + i as f64, 5.0, 1.0))
            .collect();
        let path = dir.join("states.geojson");
        std::fs::write(&path, feature_collection(&features)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_report_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let server = fixture_server().await;
        let map = WeatherMap::new(config_for(&server, dir.path())).await?;
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let report = map.report(date).await?;

        assert_eq!(report.cities.height(), 12);
        assert_eq!(report.weather.height(), 10);
        assert_eq!(report.failures.len(), 2);

        // 11 drawable states + Yobe without a city; Atlantis has no boundary.
        assert_eq!(report.rows.len(), 12);
        let yobe = report.rows.iter().find(|r| r.state == "Yobe").unwrap();
        assert_eq!(yobe.status, UNDETERMINED);
        let kwara = report.rows.iter().find(|r| r.state == "Kwara").unwrap();
        assert_eq!(kwara.status, UNDETERMINED);

        let summary = &report.summary;
        assert_eq!(summary.cities, 10);
        assert!(summary
            .lines()
            .contains(&"Sunny has most occurrences with 3 cities in total.".to_string()));
        assert_eq!(summary.warmer_than_room, 5);
        assert_eq!(summary.cooler_than_room, 3);
        assert_eq!(summary.normal_wind, 8);
        assert_eq!(summary.average_humidity, 50.0);

        assert_eq!(report.legend[0], "Sunny");
        assert!(report.legend.contains(&UNDETERMINED.to_string()));
        assert_eq!(report.palette.len(), 6);

        let out = dir.path().join("out");
        let states_csv = std::fs::read_to_string(out.join("states.csv"))?;
        assert!(states_csv.starts_with("Rank,State,City_name"));
        let weather_csv = std::fs::read_to_string(out.join("weather.csv"))?;
        assert_eq!(weather_csv.lines().count(), 11);
        let summary_json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("summary.json"))?)?;
        assert_eq!(summary_json["date"], "2024-03-09");
        Ok(())
    }

    #[tokio::test]
    async fn test_render_writes_figure() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let server = fixture_server().await;
        let map = WeatherMap::new(config_for(&server, dir.path())).await?;
        let report = map
            .report(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
            .await?;

        let figure = map.render(&report).await?;
        assert_eq!(figure, dir.path().join("out").join("figure.png"));
        assert_eq!(png_size(&std::fs::read(&figure)?), (900, 700));
        Ok(())
    }

    #[tokio::test]
    async fn test_render_rejects_tiny_figure() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let server = fixture_server().await;
        let config = PipelineConfig {
            figure_size: (200, 150),
            city_limit: Some(1),
            ..config_for(&server, dir.path())
        };
        let map = WeatherMap::new(config).await?;
        let report = map
            .report(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
            .await?;

        let err = map.render(&report).await.unwrap_err();
        assert!(matches!(
            err,
            WeatherMapError::Render(RenderError::FigureTooSmall {
                width: 200,
                height: 150
            })
        ));
        assert!(!dir.path().join("out").join("figure.png").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_city_limit_and_missing_boundaries() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let server = fixture_server().await;
        let base = server.uri();
        let config = PipelineConfig::builder()
            .cities_url(format!("{base}/cities"))
            .search_url(format!("{base}/search"))
            .boundary_file(dir.path().join("missing.geojson"))
            .output_dir(dir.path())
            .fetch_delay(Duration::ZERO)
            .city_limit(2)
            .build();

        let map = WeatherMap::new(config).await?;
        let err = map
            .report(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherMapError::Geography(_)));

        // Both CSVs are written before the boundary file is read.
        let weather_csv = std::fs::read_to_string(dir.path().join("weather.csv"))?;
        assert_eq!(weather_csv.lines().count(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_city_list_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cities"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        let config = PipelineConfig::builder()
            .cities_url(format!("{}/cities", server.uri()))
            .output_dir(dir.path())
            .build();

        let map = WeatherMap::new(config).await?;
        let err = map
            .report(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherMapError::CityList(_)));
        assert!(!dir.path().join("states.csv").exists());
        Ok(())
    }
}
