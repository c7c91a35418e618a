//! Command-line entry point: scrape today's weather for Nigerian cities and save
//! the state map.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use naija_weather::{
    PipelineConfig, WeatherMap, DEFAULT_BOUNDARY_FILE, DEFAULT_CITIES_URL, DEFAULT_CREDIT,
    DEFAULT_FIGURE, DEFAULT_SEARCH_URL, DEFAULT_STATES_CSV, DEFAULT_USER_AGENT,
    DEFAULT_WEATHER_CSV,
};

#[derive(Parser)]
#[command(
    name = "naija-weather",
    about = "Scrape current weather for Nigerian cities and draw it per state"
)]
struct Cli {
    /// GeoJSON file with the state boundaries
    #[arg(long, default_value = DEFAULT_BOUNDARY_FILE)]
    boundaries: PathBuf,

    /// Directory for the CSVs, figure and summary
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_CITIES_URL)]
    cities_url: String,

    #[arg(long, default_value = DEFAULT_SEARCH_URL)]
    search_url: String,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    #[arg(long, default_value = DEFAULT_STATES_CSV)]
    states_csv: String,

    #[arg(long, default_value = DEFAULT_WEATHER_CSV)]
    weather_csv: String,

    #[arg(long, default_value = DEFAULT_FIGURE)]
    figure: String,

    /// Also write the summary as JSON under this file name
    #[arg(long)]
    summary_json: Option<String>,

    /// Seconds to wait after each weather request
    #[arg(long, default_value_t = 5)]
    delay: u64,

    /// Upper bound in seconds for the delay while rate limited
    #[arg(long, default_value_t = 60)]
    max_delay: u64,

    /// Only look up the first N cities
    #[arg(long)]
    limit: Option<usize>,

    #[arg(long, default_value = DEFAULT_CREDIT)]
    credit: String,

    #[arg(long, default_value_t = 1400)]
    width: u32,

    #[arg(long, default_value_t = 1000)]
    height: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = PipelineConfig::builder()
        .boundary_file(cli.boundaries)
        .output_dir(cli.output_dir)
        .cities_url(cli.cities_url)
        .search_url(cli.search_url)
        .user_agent(cli.user_agent)
        .states_csv(cli.states_csv)
        .weather_csv(cli.weather_csv)
        .figure(cli.figure)
        .maybe_summary_json(cli.summary_json)
        .fetch_delay(Duration::from_secs(cli.delay))
        .max_fetch_delay(Duration::from_secs(cli.max_delay))
        .maybe_city_limit(cli.limit)
        .credit(cli.credit)
        .figure_size((cli.width, cli.height))
        .build();

    let figure = WeatherMap::new(config).await?.run().await?;
    log::info!("Done: {}", figure.display());
    Ok(())
}
