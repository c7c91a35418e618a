// Scrapes the first five cities and prints the summary. Needs Niger_geojson.geojson
// in the working directory.

use naija_weather::{PipelineConfig, WeatherMap, WeatherMapError};
use std::env;

#[tokio::main]
async fn main() -> Result<(), WeatherMapError> {
    configure_polars_display();
    pretty_env_logger::init();

    let config = PipelineConfig::builder()
        .output_dir("demo_output")
        .city_limit(5)
        .build();
    let map = WeatherMap::new(config).await?;
    let report = map.report(chrono::Local::now().date_naive()).await?;

    println!("{}", report.weather);
    for failure in &report.failures {
        println!("skipped {}: {}", failure.city, failure.error);
    }

    println!("{}", report.summary.title());
    for line in report.summary.lines() {
        println!("{}", line);
    }

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show 20 rows
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
