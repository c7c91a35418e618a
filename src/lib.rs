mod cities;
mod config;
mod error;
mod geography;
mod render;
mod report;
mod utils;
mod weather;
mod weather_map;

#[cfg(test)]
mod test_utils;

pub use config::*;
pub use error::WeatherMapError;
pub use weather_map::*;

pub use cities::city_scraper::{
    city_names, clean_city_name, parse_city_table, CityListScraper, CityTable, COL_CITY,
    COL_CITY_NAME, COL_STATE,
};
pub use weather::extract;
pub use weather::throttle::Throttle;
pub use weather::weather_scraper::{
    parse_weather_page, weather_frame, CityFailure, CityWeather, WeatherScrape, WeatherScraper,
};
pub use geography::boundaries::{
    boundaries_frame, load_boundaries, parse_boundaries, StateBoundary, STATE_PROPERTY,
};
pub use report::merge::{
    derive_numeric_columns, join_boundaries, join_cities_weather, merge_all, report_rows,
    ReportRow, UNDETERMINED,
};
pub use report::palette::{legend_order, spectral, spectral_palette, Rgb, StatusPalette};
pub use report::summary::{StatusCount, WeatherSummary, NORMAL_WIND_KMH, ROOM_TEMPERATURE_C};
pub use render::choropleth::{
    draw_regions, extent, map_area, register_bundled_font, render_choropleth, Projection,
};

pub use cities::error::CityListError;
pub use geography::error::GeographyError;
pub use render::error::RenderError;
pub use report::error::ReportError;
pub use weather::error::{WeatherScrapeError, WeatherTableError};
