pub mod error;
pub mod extract;
pub mod throttle;
pub mod weather_scraper;
