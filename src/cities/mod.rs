pub mod city_scraper;
pub mod error;
