pub mod choropleth;
pub mod error;
