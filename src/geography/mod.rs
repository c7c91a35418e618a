pub mod boundaries;
pub mod error;
