pub mod error;
pub mod merge;
pub mod palette;
pub mod summary;
