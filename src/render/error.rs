use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed drawing the figure: {0}")]
    Draw(String),

    #[error("Failed to write figure '{0}': {1}")]
    Write(PathBuf, String),

    #[error("Boundary index {0} out of range for {1} loaded states")]
    BoundaryIndex(u32, usize),

    #[error("Nothing to draw: no state has a usable bounding box")]
    EmptyExtent,

    #[error("Figure size {width}x{height} leaves no room for the map")]
    FigureTooSmall { width: u32, height: u32 },

    #[error("Bundled font '{0}' could not be loaded")]
    Font(&'static str),
}
