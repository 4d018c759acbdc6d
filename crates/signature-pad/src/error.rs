//! Signature pad errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PadError {
    #[error("No drawing surface supplied")]
    MissingSurface,

    #[error("Cannot allocate a {width}x{height} raster")]
    Allocation { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

pub type PadResult<T> = Result<T, PadError>;
