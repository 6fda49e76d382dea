//! Renderer errors.

use thiserror::Error;

/// Errors returned by the frame loop. All of them leave the renderer usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Frame is {actual:?} pixels but the accumulation buffer is {expected:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Frame {frame} was cancelled")]
    Cancelled { frame: u32 },
}

pub type RenderResult<T> = Result<T, RenderError>;
