//! Error types shared across the crate.
//!
//! Load failures are never returned to the caller of [`crate::ThumbTile`]; they
//! only travel as far as the loader, which logs them and marks the item as
//! failed. The variants here cover probing, configuration files and tasks.

use thiserror::Error;

/// Everything that can go wrong inside thumbtile
#[derive(Debug, Error)]
pub enum ThumbTileError {
    /// Reading an image or a config file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image header could not be understood
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Options or descriptor JSON was malformed
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A probe task panicked or was cancelled
    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The image reported a zero height, so it cannot be scaled to a base height
    #[error("image has zero height: {0}")]
    ZeroHeight(String),
}

pub type Result<T> = std::result::Result<T, ThumbTileError>;
