//! Error types for atlas packing.

use thiserror::Error;

use crate::png::PngError;

/// Result type for packing operations.
pub type PackResult<T> = Result<T, PackError>;

/// Errors that can occur while dicing, packing or serializing atlases.
#[derive(Debug, Error)]
pub enum PackError {
    /// A texture cannot be placed into a fresh atlas of the configured size.
    ///
    /// Retrying with the same configuration reproduces the failure.
    #[error(
        "texture '{texture}' ({unique_units} unique units) does not fit into a \
         {atlas_size_limit}x{atlas_size_limit} atlas holding at most {units_per_atlas} units; \
         raise the atlas size limit or reduce unit size/padding"
    )]
    DoesNotFit {
        /// Name of the offending texture.
        texture: String,
        /// Number of distinct units the texture needs.
        unique_units: usize,
        /// Capacity heuristic of one atlas.
        units_per_atlas: usize,
        /// Configured atlas side limit.
        atlas_size_limit: u32,
    },

    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A unit pixel block does not have the padded unit size.
    #[error(
        "unit of texture '{texture}' is {width}x{height}, expected {expected}x{expected} \
         (unit size + 2 x padding)"
    )]
    UnitSizeMismatch {
        /// Name of the texture owning the unit.
        texture: String,
        /// Expected side length.
        expected: u32,
        /// Actual width.
        width: u32,
        /// Actual height.
        height: u32,
    },

    /// An atlas without a single placed unit was asked to finish.
    #[error("atlas holds no units; refusing to serialize an empty image")]
    EmptyAtlas,

    /// Raw pixel data does not match the declared dimensions.
    #[error("invalid pixel data: {0}")]
    InvalidPixelData(String),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    Png(#[from] PngError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Packing was cancelled from a progress callback.
    #[error("packing cancelled after {atlases_done} atlas(es)")]
    Cancelled {
        /// Atlases completed before cancellation.
        atlases_done: usize,
    },
}

impl PackError {
    /// Returns true for the capacity failure kind.
    pub fn is_capacity(&self) -> bool {
        matches!(self, PackError::DoesNotFit { .. })
    }
}
