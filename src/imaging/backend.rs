//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the generator
//! needs: identify, resize, and placeholder. The production implementation
//! is [`RustBackend`](super::rust_backend::RustBackend); tests use the
//! recording `MockBackend` below.

use super::params::{PlaceholderParams, ResizeParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Read dimensions from the image header.
    ///
    /// `Ok(None)` means the file is readable but its header carries no usable
    /// dimensions; callers fall back to a default. IO failures are errors.
    fn identify(&self, path: &Path) -> Result<Option<Dimensions>, BackendError>;

    /// Decode, resize, encode, and write one variant.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;

    /// Produce the encoded placeholder bytes (lossy WebP).
    fn placeholder(&self, params: &PlaceholderParams) -> Result<Vec<u8>, BackendError>;
}
