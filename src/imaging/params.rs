//! Parameter types for image operations.
//!
//! These structs describe *what* to produce, not *how*. They are the
//! interface between [`operations`](super::operations), which decides which
//! files to create, and the [`backend`](super::backend), which does the pixel
//! work, so a mock backend can stand in for tests.
//!
//! ## Types
//!
//! - [`Quality`]: lossy encoding quality (1–100), clamped on construction.
//! - [`Speed`]: AV1 encoder speed (1 = slowest/best, 10 = fastest), clamped.
//! - [`Encoding`]: format plus its format-specific settings.
//! - [`ResizeParams`]: one variant to write.
//! - [`PlaceholderParams`]: the in-memory LQIP to produce.

use crate::types::OutputFormat;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// AV1 encoder speed (1-10).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Speed(pub u8);

impl Speed {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 10))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(6)
    }
}

/// How a variant is encoded. Both formats are lossy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Webp { quality: Quality },
    Avif { quality: Quality, speed: Speed },
}

impl Encoding {
    pub fn format(self) -> OutputFormat {
        match self {
            Encoding::Webp { .. } => OutputFormat::Webp,
            Encoding::Avif { .. } => OutputFormat::Avif,
        }
    }
}

/// Parameters for writing one resized variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Target bounds. The backend never enlarges past the decoded size.
    pub width: u32,
    pub height: u32,
    pub encoding: Encoding,
}

/// Parameters for the low-quality placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderParams {
    pub source: PathBuf,
    pub width: u32,
    /// WebP quality; low, the placeholder is blurred on screen anyway.
    pub quality: Quality,
}
