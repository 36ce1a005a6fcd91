//! Shared types written by the generator and read by everything downstream.
//!
//! [`Manifest`] is serialized to `manifest.json` as a plain JSON array with
//! camelCase keys, which is the shape content ingestion expects:
//!
//! ```json
//! [{
//!   "slug": "dawn",
//!   "originalPath": "_raw/Dawn.jpg",
//!   "width": 3000,
//!   "height": 2000,
//!   "lqip": "data:image/webp;base64,...",
//!   "variants": [{ "format": "webp", "width": 640, "path": "dawn/dawn-640.webp" }]
//! }]
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoded output format of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Webp,
    Avif,
}

impl OutputFormat {
    /// Generation order: every WebP variant, then every AVIF variant.
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Webp, OutputFormat::Avif];

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Webp => "webp",
            OutputFormat::Avif => "avif",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Webp => "image/webp",
            OutputFormat::Avif => "image/avif",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One generated file. `path` is relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub format: OutputFormat,
    pub width: u32,
    pub path: String,
}

/// Everything generated for one source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub slug: String,
    pub original_path: String,
    /// Native width (or the default when the header had none).
    pub width: u32,
    pub height: u32,
    /// Placeholder as a self-contained data URI.
    pub lqip: String,
    pub variants: Vec<Variant>,
}

impl ManifestEntry {
    pub fn variant(&self, width: u32, format: OutputFormat) -> Option<&Variant> {
        self.variants
            .iter()
            .find(|v| v.width == width && v.format == format)
    }

    /// Generated widths for one format, in manifest order (ascending).
    pub fn widths(&self, format: OutputFormat) -> Vec<u32> {
        self.variants
            .iter()
            .filter(|v| v.format == format)
            .map(|v| v.width)
            .collect()
    }
}

/// The generator's single output artifact, ordered by source file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn find(&self, slug: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.slug == slug)
    }

    pub fn variant_count(&self) -> usize {
        self.entries.iter().map(|e| e.variants.len()).sum()
    }
}
