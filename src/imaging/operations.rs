//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::PlannedVariant;
use super::params::{Encoding, PlaceholderParams, Quality, ResizeParams, Speed};
use crate::naming::variant_path;
use crate::types::OutputFormat;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
///
/// `Ok(None)` when the header carries no usable dimensions.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<Option<(u32, u32)>> {
    let dims = backend.identify(path)?;
    Ok(dims.map(|d| (d.width, d.height)))
}

/// Encoder settings shared by every variant of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingConfig {
    pub webp_quality: Quality,
    pub avif_quality: Quality,
    pub avif_speed: Speed,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            webp_quality: Quality::new(82),
            avif_quality: Quality::new(72),
            avif_speed: Speed::default(),
        }
    }
}

impl EncodingConfig {
    pub fn encoding_for(&self, format: OutputFormat) -> Encoding {
        match format {
            OutputFormat::Webp => Encoding::Webp {
                quality: self.webp_quality,
            },
            OutputFormat::Avif => Encoding::Avif {
                quality: self.avif_quality,
                speed: self.avif_speed,
            },
        }
    }
}

/// Plan one variant write without executing it.
///
/// The output lands at `{output_dir}/{slug}/{slug}-{width}.{ext}`.
pub fn plan_resize(
    source: &Path,
    output_dir: &Path,
    slug: &str,
    planned: &PlannedVariant,
    config: &EncodingConfig,
) -> ResizeParams {
    ResizeParams {
        source: source.to_path_buf(),
        output: output_dir.join(variant_path(slug, planned.width, planned.format)),
        width: planned.width,
        height: planned.height,
        encoding: config.encoding_for(planned.format),
    }
}

/// `data:{mime};base64,{payload}`
pub fn data_uri(format: OutputFormat, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes))
}

/// Create the placeholder for `source` as a WebP data URI.
pub fn create_placeholder(
    backend: &impl ImageBackend,
    source: &Path,
    width: u32,
    quality: Quality,
) -> Result<String> {
    let bytes = backend.placeholder(&PlaceholderParams {
        source: source.to_path_buf(),
        width,
        quality,
    })?;
    Ok(data_uri(OutputFormat::Webp, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};

    #[test]
    fn get_dimensions_calls_backend() {
        let backend = MockBackend::with_dimensions(&[("test.jpg", 1920, 1080)]);

        let dims = get_dimensions(&backend, Path::new("/test.jpg")).unwrap();
        assert_eq!(dims, Some((1920, 1080)));
        assert_eq!(get_dimensions(&backend, Path::new("/other.jpg")).unwrap(), None);
    }

    #[test]
    fn encoding_for_each_format() {
        let config = EncodingConfig::default();
        assert_eq!(
            config.encoding_for(OutputFormat::Webp),
            Encoding::Webp {
                quality: Quality::new(82),
            }
        );
        assert_eq!(
            config.encoding_for(OutputFormat::Avif),
            Encoding::Avif {
                quality: Quality::new(72),
                speed: Speed::new(6),
            }
        );
    }

    #[test]
    fn plan_resize_uses_naming_convention() {
        let planned = PlannedVariant {
            format: OutputFormat::Avif,
            width: 1600,
            height: 1067,
        };
        let params = plan_resize(
            Path::new("/raw/Dawn.jpg"),
            Path::new("/out"),
            "dawn",
            &planned,
            &EncodingConfig::default(),
        );

        assert_eq!(params.output, Path::new("/out/dawn/dawn-1600.avif"));
        assert_eq!(params.source, Path::new("/raw/Dawn.jpg"));
        assert_eq!((params.width, params.height), (1600, 1067));
        assert_eq!(params.encoding.format(), OutputFormat::Avif);
    }

    #[test]
    fn data_uri_is_base64() {
        assert_eq!(
            data_uri(OutputFormat::Webp, b"lqip"),
            "data:image/webp;base64,bHFpcA=="
        );
    }

    #[test]
    fn create_placeholder_uses_backend() {
        let backend = MockBackend::new();

        let uri =
            create_placeholder(&backend, Path::new("/source.jpg"), 20, Quality::new(20)).unwrap();

        assert_eq!(uri, "data:image/webp;base64,bHFpcA==");
        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::Placeholder {
                source: "/source.jpg".to_string(),
                width: 20,
                quality: Quality::new(20),
            }]
        );
    }
}
