//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary; no ImageMagick, no
//! libvips, no system codecs. libwebp is built from source by `webp`.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e) |
//! | Encode → WebP | `webp::Encoder` (libwebp, lossy) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::scaled_height;
use super::params::{Encoding, PlaceholderParams, ResizeParams};
use image::codecs::avif::AvifEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

/// Source extensions we accept, with the decoder each one needs.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Lowercase extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Shrink to `width`, never enlarging past the decoded size.
///
/// Height is recomputed from the decoded pixels, so a wrong header (or the
/// default dimensions) never distorts the aspect ratio.
fn shrink_to_width(img: DynamicImage, width: u32) -> DynamicImage {
    if width >= img.width() {
        return img;
    }
    let height = scaled_height((img.width(), img.height()), width);
    img.resize_exact(width, height, FilterType::Lanczos3)
}

/// Both encoders accept 8-bit RGB(A); normalize 16-bit and float sources.
fn to_8bit(img: DynamicImage) -> DynamicImage {
    if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    }
}

fn encode(img: &DynamicImage, encoding: Encoding, mut writer: impl Write) -> Result<(), BackendError> {
    let img = to_8bit(img.clone());
    match encoding {
        Encoding::Webp { quality } => {
            let encoder = webp::Encoder::from_image(&img).map_err(|e| {
                BackendError::ProcessingFailed(format!("webp encode failed: {}", e))
            })?;
            let encoded = encoder.encode(quality.value() as f32);
            writer.write_all(&encoded).map_err(BackendError::Io)
        }
        Encoding::Avif { quality, speed } => img
            .write_with_encoder(AvifEncoder::new_with_speed_quality(
                writer,
                speed.value(),
                quality.value() as u8,
            ))
            .map_err(|e| BackendError::ProcessingFailed(format!("avif encode failed: {}", e))),
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Option<Dimensions>, BackendError> {
        let reader = ImageReader::open(path)
            .map_err(BackendError::Io)?
            .with_guessed_format()
            .map_err(BackendError::Io)?;
        Ok(match reader.into_dimensions() {
            Ok((width, height)) if width > 0 && height > 0 => Some(Dimensions { width, height }),
            _ => None,
        })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let resized = shrink_to_width(img, params.width);
        let file = std::fs::File::create(&params.output).map_err(BackendError::Io)?;
        let mut writer = std::io::BufWriter::new(file);
        encode(&resized, params.encoding, &mut writer)?;
        writer.flush().map_err(BackendError::Io)
    }

    fn placeholder(&self, params: &PlaceholderParams) -> Result<Vec<u8>, BackendError> {
        let img = load_image(&params.source)?;
        let small = shrink_to_width(img, params.width);
        let mut bytes = Vec::new();
        encode(
            &small,
            Encoding::Webp {
                quality: params.quality,
            },
            &mut bytes,
        )?;
        Ok(bytes)
    }
}
