//! Image processing with statically linked codecs, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Resize → WebP** | Lanczos3 + libwebp lossy encoder (`webp`) |
//! | **Resize → AVIF** | Lanczos3 + rav1e encoder |
//! | **Placeholder** | 20px low-quality WebP, base64 data URI |
//! | **EXIF** | Hand-rolled JPEG APP1 / TIFF IFD reader |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
mod exif_parser;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{PlannedVariant, plan_variants, scaled_height};
pub use exif_parser::{ExifData, read_exif};
pub use operations::{
    EncodingConfig, create_placeholder, data_uri, get_dimensions, plan_resize,
};
pub use params::{Encoding, PlaceholderParams, Quality, ResizeParams, Speed};
pub use rust_backend::{RustBackend, supported_input_extensions};
