//! # photo-variants
//!
//! Responsive image variants for a photography portfolio: derive a fixed
//! family of resized WebP and AVIF files from each source photo, then pick
//! which of them a page should request.
//!
//! # Architecture: Generator and Selector
//!
//! ```text
//! generate   _raw/         →  _processed/{slug}/{slug}-{width}.{webp|avif}
//!                          →  _processed/manifest.json
//! records    manifest.json →  content/photos/{slug}.json
//! select     native width  →  variant width, srcset, <picture>
//! ```
//!
//! The two halves never talk to each other at runtime. They agree because
//! both read the same [`widths::StandardWidths`] and [`widths::WidthPolicy`]
//! from one config file, and both rely on one file-naming convention
//! ([`naming`]). Whatever width [`widths::StandardWidths::select`] returns for
//! a photo is one the generator wrote for it, except for photos narrower
//! than the smallest breakpoint, which get no variants at all.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`widths`] | Breakpoints, width policy, `select` and `width_list` |
//! | [`scan`] | Lists source photos, derives slugs, rejects slug collisions |
//! | [`generate`] | Produces variants, placeholder, and the manifest; prunes orphans |
//! | [`imaging`] | Pure-Rust identify, resize, encode, placeholder |
//! | [`cache`] | Content-addressed encoding cache for repeat runs |
//! | [`records`] | Per-photo content records and variant URLs |
//! | [`picture`] | `<picture>` markup with Maud |
//! | [`config`] | `photo-variants.toml` loading, merging, validation |
//! | [`types`] | Manifest types shared by every stage |
//! | [`naming`] | Slugs and `{slug}-{width}.{format}` file names |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Width Policy for Both Halves
//!
//! In native-aware mode the selector may ask for a photo's own width when it
//! falls between two breakpoints. The generator emits exactly
//! [`widths::StandardWidths::width_list`] under the same policy, so that
//! in-between width is generated too. URL builders still only name widths
//! the manifest lists, so a manifest written under another policy never
//! yields a missing file.
//!
//! ## Self-Contained Imaging
//!
//! The [`imaging`] module uses the `image` crate (decoding, Lanczos3
//! resampling), `webp` (lossy WebP via a statically built libwebp) and
//! `rav1e` (AVIF encoding). No ImageMagick, no libvips, no system codecs.
//!
//! ## Sequential Processing
//!
//! One image at a time, one variant at a time. Progress goes over a channel
//! to a printer thread; the work itself never runs concurrently.

pub mod cache;
pub mod config;
pub mod generate;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod picture;
pub mod records;
pub mod scan;
pub mod types;
pub mod widths;

#[cfg(test)]
pub(crate) mod test_helpers;
