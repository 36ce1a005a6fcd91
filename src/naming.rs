//! Slugs and variant file names.
//!
//! The variant naming convention is the only binding contract between the
//! files the generator writes and the URLs the renderer builds:
//!
//! ```text
//! {slug}-{width}.{format}         e.g. dawn-1600.avif
//! ```
//!
//! On disk each variant lives in a directory named after its slug
//! (`{slug}/{slug}-{width}.{format}`); a record's base URL points at that
//! directory.

use crate::types::OutputFormat;
use std::path::Path;

/// Derive a slug from a source file name.
///
/// Strips the extension, lowercases, and replaces every whitespace run with a
/// single hyphen. Leading and trailing whitespace become hyphens too:
/// `"Old Pier .jpg"` → `"old-pier-"`.
pub fn slugify(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();

    let mut slug = String::with_capacity(stem.len());
    let mut in_whitespace = false;
    for c in stem.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.extend(c.to_lowercase());
            in_whitespace = false;
        }
    }
    slug
}

/// `{slug}-{width}.{ext}`
pub fn variant_file_name(slug: &str, width: u32, format: OutputFormat) -> String {
    format!("{}-{}.{}", slug, width, format.extension())
}

/// `{slug}/{slug}-{width}.{ext}`, relative to the output directory.
pub fn variant_path(slug: &str, width: u32, format: OutputFormat) -> String {
    format!("{}/{}", slug, variant_file_name(slug, width, format))
}

/// Display title for a slug: hyphens become spaces, each word capitalized.
///
/// `"morning-fog-2"` → `"Morning Fog 2"`
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
