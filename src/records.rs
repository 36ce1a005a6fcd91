//! Content records and variant URLs.
//!
//! A record is the durable, hand-editable description of one photo that the
//! site's content layer reads. It is derived once from a manifest entry and
//! never overwritten afterwards, so curated titles, tags, and ordering survive
//! later runs.
//!
//! ```yaml
//! title: Old Pier
//! url: https://cdn.example.com/photos/old-pier
//! width: 3000
//! height: 2000
//! lqip: data:image/webp;base64,...
//! tags: []
//! sortOrder: 1
//! exif:
//!   camera: FUJIFILM X-T4
//!   aperture: f/2.8
//!   shutter: 1/250s
//!   iso: 400
//!   date: 2024-03-01
//! ```
//!
//! The `exif` block is read from the source photo when the record is first
//! written and omitted when the photo carries none.
//!
//! Variant URLs are rebuilt from the record: the slug is the last path
//! segment of `url`, and the file name follows the naming convention, so
//! `{url}/{slug}-{width}.{format}`. Which widths exist is taken from the
//! manifest entry, never recomputed from the current config.

use crate::imaging::{ExifData, read_exif};
use crate::naming::{title_from_slug, variant_file_name};
use crate::types::{Manifest, ManifestEntry, OutputFormat};
use crate::widths::{StandardWidths, WidthPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("No photo with slug '{0}' in the manifest")]
    UnknownSlug(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub title: String,
    /// Base URL of the photo's variants, ending in its slug.
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub lqip: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub sort_order: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exif: Option<ExifData>,
}

impl PhotoRecord {
    pub fn from_entry(entry: &ManifestEntry, base_url: &str, sort_order: usize) -> Self {
        Self {
            title: title_from_slug(&entry.slug),
            url: format!("{}/{}", base_url.trim_end_matches('/'), entry.slug),
            width: entry.width,
            height: entry.height,
            lqip: entry.lqip.clone(),
            tags: Vec::new(),
            sort_order,
            exif: None,
        }
    }

    /// Last path segment of `url`.
    pub fn slug(&self) -> &str {
        let url = self.url.trim_end_matches('/');
        url.rsplit('/').next().unwrap_or(url)
    }

    /// `{url}/{slug}-{width}.{ext}`
    pub fn variant_url(&self, width: u32, format: OutputFormat) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            variant_file_name(self.slug(), width, format)
        )
    }

    /// URL of the variant to request for this photo's native width.
    ///
    /// `generated` are the widths that exist for `format`. The selector's
    /// choice is used when it was generated; otherwise the widest generated
    /// width not above it (a manifest written under another policy or other
    /// breakpoints). With nothing generated this names the selector's choice,
    /// a file that does not exist.
    pub fn best_url(
        &self,
        format: OutputFormat,
        generated: &[u32],
        widths: &StandardWidths,
        policy: WidthPolicy,
    ) -> String {
        let chosen = widths.select(self.width, policy);
        let width = if generated.contains(&chosen) {
            chosen
        } else {
            generated
                .iter()
                .copied()
                .filter(|&w| w <= chosen)
                .max()
                .or_else(|| generated.iter().copied().max())
                .unwrap_or(chosen)
        };
        self.variant_url(width, format)
    }

    /// `srcset` over the generated widths: `"{url} 640w, {url} 750w"`.
    ///
    /// Empty when no variants exist.
    pub fn srcset(&self, format: OutputFormat, generated: &[u32]) -> String {
        generated
            .iter()
            .map(|&w| format!("{} {}w", self.variant_url(w, format), w))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Read a `manifest.json` written by the generator.
pub fn read_manifest(path: &Path) -> Result<Manifest, RecordsError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Record for `slug`, numbered by its manifest position.
pub fn find_record(
    manifest: &Manifest,
    slug: &str,
    base_url: &str,
) -> Result<PhotoRecord, RecordsError> {
    manifest
        .entries
        .iter()
        .position(|e| e.slug == slug)
        .map(|i| PhotoRecord::from_entry(&manifest.entries[i], base_url, i + 1))
        .ok_or_else(|| RecordsError::UnknownSlug(slug.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Created(PathBuf),
    /// A record already existed and was left untouched.
    Skipped(PathBuf),
}

/// Write `{dir}/{slug}.yaml` for every manifest entry, in manifest order.
///
/// `sortOrder` is the 1-based manifest position. EXIF comes from the entry's
/// `originalPath`. Existing files are never overwritten.
pub fn write_records(
    manifest: &Manifest,
    dir: &Path,
    base_url: &str,
) -> Result<Vec<RecordOutcome>, RecordsError> {
    fs::create_dir_all(dir)?;

    let mut outcomes = Vec::with_capacity(manifest.entries.len());
    for (i, entry) in manifest.entries.iter().enumerate() {
        let path = dir.join(format!("{}.yaml", entry.slug));
        let file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                outcomes.push(RecordOutcome::Skipped(path));
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let mut record = PhotoRecord::from_entry(entry, base_url, i + 1);
        let exif = read_exif(Path::new(&entry.original_path));
        record.exif = (!exif.is_empty()).then_some(exif);
        let mut writer = io::BufWriter::new(file);
        serde_yaml::to_writer(&mut writer, &record)?;
        writer.flush()?;
        outcomes.push(RecordOutcome::Created(path));
    }
    Ok(outcomes)
}
