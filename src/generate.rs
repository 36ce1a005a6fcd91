//! Variant generation.
//!
//! Turns every supported photo in the input directory into a fixed family of
//! resized variants plus an inline placeholder, and returns the [`Manifest`]
//! describing them.
//!
//! ## Output Structure
//!
//! ```text
//! _processed/
//! ├── manifest.json              # Written once by the caller
//! ├── .cache-manifest.json       # Encoding cache
//! └── dawn/
//!     ├── dawn-640.webp
//!     ├── …
//!     ├── dawn-2400.webp
//!     ├── dawn-640.avif
//!     ├── …
//!     └── dawn-2400.avif
//! ```
//!
//! ## Per-image steps
//!
//! 1. Read native dimensions from the header, defaulting to 2400×1600 when
//!    the header has none.
//! 2. Encode the placeholder and embed it as a data URI.
//! 3. For each format, for each width in
//!    [`StandardWidths::width_list`] (ascending): reuse a cached encode or
//!    resize and encode a fresh one.
//!
//! Images are processed one at a time. Any failure aborts the whole run
//! and no manifest is produced.
//!
//! ## Cleanup
//!
//! After every image succeeds, variants that an earlier run wrote but the new
//! manifest no longer lists are deleted, along with slug directories left
//! empty by that. "Written by an earlier run" means listed in the previous
//! `manifest.json` or `.cache-manifest.json`; anything else in the output
//! directory is never touched.
//!
//! The cache manifest is saved after each image, and an entry is dropped
//! from disk before its file is overwritten, so an aborted run never leaves
//! a cache entry describing content that is no longer there.

use crate::cache::{self, CacheKey, CacheManifest, CacheStats};
use crate::config::PipelineConfig;
use crate::imaging::{
    BackendError, EncodingConfig, ImageBackend, Quality, RustBackend, Speed, create_placeholder,
    get_dimensions, plan_resize, plan_variants,
};
use crate::naming::variant_path;
use crate::scan::{ScanError, SourceImage, scan_input};
use crate::types::{Manifest, ManifestEntry, Variant};
use crate::widths::{StandardWidths, WidthPolicy};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Name of the manifest file within the output directory.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Used when an image header yields no dimensions.
pub const DEFAULT_DIMENSIONS: (u32, u32) = (2400, 1600);

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Input directory {input} must not be inside output directory {output}")]
    OverlappingDirs { input: PathBuf, output: PathBuf },
}

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateConfig {
    pub widths: StandardWidths,
    pub policy: WidthPolicy,
    pub placeholder_width: u32,
    pub placeholder_quality: Quality,
    pub encoding: EncodingConfig,
}

impl GenerateConfig {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            widths: config.widths.standard.clone(),
            policy: config.widths.policy,
            placeholder_width: config.placeholder.width,
            placeholder_quality: Quality::new(config.placeholder.quality),
            encoding: EncodingConfig {
                webp_quality: Quality::new(config.webp.quality),
                avif_quality: Quality::new(config.avif.quality),
                avif_speed: Speed::new(config.avif.speed),
            },
        }
    }
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

/// How a variant file came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantStatus {
    /// Already on disk from a previous run.
    Cached,
    /// Found under another path (source renamed) and copied.
    Copied,
    Encoded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantInfo {
    pub label: String,
    pub status: VariantStatus,
}

/// Progress events, sent in order as the run advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateEvent {
    Started {
        image_count: usize,
    },
    ImageProcessed {
        /// 1-based position in the run.
        index: usize,
        slug: String,
        source_path: String,
        dimensions: (u32, u32),
        /// The header had no dimensions; [`DEFAULT_DIMENSIONS`] were used.
        defaulted: bool,
        variants: Vec<VariantInfo>,
    },
    /// An orphaned output was deleted. Relative to the output directory.
    Pruned {
        path: String,
    },
}

#[derive(Debug)]
pub struct GenerateResult {
    pub manifest: Manifest,
    pub cache_stats: CacheStats,
    /// Deleted orphans, relative to the output directory.
    pub pruned: Vec<String>,
}

/// Generate variants for every photo in `input` with the pure Rust backend.
///
/// When `use_cache` is false every variant is re-encoded.
pub fn generate(
    input: &Path,
    output: &Path,
    config: &GenerateConfig,
    use_cache: bool,
    progress: Option<Sender<GenerateEvent>>,
) -> Result<GenerateResult, GenerateError> {
    let backend = RustBackend::new();
    generate_with_backend(&backend, input, output, config, use_cache, progress)
}

/// Generate variants using a specific backend (allows testing with mock).
pub fn generate_with_backend(
    backend: &impl ImageBackend,
    input: &Path,
    output: &Path,
    config: &GenerateConfig,
    use_cache: bool,
    progress: Option<Sender<GenerateEvent>>,
) -> Result<GenerateResult, GenerateError> {
    let images = scan_input(input)?;

    fs::create_dir_all(output)?;
    check_overlap(input, output)?;

    let emit = |event: GenerateEvent| {
        if let Some(tx) = &progress {
            tx.send(event).ok();
        }
    };
    emit(GenerateEvent::Started {
        image_count: images.len(),
    });

    let mut cache = CacheManifest::load(output);
    let previous = previous_outputs(output, &cache);
    if !use_cache {
        cache = CacheManifest::empty();
        cache.save(output)?;
    }
    let mut stats = CacheStats::default();
    let mut entries = Vec::with_capacity(images.len());

    for (i, image) in images.iter().enumerate() {
        let processed = generate_entry(backend, image, output, config, &mut cache, &mut stats)?;
        emit(GenerateEvent::ImageProcessed {
            index: i + 1,
            slug: processed.entry.slug.clone(),
            source_path: processed.entry.original_path.clone(),
            dimensions: (processed.entry.width, processed.entry.height),
            defaulted: processed.defaulted,
            variants: processed.variants,
        });
        entries.push(processed.entry);
        cache.save(output)?;
    }

    let manifest = Manifest { entries };
    let pruned = prune_orphans(output, &previous, &manifest)?;
    for path in &pruned {
        emit(GenerateEvent::Pruned { path: path.clone() });
    }

    let live: HashSet<&str> = manifest
        .entries
        .iter()
        .flat_map(|e| e.variants.iter().map(|v| v.path.as_str()))
        .collect();
    cache.retain(|path| live.contains(path));
    cache.save(output)?;

    Ok(GenerateResult {
        manifest,
        cache_stats: stats,
        pruned,
    })
}

/// Write `manifest.json` into the output directory.
pub fn write_manifest(output: &Path, manifest: &Manifest) -> Result<PathBuf, GenerateError> {
    let path = output.join(MANIFEST_FILENAME);
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(&path, json)?;
    Ok(path)
}

/// Pruning the output directory must never reach the sources.
fn check_overlap(input: &Path, output: &Path) -> Result<(), GenerateError> {
    let input_abs = input.canonicalize()?;
    let output_abs = output.canonicalize()?;
    if input_abs.starts_with(&output_abs) {
        return Err(GenerateError::OverlappingDirs {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        });
    }
    Ok(())
}

struct ProcessedImage {
    entry: ManifestEntry,
    defaulted: bool,
    variants: Vec<VariantInfo>,
}

fn generate_entry(
    backend: &impl ImageBackend,
    image: &SourceImage,
    output: &Path,
    config: &GenerateConfig,
    cache: &mut CacheManifest,
    stats: &mut CacheStats,
) -> Result<ProcessedImage, GenerateError> {
    let (dimensions, defaulted) = match get_dimensions(backend, &image.path)? {
        Some(dims) => (dims, false),
        None => (DEFAULT_DIMENSIONS, true),
    };
    let lqip = create_placeholder(
        backend,
        &image.path,
        config.placeholder_width,
        config.placeholder_quality,
    )?;

    let plan = plan_variants(dimensions, &config.widths, config.policy);
    if !plan.is_empty() {
        fs::create_dir_all(output.join(&image.slug))?;
    }
    let source_hash = cache::hash_file(&image.path)?;

    let mut variants = Vec::with_capacity(plan.len());
    let mut infos = Vec::with_capacity(plan.len());
    for planned in &plan {
        let params = plan_resize(&image.path, output, &image.slug, planned, &config.encoding);
        let rel_path = variant_path(&image.slug, planned.width, planned.format);
        let key = CacheKey::new(&source_hash, &params.encoding, planned.width);

        let status = match cache.find(&key, output).map(str::to_owned) {
            Some(stored) if stored == rel_path => {
                stats.hits += 1;
                VariantStatus::Cached
            }
            found => {
                if cache.forget(&rel_path) {
                    cache.save(output)?;
                }
                match found {
                    Some(stored) => {
                        fs::copy(output.join(&stored), &params.output)?;
                        stats.copies += 1;
                        VariantStatus::Copied
                    }
                    None => {
                        backend.resize(&params)?;
                        stats.encoded += 1;
                        VariantStatus::Encoded
                    }
                }
            }
        };
        cache.insert(&rel_path, key);

        infos.push(VariantInfo {
            label: format!("{}px {}", planned.width, planned.format),
            status,
        });
        variants.push(Variant {
            format: planned.format,
            width: planned.width,
            path: rel_path,
        });
    }

    Ok(ProcessedImage {
        entry: ManifestEntry {
            slug: image.slug.clone(),
            original_path: image.path.to_string_lossy().into_owned(),
            width: dimensions.0,
            height: dimensions.1,
            lqip,
            variants,
        },
        defaulted,
        variants: infos,
    })
}

/// Variant paths earlier runs wrote, relative to `output`.
///
/// Read from the previous `manifest.json` (if it parses) and the cache
/// manifest. Only `{dir}/{file}` paths are accepted.
fn previous_outputs(output: &Path, cache: &CacheManifest) -> BTreeSet<String> {
    let previous_manifest = fs::read_to_string(output.join(MANIFEST_FILENAME))
        .ok()
        .and_then(|json| serde_json::from_str::<Manifest>(&json).ok())
        .unwrap_or_default();
    previous_manifest
        .entries
        .iter()
        .flat_map(|e| e.variants.iter().map(|v| v.path.as_str()))
        .chain(cache.paths())
        .filter(|path| split_variant_path(path).is_some())
        .map(str::to_owned)
        .collect()
}

fn split_variant_path(path: &str) -> Option<(&str, &str)> {
    let (dir, file) = path.split_once('/')?;
    let plain = |part: &str| !part.is_empty() && !part.starts_with('.') && !part.contains('/');
    (plain(dir) && plain(file)).then_some((dir, file))
}

/// Delete previously written variants the new manifest doesn't list.
/// Returns what was removed, relative to `output`, sorted.
///
/// A directory that is not a current slug and ends up empty is removed and
/// reported once as `{dir}/`.
fn prune_orphans(
    output: &Path,
    previous: &BTreeSet<String>,
    manifest: &Manifest,
) -> Result<Vec<String>, GenerateError> {
    let slugs: HashSet<&str> = manifest.entries.iter().map(|e| e.slug.as_str()).collect();
    let live: HashSet<&str> = manifest
        .entries
        .iter()
        .flat_map(|e| e.variants.iter().map(|v| v.path.as_str()))
        .collect();

    let mut stale: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for path in previous {
        if live.contains(path.as_str()) {
            continue;
        }
        if let Some((dir, file)) = split_variant_path(path) {
            stale.entry(dir).or_default().push(file);
        }
    }

    let mut pruned = Vec::new();
    for (dir, files) in stale {
        let dir_path = output.join(dir);
        let mut removed = Vec::new();
        for file in files {
            match fs::remove_file(dir_path.join(file)) {
                Ok(()) => removed.push(format!("{}/{}", dir, file)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        let now_empty = !slugs.contains(dir)
            && dir_path.is_dir()
            && fs::read_dir(&dir_path)?.next().is_none();
        if now_empty {
            fs::remove_dir(&dir_path)?;
            pruned.push(format!("{}/", dir));
        } else {
            pruned.extend(removed);
        }
    }
    Ok(pruned)
}
