//! Input directory scanning.
//!
//! Stage 1 of the generator. Lists the source photos in a flat input
//! directory, derives each one's slug, and rejects inputs that would make two
//! sources write to the same variant files.
//!
//! ```text
//! _raw/
//! ├── Dawn.jpg            → dawn
//! ├── Old Pier.tiff       → old-pier
//! ├── notes.txt           (skipped: not a supported extension)
//! ├── .DS_Store           (skipped: hidden)
//! └── drafts/             (skipped: subdirectories are not descended)
//! ```
//!
//! Extensions are matched case-insensitively against the decoders compiled
//! into [`RustBackend`](crate::imaging::RustBackend). Results are sorted by
//! file name, which fixes the manifest order.

use crate::imaging::supported_input_extensions;
use crate::naming::slugify;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read input directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Input directory not found: {0}")]
    InputNotFound(PathBuf),
    #[error("No supported images in {0}")]
    NoImages(PathBuf),
    #[error("Slug '{slug}' produced by both {first} and {second}")]
    SlugCollision {
        slug: String,
        first: String,
        second: String,
    },
}

/// A source photo selected for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub slug: String,
    pub path: PathBuf,
    pub file_name: String,
}

/// Scan `input` for supported source photos, sorted by file name.
///
/// Fails when the directory is missing, holds no supported images, or two
/// file names produce the same slug.
pub fn scan_input(input: &Path) -> Result<Vec<SourceImage>, ScanError> {
    if !input.is_dir() {
        return Err(ScanError::InputNotFound(input.to_path_buf()));
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(input)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with('.') || !is_supported(entry.path()) {
            continue;
        }
        images.push(SourceImage {
            slug: slugify(&file_name),
            path: entry.into_path(),
            file_name,
        });
    }

    if images.is_empty() {
        return Err(ScanError::NoImages(input.to_path_buf()));
    }
    check_slug_collisions(&images)?;
    Ok(images)
}

fn is_supported(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    supported_input_extensions().contains(&ext.as_str())
}

fn check_slug_collisions(images: &[SourceImage]) -> Result<(), ScanError> {
    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
    for image in images {
        if let Some(first) = seen.insert(&image.slug, &image.file_name) {
            return Err(ScanError::SlugCollision {
                slug: image.slug.clone(),
                first: first.to_string(),
                second: image.file_name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "fake image").unwrap();
    }

    fn slugs(images: &[SourceImage]) -> Vec<&str> {
        images.iter().map(|i| i.slug.as_str()).collect()
    }

    #[test]
    fn finds_supported_images_sorted_by_name() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "b-sunset.png");
        touch(tmp.path(), "a-dawn.jpg");
        touch(tmp.path(), "c-pier.webp");

        let images = scan_input(tmp.path()).unwrap();

        assert_eq!(slugs(&images), vec!["a-dawn", "b-sunset", "c-pier"]);
        assert_eq!(images[0].file_name, "a-dawn.jpg");
        assert_eq!(images[0].path, tmp.path().join("a-dawn.jpg"));
    }

    #[test]
    fn extensions_match_case_insensitively() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "Dawn.JPG");
        touch(tmp.path(), "Fog.TiF");

        let images = scan_input(tmp.path()).unwrap();
        assert_eq!(slugs(&images), vec!["dawn", "fog"]);
    }

    #[test]
    fn unsupported_and_hidden_files_skipped() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "dawn.jpg");
        touch(tmp.path(), "notes.txt");
        touch(tmp.path(), "raw.avif");
        touch(tmp.path(), "README");
        touch(tmp.path(), ".hidden.jpg");

        let images = scan_input(tmp.path()).unwrap();
        assert_eq!(slugs(&images), vec!["dawn"]);
    }

    #[test]
    fn subdirectories_not_descended() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "dawn.jpg");
        let nested = tmp.path().join("drafts.jpg");
        fs::create_dir_all(&nested).unwrap();
        touch(&nested, "draft.jpg");

        let images = scan_input(tmp.path()).unwrap();
        assert_eq!(slugs(&images), vec!["dawn"]);
    }

    #[test]
    fn whitespace_in_names_becomes_hyphens() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "Old  Pier at Night.jpeg");

        let images = scan_input(tmp.path()).unwrap();
        assert_eq!(slugs(&images), vec!["old-pier-at-night"]);
    }

    #[test]
    fn missing_directory_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan_input(&tmp.path().join("nope"));
        assert!(matches!(result, Err(ScanError::InputNotFound(_))));
    }

    #[test]
    fn no_images_is_error() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "notes.txt");

        let result = scan_input(tmp.path());
        assert!(matches!(result, Err(ScanError::NoImages(_))));
    }

    #[test]
    fn slug_collision_names_both_files() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "Dawn.jpg");
        touch(tmp.path(), "dawn.png");

        match scan_input(tmp.path()) {
            Err(ScanError::SlugCollision {
                slug,
                first,
                second,
            }) => {
                assert_eq!(slug, "dawn");
                assert_eq!(first, "Dawn.jpg");
                assert_eq!(second, "dawn.png");
            }
            other => panic!("expected slug collision, got {other:?}"),
        }
    }
}
