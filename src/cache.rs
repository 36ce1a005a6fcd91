//! Encoding cache for repeat runs.
//!
//! AVIF encoding dominates generation time: five widths of a 24MP photo
//! through rav1e take tens of seconds. This module lets the generator skip a
//! variant when neither the source bytes nor its encoding parameters have
//! changed since the previous run.
//!
//! Only variant encoding is cached. Dimension reads and the placeholder
//! always run, so the manifest entry is rebuilt from scratch every time.
//!
//! ## Keys
//!
//! Lookups are content-addressed by a [`CacheKey`]:
//!
//! - **`source_hash`**: SHA-256 of the source file bytes. Renaming a photo
//!   (and so changing its slug) keeps the hash, so the old variants are
//!   copied to the new paths instead of re-encoded.
//! - **`params_hash`**: SHA-256 of (format, width, quality, speed). Changing
//!   any configured encoder setting re-encodes.
//!
//! A hit also requires the previously written file to still be on disk.
//!
//! ## Storage
//!
//! `<output_dir>/.cache-manifest.json`, next to the variants it describes.
//! `--no-cache` starts from an empty manifest and overwrites every variant.

use crate::imaging::Encoding;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io;
use std::path::Path;

/// Name of the cache manifest file within the output directory.
pub const CACHE_MANIFEST_FILENAME: &str = ".cache-manifest.json";

/// Bump to invalidate every existing cache when key computation changes.
const CACHE_VERSION: u32 = 1;

/// Content address of one encoded variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CacheKey {
    pub source_hash: String,
    pub params_hash: String,
}

impl CacheKey {
    pub fn new(source_hash: &str, encoding: &Encoding, width: u32) -> Self {
        Self {
            source_hash: source_hash.to_string(),
            params_hash: hash_variant_params(encoding, width),
        }
    }
}

/// On-disk map from output path (relative to the output directory) to the
/// key of the content written there.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CacheManifest {
    pub version: u32,
    pub entries: BTreeMap<String, CacheKey>,
    /// Reverse index, rebuilt on load.
    #[serde(skip)]
    by_key: HashMap<CacheKey, String>,
}

impl CacheManifest {
    pub fn empty() -> Self {
        Self {
            version: CACHE_VERSION,
            entries: BTreeMap::new(),
            by_key: HashMap::new(),
        }
    }

    /// Load from the output directory.
    ///
    /// A missing, unreadable, or outdated manifest is treated as empty; the
    /// worst case is re-encoding.
    pub fn load(output_dir: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(output_dir.join(CACHE_MANIFEST_FILENAME))
        else {
            return Self::empty();
        };
        let mut manifest: Self = match serde_json::from_str(&content) {
            Ok(m) => m,
            Err(_) => return Self::empty(),
        };
        if manifest.version != CACHE_VERSION {
            return Self::empty();
        }
        manifest.by_key = manifest
            .entries
            .iter()
            .map(|(path, key)| (key.clone(), path.clone()))
            .collect();
        manifest
    }

    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(output_dir.join(CACHE_MANIFEST_FILENAME), json)
    }

    /// Relative path of a previous output with this key, if it still exists.
    ///
    /// The path may differ from where the caller wants the variant (the
    /// source was renamed); copying it there is the caller's job.
    pub fn find(&self, key: &CacheKey, output_dir: &Path) -> Option<&str> {
        let stored = self.by_key.get(key)?;
        output_dir.join(stored).exists().then_some(stored.as_str())
    }

    /// Record that `output_path` now holds the content addressed by `key`.
    ///
    /// Any older path for the same key is forgotten, as is whatever key
    /// `output_path` held before.
    pub fn insert(&mut self, output_path: &str, key: CacheKey) {
        if let Some(old_path) = self.by_key.get(&key)
            && old_path != output_path
        {
            self.entries.remove(old_path);
        }
        if let Some(old_key) = self.entries.get(output_path)
            && *old_key != key
        {
            self.by_key.remove(old_key);
        }
        self.by_key.insert(key.clone(), output_path.to_string());
        self.entries.insert(output_path.to_string(), key);
    }

    /// Forget whatever `output_path` held. Returns whether it had an entry.
    ///
    /// Call before overwriting the file, so the entry cannot outlive the
    /// content it describes.
    pub fn forget(&mut self, output_path: &str) -> bool {
        let Some(old_key) = self.entries.remove(output_path) else {
            return false;
        };
        if self.by_key.get(&old_key).is_some_and(|p| p == output_path) {
            self.by_key.remove(&old_key);
        }
        true
    }

    /// Every recorded output path, relative to the output directory.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Drop entries whose output path fails `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.retain(|path, _| keep(path));
        self.by_key.retain(|_, path| keep(path));
    }
}

/// SHA-256 of a file's contents, as lowercase hex.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

/// SHA-256 of everything that shapes one variant's encoded bytes.
pub fn hash_variant_params(encoding: &Encoding, width: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(encoding.format().extension().as_bytes());
    hasher.update(b"\0");
    hasher.update(width.to_le_bytes());
    match encoding {
        Encoding::Webp { quality } => hasher.update(quality.value().to_le_bytes()),
        Encoding::Avif { quality, speed } => {
            hasher.update(quality.value().to_le_bytes());
            hasher.update([speed.value()]);
        }
    }
    format!("{:x}", hasher.finalize())
}

/// How each variant of a run was produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub copies: u32,
    pub encoded: u32,
}

impl CacheStats {
    pub fn total(&self) -> u32 {
        self.hits + self.copies + self.encoded
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.hits, self.copies) {
            (0, 0) => write!(f, "{} encoded", self.encoded),
            (hits, 0) => write!(
                f,
                "{} cached, {} encoded ({} total)",
                hits,
                self.encoded,
                self.total()
            ),
            (hits, copies) => write!(
                f,
                "{} cached, {} copied, {} encoded ({} total)",
                hits,
                copies,
                self.encoded,
                self.total()
            ),
        }
    }
}
