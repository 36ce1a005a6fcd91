//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Generate
//!
//! ```text
//! Generating 2 photos
//! 001 dawn (3000×2000)
//!     Source: _raw/Dawn.jpg
//!     640px webp: cached
//!     640px avif: encoded
//! 002 mystery (2400×1600, default dimensions)
//!     Source: _raw/Mystery.jpg
//!     no variants
//! Pruned old-name/
//! Wrote _processed/manifest.json: 2 photos, 20 variants
//! Cache: 10 cached, 10 encoded (20 total)
//! ```
//!
//! ## Select
//!
//! ```text
//! 2048px (native-aware) → 2048
//! Widths: 640, 750, 1080, 1600, 2048
//! ```

use crate::cache::CacheStats;
use crate::generate::{GenerateEvent, VariantStatus};
use crate::records::RecordOutcome;
use crate::types::Manifest;
use crate::widths::{StandardWidths, WidthPolicy};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

// ============================================================================
// generate
// ============================================================================

/// Format a single generate progress event as display lines.
pub fn format_generate_event(event: &GenerateEvent) -> Vec<String> {
    match event {
        GenerateEvent::Started { image_count } => {
            let noun = if *image_count == 1 { "photo" } else { "photos" };
            vec![format!("Generating {} {}", image_count, noun)]
        }
        GenerateEvent::ImageProcessed {
            index,
            slug,
            source_path,
            dimensions: (w, h),
            defaulted,
            variants,
        } => {
            let dims = if *defaulted {
                format!("{}×{}, default dimensions", w, h)
            } else {
                format!("{}×{}", w, h)
            };
            let mut lines = vec![
                format!("{} {} ({})", format_index(*index), slug, dims),
                format!("    Source: {}", source_path),
            ];
            if variants.is_empty() {
                lines.push("    no variants".to_string());
            }
            for variant in variants {
                let status = match variant.status {
                    VariantStatus::Cached => "cached",
                    VariantStatus::Copied => "copied",
                    VariantStatus::Encoded => "encoded",
                };
                lines.push(format!("    {}: {}", variant.label, status));
            }
            lines
        }
        GenerateEvent::Pruned { path } => vec![format!("Pruned {}", path)],
    }
}

/// Closing lines of a successful `generate`.
pub fn format_generate_summary(
    manifest: &Manifest,
    manifest_path: &Path,
    stats: &CacheStats,
) -> Vec<String> {
    vec![
        format!(
            "Wrote {}: {} photos, {} variants",
            manifest_path.display(),
            manifest.entries.len(),
            manifest.variant_count()
        ),
        format!("Cache: {}", stats),
    ]
}

pub fn print_generate_event(event: &GenerateEvent) {
    for line in format_generate_event(event) {
        println!("{}", line);
    }
}

pub fn print_generate_summary(manifest: &Manifest, manifest_path: &Path, stats: &CacheStats) {
    for line in format_generate_summary(manifest, manifest_path, stats) {
        println!("{}", line);
    }
}

// ============================================================================
// select
// ============================================================================

pub fn format_selection(
    native_width: u32,
    widths: &StandardWidths,
    policy: WidthPolicy,
) -> Vec<String> {
    let list = widths.width_list(native_width, policy);
    let list_line = if list.is_empty() {
        "Widths: none (narrower than every breakpoint)".to_string()
    } else {
        format!(
            "Widths: {}",
            list.iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        )
    };
    vec![
        format!(
            "{}px ({}) \u{2192} {}",
            native_width,
            policy,
            widths.select(native_width, policy)
        ),
        list_line,
    ]
}

pub fn print_selection(native_width: u32, widths: &StandardWidths, policy: WidthPolicy) {
    for line in format_selection(native_width, widths, policy) {
        println!("{}", line);
    }
}

// ============================================================================
// records
// ============================================================================

pub fn format_records_output(outcomes: &[RecordOutcome]) -> Vec<String> {
    let mut created = 0;
    let mut lines = Vec::with_capacity(outcomes.len() + 1);
    for outcome in outcomes {
        match outcome {
            RecordOutcome::Created(path) => {
                created += 1;
                lines.push(format!("Created {}", path.display()));
            }
            RecordOutcome::Skipped(path) => {
                lines.push(format!("Skipped {} (exists)", path.display()));
            }
        }
    }
    lines.push(format!(
        "{} created, {} skipped",
        created,
        outcomes.len() - created
    ));
    lines
}

pub fn print_records_output(outcomes: &[RecordOutcome]) {
    for line in format_records_output(outcomes) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::VariantInfo;
    use std::path::PathBuf;

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(1234), "1234");
    }

    // =========================================================================
    // generate
    // =========================================================================

    #[test]
    fn format_started() {
        let lines = format_generate_event(&GenerateEvent::Started { image_count: 5 });
        assert_eq!(lines, vec!["Generating 5 photos"]);
        let lines = format_generate_event(&GenerateEvent::Started { image_count: 1 });
        assert_eq!(lines, vec!["Generating 1 photo"]);
    }

    #[test]
    fn format_image_processed() {
        let event = GenerateEvent::ImageProcessed {
            index: 1,
            slug: "dawn".to_string(),
            source_path: "_raw/Dawn.jpg".to_string(),
            dimensions: (3000, 2000),
            defaulted: false,
            variants: vec![
                VariantInfo {
                    label: "640px webp".to_string(),
                    status: VariantStatus::Cached,
                },
                VariantInfo {
                    label: "640px avif".to_string(),
                    status: VariantStatus::Encoded,
                },
                VariantInfo {
                    label: "750px webp".to_string(),
                    status: VariantStatus::Copied,
                },
            ],
        };
        assert_eq!(
            format_generate_event(&event),
            vec![
                "001 dawn (3000×2000)",
                "    Source: _raw/Dawn.jpg",
                "    640px webp: cached",
                "    640px avif: encoded",
                "    750px webp: copied",
            ]
        );
    }

    #[test]
    fn format_defaulted_image_without_variants() {
        let event = GenerateEvent::ImageProcessed {
            index: 2,
            slug: "mystery".to_string(),
            source_path: "_raw/Mystery.jpg".to_string(),
            dimensions: (2400, 1600),
            defaulted: true,
            variants: vec![],
        };
        let lines = format_generate_event(&event);
        assert_eq!(lines[0], "002 mystery (2400×1600, default dimensions)");
        assert_eq!(lines[2], "    no variants");
    }

    #[test]
    fn format_pruned() {
        let event = GenerateEvent::Pruned {
            path: "old-name/".to_string(),
        };
        assert_eq!(format_generate_event(&event), vec!["Pruned old-name/"]);
    }

    #[test]
    fn format_summary() {
        let manifest = Manifest::default();
        let stats = CacheStats {
            encoded: 3,
            ..CacheStats::default()
        };
        assert_eq!(
            format_generate_summary(&manifest, Path::new("out/manifest.json"), &stats),
            vec![
                "Wrote out/manifest.json: 0 photos, 0 variants",
                "Cache: 3 encoded",
            ]
        );
    }

    // =========================================================================
    // select
    // =========================================================================

    #[test]
    fn format_selection_between_breakpoints() {
        let widths = StandardWidths::default();
        assert_eq!(
            format_selection(2048, &widths, WidthPolicy::Strict),
            vec!["2048px (strict) → 1600", "Widths: 640, 750, 1080, 1600"]
        );
        assert_eq!(
            format_selection(2048, &widths, WidthPolicy::NativeAware),
            vec![
                "2048px (native-aware) → 2048",
                "Widths: 640, 750, 1080, 1600, 2048"
            ]
        );
    }

    #[test]
    fn format_selection_below_smallest() {
        let lines = format_selection(500, &StandardWidths::default(), WidthPolicy::Strict);
        assert_eq!(lines[0], "500px (strict) → 640");
        assert_eq!(lines[1], "Widths: none (narrower than every breakpoint)");
    }

    // =========================================================================
    // records
    // =========================================================================

    #[test]
    fn format_records() {
        let outcomes = vec![
            RecordOutcome::Created(PathBuf::from("photos/dawn.yaml")),
            RecordOutcome::Skipped(PathBuf::from("photos/fog.yaml")),
        ];
        assert_eq!(
            format_records_output(&outcomes),
            vec![
                "Created photos/dawn.yaml",
                "Skipped photos/fog.yaml (exists)",
                "1 created, 1 skipped",
            ]
        );
    }
}
