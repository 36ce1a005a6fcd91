//! Pure calculation functions for variant dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::types::OutputFormat;
use crate::widths::{StandardWidths, WidthPolicy};

/// Height that preserves the aspect ratio of `original` at `target_width`.
///
/// Never below 1px, so extreme panoramas still produce a valid image.
///
/// ```
/// # use photo_variants::imaging::scaled_height;
/// assert_eq!(scaled_height((3000, 2000), 1600), 1067);
/// assert_eq!(scaled_height((900, 600), 750), 500);
/// ```
pub fn scaled_height(original: (u32, u32), target_width: u32) -> u32 {
    let (orig_w, orig_h) = original;
    if orig_w == 0 {
        return orig_h.max(1);
    }
    let h = (orig_h as f64 * target_width as f64 / orig_w as f64).round() as u32;
    h.max(1)
}

/// A single variant to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedVariant {
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

/// Every (format, width) pair to generate for an image of `original` size.
///
/// Widths come from [`StandardWidths::width_list`] under the same policy
/// the selector uses, so nothing wider than the source is ever planned.
/// Ordered by format (see [`OutputFormat::ALL`]) then ascending width.
pub fn plan_variants(
    original: (u32, u32),
    widths: &StandardWidths,
    policy: WidthPolicy,
) -> Vec<PlannedVariant> {
    let list = widths.width_list(original.0, policy);

    OutputFormat::ALL
        .iter()
        .flat_map(|&format| {
            list.iter().map(move |&width| PlannedVariant {
                format,
                width,
                height: scaled_height(original, width),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths_of(plan: &[PlannedVariant], format: OutputFormat) -> Vec<u32> {
        plan.iter()
            .filter(|p| p.format == format)
            .map(|p| p.width)
            .collect()
    }

    // =========================================================================
    // scaled_height
    // =========================================================================

    #[test]
    fn height_landscape() {
        assert_eq!(scaled_height((3000, 2000), 2400), 1600);
        assert_eq!(scaled_height((3000, 2000), 640), 427);
    }

    #[test]
    fn height_portrait() {
        assert_eq!(scaled_height((2000, 3000), 640), 960);
    }

    #[test]
    fn height_never_zero() {
        assert_eq!(scaled_height((10000, 10), 640), 1);
        assert_eq!(scaled_height((0, 50), 640), 50);
    }

    // =========================================================================
    // plan_variants
    // =========================================================================

    #[test]
    fn plan_large_landscape_all_widths_both_formats() {
        let plan = plan_variants((3000, 2000), &StandardWidths::default(), WidthPolicy::Strict);
        assert_eq!(plan.len(), 10);
        let all = vec![640, 750, 1080, 1600, 2400];
        assert_eq!(widths_of(&plan, OutputFormat::Webp), all);
        assert_eq!(widths_of(&plan, OutputFormat::Avif), all);
        // WebP block first
        assert!(plan[..5].iter().all(|p| p.format == OutputFormat::Webp));
    }

    #[test]
    fn plan_skips_widths_above_native() {
        let plan = plan_variants((900, 600), &StandardWidths::default(), WidthPolicy::Strict);
        assert_eq!(plan.len(), 4);
        assert_eq!(widths_of(&plan, OutputFormat::Webp), vec![640, 750]);
        assert_eq!(plan[1].height, 500);
    }

    #[test]
    fn plan_native_aware_adds_native_width() {
        let plan = plan_variants(
            (900, 600),
            &StandardWidths::default(),
            WidthPolicy::NativeAware,
        );
        assert_eq!(plan.len(), 6);
        assert_eq!(widths_of(&plan, OutputFormat::Avif), vec![640, 750, 900]);
        assert_eq!(plan[2].height, 600);
    }

    #[test]
    fn plan_small_source_is_empty() {
        for policy in [WidthPolicy::Strict, WidthPolicy::NativeAware] {
            assert!(plan_variants((500, 400), &StandardWidths::default(), policy).is_empty());
        }
    }

    #[test]
    fn plan_never_exceeds_native() {
        for native in (100..3000).step_by(37) {
            let plan = plan_variants(
                (native, native / 2 + 1),
                &StandardWidths::default(),
                WidthPolicy::NativeAware,
            );
            assert!(plan.iter().all(|p| p.width <= native));
        }
    }
}
