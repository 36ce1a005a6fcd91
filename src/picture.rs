//! `<picture>` markup for a photo record.
//!
//! ```html
//! <picture>
//!   <source type="image/avif" srcset="…-640.avif 640w, …" sizes="…">
//!   <source type="image/webp" srcset="…-640.webp 640w, …" sizes="…">
//!   <img src="…-1600.webp" alt="Old Pier" width="2048" height="1365"
//!        loading="lazy" decoding="async" style="background-image:url(data:…)…">
//! </picture>
//! ```
//!
//! AVIF comes first so browsers that decode it never fall through to WebP.
//! Every URL names a variant the manifest entry lists. The fallback `<img>`
//! requests the width the selector picks when it exists, and shows the
//! placeholder as its background until the real image arrives.

use crate::records::PhotoRecord;
use crate::types::{ManifestEntry, OutputFormat};
use crate::widths::{StandardWidths, WidthPolicy};
use maud::{Markup, html};

/// `sizes` used when the caller has no layout-specific value.
pub const DEFAULT_SIZES: &str = "(max-width: 800px) 100vw, 80vw";

/// Source order inside `<picture>`.
const SOURCE_ORDER: [OutputFormat; 2] = [OutputFormat::Avif, OutputFormat::Webp];

/// `entry` is the manifest entry `record` was derived from; its variants
/// decide which widths appear.
pub fn render_picture(
    record: &PhotoRecord,
    entry: &ManifestEntry,
    widths: &StandardWidths,
    policy: WidthPolicy,
    sizes: &str,
) -> Markup {
    let src = record.best_url(
        OutputFormat::Webp,
        &entry.widths(OutputFormat::Webp),
        widths,
        policy,
    );
    let placeholder = format!(
        "background-image:url({});background-size:cover",
        record.lqip
    );
    let sources: Vec<(OutputFormat, String)> = SOURCE_ORDER
        .iter()
        .map(|&format| (format, record.srcset(format, &entry.widths(format))))
        .filter(|(_, srcset)| !srcset.is_empty())
        .collect();

    html! {
        picture {
            @for (format, srcset) in &sources {
                source type=(format.mime_type()) srcset=(srcset) sizes=(sizes);
            }
            img src=(src) alt=(record.title) width=(record.width) height=(record.height)
                loading="lazy" decoding="async" style=(placeholder);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::variant_path;
    use crate::types::Variant;

    /// Entry with variants for exactly the widths `policy` generates.
    fn entry(width: u32, height: u32, policy: WidthPolicy) -> ManifestEntry {
        let generated = StandardWidths::default().width_list(width, policy);
        ManifestEntry {
            slug: "old-pier".to_string(),
            original_path: "_raw/Old Pier.jpg".to_string(),
            width,
            height,
            lqip: "data:image/webp;base64,bHFpcA==".to_string(),
            variants: OutputFormat::ALL
                .iter()
                .flat_map(|&format| {
                    generated.iter().map(move |&w| Variant {
                        format,
                        width: w,
                        path: variant_path("old-pier", w, format),
                    })
                })
                .collect(),
        }
    }

    fn record(entry: &ManifestEntry) -> PhotoRecord {
        PhotoRecord::from_entry(entry, "/photos", 1)
    }

    fn render(entry: &ManifestEntry, policy: WidthPolicy) -> String {
        render_picture(
            &record(entry),
            entry,
            &StandardWidths::default(),
            policy,
            DEFAULT_SIZES,
        )
        .into_string()
    }

    #[test]
    fn avif_source_precedes_webp() {
        let html = render(&entry(3000, 2000, WidthPolicy::Strict), WidthPolicy::Strict);
        let avif = html.find(r#"type="image/avif""#).unwrap();
        let webp = html.find(r#"type="image/webp""#).unwrap();
        assert!(avif < webp);
        assert!(html.starts_with("<picture>"));
        assert!(html.ends_with("</picture>"));
    }

    #[test]
    fn img_requests_selected_width() {
        let strict = entry(2048, 1365, WidthPolicy::Strict);
        let html = render(&strict, WidthPolicy::Strict);
        assert!(html.contains(r#"src="/photos/old-pier/old-pier-1600.webp""#));

        let native = entry(2048, 1365, WidthPolicy::NativeAware);
        let html = render(&native, WidthPolicy::NativeAware);
        assert!(html.contains(r#"src="/photos/old-pier/old-pier-2048.webp""#));
        assert!(html.contains("/photos/old-pier/old-pier-2048.avif 2048w"));
    }

    #[test]
    fn urls_come_from_manifest_not_current_policy() {
        let strict = entry(900, 600, WidthPolicy::Strict);
        let html = render(&strict, WidthPolicy::NativeAware);
        assert!(html.contains(r#"src="/photos/old-pier/old-pier-750.webp""#));
        assert!(!html.contains("old-pier-900"));

        let native = entry(900, 600, WidthPolicy::NativeAware);
        let html = render(&native, WidthPolicy::Strict);
        assert!(html.contains(r#"src="/photos/old-pier/old-pier-750.webp""#));
        assert!(html.contains("/photos/old-pier/old-pier-900.avif 900w"));
    }

    #[test]
    fn img_carries_dimensions_alt_and_placeholder() {
        let html = render(&entry(900, 600, WidthPolicy::Strict), WidthPolicy::Strict);
        assert!(html.contains(r#"alt="Old Pier""#));
        assert!(html.contains(r#"width="900""#));
        assert!(html.contains(r#"height="600""#));
        assert!(html.contains(r#"loading="lazy""#));
        assert!(html.contains("background-image:url(data:image/webp;base64,bHFpcA==)"));
    }

    #[test]
    fn srcset_lists_every_generated_width() {
        let html = render(&entry(900, 600, WidthPolicy::Strict), WidthPolicy::Strict);
        assert!(html.contains(
            "/photos/old-pier/old-pier-640.webp 640w, /photos/old-pier/old-pier-750.webp 750w"
        ));
        assert!(!html.contains("1080w"));
    }

    #[test]
    fn small_photo_has_no_sources() {
        let html = render(&entry(500, 400, WidthPolicy::Strict), WidthPolicy::Strict);
        assert!(!html.contains("<source"));
        assert!(html.contains("old-pier-640.webp"));
    }

    #[test]
    fn title_is_escaped() {
        let e = entry(900, 600, WidthPolicy::Strict);
        let mut r = record(&e);
        r.title = "Pier <at> \"Night\"".to_string();
        let html = render_picture(
            &r,
            &e,
            &StandardWidths::default(),
            WidthPolicy::Strict,
            DEFAULT_SIZES,
        )
        .into_string();
        assert!(html.contains("alt=\"Pier &lt;at&gt; &quot;Night&quot;\""));
    }
}
