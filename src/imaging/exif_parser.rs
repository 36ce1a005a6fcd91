//! Minimal EXIF reader for JPEG and TIFF files.
//!
//! Extracts the shooting details a photo record shows:
//! - Make + Model (IFD0 0x010F, 0x0110): camera
//! - LensModel (Exif 0xA434): lens
//! - FocalLength (Exif 0x920A): `35mm`
//! - FNumber (Exif 0x829D): `f/2.8`
//! - ExposureTime (Exif 0x829A): `1/250s` or `2s`
//! - ISOSpeedRatings (Exif 0x8827)
//! - DateTimeOriginal (Exif 0x9003): `2024-03-01`
//!
//! For JPEG: reads the TIFF block inside the APP1 "Exif" segment.
//! For TIFF: the file itself is the TIFF block.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shooting details of one photo. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExifData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lens: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aperture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl ExifData {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Read EXIF from a file, dispatching by extension.
/// Returns default (empty) data on any read or parse failure.
pub fn read_exif(path: &Path) -> ExifData {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let Ok(bytes) = std::fs::read(path) else {
        return ExifData::default();
    };

    let tiff = match ext.as_str() {
        "jpg" | "jpeg" => find_jpeg_exif(&bytes),
        "tif" | "tiff" => Some(bytes.as_slice()),
        _ => None,
    };
    tiff.and_then(parse_tiff).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// JPEG: locate the APP1 Exif segment
// ---------------------------------------------------------------------------

const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Find the TIFF block inside a JPEG's APP1 Exif segment.
fn find_jpeg_exif(data: &[u8]) -> Option<&[u8]> {
    if !data.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        // Fill byte before a marker
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        // SOS or EOI: metadata segments are all before this
        if marker == 0xDA || marker == 0xD9 {
            return None;
        }
        // Markers without a length field
        if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }

        let seg_len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if seg_len < 2 {
            return None;
        }
        let seg_end = (pos + 2 + seg_len).min(data.len());
        if marker == 0xE1
            && let Some(tiff) = data[pos + 4..seg_end].strip_prefix(EXIF_HEADER)
        {
            return Some(tiff);
        }
        pos += 2 + seg_len;
    }
    None
}

// ---------------------------------------------------------------------------
// TIFF structure
// ---------------------------------------------------------------------------

const TAG_MAKE: u16 = 0x010F;
const TAG_MODEL: u16 = 0x0110;
const TAG_EXIF_IFD: u16 = 0x8769;
const TAG_EXPOSURE_TIME: u16 = 0x829A;
const TAG_F_NUMBER: u16 = 0x829D;
const TAG_ISO: u16 = 0x8827;
const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;
const TAG_FOCAL_LENGTH: u16 = 0x920A;
const TAG_LENS_MODEL: u16 = 0xA434;

/// One 12-byte IFD entry. `field` is the absolute offset of its value field.
#[derive(Debug, Clone, Copy)]
struct Entry {
    tag: u16,
    kind: u16,
    count: u32,
    field: usize,
}

struct Tiff<'a> {
    data: &'a [u8],
    big_endian: bool,
}

impl<'a> Tiff<'a> {
    fn new(data: &'a [u8]) -> Option<Self> {
        let big_endian = match data.get(0..4)? {
            [b'I', b'I', 42, 0] => false,
            [b'M', b'M', 0, 42] => true,
            _ => return None,
        };
        Some(Self { data, big_endian })
    }

    fn u16_at(&self, offset: usize) -> Option<u16> {
        let bytes: [u8; 2] = self.data.get(offset..offset + 2)?.try_into().ok()?;
        Some(if self.big_endian {
            u16::from_be_bytes(bytes)
        } else {
            u16::from_le_bytes(bytes)
        })
    }

    fn u32_at(&self, offset: usize) -> Option<u32> {
        let bytes: [u8; 4] = self.data.get(offset..offset + 4)?.try_into().ok()?;
        Some(if self.big_endian {
            u32::from_be_bytes(bytes)
        } else {
            u32::from_le_bytes(bytes)
        })
    }

    fn first_ifd(&self) -> Option<usize> {
        self.u32_at(4).map(|o| o as usize)
    }

    fn entries(&self, ifd: usize) -> Option<Vec<Entry>> {
        let count = self.u16_at(ifd)? as usize;
        (0..count)
            .map(|i| {
                let at = ifd + 2 + i * 12;
                Some(Entry {
                    tag: self.u16_at(at)?,
                    kind: self.u16_at(at + 2)?,
                    count: self.u32_at(at + 4)?,
                    field: at + 8,
                })
            })
            .collect()
    }

    /// Raw value bytes: inline when they fit in 4 bytes, else at the offset.
    fn value(&self, entry: &Entry) -> Option<&'a [u8]> {
        let unit: usize = match entry.kind {
            1 | 2 | 7 => 1,
            3 => 2,
            4 | 9 => 4,
            5 | 10 => 8,
            _ => return None,
        };
        let len = unit.checked_mul(entry.count as usize)?;
        let start = if len <= 4 {
            entry.field
        } else {
            self.u32_at(entry.field)? as usize
        };
        self.data.get(start..start.checked_add(len)?)
    }

    fn ascii(&self, entry: &Entry) -> Option<String> {
        let raw = self.value(entry)?;
        let text = raw.split(|&b| b == 0).next().unwrap_or(raw);
        let text = String::from_utf8_lossy(text).trim().to_string();
        (!text.is_empty()).then_some(text)
    }

    fn rational(&self, entry: &Entry) -> Option<f64> {
        if entry.kind != 5 && entry.kind != 10 {
            return None;
        }
        // Eight bytes never fit inline.
        let at = self.u32_at(entry.field)? as usize;
        let num = self.u32_at(at)?;
        let den = self.u32_at(at + 4)?;
        (den != 0).then(|| num as f64 / den as f64)
    }

    fn integer(&self, entry: &Entry) -> Option<u32> {
        match entry.kind {
            3 => self.u16_at(entry.field).map(u32::from),
            4 => self.u32_at(entry.field),
            _ => None,
        }
    }
}

fn find(entries: &[Entry], tag: u16) -> Option<Entry> {
    entries.iter().find(|e| e.tag == tag).copied()
}

fn parse_tiff(data: &[u8]) -> Option<ExifData> {
    let tiff = Tiff::new(data)?;
    let ifd0 = tiff.entries(tiff.first_ifd()?)?;

    let make = find(&ifd0, TAG_MAKE).and_then(|e| tiff.ascii(&e));
    let model = find(&ifd0, TAG_MODEL).and_then(|e| tiff.ascii(&e));
    let exif = find(&ifd0, TAG_EXIF_IFD)
        .and_then(|e| tiff.integer(&e))
        .and_then(|offset| tiff.entries(offset as usize))
        .unwrap_or_default();

    let camera = match (make, model) {
        (Some(make), Some(model)) => Some(format!("{} {}", make, model).trim().to_string()),
        (None, Some(model)) => Some(model),
        _ => None,
    };

    Some(ExifData {
        camera,
        lens: find(&exif, TAG_LENS_MODEL).and_then(|e| tiff.ascii(&e)),
        focal_length: find(&exif, TAG_FOCAL_LENGTH)
            .and_then(|e| tiff.rational(&e))
            .map(|mm| format!("{}mm", mm)),
        aperture: find(&exif, TAG_F_NUMBER)
            .and_then(|e| tiff.rational(&e))
            .map(|f| format!("f/{}", f)),
        shutter: find(&exif, TAG_EXPOSURE_TIME)
            .and_then(|e| tiff.rational(&e))
            .filter(|&t| t > 0.0)
            .map(format_shutter),
        iso: find(&exif, TAG_ISO).and_then(|e| tiff.integer(&e)),
        date: find(&exif, TAG_DATE_TIME_ORIGINAL)
            .and_then(|e| tiff.ascii(&e))
            .and_then(|d| format_date(&d)),
    })
}

/// `1/250s` below one second, `2s` or `2.5s` otherwise.
fn format_shutter(seconds: f64) -> String {
    if seconds >= 1.0 {
        format!("{}s", seconds)
    } else {
        format!("1/{}s", (1.0 / seconds).round())
    }
}

/// `2024:03:01 14:22:05` → `2024-03-01`
fn format_date(raw: &str) -> Option<String> {
    let day = raw.split_whitespace().next()?;
    let parts: Vec<&str> = day.split(':').collect();
    match parts.as_slice() {
        [y, m, d] if y.len() == 4 && m.len() == 2 && d.len() == 2 => {
            Some(format!("{}-{}-{}", y, m, d))
        }
        _ => None,
    }
}
