//! Shared test utilities.
//!
//! Synthetic source photos for tests that need real pixels, and EXIF blocks
//! for tests that need shooting details. Pipeline logic is normally tested
//! against `MockBackend` instead.

use image::{ImageEncoder, RgbImage};
use std::path::Path;

/// Write a `width`×`height` gradient JPEG to `path`.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

pub enum ExifValue {
    Ascii(&'static str),
    Short(u16),
    Long(u32),
    Rational(u32, u32),
}

fn push_exif_entry(
    out: &mut Vec<u8>,
    data: &mut Vec<u8>,
    data_at: usize,
    tag: u16,
    value: &ExifValue,
) {
    let (kind, count, bytes): (u16, u32, Vec<u8>) = match value {
        ExifValue::Ascii(s) => {
            let mut b = s.as_bytes().to_vec();
            b.push(0);
            (2, b.len() as u32, b)
        }
        ExifValue::Short(v) => (3, 1, v.to_le_bytes().to_vec()),
        ExifValue::Long(v) => (4, 1, v.to_le_bytes().to_vec()),
        ExifValue::Rational(n, d) => (5, 1, [n.to_le_bytes(), d.to_le_bytes()].concat()),
    };
    out.extend(tag.to_le_bytes());
    out.extend(kind.to_le_bytes());
    out.extend(count.to_le_bytes());
    if bytes.len() <= 4 {
        let mut field = bytes;
        field.resize(4, 0);
        out.extend(field);
    } else {
        out.extend(((data_at + data.len()) as u32).to_le_bytes());
        data.extend(bytes);
    }
}

/// Little-endian TIFF block: IFD0 (plus an Exif IFD pointer, 0x8769), then
/// the Exif IFD, then the out-of-line values.
pub fn build_exif_tiff(ifd0: &[(u16, ExifValue)], exif: &[(u16, ExifValue)]) -> Vec<u8> {
    let n0 = ifd0.len() + 1;
    let exif_at = 8 + 2 + 12 * n0 + 4;
    let data_at = exif_at + 2 + 12 * exif.len() + 4;

    let mut out = b"II*\0".to_vec();
    out.extend(8u32.to_le_bytes());
    let mut data = Vec::new();

    out.extend((n0 as u16).to_le_bytes());
    for (tag, value) in ifd0 {
        push_exif_entry(&mut out, &mut data, data_at, *tag, value);
    }
    push_exif_entry(
        &mut out,
        &mut data,
        data_at,
        0x8769,
        &ExifValue::Long(exif_at as u32),
    );
    out.extend(0u32.to_le_bytes());
    assert_eq!(out.len(), exif_at);

    out.extend((exif.len() as u16).to_le_bytes());
    for (tag, value) in exif {
        push_exif_entry(&mut out, &mut data, data_at, *tag, value);
    }
    out.extend(0u32.to_le_bytes());
    assert_eq!(out.len(), data_at);

    out.extend(data);
    out
}

/// JPEG markers around an APP1 Exif segment, enough for a metadata scan.
pub fn jpeg_with_exif(tiff: &[u8]) -> Vec<u8> {
    let mut payload = b"Exif\0\0".to_vec();
    payload.extend(tiff);
    let mut out = vec![0xFF, 0xD8];
    out.extend([0xFF, 0xE0, 0x00, 0x06, b'J', b'F', b'I', b'F']);
    out.extend([0xFF, 0xE1]);
    out.extend(((payload.len() + 2) as u16).to_be_bytes());
    out.extend(payload);
    out.extend([0xFF, 0xDA, 0x00, 0x02, 0xFF, 0xD9]);
    out
}
