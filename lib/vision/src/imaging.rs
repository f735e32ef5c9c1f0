//! Image decoding and pixel-level helpers shared by the embedders.

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};

use crate::error::Result;

/// Side length of the working thumbnail used for color statistics
pub const THUMBNAIL_SIZE: u32 = 64;

/// Named colors reported in predictions, with their reference RGB values
const PALETTE: [(&str, [u8; 3]); 11] = [
    ("white", [245, 245, 245]),
    ("black", [20, 20, 20]),
    ("grey", [128, 128, 128]),
    ("navy", [20, 30, 80]),
    ("blue", [40, 90, 200]),
    ("red", [200, 30, 40]),
    ("beige", [220, 200, 160]),
    ("green", [40, 140, 60]),
    ("brown", [120, 70, 30]),
    ("pink", [240, 150, 180]),
    ("yellow", [240, 210, 40]),
];

/// Decode an uploaded image (JPEG, PNG or WebP)
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Fixed-size RGB thumbnail
pub fn thumbnail(image: &DynamicImage) -> RgbImage {
    image
        .resize_exact(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Triangle)
        .to_rgb8()
}

/// Palette name closest to the mean color of the image center.
///
/// The center half of the frame is used since product photos are usually
/// framed around the garment.
pub fn dominant_color(image: &DynamicImage) -> Option<String> {
    if image.width() == 0 || image.height() == 0 {
        return None;
    }

    let thumb = thumbnail(image);
    let lo = THUMBNAIL_SIZE / 4;
    let hi = THUMBNAIL_SIZE - lo;

    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for y in lo..hi {
        for x in lo..hi {
            let p = thumb.get_pixel(x, y).0;
            sum[0] += u64::from(p[0]);
            sum[1] += u64::from(p[1]);
            sum[2] += u64::from(p[2]);
            count += 1;
        }
    }
    if count == 0 {
        return None;
    }

    let mean = [
        (sum[0] / count) as i32,
        (sum[1] / count) as i32,
        (sum[2] / count) as i32,
    ];
    nearest_palette_color(mean).map(str::to_string)
}

fn nearest_palette_color(rgb: [i32; 3]) -> Option<&'static str> {
    PALETTE
        .iter()
        .min_by_key(|(_, reference)| {
            reference
                .iter()
                .zip(rgb.iter())
                .map(|(&r, &c)| {
                    let d = i32::from(r) - c;
                    d * d
                })
                .sum::<i32>()
        })
        .map(|(name, _)| *name)
}

#[cfg(test)]
pub(crate) fn solid_image(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb(rgb)))
}
