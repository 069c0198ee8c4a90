use std::fmt;
use std::str::FromStr;

use image::{Rgb, RgbImage};

use crate::foundation::error::{ReelError, ReelResult};

/// Fixed color-grading looks applied uniformly to every still in a reel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Slight desaturation with lifted contrast and brightness.
    Cinematic,
    /// Saturated golden tint.
    Warm,
    /// Saturated blue tint.
    Cool,
}

impl FilterKind {
    /// Every filter, in a stable order used for random selection.
    pub const ALL: [FilterKind; 3] = [FilterKind::Cinematic, FilterKind::Warm, FilterKind::Cool];

    /// Lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cinematic => "cinematic",
            Self::Warm => "warm",
            Self::Cool => "cool",
        }
    }

    /// Return a graded copy of `img`; the input is left untouched.
    pub fn apply(self, img: &RgbImage) -> RgbImage {
        let graded = match self {
            Self::Cinematic => {
                let out = enhance_contrast(img, 1.2);
                let out = enhance_color(&out, 0.9);
                enhance_brightness(&out, 1.05)
            }
            Self::Warm => {
                let out = enhance_color(img, 1.3);
                scale_channels(&out, [1.1, 1.0, 0.9])
            }
            Self::Cool => {
                let out = enhance_color(img, 1.2);
                scale_channels(&out, [0.9, 1.0, 1.1])
            }
        };
        sharpen(&graded)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cinematic" => Ok(Self::Cinematic),
            "warm" => Ok(Self::Warm),
            "cool" => Ok(Self::Cool),
            other => Err(ReelError::config(format!(
                "unknown filter '{other}' (expected cinematic, warm or cool)"
            ))),
        }
    }
}

/// Open `path`, convert to RGB8 and apply `filter`.
pub fn filter_image_file(path: &std::path::Path, filter: FilterKind) -> ReelResult<RgbImage> {
    let img = image::open(path)
        .map_err(|e| ReelError::media(format!("failed to open image '{}': {e}", path.display())))?
        .to_rgb8();
    Ok(filter.apply(&img))
}

fn luma(px: &Rgb<u8>) -> u8 {
    let [r, g, b] = px.0;
    ((u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000) as u8
}

fn blend(degenerate: f32, value: u8, factor: f32) -> u8 {
    let v = degenerate + factor * (f32::from(value) - degenerate);
    v.round().clamp(0.0, 255.0) as u8
}

/// Blend toward a flat gray at the image's mean luma.
pub fn enhance_contrast(img: &RgbImage, factor: f32) -> RgbImage {
    let n = u64::from(img.width()) * u64::from(img.height());
    let mean = if n == 0 {
        0.0
    } else {
        let sum: u64 = img.pixels().map(|p| u64::from(luma(p))).sum();
        ((sum as f64 / n as f64) + 0.5).floor() as f32
    };
    map_pixels(img, |px| px.0.map(|c| blend(mean, c, factor)))
}

/// Blend toward the per-pixel grayscale (saturation).
pub fn enhance_color(img: &RgbImage, factor: f32) -> RgbImage {
    map_pixels(img, |px| {
        let gray = f32::from(luma(px));
        px.0.map(|c| blend(gray, c, factor))
    })
}

/// Blend toward black.
pub fn enhance_brightness(img: &RgbImage, factor: f32) -> RgbImage {
    map_pixels(img, |px| px.0.map(|c| blend(0.0, c, factor)))
}

/// Multiply each channel by its factor, clamp to `[0, 255]` and truncate toward zero.
pub fn scale_channels(img: &RgbImage, factors: [f64; 3]) -> RgbImage {
    let scale = |c: u8, f: f64| (f64::from(c) * f).clamp(0.0, 255.0).floor() as u8;
    map_pixels(img, |px| {
        let [r, g, b] = px.0;
        [scale(r, factors[0]), scale(g, factors[1]), scale(b, factors[2])]
    })
}

/// 3x3 sharpen (`-2` ring, `32` center, divided by 16). Border pixels are copied.
pub fn sharpen(img: &RgbImage) -> RgbImage {
    const CENTER: i32 = 32;
    const RING: i32 = -2;
    const DIV: i32 = 16;

    let (w, h) = img.dimensions();
    let mut out = img.clone();
    if w < 3 || h < 3 {
        return out;
    }
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let mut acc = [0i32; 3];
            for dy in 0..3u32 {
                for dx in 0..3u32 {
                    let k = if dx == 1 && dy == 1 { CENTER } else { RING };
                    let p = img.get_pixel(x + dx - 1, y + dy - 1).0;
                    for c in 0..3 {
                        acc[c] += k * i32::from(p[c]);
                    }
                }
            }
            // Round half away from zero, matching integer kernel filters.
            let px = acc.map(|a| {
                let q = if a >= 0 {
                    (a + DIV / 2) / DIV
                } else {
                    (a - DIV / 2) / DIV
                };
                q.clamp(0, 255) as u8
            });
            out.put_pixel(x, y, Rgb(px));
        }
    }
    out
}

fn map_pixels(img: &RgbImage, f: impl Fn(&Rgb<u8>) -> [u8; 3]) -> RgbImage {
    let mut out = RgbImage::new(img.width(), img.height());
    for (dst, src) in out.pixels_mut().zip(img.pixels()) {
        *dst = Rgb(f(src));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filter.rs"]
mod tests;
