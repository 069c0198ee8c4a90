use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::foundation::core::Canvas;

/// Scale `img` so it covers `canvas`, then center-crop to exactly `canvas`.
pub fn cover_crop(img: &RgbImage, canvas: Canvas, filter: FilterType) -> RgbImage {
    let (w, h) = img.dimensions();
    if (w, h) == (canvas.width, canvas.height) {
        return img.clone();
    }
    if w == 0 || h == 0 {
        return RgbImage::new(canvas.width, canvas.height);
    }

    let scale = f64::max(
        f64::from(canvas.width) / f64::from(w),
        f64::from(canvas.height) / f64::from(h),
    );
    let sw = ((f64::from(w) * scale).round() as u32).max(canvas.width);
    let sh = ((f64::from(h) * scale).round() as u32).max(canvas.height);
    let scaled = imageops::resize(img, sw, sh, filter);

    let x = (sw - canvas.width) / 2;
    let y = (sh - canvas.height) / 2;
    imageops::crop_imm(&scaled, x, y, canvas.width, canvas.height).to_image()
}

/// Place `frame` centered on a black `canvas`; frames already at canvas size pass through.
///
/// Oversized frames are cropped around their center, undersized ones are letterboxed.
pub fn compose_on_canvas(frame: &RgbImage, canvas: Canvas) -> RgbImage {
    if frame.dimensions() == (canvas.width, canvas.height) {
        return frame.clone();
    }
    let mut out = RgbImage::from_pixel(canvas.width, canvas.height, Rgb([0, 0, 0]));
    let dx = i64::from(canvas.width) / 2 - i64::from(frame.width()) / 2;
    let dy = i64::from(canvas.height) / 2 - i64::from(frame.height()) / 2;
    imageops::overlay(&mut out, frame, dx, dy);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/fit.rs"]
mod tests;
