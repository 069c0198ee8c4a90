use std::ops::RangeInclusive;

use image::{Rgb, RgbImage};
use rand::Rng;
use rayon::prelude::*;

use crate::foundation::core::Rect;
use crate::foundation::error::{ReelError, ReelResult};

/// Ken Burns zoom: a linear scale ramp from `1.0` to `zoom_ratio` over a clip.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KenBurns {
    /// Scale reached at the end of the clip; always `> 1`.
    pub zoom_ratio: f64,
}

impl KenBurns {
    /// Range zoom ratios are drawn from.
    pub const ZOOM_RANGE: RangeInclusive<f64> = 1.15..=1.25;

    /// Create a zoom with an explicit ratio.
    pub fn new(zoom_ratio: f64) -> ReelResult<Self> {
        if !zoom_ratio.is_finite() || zoom_ratio <= 1.0 {
            return Err(ReelError::config(format!(
                "ken burns zoom ratio must be finite and > 1, got {zoom_ratio}"
            )));
        }
        Ok(Self { zoom_ratio })
    }

    /// Draw a zoom ratio uniformly from [`Self::ZOOM_RANGE`].
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            zoom_ratio: rng.gen_range(Self::ZOOM_RANGE),
        }
    }

    /// Linear scale at `t` seconds into a clip lasting `duration` seconds.
    ///
    /// `t` is clamped to `[0, duration]`; the end point is exactly `zoom_ratio`.
    pub fn scale_at(&self, t: f64, duration: f64) -> f64 {
        if duration <= 0.0 || t <= 0.0 {
            return 1.0;
        }
        if t >= duration {
            return self.zoom_ratio;
        }
        1.0 + (self.zoom_ratio - 1.0) * (t / duration)
    }

    /// Source-space rectangle visible at `t`, centered inside `frame`.
    pub fn viewport(&self, frame: Rect, t: f64, duration: f64) -> Rect {
        let s = self.scale_at(t, duration);
        let center = frame.center();
        let half_w = frame.width() / (2.0 * s);
        let half_h = frame.height() / (2.0 * s);
        Rect::new(
            center.x - half_w,
            center.y - half_h,
            center.x + half_w,
            center.y + half_h,
        )
    }

    /// Render the frame visible at `t` by bilinear sampling of the viewport onto a canvas the
    /// size of `src`.
    pub fn render(&self, src: &RgbImage, t: f64, duration: f64) -> RgbImage {
        let (w, h) = src.dimensions();
        let mut out = RgbImage::new(w, h);
        if w == 0 || h == 0 {
            return out;
        }
        let frame = Rect::new(0.0, 0.0, f64::from(w), f64::from(h));
        let view = self.viewport(frame, t, duration);
        let sx = view.width() / f64::from(w);
        let sy = view.height() / f64::from(h);
        let row_len = w as usize * 3;

        out.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| {
                // Pixel centers map through the viewport; `- 0.5` returns to sample coordinates.
                let fy = view.y0 + (y as f64 + 0.5) * sy - 0.5;
                for x in 0..w as usize {
                    let fx = view.x0 + (x as f64 + 0.5) * sx - 0.5;
                    let px = sample_bilinear(src, fx, fy);
                    row[x * 3..x * 3 + 3].copy_from_slice(&px.0);
                }
            });
        out
    }
}

fn sample_bilinear(src: &RgbImage, fx: f64, fy: f64) -> Rgb<u8> {
    let max_x = f64::from(src.width() - 1);
    let max_y = f64::from(src.height() - 1);
    let fx = fx.clamp(0.0, max_x);
    let fy = fy.clamp(0.0, max_y);
    let x0 = fx.floor() as u32;
    let y0 = fy.floor() as u32;
    let x1 = (x0 + 1).min(src.width() - 1);
    let y1 = (y0 + 1).min(src.height() - 1);
    let tx = fx - f64::from(x0);
    let ty = fy - f64::from(y0);

    let p00 = src.get_pixel(x0, y0).0;
    let p10 = src.get_pixel(x1, y0).0;
    let p01 = src.get_pixel(x0, y1).0;
    let p11 = src.get_pixel(x1, y1).0;

    let mut out = [0u8; 3];
    for c in 0..3 {
        let top = f64::from(p00[c]) + (f64::from(p10[c]) - f64::from(p00[c])) * tx;
        let bottom = f64::from(p01[c]) + (f64::from(p11[c]) - f64::from(p01[c])) * tx;
        out[c] = (top + (bottom - top) * ty).round().clamp(0.0, 255.0) as u8;
    }
    Rgb(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/motion.rs"]
mod tests;
