//! Timeline assembly: image selection, per-image clips, transitions, concatenation.

/// Materialize a plan into clips backed by scratch files.
pub mod assemble;
/// Timed visual units.
pub mod clip;
/// Random selection of images, filter, zoom ratios and transitions.
pub mod plan;

use image::RgbImage;

use crate::effects::fit::compose_on_canvas;
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::clip::Clip;

/// Ordered concatenation of clips; its duration is the sum of clip durations.
#[derive(Debug)]
pub struct Timeline {
    canvas: Canvas,
    fps: Fps,
    clips: Vec<Clip>,
}

impl Timeline {
    /// Empty timeline for the given frame geometry.
    pub fn new(canvas: Canvas, fps: Fps) -> Self {
        Self {
            canvas,
            fps,
            clips: Vec::new(),
        }
    }

    /// Append a clip.
    pub fn push(&mut self, clip: Clip) {
        self.clips.push(clip);
    }

    /// Output frame size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Output frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Clips in playback order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Mutable clips, used to release them after rendering.
    pub fn clips_mut(&mut self) -> &mut [Clip] {
        &mut self.clips
    }

    /// Number of still-image clips.
    pub fn image_count(&self) -> usize {
        self.clips.iter().filter(|c| !c.is_transition()).count()
    }

    /// Number of transition clips.
    pub fn transition_count(&self) -> usize {
        self.clips.iter().filter(|c| c.is_transition()).count()
    }

    /// Total length in frames.
    pub fn duration_frames(&self) -> u64 {
        self.clips.iter().map(Clip::duration_frames).sum()
    }

    /// Total length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.duration_frames())
    }

    /// Map a timeline frame to `(clip index, local frame)`.
    pub fn locate(&self, idx: FrameIndex) -> Option<(usize, u64)> {
        let mut start = 0u64;
        for (i, clip) in self.clips.iter().enumerate() {
            let end = start + clip.duration_frames();
            if idx.0 < end {
                return Some((i, idx.0 - start));
            }
            start = end;
        }
        None
    }

    /// Render one timeline frame at canvas size.
    ///
    /// Clip frames of a different size are centered on a black canvas.
    pub fn render_frame(&self, idx: FrameIndex) -> ReelResult<RgbImage> {
        let (clip_idx, local) = self.locate(idx).ok_or_else(|| {
            ReelError::render(format!(
                "frame {} is outside the timeline ({} frames)",
                idx.0,
                self.duration_frames()
            ))
        })?;
        let frame = self.clips[clip_idx].render_frame(local, self.fps)?;
        if frame.dimensions() == (self.canvas.width, self.canvas.height) {
            Ok(frame)
        } else {
            Ok(compose_on_canvas(&frame, self.canvas))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/timeline.rs"]
mod tests;
