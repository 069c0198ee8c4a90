use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image::RgbImage;

use crate::effects::motion::KenBurns;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::release::Release;

/// A still image, already graded and cropped to the canvas, animated with a Ken Burns zoom.
#[derive(Debug)]
pub struct StillClip {
    source: PathBuf,
    filtered_path: PathBuf,
    frame: Option<RgbImage>,
    motion: KenBurns,
}

/// A transition clip transcoded to raw RGB24 frames in the scratch directory.
#[derive(Debug)]
pub struct TransitionClip {
    source: PathBuf,
    raw_path: PathBuf,
    file: Option<Mutex<File>>,
    canvas: Canvas,
    available_frames: u64,
}

/// Visual content of a clip.
#[derive(Debug)]
pub enum ClipKind {
    /// Filtered still with motion.
    Still(StillClip),
    /// Pre-made transition footage.
    Transition(TransitionClip),
}

/// A timed visual unit on the timeline.
#[derive(Debug)]
pub struct Clip {
    kind: ClipKind,
    duration_frames: u64,
}

impl Clip {
    /// Build a still clip from a canvas-sized frame.
    pub fn still(
        source: impl Into<PathBuf>,
        filtered_path: impl Into<PathBuf>,
        frame: RgbImage,
        motion: KenBurns,
        duration_frames: u64,
    ) -> Self {
        Self {
            kind: ClipKind::Still(StillClip {
                source: source.into(),
                filtered_path: filtered_path.into(),
                frame: Some(frame),
                motion,
            }),
            duration_frames,
        }
    }

    /// Open a raw RGB24 frame file written by
    /// [`crate::assets::media::transcode_raw_frames`].
    ///
    /// Clips shorter than `duration_frames` hold their last frame.
    pub fn transition(
        source: impl Into<PathBuf>,
        raw_path: impl Into<PathBuf>,
        canvas: Canvas,
        duration_frames: u64,
    ) -> ReelResult<Self> {
        let raw_path = raw_path.into();
        let file = File::open(&raw_path).map_err(|e| {
            ReelError::media(format!(
                "failed to open transition frames '{}': {e}",
                raw_path.display()
            ))
        })?;
        let len = file
            .metadata()
            .map_err(|e| ReelError::media(e.to_string()))?
            .len();
        let available_frames = len / canvas.rgb24_len() as u64;
        if available_frames == 0 {
            return Err(ReelError::media(format!(
                "transition frames '{}' hold no complete frame",
                raw_path.display()
            )));
        }
        Ok(Self {
            kind: ClipKind::Transition(TransitionClip {
                source: source.into(),
                raw_path,
                file: Some(Mutex::new(file)),
                canvas,
                available_frames,
            }),
            duration_frames,
        })
    }

    /// Clip length in frames.
    pub fn duration_frames(&self) -> u64 {
        self.duration_frames
    }

    /// Visual content.
    pub fn kind(&self) -> &ClipKind {
        &self.kind
    }

    /// Whether this is a transition clip.
    pub fn is_transition(&self) -> bool {
        matches!(self.kind, ClipKind::Transition(_))
    }

    /// Original asset this clip was made from.
    pub fn source(&self) -> &Path {
        match &self.kind {
            ClipKind::Still(s) => &s.source,
            ClipKind::Transition(t) => &t.source,
        }
    }

    /// Ken Burns motion of a still clip.
    pub fn motion(&self) -> Option<KenBurns> {
        match &self.kind {
            ClipKind::Still(s) => Some(s.motion),
            ClipKind::Transition(_) => None,
        }
    }

    /// Render local frame `local` (0-based within this clip).
    pub fn render_frame(&self, local: u64, fps: Fps) -> ReelResult<RgbImage> {
        match &self.kind {
            ClipKind::Still(s) => {
                let frame = s.frame.as_ref().ok_or_else(|| {
                    ReelError::render(format!(
                        "still clip '{}' was released before rendering",
                        s.filtered_path.display()
                    ))
                })?;
                let t = fps.frames_to_secs(local);
                let duration = fps.frames_to_secs(self.duration_frames);
                Ok(s.motion.render(frame, t, duration))
            }
            ClipKind::Transition(tr) => tr.read_frame(local),
        }
    }
}

impl TransitionClip {
    fn read_frame(&self, local: u64) -> ReelResult<RgbImage> {
        let file = self.file.as_ref().ok_or_else(|| {
            ReelError::render(format!(
                "transition '{}' was released before rendering",
                self.raw_path.display()
            ))
        })?;
        let idx = local.min(self.available_frames - 1);
        let frame_len = self.canvas.rgb24_len();
        let mut buf = vec![0u8; frame_len];
        {
            let mut f = file
                .lock()
                .map_err(|_| ReelError::render("transition file lock poisoned"))?;
            f.seek(SeekFrom::Start(idx * frame_len as u64))
                .and_then(|_| f.read_exact(&mut buf))
                .map_err(|e| {
                    ReelError::render(format!(
                        "failed to read frame {idx} of '{}': {e}",
                        self.raw_path.display()
                    ))
                })?;
        }
        RgbImage::from_raw(self.canvas.width, self.canvas.height, buf)
            .ok_or_else(|| ReelError::render("transition frame buffer has unexpected size"))
    }
}

impl Release for Clip {
    fn label(&self) -> String {
        match &self.kind {
            ClipKind::Still(s) => format!("still {}", s.filtered_path.display()),
            ClipKind::Transition(t) => format!("transition {}", t.raw_path.display()),
        }
    }

    fn release(&mut self) -> ReelResult<()> {
        match &mut self.kind {
            ClipKind::Still(s) => {
                s.frame = None;
            }
            ClipKind::Transition(t) => {
                if let Some(file) = t.file.take() {
                    // A poisoned lock still owns the handle; dropping it closes the file.
                    drop(file.into_inner().unwrap_or_else(|p| p.into_inner()));
                }
            }
        }
        Ok(())
    }

    fn is_released(&self) -> bool {
        match &self.kind {
            ClipKind::Still(s) => s.frame.is_none(),
            ClipKind::Transition(t) => t.file.is_none(),
        }
    }
}
