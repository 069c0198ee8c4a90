//! Explicit directory layout and fixed output format.
//!
//! Every pipeline entry point takes a [`ReelConfig`]; nothing reads the working directory
//! implicitly.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Directory layout used by one reel run.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReelConfig {
    /// Input still-image pool (`.jpg`, `.jpeg`, `.png`).
    pub images_dir: PathBuf,
    /// Final artifacts (video, thumbnail).
    pub output_dir: PathBuf,
    /// Scratch directory for filtered frames, voice files and raw intermediates.
    pub temp_dir: PathBuf,
    /// Short transition clips (`.mp4`, `.mov`).
    pub transitions_dir: PathBuf,
    /// Background music tracks (`.mp3`).
    pub music_dir: PathBuf,
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self::rooted(".")
    }
}

impl ReelConfig {
    /// Standard layout below `root`.
    pub fn rooted(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let output_dir = root.join("output");
        Self {
            images_dir: root.join("images"),
            temp_dir: output_dir.join("temp"),
            output_dir,
            transitions_dir: root.join("assets").join("transitions"),
            music_dir: root.join("assets").join("background_music"),
        }
    }

    /// Parse a JSON config. Relative paths are resolved against `root`; missing fields take the
    /// standard layout below `root`.
    pub fn from_json_str(s: &str, root: impl AsRef<Path>) -> ReelResult<Self> {
        let root = root.as_ref();
        let value: serde_json::Value =
            serde_json::from_str(s).map_err(|e| ReelError::serde(e.to_string()))?;
        let defaults = Self::rooted(root);
        let mut cfg: Self = serde_json::from_value(value.clone())
            .map_err(|e| ReelError::serde(e.to_string()))?;

        // `#[serde(default)]` fills absent fields relative to ".", re-anchor them at `root`.
        let present = |key: &str| value.get(key).is_some();
        let pick = |key: &str, parsed: PathBuf, default: PathBuf| {
            if !present(key) {
                default
            } else if parsed.is_relative() {
                root.join(parsed)
            } else {
                parsed
            }
        };
        cfg.images_dir = pick("images_dir", cfg.images_dir, defaults.images_dir);
        cfg.output_dir = pick("output_dir", cfg.output_dir, defaults.output_dir);
        cfg.temp_dir = pick("temp_dir", cfg.temp_dir, cfg.output_dir.join("temp"));
        cfg.transitions_dir = pick(
            "transitions_dir",
            cfg.transitions_dir,
            defaults.transitions_dir,
        );
        cfg.music_dir = pick("music_dir", cfg.music_dir, defaults.music_dir);
        Ok(cfg)
    }

    /// Read and parse a JSON config file; relative paths resolve against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json_str(&s, root)
    }

    /// Wipe the output directory and recreate `output/` and `images/`.
    ///
    /// Input asset pools are never touched; the scratch directory is created by the pipeline
    /// once the image pool has been validated.
    pub fn prepare_workspace(&self) -> ReelResult<()> {
        if self.output_dir.exists() {
            std::fs::remove_dir_all(&self.output_dir).with_context(|| {
                format!("wipe output directory '{}'", self.output_dir.display())
            })?;
        }
        for dir in [&self.output_dir, &self.images_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create directory '{}'", dir.display()))?;
        }
        tracing::info!(output = %self.output_dir.display(), "workspace cleaned");
        Ok(())
    }
}

/// Fixed output format of a reel.
#[derive(Clone, Debug, PartialEq)]
pub struct ReelFormat {
    /// Output frame size.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// On-screen time of each still image.
    pub image_secs: f64,
    /// On-screen time of each transition clip.
    pub transition_secs: f64,
    /// Music amplitude when mixed under a voice track.
    pub music_gain: f32,
    /// `libx264` encoder preset.
    pub preset: String,
    /// Worker threads used for frame rendering and encoding.
    pub workers: usize,
}

impl Default for ReelFormat {
    fn default() -> Self {
        Self {
            canvas: Canvas::REEL,
            fps: Fps { num: 30, den: 1 },
            image_secs: 2.0,
            transition_secs: 1.0,
            music_gain: 0.3,
            preset: "medium".to_string(),
            workers: 4,
        }
    }
}

impl ReelFormat {
    /// Frame count of one still-image clip.
    pub fn image_frames(&self) -> u64 {
        self.fps.secs_to_frames_round(self.image_secs)
    }

    /// Frame count of one transition clip.
    pub fn transition_frames(&self) -> u64 {
        self.fps.secs_to_frames_round(self.transition_secs)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
