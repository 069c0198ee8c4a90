//! Reelsmith assembles vertical short-form "reels" from a pool of still images.
//!
//! A build picks and color-grades a handful of images, animates each with a Ken Burns zoom,
//! optionally interleaves pre-made transition clips, lays a synthesized voice-over and a
//! background music bed under the result and encodes a 1080x1920 H.264/AAC MP4 through the
//! system `ffmpeg`:
//!
//! - Describe directories with a [`ReelConfig`]
//! - Build with [`create_reel`]
//! - Or drive the stages yourself: [`plan_timeline`], [`assemble_timeline`],
//!   [`mix_tracks`], [`render_timeline`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Input pools and `ffmpeg`/`ffprobe` media access.
pub mod assets;
/// Voice and music mixing.
pub mod audio;
/// Content generator and upload service boundaries.
pub mod collab;
/// Directory layout and output format.
pub mod config;
/// Color grading, cropping and motion.
pub mod effects;
/// Encoding sinks.
pub mod encode;
/// Frame, rate and error primitives.
pub mod foundation;
/// End-to-end reel build.
pub mod pipeline;
/// Frame rendering driver and resource release.
pub mod render;
/// Poster frame extraction.
pub mod thumbnail;
/// Image selection and clip sequencing.
pub mod timeline;
/// Speech synthesis and voice post-processing.
pub mod voice;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Rect};
pub use crate::foundation::error::{ErrorClass, ReelError, ReelResult};

pub use crate::audio::mix::mix_tracks;
pub use crate::collab::content::ViralContent;
pub use crate::collab::upload::{CommandUploader, ReelUploader, UploadOutcome};
pub use crate::config::{ReelConfig, ReelFormat};
pub use crate::effects::filter::FilterKind;
pub use crate::effects::motion::KenBurns;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::pipeline::{ReelOptions, ReelSummary, create_reel, create_reel_with_sink};
pub use crate::render::release::{CleanupReport, Release, ReleaseReport, Scratch};
pub use crate::render::{RenderOpts, RenderStats, render_timeline};
pub use crate::thumbnail::extract_thumbnail;
pub use crate::timeline::Timeline;
pub use crate::timeline::assemble::assemble_timeline;
pub use crate::timeline::plan::{AssemblyOptions, TimelinePlan, plan_timeline};
pub use crate::voice::synth::{EdgeTtsCli, SpeechBackend};
