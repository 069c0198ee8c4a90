//! End-to-end reel build: plan, voice, assemble, mix, encode, release, thumbnail.

use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::assets::media::{MIX_SAMPLE_RATE, decode_audio_for_mix, write_f32le_file};
use crate::assets::pool::{MUSIC_EXTENSIONS, TRANSITION_EXTENSIONS, image_pool, list_assets};
use crate::audio::mix::{AudioTrack, frame_to_sample, mix_tracks};
use crate::config::{ReelConfig, ReelFormat};
use crate::effects::filter::FilterKind;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{AudioInputConfig, FrameSink};
use crate::foundation::error::{ErrorClass, ReelError, ReelResult};
use crate::render::release::{CleanupReport, Release, Scratch, release_all};
use crate::render::{RenderOpts, render_timeline};
use crate::thumbnail::extract_thumbnail;
use crate::timeline::assemble::assemble_timeline;
use crate::timeline::plan::{AssemblyOptions, plan_timeline};
use crate::voice::post::VoiceFx;
use crate::voice::synth::{DEFAULT_VOICE, SpeechBackend, VoiceTrack, synthesize_voice};

/// Raw mixed audio handed to the encoder.
const MIX_FILE: &str = "mix.f32le";

/// Per-run choices for [`create_reel`].
#[derive(Clone, Debug)]
pub struct ReelOptions {
    /// File name of the video inside the output directory.
    pub output_name: String,
    /// Synthesize a voice-over from the script.
    pub use_voice: bool,
    /// Voice identifier passed to the speech backend.
    pub voice: String,
    /// Images to use; drawn from 6..=7 when `None`.
    pub image_count: Option<usize>,
    /// Color grade; drawn at random when `None`.
    pub filter: Option<FilterKind>,
    /// Insert transition clips between images.
    pub use_transitions: bool,
    /// Lay a background music track under the voice.
    pub use_music: bool,
    /// Save a mid-point thumbnail next to the video.
    pub thumbnail: bool,
    /// Output format.
    pub format: ReelFormat,
    /// Voice post-processing chain.
    pub voice_fx: VoiceFx,
}

impl Default for ReelOptions {
    fn default() -> Self {
        Self {
            output_name: "viral_reel.mp4".to_string(),
            use_voice: true,
            voice: DEFAULT_VOICE.to_string(),
            image_count: None,
            filter: None,
            use_transitions: true,
            use_music: true,
            thumbnail: false,
            format: ReelFormat::default(),
            voice_fx: VoiceFx::default(),
        }
    }
}

/// What a finished build produced.
#[derive(Clone, Debug)]
pub struct ReelSummary {
    /// Rendered MP4.
    pub video: PathBuf,
    /// Thumbnail, when requested and extracted.
    pub thumbnail: Option<PathBuf>,
    /// Video length in seconds.
    pub duration_secs: f64,
    /// Still-image clips used.
    pub image_count: usize,
    /// Transition clips that made it into the timeline.
    pub transition_count: usize,
    /// Color grade applied.
    pub filter: FilterKind,
    /// Voice-over, when synthesis succeeded.
    pub voice: Option<VoiceTrack>,
    /// Background music file, when one was mixed.
    pub music: Option<PathBuf>,
    /// Whether the video carries an audio stream.
    pub has_audio: bool,
    /// Size of the video file in bytes.
    pub file_size: u64,
    /// Scratch files removed, `None` when cleanup was skipped.
    pub cleanup: Option<CleanupReport>,
}

/// Build one reel from `script` and encode it to `output_dir/output_name` with `ffmpeg`.
///
/// An empty image pool fails before anything is written. Voice, music and transition problems
/// are logged and the reel is built without them; encoder and disk failures abort.
pub fn create_reel<B, R>(
    cfg: &ReelConfig,
    script: &str,
    opts: &ReelOptions,
    speech: Option<&B>,
    rng: &mut R,
) -> ReelResult<ReelSummary>
where
    B: SpeechBackend,
    R: Rng,
{
    let video = cfg.output_dir.join(&opts.output_name);
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        preset: opts.format.preset.clone(),
        threads: opts.format.workers,
        ..FfmpegSinkOpts::new(&video)
    });
    let summary = create_reel_with_sink(cfg, script, opts, speech, rng, &mut sink)?;
    if summary.file_size == 0 {
        return Err(ReelError::render(format!(
            "encoder left no output at '{}'",
            video.display()
        )));
    }
    Ok(summary)
}

/// Same as [`create_reel`] but hands the frames to `sink`.
///
/// `sink` must write `output_dir/output_name` for the thumbnail and file size to be filled in;
/// other sinks get `file_size == 0` and no thumbnail.
#[tracing::instrument(skip_all, fields(output = %opts.output_name))]
pub fn create_reel_with_sink<B, R>(
    cfg: &ReelConfig,
    script: &str,
    opts: &ReelOptions,
    speech: Option<&B>,
    rng: &mut R,
    sink: &mut dyn FrameSink,
) -> ReelResult<ReelSummary>
where
    B: SpeechBackend,
    R: Rng,
{
    let images = image_pool(&cfg.images_dir)?;
    let transitions = if opts.use_transitions {
        list_assets(&cfg.transitions_dir, TRANSITION_EXTENSIONS)?
    } else {
        Vec::new()
    };
    if opts.use_transitions && transitions.is_empty() {
        tracing::warn!(dir = %cfg.transitions_dir.display(), "no transition clips found");
    }
    let plan = plan_timeline(
        &images,
        &transitions,
        &AssemblyOptions {
            image_count: opts.image_count,
            filter: opts.filter,
            use_transitions: opts.use_transitions,
        },
        rng,
    )?;
    let music = if opts.use_music {
        let tracks = list_assets(&cfg.music_dir, MUSIC_EXTENSIONS)?;
        if tracks.is_empty() {
            tracing::warn!(dir = %cfg.music_dir.display(), "no background music found");
        }
        tracks.choose(rng).cloned()
    } else {
        None
    };

    let scratch = Scratch::create(&cfg.temp_dir)?;

    let voice = match (opts.use_voice, speech) {
        (true, Some(backend)) => degraded(
            "voice-over",
            synthesize_voice(backend, script, &opts.voice, &opts.voice_fx, &scratch),
        )?,
        (true, None) => {
            tracing::warn!("no speech backend configured; continuing without voice-over");
            None
        }
        (false, _) => None,
    };

    let mut timeline = assemble_timeline(&plan, &opts.format, &scratch)?;
    let total_frames = timeline.duration_frames();
    let total_samples = frame_to_sample(total_frames, timeline.fps(), MIX_SAMPLE_RATE) as usize;

    let mut voice_pcm = match &voice {
        Some(v) => decode_track("voice", &v.path)?,
        None => None,
    };
    let mut music_pcm = match &music {
        Some(m) => decode_track("music", m)?,
        None => None,
    };
    let voice_in = voice_pcm.as_ref().and_then(AudioTrack::pcm);
    let music_in = music_pcm.as_ref().and_then(AudioTrack::pcm);
    let mix = match mix_tracks(voice_in, music_in, total_samples, opts.format.music_gain) {
        Ok(mix) => mix,
        Err(error) if error.class() == ErrorClass::Degraded => {
            tracing::warn!(%error, "music cannot be mixed under the voice; using voice only");
            mix_tracks(voice_in, None, total_samples, opts.format.music_gain)?
        }
        Err(error) => return Err(error),
    };
    let audio = match mix {
        Some(mix) => {
            let path = scratch.file(MIX_FILE);
            write_f32le_file(&mix.interleaved_f32, &path)?;
            Some(AudioInputConfig {
                path,
                sample_rate: mix.sample_rate,
                channels: mix.channels,
            })
        }
        None => None,
    };
    let has_audio = audio.is_some();

    render_timeline(
        &timeline,
        audio,
        sink,
        &RenderOpts {
            workers: opts.format.workers,
            ..RenderOpts::default()
        },
    )?;

    let mut resources: Vec<&mut dyn Release> = timeline
        .clips_mut()
        .iter_mut()
        .map(|c| c as &mut dyn Release)
        .collect();
    resources.extend(voice_pcm.as_mut().map(|t| t as &mut dyn Release));
    resources.extend(music_pcm.as_mut().map(|t| t as &mut dyn Release));
    let released = release_all(resources);
    tracing::info!(%released, "handles released");
    let cleanup = degraded("scratch cleanup", scratch.reclaim(&released))?;

    let video = cfg.output_dir.join(&opts.output_name);
    let thumbnail = if opts.thumbnail {
        extract_thumbnail(&video, opts.format.canvas)
    } else {
        None
    };
    let file_size = std::fs::metadata(&video).map_or(0, |m| m.len());

    let summary = ReelSummary {
        duration_secs: timeline.duration_secs(),
        image_count: timeline.image_count(),
        transition_count: timeline.transition_count(),
        filter: plan.filter,
        video,
        thumbnail,
        voice,
        music,
        has_audio,
        file_size,
        cleanup,
    };
    tracing::info!(
        video = %summary.video.display(),
        secs = summary.duration_secs,
        mb = summary.file_size as f64 / 1024.0 / 1024.0,
        "reel ready"
    );
    Ok(summary)
}

/// Turn a recoverable failure into `None` with a warning; anything else propagates.
fn degraded<T>(stage: &str, result: ReelResult<T>) -> ReelResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(error) if error.class() == ErrorClass::Degraded => {
            tracing::warn!(stage, %error, "continuing without it");
            Ok(None)
        }
        Err(error) => Err(error),
    }
}

fn decode_track(label: &str, path: &Path) -> ReelResult<Option<AudioTrack>> {
    tracing::debug!(track = label, path = %path.display(), "decoding audio track");
    let pcm = degraded(label, decode_audio_for_mix(path))?;
    Ok(pcm.map(|pcm| AudioTrack::new(label, pcm)))
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
