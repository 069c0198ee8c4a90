use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use crate::foundation::error::{ReelError, ReelResult};
use crate::render::release::Scratch;
use crate::voice::post::VoiceFx;

/// Default neural voice.
pub const DEFAULT_VOICE: &str = "hi-IN-MadhurNeural";
/// Raw synthesis output inside the scratch directory.
pub const RAW_VOICE_FILE: &str = "viral_voice.mp3";
/// Post-processed voice inside the scratch directory.
pub const DEEP_VOICE_FILE: &str = "viral_voice_deep.mp3";

/// Prosody deltas passed to the speech service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prosody {
    /// Speaking rate change in percent.
    pub rate_pct: i32,
    /// Pitch change in Hz.
    pub pitch_hz: i32,
    /// Volume change in percent.
    pub volume_pct: i32,
}

impl Default for Prosody {
    fn default() -> Self {
        Self {
            rate_pct: 10,
            pitch_hz: -15,
            volume_pct: 15,
        }
    }
}

impl Prosody {
    /// Rate as `+10%`.
    pub fn rate_arg(&self) -> String {
        format!("{:+}%", self.rate_pct)
    }

    /// Pitch as `-15Hz`.
    pub fn pitch_arg(&self) -> String {
        format!("{:+}Hz", self.pitch_hz)
    }

    /// Volume as `+15%`.
    pub fn volume_arg(&self) -> String {
        format!("{:+}%", self.volume_pct)
    }
}

/// Text plus voice settings for one synthesis call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeechRequest {
    /// Text to speak.
    pub text: String,
    /// Voice identifier.
    pub voice: String,
    /// Prosody deltas.
    pub prosody: Prosody,
}

impl SpeechRequest {
    /// Request with the default prosody.
    pub fn new(text: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
            prosody: Prosody::default(),
        }
    }
}

/// A text-to-speech service that writes an audio file.
pub trait SpeechBackend {
    /// Synthesize `req` into `out`. An unavailable service is a synthesis error.
    fn synthesize(
        &self,
        req: &SpeechRequest,
        out: &Path,
    ) -> impl Future<Output = ReelResult<()>>;
}

/// `edge-tts` command-line client.
#[derive(Clone, Debug)]
pub struct EdgeTtsCli {
    program: PathBuf,
}

impl Default for EdgeTtsCli {
    fn default() -> Self {
        Self {
            program: PathBuf::from("edge-tts"),
        }
    }
}

impl EdgeTtsCli {
    /// Use a specific executable instead of `edge-tts` from `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments for one request.
    pub fn args(req: &SpeechRequest, out: &Path) -> Vec<String> {
        vec![
            "--voice".to_string(),
            req.voice.clone(),
            format!("--rate={}", req.prosody.rate_arg()),
            format!("--pitch={}", req.prosody.pitch_arg()),
            format!("--volume={}", req.prosody.volume_arg()),
            format!("--text={}", req.text),
            "--write-media".to_string(),
            out.to_string_lossy().into_owned(),
        ]
    }
}

impl SpeechBackend for EdgeTtsCli {
    async fn synthesize(&self, req: &SpeechRequest, out: &Path) -> ReelResult<()> {
        let output = tokio::process::Command::new(&self.program)
            .args(Self::args(req, out))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                ReelError::synthesis(format!(
                    "failed to start '{}': {e}",
                    self.program.display()
                ))
            })?;
        if !output.status.success() {
            return Err(ReelError::synthesis(format!(
                "'{}' exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        match std::fs::metadata(out) {
            Ok(m) if m.len() > 0 => Ok(()),
            _ => Err(ReelError::synthesis(format!(
                "'{}' produced no audio at '{}'",
                self.program.display(),
                out.display()
            ))),
        }
    }
}

/// A synthesized voice file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoiceTrack {
    /// Audio file to mix.
    pub path: PathBuf,
    /// Whether post-processing succeeded; `false` means `path` is the raw synthesis.
    pub processed: bool,
}

/// Synthesize `text` and deepen it.
///
/// Synthesis failure is returned as an error. Post-processing failure falls back to the raw
/// synthesized file.
#[tracing::instrument(skip_all, fields(voice = voice, chars = text.chars().count()))]
pub fn synthesize_voice<B: SpeechBackend>(
    backend: &B,
    text: &str,
    voice: &str,
    fx: &VoiceFx,
    scratch: &Scratch,
) -> ReelResult<VoiceTrack> {
    if text.trim().is_empty() {
        return Err(ReelError::synthesis("script is empty"));
    }
    let raw = scratch.file(RAW_VOICE_FILE);
    let req = SpeechRequest::new(text, voice);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ReelError::synthesis(format!("failed to start async runtime: {e}")))?;
    rt.block_on(backend.synthesize(&req, &raw))
        .map_err(|error| match error {
            ReelError::Synthesis(_) => error,
            other => ReelError::synthesis(other.to_string()),
        })?;
    tracing::info!(path = %raw.display(), "voice synthesized");

    let deep = scratch.file(DEEP_VOICE_FILE);
    match fx.process_file(&raw, &scratch.file("viral_voice_deep.f32le"), &deep) {
        Ok(()) => {
            tracing::info!(path = %deep.display(), "voice post-processed");
            Ok(VoiceTrack {
                path: deep,
                processed: true,
            })
        }
        Err(error) => {
            tracing::warn!(%error, "voice post-processing skipped, using raw synthesis");
            Ok(VoiceTrack {
                path: raw,
                processed: false,
            })
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/voice/synth.rs"]
mod tests;
