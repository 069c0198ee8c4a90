use crate::assets::media::AudioPcm;
use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::release::Release;

/// A decoded track held until the encoder has consumed the mix.
#[derive(Debug)]
pub struct AudioTrack {
    label: String,
    pcm: Option<AudioPcm>,
}

impl AudioTrack {
    /// Wrap decoded PCM under a log label.
    pub fn new(label: impl Into<String>, pcm: AudioPcm) -> Self {
        Self {
            label: label.into(),
            pcm: Some(pcm),
        }
    }

    /// Decoded samples, `None` once released.
    pub fn pcm(&self) -> Option<&AudioPcm> {
        self.pcm.as_ref()
    }
}

impl Release for AudioTrack {
    fn label(&self) -> String {
        format!("audio {}", self.label)
    }

    fn release(&mut self) -> ReelResult<()> {
        self.pcm = None;
        Ok(())
    }

    fn is_released(&self) -> bool {
        self.pcm.is_none()
    }
}

/// Combine an optional voice and an optional music track into one track of exactly
/// `total_frames` sample frames.
///
/// - voice only: truncated (or zero-padded) to the length
/// - music only: looped with whole copies, then trimmed
/// - both: music scaled by `music_gain`, looped/trimmed, then summed with the voice
/// - neither: `None`
pub fn mix_tracks(
    voice: Option<&AudioPcm>,
    music: Option<&AudioPcm>,
    total_frames: usize,
    music_gain: f32,
) -> ReelResult<Option<AudioPcm>> {
    let music = music.filter(|m| {
        if m.frames() == 0 {
            tracing::warn!("background music decoded to zero samples; mixing without it");
            false
        } else {
            true
        }
    });

    match (voice, music) {
        (None, None) => Ok(None),
        (Some(v), None) => Ok(Some(fit_to_length(v, total_frames))),
        (None, Some(m)) => Ok(Some(loop_to_length(m, total_frames))),
        (Some(v), Some(m)) => {
            if v.sample_rate != m.sample_rate || v.channels != m.channels {
                return Err(ReelError::media(format!(
                    "voice ({} Hz, {} ch) and music ({} Hz, {} ch) formats differ",
                    v.sample_rate, v.channels, m.sample_rate, m.channels
                )));
            }
            let bed = apply_gain(&loop_to_length(m, total_frames), music_gain);
            let voice = fit_to_length(v, total_frames);
            Ok(Some(superimpose(&voice, &bed)))
        }
    }
}

/// Truncate or zero-pad to exactly `frames` sample frames.
pub fn fit_to_length(pcm: &AudioPcm, frames: usize) -> AudioPcm {
    let len = frames * usize::from(pcm.channels);
    let mut out = pcm.interleaved_f32.clone();
    out.resize(len, 0.0);
    AudioPcm {
        sample_rate: pcm.sample_rate,
        channels: pcm.channels,
        interleaved_f32: out,
    }
}

/// Repeat whole copies until `frames` is covered, then trim to exactly `frames`.
pub fn loop_to_length(pcm: &AudioPcm, frames: usize) -> AudioPcm {
    let src_frames = pcm.frames();
    if src_frames == 0 || src_frames >= frames {
        return fit_to_length(pcm, frames);
    }
    let copies = frames / src_frames + 1;
    let mut out = Vec::with_capacity(copies * pcm.interleaved_f32.len());
    for _ in 0..copies {
        out.extend_from_slice(&pcm.interleaved_f32);
    }
    out.truncate(frames * usize::from(pcm.channels));
    AudioPcm {
        sample_rate: pcm.sample_rate,
        channels: pcm.channels,
        interleaved_f32: out,
    }
}

/// Scale every sample by `gain`.
pub fn apply_gain(pcm: &AudioPcm, gain: f32) -> AudioPcm {
    AudioPcm {
        sample_rate: pcm.sample_rate,
        channels: pcm.channels,
        interleaved_f32: pcm.interleaved_f32.iter().map(|s| s * gain).collect(),
    }
}

/// Sum two equal-format tracks sample by sample, clamped to `[-1, 1]`.
///
/// The result has the length of the longer input.
pub fn superimpose(a: &AudioPcm, b: &AudioPcm) -> AudioPcm {
    let len = a.interleaved_f32.len().max(b.interleaved_f32.len());
    let mut out = vec![0.0f32; len];
    for (i, s) in out.iter_mut().enumerate() {
        let x = a.interleaved_f32.get(i).copied().unwrap_or(0.0);
        let y = b.interleaved_f32.get(i).copied().unwrap_or(0.0);
        *s = (x + y).clamp(-1.0, 1.0);
    }
    AudioPcm {
        sample_rate: a.sample_rate,
        channels: a.channels,
        interleaved_f32: out,
    }
}

/// Convert a frame count to the nearest sample count at `sample_rate`.
pub fn frame_to_sample(frame_delta: u64, fps: Fps, sample_rate: u32) -> u64 {
    let num = u128::from(frame_delta) * u128::from(sample_rate) * u128::from(fps.den);
    let den = u128::from(fps.num);
    ((num + (den / 2)) / den) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
