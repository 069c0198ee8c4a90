//! Deep-voice post-processing: pitch drop, band-limit, normalize, compress.

use std::f32::consts::PI;
use std::path::Path;

use crate::assets::media::{AudioPcm, decode_audio_f32, encode_mp3};
use crate::foundation::error::{ReelError, ReelResult};

/// Working sample rate of the voice chain.
pub const VOICE_SAMPLE_RATE: u32 = 44_100;

/// Parameters of the voice chain.
#[derive(Clone, Debug, PartialEq)]
pub struct VoiceFx {
    /// Pitch shift in octaves; negative lowers the voice and slows it down.
    pub octaves: f64,
    /// Low-pass cutoff in Hz.
    pub low_pass_hz: f32,
    /// High-pass cutoff in Hz.
    pub high_pass_hz: f32,
    /// Normalization target peak in dBFS.
    pub headroom_db: f32,
    /// Compressor threshold in dBFS.
    pub threshold_db: f32,
    /// Compressor ratio.
    pub ratio: f32,
    /// Compressor attack in milliseconds.
    pub attack_ms: f32,
    /// Compressor release in milliseconds.
    pub release_ms: f32,
    /// MP3 export bitrate.
    pub bitrate: String,
}

impl Default for VoiceFx {
    fn default() -> Self {
        Self {
            octaves: -0.15,
            low_pass_hz: 3800.0,
            high_pass_hz: 85.0,
            headroom_db: 0.1,
            threshold_db: -20.0,
            ratio: 3.0,
            attack_ms: 5.0,
            release_ms: 50.0,
            bitrate: "192k".to_string(),
        }
    }
}

impl VoiceFx {
    /// Run the whole chain on decoded PCM.
    pub fn process(&self, pcm: &AudioPcm) -> ReelResult<AudioPcm> {
        if pcm.channels == 0 || pcm.sample_rate == 0 {
            return Err(ReelError::media("voice pcm has no channels or sample rate"));
        }
        if pcm.frames() == 0 {
            return Err(ReelError::media("voice pcm is empty"));
        }

        let reinterpreted = (f64::from(pcm.sample_rate) * 2f64.powf(self.octaves)).round() as u32;
        let mut out = resample_linear(pcm, reinterpreted.max(1), VOICE_SAMPLE_RATE);
        low_pass(&mut out, self.low_pass_hz);
        high_pass(&mut out, self.high_pass_hz);
        normalize(&mut out, self.headroom_db);
        compress(
            &mut out,
            self.threshold_db,
            self.ratio,
            self.attack_ms,
            self.release_ms,
        );
        Ok(out)
    }

    /// Decode `input`, process it, and write an MP3 to `output` (staging raw PCM at `raw`).
    pub fn process_file(&self, input: &Path, raw: &Path, output: &Path) -> ReelResult<()> {
        let pcm = decode_audio_f32(input, VOICE_SAMPLE_RATE, 1)?;
        let processed = self.process(&pcm)?;
        encode_mp3(&processed, raw, output, &self.bitrate)?;
        if let Err(error) = std::fs::remove_file(raw) {
            tracing::debug!(path = %raw.display(), %error, "could not remove staged voice pcm");
        }
        Ok(())
    }
}

/// Treat `pcm` as if it had been recorded at `from_rate` and resample it to `to_rate`.
///
/// With `from_rate` lower than the true rate this both lowers pitch and stretches time.
pub fn resample_linear(pcm: &AudioPcm, from_rate: u32, to_rate: u32) -> AudioPcm {
    let ch = usize::from(pcm.channels);
    let in_frames = pcm.frames();
    if in_frames == 0 || from_rate == to_rate {
        return AudioPcm {
            sample_rate: to_rate,
            channels: pcm.channels,
            interleaved_f32: pcm.interleaved_f32.clone(),
        };
    }

    let out_frames =
        ((in_frames as u64 * u64::from(to_rate)) / u64::from(from_rate)).max(1) as usize;
    let step = f64::from(from_rate) / f64::from(to_rate);
    let src = &pcm.interleaved_f32;
    let mut out = Vec::with_capacity(out_frames * ch);
    for i in 0..out_frames {
        let pos = i as f64 * step;
        let i0 = (pos.floor() as usize).min(in_frames - 1);
        let i1 = (i0 + 1).min(in_frames - 1);
        let frac = (pos - i0 as f64) as f32;
        for c in 0..ch {
            let a = src[i0 * ch + c];
            let b = src[i1 * ch + c];
            out.push(a + (b - a) * frac);
        }
    }
    AudioPcm {
        sample_rate: to_rate,
        channels: pcm.channels,
        interleaved_f32: out,
    }
}

fn rc_and_dt(cutoff_hz: f32, sample_rate: u32) -> (f32, f32) {
    let rc = 1.0 / (2.0 * PI * cutoff_hz.max(f32::MIN_POSITIVE));
    let dt = 1.0 / sample_rate as f32;
    (rc, dt)
}

/// One-pole RC low-pass, in place, per channel.
pub fn low_pass(pcm: &mut AudioPcm, cutoff_hz: f32) {
    let (rc, dt) = rc_and_dt(cutoff_hz, pcm.sample_rate);
    let alpha = dt / (rc + dt);
    let ch = usize::from(pcm.channels);
    if ch == 0 {
        return;
    }
    for c in 0..ch {
        let mut prev = 0.0f32;
        for s in pcm.interleaved_f32.iter_mut().skip(c).step_by(ch) {
            prev += alpha * (*s - prev);
            *s = prev;
        }
    }
}

/// One-pole RC high-pass, in place, per channel.
pub fn high_pass(pcm: &mut AudioPcm, cutoff_hz: f32) {
    let (rc, dt) = rc_and_dt(cutoff_hz, pcm.sample_rate);
    let alpha = rc / (rc + dt);
    let ch = usize::from(pcm.channels);
    if ch == 0 {
        return;
    }
    for c in 0..ch {
        let mut prev_in = 0.0f32;
        let mut prev_out = 0.0f32;
        for s in pcm.interleaved_f32.iter_mut().skip(c).step_by(ch) {
            let x = *s;
            prev_out = alpha * (prev_out + x - prev_in);
            prev_in = x;
            *s = prev_out;
        }
    }
}

fn db_to_amp(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

fn amp_to_db(amp: f32) -> f32 {
    20.0 * amp.max(1e-9).log10()
}

/// Scale so the absolute peak sits `headroom_db` below full scale. Silence is left as is.
pub fn normalize(pcm: &mut AudioPcm, headroom_db: f32) {
    let peak = pcm
        .interleaved_f32
        .iter()
        .fold(0.0f32, |m, s| m.max(s.abs()));
    if peak <= 0.0 {
        return;
    }
    let gain = db_to_amp(-headroom_db) / peak;
    for s in &mut pcm.interleaved_f32 {
        *s *= gain;
    }
}

/// Downward compressor driven by a peak envelope across all channels.
pub fn compress(
    pcm: &mut AudioPcm,
    threshold_db: f32,
    ratio: f32,
    attack_ms: f32,
    release_ms: f32,
) {
    let ch = usize::from(pcm.channels).max(1);
    let rate = pcm.sample_rate as f32;
    let coef = |ms: f32| (-1.0 / (ms.max(0.01) * 0.001 * rate)).exp();
    let (attack, release) = (coef(attack_ms), coef(release_ms));
    let slope = 1.0 - 1.0 / ratio.max(1.0);

    let mut env = 0.0f32;
    for frame in pcm.interleaved_f32.chunks_mut(ch) {
        let level = frame.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let k = if level > env { attack } else { release };
        env = k * env + (1.0 - k) * level;

        let over = amp_to_db(env) - threshold_db;
        if over > 0.0 {
            let gain = db_to_amp(-over * slope);
            for s in frame.iter_mut() {
                *s *= gain;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/voice/post.rs"]
mod tests;
