use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use image::RgbImage;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Internal audio mixing sample rate used across the decode/mix/encode pipeline.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

#[derive(Clone, Debug)]
/// Basic metadata about a source video file.
pub struct VideoSourceInfo {
    /// Source path used for probing/decoding.
    pub source_path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Whether ffprobe detected at least one audio stream.
    pub has_audio: bool,
    /// Container duration in seconds, when reported.
    pub duration_secs: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
/// Decoded interleaved floating-point PCM.
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved `f32` PCM samples.
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// Silent PCM of `frames` sample frames.
    pub fn silence(sample_rate: u32, channels: u16, frames: usize) -> Self {
        Self {
            sample_rate,
            channels,
            interleaved_f32: vec![0.0; frames * usize::from(channels)],
        }
    }

    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.interleaved_f32.len() / usize::from(self.channels)
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }
}

/// Return `true` when `tool -version` can be invoked from `PATH`.
pub fn is_tool_on_path(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_tool_on_path("ffmpeg")
}

/// Probe source video metadata through `ffprobe`.
pub fn probe_video(source_path: &Path) -> ReelResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| ReelError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::media(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| ReelError::media(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            ReelError::media(format!(
                "no video stream found in '{}'",
                source_path.display()
            ))
        })?;
    let width = video_stream
        .width
        .ok_or_else(|| ReelError::media("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| ReelError::media("missing video height from ffprobe"))?;
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));
    let duration_secs = parsed
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0);

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        has_audio,
        duration_secs,
    })
}

/// Decode a single RGB frame from source video at `source_time_sec`.
pub fn decode_video_frame_rgb8(
    source: &VideoSourceInfo,
    source_time_sec: f64,
) -> ReelResult<RgbImage> {
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-ss", &format!("{source_time_sec:.6}")])
        .arg("-i")
        .arg(&source.source_path)
        .args([
            "-frames:v",
            "1",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "pipe:1",
        ])
        .output()
        .map_err(|e| ReelError::media(format!("failed to run ffmpeg for video decode: {e}")))?;

    if !out.status.success() {
        return Err(ReelError::media(format!(
            "ffmpeg video decode failed for '{}': {}",
            source.source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let expected_len = source.width as usize * source.height as usize * 3;
    if expected_len == 0 {
        return Err(ReelError::media(
            "decoded video frame size is zero (invalid source dimensions)",
        ));
    }
    if out.stdout.len() < expected_len {
        return Err(ReelError::media(format!(
            "ffmpeg returned no video frame for '{}' at {source_time_sec:.3}s",
            source.source_path.display()
        )));
    }

    let mut data = out.stdout;
    data.truncate(expected_len);
    RgbImage::from_raw(source.width, source.height, data)
        .ok_or_else(|| ReelError::media("decoded frame buffer has unexpected size"))
}

/// Transcode the first `secs` seconds of a video into packed RGB24 frames at `dst`.
///
/// The clip is resampled to `fps`, scaled to cover `canvas`, center-cropped to exactly
/// `canvas` and stripped of audio. Returns the number of frames written.
pub fn transcode_raw_frames(
    src: &Path,
    dst: &Path,
    canvas: Canvas,
    fps: Fps,
    secs: f64,
) -> ReelResult<u64> {
    let (w, h) = (canvas.width, canvas.height);
    let vf = format!(
        "fps={}/{},scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h}",
        fps.num, fps.den
    );
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-y", "-i"])
        .arg(src)
        .args([
            "-t",
            &format!("{secs:.6}"),
            "-an",
            "-vf",
            &vf,
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
        ])
        .arg(dst)
        .output()
        .map_err(|e| ReelError::media(format!("failed to run ffmpeg for transcode: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::media(format!(
            "ffmpeg transcode failed for '{}': {}",
            src.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let len = std::fs::metadata(dst)
        .map_err(|e| ReelError::media(format!("transcoded file missing: {e}")))?
        .len();
    let frame_len = canvas.rgb24_len() as u64;
    let frames = len / frame_len;
    if frames == 0 {
        return Err(ReelError::media(format!(
            "'{}' produced no video frames",
            src.display()
        )));
    }
    Ok(frames)
}

/// Decode audio from a media source to interleaved `f32` PCM at `sample_rate`.
pub fn decode_audio_f32(path: &Path, sample_rate: u32, channels: u16) -> ReelResult<AudioPcm> {
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &channels.to_string(),
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| ReelError::media(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        return Err(ReelError::media(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(ReelError::media(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let pcm = out
        .stdout
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    Ok(AudioPcm {
        sample_rate,
        channels,
        interleaved_f32: pcm,
    })
}

/// Decode audio to stereo `f32` PCM at the mixing rate.
pub fn decode_audio_for_mix(path: &Path) -> ReelResult<AudioPcm> {
    decode_audio_f32(path, MIX_SAMPLE_RATE, 2)
}

/// Encode PCM to an MP3 file at `bitrate` (e.g. `"192k"`) using `raw_path` as staging.
pub fn encode_mp3(pcm: &AudioPcm, raw_path: &Path, out_path: &Path, bitrate: &str) -> ReelResult<()> {
    write_f32le_file(&pcm.interleaved_f32, raw_path)?;
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-y", "-f", "f32le", "-ar"])
        .arg(pcm.sample_rate.to_string())
        .arg("-ac")
        .arg(pcm.channels.to_string())
        .arg("-i")
        .arg(raw_path)
        .args(["-c:a", "libmp3lame", "-b:a", bitrate])
        .arg(out_path)
        .output()
        .map_err(|e| ReelError::media(format!("failed to run ffmpeg for mp3 encode: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::media(format!(
            "ffmpeg mp3 encode failed for '{}': {}",
            out_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(())
}

/// Save an RGB frame as baseline JPEG at `quality` (1..=100).
pub fn save_jpeg(img: &RgbImage, path: &Path, quality: u8) -> ReelResult<()> {
    let file = std::fs::File::create(path).map_err(|e| {
        ReelError::media(format!("failed to create '{}': {e}", path.display()))
    })?;
    let mut writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, quality)
        .encode_image(img)
        .map_err(|e| ReelError::media(format!("jpeg encode failed for '{}': {e}", path.display())))?;
    std::io::Write::flush(&mut writer)
        .map_err(|e| ReelError::media(format!("failed to write '{}': {e}", path.display())))
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub fn write_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> ReelResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReelError::media(format!(
                "failed to create audio output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        ReelError::media(format!(
            "failed to write raw audio file '{}': {e}",
            out_path.display()
        ))
    })
}

// These functions shell out to `ffprobe`/`ffmpeg`; they are exercised by the integration tests,
// which skip themselves when the tools are unavailable.
