//! Mid-point poster frame for a finished reel.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};

use crate::assets::media::{decode_video_frame_rgb8, probe_video, save_jpeg};
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::assemble::JPEG_QUALITY;

/// Thumbnail path for `video`: the video path with `.jpg` appended.
pub fn thumbnail_path(video: &Path) -> PathBuf {
    let mut s = video.as_os_str().to_os_string();
    s.push(".jpg");
    PathBuf::from(s)
}

/// Decode the frame at half the video's duration, resize it to `canvas` and save it as JPEG.
///
/// Returns `None` when the video cannot be probed or decoded; a missing thumbnail never
/// fails the caller.
pub fn extract_thumbnail(video: &Path, canvas: Canvas) -> Option<PathBuf> {
    match try_extract(video, canvas) {
        Ok(path) => {
            tracing::info!(thumbnail = %path.display(), "thumbnail saved");
            Some(path)
        }
        Err(error) => {
            tracing::warn!(video = %video.display(), %error, "thumbnail extraction failed");
            None
        }
    }
}

fn try_extract(video: &Path, canvas: Canvas) -> ReelResult<PathBuf> {
    let info = probe_video(video)?;
    let duration = info.duration_secs.ok_or_else(|| {
        ReelError::media(format!("'{}' reports no duration", video.display()))
    })?;
    let frame = decode_video_frame_rgb8(&info, duration / 2.0)?;
    let resized = imageops::resize(&frame, canvas.width, canvas.height, FilterType::Lanczos3);
    let out = thumbnail_path(video);
    save_jpeg(&resized, &out, JPEG_QUALITY)?;
    Ok(out)
}

#[cfg(test)]
#[path = "../tests/unit/thumbnail.rs"]
mod tests;
