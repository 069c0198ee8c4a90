//! Input assets: pool scanning and `ffmpeg`/`ffprobe` media access.

/// `ffprobe`/`ffmpeg` probing, decoding and transcoding helpers.
pub mod media;
/// Directory scans for images, transitions and music.
pub mod pool;
