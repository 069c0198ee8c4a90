use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};

/// Still images accepted into the image pool.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
/// Pre-made transition clips.
pub const TRANSITION_EXTENSIONS: &[&str] = &["mp4", "mov"];
/// Background music tracks.
pub const MUSIC_EXTENSIONS: &[&str] = &["mp3"];

/// List regular files in `dir` whose extension matches one of `extensions`
/// (case-insensitive), sorted by path.
///
/// A missing directory yields an empty list.
pub fn list_assets(dir: &Path, extensions: &[&str]) -> ReelResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("read directory '{}'", dir.display()))?
    {
        let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// List the image pool, failing when it is empty.
pub fn image_pool(dir: &Path) -> ReelResult<Vec<PathBuf>> {
    let images = list_assets(dir, IMAGE_EXTENSIONS)?;
    if images.is_empty() {
        return Err(ReelError::config(format!(
            "no images found in '{}'",
            dir.display()
        )));
    }
    Ok(images)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/pool.rs"]
mod tests;
