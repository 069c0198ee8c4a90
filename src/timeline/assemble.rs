use std::path::Path;

use image::imageops::FilterType;
use rayon::prelude::*;

use crate::assets::media::{save_jpeg, transcode_raw_frames};
use crate::config::ReelFormat;
use crate::effects::filter::{FilterKind, filter_image_file};
use crate::effects::fit::cover_crop;
use crate::effects::motion::KenBurns;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::release::Scratch;
use crate::timeline::Timeline;
use crate::timeline::clip::Clip;
use crate::timeline::plan::{PlanEntry, TimelinePlan};

/// JPEG quality of filtered intermediates and thumbnails.
pub const JPEG_QUALITY: u8 = 95;

enum Prepared {
    Still(Clip),
    Transition(Clip),
    Skipped,
}

/// Turn a plan into clips backed by files in `scratch`.
///
/// Images are graded with the plan's filter, saved as `filtered_NNN.jpg`, reloaded and
/// cover-cropped to the canvas. Transitions are transcoded to `transition_NNN.rgb`; one that
/// fails to load is logged and left out. A failing image aborts assembly.
#[tracing::instrument(skip_all, fields(entries = plan.entries.len(), filter = %plan.filter))]
pub fn assemble_timeline(
    plan: &TimelinePlan,
    format: &ReelFormat,
    scratch: &Scratch,
) -> ReelResult<Timeline> {
    let image_frames = format.image_frames();
    let transition_frames = format.transition_frames();

    let mut image_no = 0usize;
    let mut transition_no = 0usize;
    let jobs: Vec<(usize, &PlanEntry)> = plan
        .entries
        .iter()
        .map(|entry| match entry {
            PlanEntry::Image { .. } => {
                image_no += 1;
                (image_no - 1, entry)
            }
            PlanEntry::Transition { .. } => {
                transition_no += 1;
                (transition_no - 1, entry)
            }
        })
        .collect();

    let prepared: Vec<ReelResult<Prepared>> = jobs
        .par_iter()
        .map(|&(n, entry)| match entry {
            PlanEntry::Image { path, motion } => prepare_still(
                path,
                *motion,
                plan.filter,
                &scratch.file(&format!("filtered_{n:03}.jpg")),
                format,
                image_frames,
            )
            .map(Prepared::Still),
            PlanEntry::Transition { path } => {
                let raw = scratch.file(&format!("transition_{n:03}.rgb"));
                match prepare_transition(path, &raw, format, transition_frames) {
                    Ok(clip) => Ok(Prepared::Transition(clip)),
                    Err(error) => {
                        tracing::warn!(transition = %path.display(), %error, "skipping transition");
                        Ok(Prepared::Skipped)
                    }
                }
            }
        })
        .collect();

    let mut timeline = Timeline::new(format.canvas, format.fps);
    for item in prepared {
        match item? {
            Prepared::Still(clip) | Prepared::Transition(clip) => timeline.push(clip),
            Prepared::Skipped => {}
        }
    }
    if timeline.image_count() == 0 {
        return Err(ReelError::config("timeline has no images"));
    }

    tracing::info!(
        images = timeline.image_count(),
        transitions = timeline.transition_count(),
        secs = timeline.duration_secs(),
        "timeline assembled"
    );
    Ok(timeline)
}

fn prepare_still(
    source: &Path,
    motion: KenBurns,
    filter: FilterKind,
    filtered_path: &Path,
    format: &ReelFormat,
    duration_frames: u64,
) -> ReelResult<Clip> {
    let graded = filter_image_file(source, filter)?;
    save_jpeg(&graded, filtered_path, JPEG_QUALITY)?;
    drop(graded);

    let reloaded = image::open(filtered_path)
        .map_err(|e| {
            ReelError::media(format!(
                "failed to reload '{}': {e}",
                filtered_path.display()
            ))
        })?
        .to_rgb8();
    let frame = cover_crop(&reloaded, format.canvas, FilterType::Lanczos3);
    tracing::debug!(source = %source.display(), zoom = motion.zoom_ratio, "image clip ready");
    Ok(Clip::still(
        source,
        filtered_path,
        frame,
        motion,
        duration_frames,
    ))
}

fn prepare_transition(
    source: &Path,
    raw_path: &Path,
    format: &ReelFormat,
    duration_frames: u64,
) -> ReelResult<Clip> {
    let frames = transcode_raw_frames(
        source,
        raw_path,
        format.canvas,
        format.fps,
        format.transition_secs,
    )?;
    tracing::debug!(source = %source.display(), frames, "transition clip ready");
    Clip::transition(source, raw_path, format.canvas, duration_frames)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/assemble.rs"]
mod tests;
