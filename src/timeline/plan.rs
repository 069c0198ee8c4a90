use std::ops::RangeInclusive;
use std::path::PathBuf;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::ReelFormat;
use crate::effects::filter::FilterKind;
use crate::effects::motion::KenBurns;
use crate::foundation::error::{ReelError, ReelResult};

/// Image count drawn when the caller does not ask for one.
pub const DEFAULT_IMAGE_COUNT: RangeInclusive<usize> = 6..=7;

/// Caller choices for timeline assembly; `None` fields are drawn at random.
#[derive(Clone, Debug, Default)]
pub struct AssemblyOptions {
    /// Number of images to use, clamped to the pool size.
    pub image_count: Option<usize>,
    /// Color grade applied to every image.
    pub filter: Option<FilterKind>,
    /// Insert transition clips between images.
    pub use_transitions: bool,
}

/// One planned clip.
#[derive(Clone, Debug, PartialEq)]
pub enum PlanEntry {
    /// A still image with its zoom.
    Image {
        /// Source image.
        path: PathBuf,
        /// Zoom applied over the clip.
        motion: KenBurns,
    },
    /// A transition clip.
    Transition {
        /// Source clip.
        path: PathBuf,
    },
}

/// Every random decision of a reel, made up front so assembly is deterministic.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelinePlan {
    /// Color grade for all images.
    pub filter: FilterKind,
    /// Clips in playback order.
    pub entries: Vec<PlanEntry>,
}

impl TimelinePlan {
    /// Number of image entries.
    pub fn image_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, PlanEntry::Image { .. }))
            .count()
    }

    /// Number of transition entries.
    pub fn transition_count(&self) -> usize {
        self.entries.len() - self.image_count()
    }

    /// Expected length in frames if every transition loads.
    pub fn duration_frames(&self, format: &ReelFormat) -> u64 {
        self.image_count() as u64 * format.image_frames()
            + self.transition_count() as u64 * format.transition_frames()
    }
}

/// Resolve the image count: the request (or a draw from 6..=7) clamped to the pool size.
pub fn choose_image_count(requested: Option<usize>, pool_len: usize, rng: &mut impl Rng) -> usize {
    let n = requested.unwrap_or_else(|| rng.gen_range(DEFAULT_IMAGE_COUNT));
    n.min(pool_len)
}

/// Sample `n` images without replacement, in random order.
pub fn select_images(pool: &[PathBuf], n: usize, rng: &mut impl Rng) -> Vec<PathBuf> {
    let mut picked = pool.to_vec();
    picked.shuffle(rng);
    picked.truncate(n.min(pool.len()));
    picked
}

/// Make every random choice for a reel.
///
/// Fails with a configuration error on an empty image pool, before anything touches disk.
pub fn plan_timeline(
    images: &[PathBuf],
    transitions: &[PathBuf],
    opts: &AssemblyOptions,
    rng: &mut impl Rng,
) -> ReelResult<TimelinePlan> {
    if images.is_empty() {
        return Err(ReelError::config("image pool is empty"));
    }

    let n = choose_image_count(opts.image_count, images.len(), rng);
    if n == 0 {
        return Err(ReelError::config("image count must be at least 1"));
    }
    let selected = select_images(images, n, rng);
    let filter = match opts.filter {
        Some(f) => f,
        None => *FilterKind::ALL
            .choose(rng)
            .ok_or_else(|| ReelError::config("no filters available"))?,
    };

    let use_transitions = opts.use_transitions && !transitions.is_empty();
    let mut entries = Vec::with_capacity(n * 2);
    for (i, path) in selected.into_iter().enumerate() {
        if i > 0 && use_transitions {
            if let Some(t) = transitions.choose(rng) {
                entries.push(PlanEntry::Transition { path: t.clone() });
            }
        }
        entries.push(PlanEntry::Image {
            path,
            motion: KenBurns::random(rng),
        });
    }

    tracing::info!(
        images = n,
        pool = images.len(),
        %filter,
        transitions = entries.len() - n,
        "timeline planned"
    );
    Ok(TimelinePlan { filter, entries })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/plan.rs"]
mod tests;
