//! Frame rendering driver and resource release.

/// Release acknowledgment and scratch reclamation.
pub mod release;

use rayon::prelude::*;

use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::Timeline;

const MAX_CHUNK_BYTES: u64 = 128 * 1024 * 1024;

/// Options for [`render_timeline`].
#[derive(Clone, Debug)]
pub struct RenderOpts {
    /// Rayon worker threads rendering frames.
    pub workers: usize,
    /// Frames rendered per parallel batch, further capped by memory.
    pub chunk_size: usize,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            workers: 4,
            chunk_size: 32,
        }
    }
}

/// Counters from one render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Parallel batches rendered.
    pub chunks: u64,
}

/// Render every timeline frame and stream it to `sink` in order.
///
/// Frames are rendered in chunks on a dedicated pool of `opts.workers` threads; each chunk is
/// pushed in frame order before the next one starts.
#[tracing::instrument(skip_all, fields(frames = timeline.duration_frames(), workers = opts.workers))]
pub fn render_timeline(
    timeline: &Timeline,
    audio: Option<AudioInputConfig>,
    sink: &mut dyn FrameSink,
    opts: &RenderOpts,
) -> ReelResult<RenderStats> {
    let total = timeline.duration_frames();
    if total == 0 {
        return Err(ReelError::render("timeline is empty"));
    }

    let pool = build_thread_pool(opts.workers)?;
    let canvas = timeline.canvas();
    let max_by_mem = (MAX_CHUNK_BYTES / (canvas.rgb24_len() as u64).max(1)).max(1);
    let chunk_size = (opts.chunk_size.max(1) as u64).min(max_by_mem).min(total);

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps: timeline.fps(),
        audio,
    })?;

    let mut stats = RenderStats::default();
    let mut chunk_start = 0u64;
    while chunk_start < total {
        let chunk_end = (chunk_start + chunk_size).min(total);
        let frames = pool.install(|| {
            (chunk_start..chunk_end)
                .into_par_iter()
                .map(|f| timeline.render_frame(FrameIndex(f)))
                .collect::<ReelResult<Vec<_>>>()
        })?;
        for (f, frame) in (chunk_start..chunk_end).zip(frames.iter()) {
            sink.push_frame(FrameIndex(f), frame)?;
        }
        stats.frames_total += chunk_end - chunk_start;
        stats.chunks += 1;
        chunk_start = chunk_end;
    }

    sink.end()?;
    tracing::info!(frames = stats.frames_total, chunks = stats.chunks, "render finished");
    Ok(stats)
}

fn build_thread_pool(workers: usize) -> ReelResult<rayon::ThreadPool> {
    if workers == 0 {
        return Err(ReelError::config("render workers must be >= 1"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| ReelError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/render.rs"]
mod tests;
