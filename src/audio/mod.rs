//! Voice and music mixing aligned to the video duration.

/// Track combination: trim, loop, duck and sum.
pub mod mix;
