//! Per-image visual effects: color grading, cover cropping and Ken Burns motion.

/// Cover scaling, center cropping and canvas composition.
pub mod fit;
/// Fixed color-grading filters.
pub mod filter;
/// Ken Burns zoom.
pub mod motion;
