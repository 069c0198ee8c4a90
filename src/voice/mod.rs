//! Speech synthesis and deep-voice post-processing.

/// Pitch, band-limit, normalize and compress.
pub mod post;
/// Speech backends and the synthesize-then-deepen flow.
pub mod synth;
