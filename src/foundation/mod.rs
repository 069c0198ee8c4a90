//! Shared primitives: frame/time units and the error taxonomy.

/// Frame, rate and canvas primitives.
pub mod core;
/// Error taxonomy and result alias.
pub mod error;
