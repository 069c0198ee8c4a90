//! Boundaries to the content generator and the upload service.

/// Validated generator responses.
pub mod content;
/// Upload outcomes and the external uploader.
pub mod upload;
