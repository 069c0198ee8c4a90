use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;


/// Why an upload was refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadFailure {
    /// The login session expired or is missing.
    SessionExpired,
    /// The platform wants an interactive verification.
    ChallengeRequired,
    /// Posting too fast or flagged as spam.
    RateLimited,
    /// Anything else, with the service's message.
    Other(String),
}

impl UploadFailure {
    /// Operator hint for this failure.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::SessionExpired => "session expired; refresh the session id",
            Self::ChallengeRequired => "complete the verification in the app",
            Self::RateLimited => "wait 1-2 hours before posting again",
            Self::Other(_) => "check the uploader output",
        }
    }
}

impl fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionExpired => f.write_str("session expired"),
            Self::ChallengeRequired => f.write_str("challenge required"),
            Self::RateLimited => f.write_str("rate limited"),
            Self::Other(msg) => write!(f, "upload failed: {msg}"),
        }
    }
}

/// Result of handing a reel to the upload service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Posted; the service returned a media code.
    Posted {
        /// Platform media code.
        media_code: String,
    },
    /// The service failed after the upload was most likely accepted.
    ProbablyPosted {
        /// Error text that was downgraded.
        reason: String,
    },
    /// The upload did not happen.
    Failed(UploadFailure),
}

/// Map an upload error message to an outcome.
///
/// Response parse/validation errors arrive after the media was accepted and count as
/// probable success.
pub fn classify_upload_error(message: &str) -> UploadOutcome {
    let lower = message.to_lowercase();
    if lower.contains("pydantic") || lower.contains("validation") {
        return UploadOutcome::ProbablyPosted {
            reason: message.trim().to_string(),
        };
    }
    let failure = if lower.contains("login_required") {
        UploadFailure::SessionExpired
    } else if lower.contains("challenge") {
        UploadFailure::ChallengeRequired
    } else if lower.contains("spam") || lower.contains("limit") {
        UploadFailure::RateLimited
    } else {
        UploadFailure::Other(message.trim().to_string())
    };
    UploadOutcome::Failed(failure)
}

/// A service that publishes a rendered reel.
pub trait ReelUploader {
    /// Upload `video` with `caption` and an optional cover image.
    fn upload(&self, video: &Path, caption: &str, thumbnail: Option<&Path>) -> UploadOutcome;
}

/// Uploader backed by an external program.
///
/// Invoked as `PROGRAM <video> --caption <text> [--thumbnail <jpg>]`; on success stdout holds
/// the media code, on failure stderr holds the error text.
#[derive(Clone, Debug)]
pub struct CommandUploader {
    program: PathBuf,
}

impl CommandUploader {
    /// Uploader running `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments for one upload.
    pub fn args(video: &Path, caption: &str, thumbnail: Option<&Path>) -> Vec<String> {
        let mut args = vec![
            video.to_string_lossy().into_owned(),
            "--caption".to_string(),
            caption.to_string(),
        ];
        if let Some(t) = thumbnail {
            args.push("--thumbnail".to_string());
            args.push(t.to_string_lossy().into_owned());
        }
        args
    }
}

impl ReelUploader for CommandUploader {
    fn upload(&self, video: &Path, caption: &str, thumbnail: Option<&Path>) -> UploadOutcome {
        let out = match Command::new(&self.program)
            .args(Self::args(video, caption, thumbnail))
            .output()
        {
            Ok(out) => out,
            Err(e) => {
                return UploadOutcome::Failed(UploadFailure::Other(format!(
                    "failed to run '{}': {e}",
                    self.program.display()
                )));
            }
        };
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            let stdout = String::from_utf8_lossy(&out.stdout);
            let msg = if stderr.trim().is_empty() {
                stdout
            } else {
                stderr
            };
            return classify_upload_error(&msg);
        }
        let code = String::from_utf8_lossy(&out.stdout)
            .lines()
            .map(str::trim)
            .rfind(|l| !l.is_empty())
            .map(str::to_string);
        match code {
            Some(media_code) => UploadOutcome::Posted { media_code },
            None => UploadOutcome::ProbablyPosted {
                reason: "uploader returned no media code".to_string(),
            },
        }
    }
}

/// Upload and log the outcome.
///
/// Failures come back as [`UploadOutcome::Failed`] with their category intact so the caller
/// can decide between retrying later, refreshing the session or giving up.
#[tracing::instrument(skip_all, fields(video = %video.display()))]
pub fn publish(
    uploader: &dyn ReelUploader,
    video: &Path,
    caption: &str,
    thumbnail: Option<&Path>,
) -> UploadOutcome {
    let outcome = uploader.upload(video, caption, thumbnail);
    match &outcome {
        UploadOutcome::Posted { media_code } => {
            tracing::info!(%media_code, "reel posted");
        }
        UploadOutcome::ProbablyPosted { reason } => {
            tracing::warn!(%reason, "upload reported an error after acceptance; reel likely posted");
        }
        UploadOutcome::Failed(failure) => {
            tracing::error!(%failure, hint = failure.hint(), "upload failed");
        }
    }
    outcome
}

#[cfg(test)]
#[path = "../../tests/unit/collab/upload.rs"]
mod tests;
