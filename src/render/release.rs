use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};

/// A resource that holds memory or file handles backed by scratch files.
///
/// `release` must be idempotent; `is_released` is the acknowledgment checked before the
/// scratch directory is deleted.
pub trait Release {
    /// Human-readable name used in logs and reports.
    fn label(&self) -> String;
    /// Drop buffers and close handles.
    fn release(&mut self) -> ReelResult<()>;
    /// Whether every handle owned by this resource is closed.
    fn is_released(&self) -> bool;
}

/// One resource that failed to release.
#[derive(Debug)]
pub struct ReleaseFailure {
    /// Label of the resource.
    pub label: String,
    /// Why it failed.
    pub error: ReelError,
}

/// Outcome of a best-effort batch release.
#[derive(Debug, Default)]
pub struct ReleaseReport {
    /// Resources confirmed closed.
    pub released: usize,
    /// Resources that are still open.
    pub failures: Vec<ReleaseFailure>,
}

impl ReleaseReport {
    /// `true` when every resource acknowledged release.
    pub fn all_released(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: ReleaseReport) {
        self.released += other.released;
        self.failures.extend(other.failures);
    }
}

impl fmt::Display for ReleaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} released", self.released)?;
        if !self.failures.is_empty() {
            let labels: Vec<&str> = self.failures.iter().map(|x| x.label.as_str()).collect();
            write!(f, ", {} still open ({})", labels.len(), labels.join(", "))?;
        }
        Ok(())
    }
}

/// Release every resource, collecting failures instead of stopping at the first one.
pub fn release_all<'a, I>(resources: I) -> ReleaseReport
where
    I: IntoIterator<Item = &'a mut (dyn Release + 'a)>,
{
    let mut report = ReleaseReport::default();
    for res in resources {
        let label = res.label();
        let outcome = res.release().and_then(|()| {
            if res.is_released() {
                Ok(())
            } else {
                Err(ReelError::cleanup("release returned without closing all handles"))
            }
        });
        match outcome {
            Ok(()) => report.released += 1,
            Err(error) => {
                tracing::warn!(resource = %label, %error, "failed to release resource");
                report.failures.push(ReleaseFailure { label, error });
            }
        }
    }
    report
}

/// Files removed when the scratch directory was reclaimed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Regular files deleted.
    pub files_removed: usize,
    /// Total size of the deleted files in bytes.
    pub bytes_removed: u64,
}

impl fmt::Display for CleanupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} temp files ({:.1} MB freed)",
            self.files_removed,
            self.bytes_removed as f64 / 1024.0 / 1024.0
        )
    }
}

/// Process-wide scratch directory for one reel run.
///
/// Creation wipes any previous contents. Deletion goes through [`Scratch::reclaim`], which
/// requires a release report proving every handle into the directory is closed.
#[derive(Debug)]
pub struct Scratch {
    dir: PathBuf,
}

impl Scratch {
    /// Wipe and recreate `dir`.
    pub fn create(dir: impl Into<PathBuf>) -> ReelResult<Self> {
        let dir = dir.into();
        if dir.exists() {
            std::fs::remove_dir_all(&dir)
                .with_context(|| format!("wipe scratch directory '{}'", dir.display()))?;
        }
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create scratch directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Scratch directory path.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Path of a named file inside the scratch directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Delete the scratch directory once `released` confirms every handle is closed.
    ///
    /// With outstanding handles the directory is left in place and a cleanup error is returned.
    pub fn reclaim(self, released: &ReleaseReport) -> ReelResult<CleanupReport> {
        if !released.all_released() {
            return Err(ReelError::cleanup(format!(
                "scratch '{}' kept: {released}",
                self.dir.display()
            )));
        }

        let mut report = CleanupReport::default();
        tally_files(&self.dir, &mut report)?;
        std::fs::remove_dir_all(&self.dir).map_err(|e| {
            ReelError::cleanup(format!(
                "could not delete scratch '{}': {e}",
                self.dir.display()
            ))
        })?;
        tracing::info!(%report, "scratch directory removed");
        Ok(report)
    }
}

fn tally_files(dir: &Path, report: &mut CleanupReport) -> ReelResult<()> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| ReelError::cleanup(format!("read '{}': {e}", dir.display())))?;
    for entry in entries {
        let entry = entry.map_err(|e| ReelError::cleanup(e.to_string()))?;
        let meta = entry
            .metadata()
            .map_err(|e| ReelError::cleanup(e.to_string()))?;
        if meta.is_dir() {
            tally_files(&entry.path(), report)?;
        } else if meta.is_file() {
            report.files_removed += 1;
            report.bytes_removed += meta.len();
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/release.rs"]
mod tests;
