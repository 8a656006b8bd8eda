//! Best-effort version-control lookup.
//!
//! This is the only step of a bootstrap allowed to fail quietly: every error
//! collapses to `None` and the run carries on.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

/// Anything that can report the commit a run was produced from.
pub trait CommitSource {
    /// Returns the current commit hash, or `None` when it cannot be determined.
    fn head_commit(&self) -> Option<String>;
}

/// Asks the `git` executable for `HEAD` inside a working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

impl CommitSource for GitCli {
    fn head_commit(&self) -> Option<String> {
        let output = match Command::new("git")
            .args(["rev-parse", "HEAD"])
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(err) => {
                debug!(error = %err, "git unavailable, recording no commit");
                return None;
            }
        };
        if !output.status.success() {
            debug!(
                status = %output.status,
                workdir = %self.workdir.display(),
                "git rev-parse HEAD failed, recording no commit"
            );
            return None;
        }
        let commit = String::from_utf8(output.stdout).ok()?.trim().to_string();
        if commit.is_empty() {
            None
        } else {
            Some(commit)
        }
    }
}

/// A source with a predetermined answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedCommit(pub Option<String>);

impl CommitSource for FixedCommit {
    fn head_commit(&self) -> Option<String> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_without_repository_yields_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(GitCli::new(dir.path()).head_commit(), None);
    }

    #[test]
    fn missing_workdir_yields_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let gone = dir.path().join("does-not-exist");
        assert_eq!(GitCli::new(gone).head_commit(), None);
    }

    #[test]
    fn fixed_source_reports_its_value() {
        let source = FixedCommit(Some("0123abcd".into()));
        assert_eq!(source.head_commit().as_deref(), Some("0123abcd"));
        assert_eq!(FixedCommit::default().head_commit(), None);
    }
}
