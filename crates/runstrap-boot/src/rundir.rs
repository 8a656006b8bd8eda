use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use runstrap_core::errors::{ErrorInfo, RunError};
use runstrap_core::{RunMeta, CONFIG_SNAPSHOT_FILE, RUN_META_FILE};
use serde_yaml::Value;

/// `<outputs_dir>/run_<run_id>`.
pub fn run_dir_path(outputs_dir: &Path, run_id: &str) -> PathBuf {
    outputs_dir.join(format!("run_{run_id}"))
}

/// Creates the run directory, refusing to reuse an existing one.
///
/// `outputs_dir` and its parents are created as needed; only the final
/// `run_<run_id>` component must be new.
pub fn create_run_dir(outputs_dir: &Path, run_id: &str) -> Result<PathBuf, RunError> {
    fs::create_dir_all(outputs_dir).map_err(|err| {
        RunError::Io(
            ErrorInfo::new("run-dir-create", "failed to create outputs directory")
                .with_context("path", outputs_dir.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    let run_dir = run_dir_path(outputs_dir, run_id);
    fs::create_dir(&run_dir).map_err(|err| {
        let info = if err.kind() == ErrorKind::AlreadyExists {
            ErrorInfo::new("run-dir-exists", "run directory already exists")
        } else {
            ErrorInfo::new("run-dir-create", "failed to create run directory")
        };
        RunError::Io(
            info.with_context("path", run_dir.display().to_string())
                .with_context("run_id", run_id)
                .with_hint(err.to_string()),
        )
    })?;
    Ok(run_dir)
}

/// Writes `run_meta.json` as two-space indented JSON.
pub fn write_meta(run_dir: &Path, meta: &RunMeta) -> Result<PathBuf, RunError> {
    let path = run_dir.join(RUN_META_FILE);
    let json = serde_json::to_string_pretty(meta).map_err(|err| {
        RunError::Serde(
            ErrorInfo::new("meta-serialize", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    fs::write(&path, json).map_err(|err| {
        RunError::Io(
            ErrorInfo::new("meta-write", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    Ok(path)
}

/// Writes `config_snapshot.yaml` from the document as loaded.
pub fn write_snapshot(run_dir: &Path, document: &Value) -> Result<PathBuf, RunError> {
    let path = run_dir.join(CONFIG_SNAPSHOT_FILE);
    let yaml = serde_yaml::to_string(document).map_err(|err| {
        RunError::Serde(
            ErrorInfo::new("snapshot-serialize", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    fs::write(&path, yaml).map_err(|err| {
        RunError::Io(
            ErrorInfo::new("snapshot-write", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    Ok(path)
}
