use std::fs;
use std::path::{Path, PathBuf};

use runstrap_core::errors::{ErrorInfo, RunError};
use serde_yaml::Value;

/// Typed view of the keys the bootstrapper needs from a run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// `paths.outputs_dir`, relative to the project root unless absolute.
    pub outputs_dir: PathBuf,
    /// `paths.db_path`, relative to the project root unless absolute.
    pub db_path: PathBuf,
    /// `project.run_tag`.
    pub run_tag: String,
}

/// A configuration document together with its typed view.
///
/// `document` keeps the mapping exactly as loaded (key order included) so it
/// can be snapshotted into the run directory.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub document: Value,
    pub config: RunConfig,
}

/// Reads and parses a YAML configuration file.
pub fn load_config(path: &Path) -> Result<LoadedConfig, RunError> {
    let contents = fs::read_to_string(path).map_err(|err| {
        RunError::Config(
            ErrorInfo::new("config-read", "failed to read configuration file")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    let document: Value = serde_yaml::from_str(&contents).map_err(|err| {
        RunError::Config(
            ErrorInfo::new("config-parse", "failed to parse configuration file")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    from_document(document)
}

/// Extracts the typed view from an already parsed document.
pub fn from_document(document: Value) -> Result<LoadedConfig, RunError> {
    let outputs_dir = PathBuf::from(require_str(&document, "paths.outputs_dir")?);
    let db_path = PathBuf::from(require_str(&document, "paths.db_path")?);
    let run_tag = require_str(&document, "project.run_tag")?;
    let config = RunConfig {
        outputs_dir,
        db_path,
        run_tag: run_tag.to_string(),
    };
    Ok(LoadedConfig { document, config })
}

fn lookup<'a>(document: &'a Value, dotted: &str) -> Result<&'a Value, RunError> {
    let mut current = document;
    for segment in dotted.split('.') {
        current = current.get(segment).ok_or_else(|| {
            RunError::Config(
                ErrorInfo::new("config-missing-key", "required configuration key is absent")
                    .with_context("key", dotted),
            )
        })?;
    }
    Ok(current)
}

fn require_str<'a>(document: &'a Value, dotted: &str) -> Result<&'a str, RunError> {
    lookup(document, dotted)?.as_str().ok_or_else(|| {
        RunError::Config(
            ErrorInfo::new("config-invalid", "configuration key must be a string")
                .with_context("key", dotted),
        )
    })
}
