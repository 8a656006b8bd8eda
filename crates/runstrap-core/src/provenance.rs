//! Provenance record written alongside every run.

use serde::{Deserialize, Serialize};

/// File name of the metadata document inside a run directory.
pub const RUN_META_FILE: &str = "run_meta.json";

/// File name of the configuration snapshot inside a run directory.
pub const CONFIG_SNAPSHOT_FILE: &str = "config_snapshot.yaml";

/// Facts establishing what produced a given run.
///
/// Field order is the serialized order of `run_meta.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMeta {
    /// `<YYYYMMDDTHHMMSSZ>_<run_tag>`.
    pub run_id: String,
    /// ISO-8601 UTC start time, second precision.
    pub started_at: String,
    /// `HEAD` commit of the project root, when one could be read.
    pub git_commit: Option<String>,
    /// Canonicalized path of the configuration file.
    pub config_path: String,
    /// Lowercase hex SHA-256 of the configuration file bytes.
    pub config_sha256: String,
    /// Path of the executable that performed the bootstrap.
    ///
    /// Written under the `python_executable` key that downstream readers of
    /// `run_meta.json` already look up.
    #[serde(rename = "python_executable")]
    pub executable: String,
    /// Working directory of the bootstrapping process.
    pub cwd: String,
    /// Version of the bootstrapper. Not part of the seven-field record older
    /// runs carry, hence optional when reading.
    #[serde(default)]
    pub tool_version: String,
}
