//! Run bootstrapping: configuration, provenance, run directory, database.

pub mod clock;
mod config;
mod db;
mod hash;
mod rundir;
pub mod vcs;

use std::env;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use runstrap_core::errors::{ErrorInfo, RunError};
use runstrap_core::RunMeta;
use tracing::{debug, info};

pub use config::{from_document, load_config, LoadedConfig, RunConfig};
pub use db::init_db;
pub use hash::sha256_file;
pub use rundir::{create_run_dir, run_dir_path, write_meta, write_snapshot};
pub use vcs::{CommitSource, FixedCommit, GitCli};

/// Schema script location relative to the project root.
pub const DEFAULT_SCHEMA_PATH: &str = "sql/schema.sql";

/// Inputs of a single bootstrap.
#[derive(Debug, Clone)]
pub struct BootstrapRequest {
    /// Configuration file as given on the command line.
    pub config_path: PathBuf,
    /// Root against which `paths.*` and the default schema are resolved.
    pub root: PathBuf,
    /// Schema script; `<root>/sql/schema.sql` when unset.
    pub schema_path: Option<PathBuf>,
    /// Start instant, used for both the run id and `started_at`.
    pub started: DateTime<Utc>,
}

impl BootstrapRequest {
    pub fn new(config_path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            root: root.into(),
            schema_path: None,
            started: clock::utc_now_secs(),
        }
    }

    pub fn with_schema(mut self, schema_path: impl Into<PathBuf>) -> Self {
        self.schema_path = Some(schema_path.into());
        self
    }

    pub fn started_at(mut self, started: DateTime<Utc>) -> Self {
        self.started = started;
        self
    }
}

/// What a successful bootstrap produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub run_dir: PathBuf,
    pub db_path: PathBuf,
    pub meta: RunMeta,
}

/// Performs a full bootstrap.
///
/// Configuration and provenance are resolved before anything is written, so
/// a bad config leaves no trace on disk. Once the run directory exists there
/// is no rollback: a later database failure leaves the directory and its
/// metadata in place.
pub fn bootstrap(
    request: &BootstrapRequest,
    commits: &dyn CommitSource,
) -> Result<BootstrapReport, RunError> {
    let config_path = fs::canonicalize(&request.config_path).map_err(|err| {
        RunError::Config(
            ErrorInfo::new("config-read", "failed to resolve configuration path")
                .with_context("path", request.config_path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    let root = fs::canonicalize(&request.root).map_err(|err| {
        RunError::Io(
            ErrorInfo::new("root-resolve", "failed to resolve project root")
                .with_context("path", request.root.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    let loaded = load_config(&config_path)?;
    let outputs_dir = root.join(&loaded.config.outputs_dir);
    let db_path = root.join(&loaded.config.db_path);
    let schema_path = request
        .schema_path
        .clone()
        .unwrap_or_else(|| root.join(DEFAULT_SCHEMA_PATH));

    let run_id = clock::run_id(request.started, &loaded.config.run_tag);
    let meta = RunMeta {
        run_id: run_id.clone(),
        started_at: clock::iso_timestamp(request.started),
        git_commit: commits.head_commit(),
        config_path: config_path.display().to_string(),
        config_sha256: sha256_file(&config_path)?,
        executable: current_exe()?,
        cwd: current_dir()?,
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    };
    debug!(
        run_id = %meta.run_id,
        config_sha256 = %meta.config_sha256,
        git_commit = meta.git_commit.as_deref().unwrap_or("none"),
        "provenance resolved"
    );

    let run_dir = create_run_dir(&outputs_dir, &run_id)?;
    write_meta(&run_dir, &meta)?;
    write_snapshot(&run_dir, &loaded.document)?;
    info!(run_id = %run_id, path = %run_dir.display(), "run directory created");

    init_db(&db_path, &schema_path)?;
    info!(path = %db_path.display(), "database initialized");

    Ok(BootstrapReport {
        run_dir,
        db_path,
        meta,
    })
}

fn current_exe() -> Result<String, RunError> {
    env::current_exe()
        .map(|path| path.display().to_string())
        .map_err(|err| process_error("exe-read", "failed to resolve executable path", err))
}

fn current_dir() -> Result<String, RunError> {
    env::current_dir()
        .map(|path| path.display().to_string())
        .map_err(|err| process_error("cwd-read", "failed to resolve working directory", err))
}

fn process_error(code: &str, message: &str, err: std::io::Error) -> RunError {
    RunError::Io(ErrorInfo::new(code, message).with_hint(err.to_string()))
}
