#![deny(missing_docs)]
#![doc = "Shared error and provenance types for runstrap."]

pub mod errors;
pub mod provenance;

pub use errors::{ErrorInfo, RunError};
pub use provenance::{RunMeta, CONFIG_SNAPSHOT_FILE, RUN_META_FILE};
