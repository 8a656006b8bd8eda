//! Second-precision UTC timestamps and run identifiers.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// `strftime` pattern of the run id prefix.
pub const RUN_ID_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Current UTC time truncated to whole seconds.
pub fn utc_now_secs() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// ISO-8601 rendering used for `started_at`, e.g. `2026-10-19T08:15:02+00:00`.
pub fn iso_timestamp(instant: DateTime<Utc>) -> String {
    instant
        .trunc_subsecs(0)
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Builds `<YYYYMMDDTHHMMSSZ>_<run_tag>`.
pub fn run_id(instant: DateTime<Utc>, run_tag: &str) -> String {
    format!("{}_{}", instant.format(RUN_ID_FORMAT), run_tag)
}
