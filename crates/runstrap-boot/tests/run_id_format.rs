use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use proptest::prelude::*;
use runstrap_boot::clock::{iso_timestamp, run_id, RUN_ID_FORMAT};

proptest! {
    #[test]
    fn run_id_and_started_at_agree(
        secs in 0i64..253_402_300_799i64,
        nanos in 0u32..1_000_000_000u32,
        tag in "[a-z][a-z0-9_-]{0,15}",
    ) {
        let instant = Utc.timestamp_opt(secs, nanos).single().expect("valid instant");
        let id = run_id(instant, &tag);
        let (prefix, suffix) = id.split_at(16);
        prop_assert_eq!(&suffix[1..], tag.as_str());
        prop_assert!(suffix.starts_with('_'));

        let from_id = NaiveDateTime::parse_from_str(prefix, RUN_ID_FORMAT)
            .expect("prefix parses")
            .and_utc()
            .timestamp();
        let started = DateTime::parse_from_rfc3339(&iso_timestamp(instant))
            .expect("rfc3339")
            .timestamp();
        prop_assert_eq!(from_id, secs);
        prop_assert_eq!(started, secs);
    }
}
