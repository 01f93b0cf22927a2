//! Shared row conversion helpers
//!
//! SQLite stores UUIDs as text, instants as unix seconds, and times of day
//! as `HH:MM` text. Conversion failures surface as database errors: they
//! indicate a corrupt row, not bad caller input.

use chrono::{DateTime, NaiveTime, Utc};
use helmdesk_domain::{HelmdeskError, TicketPriority};
use tokio::task;
use uuid::Uuid;

pub fn parse_uuid(value: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(value).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(err),
        )
    })
}

pub fn parse_opt_uuid(value: Option<String>) -> rusqlite::Result<Option<Uuid>> {
    value.as_deref().map(parse_uuid).transpose()
}

pub fn parse_priority(value: &str) -> rusqlite::Result<TicketPriority> {
    value.parse().map_err(|message: String| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            message.into(),
        )
    })
}

pub fn parse_time_hm(value: &str) -> rusqlite::Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(err),
        )
    })
}

pub fn datetime_from_ts(ts: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Integer,
            format!("timestamp out of range: {ts}").into(),
        )
    })
}

pub fn opt_datetime_from_ts(ts: Option<i64>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    ts.map(datetime_from_ts).transpose()
}

pub fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

pub fn int_to_bool(value: i64) -> bool {
    value != 0
}

pub fn map_join_error(err: task::JoinError) -> HelmdeskError {
    if err.is_cancelled() {
        HelmdeskError::Internal("blocking repository task cancelled".into())
    } else {
        HelmdeskError::Internal(format!("blocking repository task failed: {err}"))
    }
}
