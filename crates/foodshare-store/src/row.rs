//! Column decoding helpers shared by the row mappers.

use chrono::{DateTime, SecondsFormat, Utc};
use foodshare_shared::{GeoPoint, Role, UserId};
use rusqlite::types::Type;
use uuid::Uuid;

/// Timestamps are stored as fixed-width RFC-3339 so text order is time order.
pub(crate) fn ts(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

pub(crate) fn uuid_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let s: String = row.get(idx)?;
    Uuid::parse_str(&s).map_err(|e| conversion(idx, e))
}

pub(crate) fn ts_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion(idx, e))
}

pub(crate) fn opt_ts_at(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let s: Option<String> = row.get(idx)?;
    s.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| conversion(idx, e))
    })
    .transpose()
}

pub(crate) fn user_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<UserId> {
    row.get::<_, String>(idx).map(UserId)
}

pub(crate) fn opt_user_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<UserId>> {
    row.get::<_, Option<String>>(idx).map(|o| o.map(UserId))
}

pub(crate) fn role_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Role> {
    let s: String = row.get(idx)?;
    s.parse().map_err(|e| conversion(idx, e))
}

/// Read a nullable (latitude, longitude) column pair starting at `idx`.
pub(crate) fn point_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<GeoPoint>> {
    let lat: Option<f64> = row.get(idx)?;
    let lon: Option<f64> = row.get(idx + 1)?;
    match (lat, lon) {
        (Some(lat), Some(lon)) => GeoPoint::new(lat, lon)
            .map(Some)
            .map_err(|e| conversion(idx, e)),
        _ => Ok(None),
    }
}
