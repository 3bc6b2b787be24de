//! Diesel and pool failure classification shared by every adapter.
//!
//! Each port error enum has `connection`, `query`, and `timeout`
//! constructors; adapters pass those in and get a port error back. Raw
//! database messages are logged at `debug` and never copied into the
//! returned error.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse class of a Diesel failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection,
    /// A foreign key pointed at a missing row.
    MissingReference,
    /// Serialization failure or deadlock; the transaction may be replayed.
    Contention,
    /// Anything else.
    Query,
}

pub(crate) fn classify(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            match kind {
                DatabaseErrorKind::ClosedConnection => DieselFailure::Connection,
                DatabaseErrorKind::ForeignKeyViolation => DieselFailure::MissingReference,
                DatabaseErrorKind::SerializationFailure => DieselFailure::Contention,
                _ => DieselFailure::Query,
            }
        }
        other => {
            debug!(error = %other, "diesel operation failed");
            DieselFailure::Query
        }
    }
}

/// Map a pool failure with the port's connection constructor. Checkout
/// timeouts surface as `timeout` so callers retry them.
pub(crate) fn map_pool_error<E>(
    error: PoolError,
    connection: impl FnOnce(String) -> E,
    timeout: impl FnOnce(String) -> E,
) -> E {
    match error {
        PoolError::Checkout { message } => timeout(message),
        PoolError::Build { message } => connection(message),
    }
}

/// Map a Diesel failure that carries no port-specific meaning.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match classify(&error) {
        DieselFailure::Connection => connection("database connection lost"),
        DieselFailure::Contention => connection("transaction conflicted with a concurrent write"),
        DieselFailure::MissingReference => query("referenced row does not exist"),
        DieselFailure::Query => query("database error"),
    }
}

/// Convert a non-negative stored counter, clamping corrupt negatives to zero.
pub(crate) fn to_unsigned(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

/// Convert a domain counter for storage, saturating at the column maximum.
pub(crate) fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

pub(crate) fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub(crate) fn count_to_u32(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(if value < 0 { 0 } else { u32::MAX })
}
