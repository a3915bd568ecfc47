//! Shared error mapping for the Diesel repositories.
//!
//! Each repository passes its own port error constructors so the mapping
//! rules live in one place.

use tracing::{debug, warn};

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Constructors of one repository's error enum.
pub(crate) struct ErrorKinds<E> {
    pub query: fn(String) -> E,
    pub connection: fn(String) -> E,
    /// `None` for repositories whose writes cannot violate a foreign key.
    pub reference: Option<fn(String) -> E>,
}

/// Map a Diesel error using the given constructors.
///
/// Foreign-key violations become `reference` errors carrying the constraint
/// name so callers can tell the client which field was wrong.
pub(crate) fn map_diesel_error<E>(error: diesel::result::Error, kinds: &ErrorKinds<E>) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => (kinds.query)("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => (kinds.query)("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            (kinds.connection)("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            let constraint = info
                .constraint_name()
                .unwrap_or("unknown constraint")
                .to_owned();
            match kinds.reference {
                Some(reference) => reference(constraint),
                None => {
                    warn!(constraint, "unexpected foreign key violation");
                    (kinds.query)("foreign key violation".to_owned())
                }
            }
        }
        DieselError::DatabaseError(_, _) => (kinds.query)("database error".to_owned()),
        _ => (kinds.query)("database error".to_owned()),
    }
}
