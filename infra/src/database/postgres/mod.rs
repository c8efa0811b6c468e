//! PostgreSQL repository implementations

mod merchant_repository_impl;
mod token_repository_impl;

pub use merchant_repository_impl::PgMerchantRepository;
pub use token_repository_impl::{PgTokenRepository, PgTokenTransaction};

use tg_core::errors::DomainError;

/// Map a sqlx failure onto the domain taxonomy
///
/// Unique violations are bugs in the caller (tokens carry a random jti),
/// everything else means the store could not serve the request.
pub(crate) fn store_error(context: &str, e: sqlx::Error) -> DomainError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::Internal {
            message: format!("{}: duplicate token", context),
        },
        sqlx::Error::ColumnNotFound(_) | sqlx::Error::ColumnDecode { .. } => DomainError::Internal {
            message: format!("{}: {}", context, e),
        },
        _ => DomainError::store(format!("{}: {}", context, e)),
    }
}
