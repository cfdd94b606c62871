//! Connection setup and `DbErr` translation.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};

use crate::domain::error::{DomainError, UniqueTarget};

/// Open a pooled connection.
///
/// # Errors
/// Returns the driver error if the DSN is unusable or the first connection fails.
pub async fn connect(
    dsn: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(dsn.to_owned());
    opts.max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .sqlx_logging(false);
    Database::connect(opts).await
}

/// Map a driver error into the domain, keeping unique violations typed.
pub fn db_err(e: DbErr) -> DomainError {
    if let Some(SqlErr::UniqueConstraintViolation(constraint)) = e.sql_err() {
        return DomainError::UniqueViolation {
            target: unique_target(&constraint),
            constraint,
        };
    }
    // SQLite reports primary-key collisions under a separate extended code
    // that `sql_err` does not classify; the message is the same.
    let message = e.to_string();
    if message.contains("UNIQUE constraint failed") {
        return DomainError::UniqueViolation {
            target: unique_target(&message),
            constraint: message,
        };
    }
    tracing::error!("Database error: {message}");
    DomainError::database(message)
}

impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        db_err(e)
    }
}

// Matches both SQLite ("UNIQUE constraint failed: accounts.email") and
// Postgres ("... unique constraint \"idx_accounts_email\"") messages.
fn unique_target(message: &str) -> UniqueTarget {
    if message.contains("account_phones") {
        UniqueTarget::Phone
    } else if message.contains("accounts.email") || message.contains("idx_accounts_email") {
        UniqueTarget::Email
    } else if message.contains("companies.name") || message.contains("idx_companies_name") {
        UniqueTarget::CompanyName
    } else {
        UniqueTarget::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_constraint_owners() {
        assert_eq!(
            unique_target("UNIQUE constraint failed: accounts.email"),
            UniqueTarget::Email
        );
        assert_eq!(
            unique_target("UNIQUE constraint failed: account_phones.phone"),
            UniqueTarget::Phone
        );
        assert_eq!(
            unique_target(
                "duplicate key value violates unique constraint \"idx_companies_name\""
            ),
            UniqueTarget::CompanyName
        );
        assert_eq!(
            unique_target("duplicate key value violates unique constraint \"account_phones_pkey\""),
            UniqueTarget::Phone
        );
        assert_eq!(unique_target("something else"), UniqueTarget::Unknown);
    }

    #[test]
    fn other_errors_become_database_failures() {
        let err = db_err(DbErr::Custom("boom".to_owned()));
        assert!(matches!(err, DomainError::Database { .. }));
    }

    #[test]
    fn primary_key_collision_message_is_a_unique_violation() {
        let err = db_err(DbErr::Custom(
            "UNIQUE constraint failed: account_phones.phone".to_owned(),
        ));
        assert!(matches!(
            err,
            DomainError::UniqueViolation {
                target: UniqueTarget::Phone,
                ..
            }
        ));
    }

    #[test]
    fn question_mark_converts_driver_errors() {
        fn begin() -> Result<(), DomainError> {
            Err(DbErr::Custom(
                "UNIQUE constraint failed: accounts.email".to_owned(),
            ))?;
            Ok(())
        }
        assert!(matches!(
            begin(),
            Err(DomainError::UniqueViolation {
                target: UniqueTarget::Email,
                ..
            })
        ));
    }
}
