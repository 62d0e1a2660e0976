//! Service layer orchestrating progression rules over the database.
//!
//! `ProgressService` wraps `ProgressDb` (raw database access) together with the
//! token settings from configuration. All repo methods are implemented as
//! `impl ProgressService` blocks under [`crate::repos`].

use tw_config::TrackwayConfig;
use tw_core::enums::EntityType;

use crate::ProgressDb;
use crate::error::DatabaseError;
use crate::helpers::entity_type_to_table;

/// Entry point for every progression and solution-lifecycle operation.
///
/// Every mutation method follows this protocol:
/// 1. Check that referenced entities exist (`NotFound` otherwise)
/// 2. Execute SQL (inside a transaction when more than one row changes)
/// 3. Append an audit entry
pub struct ProgressService {
    db: ProgressDb,
    token_bytes: usize,
}

impl ProgressService {
    /// Create a new service over a local database file, or `":memory:"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = ProgressDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create a service from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the configured database cannot be opened.
    pub async fn from_config(config: &TrackwayConfig) -> Result<Self, DatabaseError> {
        let db = ProgressDb::open_local(&config.database.path).await?;
        Ok(Self {
            db,
            token_bytes: config.auth.token_bytes,
        })
    }

    /// Create from an existing `ProgressDb` with default token settings.
    #[must_use]
    pub const fn from_db(db: ProgressDb) -> Self {
        Self {
            db,
            token_bytes: tw_auth::DEFAULT_TOKEN_BYTES,
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &ProgressDb {
        &self.db
    }

    /// Random bytes per issued auth token.
    #[must_use]
    pub const fn token_bytes(&self) -> usize {
        self.token_bytes
    }

    /// Whether a row with `id` exists in the table for `entity_type`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn exists(&self, entity_type: EntityType, id: &str) -> Result<bool, DatabaseError> {
        let table = entity_type_to_table(entity_type);
        let mut rows = self
            .db
            .conn()
            .query(&format!("SELECT 1 FROM {table} WHERE id = ?1"), [id])
            .await?;
        Ok(rows.next().await?.is_some())
    }

    /// Fail with `NotFound` unless a row with `id` exists.
    pub(crate) async fn require(&self, entity_type: EntityType, id: &str) -> Result<(), DatabaseError> {
        if self.exists(entity_type, id).await? {
            Ok(())
        } else {
            Err(DatabaseError::not_found(entity_type, id))
        }
    }
}
