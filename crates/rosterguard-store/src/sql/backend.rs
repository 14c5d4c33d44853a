//! SQL identity store backend.

use async_trait::async_trait;
use rosterguard_core::{ExternalMemberId, WebsiteUserId};
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{AnyPool, Row};
use tracing::debug;

use crate::error::StoreError;
use crate::record::RoleRecord;
use crate::traits::IdentityStore;

use super::config::SqlStoreConfig;
use super::queries;

/// Database type enum for query selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// PostgreSQL database.
    PostgreSQL,
    /// MySQL/MariaDB database.
    MySQL,
    /// SQLite database.
    SQLite,
}

impl DatabaseType {
    /// Detect database type from URL.
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(Self::PostgreSQL)
        } else if url.starts_with("mysql://") || url.starts_with("mariadb://") {
            Some(Self::MySQL)
        } else if url.starts_with("sqlite:") {
            Some(Self::SQLite)
        } else {
            None
        }
    }
}

/// SQL-backed identity store.
///
/// Query text is rendered once at connect time for the detected dialect and
/// configured table prefix; values are always bound, never interpolated.
pub struct SqlIdentityStore {
    pool: AnyPool,
    db_type: DatabaseType,
    role_records_query: String,
    user_id_query: String,
    config: SqlStoreConfig,
}

impl SqlIdentityStore {
    /// Connect to database and create the store.
    pub async fn connect(config: SqlStoreConfig) -> Result<Self, StoreError> {
        // Install database drivers for the "any" pool
        sqlx::any::install_default_drivers();

        let db_type =
            DatabaseType::from_url(&config.database_url).ok_or(StoreError::UnsupportedUrl)?;

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .connect(&config.database_url)
            .await?;

        let table = config.usermeta_table();
        Ok(Self {
            pool,
            db_type,
            role_records_query: queries::find_role_records(db_type, &table),
            user_id_query: queries::find_user_id_by_meta(db_type, &table),
            config,
        })
    }

    fn parse_role_row(row: &AnyRow) -> Result<RoleRecord, StoreError> {
        let user_id: i64 = row.try_get("user_id")?;
        // meta_value is nullable in WordPress; a NULL payload grants nothing.
        let payload: Option<String> = row.try_get("meta_value")?;
        Ok(RoleRecord {
            user_id: WebsiteUserId(user_id),
            payload: payload.unwrap_or_default(),
        })
    }

    /// Get the connection pool (for advanced usage).
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Get database type.
    pub fn database_type(&self) -> DatabaseType {
        self.db_type
    }

    /// Close the pool, waiting for checked-out connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl IdentityStore for SqlIdentityStore {
    async fn find_role_records(&self, meta_key: &str) -> Result<Vec<RoleRecord>, StoreError> {
        let rows = sqlx::query(&self.role_records_query)
            .bind(meta_key)
            .fetch_all(&self.pool)
            .await?;

        let records = rows
            .iter()
            .map(Self::parse_role_row)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(meta_key, count = records.len(), "fetched role records");
        Ok(records)
    }

    async fn find_user_id(
        &self,
        external_id: &ExternalMemberId,
    ) -> Result<Option<WebsiteUserId>, StoreError> {
        let row = sqlx::query(&self.user_id_query)
            .bind(self.config.external_id_meta_key.as_str())
            .bind(external_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| row.try_get::<i64, _>("user_id").map(WebsiteUserId))
            .transpose()
            .map_err(StoreError::from)
    }
}

// Debug implementation (don't leak credentials)
impl std::fmt::Debug for SqlIdentityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlIdentityStore")
            .field("db_type", &self.db_type)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
