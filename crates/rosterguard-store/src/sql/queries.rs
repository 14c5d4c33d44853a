//! SQL queries for different databases.
//!
//! WordPress stores `user_id` as `BIGINT UNSIGNED`; it is cast to a signed
//! 64-bit integer so the `Any` driver can decode it on every backend.

use super::backend::DatabaseType;

/// Signed 64-bit cast target for each dialect.
fn int_type(db: DatabaseType) -> &'static str {
    match db {
        DatabaseType::MySQL => "SIGNED",
        DatabaseType::PostgreSQL => "BIGINT",
        DatabaseType::SQLite => "INTEGER",
    }
}

/// Positional placeholder `n` (1-based).
fn param(db: DatabaseType, n: usize) -> String {
    match db {
        DatabaseType::PostgreSQL => format!("${n}"),
        DatabaseType::MySQL | DatabaseType::SQLite => "?".to_string(),
    }
}

/// All rows for one meta key, with their raw payload.
pub(crate) fn find_role_records(db: DatabaseType, table: &str) -> String {
    format!(
        "SELECT CAST(user_id AS {int}) AS user_id, meta_value \
         FROM {table} \
         WHERE meta_key = {p1}",
        int = int_type(db),
        p1 = param(db, 1),
    )
}

/// The first user whose meta value under the given key equals the id.
pub(crate) fn find_user_id_by_meta(db: DatabaseType, table: &str) -> String {
    format!(
        "SELECT CAST(user_id AS {int}) AS user_id \
         FROM {table} \
         WHERE meta_key = {p1} AND meta_value = {p2} \
         LIMIT 1",
        int = int_type(db),
        p1 = param(db, 1),
        p2 = param(db, 2),
    )
}
