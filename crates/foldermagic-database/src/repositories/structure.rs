//! PostgreSQL structure record repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use foldermagic_core::error::{AppError, ErrorKind};
use foldermagic_core::result::AppResult;
use foldermagic_entity::action::DiffList;
use foldermagic_entity::structure::StructureRecord;
use foldermagic_entity::tree::FolderNode;

use super::StructureStore;

const RECORD_COLUMNS: &str =
    "user_key, current_structure, proposed_structure, diff_list, updated_at";

/// Row of the `user_structures` table.
#[derive(Debug, sqlx::FromRow)]
struct StructureRow {
    user_key: String,
    current_structure: Option<Json<FolderNode>>,
    proposed_structure: Option<Json<FolderNode>>,
    diff_list: Option<Json<DiffList>>,
    updated_at: DateTime<Utc>,
}

impl From<StructureRow> for StructureRecord {
    fn from(row: StructureRow) -> Self {
        Self {
            user_key: row.user_key,
            current: row.current_structure.map(|j| j.0),
            proposed: row.proposed_structure.map(|j| j.0),
            diff: row.diff_list.map(|j| j.0),
            updated_at: row.updated_at,
        }
    }
}

/// Repository storing structure records as JSONB documents.
#[derive(Debug, Clone)]
pub struct PgStructureRepository {
    pool: PgPool,
}

impl PgStructureRepository {
    /// Create a new structure repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StructureStore for PgStructureRepository {
    fn backend(&self) -> &str {
        "postgres"
    }

    async fn find(&self, user_key: &str) -> AppResult<Option<StructureRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM user_structures WHERE user_key = $1");
        sqlx::query_as::<_, StructureRow>(&sql)
            .bind(user_key)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(StructureRecord::from))
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load structure record", e)
            })
    }

    async fn upsert_current(
        &self,
        user_key: &str,
        current: &FolderNode,
    ) -> AppResult<StructureRecord> {
        let sql = format!(
            "INSERT INTO user_structures (user_key, current_structure, proposed_structure, diff_list, updated_at) \
             VALUES ($1, $2, NULL, NULL, NOW()) \
             ON CONFLICT (user_key) DO UPDATE SET \
                current_structure = EXCLUDED.current_structure, \
                proposed_structure = NULL, \
                diff_list = NULL, \
                updated_at = NOW() \
             RETURNING {RECORD_COLUMNS}"
        );
        sqlx::query_as::<_, StructureRow>(&sql)
            .bind(user_key)
            .bind(Json(current))
            .fetch_one(&self.pool)
            .await
            .map(StructureRecord::from)
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to store current structure", e)
            })
    }

    async fn set_proposed(
        &self,
        user_key: &str,
        proposed: &FolderNode,
        diff: &DiffList,
    ) -> AppResult<StructureRecord> {
        let sql = format!(
            "UPDATE user_structures \
             SET proposed_structure = $2, diff_list = $3, updated_at = NOW() \
             WHERE user_key = $1 \
             RETURNING {RECORD_COLUMNS}"
        );
        let row = sqlx::query_as::<_, StructureRow>(&sql)
            .bind(user_key)
            .bind(Json(proposed))
            .bind(Json(diff))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to store proposed structure", e)
            })?;

        row.map(StructureRecord::from).ok_or_else(|| {
            AppError::not_found(format!("No structure record for user '{user_key}'"))
        })
    }

    async fn delete(&self, user_key: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_structures WHERE user_key = $1")
            .bind(user_key)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete structure record", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
