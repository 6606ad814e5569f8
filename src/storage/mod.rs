//! SQLite persistence for memos.
//!
//! One row per memo in `memo_m`. Every operation opens its own short-lived
//! connection and closes it before returning — no pool, no transaction
//! spanning operations. All SQL is parameterized; the one dynamic piece
//! (the column name in `update_memo_field`) comes from the closed
//! [`MemoField`] enum, never from caller input.

use std::path::{Path, PathBuf};

use chrono::Utc;
use sqlx::{sqlite::SqliteConnectOptions, ConnectOptions, Connection, SqliteConnection};
use tracing::info;

use crate::error::ApiError;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS memo_m (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    subject TEXT NOT NULL,
    background TEXT NOT NULL,
    proposal TEXT NOT NULL,
    recommendation TEXT NOT NULL,
    last_updated TEXT NOT NULL
)";

// ─── MemoField ────────────────────────────────────────────────────────────────

/// The closed set of updatable memo sections.
///
/// Parsed from the wire string of an update request; the SQL column name is
/// derived only from this enum so a raw caller string can never reach the
/// statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoField {
    Background,
    Proposal,
    Recommendation,
}

impl MemoField {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        match raw {
            "background" => Ok(Self::Background),
            "proposal" => Ok(Self::Proposal),
            "recommendation" => Ok(Self::Recommendation),
            _ => Err(ApiError::BadRequest(format!(
                "invalid field to update: '{raw}' — must be 'background', 'proposal', or 'recommendation'"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Proposal => "proposal",
            Self::Recommendation => "recommendation",
        }
    }

    /// Column name in `memo_m`. Identical to the wire name, but kept as a
    /// separate accessor so the injection boundary stays visible at call sites.
    pub fn column(self) -> &'static str {
        self.as_str()
    }
}

// ─── Rows ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemoRow {
    pub id: i64,
    pub subject: String,
    pub background: String,
    pub proposal: String,
    pub recommendation: String,
}

// ─── Storage ──────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Storage {
    db_path: PathBuf,
}

impl Storage {
    /// Create the storage handle and ensure the schema exists.
    pub async fn init(db_path: &Path) -> Result<Self, ApiError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ApiError::Database(e.to_string()))?;
            }
        }
        let storage = Self {
            db_path: db_path.to_path_buf(),
        };
        let mut conn = storage.connect().await?;
        sqlx::query(SCHEMA).execute(&mut conn).await?;
        conn.close().await.ok();
        info!(path = %storage.db_path.display(), "memo database ready");
        Ok(storage)
    }

    async fn connect(&self) -> Result<SqliteConnection, ApiError> {
        let opts = SqliteConnectOptions::new()
            .filename(&self.db_path)
            .create_if_missing(true);
        Ok(opts.connect().await?)
    }

    /// Single-row select of the subject and the three section columns.
    pub async fn fetch_memo(&self, id: i64) -> Result<MemoRow, ApiError> {
        let mut conn = self.connect().await?;
        let row = sqlx::query_as::<_, MemoRow>(
            "SELECT id, subject, background, proposal, recommendation FROM memo_m WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut conn)
        .await?;
        conn.close().await.ok();
        row.ok_or_else(|| ApiError::NotFound(format!("memo with id {id} not found")))
    }

    /// Append a new row; `last_updated` is assigned server-side.
    pub async fn insert_memo(
        &self,
        subject: &str,
        background: &str,
        proposal: &str,
        recommendation: &str,
    ) -> Result<i64, ApiError> {
        let mut conn = self.connect().await?;
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO memo_m (subject, background, proposal, recommendation, last_updated)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(subject)
        .bind(background)
        .bind(proposal)
        .bind(recommendation)
        .bind(&now)
        .execute(&mut conn)
        .await?;
        let id = result.last_insert_rowid();
        conn.close().await.ok();
        Ok(id)
    }

    /// Overwrite a single section column and refresh the timestamp.
    ///
    /// Not-found when zero rows are affected — the row may have existed at
    /// fetch time and be gone by write time.
    pub async fn update_memo_field(
        &self,
        id: i64,
        field: MemoField,
        content: &str,
    ) -> Result<(), ApiError> {
        let mut conn = self.connect().await?;
        let now = Utc::now().to_rfc3339();
        let sql = format!(
            "UPDATE memo_m SET {} = ?, last_updated = ? WHERE id = ?",
            field.column()
        );
        let result = sqlx::query(&sql)
            .bind(content)
            .bind(&now)
            .bind(id)
            .execute(&mut conn)
            .await?;
        conn.close().await.ok();
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("memo with id {id} not found")));
        }
        Ok(())
    }
}
