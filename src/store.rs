//! Best-effort persistence of generated artifacts.
//!
//! Storage never blocks generation: callers persist through
//! [`persist_best_effort`], which logs a warning on failure and moves on.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::warn;
use uuid::Uuid;

use crate::pipeline::Artifact;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Store lock poisoned")]
    Poisoned,
}

/// A persisted generation result.
#[derive(Debug, Clone)]
pub struct ArtifactRecord {
    pub id: Uuid,
    pub topic: String,
    pub title: String,
    pub content: String,
    pub word_count: usize,
    pub pages: usize,
    pub created_at: DateTime<Utc>,
}

impl ArtifactRecord {
    pub fn from_artifact(topic: &str, artifact: &Artifact) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic: topic.to_string(),
            title: artifact.title.clone(),
            content: artifact.content.clone(),
            word_count: artifact.word_count,
            pages: artifact.pages,
            created_at: Utc::now(),
        }
    }
}

/// Write side of artifact storage.
pub trait ArtifactStore: Send + Sync {
    fn persist(&self, record: &ArtifactRecord) -> Result<(), StoreError>;
    fn recent(&self, limit: usize) -> Result<Vec<ArtifactRecord>, StoreError>;
}

/// SQLite-backed store. A single connection behind a mutex is enough
/// here: writes are rare (one per generation) and reads are rarer.
pub struct SqliteArtifactStore {
    conn: Mutex<Connection>,
}

impl SqliteArtifactStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS artifacts (
                id TEXT PRIMARY KEY,
                topic TEXT NOT NULL,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                word_count INTEGER NOT NULL,
                pages INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_artifacts_created
                ON artifacts(created_at DESC);",
        )?;
        Ok(())
    }
}

impl ArtifactStore for SqliteArtifactStore {
    fn persist(&self, record: &ArtifactRecord) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "INSERT INTO artifacts (id, topic, title, content, word_count, pages, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id.to_string(),
                record.topic,
                record.title,
                record.content,
                record.word_count as i64,
                record.pages as i64,
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<ArtifactRecord>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let mut stmt = conn.prepare(
            "SELECT id, topic, title, content, word_count, pages, created_at
             FROM artifacts ORDER BY created_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit as i64], |row| {
            let id: String = row.get(0)?;
            let created: String = row.get(6)?;
            Ok(ArtifactRecord {
                id: Uuid::parse_str(&id).unwrap_or_else(|_| Uuid::nil()),
                topic: row.get(1)?,
                title: row.get(2)?,
                content: row.get(3)?,
                word_count: row.get::<_, i64>(4)? as usize,
                pages: row.get::<_, i64>(5)? as usize,
                created_at: DateTime::parse_from_rfc3339(&created)
                    .map(|t| t.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

/// Persist a finished artifact without letting storage failures reach
/// the caller.
pub fn persist_best_effort(store: &dyn ArtifactStore, topic: &str, artifact: &Artifact) {
    let record = ArtifactRecord::from_artifact(topic, artifact);
    if let Err(e) = store.persist(&record) {
        warn!("Failed to persist artifact '{}': {e}", record.title);
    }
}
