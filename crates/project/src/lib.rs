use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use timeline::{NewSlice, Slice, SlicePatch};
use uuid::Uuid;
use viewport::SlicePersistence;

pub fn app_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(std::env::temp_dir);
    base.join("sample_slicer")
}

pub fn default_db_path() -> PathBuf {
    app_data_dir().join("slices.db")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] rusqlite::Error),

    #[error("slice {0} not found")]
    NotFound(String),

    #[error("invalid slice range [{start}, {end}]")]
    InvalidRange { start: f64, end: f64 },
}

pub struct SliceStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SliceStore {
    pub fn open_or_create(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        let conn = Connection::open(path).with_context(|| format!("opening {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        apply_migrations(&conn)?;
        tracing::debug!(path = %path.display(), "slice store opened");
        Ok(Self { conn, path: Some(path.to_path_buf()) })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_migrations(&conn)?;
        Ok(Self { conn, path: None })
    }

    /// `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> { self.path.as_deref() }

    pub fn list_slices(&self) -> Result<Vec<Slice>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, start_time, end_time FROM slices ORDER BY start_time ASC, created_at ASC",
        )?;
        let rows = stmt.query_map([], slice_from_row)?;
        let mut out = Vec::new();
        for r in rows { out.push(r?); }
        Ok(out)
    }

    pub fn get_slice(&self, id: &str) -> Result<Slice, StoreError> {
        self.conn
            .query_row(
                "SELECT id, name, start_time, end_time FROM slices WHERE id = ?1",
                params![id],
                slice_from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

impl SlicePersistence for SliceStore {
    type Error = StoreError;

    fn create_slice(&mut self, slice: &NewSlice) -> Result<Slice, StoreError> {
        check_range(slice.start_time, slice.end_time)?;
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp();
        self.conn.execute(
            "INSERT INTO slices(id, name, start_time, end_time, created_at, updated_at) VALUES(?1, ?2, ?3, ?4, ?5, ?5)",
            params![id, slice.name, slice.start_time, slice.end_time, now],
        )?;
        tracing::debug!(%id, name = %slice.name, "slice inserted");
        Ok(Slice { id, name: slice.name.clone(), start_time: slice.start_time, end_time: slice.end_time })
    }

    fn delete_slice(&mut self, id: &str) -> Result<(), StoreError> {
        let n = self.conn.execute("DELETE FROM slices WHERE id = ?1", params![id])?;
        if n == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn update_slice(&mut self, id: &str, patch: &SlicePatch) -> Result<Slice, StoreError> {
        let current = self.get_slice(id)?;
        if patch.is_empty() {
            return Ok(current);
        }
        let updated = patch.apply_to(&current);
        check_range(updated.start_time, updated.end_time)?;
        let now = chrono::Utc::now().timestamp();
        self.conn.execute(
            "UPDATE slices SET name = ?2, start_time = ?3, end_time = ?4, updated_at = ?5 WHERE id = ?1",
            params![id, updated.name, updated.start_time, updated.end_time, now],
        )?;
        Ok(updated)
    }
}

fn check_range(start: f64, end: f64) -> Result<(), StoreError> {
    if start.is_finite() && end.is_finite() && start >= 0.0 && end > start {
        Ok(())
    } else {
        Err(StoreError::InvalidRange { start, end })
    }
}

fn slice_from_row(row: &Row<'_>) -> rusqlite::Result<Slice> {
    Ok(Slice { id: row.get(0)?, name: row.get(1)?, start_time: row.get(2)?, end_time: row.get(3)? })
}

fn apply_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(include_str!("../migrations/V0001__slices.sql"))?;
    conn.execute(
        "INSERT OR IGNORE INTO migrations(name, applied_at) VALUES(?1, strftime('%s','now'))",
        params!["V0001__slices"],
    )?;
    Ok(())
}
