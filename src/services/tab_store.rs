//! Durable storage for the registry's tab order.
//!
//! The full `SavedTab` order is rewritten on every registry change and read
//! back once at startup, where the registry factory reconciles it against the
//! browser's open-tab snapshot.

use std::sync::Arc;

use rusqlite::params;

use crate::database::connection::Database;
use crate::types::errors::StorageError;
use crate::types::tab::SavedTab;

/// Trait defining saved-order storage operations.
pub trait TabStoreTrait {
    fn save_order(&self, tabs: &[SavedTab]) -> Result<(), StorageError>;
    fn load_order(&self) -> Result<Vec<SavedTab>, StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// Saved-order store backed by SQLite.
#[derive(Clone)]
pub struct TabStore {
    db: Arc<Database>,
}

impl TabStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl TabStoreTrait for TabStore {
    /// Replaces the stored order with `tabs`, oldest first.
    fn save_order(&self, tabs: &[SavedTab]) -> Result<(), StorageError> {
        let conn = self.db.connection();

        conn.execute("DELETE FROM saved_tabs", [])
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        let mut stmt = conn
            .prepare("INSERT INTO saved_tabs (position, title, url, favicon_url) VALUES (?1, ?2, ?3, ?4)")
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        for (position, tab) in tabs.iter().enumerate() {
            stmt.execute(params![position as i64, tab.title, tab.url, tab.favicon_url])
                .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        }

        Ok(())
    }

    /// Reads the stored order, oldest first. Empty when nothing was saved.
    fn load_order(&self) -> Result<Vec<SavedTab>, StorageError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare("SELECT title, url, favicon_url FROM saved_tabs ORDER BY position ASC")
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(SavedTab {
                    title: row.get(0)?,
                    url: row.get(1)?,
                    favicon_url: row.get(2)?,
                })
            })
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        let mut tabs = Vec::new();
        for row in rows {
            tabs.push(row.map_err(|e| StorageError::DatabaseError(e.to_string()))?);
        }
        Ok(tabs)
    }

    /// Removes the stored order entirely.
    fn clear(&self) -> Result<(), StorageError> {
        self.db
            .connection()
            .execute("DELETE FROM saved_tabs", [])
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}
