//! Durable string-keyed slot storage.
//!
//! # Responsibility
//! - Provide the key/value contract the persistence adapters write through.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `write_slot` overwrites the previous value in one statement; readers
//!   never observe a partially written value.
//! - Slot values are opaque strings; this layer never parses them.

use crate::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type SlotResult<T> = Result<T, SlotStoreError>;

/// Slot read/write failure.
#[derive(Debug)]
pub enum SlotStoreError {
    Db(DbError),
    /// Backend refused the operation for a non-SQL reason.
    Unavailable(String),
}

impl Display for SlotStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "slot store unavailable: {message}"),
        }
    }
}

impl Error for SlotStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for SlotStoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotStoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Named durable key/value locations surviving across sessions.
pub trait SlotStore {
    /// Returns the slot value, or `None` when the slot was never written.
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>>;
    /// Overwrites the slot value.
    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()>;
}

impl<S: SlotStore + ?Sized> SlotStore for &S {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        (**self).write_slot(key, value)
    }
}

/// SQLite-backed slot store owning its connection for the session.
pub struct SqliteSlotStore {
    conn: Connection,
}

impl SqliteSlotStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> SlotResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a throwaway in-memory database.
    pub fn open_in_memory() -> SlotResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SlotStore for SqliteSlotStore {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        self.conn.execute(
            "INSERT INTO slots (key, value, updated_at)
             VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local slot store; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: RefCell<BTreeMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one slot value.
    pub fn with_slot(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl SlotStore for MemorySlotStore {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
