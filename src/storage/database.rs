// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded record store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - one table per entity: `id (u64)` → serialized record (JSON bytes)
//! - `sequences`: entity table name → last assigned id
//! - `users_by_username`, `users_by_email`: unique value → user id
//!
//! Rows are never physically removed. Deletion sets `deleted_at`, and every
//! lookup except [`Store::find_any`] skips soft-deleted rows.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

/// Last id handed out per entity table.
const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

pub(crate) const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");
pub(crate) const AGENTS: TableDefinition<u64, &[u8]> = TableDefinition::new("agents");
pub(crate) const CLIENTS: TableDefinition<u64, &[u8]> = TableDefinition::new("clients");
pub(crate) const MESSAGES: TableDefinition<u64, &[u8]> = TableDefinition::new("messages");
pub(crate) const TRANSACTIONS: TableDefinition<u64, &[u8]> =
    TableDefinition::new("transactions");

/// Unique index: username → user id.
pub(crate) const USERS_BY_USERNAME: TableDefinition<&str, u64> =
    TableDefinition::new("users_by_username");

/// Unique index: lowercase email → user id.
pub(crate) const USERS_BY_EMAIL: TableDefinition<&str, u64> =
    TableDefinition::new("users_by_email");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: u64 },

    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: EntityKind, id: u64 },

    #[error("{field} already taken")]
    UniqueViolation { field: &'static str },

    #[error("{kind} id sequence exhausted")]
    SequenceExhausted { kind: EntityKind },
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Records
// =============================================================================

/// The entity types kept in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Agent,
    Client,
    Message,
    Transaction,
}

impl EntityKind {
    /// Lowercase name used in error messages and as the sequence key.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Agent => "agent",
            EntityKind::Client => "client",
            EntityKind::Message => "message",
            EntityKind::Transaction => "transaction",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unique secondary key written in the same transaction as its record.
pub struct UniqueKey {
    pub field: &'static str,
    pub table: TableDefinition<'static, &'static str, u64>,
    pub value: String,
}

/// A row persisted in one of the entity tables.
///
/// An id of `0` on insert means "assign the next id"; any other value is an
/// explicit, client-supplied id that must not already be taken.
pub trait Record: Serialize + DeserializeOwned {
    const KIND: EntityKind;
    const TABLE: TableDefinition<'static, u64, &'static [u8]>;

    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
    fn is_deleted(&self) -> bool;
    fn mark_deleted(&mut self, at: DateTime<Utc>);
    fn touch(&mut self, at: DateTime<Utc>);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        Vec::new()
    }
}

/// Implements [`Record`] for a struct with the standard bookkeeping fields
/// (`id`, `updated_at`, `deleted_at`).
#[macro_export]
macro_rules! impl_record {
    ($ty:ty, $kind:expr, $table:expr) => {
        impl $crate::storage::Record for $ty {
            const KIND: $crate::storage::EntityKind = $kind;
            const TABLE: redb::TableDefinition<'static, u64, &'static [u8]> = $table;

            fn id(&self) -> u64 {
                self.id
            }

            fn set_id(&mut self, id: u64) {
                self.id = id;
            }

            fn is_deleted(&self) -> bool {
                self.deleted_at.is_some()
            }

            fn mark_deleted(&mut self, at: chrono::DateTime<chrono::Utc>) {
                self.deleted_at = Some(at);
                self.updated_at = at;
            }

            fn touch(&mut self, at: chrono::DateTime<chrono::Utc>) {
                self.updated_at = at;
            }
        }
    };
}

// =============================================================================
// Store
// =============================================================================

/// Shared handle to the embedded database.
///
/// Cloning is cheap; every clone points at the same redb file. Each method
/// runs in its own redb transaction.
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl Store {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SEQUENCES)?;
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(AGENTS)?;
            let _ = write_txn.open_table(CLIENTS)?;
            let _ = write_txn.open_table(MESSAGES)?;
            let _ = write_txn.open_table(TRANSACTIONS)?;
            let _ = write_txn.open_table(USERS_BY_USERNAME)?;
            let _ = write_txn.open_table(USERS_BY_EMAIL)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Round-trip a read transaction; used by the readiness probe.
    pub fn health_check(&self) -> StorageResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(SEQUENCES)?;
        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Fetch a live record by id. Soft-deleted rows read as `None`.
    pub fn find<T: Record>(&self, id: u64) -> StorageResult<Option<T>> {
        Ok(self.find_any::<T>(id)?.filter(|record| !record.is_deleted()))
    }

    /// Fetch a record by id, including soft-deleted rows.
    ///
    /// Only ownership-chain walks should need this.
    pub fn find_any<T: Record>(&self, id: u64) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(T::TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All live records matching `predicate`, in id order.
    pub fn find_many<T, F>(&self, predicate: F) -> StorageResult<Vec<T>>
    where
        T: Record,
        F: Fn(&T) -> bool,
    {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(T::TABLE)?;

        let mut records = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let record: T = serde_json::from_slice(value.value())?;
            if !record.is_deleted() && predicate(&record) {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Resolve a unique index entry to the id it points at.
    pub fn lookup_unique(
        &self,
        index: TableDefinition<'static, &'static str, u64>,
        value: &str,
    ) -> StorageResult<Option<u64>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(index)?;
        Ok(table.get(value)?.map(|id| id.value()))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert a new record, assigning its id when it carries `0`.
    ///
    /// An explicit id that is already present (live or soft-deleted) fails
    /// with [`StorageError::AlreadyExists`]; a taken unique key fails with
    /// [`StorageError::UniqueViolation`]; a sequence at `u64::MAX` fails with
    /// [`StorageError::SequenceExhausted`]. Nothing is written in any case.
    pub fn insert<T: Record>(&self, mut record: T) -> StorageResult<T> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(T::TABLE)?;
            let mut sequences = write_txn.open_table(SEQUENCES)?;

            let last = sequences
                .get(T::KIND.as_str())?
                .map(|id| id.value())
                .unwrap_or(0);

            let id = match record.id() {
                0 => last
                    .checked_add(1)
                    .ok_or(StorageError::SequenceExhausted { kind: T::KIND })?,
                requested => {
                    if table.get(requested)?.is_some() {
                        return Err(StorageError::AlreadyExists {
                            kind: T::KIND,
                            id: requested,
                        });
                    }
                    requested
                }
            };
            record.set_id(id);

            for key in record.unique_keys() {
                let mut index = write_txn.open_table(key.table)?;
                if index.get(key.value.as_str())?.is_some() {
                    return Err(StorageError::UniqueViolation { field: key.field });
                }
                index.insert(key.value.as_str(), id)?;
            }

            let json = serde_json::to_vec(&record)?;
            table.insert(id, json.as_slice())?;
            sequences.insert(T::KIND.as_str(), last.max(id))?;
        }
        write_txn.commit()?;
        Ok(record)
    }

    /// Apply `change` to a live record and persist it.
    ///
    /// Unique keys are not re-indexed; callers must not change them here.
    pub fn update<T, F>(&self, id: u64, change: F) -> StorageResult<T>
    where
        T: Record,
        F: FnOnce(&mut T),
    {
        let write_txn = self.db.begin_write()?;
        let record = {
            let mut table = write_txn.open_table(T::TABLE)?;

            // Read existing value and deserialize before mutating
            let mut record = Self::load_live::<T>(&table, id)?;
            change(&mut record);
            record.touch(Utc::now());

            let json = serde_json::to_vec(&record)?;
            table.insert(id, json.as_slice())?;
            record
        };
        write_txn.commit()?;
        Ok(record)
    }

    /// Mark a live record as deleted. Deleting twice yields `NotFound`.
    pub fn soft_delete<T: Record>(&self, id: u64) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(T::TABLE)?;
            let mut record = Self::load_live::<T>(&table, id)?;
            record.mark_deleted(Utc::now());

            let json = serde_json::to_vec(&record)?;
            table.insert(id, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn load_live<T: Record>(table: &redb::Table<'_, u64, &[u8]>, id: u64) -> StorageResult<T> {
        let bytes = {
            let existing = table
                .get(id)?
                .ok_or(StorageError::NotFound { kind: T::KIND, id })?;
            existing.value().to_vec()
        };
        let record: T = serde_json::from_slice(&bytes)?;
        if record.is_deleted() {
            return Err(StorageError::NotFound { kind: T::KIND, id });
        }
        Ok(record)
    }
}
