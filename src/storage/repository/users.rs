// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential store.
//!
//! Usernames and emails are unique. Both are enforced by index tables that
//! are written in the same redb transaction as the user row, so two
//! concurrent registrations cannot both win.

use chrono::{DateTime, Utc};
use redb::TableDefinition;
use serde::{Deserialize, Serialize};

use super::super::database::{USERS, USERS_BY_EMAIL, USERS_BY_USERNAME};
use super::super::{EntityKind, Record, Store, StorageResult, UniqueKey};

/// User account as persisted. Never returned from the API as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredUser {
    pub id: u64,
    pub username: String,
    pub email: String,
    /// Argon2id PHC string
    pub password_hash: String,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl StoredUser {
    /// New active user with an unassigned id.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            username,
            email,
            password_hash,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Emails compare case-insensitively.
fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Record for StoredUser {
    const KIND: EntityKind = EntityKind::User;
    const TABLE: TableDefinition<'static, u64, &'static [u8]> = USERS;

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
        self.updated_at = at;
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![
            UniqueKey {
                field: "username",
                table: USERS_BY_USERNAME,
                value: self.username.clone(),
            },
            UniqueKey {
                field: "email",
                table: USERS_BY_EMAIL,
                value: email_key(&self.email),
            },
        ]
    }
}

/// Repository for user accounts.
pub struct UserRepository<'a> {
    store: &'a Store,
}

impl<'a> UserRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Get a live user by id.
    pub fn get(&self, user_id: u64) -> StorageResult<Option<StoredUser>> {
        self.store.find(user_id)
    }

    /// Get a live user by exact username.
    pub fn find_by_username(&self, username: &str) -> StorageResult<Option<StoredUser>> {
        match self.store.lookup_unique(USERS_BY_USERNAME, username)? {
            Some(id) => self.get(id),
            None => Ok(None),
        }
    }

    pub fn username_taken(&self, username: &str) -> StorageResult<bool> {
        Ok(self
            .store
            .lookup_unique(USERS_BY_USERNAME, username)?
            .is_some())
    }

    pub fn email_taken(&self, email: &str) -> StorageResult<bool> {
        Ok(self
            .store
            .lookup_unique(USERS_BY_EMAIL, &email_key(email))?
            .is_some())
    }

    /// Insert a new user.
    ///
    /// # Errors
    /// `StorageError::UniqueViolation` naming `username` or `email`.
    pub fn create(&self, user: StoredUser) -> StorageResult<StoredUser> {
        self.store.insert(user)
    }

    /// Stamp a successful login.
    pub fn record_login(&self, user_id: u64) -> StorageResult<StoredUser> {
        self.store
            .update(user_id, |user: &mut StoredUser| user.last_login = Some(Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::tests::temp_store;
    use crate::storage::StorageError;

    fn test_user(username: &str, email: &str) -> StoredUser {
        StoredUser::new(username.to_string(), email.to_string(), "hash".to_string())
    }

    #[test]
    fn create_and_find_by_username() {
        let (store, _dir) = temp_store();
        let repo = UserRepository::new(&store);

        let created = repo.create(test_user("alice", "alice@example.com")).unwrap();
        assert_eq!(created.id, 1);
        assert!(created.is_active);

        let loaded = repo.find_by_username("alice").unwrap().unwrap();
        assert_eq!(loaded, created);
        assert!(repo.find_by_username("bob").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let (store, _dir) = temp_store();
        let repo = UserRepository::new(&store);

        repo.create(test_user("alice", "a@example.com")).unwrap();
        let err = repo.create(test_user("alice", "b@example.com")).unwrap_err();
        assert!(matches!(err, StorageError::UniqueViolation { field: "username" }));
    }

    #[test]
    fn duplicate_email_ignores_case() {
        let (store, _dir) = temp_store();
        let repo = UserRepository::new(&store);

        repo.create(test_user("alice", "Alice@Example.com")).unwrap();
        assert!(repo.email_taken("alice@example.com").unwrap());

        let err = repo.create(test_user("bob", "alice@example.com")).unwrap_err();
        assert!(matches!(err, StorageError::UniqueViolation { field: "email" }));
        assert!(!repo.username_taken("bob").unwrap());
    }

    #[test]
    fn record_login_sets_timestamp() {
        let (store, _dir) = temp_store();
        let repo = UserRepository::new(&store);

        let created = repo.create(test_user("alice", "a@example.com")).unwrap();
        assert!(created.last_login.is_none());

        let updated = repo.record_login(created.id).unwrap();
        assert!(updated.last_login.is_some());
    }
}
