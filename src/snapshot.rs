//! Flat snapshot of the user table.
//!
//! The only state that outlives the process. Users are written to a SQLite
//! file at shutdown and read back at startup so credentials survive
//! restarts. Everything else in the store is rebuilt from scratch.

mod schema;

use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::{Store, User, UserId};

use schema::USER_SNAPSHOT_SCHEMA;

/// Errors reading or writing a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Connection to a user snapshot file.
pub struct UserSnapshot {
    conn: Connection,
}

impl UserSnapshot {
    /// Opens an in-memory snapshot, mainly for tests.
    pub fn in_memory() -> Result<Self, SnapshotError> {
        let conn = Connection::open_in_memory()?;
        let snapshot = Self { conn };
        snapshot.initialize_schema()?;
        Ok(snapshot)
    }

    /// Opens the snapshot file at `path`, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let conn = Connection::open(path)?;
        let snapshot = Self { conn };
        snapshot.initialize_schema()?;
        Ok(snapshot)
    }

    fn initialize_schema(&self) -> Result<(), SnapshotError> {
        self.conn.execute_batch(USER_SNAPSHOT_SCHEMA)?;
        Ok(())
    }

    /// Replaces the snapshot contents with `users` in one transaction.
    pub fn save(&mut self, users: &[User]) -> Result<(), SnapshotError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM users", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO users (id, username, email, credential) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for user in users {
                stmt.execute(rusqlite::params![
                    user.id.get(),
                    user.username,
                    user.email,
                    user.password_credential,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Reads every user, ordered by id.
    pub fn load(&self) -> Result<Vec<User>, SnapshotError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, username, email, credential FROM users ORDER BY id")?;

        let users = stmt
            .query_map([], |row| {
                Ok(User {
                    id: UserId::new(row.get(0)?),
                    username: row.get(1)?,
                    email: row.get(2)?,
                    password_credential: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Writes the store's users to the snapshot at `path`.
///
/// Creates parent directories as needed.
pub fn save_users(store: &Store, path: &Path) -> Result<usize, SnapshotError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let users = store.list_users();
    UserSnapshot::open(path)?.save(&users)?;

    info!(count = users.len(), path = %path.display(), "saved user snapshot");
    Ok(users.len())
}

/// Restores users from the snapshot at `path` into `store`.
///
/// A missing file is not an error: there is simply nothing to restore.
pub fn load_users(store: &Store, path: &Path) -> Result<usize, SnapshotError> {
    if !path.exists() {
        warn!(path = %path.display(), "no user snapshot found; starting empty");
        return Ok(0);
    }

    let users = UserSnapshot::open(path)?.load()?;
    let count = store.restore_users(users)?;

    info!(count, path = %path.display(), "loaded user snapshot");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewUser;
    use tempfile::tempdir;

    #[test]
    fn schema_creates_users_table() {
        let snapshot = UserSnapshot::in_memory().unwrap();

        let tables: Vec<String> = snapshot
            .connection()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"users".to_string()));
    }

    #[test]
    fn save_replaces_previous_contents() {
        let mut snapshot = UserSnapshot::in_memory().unwrap();
        let user = |id, name: &str| User {
            id: UserId::new(id),
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_credential: format!("{name}-cred"),
        };

        snapshot.save(&[user(1, "ada"), user(2, "bob")]).unwrap();
        snapshot.save(&[user(3, "cy")]).unwrap();

        let loaded = snapshot.load().unwrap();
        assert_eq!(loaded, vec![user(3, "cy")]);
    }

    #[test]
    fn credentials_survive_a_restart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("users.db");

        {
            let store = Store::new();
            store
                .create_user(NewUser::new("ada", "ada@example.com", "hash-a"))
                .unwrap();
            store
                .create_user(NewUser::new("bob", "bob@example.com", "hash-b"))
                .unwrap();
            assert_eq!(save_users(&store, &path).unwrap(), 2);
        }

        let store = Store::new();
        assert_eq!(load_users(&store, &path).unwrap(), 2);

        let ada = store.find_user_by_username("ada").unwrap();
        assert_eq!(ada.password_credential, "hash-a");

        // Ids keep climbing after a restore.
        let cy = store
            .create_user(NewUser::new("cy", "cy@example.com", "hash-c"))
            .unwrap();
        assert_eq!(cy.id, UserId::new(3));
    }

    #[test]
    fn missing_file_loads_nothing() {
        let dir = tempdir().unwrap();
        let store = Store::new();

        let count = load_users(&store, &dir.path().join("absent.db")).unwrap();

        assert_eq!(count, 0);
        assert!(store.list_users().is_empty());
    }

    #[test]
    fn restoring_over_conflicting_users_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.db");

        let source = Store::new();
        source
            .create_user(NewUser::new("ada", "ada@example.com", "hash"))
            .unwrap();
        save_users(&source, &path).unwrap();

        let target = Store::new();
        target
            .create_user(NewUser::new("ada", "other@example.com", "hash"))
            .unwrap();

        let err = load_users(&target, &path).unwrap_err();
        assert!(matches!(err, SnapshotError::Store(StoreError::Conflict { .. })));
        assert_eq!(target.list_users().len(), 1);
    }
}
