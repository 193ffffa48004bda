use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::User;
use super::tables::*;

impl Database {
    // ========================================================================
    // User operations
    // ========================================================================

    /// Store a new user. Returns `false` without writing if the username is taken.
    pub fn create_user(&self, user: &User) -> Result<bool, DatabaseError> {
        debug_assert!(!user.username.is_empty(), "username must not be empty");

        let write_txn = self.begin_write()?;
        let created = {
            let mut table = write_txn.open_table(USERS)?;
            let taken = table.get(user.username.as_str())?.is_some();
            if !taken {
                let data = rmp_serde::to_vec_named(user)?;
                table.insert(user.username.as_str(), data.as_slice())?;
            }
            !taken
        };
        write_txn.commit()?;
        Ok(created)
    }

    /// Get a user by username
    pub fn get_user(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(USERS)?;

        match table.get(username)? {
            Some(data) => {
                let user: User = rmp_serde::from_slice(data.value())?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }
}
