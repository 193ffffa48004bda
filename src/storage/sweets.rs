use redb::{ReadableTable, WriteTransaction};

use super::db::{Database, DatabaseError};
use super::models::{Sweet, SweetData};
use super::tables::*;

impl Database {
    // ========================================================================
    // Sweet operations
    // ========================================================================

    /// Store a new sweet under the next id from the sweet sequence
    pub fn insert_sweet(&self, data: SweetData) -> Result<Sweet, DatabaseError> {
        let write_txn = self.begin_write()?;
        let sweet = {
            let mut sequences = write_txn.open_table(SEQUENCES)?;
            let last_id = sequences.get(SWEET_SEQUENCE)?.map(|v| v.value()).unwrap_or(0);
            let id = last_id + 1;
            sequences.insert(SWEET_SEQUENCE, id)?;

            let sweet = data.into_sweet(id);
            write_sweet(&write_txn, &sweet)?;
            sweet
        };
        write_txn.commit()?;
        Ok(sweet)
    }

    /// Get a sweet by id
    pub fn get_sweet(&self, id: u64) -> Result<Option<Sweet>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(SWEETS)?;

        match table.get(id)? {
            Some(data) => {
                let sweet: Sweet = rmp_serde::from_slice(data.value())?;
                Ok(Some(sweet))
            }
            None => Ok(None),
        }
    }

    /// Get all sweets in ascending id order
    pub fn get_all_sweets(&self) -> Result<Vec<Sweet>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(SWEETS)?;

        let mut sweets = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let sweet: Sweet = rmp_serde::from_slice(value.value())?;
            sweets.push(sweet);
        }

        Ok(sweets)
    }

    /// Delete a sweet. Returns whether a record was removed.
    pub fn delete_sweet(&self, id: u64) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;
        let deleted = {
            let mut table = write_txn.open_table(SWEETS)?;
            let removed = table.remove(id)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(deleted)
    }

    /// Read, mutate and persist a sweet inside one write transaction.
    ///
    /// Returns `Ok(None)` if the id does not exist. If `mutate` fails the
    /// transaction is aborted and the stored record is left as it was.
    /// Because redb admits one writer at a time, no other write can land
    /// between the read and the write.
    pub fn modify_sweet<F, E>(&self, id: u64, mutate: F) -> Result<Option<Sweet>, E>
    where
        F: FnOnce(&mut Sweet) -> Result<(), E>,
        E: From<DatabaseError>,
    {
        let write_txn = self.begin_write()?;

        let Some(mut sweet) = read_sweet(&write_txn, id)? else {
            write_txn.abort().map_err(DatabaseError::from)?;
            return Ok(None);
        };

        if let Err(e) = mutate(&mut sweet) {
            write_txn.abort().map_err(DatabaseError::from)?;
            return Err(e);
        }

        write_sweet(&write_txn, &sweet)?;
        write_txn.commit().map_err(DatabaseError::from)?;
        Ok(Some(sweet))
    }
}

fn read_sweet(write_txn: &WriteTransaction, id: u64) -> Result<Option<Sweet>, DatabaseError> {
    let table = write_txn.open_table(SWEETS)?;
    let result = table.get(id)?;
    match result {
        Some(data) => Ok(Some(rmp_serde::from_slice(data.value())?)),
        None => Ok(None),
    }
}

fn write_sweet(write_txn: &WriteTransaction, sweet: &Sweet) -> Result<(), DatabaseError> {
    let mut table = write_txn.open_table(SWEETS)?;
    let data = rmp_serde::to_vec_named(sweet)?;
    table.insert(sweet.id, data.as_slice())?;
    Ok(())
}
