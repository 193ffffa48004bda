use rust_decimal::Decimal;
use thiserror::Error;

use crate::storage::models::{Sweet, SweetData};
use crate::storage::{Database, DatabaseError};

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Sweet not found")]
    NotFound,
    #[error("Out of stock")]
    OutOfStock,
    #[error("{0}")]
    ValidationFailed(String),
}

/// Store a new sweet and return it with its assigned id
pub fn add(db: &Database, data: SweetData) -> Result<Sweet, InventoryError> {
    let data = validate_sweet_data(data)?;
    let sweet = db.insert_sweet(data)?;
    tracing::debug!(id = sweet.id, name = %sweet.name, "Added sweet");
    Ok(sweet)
}

pub fn get(db: &Database, id: u64) -> Result<Sweet, InventoryError> {
    db.get_sweet(id)?.ok_or(InventoryError::NotFound)
}

/// All sweets, in ascending id order
pub fn get_all(db: &Database) -> Result<Vec<Sweet>, InventoryError> {
    Ok(db.get_all_sweets()?)
}

/// Replace every mutable field of a sweet, quantity included.
pub fn update(db: &Database, id: u64, data: SweetData) -> Result<Sweet, InventoryError> {
    let data = validate_sweet_data(data)?;
    let sweet = db
        .modify_sweet(id, |sweet| {
            sweet.replace_with(data);
            Ok::<(), InventoryError>(())
        })?
        .ok_or(InventoryError::NotFound)?;

    tracing::debug!(id, "Updated sweet");
    Ok(sweet)
}

pub fn delete(db: &Database, id: u64) -> Result<(), InventoryError> {
    if !db.delete_sweet(id)? {
        return Err(InventoryError::NotFound);
    }
    tracing::debug!(id, "Deleted sweet");
    Ok(())
}

/// Sell one unit.
///
/// The stock check and the decrement happen in the same write transaction,
/// so of two concurrent purchases against the last unit exactly one succeeds
/// and the other sees `OutOfStock`.
pub fn purchase(db: &Database, id: u64) -> Result<Sweet, InventoryError> {
    let sweet = db
        .modify_sweet(id, |sweet| -> Result<(), InventoryError> {
            if sweet.quantity == 0 {
                return Err(InventoryError::OutOfStock);
            }
            sweet.quantity -= 1;
            Ok(())
        })?
        .ok_or(InventoryError::NotFound)?;

    tracing::debug!(id, remaining = sweet.quantity, "Purchased sweet");
    Ok(sweet)
}

/// Add `qty` units to stock. `qty` comes straight from the caller and must be
/// at least 1; decrements only happen through `purchase`.
pub fn restock(db: &Database, id: u64, qty: i64) -> Result<Sweet, InventoryError> {
    if qty < 1 {
        return Err(InventoryError::ValidationFailed(
            "qty must be a positive integer".to_string(),
        ));
    }
    let qty = u32::try_from(qty).map_err(|_| quantity_overflow())?;

    let sweet = db
        .modify_sweet(id, |sweet| -> Result<(), InventoryError> {
            sweet.quantity = sweet
                .quantity
                .checked_add(qty)
                .ok_or_else(quantity_overflow)?;
            Ok(())
        })?
        .ok_or(InventoryError::NotFound)?;

    tracing::debug!(id, added = qty, quantity = sweet.quantity, "Restocked sweet");
    Ok(sweet)
}

fn quantity_overflow() -> InventoryError {
    InventoryError::ValidationFailed(format!(
        "restock would exceed the maximum quantity of {}",
        u32::MAX
    ))
}

fn validate_sweet_data(mut data: SweetData) -> Result<SweetData, InventoryError> {
    data.name = data.name.trim().to_string();
    data.category = data.category.trim().to_string();

    if data.name.is_empty() {
        return Err(InventoryError::ValidationFailed(
            "name is required".to_string(),
        ));
    }
    if data.category.is_empty() {
        return Err(InventoryError::ValidationFailed(
            "category is required".to_string(),
        ));
    }
    if data.price < Decimal::ZERO {
        return Err(InventoryError::ValidationFailed(
            "price must not be negative".to_string(),
        ));
    }
    Ok(data)
}
