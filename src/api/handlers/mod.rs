mod auth;
mod health;
mod sweets;

use crate::api::response::ApiError;
use crate::inventory::InventoryError;

pub use auth::{login, register, CredentialsRequest, LoginResponse, RegisterResponse};
pub use health::health;
pub use sweets::{
    create_sweet, delete_sweet, get_sweet, list_sweets, purchase_sweet, restock_sweet,
    search_sweets, update_sweet, SweetRequest, SweetResponse,
};

/// Map an InventoryError to an ApiError
fn inventory_error(e: InventoryError) -> ApiError {
    match e {
        InventoryError::NotFound => ApiError::not_found("Sweet not found"),
        InventoryError::OutOfStock => ApiError::conflict("Sweet is out of stock"),
        InventoryError::ValidationFailed(message) => ApiError::bad_request(message),
        InventoryError::Database(e) => {
            tracing::error!(error = %e, "Inventory storage failure");
            ApiError::internal("Storage failure")
        }
    }
}
