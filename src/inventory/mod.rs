//! Inventory manager: sweet records, the stock-quantity state machine and
//! filtered search.
//!
//! A sweet's quantity moves between non-negative integers. `purchase` is the
//! only guarded transition (blocked at zero); `restock` and `update` are
//! unguarded. Every mutation runs as a single store write transaction.

pub mod manager;
pub mod search;

pub use manager::{add, delete, get, get_all, purchase, restock, update, InventoryError};
pub use search::{search, SearchFilter};
