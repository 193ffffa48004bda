use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Argon2id PHC string
    pub password_hash: String,
    pub role: String,
    /// Unique login name
    pub username: String,
}

/// A sweet in the shop's inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sweet {
    pub category: String,
    /// Store-assigned identifier, never reused
    pub id: u64,
    pub name: String,
    pub price: Decimal,
    /// Units in stock. Unsigned, so stock can never go negative.
    pub quantity: u32,
}

/// The mutable fields of a sweet, used for creation and full replacement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweetData {
    pub category: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl SweetData {
    pub fn into_sweet(self, id: u64) -> Sweet {
        Sweet {
            category: self.category,
            id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
        }
    }
}

impl Sweet {
    /// Overwrite every mutable field, keeping the id.
    pub fn replace_with(&mut self, data: SweetData) {
        self.category = data.category;
        self.name = data.name;
        self.price = data.price;
        self.quantity = data.quantity;
    }
}
