use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tiffin_shared::Masked;

/// Requested quantity per menu item name.
///
/// Ordered by name so the stored encoding of an order is stable.
pub type MenuItems = BTreeMap<String, u32>;

/// Postal address embedded in a user row, and the shape the catalog returns
/// for a restaurant's pickup location.
///
/// Missing fields decode as empty strings; use [`Address::is_complete`] to validate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(alias = "Street")]
    pub street: String,
    #[serde(alias = "City")]
    pub city: String,
    #[serde(alias = "State")]
    pub state: String,
    #[serde(alias = "Zipcode")]
    pub zipcode: String,
}

impl Address {
    /// Every field is required and must be non-empty.
    pub fn is_complete(&self) -> bool {
        !(self.street.is_empty()
            || self.city.is_empty()
            || self.state.is_empty()
            || self.zipcode.is_empty())
    }
}

/// A registered customer. The password is only ever held as a bcrypt hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub address: Address,
}

/// A user row waiting for the store to assign its id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub address: Address,
}

/// A placed order. `total_price` is a snapshot taken at creation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: i64,
    pub username: String,
    pub restaurant_id: String,
    pub menu_items: String,
    pub total_price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub username: String,
    pub restaurant_id: String,
    /// Item map as produced by [`encode_menu_items`]
    pub menu_items: String,
    pub total_price: Decimal,
}

/// Catalog entry, read-only from this service's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub restaurant_id: String,
    pub price: Decimal,
}

impl MenuItem {
    pub fn new(restaurant_id: &str, name: &str, price: Decimal) -> Self {
        Self {
            name: name.to_string(),
            restaurant_id: restaurant_id.to_string(),
            price,
        }
    }
}

/// Username and plaintext password recovered from request metadata.
/// Request-scoped; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Masked<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Masked::new(password.into()),
        }
    }
}

/// Encode an item map for the `orders.menu_items` column.
pub fn encode_menu_items(items: &MenuItems) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}
