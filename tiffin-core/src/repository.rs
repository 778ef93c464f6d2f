use async_trait::async_trait;
use rust_decimal::Decimal;
use crate::models::{Address, NewOrder, NewUser, Order, User};

/// Failures raised by the persistent store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(String),
}

/// Failures raised by a catalog source. A missing item or restaurant is not an
/// error here; lookups return `Ok(None)` for that.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog responded with status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("catalog unreachable: {0}")]
    Transport(String),

    #[error("malformed catalog response: {0}")]
    Decode(String),

    #[error("catalog query failed: {0}")]
    Store(#[from] StoreError),
}

/// Repository trait for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; the store assigns the id. A taken username is `StoreError::Conflict`.
    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError>;

    /// `Ok(None)` when no such user exists; `Err` only for infrastructure faults.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}

/// Repository trait for placed orders. Orders are insert-only.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, StoreError>;
}

/// Read-only access to restaurant menus and addresses.
///
/// Implemented both by a remote HTTP catalog service and by a direct query
/// against the catalog database.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Current unit price of `item_name` on `restaurant_id`'s menu.
    async fn menu_item_price(
        &self,
        restaurant_id: &str,
        item_name: &str,
    ) -> Result<Option<Decimal>, CatalogError>;

    /// Pickup address of the restaurant.
    async fn restaurant_address(
        &self,
        restaurant_id: &str,
    ) -> Result<Option<Address>, CatalogError>;
}
