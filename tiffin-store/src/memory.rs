use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tiffin_core::{
    Address, CatalogError, CatalogRepository, MenuItem, NewOrder, NewUser, Order,
    OrderRepository, StoreError, User, UserRepository,
};
use tokio::sync::RwLock;

/// Users, orders and a catalog held in process memory.
///
/// Same contracts as the Postgres repositories (store-assigned ids, unique
/// usernames). Use `set_unavailable` to make every call fail like a dead database.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>,
    orders: Vec<Order>,
    menu: HashMap<(String, String), Decimal>,
    restaurants: HashMap<String, Address>,
    last_user_id: i64,
    last_order_id: i64,
    unavailable: bool,
}

impl Inner {
    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Database("connection refused".to_string()));
        }
        Ok(())
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_menu_item(&self, item: MenuItem) {
        let mut inner = self.inner.write().await;
        inner.menu.insert((item.restaurant_id, item.name), item.price);
    }

    pub async fn add_restaurant(&self, restaurant_id: &str, address: Address) {
        let mut inner = self.inner.write().await;
        inner.restaurants.insert(restaurant_id.to_string(), address);
    }

    pub async fn set_unavailable(&self, unavailable: bool) {
        self.inner.write().await.unavailable = unavailable;
    }

    /// Snapshot of every persisted order, oldest first.
    pub async fn orders(&self) -> Vec<Order> {
        self.inner.read().await.orders.clone()
    }

    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check_available()?;

        if inner.users.contains_key(&user.username) {
            return Err(StoreError::Conflict(format!(
                "duplicate key value violates unique constraint \"users_username_key\": {}",
                user.username
            )));
        }

        inner.last_user_id += 1;
        let created = User {
            id: inner.last_user_id,
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            address: user.address.clone(),
        };
        inner.users.insert(created.username.clone(), created.clone());
        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        inner.check_available()?;
        Ok(inner.users.get(username).cloned())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check_available()?;

        inner.last_order_id += 1;
        let created = Order {
            id: inner.last_order_id,
            username: order.username.clone(),
            restaurant_id: order.restaurant_id.clone(),
            menu_items: order.menu_items.clone(),
            total_price: order.total_price,
        };
        inner.orders.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl CatalogRepository for InMemoryStore {
    async fn menu_item_price(
        &self,
        restaurant_id: &str,
        item_name: &str,
    ) -> Result<Option<Decimal>, CatalogError> {
        let inner = self.inner.read().await;
        inner.check_available()?;
        Ok(inner
            .menu
            .get(&(restaurant_id.to_string(), item_name.to_string()))
            .copied())
    }

    async fn restaurant_address(
        &self,
        restaurant_id: &str,
    ) -> Result<Option<Address>, CatalogError> {
        let inner = self.inner.read().await;
        inner.check_available()?;
        Ok(inner.restaurants.get(restaurant_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "$2b$04$hash".to_string(),
            address: Address {
                street: "1 Main".to_string(),
                city: "X".to_string(),
                state: "Y".to_string(),
                zipcode: "00000".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_user_ids_assigned_and_usernames_unique() {
        let store = InMemoryStore::new();

        let alice = store.create_user(&new_user("alice")).await.unwrap();
        let bob = store.create_user(&new_user("bob")).await.unwrap();
        assert_eq!(alice.id, 1);
        assert_eq!(bob.id, 2);

        let dup = store.create_user(&new_user("alice")).await;
        assert!(matches!(dup, Err(StoreError::Conflict(_))));
        assert_eq!(store.user_count().await, 2);
    }

    #[tokio::test]
    async fn test_find_user() {
        let store = InMemoryStore::new();
        store.create_user(&new_user("alice")).await.unwrap();

        assert!(store.find_user_by_username("alice").await.unwrap().is_some());
        assert!(store.find_user_by_username("mallory").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_orders_persisted_in_sequence() {
        let store = InMemoryStore::new();
        let order = NewOrder {
            username: "alice".to_string(),
            restaurant_id: "r1".to_string(),
            menu_items: r#"{"burger":2}"#.to_string(),
            total_price: Decimal::new(1700, 2),
        };

        let first = store.create_order(&order).await.unwrap();
        let second = store.create_order(&order).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.orders().await.len(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = InMemoryStore::new();
        store.set_unavailable(true).await;

        assert!(matches!(
            store.find_user_by_username("alice").await,
            Err(StoreError::Database(_))
        ));
        assert!(matches!(
            store.menu_item_price("r1", "burger").await,
            Err(CatalogError::Store(StoreError::Database(_)))
        ));
    }

    #[tokio::test]
    async fn test_catalog_lookups() {
        let store = InMemoryStore::new();
        store.add_menu_item(MenuItem::new("r1", "burger", Decimal::new(850, 2))).await;
        store.add_restaurant("r1", Address::default()).await;

        assert_eq!(
            store.menu_item_price("r1", "burger").await.unwrap(),
            Some(Decimal::new(850, 2))
        );
        assert_eq!(store.menu_item_price("r2", "burger").await.unwrap(), None);
        assert!(store.restaurant_address("r1").await.unwrap().is_some());
    }
}
