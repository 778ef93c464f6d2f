use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tiffin_core::{NewOrder, Order, OrderRepository, StoreError};
use crate::database::map_sqlx_error;

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    restaurant_id: String,
    username: String,
    total_price: Decimal,
    menu_items: String,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.id,
            username: row.username,
            restaurant_id: row.restaurant_id,
            menu_items: row.menu_items,
            total_price: row.total_price,
        }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO orders (restaurant_id, username, total_price, menu_items)
            VALUES ($1, $2, $3, $4)
            RETURNING id, restaurant_id, username, total_price, menu_items
            "#,
        )
        .bind(&order.restaurant_id)
        .bind(&order.username)
        .bind(order.total_price)
        .bind(&order.menu_items)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(row.into())
    }
}
