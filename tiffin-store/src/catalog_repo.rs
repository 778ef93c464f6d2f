use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tiffin_core::{Address, CatalogError, CatalogRepository};
use crate::database::map_sqlx_error;

/// Catalog lookups straight against the catalog service's database.
///
/// Read-only; expects `menu_items(restaurant_id, name, price)` and
/// `restaurants(id, street, city, state, zipcode)`.
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AddressRow {
    street: String,
    city: String,
    state: String,
    zipcode: String,
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn menu_item_price(
        &self,
        restaurant_id: &str,
        item_name: &str,
    ) -> Result<Option<Decimal>, CatalogError> {
        let price = sqlx::query_scalar::<_, Decimal>(
            "SELECT price FROM menu_items WHERE restaurant_id = $1 AND name = $2",
        )
        .bind(restaurant_id)
        .bind(item_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(price)
    }

    async fn restaurant_address(
        &self,
        restaurant_id: &str,
    ) -> Result<Option<Address>, CatalogError> {
        let row = sqlx::query_as::<_, AddressRow>(
            "SELECT street, city, state, zipcode FROM restaurants WHERE id = $1",
        )
        .bind(restaurant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|r| Address {
            street: r.street,
            city: r.city,
            state: r.state,
            zipcode: r.zipcode,
        }))
    }
}
