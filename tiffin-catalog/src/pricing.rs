use rust_decimal::Decimal;
use std::sync::Arc;
use tiffin_core::{CatalogError, CatalogRepository, MenuItems};
use tracing::debug;

/// Pricing failures
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("menu item '{item}' not found for restaurant '{restaurant_id}'")]
    MenuItemNotFound {
        restaurant_id: String,
        item: String,
    },

    #[error("order total for restaurant '{restaurant_id}' overflows at menu item '{item}'")]
    Overflow {
        restaurant_id: String,
        item: String,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Resolves unit prices from a catalog and totals an order.
#[derive(Clone)]
pub struct PricingEngine {
    catalog: Arc<dyn CatalogRepository>,
}

impl PricingEngine {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    /// Sum of `unit price * quantity` over every requested item.
    ///
    /// Each item is looked up independently; the first missing item or catalog
    /// failure aborts the whole calculation.
    pub async fn calculate_total(
        &self,
        restaurant_id: &str,
        items: &MenuItems,
    ) -> Result<Decimal, PricingError> {
        let mut total = Decimal::ZERO;

        for (name, quantity) in items {
            let unit_price = self
                .catalog
                .menu_item_price(restaurant_id, name)
                .await?
                .ok_or_else(|| PricingError::MenuItemNotFound {
                    restaurant_id: restaurant_id.to_string(),
                    item: name.clone(),
                })?;

            // Price and quantity are both external input
            let line_total = unit_price
                .checked_mul(Decimal::from(*quantity))
                .ok_or_else(|| overflow(restaurant_id, name))?;
            debug!("Priced {} x {} at {} = {}", quantity, name, unit_price, line_total);
            total = total
                .checked_add(line_total)
                .ok_or_else(|| overflow(restaurant_id, name))?;
        }

        Ok(total)
    }
}

fn overflow(restaurant_id: &str, item: &str) -> PricingError {
    PricingError::Overflow {
        restaurant_id: restaurant_id.to_string(),
        item: item.to_string(),
    }
}
