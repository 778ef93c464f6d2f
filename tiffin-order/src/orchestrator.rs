use http::HeaderMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use tiffin_catalog::{PricingEngine, PricingError};
use tiffin_core::models::encode_menu_items;
use tiffin_core::{
    Address, CatalogRepository, Credentials, DeliveryRequest, DispatchOutcome, FulfillmentGateway,
    MenuItems, NewOrder, Order, OrderRepository, ServiceError, ServiceResult, User, UserRepository,
};
use tracing::{error, info, warn};

use crate::auth::PasswordHasher;
use crate::credentials::extract_credentials;
use crate::models::{CreateOrderRequest, CreateOrderResponse};

/// Runs OrderService.Create: credentials, user lookup, password check, pricing,
/// persistence, then (when a fulfillment service is configured) dispatch.
///
/// Every stage short-circuits the request on failure with an already-classified
/// [`ServiceError`]. An order that was persisted stays persisted even if dispatch
/// fails afterwards.
pub struct OrderOrchestrator {
    users: Arc<dyn UserRepository>,
    orders: Arc<dyn OrderRepository>,
    catalog: Arc<dyn CatalogRepository>,
    pricing: PricingEngine,
    fulfillment: Option<Arc<dyn FulfillmentGateway>>,
    hasher: PasswordHasher,
}

impl OrderOrchestrator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        orders: Arc<dyn OrderRepository>,
        catalog: Arc<dyn CatalogRepository>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            users,
            orders,
            pricing: PricingEngine::new(catalog.clone()),
            catalog,
            fulfillment: None,
            hasher,
        }
    }

    /// Enable the dispatch stage.
    pub fn with_fulfillment(mut self, gateway: Arc<dyn FulfillmentGateway>) -> Self {
        self.fulfillment = Some(gateway);
        self
    }

    pub async fn create_order(
        &self,
        metadata: &HeaderMap,
        request: CreateOrderRequest,
    ) -> ServiceResult<CreateOrderResponse> {
        let user = self.authenticate(metadata).await?;
        self.place_order(&user, request).await
    }

    /// Stages 1-3: credentials from request metadata, user lookup, password check.
    ///
    /// Transports call this before decoding the order body, so a request
    /// without credentials is always Unauthenticated.
    pub async fn authenticate(&self, metadata: &HeaderMap) -> ServiceResult<User> {
        let credentials = extract_credentials(metadata).ok_or_else(|| {
            warn!("Order rejected: missing or malformed credentials");
            ServiceError::unauthenticated("Credentials not found")
        })?;

        let user = self.lookup_user(&credentials.username).await?;
        self.verify_password(&user, &credentials).await?;
        Ok(user)
    }

    /// Remaining stages for an authenticated user.
    pub async fn place_order(
        &self,
        user: &User,
        request: CreateOrderRequest,
    ) -> ServiceResult<CreateOrderResponse> {
        // 4. Price it
        validate_items(&request.menu_items)?;
        let total_price = self.price(&request.restaurant_id, &request.menu_items).await?;

        // 5-6. Persist
        let order = self.persist(user, &request, total_price).await?;

        // 7. Hand off to fulfillment
        if let Some(gateway) = &self.fulfillment {
            self.dispatch(gateway.as_ref(), &order, &user.address).await?;
        }

        // 8. Echo back what was ordered, with the total as stored
        Ok(CreateOrderResponse {
            id: order.id,
            username: order.username,
            restaurant_id: order.restaurant_id,
            menu_items: request.menu_items,
            total_price: order.total_price,
        })
    }

    async fn lookup_user(&self, username: &str) -> ServiceResult<User> {
        match self.users.find_user_by_username(username).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                warn!("Order rejected: unknown user {}", username);
                Err(ServiceError::not_found(format!("user not found: {}", username)))
            }
            Err(e) => {
                // Reported as NotFound, same as an unknown user
                error!("User lookup for {} failed: {}", username, e);
                Err(ServiceError::not_found(format!("user not found: {}", e)))
            }
        }
    }

    async fn verify_password(&self, user: &User, credentials: &Credentials) -> ServiceResult<()> {
        let matches = self
            .hasher
            .verify_password(credentials.password.expose().clone(), user.password_hash.clone())
            .await
            .map_err(|e| {
                error!("Password check for {} failed: {}", user.username, e);
                ServiceError::internal("Error while decrypting password")
            })?;

        if !matches {
            warn!("Order rejected: wrong password for {}", user.username);
            return Err(ServiceError::invalid_argument(
                "Unauthorized: Invalid username or password",
            ));
        }
        Ok(())
    }

    async fn price(&self, restaurant_id: &str, items: &MenuItems) -> ServiceResult<Decimal> {
        self.pricing
            .calculate_total(restaurant_id, items)
            .await
            .map_err(|e| {
                warn!("Pricing failed for restaurant {}: {}", restaurant_id, e);
                match e {
                    PricingError::MenuItemNotFound { .. } => ServiceError::not_found(e.to_string()),
                    PricingError::Overflow { .. } | PricingError::Catalog(_) => {
                        ServiceError::unknown(e.to_string())
                    }
                }
            })
    }

    async fn persist(
        &self,
        user: &User,
        request: &CreateOrderRequest,
        total_price: Decimal,
    ) -> ServiceResult<Order> {
        let menu_items = encode_menu_items(&request.menu_items)
            .map_err(|e| ServiceError::unknown(e.to_string()))?;

        let order = self
            .orders
            .create_order(&NewOrder {
                username: user.username.clone(),
                restaurant_id: request.restaurant_id.clone(),
                menu_items,
                total_price,
            })
            .await
            .map_err(|e| {
                error!("Failed to store order for {}: {}", user.username, e);
                ServiceError::unknown(format!("error storing the order: {}", e))
            })?;

        info!(
            "Order {} placed by {} at restaurant {}: total {}",
            order.id, order.username, order.restaurant_id, order.total_price
        );
        Ok(order)
    }

    async fn dispatch(
        &self,
        gateway: &dyn FulfillmentGateway,
        order: &Order,
        drop_address: &Address,
    ) -> ServiceResult<()> {
        let pickup_address = match self.catalog.restaurant_address(&order.restaurant_id).await {
            Ok(Some(address)) => address,
            Ok(None) => {
                warn!(
                    "Order {} not dispatched: restaurant {} unknown",
                    order.id, order.restaurant_id
                );
                return Err(ServiceError::not_found(format!(
                    "NoSuchElementException: restaurant {} not found",
                    order.restaurant_id
                )));
            }
            Err(e) => {
                error!("Order {} not dispatched: address lookup failed: {}", order.id, e);
                return Err(ServiceError::internal(format!("Internal Server Error: {}", e)));
            }
        };

        let request = DeliveryRequest {
            order_id: order.id,
            drop_address: drop_address.clone(),
            pickup_address,
        };

        let outcome = gateway.submit_delivery(&request).await.map_err(|e| {
            error!("Order {} not dispatched: {}", order.id, e);
            ServiceError::internal(e.to_string())
        })?;

        match outcome {
            DispatchOutcome::Accepted => {
                info!("Order {} handed to fulfillment", order.id);
                Ok(())
            }
            DispatchOutcome::Other { status, body } => {
                info!("Order {} handed to fulfillment (status {}): {}", order.id, status, body);
                Ok(())
            }
            DispatchOutcome::Conflict(body) => {
                warn!("Order {} persisted but already assigned: {}", order.id, body);
                Err(ServiceError::aborted(format!("OrderAlreadyAssignedException: {}", body)))
            }
            DispatchOutcome::NotFound(body) => {
                warn!("Order {} persisted but no delivery agent nearby: {}", order.id, body);
                Err(ServiceError::not_found(format!(
                    "NoDeliveryExecutiveNearbyException: {}",
                    body
                )))
            }
            DispatchOutcome::InternalError(body) => {
                error!("Order {} persisted but fulfillment failed: {}", order.id, body);
                Err(ServiceError::internal(format!("Internal Server Error: {}", body)))
            }
        }
    }
}

/// An order needs at least one item, and every quantity must be positive.
fn validate_items(items: &MenuItems) -> ServiceResult<()> {
    if items.is_empty() {
        return Err(ServiceError::invalid_argument("order must contain at least one menu item"));
    }
    if let Some((name, _)) = items.iter().find(|(_, quantity)| **quantity == 0) {
        return Err(ServiceError::invalid_argument(format!(
            "quantity for menu item '{}' must be positive",
            name
        )));
    }
    Ok(())
}
