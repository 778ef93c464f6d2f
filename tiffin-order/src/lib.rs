pub mod auth;
pub mod credentials;
pub mod fulfillment;
pub mod models;
pub mod orchestrator;
pub mod registration;

pub use auth::{AuthError, PasswordHasher};
pub use credentials::extract_credentials;
pub use fulfillment::HttpFulfillmentGateway;
pub use models::{
    CreateOrderRequest, CreateOrderResponse, RegisterUserRequest, RegisterUserResponse,
};
pub use orchestrator::OrderOrchestrator;
pub use registration::{UserRegistrar, REGISTERED_MESSAGE};
