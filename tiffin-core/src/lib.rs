pub mod models;
pub mod repository;
pub mod fulfillment;

use serde::Serialize;
use std::fmt;

pub use models::{Address, Credentials, MenuItem, MenuItems, NewOrder, NewUser, Order, User};
pub use repository::{CatalogError, CatalogRepository, OrderRepository, StoreError, UserRepository};
pub use fulfillment::{DeliveryRequest, DispatchError, DispatchOutcome, FulfillmentGateway};

/// Classification every failure is reduced to before it leaves a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing or malformed credentials
    Unauthenticated,
    /// Unknown user, menu item, restaurant, or no delivery agent
    NotFound,
    /// Bad registration fields, bad order payload, or wrong password
    InvalidArgument,
    /// Hashing failures and malformed downstream responses
    Internal,
    /// Downstream conflict
    Aborted,
    /// Generic persistence or pricing failure
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unauthenticated => "UNAUTHENTICATED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::Internal => "INTERNAL",
            ErrorCode::Aborted => "ABORTED",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure plus the human-readable message returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ServiceError {
    pub code: ErrorCode,
    pub message: String,
}

impl ServiceError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthenticated, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    pub fn aborted(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Aborted, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unknown, message)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        let err = ServiceError::aborted("OrderAlreadyAssignedException: taken");
        assert_eq!(err.to_string(), "ABORTED: OrderAlreadyAssignedException: taken");
        assert_eq!(err.code, ErrorCode::Aborted);
    }

    #[test]
    fn test_error_code_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorCode::InvalidArgument).unwrap();
        assert_eq!(json, "\"INVALID_ARGUMENT\"");
    }
}
