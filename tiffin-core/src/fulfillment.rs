use async_trait::async_trait;
use serde::Serialize;
use crate::models::Address;

/// Payload sent to the fulfillment service when an order needs a delivery agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRequest {
    pub order_id: i64,
    pub drop_address: Address,
    pub pickup_address: Address,
}

/// How the fulfillment service answered a delivery request.
///
/// The string payloads carry the response body (or a note that it could not be read).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Accepted,
    /// The order already has an agent assigned
    Conflict(String),
    /// No delivery agent near the pickup address
    NotFound(String),
    InternalError(String),
    /// Any other status; treated like success by callers
    Other { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("fulfillment service unreachable: {0}")]
    Transport(String),
}

#[async_trait]
pub trait FulfillmentGateway: Send + Sync {
    /// Submit one delivery request. Exactly one call to the downstream service, no retry.
    async fn submit_delivery(
        &self,
        request: &DeliveryRequest,
    ) -> Result<DispatchOutcome, DispatchError>;
}
