use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use tiffin_catalog::http::read_body;
use tiffin_core::{DeliveryRequest, DispatchError, DispatchOutcome, FulfillmentGateway};
use tracing::debug;

/// Posts delivery requests to the fulfillment service's deliveries endpoint.
pub struct HttpFulfillmentGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpFulfillmentGateway {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl FulfillmentGateway for HttpFulfillmentGateway {
    async fn submit_delivery(
        &self,
        request: &DeliveryRequest,
    ) -> Result<DispatchOutcome, DispatchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        debug!("Fulfillment service answered {} for order {}", response.status(), request.order_id);
        Ok(classify(response).await)
    }
}

async fn classify(response: Response) -> DispatchOutcome {
    match response.status() {
        StatusCode::CONFLICT => DispatchOutcome::Conflict(read_body(response).await),
        StatusCode::NOT_FOUND => DispatchOutcome::NotFound(read_body(response).await),
        StatusCode::INTERNAL_SERVER_ERROR => {
            DispatchOutcome::InternalError(read_body(response).await)
        }
        status if status.is_success() => DispatchOutcome::Accepted,
        status => DispatchOutcome::Other {
            status: status.as_u16(),
            body: read_body(response).await,
        },
    }
}
