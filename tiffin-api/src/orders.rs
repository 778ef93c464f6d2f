use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use tiffin_order::{CreateOrderRequest, CreateOrderResponse};
use crate::{error::AppError, state::OrderServiceState};

pub fn routes() -> Router<OrderServiceState> {
    Router::new().route("/v1/orders", post(create_order))
}

/// Credentials come from the `authorization` header and are checked before the
/// body is decoded.
async fn create_order(
    State(state): State<OrderServiceState>,
    headers: HeaderMap,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>, AppError> {
    let user = state.orchestrator.authenticate(&headers).await?;
    let Json(request) = payload?;
    let response = state.orchestrator.place_order(&user, request).await?;
    Ok(Json(response))
}
