use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tiffin_order::{RegisterUserRequest, RegisterUserResponse};
use crate::{error::AppError, state::UserServiceState};

pub fn routes() -> Router<UserServiceState> {
    Router::new().route("/v1/users/register", post(register_user))
}

async fn register_user(
    State(state): State<UserServiceState>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<Json<RegisterUserResponse>, AppError> {
    let Json(request) = payload?;
    let response = state.registrar.register(request).await?;
    Ok(Json(response))
}
