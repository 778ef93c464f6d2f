use axum::Router;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod orders;
pub mod state;
pub mod users;

pub use error::AppError;
pub use state::{OrderServiceState, UserServiceState};

/// UserService router.
pub fn user_app(state: UserServiceState) -> Router {
    Router::new()
        .merge(users::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// OrderService router.
pub fn order_app(state: OrderServiceState) -> Router {
    Router::new()
        .merge(orders::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
