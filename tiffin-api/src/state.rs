use std::sync::Arc;
use tiffin_order::{OrderOrchestrator, UserRegistrar};

/// State behind the user listener.
#[derive(Clone)]
pub struct UserServiceState {
    pub registrar: Arc<UserRegistrar>,
}

/// State behind the order listener. Shares nothing in memory with the user side.
#[derive(Clone)]
pub struct OrderServiceState {
    pub orchestrator: Arc<OrderOrchestrator>,
}
