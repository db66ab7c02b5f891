//! API routes module

pub mod channels;
pub mod chat;
pub mod settings;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Channel routes
        .nest("/channels", channels::router())
        // Chat routes
        .nest("/chat", chat::router())
        // Settings routes
        .nest("/settings", settings::router())
}
