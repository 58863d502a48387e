//! POS Reconciliation API 模块

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reconciliations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/generate", post(handler::generate))
        .route("/{month}", get(handler::get_by_month))
        .route("/{month}/close", post(handler::close))
}
