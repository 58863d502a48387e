//! Marketing Content API 模块
//!
//! 审批流: draft → review → approved → published → archived，
//! review 可退回 draft。迁移全部走 action 接口。

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/marketing", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/submit", post(handler::submit))
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
        .route("/{id}/publish", post(handler::publish))
        .route("/{id}/archive", post(handler::archive))
}
