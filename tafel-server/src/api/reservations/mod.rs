//! Reservation API 模块
//!
//! CRUD + 状态动作 (confirm / arrive / complete / no-show / cancel)。
//! 状态迁移不走 update，避免绕过状态机。

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes())
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
        .route("/{id}/confirm", post(handler::confirm))
        .route("/{id}/arrive", post(handler::arrive))
        .route("/{id}/complete", post(handler::complete))
        .route("/{id}/no-show", post(handler::no_show))
        .route("/{id}/cancel", post(handler::cancel))
}
