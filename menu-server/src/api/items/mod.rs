//! Menu Item API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/items", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // list-edit: price / sort_order / is_active
        .route("/", get(handler::list).post(handler::create).patch(handler::bulk_edit))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
