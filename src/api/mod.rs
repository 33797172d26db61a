//! API 模块
//!
//! 提供 REST API 支持。

#[cfg(test)]
mod api_tests;
pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use crate::api::app_state::AppState;
use crate::observability::metrics_middleware;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::chat_routes::create_chat_router())
        .merge(routes::user_routes::create_user_router())
        .merge(routes::course_routes::create_course_router());

    Router::new()
        .nest("/api/v1", api)
        .layer(axum::middleware::from_fn_with_state(
            app_state.metrics.clone(),
            metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
