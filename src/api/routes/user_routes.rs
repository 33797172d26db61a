//! User Routes

use crate::api::handlers::user_handler::*;
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::api::app_state::AppState;

/// 创建用户路由器
pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users", get(find_user))
        .route("/users/:id", get(get_user))
        .route("/users/:id", delete(delete_user))
        .route("/users/:id/concentration", patch(update_concentration))
        .route("/users/:id/certificates", patch(update_certificates))
}
