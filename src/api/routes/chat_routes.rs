//! Chat Routes
//!
//! 定义聊天相关的 API 路由。

use crate::api::handlers::chat_handler::*;
use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::api::app_state::AppState;

/// 创建聊天路由器
pub fn create_chat_router() -> Router<AppState> {
    Router::new()
        .route("/chats", post(create_chat))
        .route("/chats", get(list_chats))
        .route("/chats/:chat_id", get(get_chat))
        .route("/chats/:chat_id", delete(delete_chat))
        .route("/chats/:chat_id/messages", post(send_message))
        .route("/chats/:chat_id/messages", get(recent_messages))
        .route("/chats/:chat_id/summary", get(chat_summary))
}
