//! 聊天 DTO
//!
//! 定义聊天相关的请求和响应数据结构。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::chat::Chat;
use crate::models::message::Message;

/// 创建聊天请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateChatRequest {
    /// 所属用户
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
}

/// 聊天列表查询参数
#[derive(Debug, Deserialize, Validate)]
pub struct ListChatsParams {
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
}

/// 发送消息请求
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
}

/// 发送消息响应
#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    /// 模型回复内容
    pub model_message: String,
    pub timestamp: i64,
}

/// 最近消息查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecentMessagesParams {
    pub limit: Option<usize>,
}

/// 聊天响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Chat> for ChatResponse {
    fn from(chat: Chat) -> Self {
        Self {
            id: chat.id,
            user_id: chat.user_id,
            created_at: chat.created_at,
            updated_at: chat.updated_at,
        }
    }
}

/// 消息列表响应
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageListResponse {
    pub messages: Vec<Message>,
    pub count: usize,
}

impl From<Vec<Message>> for MessageListResponse {
    fn from(messages: Vec<Message>) -> Self {
        Self {
            count: messages.len(),
            messages,
        }
    }
}
