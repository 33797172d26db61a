//! 聊天服务
//!
//! 管理聊天记录，并通过会话聚合读写每个聊天的消息。
//! 聊天 `c` 的消息存放在键为 `(c.user_id, c.id)` 的会话文档中。

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::chat::Chat;
use crate::models::conversation::ConversationSummary;
use crate::models::message::{Message, SenderKind};
use crate::services::conversation::Conversation;
use crate::services::reply::ReplyGenerator;
use crate::storage::message_store::MessageStore;
use crate::storage::repository::ChatRepository;

/// 聊天详情：记录 + 完整消息列表
#[derive(Debug, Clone, Serialize)]
pub struct ChatTranscript {
    #[serde(flatten)]
    pub chat: Chat,
    pub messages: Vec<Message>,
}

/// 一次收发的结果
#[derive(Debug, Clone)]
pub struct ExchangeResult {
    pub user_message: Message,
    pub model_message: Message,
}

/// 聊天服务 trait
#[async_trait]
pub trait ChatService: Send + Sync {
    /// 为用户创建聊天
    async fn create(&self, user_id: &str) -> Result<Chat>;

    /// 获取聊天及其全部消息
    async fn get(&self, chat_id: &str) -> Result<ChatTranscript>;

    /// 列出用户的聊天，最新的在前
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Chat>>;

    /// 发送消息并生成回复
    async fn send_message(
        &self,
        chat_id: &str,
        user_id: &str,
        content: &str,
    ) -> Result<ExchangeResult>;

    /// 最近的消息，`limit` 缺省为窗口大小
    async fn recent_messages(&self, chat_id: &str, limit: Option<usize>) -> Result<Vec<Message>>;

    /// 会话摘要
    async fn summary(&self, chat_id: &str) -> Result<ConversationSummary>;

    /// 删除聊天及其会话文档
    async fn delete(&self, chat_id: &str) -> Result<bool>;
}

/// 去掉首尾空白，空 ID 视为参数错误
fn normalize_user_id(user_id: &str) -> Result<&str> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::Validation("user_id is required".to_string()));
    }
    Ok(user_id)
}

/// 聊天服务实现
pub struct ChatServiceImpl {
    chats: Arc<dyn ChatRepository>,
    messages: Arc<dyn MessageStore>,
    replies: Arc<dyn ReplyGenerator>,
    window_size: usize,
}

impl ChatServiceImpl {
    pub fn new(
        chats: Arc<dyn ChatRepository>,
        messages: Arc<dyn MessageStore>,
        replies: Arc<dyn ReplyGenerator>,
        window_size: usize,
    ) -> Self {
        Self {
            chats,
            messages,
            replies,
            window_size,
        }
    }

    async fn require_chat(&self, chat_id: &str) -> Result<Chat> {
        self.chats
            .get_by_id(chat_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Chat not found: {}", chat_id)))
    }

    fn conversation(&self, chat: &Chat) -> Conversation {
        Conversation::new(
            self.messages.clone(),
            chat.conversation_key(),
            self.window_size,
        )
    }
}

#[async_trait]
impl ChatService for ChatServiceImpl {
    async fn create(&self, user_id: &str) -> Result<Chat> {
        let user_id = normalize_user_id(user_id)?;
        let chat = self.chats.create(&Chat::new(user_id)).await?;
        tracing::info!(chat_id = %chat.id, user_id = %chat.user_id, "chat created");
        Ok(chat)
    }

    async fn get(&self, chat_id: &str) -> Result<ChatTranscript> {
        let chat = self.require_chat(chat_id).await?;
        let messages = self
            .messages
            .read_full(&chat.conversation_key())
            .await?
            .map(|stored| stored.messages)
            .unwrap_or_default();
        Ok(ChatTranscript { chat, messages })
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Chat>> {
        self.chats.list_by_user(normalize_user_id(user_id)?).await
    }

    async fn send_message(
        &self,
        chat_id: &str,
        user_id: &str,
        content: &str,
    ) -> Result<ExchangeResult> {
        let user_id = normalize_user_id(user_id)?;
        if content.trim().is_empty() {
            return Err(AppError::Validation("content must not be empty".to_string()));
        }

        let chat = self.require_chat(chat_id).await?;
        if chat.user_id != user_id {
            // 不暴露他人聊天的存在
            return Err(AppError::NotFound(format!("Chat not found: {}", chat_id)));
        }

        let mut conversation = self.conversation(&chat);
        let user_message = conversation
            .append(SenderKind::Human, content, None)
            .await?;

        let context = conversation.messages_as_strings().await?;
        let reply = self.replies.generate(&context).await?;
        let model_message = conversation
            .append(SenderKind::Ai, &reply.content, reply.tool_use)
            .await?;

        self.chats.touch(&chat.id).await?;
        tracing::debug!(key = %conversation.key(), "exchange stored");

        Ok(ExchangeResult {
            user_message,
            model_message,
        })
    }

    async fn recent_messages(&self, chat_id: &str, limit: Option<usize>) -> Result<Vec<Message>> {
        let chat = self.require_chat(chat_id).await?;
        self.conversation(&chat).recent_messages(limit).await
    }

    async fn summary(&self, chat_id: &str) -> Result<ConversationSummary> {
        let chat = self.require_chat(chat_id).await?;
        self.conversation(&chat).summary().await
    }

    async fn delete(&self, chat_id: &str) -> Result<bool> {
        let Some(chat) = self.chats.get_by_id(chat_id).await? else {
            return Ok(false);
        };
        self.messages.delete(&chat.conversation_key()).await?;
        let deleted = self.chats.delete(chat_id).await?;
        tracing::info!(chat_id = %chat_id, "chat deleted");
        Ok(deleted)
    }
}

/// 创建聊天服务
pub fn create_chat_service(
    chats: Arc<dyn ChatRepository>,
    messages: Arc<dyn MessageStore>,
    replies: Arc<dyn ReplyGenerator>,
    window_size: usize,
) -> Arc<dyn ChatService> {
    Arc::new(ChatServiceImpl::new(chats, messages, replies, window_size))
}
