use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::message::Message;

/// 会话键：(所有者, 会话) 二元组
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey {
    /// 所有者标识
    pub uuid: String,
    /// 会话标识
    pub session_id: String,
}

impl ConversationKey {
    pub fn new(uuid: &str, session_id: &str) -> Self {
        Self {
            uuid: uuid.to_string(),
            session_id: session_id.to_string(),
        }
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.uuid, self.session_id)
    }
}

/// 持久化的会话文档
///
/// 每个会话一个文档，`messages` 只追加不修改。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredConversation {
    pub uuid: String,
    pub session_id: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub last_updated: i64,
}

impl StoredConversation {
    /// 以首条消息创建文档
    pub fn first(key: &ConversationKey, message: Message) -> Self {
        Self {
            uuid: key.uuid.clone(),
            session_id: key.session_id.clone(),
            last_updated: message.timestamp,
            messages: vec![message],
        }
    }

    /// 追加消息并刷新 last_updated
    pub fn push(&mut self, message: Message) {
        self.last_updated = message.timestamp;
        self.messages.push(message);
    }

    /// 最后 `limit` 条消息
    pub fn tail(&self, limit: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(limit);
        &self.messages[start..]
    }
}

/// 会话摘要
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationSummary {
    pub message_count: usize,
    pub last_updated: Option<i64>,
    pub uuid: String,
    pub session_id: String,
}

impl ConversationSummary {
    pub fn from_stored(key: &ConversationKey, stored: Option<&StoredConversation>) -> Self {
        Self {
            message_count: stored.map(|c| c.messages.len()).unwrap_or(0),
            last_updated: stored.map(|c| c.last_updated),
            uuid: key.uuid.clone(),
            session_id: key.session_id.clone(),
        }
    }
}
