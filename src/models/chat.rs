use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::conversation::ConversationKey;

/// 聊天记录
///
/// 聊天的消息存放在以 (user_id, chat id) 为键的会话文档中。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chat {
    /// 聊天唯一标识
    pub id: String,

    /// 所属用户
    pub user_id: String,

    /// 创建时间
    pub created_at: DateTime<Utc>,

    /// 最后活跃时间
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// 创建新聊天
    pub fn new(user_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 对应的会话键
    pub fn conversation_key(&self) -> ConversationKey {
        ConversationKey::new(&self.user_id, &self.id)
    }

    /// 更新最后活跃时间
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_conversation_key() {
        let chat = Chat::new("user_1");
        let key = chat.conversation_key();
        assert_eq!(key.uuid, "user_1");
        assert_eq!(key.session_id, chat.id);
        assert_eq!(chat.created_at, chat.updated_at);
    }
}
