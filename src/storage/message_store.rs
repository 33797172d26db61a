//! 消息存储适配器
//!
//! 每个会话对应一个文档，以 (uuid, session_id) 为键，
//! `messages` 数组只追加，`last_updated` 随每次追加刷新。
//! 存储失败一律转为带键的 [`AppError::Storage`]，不重试。

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::conversation::{ConversationKey, StoredConversation};
use crate::models::message::Message;
use crate::storage::surrealdb::SurrealPool;

/// 消息存储 trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// 原子追加：文档不存在时以单元素数组创建
    async fn append_message(&self, key: &ConversationKey, message: &Message) -> Result<()>;

    /// 读取最后 `limit` 条消息，文档不存在时返回空
    async fn read_tail(&self, key: &ConversationKey, limit: usize) -> Result<Vec<Message>>;

    /// 读取完整文档
    async fn read_full(&self, key: &ConversationKey) -> Result<Option<StoredConversation>>;

    /// 删除会话文档，返回是否存在
    async fn delete(&self, key: &ConversationKey) -> Result<bool>;
}

/// SurrealDB 消息存储
///
/// 记录 ID 为 `conversation:[uuid, session_id]`。
#[derive(Clone)]
pub struct SurrealMessageStore {
    pool: SurrealPool,
}

impl SurrealMessageStore {
    pub fn new(pool: SurrealPool) -> Self {
        Self { pool }
    }
}

const APPEND_QUERY: &str = "
    UPSERT type::thing('conversation', [$uuid, $session_id]) SET
        uuid = $uuid,
        session_id = $session_id,
        messages = array::append(messages ?? [], $message),
        last_updated = $timestamp
    RETURN NONE
";

const TAIL_QUERY: &str = "
    SELECT VALUE array::slice(messages, math::max([0, array::len(messages) - $limit]))
    FROM type::thing('conversation', [$uuid, $session_id])
";

const FULL_QUERY: &str = "
    SELECT uuid, session_id, messages, last_updated
    FROM type::thing('conversation', [$uuid, $session_id])
";

const DELETE_QUERY: &str = "
    DELETE type::thing('conversation', [$uuid, $session_id]) RETURN BEFORE
";

#[async_trait]
impl MessageStore for SurrealMessageStore {
    async fn append_message(&self, key: &ConversationKey, message: &Message) -> Result<()> {
        self.pool
            .db()
            .query(APPEND_QUERY)
            .bind(("uuid", key.uuid.clone()))
            .bind(("session_id", key.session_id.clone()))
            .bind(("message", message.clone()))
            .bind(("timestamp", message.timestamp))
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::storage(key, e))?;

        tracing::debug!(key = %key, "message appended");
        Ok(())
    }

    async fn read_tail(&self, key: &ConversationKey, limit: usize) -> Result<Vec<Message>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        // 超出 i64 的 limit 等价于取全部
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let tails: Vec<Vec<Message>> = self
            .pool
            .db()
            .query(TAIL_QUERY)
            .bind(("uuid", key.uuid.clone()))
            .bind(("session_id", key.session_id.clone()))
            .bind(("limit", limit))
            .await
            .and_then(|mut response| response.take(0))
            .map_err(|e| AppError::storage(key, e))?;

        Ok(tails.into_iter().next().unwrap_or_default())
    }

    async fn read_full(&self, key: &ConversationKey) -> Result<Option<StoredConversation>> {
        let documents: Vec<StoredConversation> = self
            .pool
            .db()
            .query(FULL_QUERY)
            .bind(("uuid", key.uuid.clone()))
            .bind(("session_id", key.session_id.clone()))
            .await
            .and_then(|mut response| response.take(0))
            .map_err(|e| AppError::storage(key, e))?;

        Ok(documents.into_iter().next())
    }

    async fn delete(&self, key: &ConversationKey) -> Result<bool> {
        let deleted: Vec<StoredConversation> = self
            .pool
            .db()
            .query(DELETE_QUERY)
            .bind(("uuid", key.uuid.clone()))
            .bind(("session_id", key.session_id.clone()))
            .await
            .and_then(|mut response| response.take(0))
            .map_err(|e| AppError::storage(key, e))?;

        Ok(!deleted.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config::DatabaseConfig;
    use crate::models::message::{SenderKind, ToolInvocation};
    use crate::services::conversation::Conversation;
    use rstest::rstest;
    use std::sync::Arc;

    async fn store() -> SurrealMessageStore {
        let config = DatabaseConfig {
            url: "mem://".into(),
            namespace: "coursechat".into(),
            database: "test".into(),
            ..Default::default()
        };
        SurrealMessageStore::new(SurrealPool::new(config).await.unwrap())
    }

    fn key() -> ConversationKey {
        ConversationKey::new("u1", "s1")
    }

    fn contents(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.content.as_str()).collect()
    }

    async fn seeded(items: &[&str]) -> SurrealMessageStore {
        let store = store().await;
        for (i, content) in items.iter().enumerate() {
            let message =
                Message::with_timestamp(SenderKind::Human, content, 100 + i as i64, None);
            store.append_message(&key(), &message).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_append_creates_missing_document() {
        let store = store().await;
        assert!(store.read_full(&key()).await.unwrap().is_none());
        assert!(store.read_tail(&key(), 5).await.unwrap().is_empty());

        let message = Message::with_timestamp(SenderKind::Ai, "first", 42, None);
        store.append_message(&key(), &message).await.unwrap();

        let stored = store.read_full(&key()).await.unwrap().unwrap();
        assert_eq!(stored.uuid, "u1");
        assert_eq!(stored.session_id, "s1");
        assert_eq!(stored.messages, vec![message]);
        assert_eq!(stored.last_updated, 42);
    }

    #[tokio::test]
    async fn test_append_keeps_order_and_refreshes_last_updated() {
        let store = seeded(&["a", "b", "c"]).await;

        let stored = store.read_full(&key()).await.unwrap().unwrap();
        assert_eq!(contents(&stored.messages), vec!["a", "b", "c"]);
        assert_eq!(stored.last_updated, 102);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(2, 2)]
    #[case(3, 3)]
    #[case(50, 3)]
    #[case(i64::MAX as usize, 3)]
    #[case(i64::MAX as usize + 1, 3)]
    #[case(usize::MAX, 3)]
    #[tokio::test]
    async fn test_read_tail_bounds(#[case] limit: usize, #[case] expected: usize) {
        let store = seeded(&["a", "b", "c"]).await;

        let tail = store.read_tail(&key(), limit).await.unwrap();
        let all = ["a", "b", "c"];
        assert_eq!(contents(&tail), all[all.len() - expected..].to_vec());
    }

    #[tokio::test]
    async fn test_tool_use_survives_storage() {
        let store = store().await;
        let message = Message::new(
            SenderKind::Ai,
            "COS 226 has no P/D/F",
            Some(ToolInvocation::new("course_lookup", "COS 226", "found")),
        );
        store.append_message(&key(), &message).await.unwrap();

        let tail = store.read_tail(&key(), 1).await.unwrap();
        assert_eq!(tail, vec![message]);
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = seeded(&["a"]).await;

        assert!(store.delete(&key()).await.unwrap());
        assert!(store.read_full(&key()).await.unwrap().is_none());
        assert!(!store.delete(&key()).await.unwrap());
    }

    #[tokio::test]
    async fn test_keys_are_isolated() {
        let store = seeded(&["a", "b"]).await;
        let other = ConversationKey::new("u1", "s2");

        assert!(store.read_full(&other).await.unwrap().is_none());
        store
            .append_message(&other, &Message::new(SenderKind::Human, "x", None))
            .await
            .unwrap();
        assert_eq!(store.read_tail(&key(), 10).await.unwrap().len(), 2);
        assert_eq!(store.read_tail(&other, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_two_aggregates_append_to_one_document() {
        let store: Arc<dyn MessageStore> = Arc::new(store().await);
        let mut first = Conversation::new(store.clone(), key(), 10);
        let mut second = Conversation::new(store.clone(), key(), 10);

        first.append(SenderKind::Human, "from first", None).await.unwrap();
        second.append(SenderKind::Ai, "from second", None).await.unwrap();

        let recent = second.recent_messages(None).await.unwrap();
        assert_eq!(contents(&recent), vec!["from first", "from second"]);
        assert_eq!(first.summary().await.unwrap().message_count, 2);
    }
}
