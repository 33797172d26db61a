//! 会话聚合
//!
//! 对单个 (uuid, session_id) 会话提供读写视图：最近消息窗口、
//! 读穿透缓存以及摘要。一个实例归属于单个请求上下文，不做内部加锁。

use std::sync::Arc;

use crate::error::Result;
use crate::models::conversation::{ConversationKey, ConversationSummary};
use crate::models::message::{Message, SenderKind, ToolInvocation};
use crate::storage::message_store::MessageStore;

/// 最近消息缓存
///
/// 读未命中时以一次存储读取的结果整体填充，追加时在尾部扩展。
/// 它只影响延迟，从不作为数据来源：`invalidate` 之后下一次读取重新访问存储，
/// 不与外部写入做任何对账。
#[derive(Debug, Default, Clone)]
pub struct MessageCache {
    entries: Option<Vec<Message>>,
}

impl MessageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_populated(&self) -> bool {
        self.entries.is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 用一次读取结果替换缓存
    pub fn fill(&mut self, messages: Vec<Message>) {
        self.entries = Some(messages);
    }

    /// 缓存中最后 `limit` 条，未填充时返回 None
    pub fn tail(&self, limit: usize) -> Option<Vec<Message>> {
        self.entries.as_ref().map(|entries| {
            let start = entries.len().saturating_sub(limit);
            entries[start..].to_vec()
        })
    }

    /// 已填充时追加；超过 `2 × window` 条后只保留最近 `window` 条
    pub fn extend(&mut self, message: Message, window: usize) {
        if let Some(entries) = self.entries.as_mut() {
            entries.push(message);
            if entries.len() > window * 2 {
                let excess = entries.len() - window;
                entries.drain(..excess);
            }
        }
    }

    pub fn invalidate(&mut self) {
        self.entries = None;
    }
}

/// 会话聚合
pub struct Conversation {
    store: Arc<dyn MessageStore>,
    key: ConversationKey,
    window_size: usize,
    cache: MessageCache,
}

impl Conversation {
    pub fn new(store: Arc<dyn MessageStore>, key: ConversationKey, window_size: usize) -> Self {
        Self {
            store,
            key,
            window_size,
            cache: MessageCache::new(),
        }
    }

    pub fn key(&self) -> &ConversationKey {
        &self.key
    }

    pub fn cache(&self) -> &MessageCache {
        &self.cache
    }

    /// 追加一条消息
    ///
    /// 先持久化，成功后才扩展缓存；存储失败时缓存保持不变。
    pub async fn append(
        &mut self,
        sender: SenderKind,
        content: &str,
        tool_use: Option<ToolInvocation>,
    ) -> Result<Message> {
        let message = Message::new(sender, content, tool_use);
        self.store.append_message(&self.key, &message).await?;
        self.cache.extend(message.clone(), self.window_size);
        Ok(message)
    }

    /// 最近的消息，`limit` 缺省为窗口大小
    pub async fn recent_messages(&mut self, limit: Option<usize>) -> Result<Vec<Message>> {
        let limit = limit.unwrap_or(self.window_size);

        if let Some(cached) = self.cache.tail(limit) {
            return Ok(cached);
        }

        let messages = self.store.read_tail(&self.key, limit).await?;
        tracing::trace!(key = %self.key, count = messages.len(), "cache filled from storage");
        self.cache.fill(messages.clone());
        Ok(messages)
    }

    /// 最近消息的上下文行
    pub async fn messages_as_strings(&mut self) -> Result<Vec<String>> {
        Ok(self
            .recent_messages(None)
            .await?
            .iter()
            .map(Message::context_line)
            .collect())
    }

    /// 会话摘要，总是读取完整文档而不是缓存
    pub async fn summary(&self) -> Result<ConversationSummary> {
        let stored = self.store.read_full(&self.key).await?;
        Ok(ConversationSummary::from_stored(&self.key, stored.as_ref()))
    }

    pub fn clear_cache(&mut self) {
        self.cache.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::storage::memory::InMemoryMessageStore;
    use crate::storage::message_store::MockMessageStore;
    use rstest::rstest;

    fn key() -> ConversationKey {
        ConversationKey::new("owner-1", "session-1")
    }

    fn contents(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.content.as_str()).collect()
    }

    #[test]
    fn test_cache_extend_ignored_when_unpopulated() {
        let mut cache = MessageCache::new();
        cache.extend(Message::new(SenderKind::Human, "a", None), 2);
        assert!(!cache.is_populated());
        assert!(cache.tail(5).is_none());
    }

    #[test]
    fn test_cache_trims_after_double_window() {
        let mut cache = MessageCache::new();
        cache.fill(Vec::new());
        for i in 0..4 {
            cache.extend(Message::new(SenderKind::Human, &i.to_string(), None), 2);
        }
        assert_eq!(cache.len(), 4);

        cache.extend(Message::new(SenderKind::Human, "4", None), 2);
        let tail = cache.tail(10).unwrap();
        assert_eq!(contents(&tail), vec!["3", "4"]);
    }

    #[rstest]
    #[case(0, 3, 0)]
    #[case(2, 3, 2)]
    #[case(5, 3, 3)]
    #[case(5, 10, 5)]
    #[tokio::test]
    async fn test_recent_messages_returns_min_of_limit_and_count(
        #[case] appended: usize,
        #[case] limit: usize,
        #[case] expected: usize,
    ) {
        let store = Arc::new(InMemoryMessageStore::new());
        let mut conversation = Conversation::new(store, key(), 10);
        for i in 0..appended {
            conversation
                .append(SenderKind::Human, &format!("m{}", i), None)
                .await
                .unwrap();
        }

        let recent = conversation.recent_messages(Some(limit)).await.unwrap();
        assert_eq!(recent.len(), expected);
        if expected > 0 {
            assert_eq!(recent.last().unwrap().content, format!("m{}", appended - 1));
        }
    }

    #[tokio::test]
    async fn test_second_read_served_from_cache() {
        let mut store = MockMessageStore::new();
        store
            .expect_read_tail()
            .times(1)
            .returning(|_, _| Ok(vec![Message::new(SenderKind::Human, "a", None)]));

        let mut conversation = Conversation::new(Arc::new(store), key(), 5);
        let first = conversation.recent_messages(Some(5)).await.unwrap();
        let second = conversation.recent_messages(Some(5)).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_append_failure_surfaces_storage_error_and_keeps_cache() {
        let mut store = MockMessageStore::new();
        store
            .expect_read_tail()
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        store
            .expect_append_message()
            .returning(|key, _| Err(AppError::storage(key, "connection refused")));

        let mut conversation = Conversation::new(Arc::new(store), key(), 5);
        conversation.recent_messages(None).await.unwrap();

        let err = conversation
            .append(SenderKind::Human, "lost", None)
            .await
            .unwrap_err();
        match err {
            AppError::Storage { key, .. } => assert_eq!(key, "owner-1/session-1"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(conversation.cache().is_populated());
        assert!(conversation.cache().is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_propagates() {
        let mut store = MockMessageStore::new();
        store
            .expect_read_tail()
            .returning(|key, _| Err(AppError::storage(key, "timeout")));

        let mut conversation = Conversation::new(Arc::new(store), key(), 5);
        assert!(conversation.recent_messages(None).await.unwrap_err().is_storage());
        assert!(!conversation.cache().is_populated());
    }

    #[tokio::test]
    async fn test_messages_as_strings_format() {
        let store = Arc::new(InMemoryMessageStore::new());
        let mut conversation = Conversation::new(store, key(), 10);
        conversation
            .append(SenderKind::Human, "hello", None)
            .await
            .unwrap();
        conversation
            .append(
                SenderKind::Ai,
                "hi",
                Some(ToolInvocation::new("search", "Princeton", "NJ")),
            )
            .await
            .unwrap();

        let lines = conversation.messages_as_strings().await.unwrap();
        assert_eq!(lines, vec!["human: hello", "ai: hi [Tool: search]"]);
    }
}
