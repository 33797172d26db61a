//! 回复生成
//!
//! 根据会话上下文生成 AI 回复。目前只有固定文本的模拟实现。

use async_trait::async_trait;

use crate::error::Result;
use crate::models::message::ToolInvocation;

/// 生成的回复
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReply {
    pub content: String,
    pub tool_use: Option<ToolInvocation>,
}

impl GeneratedReply {
    pub fn text(content: &str) -> Self {
        Self {
            content: content.to_string(),
            tool_use: None,
        }
    }
}

/// 回复生成器 trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// `context` 为最近消息的上下文行，最后一行是刚收到的用户消息
    async fn generate(&self, context: &[String]) -> Result<GeneratedReply>;
}

/// 模拟回复生成器
pub struct SimulatedReplyGenerator {
    reply: String,
}

impl SimulatedReplyGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl ReplyGenerator for SimulatedReplyGenerator {
    async fn generate(&self, context: &[String]) -> Result<GeneratedReply> {
        tracing::debug!(context_lines = context.len(), "generating simulated reply");
        Ok(GeneratedReply::text(&self.reply))
    }
}
