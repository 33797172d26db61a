use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 消息发送方
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SenderKind {
    /// 用户消息
    Human,
    /// 模型/系统回复
    Ai,
}

impl SenderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderKind::Human => "human",
            SenderKind::Ai => "ai",
        }
    }
}

impl fmt::Display for SenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 工具调用记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolInvocation {
    /// 工具名称
    pub tool: String,
    /// 输入
    pub input: String,
    /// 输出
    pub output: String,
}

impl ToolInvocation {
    pub fn new(tool: &str, input: &str, output: &str) -> Self {
        Self {
            tool: tool.to_string(),
            input: input.to_string(),
            output: output.to_string(),
        }
    }
}

/// 会话中的单条消息
///
/// 追加后不可变，顺序由追加次序决定，时间戳仅供参考。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// 发送方
    #[serde(rename = "type")]
    pub sender: SenderKind,

    /// 文本内容
    pub content: String,

    /// 秒级 Unix 时间戳
    pub timestamp: i64,

    /// 工具调用
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_use: Option<ToolInvocation>,
}

impl Message {
    /// 以当前时间创建消息
    pub fn new(sender: SenderKind, content: &str, tool_use: Option<ToolInvocation>) -> Self {
        Self::with_timestamp(sender, content, Utc::now().timestamp(), tool_use)
    }

    pub fn with_timestamp(
        sender: SenderKind,
        content: &str,
        timestamp: i64,
        tool_use: Option<ToolInvocation>,
    ) -> Self {
        Self {
            sender,
            content: content.to_string(),
            timestamp,
            tool_use,
        }
    }

    /// 格式化为上下文行：`<sender>: <content>[ [Tool: <tool>]]`
    pub fn context_line(&self) -> String {
        match &self.tool_use {
            Some(tool_use) => format!(
                "{}: {} [Tool: {}]",
                self.sender, self.content, tool_use.tool
            ),
            None => format!("{}: {}", self.sender, self.content),
        }
    }
}
