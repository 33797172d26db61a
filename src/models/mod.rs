//! 核心数据模型模块
//!
//! 定义 Coursechat 的核心数据结构：Message, Conversation, Chat, User, Course 等。

pub mod chat;
pub mod conversation;
pub mod course;
pub mod message;
pub mod user;

pub use chat::Chat;
pub use conversation::{ConversationKey, ConversationSummary, StoredConversation};
pub use course::{Course, Semester};
pub use message::{Message, SenderKind, ToolInvocation};
pub use user::User;
