//! 服务模块

pub mod chat;
pub mod conversation;
pub mod reply;
pub mod user;

pub use chat::{ChatService, ChatServiceImpl, ChatTranscript, ExchangeResult, create_chat_service};
pub use conversation::{Conversation, MessageCache};
pub use reply::{GeneratedReply, ReplyGenerator, SimulatedReplyGenerator};
pub use user::{NewUser, UserService, UserServiceImpl, create_user_service};
