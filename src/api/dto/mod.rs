//! DTO 模块
//!
//! 数据传输对象，用于 API 请求和响应的序列化。

pub mod chat_dto;
pub mod course_dto;
pub mod user_dto;

pub use chat_dto::*;
pub use course_dto::*;
pub use user_dto::*;
