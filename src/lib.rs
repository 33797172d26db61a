//! Coursechat - 选课助手后端
//!
//! 保存用户与聊天记录，按 (用户, 会话) 维护追加式的消息历史，
//! 并提供只读的课程目录与导入工具。

pub mod api;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;
