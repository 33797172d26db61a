//! 存储层模块
//!
//! 提供数据持久化服务，支持 SurrealDB 和进程内存储。

pub mod factory;
pub mod memory;
pub mod message_store;
pub mod repository;
pub mod surrealdb;

pub use factory::{Storage, StorageFactory};
pub use message_store::MessageStore;
