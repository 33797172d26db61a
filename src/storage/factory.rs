//! 存储工厂模块
//!
//! 根据配置创建相应的存储实例。

use std::sync::Arc;

use crate::config::config::{DatabaseBackend, DatabaseConfig};
use crate::error::Result;
use crate::storage::memory::{
    InMemoryChatRepository, InMemoryCourseRepository, InMemoryMessageStore,
    InMemoryUserRepository,
};
use crate::storage::message_store::{MessageStore, SurrealMessageStore};
use crate::storage::repository::{
    ChatRepository, CourseRepository, SurrealChatRepository, SurrealCourseRepository,
    SurrealUserRepository, UserRepository,
};
use crate::storage::surrealdb::SurrealPool;

/// 存储实例：各仓储共享同一个后端
#[derive(Clone)]
pub struct Storage {
    pub messages: Arc<dyn MessageStore>,
    pub users: Arc<dyn UserRepository>,
    pub chats: Arc<dyn ChatRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pool: Option<SurrealPool>,
}

impl Storage {
    /// 全内存存储
    pub fn in_memory() -> Self {
        Self {
            messages: Arc::new(InMemoryMessageStore::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            chats: Arc::new(InMemoryChatRepository::new()),
            courses: Arc::new(InMemoryCourseRepository::new()),
            pool: None,
        }
    }

    /// SurrealDB 存储
    pub fn surreal(pool: SurrealPool) -> Self {
        Self {
            messages: Arc::new(SurrealMessageStore::new(pool.clone())),
            users: Arc::new(SurrealUserRepository::new(pool.clone())),
            chats: Arc::new(SurrealChatRepository::new(pool.clone())),
            courses: Arc::new(SurrealCourseRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// 后端名称
    pub fn backend_name(&self) -> &'static str {
        match self.pool {
            Some(_) => "surrealdb",
            None => "memory",
        }
    }

    /// 检查存储是否可用
    pub async fn health_check(&self) -> Result<()> {
        match &self.pool {
            Some(pool) => pool.health().await,
            None => Ok(()),
        }
    }
}

/// 存储工厂
pub struct StorageFactory;

impl StorageFactory {
    /// 根据配置创建存储实例
    pub async fn create(config: &DatabaseConfig) -> Result<Storage> {
        match config.backend {
            DatabaseBackend::SurrealDb => {
                let pool = SurrealPool::new(config.clone()).await?;
                tracing::info!(url = %config.url, "SurrealDB connection established");
                Ok(Storage::surreal(pool))
            }
            DatabaseBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Ok(Storage::in_memory())
            }
        }
    }
}
