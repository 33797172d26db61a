use crate::config::config::DatabaseConfig;
use crate::error::{AppError, Result};
use serde::Serialize;
use surrealdb::{
    Surreal,
    engine::any::{Any, connect},
    opt::auth::Root,
};

/// SurrealDB 连接
///
/// `Surreal<Any>` 内部已共享连接，克隆开销很小。
#[derive(Clone)]
pub struct SurrealPool {
    /// 数据库连接
    db: Surreal<Any>,
    /// 连接配置
    config: DatabaseConfig,
}

impl SurrealPool {
    /// 建立连接并选择命名空间/数据库
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        let db: Surreal<Any> = connect(config.url.as_str())
            .await
            .map_err(|e| AppError::Connection(format!("{}: {}", config.url, e)))?;

        // 认证；未配置用户名时跳过（嵌入式引擎）
        if !config.username.is_empty() {
            db.signin(Root {
                username: &config.username,
                password: &config.password,
            })
            .await
            .map_err(|e| AppError::Connection(format!("signin failed: {}", e)))?;
        }

        // 选择命名空间和数据库
        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| AppError::Connection(e.to_string()))?;

        Ok(Self { db, config })
    }

    /// 获取数据库实例
    pub fn db(&self) -> &Surreal<Any> {
        &self.db
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// 健康检查
    pub async fn health(&self) -> Result<()> {
        self.db
            .health()
            .await
            .map_err(|e| AppError::storage(&self.config.url, e))
    }
}

/// 记录查询时把 `id` 投影为纯字符串
pub(crate) const SELECT_WITH_ID: &str = "SELECT *, meta::id(id) AS id";

/// 序列化实体并去掉 `id` 字段，用于 `CREATE type::thing(..) CONTENT`
pub(crate) fn content_without_id<T: Serialize>(entity: &T) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(entity)?;
    if let Some(object) = value.as_object_mut() {
        object.remove("id");
    }
    Ok(value)
}
