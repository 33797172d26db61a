use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 数据库后端类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    /// SurrealDB 文档数据库
    #[default]
    SurrealDb,
    /// 进程内存储（开发/测试）
    Memory,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 后端类型
    pub backend: DatabaseBackend,
    /// SurrealDB 连接地址
    pub url: String,
    /// 命名空间
    pub namespace: String,
    /// 数据库名称
    pub database: String,
    /// 用户名
    pub username: String,
    /// 密码
    pub password: String,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
    /// 日志文件目录
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

/// 会话记忆配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// 默认返回的最近消息数量
    pub window_size: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { window_size: 10 }
    }
}

/// 聊天配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// 模拟回复内容
    pub simulated_reply: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            simulated_reply:
                "This is a simulated response. The backend integration will be added later!"
                    .into(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 服务器配置
    pub server: ServerConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 会话记忆配置
    pub memory: MemoryConfig,
    /// 聊天配置
    pub chat: ChatConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            database: DatabaseConfig {
                backend: DatabaseBackend::SurrealDb,
                url: "ws://localhost:8000".into(),
                namespace: "coursechat".into(),
                database: "app".into(),
                username: "root".into(),
                password: "root".into(),
            },
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 8080,
            },
            logging: LoggingConfig {
                level: "debug".into(),
                structured: false,
                log_dir: None,
            },
            memory: MemoryConfig::default(),
            chat: ChatConfig::default(),
            app_name: "coursechat".into(),
            environment: "development".into(),
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.logging.level = "info".into();
        config.logging.structured = true;
        config.logging.log_dir = Some(PathBuf::from("./logs"));
        config
    }

    /// 测试用内存配置
    pub fn in_memory() -> Self {
        let mut config = Self::development();
        config.database.backend = DatabaseBackend::Memory;
        config.database.url = String::new();
        config
    }
}
