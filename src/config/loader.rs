use crate::config::config::{AppConfig, DatabaseBackend};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use std::path::{Path, PathBuf};

/// 环境变量前缀
const ENV_PREFIX: &str = "COURSECHAT_";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 合并顺序：
    /// 1. 环境预设（`COURSECHAT_ENVIRONMENT=production` 时为生产预设，否则为开发预设）
    /// 2. ./config.yaml
    /// 3. 环境变量（`COURSECHAT_DATABASE__URL` 形式）
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::load_from(default_config_path())
    }

    /// 从指定路径加载配置
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig, figment::Error> {
        Self::figment(path.as_ref()).extract()
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::preset()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn preset() -> AppConfig {
        match std::env::var(format!("{}ENVIRONMENT", ENV_PREFIX)).as_deref() {
            Ok("production") => AppConfig::production(),
            _ => AppConfig::development(),
        }
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.database.backend == DatabaseBackend::SurrealDb && config.database.url.is_empty()
        {
            return Err(ConfigValidationError::MissingDatabaseUrl);
        }

        if config.memory.window_size == 0 {
            return Err(ConfigValidationError::InvalidWindowSize);
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("数据库连接 URL 未配置")]
    MissingDatabaseUrl,

    #[error("消息窗口大小无效，必须大于 0")]
    InvalidWindowSize,
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.yaml")
}
