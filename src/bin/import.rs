//! 课程数据导入工具
//!
//! 用法：`coursechat-import [DATA_DIR]`，缺省读取 `./data`。
//! 数据库连接沿用服务的配置文件与 `COURSECHAT_` 环境变量。

use anyhow::Context;
use coursechat::config::loader::ConfigLoader;
use coursechat::import::CourseImporter;
use coursechat::observability::init_tracing;
use coursechat::storage::StorageFactory;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));

    let config = ConfigLoader::load().context("failed to load configuration")?;
    ConfigLoader::validate(&config).context("invalid configuration")?;
    let _guard = init_tracing(&config.logging);

    let storage = StorageFactory::create(&config.database)
        .await
        .context("failed to open storage")?;
    tracing::info!(
        data_dir = %data_dir.display(),
        backend = storage.backend_name(),
        "Starting course import"
    );

    let report = CourseImporter::new(storage.courses.clone())
        .run(&data_dir)
        .await
        .with_context(|| format!("import from {} failed", data_dir.display()))?;

    tracing::info!(
        semester_inserted = report.semester_inserted,
        inserted = report.inserted,
        skipped = report.skipped,
        failed = report.failed,
        "Course import completed"
    );

    if report.failed > 0 {
        anyhow::bail!("{} courses failed to import", report.failed);
    }
    Ok(())
}
