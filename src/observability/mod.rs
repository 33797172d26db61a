//! 可观测性模块
//!
//! 提供 Prometheus 指标、结构化日志和健康检查。

use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt::writer::BoxMakeWriter};

use crate::config::config::LoggingConfig;
use crate::storage::Storage;

// ===== Metrics =====

/// 应用指标
#[derive(Clone)]
pub struct AppMetrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_errors_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub chats_created_total: IntCounter,
    pub messages_appended_total: IntCounter,
    pub storage_errors_total: IntCounter,
}

impl AppMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some("coursechat".to_string()), None)?;

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests")?;
        let http_errors_total =
            IntCounter::new("http_errors_total", "HTTP responses with a 5xx status")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        ))?;
        let chats_created_total = IntCounter::new("chats_created_total", "Chats created")?;
        let messages_appended_total =
            IntCounter::new("messages_appended_total", "Messages appended to conversations")?;
        let storage_errors_total =
            IntCounter::new("storage_errors_total", "Requests failed by a storage error")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_errors_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(chats_created_total.clone()))?;
        registry.register(Box::new(messages_appended_total.clone()))?;
        registry.register(Box::new(storage_errors_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_errors_total,
            http_request_duration_seconds,
            chats_created_total,
            messages_appended_total,
            storage_errors_total,
        })
    }

    /// 记录 HTTP 请求
    pub fn record_http_request(&self, status: StatusCode, elapsed_secs: f64) {
        self.http_requests_total.inc();
        self.http_request_duration_seconds.observe(elapsed_secs);
        if status.is_server_error() {
            self.http_errors_total.inc();
        }
    }

    /// 生成 Prometheus 文本格式指标
    pub fn gather(&self) -> String {
        let mut buffer = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buffer) {
            tracing::error!(error = %e, "failed to encode metrics");
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

// ===== Health Check =====

/// 健康检查状态
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: f64,
    pub checks: Vec<HealthCheck>,
}

/// 单个健康检查项
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
    pub message: Option<String>,
    pub latency_ms: Option<u64>,
}

fn status_label(healthy: bool) -> String {
    let label = if healthy { "healthy" } else { "unhealthy" };
    label.to_string()
}

/// 可观测性路由状态
#[derive(Clone)]
pub struct ObservabilityState {
    pub metrics: Arc<AppMetrics>,
    pub storage: Storage,
    pub start_time: DateTime<Utc>,
    pub version: String,
}

impl ObservabilityState {
    pub fn new(metrics: Arc<AppMetrics>, storage: Storage, version: String) -> Self {
        Self {
            metrics,
            storage,
            start_time: Utc::now(),
            version,
        }
    }

    /// 获取应用正常运行时间
    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_seconds() as f64
    }

    async fn check_storage(&self) -> HealthCheck {
        let start = Instant::now();
        let result = self.storage.health_check().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        HealthCheck {
            name: format!("storage:{}", self.storage.backend_name()),
            status: status_label(result.is_ok()),
            message: Some(match result {
                Ok(()) => "Connected".to_string(),
                Err(e) => e.to_string(),
            }),
            latency_ms: Some(latency_ms),
        }
    }
}

// ===== Health Check Handlers =====

/// 获取完整健康状态
pub async fn health_check(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    let checks = vec![state.check_storage().await];
    let all_healthy = checks.iter().all(|c| c.status == "healthy");

    let health_status = HealthStatus {
        status: status_label(all_healthy),
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
        checks,
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(health_status))
}

/// 简单存活检查
pub async fn liveness() -> impl IntoResponse {
    "OK"
}

/// 就绪检查（检查存储）
pub async fn readiness(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    match state.storage.health_check().await {
        Ok(()) => (StatusCode::OK, "Ready"),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "Not Ready")
        }
    }
}

/// Prometheus 指标端点
pub async fn metrics(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.gather(),
    )
}

/// 版本信息端点
pub async fn version(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "version": state.version,
        "backend": state.storage.backend_name(),
        "uptime_seconds": state.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// 创建可观测性路由
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .route("/metrics", get(metrics))
        .route("/version", get(version))
        .with_state(state)
}

// ===== Structured Logging =====

/// 初始化日志
///
/// `RUST_LOG` 优先于配置中的级别。配置了 `log_dir` 时按天滚动写文件，
/// 返回的 guard 需要在进程退出前一直持有。
pub fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.level)));

    let (writer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "coursechat.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(writer), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true)
        .with_line_number(true);

    let result = if config.structured {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {}", e);
    }

    guard
}

// ===== Request Metrics Middleware =====

/// 记录请求指标的中间件
pub async fn metrics_middleware(
    State(metrics): State<Arc<AppMetrics>>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let response = next.run(req).await;
    metrics.record_http_request(response.status(), start.elapsed().as_secs_f64());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use tower::ServiceExt;

    #[test]
    fn test_metrics_gather() {
        let metrics = AppMetrics::new().unwrap();
        metrics.record_http_request(StatusCode::OK, 0.01);
        metrics.record_http_request(StatusCode::INTERNAL_SERVER_ERROR, 0.02);
        metrics.messages_appended_total.inc_by(2);

        let output = metrics.gather();
        assert!(output.contains("coursechat_http_requests_total 2"));
        assert!(output.contains("coursechat_http_errors_total 1"));
        assert!(output.contains("coursechat_messages_appended_total 2"));
    }

    #[test]
    fn test_metrics_instances_are_independent() {
        let a = AppMetrics::new().unwrap();
        let b = AppMetrics::new().unwrap();
        a.chats_created_total.inc();
        assert_eq!(b.chats_created_total.get(), 0);
    }

    fn router() -> Router {
        let state = ObservabilityState::new(
            Arc::new(AppMetrics::new().unwrap()),
            Storage::in_memory(),
            "0.1.0".to_string(),
        );
        create_observability_router(Arc::new(state))
    }

    #[tokio::test]
    async fn test_health_with_memory_storage() {
        let response = router()
            .oneshot(HttpRequest::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["checks"][0]["name"], "storage:memory");
    }

    #[tokio::test]
    async fn test_readiness() {
        let response = router()
            .oneshot(
                HttpRequest::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
