//! Handlers 模块
//!
//! HTTP 请求处理程序。

use crate::{api::app_state::AppState, error::AppError};

pub mod chat_handler;
pub mod course_handler;
pub mod user_handler;

pub use chat_handler::*;
pub use course_handler::*;
pub use user_handler::*;

/// 存储错误计入指标后原样返回
pub(crate) fn observe(state: &AppState) -> impl Fn(AppError) -> AppError + '_ {
    move |e| {
        if e.is_storage() {
            state.metrics.storage_errors_total.inc();
        }
        e
    }
}
