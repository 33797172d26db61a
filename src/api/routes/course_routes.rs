//! Course Routes
//!
//! 课程目录只读接口。

use crate::api::handlers::course_handler::*;
use axum::{Router, routing::get};

use crate::api::app_state::AppState;

/// 创建课程路由器
pub fn create_course_router() -> Router<AppState> {
    Router::new()
        .route("/semesters", get(list_semesters))
        .route("/semesters/:code/courses", get(list_courses))
        .route("/courses/:course_id", get(get_course))
}
