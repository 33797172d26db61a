//! 课程 DTO

use serde::{Deserialize, Serialize};

use crate::models::course::{Course, Semester};

/// 课程查询参数，未指定学期时取最新学期
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CourseQuery {
    pub semester: Option<u32>,
}

/// 学期列表响应
#[derive(Debug, Serialize)]
pub struct SemesterListResponse {
    pub semesters: Vec<Semester>,
}

/// 课程列表响应
#[derive(Debug, Serialize)]
pub struct CourseListResponse {
    pub semester: u32,
    pub courses: Vec<Course>,
    pub count: usize,
}
