use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use super::observe;
use crate::{
    api::{app_state::AppState, dto::course_dto::*},
    error::AppError,
};

pub async fn list_semesters(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let semesters = state
        .course_repository
        .list_semesters()
        .await
        .map_err(observe(&state))?;
    Ok(Json(SemesterListResponse { semesters }))
}

pub async fn list_courses(
    State(state): State<AppState>,
    Path(code): Path<u32>,
) -> Result<impl IntoResponse, AppError> {
    let courses = state
        .course_repository
        .list_courses(code)
        .await
        .map_err(observe(&state))?;
    Ok(Json(CourseListResponse {
        semester: code,
        count: courses.len(),
        courses,
    }))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Query(query): Query<CourseQuery>,
) -> Result<impl IntoResponse, AppError> {
    let semester = match query.semester {
        Some(code) => code,
        None => state
            .course_repository
            .list_semesters()
            .await
            .map_err(observe(&state))?
            .first()
            .map(|s| s.code)
            .ok_or_else(|| AppError::NotFound("No semesters loaded".to_string()))?,
    };

    let course = state
        .course_repository
        .get_course(&course_id, semester)
        .await
        .map_err(observe(&state))?
        .ok_or_else(|| {
            AppError::NotFound(format!("Course not found: {} ({})", course_id, semester))
        })?;
    Ok(Json(course))
}
