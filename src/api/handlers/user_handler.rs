use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;
use validator::Validate;

use super::observe;
use crate::{
    api::{app_state::AppState, dto::user_dto::*},
    error::AppError,
};

pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let user = state
        .user_service
        .create(request.into())
        .await
        .map_err(observe(&state))?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_service.get(&id).await.map_err(observe(&state))?;
    Ok(Json(user))
}

pub async fn find_user(
    State(state): State<AppState>,
    Query(params): Query<UserLookupParams>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Looking up user by email");
    let user = state
        .user_service
        .get_by_email(&params.email)
        .await
        .map_err(observe(&state))?;
    Ok(Json(user))
}

pub async fn update_concentration(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateConcentrationRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;
    let concentration = request.concentration.unwrap_or_default();

    let user = state
        .user_service
        .update_concentration(&id, &concentration)
        .await
        .map_err(observe(&state))?;
    Ok(Json(user))
}

pub async fn update_certificates(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCertificatesRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;
    let certificates = request.certificates.unwrap_or_default();

    let user = state
        .user_service
        .update_certificates(&id, certificates)
        .await
        .map_err(observe(&state))?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .user_service
        .delete(&id)
        .await
        .map_err(observe(&state))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("User not found: {}", id)))
    }
}
