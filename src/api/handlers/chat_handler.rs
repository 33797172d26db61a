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
    api::{app_state::AppState, dto::chat_dto::*},
    error::AppError,
};

pub async fn create_chat(
    State(state): State<AppState>,
    Json(request): Json<CreateChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;
    debug!("Creating chat for user: {}", request.user_id);

    let chat = state
        .chat_service
        .create(&request.user_id)
        .await
        .map_err(observe(&state))?;
    state.metrics.chats_created_total.inc();

    Ok((StatusCode::CREATED, Json(ChatResponse::from(chat))))
}

pub async fn list_chats(
    State(state): State<AppState>,
    Query(params): Query<ListChatsParams>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let chats = state
        .chat_service
        .list_for_user(&params.user_id)
        .await
        .map_err(observe(&state))?;
    let chats: Vec<ChatResponse> = chats.into_iter().map(ChatResponse::from).collect();

    Ok(Json(chats))
}

pub async fn get_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let transcript = state
        .chat_service
        .get(&chat_id)
        .await
        .map_err(observe(&state))?;
    Ok(Json(transcript))
}

pub async fn send_message(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;
    debug!("Sending message to chat: {}", chat_id);

    let exchange = state
        .chat_service
        .send_message(&chat_id, &request.user_id, &request.content)
        .await
        .map_err(observe(&state))?;
    state.metrics.messages_appended_total.inc_by(2);

    let response = SendMessageResponse {
        model_message: exchange.model_message.content,
        timestamp: exchange.model_message.timestamp,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn recent_messages(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Query(params): Query<RecentMessagesParams>,
) -> Result<impl IntoResponse, AppError> {
    let messages = state
        .chat_service
        .recent_messages(&chat_id, params.limit)
        .await
        .map_err(observe(&state))?;
    Ok(Json(MessageListResponse::from(messages)))
}

pub async fn chat_summary(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let summary = state
        .chat_service
        .summary(&chat_id)
        .await
        .map_err(observe(&state))?;
    Ok(Json(summary))
}

pub async fn delete_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .chat_service
        .delete(&chat_id)
        .await
        .map_err(observe(&state))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Chat not found: {}", chat_id)))
    }
}
