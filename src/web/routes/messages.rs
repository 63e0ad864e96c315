use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::app_state::AppState;
use crate::services::messages_service;
use crate::web::middleware::auth::AuthenticatedProfile;

fn internal_error(context: &str, err: sqlx::Error) -> (StatusCode, Json<Value>) {
    warn!("{}: {}", context, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal_error" })),
    )
}

fn not_a_participant() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "conversation_not_found" })),
    )
}

pub async fn list_conversations_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let conversations = messages_service::list_inbox(&state.pool, &profile.id)
        .await
        .map_err(|e| internal_error("Inbox list failed", e))?;
    Ok(Json(json!({ "conversations": conversations })))
}

#[derive(Debug, Deserialize)]
pub struct NewConversationBody {
    pub other_profile_id: String,
}

pub async fn ensure_conversation_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    State(state): State<AppState>,
    Json(body): Json<NewConversationBody>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match messages_service::ensure_direct_conversation(
        &state.pool,
        &profile.id,
        &body.other_profile_id,
    )
    .await
    {
        Ok(Some(conversation_id)) => Ok(Json(json!({ "conversation_id": conversation_id }))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "profile_not_found" })),
        )),
        Err(sqlx::Error::Protocol(msg)) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_input", "detail": msg })),
        )),
        Err(e) => Err(internal_error("Conversation ensure failed", e)),
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ListMessagesQuery {
    pub limit: Option<i64>,
}

pub async fn list_messages_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path(conversation_id): Path<String>,
    Query(query): Query<ListMessagesQuery>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match messages_service::list_messages(
        &state.pool,
        &conversation_id,
        &profile.id,
        query.limit.unwrap_or(100),
    )
    .await
    {
        Ok(Some(messages)) => Ok(Json(json!({ "messages": messages }))),
        Ok(None) => Err(not_a_participant()),
        Err(e) => Err(internal_error("Message list failed", e)),
    }
}

#[derive(Debug, Deserialize)]
pub struct SendMessageBody {
    pub content: String,
}

pub async fn send_message_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path(conversation_id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<SendMessageBody>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    match messages_service::send_message(&state.pool, &conversation_id, &profile.id, &body.content)
        .await
    {
        Ok(Some(message)) => Ok((StatusCode::CREATED, Json(json!({ "message": message })))),
        Ok(None) => Err(not_a_participant()),
        Err(sqlx::Error::Protocol(msg)) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_input", "detail": msg })),
        )),
        Err(e) => Err(internal_error("Message send failed", e)),
    }
}

pub async fn mark_read_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path(conversation_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match messages_service::mark_conversation_read(&state.pool, &conversation_id, &profile.id)
        .await
    {
        Ok(Some(updated)) => Ok(Json(json!({ "marked_read": updated }))),
        Ok(None) => Err(not_a_participant()),
        Err(e) => Err(internal_error("Mark read failed", e)),
    }
}
