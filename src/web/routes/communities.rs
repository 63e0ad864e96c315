use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::app_state::AppState;
use crate::services::community_service::{self, NewCommunityInput};
use crate::services::membership_service;
use crate::web::middleware::auth::AuthenticatedProfile;

fn internal_error(context: &str, err: sqlx::Error) -> (StatusCode, Json<Value>) {
    warn!("{}: {}", context, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal_error" })),
    )
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

pub async fn create_community_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    State(state): State<AppState>,
    Json(input): Json<NewCommunityInput>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    match community_service::create_community(&state.pool, &profile.id, &input).await {
        Ok(Some(community)) => Ok((
            StatusCode::CREATED,
            Json(json!({ "community": community })),
        )),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "community_not_found" })),
        )),
        Err(sqlx::Error::Protocol(msg)) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_input", "detail": msg })),
        )),
        Err(e) => Err(internal_error("Community create failed", e)),
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ListCommunitiesQuery {
    pub limit: Option<i64>,
}

pub async fn list_communities_handler(
    Extension(_profile): Extension<AuthenticatedProfile>,
    Query(query): Query<ListCommunitiesQuery>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let communities =
        community_service::list_communities(&state.pool, query.limit.unwrap_or(50))
            .await
            .map_err(|e| internal_error("Community list failed", e))?;
    Ok(Json(json!({ "communities": communities })))
}

pub async fn community_detail_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path(community_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let community = community_service::load_community(&state.pool, &community_id)
        .await
        .map_err(|e| internal_error("Community load failed", e))?;

    let Some(community) = community else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "community_not_found" })),
        ));
    };

    let my_membership = membership_service::get_membership(&state.pool, &community_id, &profile.id)
        .await
        .map_err(|e| internal_error("Membership load failed", e))?;

    Ok(Json(json!({
        "community": community,
        "my_membership": my_membership,
    })))
}

pub async fn join_community_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path(community_id): Path<String>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    match membership_service::join_community(&state.pool, &community_id, &profile.id).await {
        Ok(Some(member)) => Ok((StatusCode::CREATED, Json(json!({ "membership": member })))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "community_not_found" })),
        )),
        Err(e) if is_unique_violation(&e) => Err((
            StatusCode::CONFLICT,
            Json(json!({ "error": "already_member" })),
        )),
        Err(e) => Err(internal_error("Community join failed", e)),
    }
}

pub async fn leave_community_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path(community_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let deleted = membership_service::leave_community(&state.pool, &community_id, &profile.id)
        .await
        .map_err(|e| internal_error("Community leave failed", e))?;

    if deleted == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "not_a_member" })),
        ));
    }
    Ok(Json(json!({ "left": true })))
}
