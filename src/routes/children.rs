use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    models::{
        auth::AuthenticatedUser,
        child::{CreateChildRequest, UpdateChildRequest},
    },
    routes::{internal_error, not_found},
    services::children::ChildRepository,
    AppState,
};

pub async fn list_children(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    ChildRepository::list(&state.db, user.user_id)
        .await
        .map(|c| Json(serde_json::to_value(c).unwrap()))
        .map_err(internal_error)
}

pub async fn create_child(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateChildRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    if body.name.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Name is required" })),
        ));
    }

    ChildRepository::create(&state.db, user.user_id, &body)
        .await
        .map(|child| {
            (
                StatusCode::CREATED,
                Json(serde_json::to_value(child).unwrap()),
            )
        })
        .map_err(internal_error)
}

pub async fn get_child(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let child = ChildRepository::get(&state.db, user.user_id, id)
        .await
        .map_err(internal_error)?;

    match child {
        Some(c) => Ok(Json(serde_json::to_value(c).unwrap())),
        None => Err(not_found("Child")),
    }
}

pub async fn update_child(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateChildRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let child = ChildRepository::update(&state.db, user.user_id, id, &body)
        .await
        .map_err(internal_error)?;

    match child {
        Some(c) => Ok(Json(serde_json::to_value(c).unwrap())),
        None => Err(not_found("Child")),
    }
}

pub async fn delete_child(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let deleted = ChildRepository::delete(&state.db, user.user_id, id)
        .await
        .map_err(internal_error)?;

    if deleted {
        Ok(Json(json!({ "message": "Child deleted" })))
    } else {
        Err(not_found("Child"))
    }
}
