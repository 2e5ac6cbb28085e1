use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    models::{
        auth::AuthenticatedUser,
        event::{validate_details, CreateEventRequest, EventListQuery, UpdateEventRequest},
    },
    routes::{bad_request, internal_error, not_found},
    services::{children::ChildRepository, events::EventRepository, metrics::EVENTS_CREATED_COUNTER},
    AppState,
};

/// POST /children/{id}/events
pub async fn create_event(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(child_id): Path<Uuid>,
    Json(body): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let child = ChildRepository::get(&state.db, user.user_id, child_id)
        .await
        .map_err(internal_error)?;
    if child.is_none() {
        return Err(not_found("Child"));
    }

    if body.event_type.trim().is_empty() {
        return Err(bad_request("event_type is required"));
    }
    validate_details(&body.event_type, &body.details).map_err(bad_request)?;

    let event = EventRepository::create(&state.db, child_id, &body)
        .await
        .map_err(internal_error)?;

    EVENTS_CREATED_COUNTER
        .with_label_values(&[&event.event_type])
        .inc();

    Ok((
        StatusCode::CREATED,
        Json(serde_json::to_value(event).unwrap()),
    ))
}

/// GET /children/{id}/events?event_type=&start_date=&end_date=
pub async fn list_events(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(child_id): Path<Uuid>,
    Query(params): Query<EventListQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let child = ChildRepository::get(&state.db, user.user_id, child_id)
        .await
        .map_err(internal_error)?;
    if child.is_none() {
        return Err(not_found("Child"));
    }

    EventRepository::list(&state.db, child_id, &params)
        .await
        .map(|events| Json(serde_json::to_value(events).unwrap()))
        .map_err(internal_error)
}

/// PATCH /events/{id} — details, when present, are re-validated against the
/// event's existing type.
pub async fn update_event(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateEventRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let existing = EventRepository::get_owned(&state.db, user.user_id, id)
        .await
        .map_err(internal_error)?;
    let Some(existing) = existing else {
        return Err(not_found("Event"));
    };

    if let Some(details) = &body.details {
        validate_details(&existing.event_type, details).map_err(bad_request)?;
    }

    let updated = EventRepository::update(&state.db, user.user_id, id, &body)
        .await
        .map_err(internal_error)?;

    match updated {
        Some(e) => Ok(Json(serde_json::to_value(e).unwrap())),
        None => Err(not_found("Event")),
    }
}

/// DELETE /events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let deleted = EventRepository::delete(&state.db, user.user_id, id)
        .await
        .map_err(internal_error)?;

    if deleted {
        Ok(Json(json!({ "message": "Event deleted" })))
    } else {
        Err(not_found("Event"))
    }
}
