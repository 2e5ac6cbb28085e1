use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    models::{
        auth::AuthenticatedUser,
        child::Child,
        event::EventListQuery,
        report::{DailyReport, DailyReportQuery, ReportQuery},
    },
    routes::{internal_error, not_found},
    services::{
        children::ChildRepository,
        events::{day_end_exclusive, day_start, EventRepository},
        metrics::{PDF_RENDER_FAILURES, REPORTS_COUNTER},
        pdf, reports,
    },
    AppState,
};

/// GET /children/{id}/reports?start_date=&end_date=&event_type=
///
/// Aggregated summary over the inclusive date window (the child's whole
/// history when no bounds are given), optionally restricted to one type.
pub async fn summary(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(child_id): Path<Uuid>,
    Query(params): Query<ReportQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let child = ChildRepository::get(&state.db, user.user_id, child_id)
        .await
        .map_err(internal_error)?;
    if child.is_none() {
        return Err(not_found("Child"));
    }

    let filter = EventListQuery {
        event_type: params.event_type,
        start_date: params.start_date,
        end_date: params.end_date,
    };
    let events = EventRepository::list(&state.db, child_id, &filter)
        .await
        .map_err(internal_error)?;

    let summary = reports::summarize(&events);
    REPORTS_COUNTER.with_label_values(&["summary"]).inc();

    Ok(Json(serde_json::to_value(summary).unwrap()))
}

/// GET /children/{id}/reports/daily?date=
pub async fn daily(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(child_id): Path<Uuid>,
    Query(params): Query<DailyReportQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let report = build_daily_report(&state, &user, child_id, &params).await?;
    REPORTS_COUNTER.with_label_values(&["daily"]).inc();
    Ok(Json(serde_json::to_value(report).unwrap()))
}

/// GET /children/{id}/reports/daily/pdf?date=
pub async fn daily_pdf(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(child_id): Path<Uuid>,
    Query(params): Query<DailyReportQuery>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let report = build_daily_report(&state, &user, child_id, &params).await?;

    let bytes = pdf::render_daily_report(&report).map_err(|e| {
        PDF_RENDER_FAILURES.inc();
        internal_error(e)
    })?;
    REPORTS_COUNTER.with_label_values(&["daily_pdf"]).inc();

    let filename = format!("daily-report-{}.pdf", report.date);
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(bytes))
        .map_err(|e| internal_error(e.into()))
}

/// Shared by the JSON and PDF daily handlers: ownership check, day-window
/// fetch, report build. Defaults to today (UTC) when no date is given.
async fn build_daily_report(
    state: &AppState,
    user: &AuthenticatedUser,
    child_id: Uuid,
    params: &DailyReportQuery,
) -> Result<DailyReport, (StatusCode, Json<Value>)> {
    let child: Option<Child> = ChildRepository::get(&state.db, user.user_id, child_id)
        .await
        .map_err(internal_error)?;
    let Some(child) = child else {
        return Err(not_found("Child"));
    };

    let date = params.date.unwrap_or_else(|| chrono::Utc::now().date_naive());

    let events =
        EventRepository::list_window(&state.db, child_id, day_start(date), day_end_exclusive(date))
            .await
            .map_err(internal_error)?;

    Ok(reports::daily_report(&child, date, &events))
}
