use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::event::{CreateEventRequest, Event, EventListQuery, UpdateEventRequest};

/// All event rows go through here. Callers resolve child ownership first
/// (via ChildRepository); per-event operations re-check ownership with a join
/// so an event under someone else's child reads as missing.
pub struct EventRepository;

impl EventRepository {
    /// Details are expected to be validated by the caller against the event
    /// type before this point.
    pub async fn create(
        pool: &PgPool,
        child_id: Uuid,
        req: &CreateEventRequest,
    ) -> anyhow::Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            "INSERT INTO events (child_id, event_type, occurred_at, value, unit, notes, details)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(child_id)
        .bind(&req.event_type)
        .bind(req.occurred_at)
        .bind(req.value)
        .bind(&req.unit)
        .bind(&req.notes)
        .bind(&req.details)
        .fetch_one(pool)
        .await?;
        Ok(event)
    }

    /// List a child's events, optionally filtered by type and an inclusive
    /// calendar-date window, newest first.
    pub async fn list(
        pool: &PgPool,
        child_id: Uuid,
        q: &EventListQuery,
    ) -> anyhow::Result<Vec<Event>> {
        let mut sql = String::from("SELECT * FROM events WHERE child_id = $1");
        let mut idx = 2;
        if q.event_type.is_some() {
            sql.push_str(&format!(" AND event_type = ${idx}"));
            idx += 1;
        }
        if q.start_date.is_some() {
            sql.push_str(&format!(" AND occurred_at >= ${idx}"));
            idx += 1;
        }
        if q.end_date.is_some() {
            sql.push_str(&format!(" AND occurred_at < ${idx}"));
        }
        sql.push_str(" ORDER BY occurred_at DESC");

        let mut query = sqlx::query_as::<_, Event>(&sql).bind(child_id);
        if let Some(t) = &q.event_type {
            query = query.bind(t);
        }
        if let Some(start) = q.start_date {
            query = query.bind(day_start(start));
        }
        if let Some(end) = q.end_date {
            query = query.bind(day_end_exclusive(end));
        }

        let events = query.fetch_all(pool).await?;
        Ok(events)
    }

    /// Fetch all events in [from, to), newest first — the daily-report input.
    pub async fn list_window(
        pool: &PgPool,
        child_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events
             WHERE child_id = $1 AND occurred_at >= $2 AND occurred_at < $3
             ORDER BY occurred_at DESC",
        )
        .bind(child_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;
        Ok(events)
    }

    /// Fetch one event, constrained to the caller's children.
    pub async fn get_owned(
        pool: &PgPool,
        owner_id: Uuid,
        event_id: Uuid,
    ) -> anyhow::Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            "SELECT e.* FROM events e
             JOIN children c ON c.id = e.child_id
             WHERE e.id = $1 AND c.owner_id = $2",
        )
        .bind(event_id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;
        Ok(event)
    }

    /// Partial in-place update. Returns None when the event is not under one
    /// of the caller's children.
    pub async fn update(
        pool: &PgPool,
        owner_id: Uuid,
        event_id: Uuid,
        req: &UpdateEventRequest,
    ) -> anyhow::Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            "UPDATE events e
             SET occurred_at = COALESCE($1, e.occurred_at),
                 value       = COALESCE($2, e.value),
                 unit        = COALESCE($3, e.unit),
                 notes       = COALESCE($4, e.notes),
                 details     = COALESCE($5, e.details),
                 updated_at  = NOW()
             FROM children c
             WHERE e.id = $6 AND c.id = e.child_id AND c.owner_id = $7
             RETURNING e.*",
        )
        .bind(req.occurred_at)
        .bind(req.value)
        .bind(&req.unit)
        .bind(&req.notes)
        .bind(&req.details)
        .bind(event_id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;
        Ok(event)
    }

    pub async fn delete(pool: &PgPool, owner_id: Uuid, event_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "DELETE FROM events e
             USING children c
             WHERE e.id = $1 AND c.id = e.child_id AND c.owner_id = $2",
        )
        .bind(event_id)
        .bind(owner_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Midnight UTC at the start of the given calendar date.
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
}

/// Midnight UTC at the start of the following day (exclusive upper bound).
pub fn day_end_exclusive(date: NaiveDate) -> DateTime<Utc> {
    day_start(date) + chrono::Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_window_covers_the_whole_calendar_day() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let start = day_start(date);
        let end = day_end_exclusive(date);

        assert_eq!(start.to_rfc3339(), "2025-06-10T00:00:00+00:00");
        assert_eq!(end - start, chrono::Duration::days(1));

        let last_moment = Utc.from_utc_datetime(&date.and_hms_opt(23, 59, 59).unwrap());
        assert!(last_moment >= start && last_moment < end);
    }
}
