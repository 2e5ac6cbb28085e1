use lazy_static::lazy_static;
use prometheus::{register_counter, register_counter_vec, register_gauge, Counter, CounterVec, Gauge};
use sqlx::PgPool;
use tracing::{info, warn};

lazy_static! {
    // ── Event counters (increment on each event) ────────────────────────────
    pub static ref LOGINS_COUNTER: CounterVec = register_counter_vec!(
        "api_logins_total",
        "Login attempts by status",
        &["status"]
    ).unwrap();

    pub static ref EVENTS_CREATED_COUNTER: CounterVec = register_counter_vec!(
        "api_events_created_total",
        "Activity events created, by event type",
        &["event_type"]
    ).unwrap();

    pub static ref REPORTS_COUNTER: CounterVec = register_counter_vec!(
        "api_reports_generated_total",
        "Report requests served, by kind (summary, daily, daily_pdf)",
        &["kind"]
    ).unwrap();

    pub static ref PDF_RENDER_FAILURES: Counter = register_counter!(
        "api_pdf_render_failures_total",
        "Daily-report PDF renders that errored"
    ).unwrap();

    // ── Business metrics ────────────────────────────────────────────────────
    pub static ref USERS_GAUGE: Gauge = register_gauge!(
        "tracker_users_active_total",
        "Active accounts"
    ).unwrap();

    pub static ref CHILDREN_GAUGE: Gauge = register_gauge!(
        "tracker_children_total",
        "Child records"
    ).unwrap();

    pub static ref EVENTS_GAUGE: Gauge = register_gauge!(
        "tracker_events_total",
        "Stored activity events"
    ).unwrap();
}

/// Spawn the background metrics collector (refreshes every 5 minutes).
pub fn start(pool: PgPool) {
    tokio::spawn(async move {
        // Initial collection on startup
        if let Err(e) = collect(&pool).await {
            warn!("Metrics: initial collection failed: {}", e);
        }
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await;
            if let Err(e) = collect(&pool).await {
                warn!("Metrics: collection failed: {}", e);
            }
        }
    });
}

async fn collect(pool: &PgPool) -> anyhow::Result<()> {
    let users: i64 =
        sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM users WHERE is_active = TRUE")
            .fetch_one(pool)
            .await?;
    USERS_GAUGE.set(users as f64);

    let children: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM children")
        .fetch_one(pool)
        .await?;
    CHILDREN_GAUGE.set(children as f64);

    let events: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM events")
        .fetch_one(pool)
        .await?;
    EVENTS_GAUGE.set(events as f64);

    info!("Metrics: collected ({users} users, {children} children, {events} events)");
    Ok(())
}
