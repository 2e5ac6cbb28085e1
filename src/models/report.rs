use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Derived aggregation of a child's events over a window. Never persisted;
/// recomputed on every request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportSummary {
    pub total_events: u64,
    pub events_by_type: EventsByType,
    pub stats: ReportStats,
}

/// Fixed per-type counts. The `sleep` key counts `sleeping` events — the
/// summary has always been keyed that way and chart clients branch on it.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct EventsByType {
    pub sleep: u64,
    pub feeding: u64,
    pub diaper: u64,
    pub growth: u64,
    pub medication: u64,
    pub temperature: u64,
}

impl EventsByType {
    pub fn sum(&self) -> u64 {
        self.sleep + self.feeding + self.diaper + self.growth + self.medication + self.temperature
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ReportStats {
    pub sleep: SleepStats,
    pub feeding: FeedingStats,
    pub diaper: DiaperStats,
    pub growth: GrowthStats,
    pub medication: MedicationStats,
    pub temperature: TemperatureStats,
}

/// Durations come from each event's `value` (minutes). Averages over zero
/// events are 0.0, not null — unlike temperature below.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SleepStats {
    pub count: u64,
    pub total_duration: f64,
    pub average_duration: f64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FeedingStats {
    pub count: u64,
    pub by_type: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DiaperStats {
    pub count: u64,
    pub by_type: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct GrowthStats {
    pub count: u64,
    pub latest_weight: Option<f64>,
    pub weight_gain: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MedicationStats {
    pub count: u64,
    pub by_medication: BTreeMap<String, u64>,
}

/// All three aggregates are null when no temperature events exist.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TemperatureStats {
    pub count: u64,
    pub average: Option<f64>,
    pub highest: Option<f64>,
    pub lowest: Option<f64>,
}

/// One calendar day of a child's events, rendered for parents (and the PDF).
#[derive(Debug, Clone, Serialize)]
pub struct DailyReport {
    pub child_id: Uuid,
    pub child_name: String,
    pub date: NaiveDate,
    pub entries: Vec<DailyReportEntry>,
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyReportEntry {
    pub occurred_at: DateTime<Utc>,
    pub event_type: String,
    pub line: String,
}

/// Query params for GET /children/{id}/reports. The same filters the event
/// list takes: an optional inclusive date window and an optional type.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub event_type: Option<String>,
}

/// Query params for the daily report endpoints. Defaults to today (UTC).
#[derive(Debug, Deserialize)]
pub struct DailyReportQuery {
    pub date: Option<NaiveDate>,
}
