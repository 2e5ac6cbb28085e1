use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use crate::models::{
    child::Child,
    event::{Event, EventType},
    report::{DailyReport, DailyReportEntry, ReportSummary},
};

/// Aggregate a child's events into per-type counts and statistics.
///
/// Precondition: `events` is sorted descending by `occurred_at` (the
/// repository queries return it that way). Only the growth latest/oldest
/// computation depends on that order; every other figure is
/// order-independent.
///
/// This never fails: events of unrecognized types count toward
/// `total_events` but get no per-type bucket, and malformed `details`
/// payloads degrade to `"unknown"` rather than erroring. Historical rows
/// predate write-side validation and must not break report generation.
pub fn summarize(events: &[Event]) -> ReportSummary {
    let mut summary = ReportSummary {
        total_events: events.len() as u64,
        events_by_type: Default::default(),
        stats: Default::default(),
    };

    let mut growth_values: Vec<f64> = Vec::new();
    let mut temperature_values: Vec<f64> = Vec::new();

    for event in events {
        let event_type: EventType = match event.event_type.parse() {
            Ok(t) => t,
            Err(_) => {
                debug!(event_id = %event.id, event_type = %event.event_type,
                       "unrecognized event type; counted in total only");
                continue;
            }
        };

        match event_type {
            EventType::Sleeping => {
                summary.events_by_type.sleep += 1;
                summary.stats.sleep.count += 1;
                summary.stats.sleep.total_duration += event.value.unwrap_or(0.0);
            }
            EventType::Feeding => {
                summary.events_by_type.feeding += 1;
                summary.stats.feeding.count += 1;
                let sub = detail_str(event, "feeding_type");
                *summary.stats.feeding.by_type.entry(sub).or_insert(0) += 1;
            }
            EventType::Diaper => {
                summary.events_by_type.diaper += 1;
                summary.stats.diaper.count += 1;
                let sub = detail_str(event, "diaper_type");
                *summary.stats.diaper.by_type.entry(sub).or_insert(0) += 1;
            }
            EventType::Growth => {
                summary.events_by_type.growth += 1;
                summary.stats.growth.count += 1;
                if let Some(v) = event.value {
                    growth_values.push(v);
                }
            }
            EventType::Medication => {
                summary.events_by_type.medication += 1;
                summary.stats.medication.count += 1;
                let name = detail_str(event, "medication_name");
                *summary.stats.medication.by_medication.entry(name).or_insert(0) += 1;
            }
            EventType::Temperature => {
                summary.events_by_type.temperature += 1;
                summary.stats.temperature.count += 1;
                if let Some(v) = event.value {
                    temperature_values.push(v);
                }
            }
        }
    }

    // Sleep averages fall back to 0, temperature/growth to null. Chart
    // clients branch on that difference, so it stays.
    if summary.stats.sleep.count > 0 {
        summary.stats.sleep.average_duration =
            summary.stats.sleep.total_duration / summary.stats.sleep.count as f64;
    }

    // Input is newest-first, so the first carried value is the latest.
    summary.stats.growth.latest_weight = growth_values.first().copied();
    if growth_values.len() >= 2 {
        summary.stats.growth.weight_gain =
            Some(growth_values[0] - growth_values[growth_values.len() - 1]);
    }

    if !temperature_values.is_empty() {
        let sum: f64 = temperature_values.iter().sum();
        summary.stats.temperature.average = Some(sum / temperature_values.len() as f64);
        summary.stats.temperature.highest =
            temperature_values.iter().copied().fold(f64::MIN, f64::max).into();
        summary.stats.temperature.lowest =
            temperature_values.iter().copied().fold(f64::MAX, f64::min).into();
    }

    summary
}

/// Extract a string sub-field from an event's details, tolerating every
/// malformed shape that has ever been written: non-object payloads and
/// double-encoded JSON strings both degrade to "unknown".
fn detail_str(event: &Event, field: &str) -> String {
    let from_map = |map: &serde_json::Map<String, Value>| {
        map.get(field).and_then(|v| v.as_str()).map(str::to_owned)
    };

    let value = match &event.details {
        Value::Object(map) => from_map(map),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => from_map(&map),
            _ => {
                debug!(event_id = %event.id, "unparsable details string; treating as empty");
                None
            }
        },
        _ => {
            debug!(event_id = %event.id, "details is not an object; treating as empty");
            None
        }
    };

    value.unwrap_or_else(|| "unknown".to_string())
}

/// Build the day-bucketed report: one line per event, oldest first for
/// readability, plus the day's summary.
///
/// Same precondition as [`summarize`]: `events` arrives newest-first.
pub fn daily_report(child: &Child, date: NaiveDate, events: &[Event]) -> DailyReport {
    let entries = events
        .iter()
        .rev()
        .map(|event| DailyReportEntry {
            occurred_at: event.occurred_at,
            event_type: event.event_type.clone(),
            line: format_event_line(event),
        })
        .collect();

    DailyReport {
        child_id: child.id,
        child_name: child.name.clone(),
        date,
        entries,
        summary: summarize(events),
    }
}

/// Render one event as a human-readable line, e.g. "7:30 AM: formula - 120 ml".
fn format_event_line(event: &Event) -> String {
    let time = event.occurred_at.format("%-I:%M %p");

    let body = match event.event_type.parse::<EventType>() {
        Ok(EventType::Feeding) => {
            let sub = detail_str(event, "feeding_type");
            match event.value {
                Some(v) => format!(
                    "{sub} - {} {}",
                    format_number(v),
                    event.unit.as_deref().unwrap_or("ml")
                ),
                None => sub,
            }
        }
        Ok(EventType::Sleeping) => match event.value {
            Some(v) => format!("slept {} min", format_number(v)),
            None => "slept".to_string(),
        },
        Ok(EventType::Diaper) => {
            format!("diaper change ({})", detail_str(event, "diaper_type"))
        }
        Ok(EventType::Growth) => match event.value {
            Some(v) => format!(
                "weight {} {}",
                format_number(v),
                event.unit.as_deref().unwrap_or("kg")
            ),
            None => "growth measurement".to_string(),
        },
        Ok(EventType::Medication) => {
            let name = detail_str(event, "medication_name");
            match &event.details {
                Value::Object(map) => match map.get("dosage").and_then(|v| v.as_str()) {
                    Some(dosage) => format!("{name} ({dosage})"),
                    None => name,
                },
                _ => name,
            }
        }
        Ok(EventType::Temperature) => match event.value {
            Some(v) => format!(
                "temperature {} {}",
                format_number(v),
                event.unit.as_deref().unwrap_or("°C")
            ),
            None => "temperature reading".to_string(),
        },
        Err(_) => event.event_type.clone(),
    };

    match &event.notes {
        Some(notes) if !notes.trim().is_empty() => format!("{time}: {body} ({notes})"),
        _ => format!("{time}: {body}"),
    }
}

/// Whole numbers print without a decimal point; everything else keeps one.
fn format_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;
    use uuid::Uuid;

    fn ts(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, hour, min, 0).unwrap()
    }

    fn ev(event_type: &str, occurred_at: DateTime<Utc>, value: Option<f64>, details: Value) -> Event {
        Event {
            id: Uuid::new_v4(),
            child_id: Uuid::new_v4(),
            event_type: event_type.to_string(),
            occurred_at,
            value,
            unit: None,
            notes: None,
            details,
            created_at: occurred_at,
            updated_at: occurred_at,
        }
    }

    fn child() -> Child {
        Child {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Maya".to_string(),
            birth_date: chrono::NaiveDate::from_ymd_opt(2024, 11, 2).unwrap(),
            gender: None,
            notes: None,
            created_at: ts(0, 0),
            updated_at: ts(0, 0),
        }
    }

    #[test]
    fn empty_input_is_deterministic() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_events, 0);
        assert_eq!(summary.events_by_type.sum(), 0);
        assert_eq!(summary.stats.sleep.average_duration, 0.0);
        assert_eq!(summary.stats.temperature.average, None);
        assert_eq!(summary.stats.temperature.highest, None);
        assert_eq!(summary.stats.growth.latest_weight, None);
    }

    #[test]
    fn unrecognized_types_count_in_total_only() {
        let events = vec![
            ev("feeding", ts(9, 0), None, json!({ "feeding_type": "bottle" })),
            ev("vaccination", ts(8, 0), None, json!({})),
        ];
        let summary = summarize(&events);
        assert_eq!(summary.total_events, 2);
        assert_eq!(summary.events_by_type.sum(), 1);
    }

    #[test]
    fn count_conservation_with_recognized_types() {
        let events = vec![
            ev("sleeping", ts(13, 0), Some(90.0), json!({})),
            ev("diaper", ts(11, 0), None, json!({ "diaper_type": "wet" })),
            ev("feeding", ts(9, 0), Some(120.0), json!({ "feeding_type": "formula" })),
        ];
        let summary = summarize(&events);
        assert_eq!(summary.total_events, 3);
        assert_eq!(summary.events_by_type.sum(), summary.total_events);
        assert_eq!(summary.events_by_type.sleep, 1);
        assert_eq!(summary.stats.sleep.total_duration, 90.0);
        assert_eq!(summary.stats.sleep.average_duration, 90.0);
    }

    #[test]
    fn malformed_details_degrade_to_unknown() {
        let events = vec![
            // Double-encoded free text, the way some historical rows look.
            ev("feeding", ts(10, 0), None, json!("Type: formula\nAmount: 120")),
            ev("medication", ts(9, 0), None, json!(42)),
        ];
        let summary = summarize(&events);
        assert_eq!(summary.total_events, 2);
        assert_eq!(summary.stats.feeding.by_type.get("unknown"), Some(&1));
        assert_eq!(summary.stats.medication.by_medication.get("unknown"), Some(&1));
    }

    #[test]
    fn double_encoded_object_details_still_parse() {
        let events = vec![ev(
            "feeding",
            ts(10, 0),
            None,
            json!("{\"feeding_type\": \"breast\"}"),
        )];
        let summary = summarize(&events);
        assert_eq!(summary.stats.feeding.by_type.get("breast"), Some(&1));
    }

    #[test]
    fn growth_weight_gain_is_latest_minus_oldest() {
        // Newest first, as the repository returns them.
        let events = vec![
            ev("growth", ts(12, 0), Some(10.0), json!({})),
            ev("growth", ts(11, 0), Some(8.0), json!({})),
            ev("growth", ts(10, 0), Some(6.0), json!({})),
        ];
        let summary = summarize(&events);
        assert_eq!(summary.stats.growth.latest_weight, Some(10.0));
        assert_eq!(summary.stats.growth.weight_gain, Some(4.0));

        let single = summarize(&events[..1]);
        assert_eq!(single.stats.growth.latest_weight, Some(10.0));
        assert_eq!(single.stats.growth.weight_gain, None);
    }

    #[test]
    fn temperature_bounds() {
        let events = vec![
            ev("temperature", ts(12, 0), Some(36.5), json!({})),
            ev("temperature", ts(11, 0), Some(38.2), json!({})),
            ev("temperature", ts(10, 0), Some(37.0), json!({})),
        ];
        let summary = summarize(&events);
        let avg = summary.stats.temperature.average.unwrap();
        assert!((avg - 37.2333).abs() < 0.001);
        assert_eq!(summary.stats.temperature.highest, Some(38.2));
        assert_eq!(summary.stats.temperature.lowest, Some(36.5));
    }

    #[test]
    fn null_values_count_but_do_not_contribute() {
        let events = vec![
            ev("temperature", ts(12, 0), None, json!({})),
            ev("sleeping", ts(11, 0), None, json!({})),
            ev("sleeping", ts(10, 0), Some(60.0), json!({})),
        ];
        let summary = summarize(&events);
        assert_eq!(summary.stats.temperature.count, 1);
        assert_eq!(summary.stats.temperature.average, None);
        assert_eq!(summary.stats.sleep.count, 2);
        assert_eq!(summary.stats.sleep.total_duration, 60.0);
        assert_eq!(summary.stats.sleep.average_duration, 30.0);
    }

    #[test]
    fn aggregation_is_order_independent() {
        // No growth events here: growth is the one stat that reads order.
        let events = vec![
            ev("feeding", ts(9, 0), Some(120.0), json!({ "feeding_type": "formula" })),
            ev("sleeping", ts(13, 0), Some(90.0), json!({})),
            ev("temperature", ts(15, 0), Some(37.5), json!({})),
            ev("feeding", ts(12, 0), Some(90.0), json!({ "feeding_type": "breast" })),
            ev("diaper", ts(11, 0), None, json!({ "diaper_type": "dirty" })),
        ];

        let baseline = summarize(&events);
        let mut rotated = events.clone();
        rotated.rotate_left(2);
        let mut reversed = events.clone();
        reversed.reverse();

        assert_eq!(summarize(&rotated), baseline);
        assert_eq!(summarize(&reversed), baseline);
    }

    #[test]
    fn daily_report_lines_read_oldest_first() {
        let mut feeding = ev(
            "feeding",
            Utc.with_ymd_and_hms(2025, 6, 10, 7, 30, 0).unwrap(),
            Some(120.0),
            json!({ "feeding_type": "formula" }),
        );
        feeding.unit = Some("ml".to_string());
        let nap = ev("sleeping", ts(13, 0), Some(90.0), json!({}));

        // Repository order: newest first.
        let report = daily_report(
            &child(),
            chrono::NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            &[nap, feeding],
        );

        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].line, "7:30 AM: formula - 120 ml");
        assert_eq!(report.entries[1].line, "1:00 PM: slept 90 min");
        assert_eq!(report.summary.total_events, 2);
    }
}
