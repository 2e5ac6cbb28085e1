use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Valid values for the feeding_type detail field.
pub const FEEDING_TYPES: &[&str] = &["bottle", "breast", "formula", "solid"];

/// Valid values for the diaper_type detail field.
pub const DIAPER_TYPES: &[&str] = &["wet", "dirty", "mixed", "dry"];

/// Valid values for the temperature measurement method.
pub const TEMPERATURE_METHODS: &[&str] = &["oral", "rectal", "axillary", "ear", "forehead"];

/// The event categories this version knows how to aggregate. Converted to
/// and from the stored TEXT via `Display`/`FromStr`, never serialized
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Feeding,
    Sleeping,
    Diaper,
    Growth,
    Medication,
    Temperature,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventType::Feeding => "feeding",
            EventType::Sleeping => "sleeping",
            EventType::Diaper => "diaper",
            EventType::Growth => "growth",
            EventType::Medication => "medication",
            EventType::Temperature => "temperature",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for EventType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feeding" => Ok(EventType::Feeding),
            "sleeping" => Ok(EventType::Sleeping),
            "diaper" => Ok(EventType::Diaper),
            "growth" => Ok(EventType::Growth),
            "medication" => Ok(EventType::Medication),
            "temperature" => Ok(EventType::Temperature),
            _ => Err(anyhow::anyhow!("Unknown event type: {s}")),
        }
    }
}

/// DB row struct — event_type is kept as TEXT so rows written by older
/// versions with types this one no longer recognizes still load (they count
/// toward report totals even when no per-type bucket exists for them).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub child_id: Uuid,
    pub event_type: String,
    pub occurred_at: DateTime<Utc>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub notes: Option<String>,
    pub details: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Typed shapes for the per-type details payload, checked on write only.
// Reads never assume these survived: historical rows predate validation.

#[derive(Debug, Deserialize)]
pub struct FeedingDetails {
    pub feeding_type: String,
    pub amount_ml: Option<f64>,
    pub duration_minutes: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SleepingDetails {
    pub location: Option<String>,
    pub quality: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DiaperDetails {
    pub diaper_type: String,
}

#[derive(Debug, Deserialize)]
pub struct GrowthDetails {
    pub height_cm: Option<f64>,
    pub head_circumference_cm: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct MedicationDetails {
    pub medication_name: String,
    pub dosage: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TemperatureDetails {
    pub method: Option<String>,
}

#[derive(Debug, Error)]
pub enum DetailsError {
    #[error("details must be a JSON object")]
    NotAnObject,
    #[error("invalid details for {event_type} event: {reason}")]
    Invalid { event_type: String, reason: String },
    #[error("invalid {field} value: {value}")]
    BadValue { field: &'static str, value: String },
}

/// Validate a details payload against its event type before it is written.
///
/// Unrecognized event types accept any JSON object verbatim: the set of
/// types is open and older data must keep round-tripping.
pub fn validate_details(event_type: &str, details: &Value) -> Result<(), DetailsError> {
    if !details.is_object() {
        return Err(DetailsError::NotAnObject);
    }

    let parsed: Result<EventType, _> = event_type.parse();
    let Ok(event_type) = parsed else {
        return Ok(());
    };

    match event_type {
        EventType::Feeding => {
            let d: FeedingDetails = deserialize(event_type, details)?;
            if !FEEDING_TYPES.contains(&d.feeding_type.as_str()) {
                return Err(DetailsError::BadValue {
                    field: "feeding_type",
                    value: d.feeding_type,
                });
            }
        }
        EventType::Sleeping => {
            let _: SleepingDetails = deserialize(event_type, details)?;
        }
        EventType::Diaper => {
            let d: DiaperDetails = deserialize(event_type, details)?;
            if !DIAPER_TYPES.contains(&d.diaper_type.as_str()) {
                return Err(DetailsError::BadValue {
                    field: "diaper_type",
                    value: d.diaper_type,
                });
            }
        }
        EventType::Growth => {
            let _: GrowthDetails = deserialize(event_type, details)?;
        }
        EventType::Medication => {
            let d: MedicationDetails = deserialize(event_type, details)?;
            if d.medication_name.trim().is_empty() {
                return Err(DetailsError::BadValue {
                    field: "medication_name",
                    value: d.medication_name,
                });
            }
        }
        EventType::Temperature => {
            let d: TemperatureDetails = deserialize(event_type, details)?;
            if let Some(method) = d.method {
                if !TEMPERATURE_METHODS.contains(&method.as_str()) {
                    return Err(DetailsError::BadValue {
                        field: "method",
                        value: method,
                    });
                }
            }
        }
    }

    Ok(())
}

fn deserialize<T: serde::de::DeserializeOwned>(
    event_type: EventType,
    details: &Value,
) -> Result<T, DetailsError> {
    serde_json::from_value(details.clone()).map_err(|e| DetailsError::Invalid {
        event_type: event_type.to_string(),
        reason: e.to_string(),
    })
}

// Request/query DTOs

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub event_type: String,
    pub occurred_at: DateTime<Utc>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub notes: Option<String>,
    #[serde(default = "empty_object")]
    pub details: Value,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    pub occurred_at: Option<DateTime<Utc>>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub notes: Option<String>,
    pub details: Option<Value>,
}

/// Query params for GET /children/{id}/events.
#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    pub event_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn feeding_details_require_known_type() {
        assert!(validate_details("feeding", &json!({ "feeding_type": "formula" })).is_ok());
        assert!(validate_details("feeding", &json!({ "feeding_type": "pizza" })).is_err());
        assert!(validate_details("feeding", &json!({})).is_err());
    }

    #[test]
    fn medication_name_must_not_be_blank() {
        assert!(
            validate_details("medication", &json!({ "medication_name": "paracetamol" })).is_ok()
        );
        assert!(validate_details("medication", &json!({ "medication_name": "  " })).is_err());
    }

    #[test]
    fn unrecognized_types_accept_any_object() {
        assert!(validate_details("vaccination", &json!({ "vaccine": "mmr" })).is_ok());
        assert!(validate_details("vaccination", &json!("free text")).is_err());
    }

    #[test]
    fn details_must_be_an_object() {
        assert!(matches!(
            validate_details("sleeping", &json!(42)),
            Err(DetailsError::NotAnObject)
        ));
    }
}
