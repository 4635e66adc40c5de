use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// One sensor sample as delivered by the endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reading {
    /// Unique identifier assigned by the collector.
    pub id: i64,
    /// Measured distance in centimeters.
    pub value: f64,
    /// When the sample was taken.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// LED state derived from a reading's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedState {
    On,
    Off,
}

impl LedState {
    /// Classifies a value against the threshold. Ties resolve to On.
    pub fn classify(value: f64, threshold: f64) -> Self {
        if value >= threshold {
            LedState::On
        } else {
            LedState::Off
        }
    }

    /// Display label for the state.
    pub fn label(self) -> &'static str {
        match self {
            LedState::On => "On",
            LedState::Off => "Off",
        }
    }
}

/// Accepted timestamp wire formats. The collector only promises something
/// "parseable into a date": RFC 3339 strings, naive date-times with a space
/// or 'T' separator, or integer Unix milliseconds.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireTimestamp {
    Text(String),
    Millis(i64),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match WireTimestamp::deserialize(deserializer)? {
        WireTimestamp::Text(s) => parse_timestamp_str(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unparseable timestamp: {s:?}"))),
        WireTimestamp::Millis(ms) => DateTime::<Utc>::from_timestamp_millis(ms)
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {ms}"))),
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Formats a measurement for display: whole centimeters without a fraction,
/// anything else to two decimals.
pub fn format_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_above_threshold() {
        assert_eq!(LedState::classify(310.0, 300.0), LedState::On);
    }

    #[test]
    fn test_classify_below_threshold() {
        assert_eq!(LedState::classify(150.0, 300.0), LedState::Off);
    }

    #[test]
    fn test_classify_tie_is_on() {
        assert_eq!(LedState::classify(300.0, 300.0), LedState::On);
    }

    #[test]
    fn test_deserialize_rfc3339() {
        let json = r#"{"id": 1, "value": 310, "timestamp": "2024-11-02T14:30:00Z"}"#;
        let r: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(r.id, 1);
        assert_eq!(r.value, 310.0);
        assert_eq!(r.timestamp.to_rfc3339(), "2024-11-02T14:30:00+00:00");
    }

    #[test]
    fn test_deserialize_naive_with_space() {
        let json = r#"{"id": 2, "value": 150.5, "timestamp": "2024-11-02 14:30:00"}"#;
        let r: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(r.value, 150.5);
    }

    #[test]
    fn test_deserialize_unix_millis() {
        let json = r#"{"id": 3, "value": 42, "timestamp": 1730557800000}"#;
        let r: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(r.timestamp.timestamp_millis(), 1730557800000);
    }

    #[test]
    fn test_deserialize_garbage_timestamp_fails() {
        let json = r#"{"id": 4, "value": 1, "timestamp": "not a date"}"#;
        assert!(serde_json::from_str::<Reading>(json).is_err());
    }

    #[test]
    fn test_deserialize_snapshot_array() {
        let json = r#"[
            {"id": 1, "value": 310, "timestamp": "2024-11-02T14:30:00Z"},
            {"id": 2, "value": 150, "timestamp": "2024-11-02T14:30:15Z"}
        ]"#;
        let snapshot: Vec<Reading> = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id, 1);
        assert_eq!(snapshot[1].value, 150.0);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(310.0), "310");
        assert_eq!(format_value(150.25), "150.25");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(99.5), "99.50");
    }
}
