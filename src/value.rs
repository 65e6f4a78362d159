//! The stable, bit-compatible output value schema (§6) and its JSON
//! rendering. Mirrors the originating crate's `DimensionValue`/`TimeValue`
//! JSON shape, hand-serialized (rather than `#[derive(Serialize)]`) since
//! the shape of `SingleTimeValue` varies by variant in a way a tagged
//! derive can't express directly (an open interval omits whichever of
//! `from`/`to` doesn't apply).

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};

use crate::context::TimeZoneSeries;
use crate::grain::Grain;

/// A single grain-qualified instant, rendered in its target zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstantValue {
    pub value: DateTime<FixedOffset>,
    pub grain: Grain,
}

impl InstantValue {
    /// Convert a UTC instant into the zone's local wall-clock representation.
    pub fn new(instant: DateTime<chrono::Utc>, grain: Grain, tz_series: TimeZoneSeries) -> Self {
        let local = instant.with_timezone(&tz_series.0).fixed_offset();
        InstantValue { value: local, grain }
    }
}

impl Serialize for InstantValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("value", &self.value.to_rfc3339_opts(SecondsFormat::Millis, false))?;
        map.serialize_entry("grain", self.grain.as_str())?;
        map.end()
    }
}

/// Which side of an open interval is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Before,
    After,
}

/// One resolved value: a point, a closed interval, or an open-ended one.
#[derive(Debug, Clone, PartialEq)]
pub enum SingleTimeValue {
    Simple(InstantValue),
    Interval(InstantValue, InstantValue),
    OpenInterval(InstantValue, Direction),
}

impl Serialize for SingleTimeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SingleTimeValue::Simple(instant) => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "value")?;
                map.serialize_entry(
                    "value",
                    &instant.value.to_rfc3339_opts(SecondsFormat::Millis, false),
                )?;
                map.serialize_entry("grain", instant.grain.as_str())?;
                map.end()
            }
            SingleTimeValue::Interval(from, to) => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "interval")?;
                map.serialize_entry("from", from)?;
                map.serialize_entry("to", to)?;
                map.end()
            }
            SingleTimeValue::OpenInterval(instant, direction) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "interval")?;
                match direction {
                    Direction::Before => map.serialize_entry("to", instant)?,
                    Direction::After => map.serialize_entry("from", instant)?,
                }
                map.end()
            }
        }
    }
}

/// The resolver's full answer: the chosen value plus a short lookahead of
/// alternatives, flattened into one JSON object with a `"values"` array.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeValue {
    pub chosen: SingleTimeValue,
    pub alternatives: Vec<SingleTimeValue>,
}

impl Serialize for TimeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut value = serde_json::to_value(&self.chosen).map_err(S::Error::custom)?;
        let alternatives = serde_json::to_value(&self.alternatives).map_err(S::Error::custom)?;
        if let serde_json::Value::Object(ref mut map) = value {
            map.insert("values".to_string(), alternatives);
        }
        value.serialize(serializer)
    }
}
