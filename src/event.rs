use std::collections::BTreeMap;
use std::io::Read;

use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Tags attached to a metric, keys are kept verbatim (e.g. `status.statusReason`).
pub type Tags = BTreeMap<String, String>;

/// Kind of the telemetry event, only `systemInfo` carries metrics.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub enum EventType {
    #[serde(rename = "systemInfo")]
    SystemInfo,
    #[serde(rename = "AVR")]
    Avr,
    #[serde(rename = "LTM")]
    Ltm,
    #[serde(rename = "ASM")]
    Asm,
    #[serde(rename = "APM")]
    Apm,
    #[serde(rename = "AFM")]
    Afm,
    #[serde(rename = "syslog")]
    Syslog,
    #[serde(rename = "event")]
    Event,
    #[serde(rename = "raw")]
    Raw,
    #[serde(rename = "ihealthInfo")]
    IHealthInfo,
    #[serde(rename = "CGNAT")]
    Cgnat,
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Event {
    #[serde(rename = "type", alias = "eventType")]
    pub event_type: EventType,

    #[serde(default)]
    pub data: Value,
}

impl Event {
    pub fn new(event_type: EventType, data: Value) -> Self {
        Self { event_type, data }
    }

    pub fn system_info(data: Value) -> Self {
        Self::new(EventType::SystemInfo, data)
    }

    #[inline]
    pub fn is_system_info(&self) -> bool {
        self.event_type == EventType::SystemInfo
    }
}

/// Read a stream of events, documents may be concatenated or newline separated.
pub fn read_events<R: Read>(reader: R) -> impl Iterator<Item = serde_json::Result<Event>> {
    serde_json::Deserializer::from_reader(reader).into_iter::<Event>()
}

/// A single flattened metric.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct MetricRecord {
    #[serde(rename = "metricName")]
    pub name: String,

    #[serde(rename = "metricValue")]
    pub value: f64,

    #[serde(rename = "metricTags", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

impl MetricRecord {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            tags: None,
        }
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = Some(tags);
        self
    }

    /// `<metricName>: <metricValue>`
    pub fn trace_line(&self) -> String {
        format!("{}: {}", self.name, self.value)
    }
}

/// What the trace sink receives for every record, serialized as `[line, tags]`.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceEntry {
    pub line: String,
    pub tags: Tags,
}

impl From<&MetricRecord> for TraceEntry {
    fn from(record: &MetricRecord) -> Self {
        Self {
            line: record.trace_line(),
            tags: record.tags.clone().unwrap_or_default(),
        }
    }
}

impl Serialize for TraceEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.line)?;
        tuple.serialize_element(&self.tags)?;
        tuple.end()
    }
}
