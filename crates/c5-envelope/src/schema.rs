use c5_canonical::{Map, Value};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Hop limit applied when the caller gives none.
pub const DEFAULT_TTL: u32 = 10;

/// Envelope format tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Version {
    /// The only format revision.
    #[default]
    #[serde(rename = "A")]
    A,
}

impl Version {
    /// Wire form of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Version::A => "A",
        }
    }
}

/// Caller-defined body carried by an envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Payload type discriminator.
    pub kind: String,
    /// Opaque body.
    #[serde(default)]
    pub data: Value,
}

impl Payload {
    /// Creates a payload.
    pub fn new(kind: impl Into<String>, data: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            data: data.into(),
        }
    }

    /// Reads a payload from a generic JSON mapping.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        decode(value, "payload")
    }

    /// Parses a payload from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ValidationError> {
        parse(text, "payload")
    }

    /// Canonical value form (`{data, kind}`).
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("kind".to_string(), Value::from(self.kind.as_str()));
        map.insert("data".to_string(), self.data.clone());
        Value::Object(map)
    }
}

/// Message wrapper with routing and lifecycle metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Format tag, always `"A"`.
    pub v: Version,
    /// Message id, `"<t>-<digest>"` unless supplied by the sender.
    pub id: String,
    /// Sender identifier.
    pub src: String,
    /// Destinations, possibly empty.
    #[serde(default)]
    pub dst: Vec<String>,
    /// Milliseconds since the Unix epoch.
    pub t: i64,
    /// Hop limit.
    #[serde(default = "default_ttl")]
    pub ttl: u32,
    /// Carried payload.
    pub data: Payload,
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

impl Envelope {
    /// Reads an envelope from a generic JSON mapping.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        decode(value, "envelope")
    }

    /// Parses an envelope from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ValidationError> {
        parse(text, "envelope")
    }

    /// Canonical value form, walked when rendering the envelope.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("v".to_string(), Value::from(self.v.as_str()));
        map.insert("id".to_string(), Value::from(self.id.as_str()));
        map.insert("src".to_string(), Value::from(self.src.as_str()));
        map.insert(
            "dst".to_string(),
            Value::Array(self.dst.iter().map(|d| Value::from(d.as_str())).collect()),
        );
        map.insert("t".to_string(), Value::from(self.t));
        map.insert("ttl".to_string(), Value::from(self.ttl));
        map.insert("data".to_string(), self.data.to_value());
        Value::Object(map)
    }
}

fn decode<T: DeserializeOwned>(
    value: serde_json::Value,
    type_name: &'static str,
) -> Result<T, ValidationError> {
    serde_json::from_value(value).map_err(|err| ValidationError::Schema {
        type_name,
        reason: err.to_string(),
    })
}

fn parse<T: DeserializeOwned>(text: &str, type_name: &'static str) -> Result<T, ValidationError> {
    serde_json::from_str(text).map_err(|err| ValidationError::Schema {
        type_name,
        reason: err.to_string(),
    })
}
