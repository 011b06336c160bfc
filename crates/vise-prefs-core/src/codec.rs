//! JSON text encoding for stored values.
//!
//! Values are written as JSON indented by two spaces, with non-ASCII text
//! left as-is so the database stays readable in a SQLite shell.
//!
//! JSON has no byte strings, so a [`Value::Blob`] is wrapped in an envelope:
//!
//! ```json
//! {
//!   "__class__": "bytearray",
//!   "__value__": "AAH/ZGF0YQ=="
//! }
//! ```
//!
//! The payload uses the standard base64 alphabet with padding. Any object
//! carrying `__class__` is treated as an envelope on decode, so a mapping that
//! uses that key itself is refused at encode time.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use serde_json::{Map, Number, Value as Json};

use crate::error::{CodecError, Result};
use crate::value::Value;

/// Envelope field holding the type tag.
pub const CLASS_KEY: &str = "__class__";

/// Envelope field holding the base64 payload.
pub const VALUE_KEY: &str = "__value__";

/// Type tag for binary blobs.
pub const BLOB_CLASS: &str = "bytearray";

/// Encode a value to its stored text.
pub fn encode(value: &Value) -> Result<String> {
    let json = to_json(value)?;
    serde_json::to_string_pretty(&json).map_err(|e| CodecError::UnencodableValue(e.to_string()))
}

/// Decode stored text back into a value.
pub fn decode(text: &str) -> Result<Value> {
    let json: Json =
        serde_json::from_str(text).map_err(|e| CodecError::CorruptValue(e.to_string()))?;
    from_json(json)
}

fn to_json(value: &Value) -> Result<Json> {
    Ok(match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::Number((*i).into()),
        Value::Float(x) => Number::from_f64(*x).map(Json::Number).ok_or_else(|| {
            CodecError::UnencodableValue(format!("non-finite float {}", x))
        })?,
        Value::Text(s) => Json::String(s.clone()),
        Value::List(items) => Json::Array(items.iter().map(to_json).collect::<Result<_>>()?),
        Value::Map(map) => {
            if map.contains_key(CLASS_KEY) {
                return Err(CodecError::UnencodableValue(format!(
                    "mapping uses reserved key {:?}",
                    CLASS_KEY
                )));
            }
            let mut obj = Map::new();
            for (k, v) in map {
                obj.insert(k.clone(), to_json(v)?);
            }
            Json::Object(obj)
        }
        Value::Blob(bytes) => blob_envelope(bytes),
    })
}

fn blob_envelope(bytes: &[u8]) -> Json {
    let mut obj = Map::new();
    obj.insert(CLASS_KEY.to_owned(), Json::String(BLOB_CLASS.to_owned()));
    obj.insert(VALUE_KEY.to_owned(), Json::String(STANDARD.encode(bytes)));
    Json::Object(obj)
}

fn from_json(json: Json) -> Result<Value> {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().ok_or_else(|| {
                CodecError::CorruptValue(format!("unrepresentable number {}", n))
            })?),
        },
        Json::String(s) => Value::Text(s),
        Json::Array(items) => {
            Value::List(items.into_iter().map(from_json).collect::<Result<_>>()?)
        }
        Json::Object(obj) if obj.contains_key(CLASS_KEY) => open_envelope(obj)?,
        Json::Object(obj) => {
            let mut map = BTreeMap::new();
            for (k, v) in obj {
                map.insert(k, from_json(v)?);
            }
            Value::Map(map)
        }
    })
}

fn open_envelope(obj: Map<String, Json>) -> Result<Value> {
    let class = obj.get(CLASS_KEY).and_then(Json::as_str);
    if class != Some(BLOB_CLASS) {
        return Err(CodecError::CorruptValue(format!(
            "unknown envelope class {}",
            obj.get(CLASS_KEY).map(ToString::to_string).unwrap_or_default()
        )));
    }
    if obj.len() != 2 {
        return Err(CodecError::CorruptValue(
            "blob envelope has unexpected fields".into(),
        ));
    }
    let payload = obj
        .get(VALUE_KEY)
        .and_then(Json::as_str)
        .ok_or_else(|| CodecError::CorruptValue("blob envelope without payload".into()))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| CodecError::CorruptValue(format!("blob payload: {}", e)))?;
    Ok(Value::Blob(Bytes::from(bytes)))
}
