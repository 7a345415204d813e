//! Codec boundary between raw file bytes and the object graph

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use serde_json::{Map, Number};

use super::{Node, Value};
use crate::error::{Error, Result};

/// Key holding an object's class name in JSON form.
pub const CLASS_KEY: &str = "__class";
/// Key marking a typed wrapper object in JSON form.
pub const TYPE_KEY: &str = "__type";
/// Type tag of a binary value wrapper.
pub const BYTES_TYPE: &str = "bytes";

/// Decodes file bytes into a graph and encodes it back.
///
/// Implementations must keep field identity and unknown fields across a
/// decode/encode round trip. The engine makes no other assumption about the
/// on-disk layout.
pub trait GraphCodec: Send + Sync {
    /// Decode raw file content.
    fn decode(&self, bytes: &[u8]) -> Result<Value>;

    /// Encode a graph to raw file content.
    fn encode(&self, graph: &Value) -> Result<Vec<u8>>;
}

/// JSON codec for MV/MZ data files and JSON dumps of Marshal data.
///
/// Binary values are written as `{"__type": "bytes", "data": "<base64>"}`;
/// on input the `data` may also be an array of byte values.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    /// Pretty-print output instead of the compact form the engine writes.
    pub pretty: bool,
}

impl JsonCodec {
    /// Compact JSON codec.
    #[must_use]
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Pretty-printing JSON codec.
    #[must_use]
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl GraphCodec for JsonCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        // Data files written by the editor may carry a UTF-8 BOM
        let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
        let json: serde_json::Value = serde_json::from_slice(bytes)?;
        from_json(json)
    }

    fn encode(&self, graph: &Value) -> Result<Vec<u8>> {
        let json = to_json(graph);
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&json)?
        } else {
            serde_json::to_vec(&json)?
        };
        Ok(bytes)
    }
}

/// Convert a parsed JSON value into a graph value.
pub fn from_json(json: serde_json::Value) -> Result<Value> {
    Ok(match json {
        serde_json::Value::Null => Value::Nil,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => number_to_value(&n),
        serde_json::Value::String(s) => Value::Str(s),
        serde_json::Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(from_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        serde_json::Value::Object(map) => object_to_value(map)?,
    })
}

fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Int(i)
    } else {
        // u64 beyond i64::MAX and real numbers
        Value::Float(n.as_f64().unwrap_or_default())
    }
}

fn object_to_value(mut map: Map<String, serde_json::Value>) -> Result<Value> {
    if map.get(TYPE_KEY).and_then(serde_json::Value::as_str) == Some(BYTES_TYPE) {
        let data = map.remove("data").unwrap_or(serde_json::Value::Null);
        return Ok(Value::Bytes(bytes_from_json(data)?));
    }

    let class = match map.get(CLASS_KEY) {
        Some(serde_json::Value::String(_)) => match map.shift_remove(CLASS_KEY) {
            Some(serde_json::Value::String(class)) => Some(class),
            _ => None,
        },
        _ => None,
    };

    let mut fields = IndexMap::with_capacity(map.len());
    for (key, value) in map {
        fields.insert(key, from_json(value)?);
    }

    Ok(Value::Object(Node { class, fields }))
}

fn bytes_from_json(data: serde_json::Value) -> Result<Vec<u8>> {
    match data {
        serde_json::Value::String(encoded) => Ok(STANDARD.decode(encoded)?),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| Error::InvalidGraph(format!("invalid byte value: {item}")))
            })
            .collect(),
        other => Err(Error::InvalidGraph(format!("invalid bytes payload: {other}"))),
    }
}

/// Convert a graph value into JSON.
#[must_use]
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Nil => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => Number::from_f64(*f).map_or(serde_json::Value::Null, serde_json::Value::Number),
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::Bytes(bytes) => {
            let mut map = Map::new();
            map.insert(TYPE_KEY.to_string(), BYTES_TYPE.into());
            map.insert("data".to_string(), STANDARD.encode(bytes).into());
            serde_json::Value::Object(map)
        }
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Object(node) => {
            let mut map = Map::new();
            if let Some(class) = &node.class {
                map.insert(CLASS_KEY.to_string(), class.clone().into());
            }
            for (key, field) in &node.fields {
                map.insert(key.clone(), to_json(field));
            }
            serde_json::Value::Object(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_keeps_field_order() {
        let codec = JsonCodec::new();
        let graph = codec
            .decode(br#"{"id":1,"name":"Harold","note":"","zzz":[1,2.5,null]}"#)
            .unwrap();

        let node = graph.as_node().unwrap();
        let keys: Vec<&str> = node.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "name", "note", "zzz"]);

        let bytes = codec.encode(&graph).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"id":1,"name":"Harold","note":"","zzz":[1,2.5,null]}"#
        );
    }

    #[test]
    fn test_class_and_bytes() {
        let codec = JsonCodec::new();
        let graph = codec
            .decode(br#"{"__class":"RPG::Script","code":{"__type":"bytes","data":[120,156]}}"#)
            .unwrap();

        let node = graph.as_node().unwrap();
        assert_eq!(node.class.as_deref(), Some("RPG::Script"));
        assert_eq!(node.fields.get("code"), Some(&Value::Bytes(vec![120, 156])));

        let encoded = String::from_utf8(codec.encode(&graph).unwrap()).unwrap();
        assert!(encoded.starts_with(r#"{"__class":"RPG::Script""#));
        assert!(encoded.contains(r#""data":"eJw=""#));
    }

    #[test]
    fn test_decode_strips_bom() {
        let codec = JsonCodec::new();
        let graph = codec.decode(b"\xEF\xBB\xBF[null]").unwrap();
        assert_eq!(graph, Value::Array(vec![Value::Nil]));
    }

    #[test]
    fn test_invalid_byte_payload() {
        let codec = JsonCodec::new();
        let result = codec.decode(br#"{"__type":"bytes","data":[300]}"#);
        assert!(matches!(result, Err(Error::InvalidGraph(_))));
    }
}
