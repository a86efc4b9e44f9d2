//! Plain JSON <-> `Value` mapping for command-line arguments and output.

use rpcprims_envelope::{Record, Value};
use serde_json::{Map, Number, Value as Json};

/// Map plain JSON onto a dynamic value.
///
/// `null` is absent, integers become `Int` (or `Uint` above `i64::MAX`),
/// other numbers `Float`, and objects anonymous records.
pub fn json_to_value(json: Json) -> Value {
    match json {
        Json::Null => Value::Absent,
        Json::Bool(v) => Value::Bool(v),
        Json::Number(n) => number_to_value(&n),
        Json::String(s) => Value::Str(s),
        Json::Array(items) => Value::List(items.into_iter().map(json_to_value).collect()),
        Json::Object(map) => {
            let mut record = Record::new("");
            for (field, value) in map {
                record.push(field, json_to_value(value));
            }
            Value::Record(record)
        }
    }
}

fn number_to_value(n: &Number) -> Value {
    if let Some(v) = n.as_i64() {
        Value::Int(v)
    } else if let Some(v) = n.as_u64() {
        Value::Uint(v)
    } else {
        Value::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Map a dynamic value onto plain JSON. Record names are dropped.
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Absent => Json::Null,
        Value::Bool(v) => Json::Bool(*v),
        Value::Int(v) => Json::from(*v),
        Value::Uint(v) => Json::from(*v),
        Value::Float(v) => Number::from_f64(*v).map_or(Json::Null, Json::Number),
        Value::Str(v) => Json::String(v.clone()),
        Value::List(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Record(record) => {
            let mut map = Map::new();
            for (field, value) in &record.fields {
                map.insert(field.clone(), value_to_json(value));
            }
            Json::Object(map)
        }
    }
}

/// Parse `--args`: a JSON array in plain form, or in tagged form when `typed`.
pub fn parse_args(raw: &str, typed: bool) -> Result<Vec<Value>, String> {
    if typed {
        return serde_json::from_str::<Vec<Value>>(raw)
            .map_err(|err| format!("invalid typed arguments: {err}"));
    }
    match serde_json::from_str::<Json>(raw) {
        Ok(Json::Array(items)) => Ok(items.into_iter().map(json_to_value).collect()),
        Ok(_) => Err("arguments must be a JSON array".to_string()),
        Err(err) => Err(format!("invalid JSON arguments: {err}")),
    }
}
