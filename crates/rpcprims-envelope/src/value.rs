use std::fmt;

use serde::{Deserialize, Serialize};

use crate::convert::{FromValue, IntoValue};
use crate::error::ConvertError;

/// A self-describing, runtime-typed value carried in an envelope slot.
///
/// The vocabulary is closed: every variant maps to exactly one wire tag.
/// `Absent` marks an empty slot (a nil result, an omitted value) and is
/// distinct from every present value, including zero values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Explicitly empty slot.
    #[default]
    Absent,
    Bool(bool),
    /// Signed 64-bit integer.
    Int(i64),
    /// Unsigned 64-bit integer.
    Uint(u64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Record(Record),
}

impl Value {
    /// Short type name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("<absent>"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Uint(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Str(v) => write!(f, "{v:?}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Record(record) => write!(f, "{record}"),
        }
    }
}

/// A user-declared aggregate with ordered, named fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    /// Record type name, e.g. `"User"`. May be empty for anonymous records.
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field, converting the value.
    pub fn with_field(mut self, field: impl Into<String>, value: impl IntoValue) -> Self {
        self.push(field, value.into_value());
        self
    }

    /// Append a field.
    pub fn push(&mut self, field: impl Into<String>, value: Value) {
        self.fields.push((field.into(), value));
    }

    /// Look up a field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Remove a field by name and return its value.
    pub fn take(&mut self, field: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(name, _)| name == field)?;
        Some(self.fields.remove(index).1)
    }

    /// Remove a field and convert it.
    ///
    /// A missing field is treated as `Absent`, so optional fields decode to
    /// `None`; any other target reports `MissingField`.
    pub fn take_as<T: FromValue>(&mut self, field: &str) -> Result<T, ConvertError> {
        match self.take(field) {
            Some(value) => T::from_value(value),
            None => T::from_value(Value::Absent).map_err(|_| ConvertError::MissingField {
                record: self.name.clone(),
                field: field.to_string(),
            }),
        }
    }

    /// Fail unless this record carries the expected name.
    pub fn expect_name(&self, expected: &str) -> Result<(), ConvertError> {
        if self.name == expected {
            return Ok(());
        }
        Err(ConvertError::RecordName {
            expected: expected.to_string(),
            found: self.name.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.name.is_empty() {
            write!(f, "{} ", self.name)?;
        }
        f.write_str("{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            write!(f, "{name}: {value}")?;
        }
        if !self.fields.is_empty() {
            f.write_str(" ")?;
        }
        f.write_str("}")
    }
}
