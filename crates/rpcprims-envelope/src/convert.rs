//! Conversions between static Rust types and [`Value`].
//!
//! Integers convert across `Int`/`Uint` whenever the number fits the target;
//! everything else must match its tag exactly.

use crate::error::ConvertError;
use crate::value::{Record, Value};

/// Convert a static value into a dynamic [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Reconstruct a static value from a dynamic [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ConvertError>;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        Ok(value)
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(ConvertError::mismatch("bool", &other)),
        }
    }
}

macro_rules! impl_integer {
    ($variant:ident => $($ty:ty),*) => {$(
        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::$variant(self.into())
            }
        }

        impl_integer!(@from $ty);
    )*};
    (@from $ty:ty) => {
        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, ConvertError> {
                let out_of_range = |v: &dyn std::fmt::Display| ConvertError::OutOfRange {
                    target: stringify!($ty),
                    value: v.to_string(),
                };
                match value {
                    Value::Int(v) => <$ty>::try_from(v).map_err(|_| out_of_range(&v)),
                    Value::Uint(v) => <$ty>::try_from(v).map_err(|_| out_of_range(&v)),
                    other => Err(ConvertError::mismatch(stringify!($ty), &other)),
                }
            }
        }
    };
}

impl_integer!(Int => i8, i16, i32, i64);
impl_integer!(Uint => u8, u16, u32, u64);
impl_integer!(@from isize);
impl_integer!(@from usize);

// Pointer-sized integers are at most 64 bits wide on supported targets.
impl IntoValue for isize {
    fn into_value(self) -> Value {
        Value::Int(self as i64)
    }
}

impl IntoValue for usize {
    fn into_value(self) -> Value {
        Value::Uint(self as u64)
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            Value::Uint(v) => Ok(v as f64),
            other => Err(ConvertError::mismatch("f64", &other)),
        }
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Str(self.to_owned())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Str(v) => Ok(v),
            other => Err(ConvertError::mismatch("string", &other)),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Absent,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Absent => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| T::from_value(item).map_err(|e| e.at_slot(i)))
                .collect(),
            other => Err(ConvertError::mismatch("list", &other)),
        }
    }
}

impl IntoValue for Record {
    fn into_value(self) -> Value {
        Value::Record(self)
    }
}

impl FromValue for Record {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Record(record) => Ok(record),
            other => Err(ConvertError::mismatch("record", &other)),
        }
    }
}

/// Implement [`IntoValue`] and [`FromValue`] for a struct with named fields.
///
/// The struct becomes a [`Record`] named after the type, with one field per
/// listed struct field in the given order. Decoding matches fields by name
/// and accepts anonymous records (empty record name) as well.
///
/// ```
/// use rpcprims_envelope::{rpc_record, FromValue, IntoValue};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct User {
///     name: String,
///     age: i64,
/// }
///
/// rpc_record!(User { name, age });
///
/// let value = User { name: "Jack".into(), age: 30 }.into_value();
/// assert_eq!(value.to_string(), "User { name: \"Jack\", age: 30 }");
/// assert_eq!(User::from_value(value).unwrap().age, 30);
/// ```
#[macro_export]
macro_rules! rpc_record {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::IntoValue for $ty {
            fn into_value(self) -> $crate::Value {
                #[allow(unused_mut)]
                let mut record = $crate::Record::new(stringify!($ty));
                $(
                    record.push(stringify!($field), $crate::IntoValue::into_value(self.$field));
                )*
                $crate::Value::Record(record)
            }
        }

        impl $crate::FromValue for $ty {
            fn from_value(
                value: $crate::Value,
            ) -> ::std::result::Result<Self, $crate::ConvertError> {
                match value {
                    #[allow(unused_mut)]
                    $crate::Value::Record(mut record) => {
                        if !record.name.is_empty() {
                            record.expect_name(stringify!($ty))?;
                        }
                        Ok(Self {
                            $( $field: record.take_as(stringify!($field))?, )*
                        })
                    }
                    other => Err($crate::ConvertError::TypeMismatch {
                        expected: stringify!($ty),
                        found: other.kind(),
                    }),
                }
            }
        }
    };
}
