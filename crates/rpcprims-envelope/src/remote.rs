use crate::convert::{FromValue, IntoValue};
use crate::error::ConvertError;
use crate::value::{Record, Value};

const RECORD_NAME: &str = "RemoteError";

/// Application-level error returned by a remote procedure.
///
/// Encoded as a `RemoteError { message }` record. Decoding also accepts a
/// bare string slot. As a declared result slot use `Option<RemoteError>`
/// so that an absent slot reads as "no error".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Capture the display text of any error.
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        Self::new(err.to_string())
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for RemoteError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for RemoteError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl IntoValue for RemoteError {
    fn into_value(self) -> Value {
        Value::Record(Record::new(RECORD_NAME).with_field("message", self.message))
    }
}

impl FromValue for RemoteError {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Str(message) => Ok(Self { message }),
            Value::Record(mut record) => {
                if !record.name.is_empty() {
                    record.expect_name(RECORD_NAME)?;
                }
                Ok(Self {
                    message: record.take_as("message")?,
                })
            }
            other => Err(ConvertError::mismatch(RECORD_NAME, &other)),
        }
    }
}
