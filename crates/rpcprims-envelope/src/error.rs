/// Errors produced while encoding or decoding an envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The payload ended before a complete element was read.
    #[error("truncated envelope (needed {needed} more bytes, {remaining} remaining)")]
    Truncated { needed: usize, remaining: usize },

    /// A value carried a type tag outside the known vocabulary.
    #[error("unknown value tag 0x{0:02x}")]
    UnknownTag(u8),

    /// A string field was not valid UTF-8.
    #[error("invalid utf-8 in envelope string")]
    InvalidUtf8,

    /// A field decoded to something structurally invalid.
    #[error("malformed envelope: {0}")]
    Malformed(String),

    /// Bytes were left over after the envelope was fully decoded.
    #[error("{0} trailing bytes after envelope")]
    TrailingBytes(usize),

    /// Lists/records were nested deeper than the codec allows.
    #[error("value nesting exceeds {max} levels")]
    TooDeep { max: usize },

    /// A string or sequence is too long for its u32 length prefix.
    #[error("{what} too long to encode ({len} elements)")]
    TooLong { what: &'static str, len: usize },
}

/// Errors produced while converting between `Value` and static Rust types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// The dynamic value carried a different type than expected.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A numeric value does not fit the target type.
    #[error("value {value} out of range for {target}")]
    OutOfRange { target: &'static str, value: String },

    /// A record lacks a field the target struct requires.
    #[error("record {record} is missing field '{field}'")]
    MissingField { record: String, field: String },

    /// A record carried a different record name than expected.
    #[error("record name mismatch: expected {expected}, found {found}")]
    RecordName { expected: String, found: String },

    /// Slot count differs from the declared shape.
    #[error("arity mismatch: expected {expected} values, found {found}")]
    Arity { expected: usize, found: usize },

    /// Conversion of one positional slot failed.
    #[error("slot {index}: {source}")]
    Slot {
        index: usize,
        #[source]
        source: Box<ConvertError>,
    },
}

impl ConvertError {
    pub(crate) fn mismatch(expected: &'static str, found: &crate::Value) -> Self {
        ConvertError::TypeMismatch {
            expected,
            found: found.kind(),
        }
    }

    pub(crate) fn at_slot(self, index: usize) -> Self {
        ConvertError::Slot {
            index,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
