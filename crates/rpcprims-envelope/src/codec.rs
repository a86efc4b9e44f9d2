use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{CodecError, Result};
use crate::value::{Record, Value};

/// Maximum nesting of lists/records inside a single value.
pub const MAX_NESTING_DEPTH: usize = 64;

pub const TAG_ABSENT: u8 = 0x00;
pub const TAG_BOOL: u8 = 0x01;
pub const TAG_INT: u8 = 0x02;
pub const TAG_UINT: u8 = 0x03;
pub const TAG_FLOAT: u8 = 0x04;
pub const TAG_STR: u8 = 0x05;
pub const TAG_LIST: u8 = 0x06;
pub const TAG_RECORD: u8 = 0x07;

const INITIAL_ENCODE_CAPACITY: usize = 128;

/// The `{name, values}` record exchanged as request and response.
///
/// For a request, `name` is the procedure and `values` the positional
/// arguments. For a response, `name` echoes the procedure and `values` are
/// the positional results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Envelope {
    pub name: String,
    pub values: Vec<Value>,
}

impl Envelope {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Encode into the self-describing wire form.
    pub fn encode(&self) -> Result<Bytes> {
        encode_envelope(&self.name, &self.values)
    }

    /// Decode from the wire form. Trailing bytes are an error.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        decode_envelope(bytes)
    }
}

/// Encode a procedure name and its value list.
///
/// Layout (all integers big-endian):
/// ```text
/// envelope := str(name) u32(count) value*count
/// str      := u32(len) utf8
/// value    := u8(tag) body
/// ```
pub fn encode_envelope(name: &str, values: &[Value]) -> Result<Bytes> {
    let mut dst = BytesMut::with_capacity(INITIAL_ENCODE_CAPACITY);
    put_str(&mut dst, "procedure name", name)?;
    put_len(&mut dst, "value list", values.len())?;
    for value in values {
        put_value(&mut dst, value, 0)?;
    }
    Ok(dst.freeze())
}

/// Decode an envelope produced by [`encode_envelope`].
pub fn decode_envelope(bytes: &[u8]) -> Result<Envelope> {
    let mut src = bytes;
    let name = get_str(&mut src)?;
    let count = get_len(&mut src, 1)?;
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(get_value(&mut src, 0)?);
    }
    if src.has_remaining() {
        return Err(CodecError::TrailingBytes(src.remaining()));
    }
    Ok(Envelope { name, values })
}

fn put_len(dst: &mut BytesMut, what: &'static str, len: usize) -> Result<()> {
    let len32 = u32::try_from(len).map_err(|_| CodecError::TooLong { what, len })?;
    dst.put_u32(len32);
    Ok(())
}

fn put_str(dst: &mut BytesMut, what: &'static str, s: &str) -> Result<()> {
    put_len(dst, what, s.len())?;
    dst.put_slice(s.as_bytes());
    Ok(())
}

fn put_value(dst: &mut BytesMut, value: &Value, depth: usize) -> Result<()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CodecError::TooDeep {
            max: MAX_NESTING_DEPTH,
        });
    }

    match value {
        Value::Absent => dst.put_u8(TAG_ABSENT),
        Value::Bool(v) => {
            dst.put_u8(TAG_BOOL);
            dst.put_u8(u8::from(*v));
        }
        Value::Int(v) => {
            dst.put_u8(TAG_INT);
            dst.put_i64(*v);
        }
        Value::Uint(v) => {
            dst.put_u8(TAG_UINT);
            dst.put_u64(*v);
        }
        Value::Float(v) => {
            dst.put_u8(TAG_FLOAT);
            dst.put_f64(*v);
        }
        Value::Str(v) => {
            dst.put_u8(TAG_STR);
            put_str(dst, "string", v)?;
        }
        Value::List(items) => {
            dst.put_u8(TAG_LIST);
            put_len(dst, "list", items.len())?;
            for item in items {
                put_value(dst, item, depth + 1)?;
            }
        }
        Value::Record(record) => {
            dst.put_u8(TAG_RECORD);
            put_str(dst, "record name", &record.name)?;
            put_len(dst, "record", record.fields.len())?;
            for (field, value) in &record.fields {
                put_str(dst, "field name", field)?;
                put_value(dst, value, depth + 1)?;
            }
        }
    }
    Ok(())
}

fn need(src: &[u8], n: usize) -> Result<()> {
    if src.remaining() < n {
        return Err(CodecError::Truncated {
            needed: n - src.remaining(),
            remaining: src.remaining(),
        });
    }
    Ok(())
}

/// Read a u32 element count. Each element occupies at least `min_size`
/// bytes, so a count the remaining input cannot hold is rejected before
/// anything is allocated for it.
fn get_len(src: &mut &[u8], min_size: usize) -> Result<usize> {
    need(src, 4)?;
    let len = src.get_u32() as usize;
    need(src, len.saturating_mul(min_size))?;
    Ok(len)
}

fn get_str(src: &mut &[u8]) -> Result<String> {
    let len = get_len(src, 1)?;
    let (head, tail) = src.split_at(len);
    let s = std::str::from_utf8(head)
        .map_err(|_| CodecError::InvalidUtf8)?
        .to_owned();
    *src = tail;
    Ok(s)
}

fn get_value(src: &mut &[u8], depth: usize) -> Result<Value> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CodecError::TooDeep {
            max: MAX_NESTING_DEPTH,
        });
    }

    need(src, 1)?;
    let tag = src.get_u8();
    let value = match tag {
        TAG_ABSENT => Value::Absent,
        TAG_BOOL => {
            need(src, 1)?;
            match src.get_u8() {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                other => {
                    return Err(CodecError::Malformed(format!(
                        "bool byte must be 0 or 1, got {other}"
                    )))
                }
            }
        }
        TAG_INT => {
            need(src, 8)?;
            Value::Int(src.get_i64())
        }
        TAG_UINT => {
            need(src, 8)?;
            Value::Uint(src.get_u64())
        }
        TAG_FLOAT => {
            need(src, 8)?;
            Value::Float(src.get_f64())
        }
        TAG_STR => Value::Str(get_str(src)?),
        TAG_LIST => {
            let count = get_len(src, 1)?;
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                items.push(get_value(src, depth + 1)?);
            }
            Value::List(items)
        }
        TAG_RECORD => {
            let name = get_str(src)?;
            // field name length prefix + value tag
            let count = get_len(src, 5)?;
            let mut fields = Vec::with_capacity(count);
            for _ in 0..count {
                let field = get_str(src)?;
                let value = get_value(src, depth + 1)?;
                fields.push((field, value));
            }
            Value::Record(Record { name, fields })
        }
        other => return Err(CodecError::UnknownTag(other)),
    };
    Ok(value)
}
