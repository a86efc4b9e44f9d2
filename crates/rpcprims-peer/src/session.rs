//! One request/response cycle over a connected stream.
//!
//! A connection carries exactly one call: the client writes one request
//! frame, the server answers with one response frame (or drops the
//! connection), and both sides close.

use std::io::{Read, Write};

use bytes::Bytes;
use rpcprims_envelope::{decode_envelope, encode_envelope, Value};
use rpcprims_frame::{FrameConfig, FrameReader, FrameWriter};
use tracing::debug;

use crate::error::{DispatchError, Result};
use crate::registry::Registry;

/// Decode a request payload, dispatch it and encode the response payload.
///
/// The response echoes the request's procedure name.
pub(crate) fn handle_request(registry: &Registry, payload: &[u8]) -> Result<(String, Bytes)> {
    let request = decode_envelope(payload)?;
    debug!(procedure = %request.name, args = request.values.len(), "decoded request");

    let procedure = registry
        .lookup(&request.name)
        .ok_or_else(|| DispatchError::UnknownProcedure(request.name.clone()))?;
    let results = crate::registry::invoke(procedure, request.values)?;

    let response = encode_envelope(&request.name, &results)?;
    Ok((request.name, response))
}

/// Serve exactly one call on `stream`.
///
/// Returns the name of the procedure that was served. On any error no
/// response is written; the caller drops the connection.
pub fn serve_connection<S: Read + Write>(
    registry: &Registry,
    stream: &mut S,
    config: &FrameConfig,
) -> Result<String> {
    let payload = FrameReader::with_config(&mut *stream, config.clone()).read_frame()?;
    let (name, response) = handle_request(registry, &payload)?;
    FrameWriter::with_config(&mut *stream, config.clone()).send(&response)?;
    debug!(procedure = %name, size = response.len(), "sent response");
    Ok(name)
}

/// Perform one call on `stream`: send the request, read the response slots.
pub fn round_trip<S: Read + Write>(
    stream: &mut S,
    config: &FrameConfig,
    name: &str,
    args: &[Value],
) -> Result<Vec<Value>> {
    let request = encode_envelope(name, args)?;
    FrameWriter::with_config(&mut *stream, config.clone()).send(&request)?;
    debug!(procedure = %name, size = request.len(), "sent request");

    let payload = FrameReader::with_config(&mut *stream, config.clone()).read_frame()?;
    let response = decode_envelope(&payload)?;
    debug!(
        procedure = %response.name,
        results = response.values.len(),
        "received response"
    );
    Ok(response.values)
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use rpcprims_frame::FrameError;

    use super::*;
    use crate::error::RpcError;

    /// Reads from a scripted input and records everything written.
    struct Duplex {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl Duplex {
        fn new(input: Vec<u8>) -> Self {
            Self {
                input: Cursor::new(input),
                output: Vec::new(),
            }
        }
    }

    impl Read for Duplex {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for Duplex {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn framed(name: &str, values: &[Value]) -> Vec<u8> {
        let payload = encode_envelope(name, values).expect("encode should succeed");
        let mut out = Vec::new();
        rpcprims_frame::write_frame(&mut out, &payload).expect("frame write should succeed");
        out
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.register("addOne", |x: i64| x + 1);
        registry
    }

    #[test]
    fn serves_one_request() {
        let registry = registry();
        let mut conn = Duplex::new(framed("addOne", &[Value::Int(5)]));
        let name = serve_connection(&registry, &mut conn, &FrameConfig::default())
            .expect("cycle should succeed");
        assert_eq!(name, "addOne");

        let mut written = Cursor::new(conn.output);
        let payload = rpcprims_frame::read_frame(&mut written).expect("response frame");
        let response = decode_envelope(&payload).expect("response envelope");
        assert_eq!(response.name, "addOne");
        assert_eq!(response.values, vec![Value::Int(6)]);
    }

    #[test]
    fn unknown_procedure_writes_nothing() {
        let registry = registry();
        let mut conn = Duplex::new(framed("nope", &[]));
        let err = serve_connection(&registry, &mut conn, &FrameConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            RpcError::Dispatch(DispatchError::UnknownProcedure(_))
        ));
        assert!(conn.output.is_empty());
    }

    #[test]
    fn garbage_payload_is_codec_error() {
        let registry = registry();
        let mut raw = Vec::new();
        rpcprims_frame::write_frame(&mut raw, &[0xff, 0xff]).unwrap();
        let mut conn = Duplex::new(raw);
        let err = serve_connection(&registry, &mut conn, &FrameConfig::default()).unwrap_err();
        assert!(matches!(err, RpcError::Codec(_)));
        assert!(conn.output.is_empty());
    }

    #[test]
    fn empty_stream_is_connection_closed() {
        let registry = registry();
        let mut conn = Duplex::new(Vec::new());
        let err = serve_connection(&registry, &mut conn, &FrameConfig::default()).unwrap_err();
        assert!(err.is_connection_closed());
    }

    #[test]
    fn round_trip_reads_response_slots() {
        let mut conn = Duplex::new(framed("addOne", &[Value::Int(6)]));
        let values = round_trip(&mut conn, &FrameConfig::default(), "addOne", &[Value::Int(5)])
            .expect("round trip should succeed");
        assert_eq!(values, vec![Value::Int(6)]);

        let mut written = Cursor::new(conn.output);
        let request = rpcprims_frame::read_frame(&mut written).expect("request frame");
        let request = decode_envelope(&request).expect("request envelope");
        assert_eq!(request.name, "addOne");
        assert_eq!(request.values, vec![Value::Int(5)]);
    }

    #[test]
    fn round_trip_respects_payload_cap() {
        let mut conn = Duplex::new(Vec::new());
        let config = FrameConfig::default().with_max_payload_size(4);
        let err = round_trip(&mut conn, &config, "addOne", &[Value::Int(5)]).unwrap_err();
        assert!(matches!(
            err,
            RpcError::Frame(FrameError::PayloadTooLarge { .. })
        ));
        assert!(conn.output.is_empty());
    }
}
