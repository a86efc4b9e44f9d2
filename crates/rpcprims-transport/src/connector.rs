use std::io::{Read, Write};

use crate::error::Result;
use crate::stream::RpcStream;
use crate::tcp::TcpTransport;

/// Connection factory used by clients.
///
/// Every call to [`Connector::connect`] must yield a fresh connection; a
/// connection is never reused for a second request.
pub trait Connector: Send + Sync {
    /// The stream type produced by this connector.
    type Stream: Read + Write;

    /// Open a new connection.
    fn connect(&self) -> Result<Self::Stream>;
}

impl<F, S> Connector for F
where
    F: Fn() -> Result<S> + Send + Sync,
    S: Read + Write,
{
    type Stream = S;

    fn connect(&self) -> Result<S> {
        self()
    }
}

/// Opens one TCP connection per call to a fixed address.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    addr: String,
    nodelay: bool,
}

impl TcpConnector {
    /// Create a connector for `addr` (anything `TcpStream::connect` resolves).
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            nodelay: true,
        }
    }

    /// Override `TCP_NODELAY` for connections opened by this connector.
    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }

    /// Target address.
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl Connector for TcpConnector {
    type Stream = RpcStream;

    fn connect(&self) -> Result<RpcStream> {
        let stream = TcpTransport::connect(self.addr.as_str())?;
        stream.set_nodelay(self.nodelay)?;
        Ok(stream)
    }
}
