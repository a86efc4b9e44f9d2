//! TCP stream transport for rpcprims.
//!
//! This is the lowest layer of rpcprims: a reliable, ordered byte stream with
//! no message boundaries. Everything else builds on top of the [`RpcStream`]
//! type provided here.
//!
//! - [`TcpTransport`] binds a listening socket and accepts connections.
//! - [`Connector`] is the client-side connection factory; [`TcpConnector`]
//!   opens one fresh TCP connection per call.

pub mod connector;
pub mod error;
pub mod stream;
pub mod tcp;

pub use connector::{Connector, TcpConnector};
pub use error::{Result, TransportError};
pub use stream::RpcStream;
pub use tcp::TcpTransport;
