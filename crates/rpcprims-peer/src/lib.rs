//! Procedure dispatch and client stubs for rpcprims.
//!
//! This is the "just works" layer. Register plain Rust functions under a
//! name, bind a server, and call them from a client through typed stubs.
//! Each call uses its own connection: one request frame, one response frame.

#[cfg(feature = "async")]
pub mod async_server;
pub mod config;
pub mod error;
pub mod registry;
pub mod server;
pub mod session;
pub mod stub;

#[cfg(feature = "async")]
pub use async_server::{serve_connection_async, AsyncServer};
pub use config::{ClientConfig, ServerConfig};
pub use error::{DispatchError, Result, RpcError};
pub use registry::{invoke, FnProcedure, IntoProcedure, Procedure, Registry};
pub use server::Server;
pub use session::{round_trip, serve_connection};
pub use stub::{bind_stub, Client, Stub};
