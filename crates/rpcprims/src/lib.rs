//! Minimal remote procedure calls over TCP.
//!
//! rpcprims moves one call per connection: the client sends a single
//! length-prefixed request frame holding a self-describing `{name, values}`
//! envelope, the server dispatches it to a registered Rust function and
//! answers with one response frame.
//!
//! # Crate Structure
//!
//! - [`transport`]: TCP listener, connector and stream
//! - [`frame`]: 4-byte big-endian length-prefixed framing
//! - [`envelope`]: dynamic values, typed conversions and the envelope codec
//! - [`peer`]: procedure registry, serial server and client stubs (behind `peer` feature)
//!
//! # Example
//!
//! ```no_run
//! use rpcprims::{Client, Registry, Server};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = Registry::new();
//! registry.register("addOne", |x: i64| x + 1);
//!
//! let server = Server::bind("127.0.0.1:0", registry)?;
//! let addr = server.local_addr().to_string();
//! std::thread::spawn(move || server.run());
//!
//! let add_one = Client::new(addr).bind::<(i64,), i64>("addOne");
//! assert_eq!(add_one.call((5,))?, 6);
//! # Ok(())
//! # }
//! ```

/// Re-export transport types.
pub mod transport {
    pub use rpcprims_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use rpcprims_frame::*;
}

/// Re-export envelope types.
pub mod envelope {
    pub use rpcprims_envelope::*;
}

/// Re-export peer types (requires `peer` feature).
#[cfg(feature = "peer")]
pub mod peer {
    pub use rpcprims_peer::*;
}

pub use rpcprims_envelope::{rpc_record, FromValue, IntoValue, Record, RemoteError, Value};
#[cfg(feature = "peer")]
pub use rpcprims_peer::{bind_stub, Client, Registry, RpcError, Server, Stub};
