//! Client side: typed stubs bound to remote procedure names.
//!
//! A stub is declared with the argument tuple and return shape the remote
//! procedure is expected to have. Every call opens a fresh connection,
//! sends one request and maps the response slots back onto the declared
//! return type. Absent result slots become the type's default value.
//!
//! ```no_run
//! use rpcprims_envelope::RemoteError;
//! use rpcprims_peer::Client;
//!
//! # fn main() -> rpcprims_peer::Result<()> {
//! let client = Client::new("127.0.0.1:3212");
//! let add_one = client.bind::<(i64,), i64>("addOne");
//! assert_eq!(add_one.call((5,))?, 6);
//!
//! let divide = client.bind::<(i64, i64), (i64, Option<RemoteError>)>("divide");
//! let (_, err) = divide.call((1, 0))?;
//! assert!(err.is_some());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::marker::PhantomData;

use rpcprims_envelope::{FromResults, IntoArgs, Value};
use rpcprims_transport::{Connector, TcpConnector};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::session::round_trip;

/// Connection factory plus call settings.
#[derive(Debug, Clone)]
pub struct Client<C = TcpConnector> {
    connector: C,
    config: ClientConfig,
}

impl Client<TcpConnector> {
    /// Client for a TCP address with default settings.
    pub fn new(addr: impl Into<String>) -> Self {
        Self::with_config(addr, ClientConfig::default())
    }

    pub fn with_config(addr: impl Into<String>, config: ClientConfig) -> Self {
        let connector = TcpConnector::new(addr).with_nodelay(config.nodelay);
        Self { connector, config }
    }
}

impl<C: Connector> Client<C> {
    /// Client over any connection factory.
    pub fn from_connector(connector: C, config: ClientConfig) -> Self {
        Self { connector, config }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Untyped call: send `args`, return the raw result slots.
    pub fn call_values(&self, name: &str, args: Vec<Value>) -> Result<Vec<Value>> {
        let mut stream = self.connector.connect()?;
        round_trip(&mut stream, &self.config.frame, name, &args)
    }

    /// Typed one-off call without binding a stub.
    pub fn call<A, R>(&self, name: &str, args: A) -> Result<R>
    where
        A: IntoArgs,
        R: FromResults,
    {
        let results = self.call_values(name, args.into_args())?;
        Ok(R::from_results(results)?)
    }

    /// Bind a typed stub for procedure `name`.
    ///
    /// Nothing is sent until the stub is called; a name unknown to the
    /// server only surfaces as an error on call.
    pub fn bind<A, R>(&self, name: impl Into<String>) -> Stub<A, R, C>
    where
        A: IntoArgs,
        R: FromResults,
        C: Clone,
    {
        Stub {
            client: self.clone(),
            name: name.into(),
            _signature: PhantomData,
        }
    }
}

/// Bind a stub for `name` on a TCP server at `addr`.
pub fn bind_stub<A, R>(name: impl Into<String>, addr: impl Into<String>) -> Stub<A, R>
where
    A: IntoArgs,
    R: FromResults,
{
    Client::new(addr).bind(name)
}

/// Typed client-side proxy for one remote procedure.
pub struct Stub<A, R, C = TcpConnector> {
    client: Client<C>,
    name: String,
    _signature: PhantomData<fn(A) -> R>,
}

impl<A, R, C> Stub<A, R, C>
where
    A: IntoArgs,
    R: FromResults,
    C: Connector,
{
    /// Call the remote procedure over a fresh connection.
    pub fn call(&self, args: A) -> Result<R> {
        self.client.call(&self.name, args)
    }

    /// Remote procedure name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn client(&self) -> &Client<C> {
        &self.client
    }
}

impl<A, R, C: Clone> Clone for Stub<A, R, C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            name: self.name.clone(),
            _signature: PhantomData,
        }
    }
}

impl<A, R, C: fmt::Debug> fmt::Debug for Stub<A, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stub")
            .field("name", &self.name)
            .field("client", &self.client)
            .finish()
    }
}
