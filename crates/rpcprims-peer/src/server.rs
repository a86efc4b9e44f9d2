use std::fmt::Display;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rpcprims_transport::{RpcStream, TcpTransport};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::Result;
use crate::registry::Registry;
use crate::session::serve_connection;

/// Pause after a failed accept before trying again.
pub(crate) const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Serial RPC server: one connection, one call, at a time.
///
/// The registry is frozen when the server is bound. A failed cycle (bad
/// frame, unknown procedure, dispatch error) only drops that connection.
pub struct Server {
    transport: TcpTransport,
    registry: Arc<Registry>,
    config: ServerConfig,
}

impl Server {
    /// Bind a TCP listener and take ownership of `registry`.
    pub fn bind<A>(addr: A, registry: Registry) -> Result<Self>
    where
        A: ToSocketAddrs + Display,
    {
        let transport = TcpTransport::bind(addr)?;
        info!(
            addr = %transport.local_addr(),
            procedures = registry.len(),
            "rpc server bound"
        );
        Ok(Self {
            transport,
            registry: Arc::new(registry),
            config: ServerConfig::default(),
        })
    }

    /// Override server configuration.
    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.transport.local_addr()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Accept one connection and run exactly one cycle on it.
    ///
    /// Returns the name of the procedure served.
    pub fn serve_one(&self) -> Result<String> {
        let stream = self.transport.accept()?;
        self.serve_stream(stream)
    }

    /// Accept and serve connections forever.
    pub fn run(&self) -> Result<()> {
        self.run_until(&AtomicBool::new(false))
    }

    /// Accept and serve connections until `stop` is set.
    ///
    /// `stop` is checked around every accept. A caller stopping a server
    /// blocked in accept must also open one connection to wake it. Failed
    /// accepts are logged and retried after a short pause.
    pub fn run_until(&self, stop: &AtomicBool) -> Result<()> {
        self.accept_loop(stop, || Ok(self.transport.accept()?));
        debug!(addr = %self.local_addr(), "rpc server stopped");
        Ok(())
    }

    fn accept_loop<F>(&self, stop: &AtomicBool, mut accept: F)
    where
        F: FnMut() -> Result<RpcStream>,
    {
        while !stop.load(Ordering::SeqCst) {
            let stream = match accept() {
                Ok(stream) => stream,
                Err(err) => {
                    warn!(error = %err, "accept failed; retrying");
                    thread::sleep(ACCEPT_BACKOFF);
                    continue;
                }
            };
            if stop.load(Ordering::SeqCst) {
                break;
            }
            if let Err(err) = self.serve_stream(stream) {
                warn!(error = %err, "rpc cycle aborted");
            }
        }
    }

    fn serve_stream(&self, mut stream: RpcStream) -> Result<String> {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let outcome = serve_connection(&self.registry, &mut stream, &self.config.frame);
        if let Ok(name) = &outcome {
            debug!(procedure = %name, %peer, "served call");
        }
        if let Err(err) = stream.shutdown() {
            debug!(error = %err, %peer, "shutdown after cycle failed");
        }
        outcome
    }
}
