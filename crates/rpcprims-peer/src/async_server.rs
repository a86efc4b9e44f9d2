//! Task-per-connection server on tokio.
//!
//! Each accepted connection runs its single cycle in its own task, so slow
//! procedures no longer hold up other clients. Procedures themselves are
//! synchronous and run on the blocking pool.

use std::fmt::Display;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use rpcprims_frame::{FrameConfig, FrameError, RpcFrameCodec};
use rpcprims_transport::TransportError;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::{DispatchError, Result};
use crate::registry::Registry;
use crate::server::ACCEPT_BACKOFF;
use crate::session::handle_request;

/// Concurrent RPC server sharing one frozen registry across tasks.
pub struct AsyncServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    registry: Arc<Registry>,
    config: ServerConfig,
}

impl AsyncServer {
    /// Bind a TCP listener and take ownership of `registry`.
    pub async fn bind<A>(addr: A, registry: Registry) -> Result<Self>
    where
        A: ToSocketAddrs + Display,
    {
        let bind_err = |source| TransportError::Bind {
            addr: addr.to_string(),
            source,
        };
        let listener = TcpListener::bind(&addr).await.map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;
        info!(
            addr = %local_addr,
            procedures = registry.len(),
            "async rpc server bound"
        );
        Ok(Self {
            listener,
            local_addr,
            registry: Arc::new(registry),
            config: ServerConfig::default(),
        })
    }

    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Accept connections forever, one task per connection.
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// In-flight cycles keep running after shutdown; only accepting stops.
    /// Failed accepts are logged and retried.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    debug!(addr = %self.local_addr, "async rpc server stopped");
                    return Ok(());
                }
                accepted = self.listener.accept() => self.handle_accepted(accepted).await,
            }
        }
    }

    /// Spawn a cycle for an accepted connection, or log a failed accept
    /// and back off before the next one.
    async fn handle_accepted(&self, accepted: io::Result<(TcpStream, SocketAddr)>) {
        let (stream, peer) = match accepted {
            Ok(accepted) => accepted,
            Err(err) => {
                warn!(error = %TransportError::Accept(err), "accept failed; retrying");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                return;
            }
        };
        debug!(%peer, "accepted connection");
        let registry = Arc::clone(&self.registry);
        let frame = self.config.frame.clone();
        tokio::spawn(async move {
            match serve_connection_async(registry, stream, frame).await {
                Ok(name) => debug!(procedure = %name, %peer, "served call"),
                Err(err) => warn!(error = %err, %peer, "rpc cycle aborted"),
            }
        });
    }
}

/// Serve exactly one call on an async stream.
pub async fn serve_connection_async<S>(
    registry: Arc<Registry>,
    stream: S,
    config: FrameConfig,
) -> Result<String>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut framed = Framed::new(stream, RpcFrameCodec::with_config(config));
    let payload: Bytes = match framed.next().await {
        Some(frame) => frame?,
        None => return Err(FrameError::ConnectionClosed.into()),
    };

    let (name, response) =
        tokio::task::spawn_blocking(move || handle_request(&registry, &payload))
            .await
            .map_err(|err| DispatchError::Panicked(err.to_string()))??;

    framed.send(response).await?;
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpcprims_envelope::{decode_envelope, encode_envelope, Value};

    fn add_one_registry() -> Registry {
        let mut registry = Registry::new();
        registry.register("addOne", |x: i64| x + 1);
        registry
    }

    fn registry() -> Arc<Registry> {
        Arc::new(add_one_registry())
    }

    #[tokio::test]
    async fn serves_one_call_over_duplex() {
        let (client, server) = tokio::io::duplex(1024);
        let task = tokio::spawn(serve_connection_async(
            registry(),
            server,
            FrameConfig::default(),
        ));

        let mut framed = Framed::new(client, RpcFrameCodec::new());
        let request = encode_envelope("addOne", &[Value::Int(1)]).unwrap();
        framed.send(request).await.unwrap();
        let payload = framed.next().await.unwrap().unwrap();
        let response = decode_envelope(&payload).unwrap();
        assert_eq!(response.values, vec![Value::Int(2)]);

        assert_eq!(task.await.unwrap().unwrap(), "addOne");
    }

    #[tokio::test]
    async fn closed_before_request_is_connection_closed() {
        let (client, server) = tokio::io::duplex(64);
        drop(client);
        let err = serve_connection_async(registry(), server, FrameConfig::default())
            .await
            .unwrap_err();
        assert!(err.is_connection_closed());
    }

    #[tokio::test]
    async fn failed_accept_is_logged_and_server_keeps_serving() {
        let server = AsyncServer::bind("127.0.0.1:0", add_one_registry())
            .await
            .unwrap();
        server
            .handle_accepted(Err(io::Error::from(io::ErrorKind::ConnectionAborted)))
            .await;

        let addr = server.local_addr();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let task = tokio::spawn(server.run_until(async {
            let _ = stop_rx.await;
        }));

        let stream = TcpStream::connect(addr).await.unwrap();
        let mut framed = Framed::new(stream, RpcFrameCodec::new());
        let request = encode_envelope("addOne", &[Value::Int(4)]).unwrap();
        framed.send(request).await.unwrap();
        let payload = framed.next().await.unwrap().unwrap();
        assert_eq!(decode_envelope(&payload).unwrap().values, vec![Value::Int(5)]);

        stop_tx.send(()).unwrap();
        task.await.unwrap().unwrap();
    }
}
