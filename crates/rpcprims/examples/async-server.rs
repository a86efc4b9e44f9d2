//! Task-per-connection server; every call runs in its own tokio task.
//!
//! Run with:
//!   cargo run --example async-server --features async
//!
//! In another terminal:
//!   cargo run --features cli -- call 127.0.0.1:3212 add --args '[2, 3]'

use rpcprims::peer::AsyncServer;
use rpcprims::Registry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = Registry::new();
    registry.register("addOne", |x: i64| x + 1);
    registry.register("add", |a: i64, b: i64| a + b);

    let server = AsyncServer::bind("127.0.0.1:3212", registry).await?;
    eprintln!("Listening on {} (Ctrl-C to stop)", server.local_addr());

    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
