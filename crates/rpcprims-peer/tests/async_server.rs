#![cfg(feature = "async")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rpcprims_peer::{AsyncServer, Client, Registry};
use tokio::sync::oneshot;

/// Registry whose `rendezvous` call only returns `true` once two calls are
/// in flight at the same time.
fn rendezvous_registry() -> Registry {
    let arrived = Arc::new(AtomicUsize::new(0));
    let mut registry = Registry::new();
    registry.register("addOne", |x: i64| x + 1);
    registry.register("rendezvous", move || -> bool {
        arrived.fetch_add(1, Ordering::SeqCst);
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if arrived.load(Ordering::SeqCst) >= 2 {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        false
    });
    registry
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_server_handles_calls_concurrently() {
    let server = AsyncServer::bind("127.0.0.1:0", rendezvous_registry())
        .await
        .expect("async server should bind");
    let addr = server.local_addr().to_string();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server_task = tokio::spawn(server.run_until(async {
        let _ = stop_rx.await;
    }));

    let calls: Vec<_> = (0..2)
        .map(|_| {
            let client = Client::new(addr.clone());
            tokio::task::spawn_blocking(move || client.call::<(), bool>("rendezvous", ()))
        })
        .collect();

    for call in calls {
        let met = call
            .await
            .expect("client task should finish")
            .expect("call should succeed");
        assert!(met, "calls were not served concurrently");
    }

    stop_tx.send(()).expect("server should still be running");
    server_task
        .await
        .expect("server task should finish")
        .expect("server should stop cleanly");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_server_survives_unknown_procedure() {
    let server = AsyncServer::bind("127.0.0.1:0", rendezvous_registry())
        .await
        .expect("async server should bind");
    let addr = server.local_addr().to_string();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server_task = tokio::spawn(server.run_until(async {
        let _ = stop_rx.await;
    }));

    let outcome = tokio::task::spawn_blocking(move || {
        let client = Client::new(addr);
        let unknown = client.call_values("missing", vec![]);
        let add: rpcprims_peer::Result<i64> = client.call("addOne", (1i64,));
        (unknown, add)
    })
    .await
    .expect("client task should finish");

    let err = outcome.0.unwrap_err();
    assert!(err.is_connection_closed(), "unexpected error: {err}");
    assert_eq!(outcome.1.expect("server should still serve"), 2);

    stop_tx.send(()).expect("server should still be running");
    server_task
        .await
        .expect("server task should finish")
        .expect("server should stop cleanly");
}
