use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use rpcprims_envelope::{rpc_record, RemoteError, Value};
use rpcprims_peer::{bind_stub, Client, Registry, Server, ServerConfig};

#[derive(Debug, Clone, Default, PartialEq)]
struct User {
    name: String,
    age: i64,
}

rpc_record!(User { name, age });

fn lookup_user(id: i64) -> (User, Option<RemoteError>) {
    let users = [("ives", 20), ("Tom", 18), ("Jack", 30)];
    match usize::try_from(id).ok().and_then(|i| users.get(i)) {
        Some((name, age)) => (
            User {
                name: (*name).to_string(),
                age: *age,
            },
            None,
        ),
        None => (
            User::default(),
            Some(RemoteError::new(format!("id {id} not in user db"))),
        ),
    }
}

fn add_one(x: i64) -> i64 {
    x + 1
}

/// Serial server running on a background thread, stopped on drop.
struct TestServer {
    addr: String,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<rpcprims_peer::Result<()>>>,
}

impl TestServer {
    fn start(registry: Registry) -> Self {
        Self::start_with_config(registry, ServerConfig::default())
    }

    fn start_with_config(registry: Registry, config: ServerConfig) -> Self {
        let server = Server::bind("127.0.0.1:0", registry)
            .expect("server should bind")
            .with_config(config);
        let addr = server.local_addr().to_string();
        let stop = Arc::new(AtomicBool::new(false));
        let handle = {
            let stop = Arc::clone(&stop);
            thread::spawn(move || server.run_until(&stop))
        };
        Self {
            addr,
            stop,
            handle: Some(handle),
        }
    }

    fn client(&self) -> Client {
        Client::new(self.addr.clone())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        let _ = TcpStream::connect(&self.addr);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn demo_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register("addOne", add_one);
    registry.register("lookupUser", lookup_user);
    registry
}

#[test]
fn add_one_over_tcp() {
    let server = TestServer::start(demo_registry());
    let add_one = bind_stub::<(i64,), i64>("addOne", server.addr.clone());
    assert_eq!(add_one.call((5,)).expect("call should succeed"), 6);
}

#[test]
fn lookup_user_found() {
    let server = TestServer::start(demo_registry());
    let lookup = server
        .client()
        .bind::<(i64,), (User, Option<RemoteError>)>("lookupUser");

    let (user, err) = lookup.call((2,)).expect("call should succeed");
    assert_eq!(
        user,
        User {
            name: "Jack".to_string(),
            age: 30
        }
    );
    assert!(err.is_none());
}

#[test]
fn lookup_user_missing_returns_zero_user_and_error() {
    let server = TestServer::start(demo_registry());
    let lookup = server
        .client()
        .bind::<(i64,), (User, Option<RemoteError>)>("lookupUser");

    let (user, err) = lookup.call((99,)).expect("call should succeed");
    assert_eq!(user, User::default());
    assert_eq!(
        err.expect("error slot should be present").message(),
        "id 99 not in user db"
    );
}

#[test]
fn lookup_user_with_result_prototype() {
    let server = TestServer::start(demo_registry());
    let lookup = server
        .client()
        .bind::<(i64,), Result<User, RemoteError>>("lookupUser");

    let found = lookup.call((0,)).expect("call should succeed");
    assert_eq!(found.expect("user 0 exists").name, "ives");

    let missing = lookup.call((7,)).expect("call should succeed");
    assert_eq!(missing.unwrap_err().to_string(), "id 7 not in user db");
}

#[test]
fn first_registration_wins_end_to_end() {
    let mut registry = Registry::new();
    assert!(registry.register("addOne", add_one));
    assert!(!registry.register("addOne", |x: i64| x - 1));
    let server = TestServer::start(registry);

    let got: i64 = server
        .client()
        .call("addOne", (10i64,))
        .expect("call should succeed");
    assert_eq!(got, 11);
}

#[test]
fn unknown_procedure_does_not_stop_server() {
    let server = TestServer::start(demo_registry());
    let client = server.client();

    let err = client
        .call_values("noSuchProcedure", vec![Value::Int(1)])
        .unwrap_err();
    assert!(err.is_connection_closed(), "unexpected error: {err}");

    let got: i64 = client.call("addOne", (1i64,)).expect("server should still serve");
    assert_eq!(got, 2);
}

#[test]
fn bad_arguments_do_not_stop_server() {
    let server = TestServer::start(demo_registry());
    let client = server.client();

    let err = client
        .call_values("addOne", vec![Value::Str("five".to_string())])
        .unwrap_err();
    assert!(err.is_connection_closed(), "unexpected error: {err}");

    let err = client.call_values("addOne", vec![]).unwrap_err();
    assert!(err.is_connection_closed(), "unexpected error: {err}");

    let got: i64 = client.call("addOne", (41i64,)).expect("server should still serve");
    assert_eq!(got, 42);
}

#[test]
fn panicking_procedure_does_not_stop_server() {
    let mut registry = demo_registry();
    registry.register("boom", || -> i64 { panic!("boom") });
    let server = TestServer::start(registry);
    let client = server.client();

    assert!(client.call::<(), i64>("boom", ()).is_err());
    let got: i64 = client.call("addOne", (0i64,)).expect("server should still serve");
    assert_eq!(got, 1);
}

#[test]
fn absent_results_map_to_zero_values() {
    let mut registry = Registry::new();
    registry.register("nothing", || -> Option<i64> { None });
    registry.register("noName", || -> (Option<String>, Option<RemoteError>) { (None, None) });
    let server = TestServer::start(registry);
    let client = server.client();

    let zero: i64 = client.call("nothing", ()).expect("call should succeed");
    assert_eq!(zero, 0);

    let (name, err): (String, Option<RemoteError>) =
        client.call("noName", ()).expect("call should succeed");
    assert_eq!(name, "");
    assert!(err.is_none());

    let raw = client.call_values("nothing", vec![]).expect("call should succeed");
    assert_eq!(raw, vec![Value::Absent]);
}

#[test]
fn oversized_request_is_dropped_and_server_survives() {
    let server = TestServer::start_with_config(
        demo_registry(),
        ServerConfig::default().with_max_payload_size(64),
    );
    let client = server.client();

    let big = "x".repeat(1024);
    let err = client
        .call_values("addOne", vec![Value::Str(big)])
        .unwrap_err();
    assert!(
        err.is_connection_closed() || matches!(err, rpcprims_peer::RpcError::Frame(_)),
        "unexpected error: {err}"
    );

    let got: i64 = client.call("addOne", (1i64,)).expect("server should still serve");
    assert_eq!(got, 2);
}

#[test]
fn sequential_clients_are_served_in_order() {
    let server = TestServer::start(demo_registry());
    let add_one = server.client().bind::<(i64,), i64>("addOne");
    let mut x = 0;
    for _ in 0..20 {
        x = add_one.call((x,)).expect("call should succeed");
    }
    assert_eq!(x, 20);
}
