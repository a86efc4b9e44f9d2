//! User lookup over rpcprims: serial server and typed client in one process.
//!
//! Run with:
//!   cargo run --example user-lookup
//!
//! The server thread serves exactly three calls and exits.

use std::thread;

use rpcprims::{rpc_record, Client, Registry, RemoteError, Server};

#[derive(Debug, Default)]
struct User {
    name: String,
    age: i64,
}

rpc_record!(User { name, age });

fn lookup_user(id: i64) -> (User, Option<RemoteError>) {
    match id {
        0 => (User { name: "ives".into(), age: 20 }, None),
        1 => (User { name: "Tom".into(), age: 18 }, None),
        2 => (User { name: "Jack".into(), age: 30 }, None),
        _ => (
            User::default(),
            Some(RemoteError::new(format!("id {id} not in user db"))),
        ),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = Registry::new();
    registry.register("lookupUser", lookup_user);

    let server = Server::bind("127.0.0.1:0", registry)?;
    let addr = server.local_addr().to_string();
    eprintln!("Listening on {addr}");

    let handle = thread::spawn(move || {
        for _ in 0..3 {
            if let Err(err) = server.serve_one() {
                eprintln!("cycle failed: {err}");
            }
        }
    });

    let lookup = Client::new(addr).bind::<(i64,), (User, Option<RemoteError>)>("lookupUser");
    for id in [2, 0, 99] {
        match lookup.call((id,))? {
            (user, None) => println!("user {id}: {user:?}"),
            (user, Some(err)) => println!("user {id}: {user:?} (error: {err})"),
        }
    }

    handle.join().map_err(|_| "server thread panicked")?;
    Ok(())
}
