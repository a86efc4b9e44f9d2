//! Built-in procedures served by `rpcprims serve`.

use rpcprims_envelope::{rpc_record, RemoteError};
use rpcprims_peer::Registry;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub name: String,
    pub age: i64,
}

rpc_record!(User { name, age });

const USERS: [(&str, i64); 3] = [("ives", 20), ("Tom", 18), ("Jack", 30)];

pub fn add_one(x: i64) -> i64 {
    x.wrapping_add(1)
}

pub fn add(a: i64, b: i64) -> i64 {
    a.wrapping_add(b)
}

/// Look a user up by id; unknown ids yield the zero user and an error.
pub fn lookup_user(id: i64) -> (User, Option<RemoteError>) {
    let found = usize::try_from(id).ok().and_then(|i| USERS.get(i));
    match found {
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

pub fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register("addOne", add_one);
    registry.register("add", add);
    registry.register_dynamic("echo", |args| Ok(args));
    registry.register("lookupUser", lookup_user);
    registry
}
