//! Procedure registry for dispatching requests by name.
//!
//! Plain Rust functions and closures become procedures through
//! [`IntoProcedure`]: the typed wrapper converts argument slots into the
//! declared parameter types, calls the function, and flattens its return
//! value into result slots.
//!
//! ```
//! use rpcprims_peer::Registry;
//!
//! fn add_one(x: i64) -> i64 {
//!     x + 1
//! }
//!
//! let mut registry = Registry::new();
//! assert!(registry.register("addOne", add_one));
//! assert!(!registry.register("addOne", |x: i64| x + 2));
//! assert_eq!(registry.len(), 1);
//! ```

use std::any::Any;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use rpcprims_envelope::{FromArgs, FromValue, IntoResults, Value};
use tracing::debug;

use crate::error::DispatchError;

/// A callable that accepts and returns positional value slots.
pub trait Procedure: Send + Sync + 'static {
    /// Apply the procedure to `args`.
    fn call(&self, args: Vec<Value>) -> Result<Vec<Value>, DispatchError>;

    /// Declared argument count, when the procedure has a fixed one.
    fn arity(&self) -> Option<usize> {
        None
    }
}

/// Conversion of a typed function into a [`Procedure`].
///
/// `Marker` is the function pointer type of the signature and only serves
/// to keep the per-arity impls apart.
pub trait IntoProcedure<Marker>: Sized {
    type Procedure: Procedure;

    fn into_procedure(self) -> Self::Procedure;
}

/// Typed function wrapped as a [`Procedure`].
pub struct FnProcedure<F, Args> {
    f: F,
    _marker: PhantomData<fn(Args)>,
}

macro_rules! impl_into_procedure {
    ($($A:ident),*) => {
        #[allow(non_snake_case)]
        impl<F, R, $($A,)*> Procedure for FnProcedure<F, ($($A,)*)>
        where
            F: Fn($($A),*) -> R + Send + Sync + 'static,
            R: IntoResults,
            $($A: FromValue + 'static,)*
        {
            fn call(&self, args: Vec<Value>) -> Result<Vec<Value>, DispatchError> {
                let ($($A,)*) = <($($A,)*) as FromArgs>::from_args(args)?;
                Ok((self.f)($($A),*).into_results())
            }

            fn arity(&self) -> Option<usize> {
                Some(<($($A,)*) as FromArgs>::ARITY)
            }
        }

        impl<F, R, $($A,)*> IntoProcedure<fn($($A),*) -> R> for F
        where
            F: Fn($($A),*) -> R + Send + Sync + 'static,
            R: IntoResults,
            $($A: FromValue + 'static,)*
        {
            type Procedure = FnProcedure<F, ($($A,)*)>;

            fn into_procedure(self) -> Self::Procedure {
                FnProcedure {
                    f: self,
                    _marker: PhantomData,
                }
            }
        }
    };
}

impl_into_procedure!();
impl_into_procedure!(A1);
impl_into_procedure!(A1, A2);
impl_into_procedure!(A1, A2, A3);
impl_into_procedure!(A1, A2, A3, A4);
impl_into_procedure!(A1, A2, A3, A4, A5);
impl_into_procedure!(A1, A2, A3, A4, A5, A6);

/// Untyped procedure over raw slots, for variadic handlers.
struct DynamicProcedure<F>(F);

impl<F> Procedure for DynamicProcedure<F>
where
    F: Fn(Vec<Value>) -> Result<Vec<Value>, DispatchError> + Send + Sync + 'static,
{
    fn call(&self, args: Vec<Value>) -> Result<Vec<Value>, DispatchError> {
        (self.0)(args)
    }
}

/// Registry mapping procedure names to implementations.
///
/// Registration is first-wins and happens before serving; once handed to a
/// server the registry is frozen behind an `Arc` and only read.
#[derive(Default)]
pub struct Registry {
    procedures: HashMap<String, Arc<dyn Procedure>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed function under `name`.
    ///
    /// Returns `false` and leaves the existing entry untouched when `name`
    /// is already taken.
    pub fn register<M, P>(&mut self, name: impl Into<String>, procedure: P) -> bool
    where
        P: IntoProcedure<M>,
    {
        self.register_procedure(name, Arc::new(procedure.into_procedure()))
    }

    /// Register a hand-written procedure.
    pub fn register_procedure(
        &mut self,
        name: impl Into<String>,
        procedure: Arc<dyn Procedure>,
    ) -> bool {
        match self.procedures.entry(name.into()) {
            Entry::Occupied(entry) => {
                debug!(procedure = %entry.key(), "procedure already registered, ignoring");
                false
            }
            Entry::Vacant(entry) => {
                debug!(procedure = %entry.key(), arity = ?procedure.arity(), "registered procedure");
                entry.insert(procedure);
                true
            }
        }
    }

    /// Register a closure over raw value slots.
    pub fn register_dynamic<F>(&mut self, name: impl Into<String>, f: F) -> bool
    where
        F: Fn(Vec<Value>) -> Result<Vec<Value>, DispatchError> + Send + Sync + 'static,
    {
        self.register_procedure(name, Arc::new(DynamicProcedure(f)))
    }

    pub fn lookup(&self, name: &str) -> Option<&dyn Procedure> {
        self.procedures.get(name).map(|p| &**p)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.procedures.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.procedures.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }

    /// Look up `name` and invoke it with `args`.
    pub fn dispatch(&self, name: &str, args: Vec<Value>) -> Result<Vec<Value>, DispatchError> {
        let procedure = self
            .lookup(name)
            .ok_or_else(|| DispatchError::UnknownProcedure(name.to_string()))?;
        invoke(procedure, args)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("procedures", &self.names())
            .finish()
    }
}

/// Apply `args` to `procedure`, turning a panic into [`DispatchError::Panicked`].
pub fn invoke(procedure: &dyn Procedure, args: Vec<Value>) -> Result<Vec<Value>, DispatchError> {
    match panic::catch_unwind(AssertUnwindSafe(|| procedure.call(args))) {
        Ok(result) => result,
        Err(payload) => Err(DispatchError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
