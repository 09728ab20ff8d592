//! Fallible operations under test.
//!
//! This module defines what an assertion can run. An operation is a nullary
//! callable that may fail, either by returning an error or by panicking.
//!
//! Key components of this module include:
//! ## [`Operation`]
//! The capability shared by everything an assertion can execute. It has an
//! associated [`Output`](Operation::Output) type, which is the value handed
//! back to the caller when the operation completes.
//!
//! ## [`Action`] and [`ValueProducer`]
//! The two shapes an operation comes in. An [`Action`] is run for its side
//! effects and its result is discarded, while a [`ValueProducer`] yields its
//! value. Bare closures are operations too and behave like a
//! [`ValueProducer`].
//!
//! ## [`Completion`]
//! What a callable may return: `()` for operations that can only fail by
//! panicking, or a [`Result`] failing with a concrete error type, an
//! [`anyhow::Error`], a `Box<dyn Error + Send + Sync>` or a [`Failure`]. The
//! [`kind`] markers keep these apart, and are always inferred.
//!
//! # Usage:
//! Operations are not meant to be executed directly, but rather handed to an
//! assertion such as
//! [`assert_does_not_fail`](crate::assertion::assert_does_not_fail).
//!
//! ## Example
//! ### Selecting the shape of an operation:
//!
//! ```
//! use std::sync::mpsc;
//! use assay::operation::{Action, Operation, ValueProducer};
//!
//! let (tx, rx) = mpsc::channel();
//! tx.send("foo".to_string()).unwrap();
//! tx.send("bar".to_string()).unwrap();
//!
//! // The received value is discarded.
//! Action(|| rx.recv()).execute_capturing().unwrap();
//!
//! // The received value is kept.
//! let value = ValueProducer(|| rx.recv()).execute_capturing().unwrap();
//! assert_eq!(value, "bar");
//! ```
use std::{
    error::Error as StdError,
    panic::{catch_unwind, AssertUnwindSafe},
};

use tracing::trace;

/// Markers distinguishing the ways a [`Completion`] can fail.
///
/// Callers never name these. They are inferred from the callable's return
/// type, which matches exactly one marker.
pub mod kind {
    /// `()`: the callable can only fail by panicking.
    #[derive(Debug)]
    pub enum Unit {}
    /// `Result<T, E>` with `E: std::error::Error`.
    #[derive(Debug)]
    pub enum Typed {}
    /// `anyhow::Result<T>`.
    #[derive(Debug)]
    pub enum Anyhow {}
    /// `Result<T, Box<dyn std::error::Error + Send + Sync>>`.
    #[derive(Debug)]
    pub enum Boxed {}
    /// `Result<T, Failure>`.
    #[derive(Debug)]
    pub enum Captured {}
}

/// The possible return values of an operation's callable.
///
/// `K` is one of the [`kind`] markers.
pub trait Completion<K> {
    /// The value produced on success.
    type Value;

    /// Split the completion into its value or its failure.
    fn into_result(self) -> Result<Self::Value>;
}

impl Completion<kind::Unit> for () {
    type Value = ();

    fn into_result(self) -> Result<Self::Value> {
        Ok(())
    }
}

impl<T, E> Completion<kind::Typed> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    type Value = T;

    fn into_result(self) -> Result<Self::Value> {
        self.map_err(Failure::new)
    }
}

impl<T> Completion<kind::Anyhow> for anyhow::Result<T> {
    type Value = T;

    fn into_result(self) -> Result<Self::Value> {
        self.map_err(Failure::from_anyhow)
    }
}

impl<T> Completion<kind::Boxed> for std::result::Result<T, Box<dyn StdError + Send + Sync + 'static>>
{
    type Value = T;

    fn into_result(self) -> Result<Self::Value> {
        self.map_err(Failure::from_boxed)
    }
}

impl<T> Completion<kind::Captured> for Result<T> {
    type Value = T;

    fn into_result(self) -> Result<Self::Value> {
        self
    }
}

/// A nullary operation that may fail.
///
/// `K` is the [`kind`] of the operation's [`Completion`].
pub trait Operation<K>: Sized {
    /// The value produced when the operation completes.
    type Output;

    /// Execute the operation.
    ///
    /// Panics raised by the operation are not caught here. See
    /// [`execute_capturing`](Operation::execute_capturing).
    fn execute(self) -> Result<Self::Output>;

    /// Execute the operation, capturing unwinding panics as [`Failure`]s.
    ///
    /// The operation runs exactly once, on the calling thread. A panic is
    /// reported through the regular panic hook before it is captured.
    fn execute_capturing(self) -> Result<Self::Output> {
        match catch_unwind(AssertUnwindSafe(|| self.execute())) {
            Ok(result) => result,
            Err(payload) => {
                trace!("operation panicked");
                Err(Failure::from_panic(payload))
            }
        }
    }
}

/// An operation run for its side effects.
///
/// Whatever the wrapped callable produces on success is discarded.
#[derive(Debug, Clone, Copy)]
pub struct Action<F>(pub F);

impl<F, R, K> Operation<K> for Action<F>
where
    F: FnOnce() -> R,
    R: Completion<K>,
{
    type Output = ();

    fn execute(self) -> Result<Self::Output> {
        (self.0)().into_result().map(drop)
    }
}

/// An operation run for the value it produces.
#[derive(Debug, Clone, Copy)]
pub struct ValueProducer<F>(pub F);

impl<F, R, K> Operation<K> for ValueProducer<F>
where
    F: FnOnce() -> R,
    R: Completion<K>,
{
    type Output = R::Value;

    fn execute(self) -> Result<Self::Output> {
        (self.0)().into_result()
    }
}

/// Bare callables produce values.
impl<F, R, K> Operation<K> for F
where
    F: FnOnce() -> R,
    R: Completion<K>,
{
    type Output = R::Value;

    fn execute(self) -> Result<Self::Output> {
        self().into_result()
    }
}

/// The result of executing an [`Operation`].
pub type Result<T> = std::result::Result<T, Failure>;

mod failure;
pub use failure::*;

#[cfg(test)]
mod test {
    use std::{
        any::type_name,
        cell::Cell,
        io,
        sync::mpsc::{self, RecvError},
    };

    use super::*;

    fn enigma() -> std::result::Result<&'static str, io::Error> {
        Ok("enigma")
    }

    fn broken() -> std::result::Result<&'static str, io::Error> {
        Err(io::Error::other("broken"))
    }

    #[test]
    fn closures_produce_values() {
        assert_eq!(enigma.execute().unwrap(), "enigma");
    }

    #[test]
    fn actions_discard_values() {
        let result: Result<()> = Action(enigma).execute();
        assert!(result.is_ok());
    }

    #[test]
    fn value_producers_keep_values() {
        assert_eq!(ValueProducer(enigma).execute().unwrap(), "enigma");
    }

    #[test]
    fn unit_closures_complete() {
        let ran = Cell::new(false);
        Action(|| ran.set(true)).execute().unwrap();
        assert!(ran.get());
    }

    #[test]
    fn absent_values_are_values() {
        let value = ValueProducer(|| Ok::<_, io::Error>(None::<String>))
            .execute()
            .unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn errors_become_failures() {
        let failure = ValueProducer(broken).execute().unwrap_err();
        assert_eq!(failure.type_name(), type_name::<io::Error>());
    }

    #[test]
    fn it_runs_exactly_once() {
        let calls = Cell::new(0);
        let op = || {
            calls.set(calls.get() + 1);
            Ok::<_, io::Error>(calls.get())
        };

        assert_eq!(op.execute_capturing().unwrap(), 1);
        assert_eq!(calls.get(), 1);
    }

    fn kaboom() {
        panic!("kaboom")
    }

    #[test]
    fn it_captures_panics() {
        let failure = Action(kaboom).execute_capturing().unwrap_err();

        assert!(failure.is_panic());
        assert_eq!(failure.to_string(), "kaboom");
    }

    #[test]
    fn anyhow_errors_become_failures() {
        let op = || -> anyhow::Result<u8> { Err(anyhow::anyhow!("opaque")) };
        let failure = ValueProducer(op).execute().unwrap_err();

        assert_eq!(failure.type_name(), type_name::<anyhow::Error>());
        assert_eq!(failure.to_string(), "opaque");
    }

    #[test]
    fn boxed_errors_become_failures() {
        let op = || -> std::result::Result<u8, Box<dyn StdError + Send + Sync>> {
            Err("no luck".into())
        };
        let failure = op.execute().unwrap_err();

        assert_eq!(
            failure.type_name(),
            type_name::<Box<dyn StdError + Send + Sync>>()
        );
        assert_eq!(failure.to_string(), "no luck");
    }

    #[test]
    fn failures_pass_through() {
        let op = || -> Result<()> { Err(Failure::from(io::Error::other("as is"))) };
        let failure = Action(op).execute().unwrap_err();

        assert_eq!(failure.type_name(), type_name::<io::Error>());
    }

    #[test]
    fn method_references_are_operations() {
        let (tx, rx) = mpsc::channel();
        tx.send("foo").unwrap();
        drop(tx);

        assert_eq!(ValueProducer(|| rx.recv()).execute().unwrap(), "foo");

        let failure = Action(|| rx.recv()).execute().unwrap_err();
        assert_eq!(failure.type_name(), type_name::<RecvError>());
    }
}
