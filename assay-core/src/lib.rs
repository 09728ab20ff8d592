#![cfg_attr(docsrs, feature(doc_cfg))]

//! Test assertions for fallible Rust code.
//!
//! Assay provides an assertion that an operation completes without failing.
//! It is the counterpart of asserting that something fails: instead of
//! unwrapping a result and getting a bare panic when it is an error, the
//! assertion reports *what* went wrong in a stable, composable message, keeps
//! the original error as the cause, and hands back the produced value so the
//! test can keep asserting on it.
//!
//! Features:
//! - **One contract, two shapes**: side-effecting
//!   [`Action`](crate::operation::Action)s and value-producing
//!   [`ValueProducer`](crate::operation::ValueProducer)s are both
//!   [`Operation`](crate::operation::Operation)s. Bare closures work too.
//! - **Uniform failures**: returned errors, whether concrete, `anyhow` or
//!   boxed, and unwinding panics are captured and reported the same way.
//! - **Lazy messages**: custom messages given as closures are only evaluated
//!   when the assertion fails.
//! - **Cause chaining**: the failure of the operation is the
//!   [`source`](std::error::Error::source) of the resulting
//!   [`AssertionFailed`](crate::assertion::AssertionFailed).
//!
//! # How to use Assay
//!
//! ## Propagating failures
//!
//! Tests returning a [`Result`] can propagate assertion failures with `?`.
//!
//! ```
//! use std::collections::HashMap;
//! use assay::assertion::{assert_does_not_fail, AssertionFailed};
//!
//! fn lookup_is_a_number() -> Result<(), AssertionFailed> {
//!     let env = HashMap::from([("PORT", "8080")]);
//!     let port = assert_does_not_fail(|| env["PORT"].parse::<u16>())?;
//!     assert_eq!(port, 8080);
//!     Ok(())
//! }
//! # lookup_is_a_number().unwrap();
//! ```
//!
//! ## Panicking
//!
//! Tests that do not return a [`Result`] use the
//! [`assert_does_not_fail!`](crate::assert_does_not_fail) macro, which behaves
//! like the standard `assert!` family.
//!
//! ```
//! use assay::assert_does_not_fail;
//!
//! let attempt = 1;
//! let answer: u8 = assert_does_not_fail!(|| "42".parse::<u8>(), "attempt #{}", attempt);
//! assert_eq!(answer, 42);
//! ```
//!
//! ## Failure messages
//!
//! A failed assertion reads
//!
//! ```text
//! attempt #1 ==> Unexpected exception thrown: core::num::error::ParseIntError
//! ```
//!
//! The custom message and the `" ==> "` separator are omitted when no message
//! is given. The failure is always named by the fully qualified type name of
//! what was raised, never by its own message; the original error stays
//! reachable as the cause. See the [`message`] module for the shared
//! convention.
//!
//! ## Reporting
//!
//! [`AssertionReport`](crate::report::AssertionReport)s are plain, `serde`
//! serializable snapshots of failed assertions, for runners that collect
//! results away from the failing test. [`Config`](crate::config::Config)
//! selects the logging setup installed by [`init::tracing`].
pub mod assertion;
pub mod config;
pub mod init;
pub mod message;
pub mod operation;
pub mod report;

pub use assertion::{assert_does_not_fail, assert_does_not_fail_with, AssertionFailed};
