//! Assertions over fallible operations.
//!
//! The assertions in this module run an [`Operation`] and check that it
//! completes without failing. When it does, its value is handed back so
//! further assertions can be made on it. When it does not, the failure is
//! wrapped into an [`AssertionFailed`] whose message names the type of the
//! unexpected failure, and whose [`source`](std::error::Error::source) is the
//! original error.
//!
//! Every failure is treated the same way. An operation returning an error, an
//! operation panicking, and an operation returning another
//! [`AssertionFailed`] all produce the same kind of assertion failure.
//!
//! ## Example
//!
//! ### Getting the value back:
//!
//! ```
//! use assay::assertion::{assert_does_not_fail, AssertionFailed};
//!
//! fn parse() -> Result<(), AssertionFailed> {
//!     let port: u16 = assert_does_not_fail(|| "8080".parse::<u16>())?;
//!     assert_eq!(port, 8080);
//!     Ok(())
//! }
//! # parse().unwrap();
//! ```
//!
//! ### Inspecting a failure:
//!
//! ```
//! use std::{any::type_name, num::ParseIntError};
//! use assay::assertion::assert_does_not_fail_with;
//!
//! let err = assert_does_not_fail_with(|| "eighty".parse::<u16>(), "port").unwrap_err();
//!
//! assert_eq!(
//!     err.to_string(),
//!     format!("port ==> Unexpected exception thrown: {}", type_name::<ParseIntError>())
//! );
//! assert!(err.cause().downcast_ref::<ParseIntError>().is_some());
//! ```
use thiserror::Error;
use tracing::{debug, instrument, trace};

use crate::{
    message::{format_message, MessageSource},
    operation::{Failure, Operation},
};

/// Leads the generated detail of a does-not-fail assertion.
pub const UNEXPECTED_FAILURE: &str = "Unexpected exception thrown: ";

/// An assertion did not hold.
///
/// Carries the formatted failure message and, as its cause, the [`Failure`]
/// that made the assertion fail. The cause's original error is exposed
/// through [`source`](std::error::Error::source), so test reports and
/// `anyhow`-style chains show it.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct AssertionFailed {
    message: String,
    #[source]
    cause: Failure,
}

impl AssertionFailed {
    /// Create an assertion failure with a fully formatted message.
    pub fn new(message: impl Into<String>, cause: Failure) -> Self {
        Self {
            message: message.into(),
            cause,
        }
    }

    /// The failure message, without the cause.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The failure that made the assertion fail.
    pub fn cause(&self) -> &Failure {
        &self.cause
    }

    /// Extract the failure that made the assertion fail.
    pub fn into_cause(self) -> Failure {
        self.cause
    }
}

/// Assert that `op` completes without failing, and return its value.
///
/// See [`assert_does_not_fail_with`].
pub fn assert_does_not_fail<O, K>(op: O) -> Result<O::Output, AssertionFailed>
where
    O: Operation<K>,
{
    assert_does_not_fail_with(op, None::<&str>)
}

/// Assert that `op` completes without failing, and return its value.
///
/// The operation is executed exactly once on the calling thread. Errors and
/// unwinding panics are both failures. On failure the message is
///
/// ```text
/// [<message> ==> ]Unexpected exception thrown: <type name of the failure>
/// ```
///
/// where `message` is evaluated only on this path. Blank messages are left
/// out.
#[instrument(skip_all, level = "trace")]
pub fn assert_does_not_fail_with<O, K, M>(
    op: O,
    message: M,
) -> Result<O::Output, AssertionFailed>
where
    O: Operation<K>,
    M: MessageSource,
{
    match op.execute_capturing() {
        Ok(value) => {
            trace!("operation completed");
            Ok(value)
        }
        Err(cause) => {
            debug!(failure = cause.type_name(), "operation failed");
            let detail = format!("{UNEXPECTED_FAILURE}{}", cause.type_name());
            Err(AssertionFailed::new(format_message(message, detail), cause))
        }
    }
}

/// Assert that an operation completes without failing, panicking otherwise.
///
/// Evaluates to the operation's value. Optional trailing arguments are a
/// format string and its arguments, formatted only if the assertion fails.
/// The panic message is the assertion message followed by the chain of
/// causes.
///
/// ```
/// use assay::assert_does_not_fail;
///
/// let n: i32 = assert_does_not_fail!(|| "42".parse::<i32>());
/// assert_eq!(n, 42);
///
/// let attempt = 3;
/// let m: i32 = assert_does_not_fail!(|| "7".parse::<i32>(), "attempt {}", attempt);
/// assert_eq!(m, 7);
/// ```
///
/// ```should_panic
/// use assay::assert_does_not_fail;
///
/// assert_does_not_fail!(|| "forty-two".parse::<i32>(), "parsing the answer");
/// ```
#[macro_export]
macro_rules! assert_does_not_fail {
    ($op:expr $(,)?) => {
        match $crate::assertion::assert_does_not_fail($op) {
            ::core::result::Result::Ok(value) => value,
            ::core::result::Result::Err(err) => {
                ::std::panic!("{}", $crate::report::AssertionReport::from(&err))
            }
        }
    };
    ($op:expr, $($arg:tt)+) => {
        match $crate::assertion::assert_does_not_fail_with($op, || ::std::format!($($arg)+)) {
            ::core::result::Result::Ok(value) => value,
            ::core::result::Result::Err(err) => {
                ::std::panic!("{}", $crate::report::AssertionReport::from(&err))
            }
        }
    };
}
