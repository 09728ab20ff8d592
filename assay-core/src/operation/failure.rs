//! Failure types.
//!
//! An [`Operation`](crate::operation::Operation) can fail in one of two ways:
//! it can return an error, or it can panic. Assay does not distinguish
//! between the two. Both are captured into a [`Failure`], an opaque value that
//! remembers the fully qualified type name of whatever went wrong and keeps
//! the original error around so it can be reported as the cause of an
//! [`AssertionFailed`](crate::assertion::AssertionFailed).
//!
//! Panics carry an arbitrary payload rather than an error. They are converted
//! into a [`Panic`] error first, so every [`Failure`] has the same shape.
use std::{
    any::{type_name, Any},
    backtrace::Backtrace,
    error::Error as StdError,
    fmt,
    ops::Deref,
};

use thiserror::Error;

const OPAQUE_PAYLOAD: &str = "Box<dyn Any>";

/// The error an unwinding panic is converted into.
///
/// String payloads (the ones produced by `panic!`, `assert!`, indexing out of
/// bounds and friends) are preserved as the message. Any other payload, such
/// as one raised with [`std::panic::panic_any`], is opaque.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .message.as_deref().unwrap_or(OPAQUE_PAYLOAD))]
pub struct Panic {
    message: Option<String>,
}

impl Panic {
    /// Convert a payload obtained from [`std::panic::catch_unwind`].
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<&'static str>() {
            Ok(message) => Some(message.to_string()),
            Err(payload) => payload.downcast::<String>().ok().map(|message| *message),
        };

        Self { message }
    }

    /// The panic message, if the payload was a string.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// A failure captured while executing an
/// [`Operation`](crate::operation::Operation).
///
/// The failure is classified by the fully qualified name of the type that
/// was raised, as reported by [`std::any::type_name`]. The original error is
/// kept (boxed in an [`anyhow::Error`], which also captures a backtrace when
/// `RUST_BACKTRACE` is set) and is reachable through [`Deref`], so
/// [`downcast_ref`](trait@std::error::Error) and `source()` work on it
/// directly.
///
/// ## Example
///
/// ```
/// use std::io;
/// use assay::operation::Failure;
///
/// let failure = Failure::from(io::Error::other("disk on fire"));
///
/// assert_eq!(failure.type_name(), std::any::type_name::<io::Error>());
/// assert!(failure.downcast_ref::<io::Error>().is_some());
/// ```
#[derive(Debug)]
pub struct Failure {
    type_name: &'static str,
    err: anyhow::Error,
}

impl Failure {
    /// Capture an error of a concrete type, classified by that type.
    pub fn new<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            type_name: type_name::<E>(),
            err: err.into(),
        }
    }

    /// Capture an [`anyhow::Error`].
    ///
    /// The concrete type behind an [`anyhow::Error`] is erased, so the failure
    /// is classified as `anyhow::Error`.
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        Self {
            type_name: type_name::<anyhow::Error>(),
            err,
        }
    }

    /// Capture a boxed error.
    ///
    /// As with [`from_anyhow`](Failure::from_anyhow), the concrete type is
    /// erased, so the failure is classified as the box itself.
    pub fn from_boxed(err: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        Self {
            type_name: type_name::<Box<dyn StdError + Send + Sync + 'static>>(),
            err: anyhow::Error::from_boxed(err),
        }
    }

    /// Capture the payload of an unwinding panic.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        Self::new(Panic::from_payload(payload))
    }

    /// The fully qualified type name of the captured error.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the failure is a captured panic.
    pub fn is_panic(&self) -> bool {
        self.err.is::<Panic>()
    }

    /// Extract the underlying error.
    pub fn into_err(self) -> anyhow::Error {
        self.err
    }

    /// Extract the underlying error as a reference.
    pub fn as_err(&self) -> &anyhow::Error {
        &self.err
    }

    /// The backtrace captured when the error was boxed.
    pub fn backtrace(&self) -> &Backtrace {
        self.err.backtrace()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.err)
    }
}

impl Deref for Failure {
    type Target = dyn StdError + Send + Sync + 'static;

    fn deref(&self) -> &Self::Target {
        &*self.err
    }
}

impl<E> From<E> for Failure
where
    E: StdError + Send + Sync + 'static,
{
    fn from(value: E) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod test {
    use std::{fmt::Write, io};

    use super::*;

    #[derive(Error, Debug)]
    #[error("illegal state")]
    struct IllegalState;

    #[test]
    fn it_classifies_by_type_name() {
        let failure = Failure::from(IllegalState);

        assert_eq!(failure.type_name(), type_name::<IllegalState>());
        assert!(failure.type_name().ends_with("::IllegalState"));
        assert!(!failure.is_panic());
    }

    #[test]
    fn it_keeps_the_original_error() {
        let failure = Failure::from(io::Error::new(io::ErrorKind::NotFound, "gone"));

        let err = failure.downcast_ref::<io::Error>().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(failure.to_string(), "gone");
    }

    #[test]
    fn it_classifies_anyhow_errors_as_anyhow() {
        let failure = Failure::from_anyhow(anyhow::anyhow!("opaque"));

        assert_eq!(failure.type_name(), "anyhow::Error");
        assert_eq!(failure.into_err().to_string(), "opaque");
    }

    #[test]
    fn it_classifies_boxed_errors_as_the_box() {
        let boxed: Box<dyn StdError + Send + Sync> = Box::new(IllegalState);
        let failure = Failure::from_boxed(boxed);

        assert_eq!(
            failure.type_name(),
            type_name::<Box<dyn StdError + Send + Sync>>()
        );
        assert_eq!(failure.to_string(), "illegal state");
        assert!(!failure.is_panic());
    }

    #[test]
    fn it_preserves_static_str_panic_messages() {
        let failure = Failure::from_panic(Box::new("boom"));

        assert!(failure.is_panic());
        assert_eq!(failure.type_name(), type_name::<Panic>());
        assert_eq!(failure.downcast_ref::<Panic>().unwrap().message(), Some("boom"));
    }

    #[test]
    fn it_preserves_formatted_panic_messages() {
        let mut message = String::new();
        write!(message, "index {} out of bounds", 7).unwrap();
        let failure = Failure::from_panic(Box::new(message));

        assert_eq!(failure.to_string(), "index 7 out of bounds");
    }

    #[test]
    fn it_treats_other_payloads_as_opaque() {
        let panic = Panic::from_payload(Box::new(42_u32));

        assert_eq!(panic.message(), None);
        assert_eq!(panic.to_string(), OPAQUE_PAYLOAD);
    }
}
