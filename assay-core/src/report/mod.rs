//! Serializable snapshots of assertion failures.
//!
//! An [`AssertionFailed`] owns its cause, which may not be serializable or
//! even cloneable. Test runners that collect results from other threads or
//! processes use an [`AssertionReport`] instead: a plain record of the
//! assertion message, the classification of the cause, and the rendered
//! chain of causes.
//!
//! The [`Display`](std::fmt::Display) rendering of a report is what the
//! [`assert_does_not_fail!`](crate::assert_does_not_fail) macro panics with.
//!
//! ```
//! use std::{any::type_name, num::ParseIntError};
//! use assay::{assertion::assert_does_not_fail, report::AssertionReport};
//!
//! let err = assert_does_not_fail(|| "x".parse::<u8>()).unwrap_err();
//! let report = AssertionReport::from(&err);
//!
//! assert_eq!(report.cause_type, type_name::<ParseIntError>());
//! assert_eq!(report.cause_chain, ["invalid digit found in string"]);
//! assert!(report.to_string().ends_with("Caused by:\n    invalid digit found in string"));
//! ```
use std::{error::Error as StdError, fmt, iter};

use serde::{Deserialize, Serialize};

use crate::assertion::AssertionFailed;

/// A failed assertion, detached from its cause.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AssertionReport {
    /// The assertion failure message.
    pub message: String,
    /// Fully qualified type name of the failure that caused the assertion to
    /// fail.
    pub cause_type: String,
    /// The rendered cause, followed by each of its own sources.
    pub cause_chain: Vec<String>,
}

impl From<&AssertionFailed> for AssertionReport {
    fn from(err: &AssertionFailed) -> Self {
        let cause = err.cause();
        let root: &(dyn StdError + 'static) = &**cause;

        Self {
            message: err.message().to_string(),
            cause_type: cause.type_name().to_string(),
            cause_chain: iter::successors(Some(root), |&err| err.source())
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl fmt::Display for AssertionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        match self.cause_chain.as_slice() {
            [] => Ok(()),
            [cause] => write!(f, "\n\nCaused by:\n    {cause}"),
            chain => {
                write!(f, "\n\nCaused by:")?;
                for (i, cause) in chain.iter().enumerate() {
                    write!(f, "\n    {i}: {cause}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::{any::type_name, io};

    use thiserror::Error;

    use super::*;
    use crate::{assertion::assert_does_not_fail_with, operation::Action};

    #[derive(Error, Debug)]
    #[error("could not load fixture")]
    struct FixtureError(#[source] io::Error);

    fn load_fixture() -> Result<(), FixtureError> {
        Err(FixtureError(io::Error::other("missing file")))
    }

    #[test]
    fn it_records_the_cause_chain() {
        let err = assert_does_not_fail_with(Action(load_fixture), "fixtures").unwrap_err();
        let report = AssertionReport::from(&err);

        assert_eq!(
            report.message,
            format!(
                "fixtures ==> Unexpected exception thrown: {}",
                type_name::<FixtureError>()
            )
        );
        assert_eq!(report.cause_type, type_name::<FixtureError>());
        assert_eq!(
            report.cause_chain,
            vec!["could not load fixture".to_string(), "missing file".to_string()]
        );
    }

    #[test]
    fn it_renders_a_single_cause() {
        let report = AssertionReport {
            message: "m".to_string(),
            cause_type: "t".to_string(),
            cause_chain: vec!["boom".to_string()],
        };

        assert_eq!(report.to_string(), "m\n\nCaused by:\n    boom");
    }

    #[test]
    fn it_numbers_multiple_causes() {
        let report = AssertionReport {
            message: "m".to_string(),
            cause_type: "t".to_string(),
            cause_chain: vec!["outer".to_string(), "inner".to_string()],
        };

        assert_eq!(
            report.to_string(),
            "m\n\nCaused by:\n    0: outer\n    1: inner"
        );
    }
}
