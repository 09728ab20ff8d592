//! Failure messages.
//!
//! Every assertion failure message follows the same convention:
//!
//! ```text
//! <custom message> ==> <generated detail>
//! ```
//!
//! The custom message is optional. When it is absent or blank, the message is
//! just the generated detail. The separator is part of the stable output of
//! the crate and golden tests downstream depend on it.
//!
//! Custom messages come from a [`MessageSource`], which is only consulted once
//! a failure message actually has to be built. Passing a closure defers any
//! formatting cost to the failure path.
use std::fmt::Display;

/// Separates a custom message from the generated detail.
pub const SEPARATOR: &str = " ==> ";

/// A possibly lazy, possibly absent custom failure message.
///
/// Implemented for string literals, [`String`]s, [`Option`]s of either (where
/// `None` means no message), and closures producing a string. Closures are
/// called at most once, and only when the assertion fails.
///
/// ```
/// use assay::message::MessageSource;
///
/// assert_eq!("literal".into_message().as_deref(), Some("literal"));
/// assert_eq!(None::<&str>.into_message(), None);
/// assert_eq!((|| format!("{} + {}", 1, 2)).into_message().as_deref(), Some("1 + 2"));
/// ```
pub trait MessageSource {
    /// Evaluate the source.
    fn into_message(self) -> Option<String>;
}

impl MessageSource for &str {
    fn into_message(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl MessageSource for String {
    fn into_message(self) -> Option<String> {
        Some(self)
    }
}

impl<S: MessageSource> MessageSource for Option<S> {
    fn into_message(self) -> Option<String> {
        self.and_then(MessageSource::into_message)
    }
}

impl<F, S> MessageSource for F
where
    F: FnOnce() -> S,
    S: Into<String>,
{
    fn into_message(self) -> Option<String> {
        Some(self().into())
    }
}

/// Build the prefix for a custom message.
///
/// Blank messages count as absent and produce an empty prefix. A message is
/// blank when every character is at most `' '`, which covers the ASCII space
/// and the C0 control characters.
pub fn build_prefix(message: Option<&str>) -> String {
    match message {
        Some(message) if !is_blank(message) => format!("{message}{SEPARATOR}"),
        _ => String::new(),
    }
}

fn is_blank(message: &str) -> bool {
    message.chars().all(|c| c <= ' ')
}

/// Evaluate `message` and prepend it to `detail`.
pub fn format_message<M: MessageSource>(message: M, detail: impl Display) -> String {
    let message = message.into_message();
    format!("{}{detail}", build_prefix(message.as_deref()))
}

#[cfg(test)]
mod test {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn it_prefixes_custom_messages() {
        assert_eq!(format_message("Custom message", "detail"), "Custom message ==> detail");
    }

    #[test]
    fn it_omits_absent_messages() {
        assert_eq!(format_message(None::<String>, "detail"), "detail");
    }

    #[test]
    fn it_omits_blank_messages() {
        assert_eq!(format_message("", "detail"), "detail");
        assert_eq!(format_message("  \t", "detail"), "detail");
        assert_eq!(format_message(|| "", "detail"), "detail");
        assert_eq!(format_message("\r\n\0", "detail"), "detail");
    }

    #[test]
    fn it_keeps_messages_of_unicode_spaces() {
        assert_eq!(build_prefix(Some("\u{3000}")), "\u{3000} ==> ");
        assert_eq!(build_prefix(Some("\u{a0}")), "\u{a0} ==> ");
    }

    #[test]
    fn it_keeps_surrounding_whitespace_of_real_messages() {
        assert_eq!(build_prefix(Some(" padded ")), " padded  ==> ");
    }

    #[test]
    fn it_evaluates_closures_once() {
        let calls = Cell::new(0);
        let source = || {
            calls.set(calls.get() + 1);
            "lazy"
        };

        assert_eq!(format_message(source, 42), "lazy ==> 42");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn it_accepts_owned_and_optional_strings() {
        assert_eq!(format_message(String::from("owned"), "d"), "owned ==> d");
        assert_eq!(format_message(Some("some"), "d"), "some ==> d");
    }
}
