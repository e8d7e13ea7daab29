//! Error types.
//!
//! Dispatch itself cannot fail: misuse of a signal (wrong slot parameters,
//! disconnecting a closure by value) is rejected at compile time. The only
//! runtime errors come from `printf`, described by [`FormatError`].

use std::io;

use thiserror::Error;

/// Errors produced by [`printf`](crate::printf::printf).
///
/// Every variant except [`FormatError::Sink`] is detected before any output
/// is produced.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum FormatError {
    /// An argument's type does not fit its specifier.
    #[error("argument {index} has type {found}, but %{conversion} expects {expected}")]
    TypeMismatch {
        /// Zero-based position of the argument.
        index: usize,
        conversion: char,
        expected: &'static str,
        found: &'static str,
    },

    /// A specifier has no argument left to consume.
    #[error("specifier at byte {offset} has no matching argument")]
    MissingArgument { offset: usize },

    /// More arguments were supplied than the format consumes.
    #[error("{supplied} arguments supplied but only {consumed} consumed by the format")]
    TooFewSpecifiers { supplied: usize, consumed: usize },

    /// The format ends inside a specifier.
    #[error("specifier at byte {offset} ends without a conversion character")]
    MissingConversion { offset: usize },

    #[error("specifier at byte {offset} has unknown conversion {found:?}")]
    UnknownConversion { offset: usize, found: char },

    /// `%n` and `*` width or precision are recognised but not supported.
    #[error("specifier at byte {offset} uses unsupported {conversion:?}")]
    UnsupportedConversion { offset: usize, conversion: char },

    /// The sink failed to accept the rendered text.
    #[error("sink write failed: {0}")]
    Sink(#[from] io::Error),
}

impl FormatError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use chime_core::FormatError;
    ///
    /// let err = FormatError::MissingArgument { offset: 4 };
    /// assert_eq!(err.as_label(), "format_missing_argument");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            FormatError::TypeMismatch { .. } => "format_type_mismatch",
            FormatError::MissingArgument { .. } => "format_missing_argument",
            FormatError::TooFewSpecifiers { .. } => "format_too_few_specifiers",
            FormatError::MissingConversion { .. } => "format_missing_conversion",
            FormatError::UnknownConversion { .. } => "format_unknown_conversion",
            FormatError::UnsupportedConversion { .. } => "format_unsupported_conversion",
            FormatError::Sink(_) => "format_sink",
        }
    }

    /// True for errors found while checking the format against its
    /// arguments, as opposed to failures of the sink.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, FormatError::Sink(_))
    }
}
