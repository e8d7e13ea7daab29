//! Type-Checked printf
//!
//! C-style `printf` formatting whose arguments are checked against the
//! format string before anything is written.
//!
//! # How Formatting Works
//!
//! 1. The format string is scanned into literal runs and specifiers
//! 2. Each specifier is paired with the next argument and type-checked
//! 3. Leftover specifiers or arguments are reported as errors
//! 4. Only then is the text rendered and handed to the [`Sink`] in one call
//!
//! A failed call leaves the sink untouched.
//!
//! Only `%` conversions are understood. There is no brace-placeholder
//! (`{}`, `{0}`) syntax; Rust's own `format!` covers that style.
//!
//! ```
//! use chime_core::printf;
//!
//! let mut out = String::new();
//! printf!(&mut out, "%-5s|%03d|%.2f\n", "id", 7, 1.5).unwrap();
//! assert_eq!(out, "id   |007|1.50\n");
//! ```

mod arg;
mod render;
mod sink;
mod specifier;

use tracing::debug;

use crate::error::FormatError;

pub use arg::{Arg, ToArg};
pub use sink::{IoSink, Sink};

use specifier::Piece;

/// Format `args` according to `format` and write the result to `sink`.
///
/// Returns the number of bytes written. On error nothing is written.
pub fn printf<S>(sink: &mut S, format: &str, args: &[Arg<'_>]) -> Result<usize, FormatError>
where
    S: Sink + ?Sized,
{
    let text = format_args_checked(format, args).inspect_err(|err| {
        debug!(error = err.as_label(), %err, format, "Rejected format.");
    })?;

    if !text.is_empty() {
        sink.accept(&text)?;
    }
    Ok(text.len())
}

/// Format into a new `String`.
pub fn sprintf(format: &str, args: &[Arg<'_>]) -> Result<String, FormatError> {
    let mut out = String::new();
    printf(&mut out, format, args)?;
    Ok(out)
}

fn format_args_checked(format: &str, args: &[Arg<'_>]) -> Result<String, FormatError> {
    let pieces = specifier::scan(format)?;

    let mut bound = Vec::with_capacity(pieces.len());
    let mut remaining = args.iter().enumerate();
    for piece in &pieces {
        if let Piece::Specifier(spec) = piece {
            let (index, arg) = remaining
                .next()
                .ok_or(FormatError::MissingArgument { offset: spec.offset })?;
            spec.check(index, arg)?;
            bound.push(arg);
        }
    }

    if bound.len() < args.len() {
        return Err(FormatError::TooFewSpecifiers {
            supplied: args.len(),
            consumed: bound.len(),
        });
    }

    let mut out = String::with_capacity(format.len());
    let mut bound = bound.into_iter();
    for piece in &pieces {
        match piece {
            Piece::Literal(text) => out.push_str(text),
            Piece::Specifier(spec) => {
                if let Some(arg) = bound.next() {
                    render::render(&mut out, spec, arg);
                }
            }
        }
    }
    Ok(out)
}

/// Type-checked `printf` into a [`Sink`].
///
/// Each argument is converted with [`ToArg`], so anything without an impl
/// is a compile error.
///
/// ```
/// let mut out = String::new();
/// let written = chime_core::printf!(&mut out, "%s=%#x", "mask", 255u8).unwrap();
/// assert_eq!(out, "mask=0xff");
/// assert_eq!(written, 9);
/// ```
#[macro_export]
macro_rules! printf {
    ($sink:expr, $format:expr $(, $arg:expr)* $(,)?) => {
        $crate::printf::printf(
            $sink,
            $format,
            &[$($crate::printf::ToArg::to_arg(&$arg)),*],
        )
    };
}

/// Like [`printf!`], returning the text as a `String`.
#[macro_export]
macro_rules! sprintf {
    ($format:expr $(, $arg:expr)* $(,)?) => {
        $crate::printf::sprintf($format, &[$($crate::printf::ToArg::to_arg(&$arg)),*])
    };
}
