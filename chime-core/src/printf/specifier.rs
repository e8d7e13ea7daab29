//! Format string scanning.
//!
//! A format string is split into literal runs and conversion specifiers of
//! the form `%[flags][width][.precision][length]conversion`. Scanning fails
//! on the first malformed specifier; nothing is rendered from a format that
//! does not scan.

use crate::error::FormatError;

use super::arg::Arg;

/// Conversion flags (`-`, `+`, space, `#`, `0`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Flags {
    pub left: bool,
    pub plus: bool,
    pub space: bool,
    pub alt: bool,
    pub zero: bool,
}

/// Length modifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Length {
    #[default]
    None,
    Hh,
    H,
    L,
    Ll,
    J,
    Z,
    T,
    BigL,
}

impl Length {
    /// Bit width integers are truncated to before rendering, if any.
    pub fn truncation(self) -> Option<u32> {
        match self {
            Length::Hh => Some(8),
            Length::H => Some(16),
            _ => None,
        }
    }
}

/// One parsed conversion specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Specifier {
    /// Byte offset of the introducing `%`.
    pub offset: usize,
    pub flags: Flags,
    pub width: Option<usize>,
    pub precision: Option<usize>,
    pub length: Length,
    pub conversion: char,
}

impl Specifier {
    /// Check that `arg`, the `index`th argument, fits this specifier.
    pub fn check(&self, index: usize, arg: &Arg<'_>) -> Result<(), FormatError> {
        let (accepted, expected) = match self.conversion {
            'd' | 'i' | 'u' | 'o' | 'x' | 'X' => (
                matches!(arg, Arg::Signed { .. } | Arg::Unsigned { .. }),
                "an integer",
            ),
            'f' | 'F' | 'e' | 'E' | 'g' | 'G' | 'a' | 'A' => {
                (matches!(arg, Arg::Float { .. }), "a floating-point number")
            }
            'c' => (
                matches!(arg, Arg::Char(_) | Arg::Unsigned { bits: 8, .. }),
                "a character",
            ),
            's' => (matches!(arg, Arg::Str(_)), "a string"),
            'p' => (matches!(arg, Arg::Pointer(_)), "a pointer"),
            // The scanner only produces the conversions above.
            _ => (false, "nothing"),
        };

        if accepted {
            Ok(())
        } else {
            Err(FormatError::TypeMismatch {
                index,
                conversion: self.conversion,
                expected,
                found: arg.type_name(),
            })
        }
    }
}

/// A piece of a scanned format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Piece<'a> {
    Literal(&'a str),
    Specifier(Specifier),
}

/// Split `format` into literal runs and specifiers.
pub(crate) fn scan(format: &str) -> Result<Vec<Piece<'_>>, FormatError> {
    let bytes = format.as_bytes();
    let mut pieces = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }

        if literal_start < i {
            pieces.push(Piece::Literal(&format[literal_start..i]));
        }

        if bytes.get(i + 1) == Some(&b'%') {
            pieces.push(Piece::Literal("%"));
            i += 2;
        } else {
            let (spec, next) = scan_spec(format, i)?;
            pieces.push(Piece::Specifier(spec));
            i = next;
        }
        literal_start = i;
    }

    if literal_start < bytes.len() {
        pieces.push(Piece::Literal(&format[literal_start..]));
    }
    Ok(pieces)
}

/// Parse the specifier whose `%` sits at `offset`. Returns the specifier
/// and the index just past its conversion character.
fn scan_spec(format: &str, offset: usize) -> Result<(Specifier, usize), FormatError> {
    let bytes = format.as_bytes();
    let mut i = offset + 1;

    let mut flags = Flags::default();
    while let Some(&b) = bytes.get(i) {
        match b {
            b'-' => flags.left = true,
            b'+' => flags.plus = true,
            b' ' => flags.space = true,
            b'#' => flags.alt = true,
            b'0' => flags.zero = true,
            _ => break,
        }
        i += 1;
    }

    if bytes.get(i) == Some(&b'*') {
        return Err(FormatError::UnsupportedConversion { offset, conversion: '*' });
    }
    let width = scan_number(bytes, &mut i);

    let precision = if bytes.get(i) == Some(&b'.') {
        i += 1;
        if bytes.get(i) == Some(&b'*') {
            return Err(FormatError::UnsupportedConversion { offset, conversion: '*' });
        }
        Some(scan_number(bytes, &mut i).unwrap_or(0))
    } else {
        None
    };

    let length = scan_length(bytes, &mut i);

    let conversion = match bytes.get(i) {
        None => return Err(FormatError::MissingConversion { offset }),
        Some(&b) => match b {
            b'd' | b'i' | b'u' | b'o' | b'x' | b'X' | b'f' | b'F' | b'e' | b'E' | b'g' | b'G'
            | b'a' | b'A' | b'c' | b's' | b'p' => char::from(b),
            b'n' => return Err(FormatError::UnsupportedConversion { offset, conversion: 'n' }),
            _ => {
                let found = format[i..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
                return Err(FormatError::UnknownConversion { offset, found });
            }
        },
    };

    let spec = Specifier {
        offset,
        flags,
        width,
        precision,
        length,
        conversion,
    };
    Ok((spec, i + 1))
}

fn scan_number(bytes: &[u8], i: &mut usize) -> Option<usize> {
    let start = *i;
    let mut value: usize = 0;
    while let Some(&b) = bytes.get(*i) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.saturating_mul(10).saturating_add(usize::from(b - b'0'));
        *i += 1;
    }
    (*i > start).then_some(value)
}

fn scan_length(bytes: &[u8], i: &mut usize) -> Length {
    let (length, consumed) = match (bytes.get(*i), bytes.get(*i + 1)) {
        (Some(b'h'), Some(b'h')) => (Length::Hh, 2),
        (Some(b'h'), _) => (Length::H, 1),
        (Some(b'l'), Some(b'l')) => (Length::Ll, 2),
        (Some(b'l'), _) => (Length::L, 1),
        (Some(b'j'), _) => (Length::J, 1),
        (Some(b'z'), _) => (Length::Z, 1),
        (Some(b't'), _) => (Length::T, 1),
        (Some(b'L'), _) => (Length::BigL, 1),
        _ => (Length::None, 0),
    };
    *i += consumed;
    length
}
