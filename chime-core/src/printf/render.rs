//! Rendering of checked specifiers.
//!
//! Output follows C `printf` conventions: flags, minimum width, precision,
//! `inf`/`nan` spelling, two-digit exponents and `0x` hex-float notation.
//! Width is counted in characters.

use super::arg::Arg;
use super::specifier::Specifier;

/// Append the rendering of `arg` under `spec` to `out`.
///
/// `spec.check(arg)` must have passed.
pub(crate) fn render(out: &mut String, spec: &Specifier, arg: &Arg<'_>) {
    match (spec.conversion, arg) {
        ('d' | 'i' | 'u' | 'o' | 'x' | 'X', _) => render_integer(out, spec, arg),
        ('c', Arg::Char(c)) => pad(out, spec, "", c.encode_utf8(&mut [0; 4]), false),
        ('c', Arg::Unsigned { value, .. }) => {
            let c = char::from(*value as u8);
            pad(out, spec, "", c.encode_utf8(&mut [0; 4]), false)
        }
        ('s', Arg::Str(s)) => {
            let text = match spec.precision {
                Some(max) => s.char_indices().nth(max).map_or(*s, |(end, _)| &s[..end]),
                None => *s,
            };
            pad(out, spec, "", text, false)
        }
        ('p', Arg::Pointer(address)) => {
            if *address == 0 {
                pad(out, spec, "", "(nil)", false)
            } else {
                pad(out, spec, "0x", &format!("{address:x}"), false)
            }
        }
        (_, Arg::Float { value, .. }) => render_float(out, spec, *value),
        _ => {}
    }
}

/// Write `prefix` and `body` padded to the specifier's width.
///
/// With `zero_fill`, padding is zeros inserted between prefix and body;
/// otherwise spaces before (or, with `-`, after) the whole text.
fn pad(out: &mut String, spec: &Specifier, prefix: &str, body: &str, zero_fill: bool) {
    let len = prefix.chars().count() + body.chars().count();
    let fill = spec.width.unwrap_or(0).saturating_sub(len);

    if spec.flags.left {
        out.push_str(prefix);
        out.push_str(body);
        out.extend(std::iter::repeat(' ').take(fill));
    } else if zero_fill {
        out.push_str(prefix);
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(body);
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(prefix);
        out.push_str(body);
    }
}

fn sign_prefix(spec: &Specifier, negative: bool) -> &'static str {
    if negative {
        "-"
    } else if spec.flags.plus {
        "+"
    } else if spec.flags.space {
        " "
    } else {
        ""
    }
}

// ----------------------------------------------------------------------------
// Integers
// ----------------------------------------------------------------------------

fn render_integer(out: &mut String, spec: &Specifier, arg: &Arg<'_>) {
    let (raw, arg_bits) = match *arg {
        Arg::Signed { value, bits, .. } => (value as u128, bits),
        Arg::Unsigned { value, bits, .. } => (value, bits),
        _ => return,
    };
    let bits = spec.length.truncation().unwrap_or(arg_bits);
    let raw = truncate(raw, bits);

    let (negative, magnitude) = match spec.conversion {
        'd' | 'i' => {
            let signed = sign_extend(raw, bits);
            (signed < 0, signed.unsigned_abs())
        }
        _ => (false, raw),
    };

    let mut digits = match spec.conversion {
        'o' => format!("{magnitude:o}"),
        'x' => format!("{magnitude:x}"),
        'X' => format!("{magnitude:X}"),
        _ => magnitude.to_string(),
    };

    if let Some(precision) = spec.precision {
        if precision == 0 && magnitude == 0 {
            digits.clear();
        } else if digits.len() < precision {
            digits.insert_str(0, &"0".repeat(precision - digits.len()));
        }
    }

    let prefix = match spec.conversion {
        'd' | 'i' => sign_prefix(spec, negative),
        'o' if spec.flags.alt && !digits.starts_with('0') => "0",
        'x' if spec.flags.alt && magnitude != 0 => "0x",
        'X' if spec.flags.alt && magnitude != 0 => "0X",
        _ => "",
    };

    let zero_fill = spec.flags.zero && spec.precision.is_none();
    pad(out, spec, prefix, &digits, zero_fill);
}

fn truncate(raw: u128, bits: u32) -> u128 {
    if bits >= u128::BITS {
        raw
    } else {
        raw & ((1u128 << bits) - 1)
    }
}

fn sign_extend(raw: u128, bits: u32) -> i128 {
    if bits >= u128::BITS {
        raw as i128
    } else {
        let shift = u128::BITS - bits;
        ((raw << shift) as i128) >> shift
    }
}

// ----------------------------------------------------------------------------
// Floating point
// ----------------------------------------------------------------------------

const DEFAULT_PRECISION: usize = 6;

fn render_float(out: &mut String, spec: &Specifier, value: f64) {
    let upper = spec.conversion.is_ascii_uppercase();
    let sign = sign_prefix(spec, value.is_sign_negative());

    if !value.is_finite() {
        let body = match (value.is_nan(), upper) {
            (true, false) => "nan",
            (true, true) => "NAN",
            (false, false) => "inf",
            (false, true) => "INF",
        };
        return pad(out, spec, sign, body, false);
    }

    let magnitude = value.abs();
    let alt = spec.flags.alt;
    let (prefix, body) = match spec.conversion.to_ascii_lowercase() {
        'f' => (sign.to_owned(), fixed(magnitude, spec.precision.unwrap_or(DEFAULT_PRECISION), alt)),
        'e' => (
            sign.to_owned(),
            exponential(magnitude, spec.precision.unwrap_or(DEFAULT_PRECISION), alt),
        ),
        'g' => (sign.to_owned(), general(magnitude, spec.precision, alt)),
        'a' => (format!("{sign}0x"), hex_float(magnitude, spec.precision, alt)),
        _ => return,
    };

    let (prefix, body) = if upper {
        (prefix.to_ascii_uppercase(), body.to_ascii_uppercase())
    } else {
        (prefix, body)
    };
    pad(out, spec, &prefix, &body, spec.flags.zero);
}

fn fixed(value: f64, precision: usize, alt: bool) -> String {
    let mut body = format!("{value:.precision$}");
    if alt && precision == 0 {
        body.push('.');
    }
    body
}

fn exponential(value: f64, precision: usize, alt: bool) -> String {
    let (mantissa, exponent) = split_exponent(value, precision);
    let point = if alt && precision == 0 { "." } else { "" };
    let exp_sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}{point}e{exp_sign}{:02}", exponent.unsigned_abs())
}

/// Rust's `{:.N e}` rendering split into mantissa and decimal exponent.
fn split_exponent(value: f64, precision: usize) -> (String, i32) {
    let rendered = format!("{value:.precision$e}");
    match rendered.split_once('e') {
        Some((mantissa, exponent)) => (mantissa.to_owned(), exponent.parse().unwrap_or(0)),
        None => (rendered, 0),
    }
}

fn general(value: f64, precision: Option<usize>, alt: bool) -> String {
    let precision = match precision {
        None => DEFAULT_PRECISION,
        Some(0) => 1,
        Some(p) => p,
    };

    // The exponent after rounding to `precision` significant digits.
    let exponent = if value == 0.0 {
        0
    } else {
        split_exponent(value, precision - 1).1
    };

    let body = if exponent >= -4 && i64::from(exponent) < precision as i64 {
        let decimals = (precision as i64 - 1 - i64::from(exponent)).max(0) as usize;
        fixed(value, decimals, alt)
    } else {
        exponential(value, precision - 1, alt)
    };

    if alt {
        body
    } else {
        strip_fraction_zeros(&body)
    }
}

/// Remove trailing zeros of the fractional part, and a dangling point.
fn strip_fraction_zeros(body: &str) -> String {
    let (number, exponent) = match body.find('e') {
        Some(at) => body.split_at(at),
        None => (body, ""),
    };
    if !number.contains('.') {
        return body.to_owned();
    }
    let number = number.trim_end_matches('0').trim_end_matches('.');
    format!("{number}{exponent}")
}

const MANTISSA_BITS: u32 = 52;
const MANTISSA_HEX_DIGITS: usize = 13;

/// Hex-float body (everything after `0x`), e.g. `1.8p+1` for 3.0.
fn hex_float(value: f64, precision: Option<usize>, alt: bool) -> String {
    let bits = value.to_bits();
    let biased = ((bits >> MANTISSA_BITS) & 0x7ff) as i32;
    let mut fraction = bits & ((1u64 << MANTISSA_BITS) - 1);

    let (mut lead, exponent) = match (biased, fraction) {
        (0, 0) => (0u64, 0),
        (0, _) => (0u64, -1022),
        _ => (1u64, biased - 1023),
    };

    let digits = match precision {
        Some(p) if p < MANTISSA_HEX_DIGITS => {
            let shift = (MANTISSA_HEX_DIGITS - p) as u32 * 4;
            let remainder = fraction & ((1u64 << shift) - 1);
            let half = 1u64 << (shift - 1);
            fraction >>= shift;

            // Round half to even. With no fraction digits the lead digit decides.
            let odd = if p == 0 { lead & 1 == 1 } else { fraction & 1 == 1 };
            if remainder > half || (remainder == half && odd) {
                fraction += 1;
                if fraction >> (p as u32 * 4) != 0 {
                    fraction = 0;
                    lead += 1;
                }
            }

            if p == 0 {
                String::new()
            } else {
                format!("{fraction:0p$x}")
            }
        }
        Some(p) => format!("{fraction:013x}{}", "0".repeat(p - MANTISSA_HEX_DIGITS)),
        None => format!("{fraction:013x}").trim_end_matches('0').to_owned(),
    };

    let point = if digits.is_empty() && !alt { "" } else { "." };
    let exp_sign = if exponent < 0 { '-' } else { '+' };
    format!("{lead}{point}{digits}p{exp_sign}{}", exponent.unsigned_abs())
}
