//! Format arguments.
//!
//! Arguments are converted to [`Arg`] before a format string is checked
//! against them. The conversion keeps enough of the source type (signedness,
//! bit width, type name) to validate specifiers and to report mismatches.

use std::any::type_name;

/// A value passed to `printf`, tagged with the kind of its source type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    /// A signed integer of `bits` width.
    Signed {
        value: i128,
        bits: u32,
        ty: &'static str,
    },
    /// An unsigned integer of `bits` width.
    Unsigned {
        value: u128,
        bits: u32,
        ty: &'static str,
    },
    /// A floating-point number, widened to `f64`.
    Float { value: f64, ty: &'static str },
    Char(char),
    Str(&'a str),
    /// A pointer's address.
    Pointer(usize),
}

impl Arg<'_> {
    /// Name of the source type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Signed { ty, .. } | Arg::Unsigned { ty, .. } | Arg::Float { ty, .. } => *ty,
            Arg::Char(_) => "char",
            Arg::Str(_) => "&str",
            Arg::Pointer(_) => "pointer",
        }
    }
}

/// Types that can be passed to `printf`.
///
/// Types without an impl (such as `bool`) are rejected at compile time.
pub trait ToArg {
    fn to_arg(&self) -> Arg<'_>;
}

impl<'a, T> From<&'a T> for Arg<'a>
where
    T: ToArg + ?Sized,
{
    fn from(value: &'a T) -> Self {
        value.to_arg()
    }
}

macro_rules! impl_to_arg_signed {
    ($($t:ty),*) => {
        $(
            impl ToArg for $t {
                fn to_arg(&self) -> Arg<'_> {
                    Arg::Signed {
                        value: i128::from(*self),
                        bits: <$t>::BITS,
                        ty: type_name::<$t>(),
                    }
                }
            }
        )*
    };
}

macro_rules! impl_to_arg_unsigned {
    ($($t:ty),*) => {
        $(
            impl ToArg for $t {
                fn to_arg(&self) -> Arg<'_> {
                    Arg::Unsigned {
                        value: u128::from(*self),
                        bits: <$t>::BITS,
                        ty: type_name::<$t>(),
                    }
                }
            }
        )*
    };
}

impl_to_arg_signed!(i8, i16, i32, i64, i128);
impl_to_arg_unsigned!(u8, u16, u32, u64, u128);

impl ToArg for isize {
    fn to_arg(&self) -> Arg<'_> {
        Arg::Signed {
            value: *self as i128,
            bits: isize::BITS,
            ty: type_name::<isize>(),
        }
    }
}

impl ToArg for usize {
    fn to_arg(&self) -> Arg<'_> {
        Arg::Unsigned {
            value: *self as u128,
            bits: usize::BITS,
            ty: type_name::<usize>(),
        }
    }
}

impl ToArg for f32 {
    fn to_arg(&self) -> Arg<'_> {
        Arg::Float {
            value: f64::from(*self),
            ty: type_name::<f32>(),
        }
    }
}

impl ToArg for f64 {
    fn to_arg(&self) -> Arg<'_> {
        Arg::Float {
            value: *self,
            ty: type_name::<f64>(),
        }
    }
}

impl ToArg for char {
    fn to_arg(&self) -> Arg<'_> {
        Arg::Char(*self)
    }
}

impl ToArg for str {
    fn to_arg(&self) -> Arg<'_> {
        Arg::Str(self)
    }
}

impl ToArg for String {
    fn to_arg(&self) -> Arg<'_> {
        Arg::Str(self)
    }
}

impl<T: ?Sized> ToArg for *const T {
    fn to_arg(&self) -> Arg<'_> {
        Arg::Pointer(self.cast::<()>() as usize)
    }
}

impl<T: ?Sized> ToArg for *mut T {
    fn to_arg(&self) -> Arg<'_> {
        Arg::Pointer(self.cast::<()>() as usize)
    }
}

impl<T> ToArg for &T
where
    T: ToArg + ?Sized,
{
    fn to_arg(&self) -> Arg<'_> {
        (**self).to_arg()
    }
}
