//! Arity Adaptation
//!
//! A signal declares a fixed parameter list, written as a tuple `Args`. A slot
//! may be interested in fewer arguments than that: a `Fn()` handler is allowed
//! on a three-argument signal, and so is a `Fn(A0, A1)`. The traits in this
//! module decide, at compile time, how many leading arguments a callable
//! accepts and forward exactly that prefix.
//!
//! # How It Works
//!
//! [`Handler`] and [`Method`] are implemented once for every pair
//! `(signal arity S, callable arity D)` with `D <= S`. The pairs are kept apart
//! by a `Marker` type parameter (the callable's own `fn` pointer type), so the
//! compiler picks the single impl whose `Fn` bound the callable satisfies.
//! A callable that accepts more parameters than the signal provides, or whose
//! parameter types do not match the signal's prefix, implements none of them
//! and is rejected where it is connected.
//!
//! Closure parameters must be annotated (`|x: i32| ..`) so that the
//! callable's arity is known before the impl is selected.
//!
//! Callables whose signature cannot be read this way can be wrapped in
//! [`Packed`]; they receive the whole argument tuple.

mod sealed {
    pub trait Sealed {}
}

/// An argument tuple a signal can be declared with.
///
/// Implemented for `()` and tuples of up to six elements.
pub trait ArgList: sealed::Sealed + 'static {
    /// Number of arguments in the tuple.
    const LEN: usize;
}

macro_rules! impl_arg_list {
    ($len:expr; $($A:ident),*) => {
        impl<$($A: 'static),*> sealed::Sealed for ($($A,)*) {}

        impl<$($A: 'static),*> ArgList for ($($A,)*) {
            const LEN: usize = $len;
        }
    };
}

impl_arg_list!(0;);
impl_arg_list!(1; A0);
impl_arg_list!(2; A0, A1);
impl_arg_list!(3; A0, A1, A2);
impl_arg_list!(4; A0, A1, A2, A3);
impl_arg_list!(5; A0, A1, A2, A3, A4);
impl_arg_list!(6; A0, A1, A2, A3, A4, A5);

/// A free callable that can be driven by a signal with arguments `Args`.
///
/// `Marker` only disambiguates impls and is inferred at the call site.
pub trait Handler<Args, R, Marker>: 'static {
    /// Number of leading arguments forwarded to the callable.
    const ARITY: usize;

    /// Invoke the callable with the prefix of `args` it accepts.
    fn call(&self, args: Args) -> R;
}

/// A callable invoked through a receiver `&T`, such as a method path
/// (`Counter::record`), driven by a signal with arguments `Args`.
pub trait Method<T, Args, R, Marker>: 'static {
    /// Number of leading arguments forwarded after the receiver.
    const ARITY: usize;

    /// Invoke the callable on `receiver` with the prefix of `args` it accepts.
    fn call(&self, receiver: &T, args: Args) -> R;
}

macro_rules! impl_adapters {
    ($arity:expr; [$($A:ident $a:ident),*] => [$($P:ident $p:ident),*]) => {
        impl<Func, Ret $(, $A)*> Handler<($($A,)*), Ret, fn($($P),*) -> Ret> for Func
        where
            Func: Fn($($P),*) -> Ret + 'static,
        {
            const ARITY: usize = $arity;

            #[allow(unused_variables)]
            #[inline]
            fn call(&self, args: ($($A,)*)) -> Ret {
                let ($($a,)*) = args;
                (self)($($p),*)
            }
        }

        impl<Func, Recv, Ret $(, $A)*> Method<Recv, ($($A,)*), Ret, fn(&Recv $(, $P)*) -> Ret> for Func
        where
            Func: Fn(&Recv $(, $P)*) -> Ret + 'static,
        {
            const ARITY: usize = $arity;

            #[allow(unused_variables)]
            #[inline]
            fn call(&self, receiver: &Recv, args: ($($A,)*)) -> Ret {
                let ($($a,)*) = args;
                (self)(receiver $(, $p)*)
            }
        }
    };
}

impl_adapters!(0; [] => []);

impl_adapters!(0; [A0 a0] => []);
impl_adapters!(1; [A0 a0] => [A0 a0]);

impl_adapters!(0; [A0 a0, A1 a1] => []);
impl_adapters!(1; [A0 a0, A1 a1] => [A0 a0]);
impl_adapters!(2; [A0 a0, A1 a1] => [A0 a0, A1 a1]);

impl_adapters!(0; [A0 a0, A1 a1, A2 a2] => []);
impl_adapters!(1; [A0 a0, A1 a1, A2 a2] => [A0 a0]);
impl_adapters!(2; [A0 a0, A1 a1, A2 a2] => [A0 a0, A1 a1]);
impl_adapters!(3; [A0 a0, A1 a1, A2 a2] => [A0 a0, A1 a1, A2 a2]);

impl_adapters!(0; [A0 a0, A1 a1, A2 a2, A3 a3] => []);
impl_adapters!(1; [A0 a0, A1 a1, A2 a2, A3 a3] => [A0 a0]);
impl_adapters!(2; [A0 a0, A1 a1, A2 a2, A3 a3] => [A0 a0, A1 a1]);
impl_adapters!(3; [A0 a0, A1 a1, A2 a2, A3 a3] => [A0 a0, A1 a1, A2 a2]);
impl_adapters!(4; [A0 a0, A1 a1, A2 a2, A3 a3] => [A0 a0, A1 a1, A2 a2, A3 a3]);

impl_adapters!(0; [A0 a0, A1 a1, A2 a2, A3 a3, A4 a4] => []);
impl_adapters!(1; [A0 a0, A1 a1, A2 a2, A3 a3, A4 a4] => [A0 a0]);
impl_adapters!(2; [A0 a0, A1 a1, A2 a2, A3 a3, A4 a4] => [A0 a0, A1 a1]);
impl_adapters!(3; [A0 a0, A1 a1, A2 a2, A3 a3, A4 a4] => [A0 a0, A1 a1, A2 a2]);
impl_adapters!(4; [A0 a0, A1 a1, A2 a2, A3 a3, A4 a4] => [A0 a0, A1 a1, A2 a2, A3 a3]);
impl_adapters!(5; [A0 a0, A1 a1, A2 a2, A3 a3, A4 a4] => [A0 a0, A1 a1, A2 a2, A3 a3, A4 a4]);

impl_adapters!(0; [A0 a0, A1 a1, A2 a2, A3 a3, A4 a4, A5 a5] => []);
impl_adapters!(1; [A0 a0, A1 a1, A2 a2, A3 a3, A4 a4, A5 a5] => [A0 a0]);
impl_adapters!(2; [A0 a0, A1 a1, A2 a2, A3 a3, A4 a4, A5 a5] => [A0 a0, A1 a1]);
impl_adapters!(3; [A0 a0, A1 a1, A2 a2, A3 a3, A4 a4, A5 a5] => [A0 a0, A1 a1, A2 a2]);
impl_adapters!(4; [A0 a0, A1 a1, A2 a2, A3 a3, A4 a4, A5 a5] => [A0 a0, A1 a1, A2 a2, A3 a3]);
impl_adapters!(5; [A0 a0, A1 a1, A2 a2, A3 a3, A4 a4, A5 a5] => [A0 a0, A1 a1, A2 a2, A3 a3, A4 a4]);
impl_adapters!(6; [A0 a0, A1 a1, A2 a2, A3 a3, A4 a4, A5 a5] => [A0 a0, A1 a1, A2 a2, A3 a3, A4 a4, A5 a5]);

/// Wrapper for a callable that takes the signal's whole argument tuple.
///
/// Use it when the callable's parameter list cannot be matched against a
/// prefix, e.g. a boxed `dyn Fn(Args) -> R` or a generic function object.
/// All `Args::LEN` arguments are forwarded.
///
/// `Packed` compares equal when the wrapped values do, so a packed fn pointer
/// can later be passed to `Signal::disconnect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Packed<F>(pub F);

/// Marker selecting the [`Packed`] impl of [`Handler`].
#[doc(hidden)]
pub struct PackedMarker;

impl<F, Args, R> Handler<Args, R, PackedMarker> for Packed<F>
where
    F: Fn(Args) -> R + 'static,
    Args: ArgList,
{
    const ARITY: usize = Args::LEN;

    #[inline]
    fn call(&self, args: Args) -> R {
        (self.0)(args)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn arity_of<Args, R, M, F: Handler<Args, R, M>>(_: &F) -> usize {
        F::ARITY
    }

    fn drive<Args, R, M, F: Handler<Args, R, M>>(f: &F, args: Args) -> R {
        f.call(args)
    }

    #[test]
    fn arg_list_lengths() {
        assert_eq!(<() as ArgList>::LEN, 0);
        assert_eq!(<(u8,) as ArgList>::LEN, 1);
        assert_eq!(<(u8, u16, u32) as ArgList>::LEN, 3);
        assert_eq!(<(u8, u8, u8, u8, u8, u8) as ArgList>::LEN, 6);
    }

    #[test]
    fn zero_arity_handler_ignores_all_arguments() {
        let seen = Rc::new(RefCell::new(0));
        let seen_clone = seen.clone();
        let handler = move || *seen_clone.borrow_mut() += 1;

        assert_eq!(arity_of::<(i32, i32, i32), (), _, _>(&handler), 0);
        drive::<(i32, i32, i32), (), _, _>(&handler, (1, 2, 3));
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn prefix_handler_receives_leading_arguments() {
        let handler = |a: i32, b: &'static str| format!("{a}-{b}");

        assert_eq!(arity_of::<(i32, &'static str, f64), String, _, _>(&handler), 2);
        let out = drive::<(i32, &'static str, f64), String, _, _>(&handler, (7, "x", 1.5));
        assert_eq!(out, "7-x");
    }

    #[test]
    fn full_arity_handler() {
        let handler = |a: u8, b: u8, c: u8| u32::from(a) + u32::from(b) + u32::from(c);
        assert_eq!(arity_of::<(u8, u8, u8), u32, _, _>(&handler), 3);
        assert_eq!(drive::<(u8, u8, u8), u32, _, _>(&handler, (1, 2, 3)), 6);
    }

    #[test]
    fn fn_pointer_is_a_handler() {
        fn double(x: i64) -> i64 {
            x * 2
        }
        let ptr: fn(i64) -> i64 = double;
        assert_eq!(drive::<(i64, bool), i64, _, _>(&ptr, (21, true)), 42);
    }

    #[test]
    fn packed_handler_receives_whole_tuple() {
        let handler = Packed(|(a, b): (i32, i32)| a * b);
        assert_eq!(arity_of::<(i32, i32), i32, _, _>(&handler), 2);
        assert_eq!(drive::<(i32, i32), i32, _, _>(&handler, (6, 7)), 42);
    }

    #[test]
    fn method_forwards_receiver_and_prefix() {
        struct Scale(i32);

        impl Scale {
            fn apply(&self, x: i32) -> i32 {
                self.0 * x
            }
        }

        fn call_method<T, Args, R, M, F: Method<T, Args, R, M>>(f: &F, t: &T, args: Args) -> R {
            f.call(t, args)
        }

        let scale = Scale(3);
        assert_eq!(
            <fn(&Scale, i32) -> i32 as Method<Scale, (i32, i32), i32, fn(&Scale, i32) -> i32>>::ARITY,
            1
        );
        assert_eq!(call_method::<_, (i32, i32), i32, _, _>(&Scale::apply, &scale, (5, 100)), 15);
    }
}
