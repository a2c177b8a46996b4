//! Native numeric operations backing functions and operators.

use core::fmt;

/// Numeric operation implemented in Rust and invoked by compiled equations.
///
/// Implementations must be pure: the same arguments always produce the same output. This allows
/// a single operation to be shared by the symbol registry and any number of compiled evaluators,
/// which may be called concurrently.
pub trait NativeFn: Send + Sync + 'static {
    /// Number of arguments the operation expects, or `None` if it accepts any number.
    fn arity(&self) -> Option<usize>;

    /// Evaluates the operation. The caller is responsible for supplying the number of arguments
    /// matching [`arity()`](Self::arity); missing arguments are substituted with NaN.
    fn evaluate(&self, args: &[f64]) -> f64;
}

impl fmt::Debug for dyn NativeFn {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NativeFn")
            .field("arity", &self.arity())
            .finish()
    }
}

macro_rules! arity_fn {
    ($arity:literal, $name:ident => $($arg_name:ident : $t:ty),+) => {
        #[doc = concat!("Wrapper for a native operation taking exactly ", $arity, " argument(s).")]
        #[derive(Clone, Copy)]
        pub struct $name<F> {
            function: F,
        }

        impl<F> $name<F> {
            /// Creates a new wrapper.
            pub const fn new(function: F) -> Self {
                Self { function }
            }
        }

        impl<F> fmt::Debug for $name<F> {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter
                    .debug_struct(stringify!($name))
                    .field("arity", &$arity)
                    .finish_non_exhaustive()
            }
        }

        impl<F> NativeFn for $name<F>
        where
            F: Fn($($t,)+) -> f64 + Send + Sync + 'static,
        {
            fn arity(&self) -> Option<usize> {
                Some($arity)
            }

            fn evaluate(&self, args: &[f64]) -> f64 {
                let mut args_iter = args.iter().copied();
                $(
                    let $arg_name = args_iter.next().unwrap_or(f64::NAN);
                )+
                (self.function)($($arg_name,)+)
            }
        }
    };
}

arity_fn!(1, Unary => x: f64);
arity_fn!(2, Binary => x: f64, y: f64);
arity_fn!(3, Ternary => x: f64, y: f64, z: f64);

/// Wrapper for a native operation accepting any number of arguments.
#[derive(Clone, Copy)]
pub struct Variadic<F> {
    function: F,
}

impl<F> Variadic<F> {
    /// Creates a new wrapper.
    pub const fn new(function: F) -> Self {
        Self { function }
    }
}

impl<F> fmt::Debug for Variadic<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Variadic")
            .finish_non_exhaustive()
    }
}

impl<F> NativeFn for Variadic<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
{
    fn arity(&self) -> Option<usize> {
        None
    }

    fn evaluate(&self, args: &[f64]) -> f64 {
        (self.function)(args)
    }
}

/// Folds the arguments with `f64::min`. Returns NaN for an empty slice.
pub(crate) fn min(args: &[f64]) -> f64 {
    args.iter().copied().reduce(f64::min).unwrap_or(f64::NAN)
}

/// Folds the arguments with `f64::max`. Returns NaN for an empty slice.
pub(crate) fn max(args: &[f64]) -> f64 {
    args.iter().copied().reduce(f64::max).unwrap_or(f64::NAN)
}
