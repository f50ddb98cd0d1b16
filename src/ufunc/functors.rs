//! Zero-sized functors bound to ufunc loops.

use crate::{
    math,
    number_representations::posit::posit8_2::Posit8_2,
    ufunc::{BinaryFunctor, BinaryFunctor2, UnaryFunctor, UnaryFunctor2},
};

type P8 = Posit8_2;

macro_rules! unary_functor {
    ($($name:ident => $func:path),* $(,)?) => {
        $(
            pub struct $name;

            impl UnaryFunctor<P8, P8> for $name {
                #[inline]
                fn call(a: P8) -> P8 {
                    $func(a)
                }
            }
        )*
    };
}

macro_rules! predicate_functor {
    ($($name:ident => $func:path),* $(,)?) => {
        $(
            pub struct $name;

            impl UnaryFunctor<P8, bool> for $name {
                #[inline]
                fn call(a: P8) -> bool {
                    $func(a)
                }
            }
        )*
    };
}

macro_rules! binary_functor {
    ($($name:ident => $func:path),* $(,)?) => {
        $(
            pub struct $name;

            impl BinaryFunctor<P8, P8, P8> for $name {
                #[inline]
                fn call(a: P8, b: P8) -> P8 {
                    $func(a, b)
                }
            }
        )*
    };
}

// The arithmetic operators also take a native float on either side; the
// native operand is rounded to posit8_2 first.
macro_rules! arithmetic_functor {
    ($($name:ident => $op:tt),* $(,)?) => {
        $(
            pub struct $name;

            impl BinaryFunctor<P8, P8, P8> for $name {
                #[inline]
                fn call(a: P8, b: P8) -> P8 {
                    a $op b
                }
            }

            arithmetic_functor!(@native $name, $op, f32, f64);
        )*
    };
    (@native $name:ident, $op:tt, $($native:ty),*) => {
        $(
            impl BinaryFunctor<P8, $native, P8> for $name {
                #[inline]
                fn call(a: P8, b: $native) -> P8 {
                    a $op P8::from(b)
                }
            }

            impl BinaryFunctor<$native, P8, P8> for $name {
                #[inline]
                fn call(a: $native, b: P8) -> P8 {
                    P8::from(a) $op b
                }
            }
        )*
    };
}

// Comparisons never signal: rounding the native operand may saturate, but
// that must not surface as an arithmetic error of the batch.
macro_rules! comparison_functor {
    ($($name:ident => $op:tt),* $(,)?) => {
        $(
            pub struct $name;

            impl BinaryFunctor<P8, P8, bool> for $name {
                #[inline]
                fn call(a: P8, b: P8) -> bool {
                    a $op b
                }
            }

            comparison_functor!(@native $name, $op, f32, f64);
        )*
    };
    (@native $name:ident, $op:tt, $($native:ty),*) => {
        $(
            impl BinaryFunctor<P8, $native, bool> for $name {
                #[inline]
                fn call(a: P8, b: $native) -> bool {
                    a $op math::quietly(|| P8::from(b))
                }
            }
        )*
    };
}

arithmetic_functor!(
    Add => +,
    Subtract => -,
    Multiply => *,
    TrueDivide => /,
);

comparison_functor!(
    Eq => ==,
    Ne => !=,
    Lt => <,
    Gt => >,
    Le => <=,
    Ge => >=,
);

binary_functor!(
    FloorDivide => math::floor_divide,
    Remainder => math::remainder,
    Fmod => math::fmod,
    Power => math::power,
    LogAddExp => math::logaddexp,
    LogAddExp2 => math::logaddexp2,
    Heaviside => math::heaviside,
    Arctan2 => math::arctan2,
    Hypot => math::hypot,
    CopySign => math::copysign,
    Maximum => math::maximum,
    Minimum => math::minimum,
    Fmax => math::fmax,
    Fmin => math::fmin,
    NextAfter => math::next_after,
);

unary_functor!(
    Negative => std::ops::Neg::neg,
    Positive => math::positive,
    Abs => math::absolute,
    Rint => math::rint,
    Sign => math::sign,
    Conjugate => math::conjugate,
    Exp => math::exp,
    Exp2 => math::exp2,
    Expm1 => math::expm1,
    Log => math::log,
    Log2 => math::log2,
    Log10 => math::log10,
    Log1p => math::log1p,
    Sqrt => math::sqrt,
    Square => math::square,
    Cbrt => math::cbrt,
    Reciprocal => math::reciprocal,
    Sin => math::sin,
    Cos => math::cos,
    Tan => math::tan,
    Arcsin => math::arcsin,
    Arccos => math::arccos,
    Arctan => math::arctan,
    Sinh => math::sinh,
    Cosh => math::cosh,
    Tanh => math::tanh,
    Arcsinh => math::arcsinh,
    Arccosh => math::arccosh,
    Arctanh => math::arctanh,
    Deg2rad => math::deg2rad,
    Rad2deg => math::rad2deg,
    Floor => math::floor,
    Ceil => math::ceil,
    Trunc => math::trunc,
);

predicate_functor!(
    IsFinite => math::isfinite,
    IsInf => math::isinf,
    IsNan => math::isnan,
    SignBit => math::signbit,
);

pub struct Divmod;

impl BinaryFunctor2<P8, P8, P8, P8> for Divmod {
    fn call(a: P8, b: P8) -> (P8, P8) {
        math::divmod(a, b)
    }
}

pub struct Modf;

impl UnaryFunctor2<P8, P8, P8> for Modf {
    fn call(a: P8) -> (P8, P8) {
        math::modf(a)
    }
}

pub struct Frexp;

impl UnaryFunctor2<P8, P8, i32> for Frexp {
    fn call(a: P8) -> (P8, i32) {
        math::frexp(a)
    }
}

pub struct Ldexp;

impl BinaryFunctor<P8, i32, P8> for Ldexp {
    fn call(a: P8, exp: i32) -> P8 {
        math::ldexp(a, exp)
    }
}
