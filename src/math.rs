//! Elementary functions on posit8_2.
//!
//! Everything here is evaluated in `f32` and rounded back once. NaR enters as
//! NaN and NaN comes back as NaR, so unary functions propagate NaR for free.

use std::f32::consts::{LN_2, PI};

use crate::{
    fenv::{self, FpEnv, FpExceptions},
    number_representations::posit::posit8_2::Posit8_2,
};

#[inline]
fn p(value: f32) -> Posit8_2 {
    <Posit8_2 as From<f32>>::from(value)
}

#[inline]
fn f(value: Posit8_2) -> f32 {
    value.into()
}

#[inline]
fn unary(a: Posit8_2, op: impl FnOnce(f32) -> f32) -> Posit8_2 {
    p(op(f(a)))
}

/// Raises INVALID for a NaN made from real operands and OVERFLOW for an
/// infinity made from finite ones, the way the FPU would have.
fn flag_result(out: f32, x: f32, y: f32) {
    if out.is_nan() && !x.is_nan() && !y.is_nan() {
        fenv::raise(FpExceptions::INVALID);
    } else if out.is_infinite() && x.is_finite() && y.is_finite() {
        fenv::raise(FpExceptions::OVERFLOW);
    }
}

fn binary(a: Posit8_2, b: Posit8_2, op: impl FnOnce(f32, f32) -> f32) -> Posit8_2 {
    let (x, y) = (f(a), f(b));
    let out = op(x, y);
    flag_result(out, x, y);
    p(out)
}

/// Runs `op` with the exception flags it raises discarded.
pub fn quietly<T>(op: impl FnOnce() -> T) -> T {
    let _env = FpEnv::hold();
    op()
}

/// Python `divmod` on floats: floor quotient and a remainder with the sign of
/// the divisor. A zero divisor gives NaN for both.
pub fn divmod_f32(a: f32, b: f32) -> (f32, f32) {
    if b == 0.0 {
        return (f32::NAN, f32::NAN);
    }
    let mut rem = a % b;
    let mut div = (a - rem) / b;
    if rem != 0.0 {
        if (b < 0.0) != (rem < 0.0) {
            rem += b;
            div -= 1.0;
        }
    } else {
        rem = 0.0_f32.copysign(b);
    }

    let floordiv = if div != 0.0 {
        let floor = div.floor();
        if div - floor > 0.5 { floor + 1.0 } else { floor }
    } else {
        0.0_f32.copysign(a / b)
    };
    (floordiv, rem)
}

pub fn floor_divide(a: Posit8_2, b: Posit8_2) -> Posit8_2 {
    binary(a, b, |x, y| divmod_f32(x, y).0)
}

pub fn remainder(a: Posit8_2, b: Posit8_2) -> Posit8_2 {
    binary(a, b, |x, y| divmod_f32(x, y).1)
}

pub fn divmod(a: Posit8_2, b: Posit8_2) -> (Posit8_2, Posit8_2) {
    let (x, y) = (f(a), f(b));
    let (div, rem) = divmod_f32(x, y);
    flag_result(div, x, y);
    (p(div), p(rem))
}

pub fn fmod(a: Posit8_2, b: Posit8_2) -> Posit8_2 {
    binary(a, b, |x, y| x % y)
}

pub fn power(a: Posit8_2, b: Posit8_2) -> Posit8_2 {
    binary(a, b, f32::powf)
}

pub fn logaddexp(a: Posit8_2, b: Posit8_2) -> Posit8_2 {
    binary(a, b, |x, y| {
        if x == y {
            x + LN_2
        } else if x > y {
            x + (y - x).exp().ln_1p()
        } else if x < y {
            y + (x - y).exp().ln_1p()
        } else {
            f32::NAN
        }
    })
}

pub fn logaddexp2(a: Posit8_2, b: Posit8_2) -> Posit8_2 {
    binary(a, b, |x, y| {
        if x == y {
            x + 1.0
        } else if x > y {
            x + (y - x).exp2().ln_1p() / LN_2
        } else if x < y {
            y + (x - y).exp2().ln_1p() / LN_2
        } else {
            f32::NAN
        }
    })
}

pub fn arctan2(a: Posit8_2, b: Posit8_2) -> Posit8_2 {
    binary(a, b, f32::atan2)
}

pub fn hypot(a: Posit8_2, b: Posit8_2) -> Posit8_2 {
    binary(a, b, f32::hypot)
}

pub fn copysign(a: Posit8_2, b: Posit8_2) -> Posit8_2 {
    binary(a, b, f32::copysign)
}

/// 0 for negative `x`, 1 for positive `x`, `h0` at zero, NaR for NaR.
pub fn heaviside(x: Posit8_2, h0: Posit8_2) -> Posit8_2 {
    let fx = f(x);
    if fx.is_nan() {
        x
    } else if fx < 0.0 {
        Posit8_2::ZERO
    } else if fx > 0.0 {
        Posit8_2::ONE
    } else {
        h0
    }
}

pub fn maximum(a: Posit8_2, b: Posit8_2) -> Posit8_2 {
    let (fa, fb) = (f(a), f(b));
    if fa.is_nan() || fa > fb { a } else { b }
}

pub fn minimum(a: Posit8_2, b: Posit8_2) -> Posit8_2 {
    let (fa, fb) = (f(a), f(b));
    if fa.is_nan() || fa < fb { a } else { b }
}

pub fn fmax(a: Posit8_2, b: Posit8_2) -> Posit8_2 {
    let (fa, fb) = (f(a), f(b));
    if fb.is_nan() || fa > fb { a } else { b }
}

pub fn fmin(a: Posit8_2, b: Posit8_2) -> Posit8_2 {
    let (fa, fb) = (f(a), f(b));
    if fb.is_nan() || fa < fb { a } else { b }
}

pub fn positive(a: Posit8_2) -> Posit8_2 {
    a
}

pub fn conjugate(a: Posit8_2) -> Posit8_2 {
    a
}

pub fn absolute(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::abs)
}

pub fn rint(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::round_ties_even)
}

pub fn sign(a: Posit8_2) -> Posit8_2 {
    let fa = f(a);
    if fa < 0.0 {
        Posit8_2::NEG_ONE
    } else if fa > 0.0 {
        Posit8_2::ONE
    } else {
        a
    }
}

pub fn exp(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::exp)
}

pub fn exp2(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::exp2)
}

pub fn expm1(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::exp_m1)
}

pub fn log(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::ln)
}

pub fn log2(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::log2)
}

pub fn log10(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::log10)
}

pub fn log1p(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::ln_1p)
}

pub fn sqrt(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::sqrt)
}

pub fn square(a: Posit8_2) -> Posit8_2 {
    unary(a, |x| x * x)
}

pub fn cbrt(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::cbrt)
}

pub fn reciprocal(a: Posit8_2) -> Posit8_2 {
    unary(a, |x| 1.0 / x)
}

pub fn sin(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::sin)
}

pub fn cos(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::cos)
}

pub fn tan(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::tan)
}

pub fn arcsin(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::asin)
}

pub fn arccos(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::acos)
}

pub fn arctan(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::atan)
}

pub fn sinh(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::sinh)
}

pub fn cosh(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::cosh)
}

pub fn tanh(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::tanh)
}

pub fn arcsinh(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::asinh)
}

pub fn arccosh(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::acosh)
}

pub fn arctanh(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::atanh)
}

pub fn deg2rad(a: Posit8_2) -> Posit8_2 {
    unary(a, |x| x * (PI / 180.0))
}

pub fn rad2deg(a: Posit8_2) -> Posit8_2 {
    unary(a, |x| x * (180.0 / PI))
}

pub fn floor(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::floor)
}

pub fn ceil(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::ceil)
}

pub fn trunc(a: Posit8_2) -> Posit8_2 {
    unary(a, f32::trunc)
}

pub fn isfinite(a: Posit8_2) -> bool {
    !a.is_nar()
}

/// Posits have no infinities.
pub fn isinf(_a: Posit8_2) -> bool {
    false
}

pub fn isnan(a: Posit8_2) -> bool {
    a.is_nar()
}

pub fn signbit(a: Posit8_2) -> bool {
    a.is_negative()
}

/// `(fractional, integral)` parts, both with the sign of `a`.
pub fn modf(a: Posit8_2) -> (Posit8_2, Posit8_2) {
    let x = f(a);
    let integral = x.trunc();
    (p(x - integral), p(integral))
}

/// Splits `a` into a mantissa in [0.5, 1) and a power of two.
pub fn frexp(a: Posit8_2) -> (Posit8_2, i32) {
    let x = f(a);
    if x == 0.0 || !x.is_finite() {
        return (a, 0);
    }
    // Every posit<8,2> real is a normal f32.
    let bits = x.to_bits();
    let exponent = ((bits >> 23) & 0xFF) as i32 - 126;
    let mantissa = f32::from_bits((bits & !(0xFF << 23)) | (126 << 23));
    (p(mantissa), exponent)
}

pub fn ldexp(a: Posit8_2, exp: i32) -> Posit8_2 {
    let x = f(a);
    if x == 0.0 || !x.is_finite() {
        return a;
    }
    let out = (x as f64 * 2.0_f64.powi(exp.clamp(-1100, 1100))) as f32;
    flag_result(out, x, 0.0);
    p(out)
}

/// The neighbour of `from` in the direction of `to`.
///
/// Stepping away from zero lands on the smallest magnitude with the sign of
/// `to`; every other step moves the two's-complement pattern by one.
pub fn next_after(from: Posit8_2, to: Posit8_2) -> Posit8_2 {
    if from.is_nar() || to.is_nar() {
        return Posit8_2::NAR;
    }
    if from.to_bits() == to.to_bits() {
        return to;
    }
    if from.is_zero() {
        return if to.is_negative() {
            -Posit8_2::MIN_POSITIVE
        } else {
            Posit8_2::MIN_POSITIVE
        };
    }
    let step: i8 = if (from.to_bits() as i8) < (to.to_bits() as i8) { 1 } else { -1 };
    Posit8_2::from_bits((from.to_bits() as i8).wrapping_add(step) as u8)
}
