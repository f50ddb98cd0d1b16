use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, Sub, SubAssign},
};

use ndarray::ScalarOperand;
use num_traits::{Num, NumCast, One, ToPrimitive, Zero};

use crate::{
    fenv::{self, FpExceptions},
    number_representations::posit::core::{DecodedPosit8, FIXED_POINT, Posit, UnpackedPosit8},
};

/// An 8-bit posit with two exponent bits.
///
/// Every byte pattern is a valid value: `0x00` is zero, `0x80` is NaR
/// (Not-a-Real), and the remaining 254 patterns are reals ordered like
/// two's-complement signed bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Posit8_2 {
    bits: u8,
}

impl Posit<8, 2> for Posit8_2 {}

impl Posit8_2 {
    pub const ZERO: Self = Posit8_2 { bits: 0 };
    pub const NAR: Self = Posit8_2 {
        bits: 1 << (Self::N - 1),
    };
    pub const ONE: Self = Posit8_2 { bits: 0x40 };
    pub const NEG_ONE: Self = Posit8_2 { bits: 0xC0 };
    /// maxpos = 16^6 = 2^24
    pub const MAX: Self = Posit8_2 { bits: 0x7F };
    /// -maxpos
    pub const MIN: Self = Posit8_2 { bits: 0x81 };
    /// minpos = 2^-24
    pub const MIN_POSITIVE: Self = Posit8_2 { bits: 0x01 };

    const MAX_SCALE: i32 = Self::MAX_K * (1 << Self::ES);

    pub const fn new(bits: u8) -> Self {
        Posit8_2 { bits }
    }

    pub const fn from_bits(bits: u8) -> Self {
        Posit8_2 { bits }
    }

    pub const fn to_bits(self) -> u8 {
        self.bits
    }

    pub const fn from_bytes(bytes: [u8; 1]) -> Self {
        Posit8_2 { bits: bytes[0] }
    }

    pub const fn to_bytes(self) -> [u8; 1] {
        [self.bits]
    }

    pub const fn is_nar(self) -> bool {
        self.bits == Self::NAR.bits
    }

    pub const fn is_zero(self) -> bool {
        self.bits == Self::ZERO.bits
    }

    /// True for negative reals. NaR is not negative.
    pub const fn is_negative(self) -> bool {
        (self.bits as i8) < 0 && !self.is_nar()
    }

    pub(crate) fn decode(&self) -> DecodedPosit8 {
        if self.bits == Self::ZERO.bits {
            return DecodedPosit8::ZERO;
        }
        if self.bits == Self::NAR.bits {
            return DecodedPosit8::NAR;
        }

        let sign = self.bits >> 7 == 1;
        let abs_bits = if sign {
            self.bits.wrapping_neg()
        } else {
            self.bits
        };

        let body = abs_bits << 1;

        let k: i32;
        let regime_len: u32;

        if body >> 7 == 1 {
            let num_ones = body.leading_ones();
            k = num_ones as i32 - 1;
            // A full run of ones has no terminating bit.
            regime_len = std::cmp::min(num_ones + 1, 7);
        } else {
            let num_zeros = body.leading_zeros();
            k = -(num_zeros as i32);
            regime_len = num_zeros + 1;
        }

        let remaining_len = 7 - regime_len;
        let es_len = std::cmp::min(Self::ES as u32, remaining_len);
        let frac_len = remaining_len - es_len;

        let exp_frac_bits = if remaining_len > 0 {
            (body << regime_len) >> (8 - remaining_len)
        } else {
            0
        };

        // Exponent bits cut off by the regime are implicitly zero.
        let es_val = ((exp_frac_bits >> frac_len) as i32) << (Self::ES as u32 - es_len);
        let frac_bits = (exp_frac_bits as u32) & ((1u32 << frac_len) - 1);

        DecodedPosit8 {
            is_nar: false,
            is_zero: false,
            sign,
            scale: k * (1 << Self::ES) + es_val,
            mantissa: (1u32 << frac_len) | frac_bits,
            frac_len,
        }
    }

    /// Rounds `mantissa * 2^scale` to the nearest posit, ties to even.
    ///
    /// Magnitudes above maxpos saturate (raising OVERFLOW) and nonzero
    /// magnitudes below minpos become minpos (raising UNDERFLOW); rounding
    /// never produces zero or NaR.
    pub(crate) fn encode(unpacked: UnpackedPosit8) -> Self {
        if unpacked.mantissa == 0 && !unpacked.sticky {
            return Self::ZERO;
        }
        if unpacked.mantissa == 0 {
            fenv::raise(FpExceptions::UNDERFLOW);
            return Self::apply_sign(Self::MIN_POSITIVE.bits, unpacked.sign);
        }

        // STEP 1: NORMALIZE
        let msb_pos = 63 - unpacked.mantissa.leading_zeros() as i32;
        let final_scale = unpacked.scale + msb_pos;
        // Fraction bits below the hidden one, left aligned.
        let frac = (unpacked.mantissa << (63 - msb_pos)) << 1;

        if final_scale >= Self::MAX_SCALE {
            if final_scale > Self::MAX_SCALE || frac != 0 || unpacked.sticky {
                fenv::raise(FpExceptions::OVERFLOW);
            }
            return Self::apply_sign(Self::MAX.bits, unpacked.sign);
        }
        if final_scale < -Self::MAX_SCALE {
            fenv::raise(FpExceptions::UNDERFLOW);
            return Self::apply_sign(Self::MIN_POSITIVE.bits, unpacked.sign);
        }

        // STEP 2: CALCULATE POSIT COMPONENTS
        let useed_power = 1 << Self::ES;
        let k = final_scale.div_euclid(useed_power);
        let es_val = final_scale.rem_euclid(useed_power) as u128;

        let (regime_bits, regime_len): (u128, u32) = if k >= 0 {
            (((1u128 << (k + 1)) - 1) << 1, k as u32 + 2)
        } else {
            (1, (-k) as u32 + 1)
        };

        // Lay the whole bit string out from the top of a 128-bit word so the
        // first 7 bits are the body and everything below drives rounding.
        let es_shift = 128 - regime_len - Self::ES as u32;
        let string = (regime_bits << (128 - regime_len))
            | (es_val << es_shift)
            | ((frac as u128) << (es_shift - 64));

        // STEP 3: PERFORM ROUNDING
        let mut body = (string >> 121) as u8;
        let guard = (string >> 120) & 1 == 1;
        let sticky = string & ((1u128 << 120) - 1) != 0 || unpacked.sticky;
        if guard && (sticky || body & 1 == 1) {
            body += 1;
        }

        Self::apply_sign(body, unpacked.sign)
    }

    fn apply_sign(body: u8, sign: bool) -> Self {
        if sign {
            Self::new(body.wrapping_neg())
        } else {
            Self::new(body)
        }
    }

    pub fn abs(self) -> Self {
        if self.is_negative() { -self } else { self }
    }

    /// Ordering usable for sorting: NaR sorts above every real and equals itself.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        let key = |p: &Self| {
            if p.is_nar() {
                i16::MAX
            } else {
                p.bits as i8 as i16
            }
        };
        key(self).cmp(&key(other))
    }
}

impl From<f64> for Posit8_2 {
    fn from(value: f64) -> Self {
        if value == 0.0 {
            return Self::ZERO;
        }
        if value.is_nan() || value.is_infinite() {
            return Self::NAR;
        }

        let input_bits = value.to_bits();
        let sign = input_bits >> 63 == 1;
        let exp_field = ((input_bits >> 52) & 0x7FF) as i32;
        let frac = input_bits & ((1u64 << 52) - 1);

        let (mantissa, scale) = if exp_field == 0 {
            (frac, -1074)
        } else {
            (frac | (1u64 << 52), exp_field - 1075)
        };

        Self::encode(UnpackedPosit8 {
            sign,
            scale,
            mantissa,
            sticky: false,
        })
    }
}

impl From<f32> for Posit8_2 {
    fn from(value: f32) -> Self {
        // f32 -> f64 is exact, so this rounds only once.
        <Self as From<f64>>::from(value as f64)
    }
}

impl From<Posit8_2> for f64 {
    fn from(p: Posit8_2) -> Self {
        let decoded = p.decode();

        if decoded.is_zero {
            return 0.0;
        }
        if decoded.is_nar {
            return f64::NAN;
        }

        let magnitude =
            decoded.mantissa as f64 * 2.0f64.powi(decoded.scale - decoded.frac_len as i32);
        if decoded.sign { -magnitude } else { magnitude }
    }
}

impl From<Posit8_2> for f32 {
    fn from(p: Posit8_2) -> Self {
        // Every posit<8,2> value fits an f32 exactly.
        <f64 as From<Posit8_2>>::from(p) as f32
    }
}

impl Add for Posit8_2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let p1 = self.decode();
        let p2 = rhs.decode();

        if p1.is_nar || p2.is_nar {
            return Self::NAR;
        }
        if p1.is_zero {
            return rhs;
        }
        if p2.is_zero {
            return self;
        }

        // Both operands are exact in the fixed-point domain, so the sum is too.
        let sum = p1.to_fixed() + p2.to_fixed();
        if sum == 0 {
            return Self::ZERO;
        }

        Self::encode(UnpackedPosit8 {
            sign: sum < 0,
            scale: -FIXED_POINT,
            mantissa: sum.unsigned_abs(),
            sticky: false,
        })
    }
}

impl Sub for Posit8_2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl Mul for Posit8_2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let p1 = self.decode();
        let p2 = rhs.decode();

        if p1.is_nar || p2.is_nar {
            return Self::NAR;
        }
        if p1.is_zero || p2.is_zero {
            return Self::ZERO;
        }

        let result_scale =
            p1.scale + p2.scale - p1.frac_len as i32 - p2.frac_len as i32;
        let result_mant = p1.mantissa as u64 * p2.mantissa as u64;

        Self::encode(UnpackedPosit8 {
            sign: p1.sign ^ p2.sign,
            scale: result_scale,
            mantissa: result_mant,
            sticky: false,
        })
    }
}

impl Div for Posit8_2 {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        let p1 = self.decode();
        let p2 = rhs.decode();

        if p1.is_nar || p2.is_nar {
            return Self::NAR;
        }
        if p2.is_zero {
            if p1.is_zero {
                fenv::raise(FpExceptions::INVALID);
            } else {
                fenv::raise(FpExceptions::DIVIDE_BY_ZERO);
            }
            return Self::NAR;
        }
        if p1.is_zero {
            return Self::ZERO;
        }

        const PRE_SHIFT: i32 = 40;
        let dividend = (p1.mantissa as u64) << PRE_SHIFT;
        let divisor = p2.mantissa as u64;
        let result_scale = (p1.scale - p1.frac_len as i32)
            - (p2.scale - p2.frac_len as i32)
            - PRE_SHIFT;

        Self::encode(UnpackedPosit8 {
            sign: p1.sign ^ p2.sign,
            scale: result_scale,
            mantissa: dividend / divisor,
            sticky: dividend % divisor != 0,
        })
    }
}

/// Truncated remainder, with the sign of the dividend (C `fmod`).
impl Rem for Posit8_2 {
    type Output = Self;

    fn rem(self, rhs: Self) -> Self::Output {
        let p1 = self.decode();
        let p2 = rhs.decode();

        if p1.is_nar || p2.is_nar {
            return Self::NAR;
        }
        if p2.is_zero {
            fenv::raise(FpExceptions::INVALID);
            return Self::NAR;
        }
        if p1.is_zero {
            return Self::ZERO;
        }

        let remainder = p1.to_fixed() % p2.to_fixed();
        if remainder == 0 {
            return Self::ZERO;
        }

        Self::encode(UnpackedPosit8 {
            sign: remainder < 0,
            scale: -FIXED_POINT,
            mantissa: remainder.unsigned_abs(),
            sticky: false,
        })
    }
}

impl Neg for Posit8_2 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        // Zero and NaR are their own two's complement.
        Self::new(self.bits.wrapping_neg())
    }
}

impl AddAssign for Posit8_2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Posit8_2 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Posit8_2 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Posit8_2 {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl PartialEq for Posit8_2 {
    fn eq(&self, other: &Self) -> bool {
        if self.is_nar() || other.is_nar() {
            return false;
        }
        self.bits == other.bits
    }
}

impl PartialOrd for Posit8_2 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nar() || other.is_nar() {
            return None;
        }
        (self.bits as i8).partial_cmp(&(other.bits as i8))
    }
}

impl fmt::Display for Posit8_2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val: f32 = (*self).into();
        fmt::Display::fmt(&val, f)
    }
}

impl NumCast for Posit8_2 {
    fn from<T: ToPrimitive>(n: T) -> Option<Self> {
        n.to_f64().map(<Posit8_2 as From<f64>>::from)
    }
}

impl Zero for Posit8_2 {
    fn zero() -> Self {
        Posit8_2::ZERO
    }
    fn is_zero(&self) -> bool {
        self.bits == Posit8_2::ZERO.bits
    }
}

impl One for Posit8_2 {
    fn one() -> Self {
        Posit8_2::ONE
    }
}

impl Num for Posit8_2 {
    type FromStrRadixErr = <f64 as Num>::FromStrRadixErr;
    fn from_str_radix(s: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
        f64::from_str_radix(s, radix).map(<Posit8_2 as From<f64>>::from)
    }
}

impl ToPrimitive for Posit8_2 {
    fn to_i64(&self) -> Option<i64> {
        <f32 as From<Posit8_2>>::from(*self).to_i64()
    }

    fn to_u64(&self) -> Option<u64> {
        <f32 as From<Posit8_2>>::from(*self).to_u64()
    }

    fn to_f32(&self) -> Option<f32> {
        Some(<f32 as From<Posit8_2>>::from(*self))
    }

    fn to_f64(&self) -> Option<f64> {
        Some(<f64 as From<Posit8_2>>::from(*self))
    }
}

impl ScalarOperand for Posit8_2 {}
