pub trait Posit<const N: usize, const ES: usize> {
    const N: usize = N;
    const ES: usize = ES;
    const USEED: usize = 1 << (1 << ES);
    // Largest regime run that still fits in the N - 1 bits after the sign.
    const MAX_K: i32 = N as i32 - 2;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DecodedPosit8 {
    pub is_nar: bool,
    pub is_zero: bool,
    pub sign: bool,
    pub scale: i32,
    // Fraction with its implicit '1' bit at position `frac_len`.
    pub mantissa: u32,
    pub frac_len: u32,
}

impl DecodedPosit8 {
    pub const ZERO: Self = DecodedPosit8 {
        is_nar: false,
        is_zero: true,
        sign: false,
        scale: 0,
        mantissa: 0,
        frac_len: 0,
    };

    pub const NAR: Self = DecodedPosit8 {
        is_nar: true,
        is_zero: false,
        sign: false,
        scale: 0,
        mantissa: 0,
        frac_len: 0,
    };

    /// Magnitude as a fixed-point integer with `FIXED_POINT` fractional bits.
    ///
    /// Every posit<8,2> value is an integer multiple of 2^-27 and at most 2^24,
    /// so 28 fractional bits leave every value exact inside an `i64`.
    pub fn to_fixed(&self) -> i64 {
        if self.is_zero || self.is_nar {
            return 0;
        }
        let shift = self.scale - self.frac_len as i32 + FIXED_POINT;
        let magnitude = (self.mantissa as i64) << shift;
        if self.sign { -magnitude } else { magnitude }
    }
}

pub(crate) const FIXED_POINT: i32 = 28;

/// An unrounded intermediate result: `mantissa * 2^scale`, plus a sticky bit
/// recording that nonzero bits were already discarded below `mantissa`.
#[derive(Debug, Clone, Copy)]
pub struct UnpackedPosit8 {
    pub sign: bool,
    pub scale: i32,
    pub mantissa: u64,
    pub sticky: bool,
}
