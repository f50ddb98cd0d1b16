use crate::number_representations::{core::NativeScalar, posit::posit8_2::Posit8_2};

// Integers go through an f32 intermediate. Every integer that f32 cannot hold
// exactly is above 2^24 = maxpos, so the result is the same as rounding the
// integer directly: it saturates.
macro_rules! impl_native_int {
    ($($int:ty),*) => {
        $(
            impl NativeScalar for $int {
                fn to_posit8(self) -> Posit8_2 {
                    <Posit8_2 as From<f32>>::from(self as f32)
                }
                fn from_f32(value: f32) -> Self {
                    value as $int
                }
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_native_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl NativeScalar for bool {
    fn to_posit8(self) -> Posit8_2 {
        if self { Posit8_2::ONE } else { Posit8_2::ZERO }
    }
    fn from_f32(value: f32) -> Self {
        // NaN is truthy, as in C.
        value != 0.0
    }
    fn to_f64(self) -> f64 {
        if self { 1.0 } else { 0.0 }
    }
}
