use half::f16;

use crate::number_representations::{core::NativeScalar, posit::posit8_2::Posit8_2};

// f16 tops out at 65504 and bottoms out at 2^-24, so posits above 2^16
// become infinity on the way down and small ones may land on subnormals.
impl NativeScalar for f16 {
    fn to_posit8(self) -> Posit8_2 {
        <Posit8_2 as From<f32>>::from(self.to_f32())
    }
    fn from_f32(value: f32) -> Self {
        f16::from_f32(value)
    }
    fn to_f64(self) -> f64 {
        f16::to_f64(self)
    }
}
