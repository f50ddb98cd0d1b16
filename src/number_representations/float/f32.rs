use crate::number_representations::{core::NativeScalar, posit::posit8_2::Posit8_2};

impl NativeScalar for f32 {
    fn to_posit8(self) -> Posit8_2 {
        <Posit8_2 as From<f32>>::from(self)
    }
    fn from_f32(value: f32) -> Self {
        value
    }
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl NativeScalar for f64 {
    fn to_posit8(self) -> Posit8_2 {
        <Posit8_2 as From<f64>>::from(self)
    }
    fn from_f32(value: f32) -> Self {
        value as f64
    }
    fn to_f64(self) -> f64 {
        self
    }
}
