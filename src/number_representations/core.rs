use std::fmt::Debug;

use crate::number_representations::posit::posit8_2::Posit8_2;

/// A native numeric type that posit8_2 values convert to and from.
///
/// Conversions never check range. Narrowing from posit8_2 goes through an
/// `f32` intermediate and then follows `as` semantics (saturating, NaN to 0
/// for integers).
pub trait NativeScalar: Copy + Debug + Send + Sync + 'static {
    fn to_posit8(self) -> Posit8_2;
    fn from_f32(value: f32) -> Self;
    /// Widened value, used only for range checks.
    fn to_f64(self) -> f64;

    fn from_posit8(value: Posit8_2) -> Self {
        Self::from_f32(value.into())
    }
}
