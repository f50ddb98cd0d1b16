pub mod core;
pub mod int;

pub mod float {
    pub mod f16;
    pub mod f32;
}

pub mod posit {
    pub mod core;
    pub mod posit8_2;
}

pub use self::core::NativeScalar;
pub use self::posit::posit8_2::Posit8_2;
