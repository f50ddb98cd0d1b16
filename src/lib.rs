//! An 8-bit posit (es = 2) element type for a host numeric-array runtime.
//!
//! [`Posit8_2`] is the scalar. [`Posit8Registry`] installs it into anything
//! implementing [`ArrayRuntime`]: the type descriptor with its array hooks,
//! casts to and from every native type, and the vectorized ufunc loops.
//! [`InMemoryRuntime`] is a small host used by the tests, benches and demo.

pub mod codec;
pub mod config;
pub mod convert;
pub mod dtype;
pub mod error;
pub mod fenv;
pub mod hooks;
pub mod math;
pub mod number_representations;
pub mod registry;
pub mod runtime;
pub mod strided;
pub mod ufunc;

pub use config::RegistryConfig;
pub use dtype::{DType, Element, ElementKind};
pub use error::{ArithmeticError, CastError, ConfigError, InitError, RuntimeError, UfuncError};
pub use number_representations::Posit8_2;
pub use registry::{Posit8Registry, RegistryState};
pub use runtime::{ArrayRuntime, HostArray, InMemoryRuntime};

/// Registers posit8_2 with default settings.
pub fn register_default<R>(runtime: &mut R) -> Result<DType, InitError>
where
    R: ArrayRuntime + ?Sized,
{
    Posit8Registry::new(RegistryConfig::default()).ensure_registered(runtime)
}
