//! Error types shared across the crate.

use thiserror::Error;

use crate::dtype::{DType, ElementKind};

/// Raised when a host value cannot be turned into a posit8_2.
///
/// All variants surface to the host as a `TypeError`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CastError {
    #[error("expected number, got {type_name}")]
    NotCoercible { type_name: String },

    #[error("constructor takes no keyword arguments")]
    UnexpectedKeywords,

    #[error("expected number as argument to posit8_2 constructor, got {0} arguments")]
    WrongArity(usize),

    #[error("no cast registered from {from} to posit8_2")]
    NoCastPath { from: DType },

    #[error("value {0} is out of posit8_2 range")]
    Overflow(f64),

    #[error("{dtype} data of {len} bytes is not a whole number of {itemsize}-byte elements")]
    ShortBuffer {
        dtype: DType,
        len: usize,
        itemsize: usize,
    },

    #[error("posit8_2 is not registered with the runtime")]
    Unregistered,
}

/// A floating-point exceptional condition observed during a vectorized batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("posit8_2 invalid")]
    Invalid,

    #[error("posit8_2 divide by zero")]
    DivideByZero,

    #[error("posit8_2 overflow")]
    Overflow,

    #[error("posit8_2 underflow")]
    Underflow,
}

/// Errors produced by the host runtime itself.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("type name {0:?} is already registered")]
    DuplicateTypeName(String),

    #[error("unknown dtype {0}")]
    UnknownType(DType),

    #[error("no ufunc named {0:?}")]
    UnknownUfunc(String),

    #[error("a loop for {name} with signature {signature:?} already exists")]
    DuplicateLoop { name: String, signature: Vec<DType> },

    #[error("ufunc {name} takes {nargs} arguments, loop takes {loop_args}")]
    ArityMismatch {
        name: String,
        nargs: usize,
        loop_args: usize,
    },

    #[error("cast from {from} to {to} is not registered")]
    NoCast { from: DType, to: DType },

    #[error("strided view reaches byte {position} of a {len}-byte buffer")]
    ViewOutOfBounds { position: isize, len: usize },

    #[error("buffer of {len} bytes cannot hold {count} elements of {dtype}")]
    BufferTooSmall { dtype: DType, len: usize, count: usize },

    #[error("{dtype} elements take {expected} bytes, buffer uses {got}")]
    ItemsizeMismatch {
        dtype: DType,
        expected: usize,
        got: usize,
    },
}

/// One-time registration failure. Fatal: the module must not load.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InitError {
    #[error("no ufunc named {0:?} in the host runtime")]
    UnknownUfunc(String),

    #[error("ufunc {name} takes {nargs} arguments, loop takes {loop_args}")]
    ArityMismatch {
        name: String,
        nargs: usize,
        loop_args: usize,
    },

    #[error("ufunc {name} has more than one loop for {signature:?}")]
    DuplicateLoop {
        name: String,
        signature: Vec<ElementKind>,
    },

    #[error("could not initialize posit8_2: {0}")]
    TypeCreation(#[source] RuntimeError),

    #[error("could not register cast {from} -> {to}: {source}")]
    CastRegistration {
        from: DType,
        to: DType,
        #[source]
        source: RuntimeError,
    },

    #[error("could not register loop for {name}: {source}")]
    LoopRegistration {
        name: String,
        #[source]
        source: RuntimeError,
    },
}

/// Failure of a single ufunc call dispatched through the runtime.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UfuncError {
    #[error("no ufunc named {0:?}")]
    UnknownUfunc(String),

    #[error("ufunc {name} takes {expected} operands, got {got}")]
    OperandCount {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("ufunc {name} has no loop for signature {signature:?}")]
    NoMatchingLoop { name: String, signature: Vec<DType> },

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
