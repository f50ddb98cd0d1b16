//! Conversion between host scalars, native numbers and posit8_2.

use half::f16;

use crate::{
    codec,
    dtype::{DType, Element},
    error::CastError,
    number_representations::{NativeScalar, posit::posit8_2::Posit8_2},
    runtime::CastFn,
};

/// A boxed value as the host scripting layer sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum HostScalar {
    None,
    Bool(bool),
    /// Host integers are unbounded; only values that fit an `i64` convert.
    Int(i128),
    Float(f64),
    Float16(f16),
    Float32(f32),
    Float64(f64),
    Posit8(Posit8_2),
    Str(String),
    /// A zero-dimensional array holding one element of `dtype`.
    ZeroDim { dtype: DType, bytes: Vec<u8> },
    /// A contiguous one-dimensional array.
    Array { dtype: DType, bytes: Vec<u8> },
}

impl HostScalar {
    pub fn type_name(&self) -> String {
        match self {
            HostScalar::None => "NoneType".to_string(),
            HostScalar::Bool(_) => "bool".to_string(),
            HostScalar::Int(_) => "int".to_string(),
            HostScalar::Float(_) => "float".to_string(),
            HostScalar::Float16(_) => "float16".to_string(),
            HostScalar::Float32(_) => "float32".to_string(),
            HostScalar::Float64(_) => "float64".to_string(),
            HostScalar::Posit8(_) => "posit8_2".to_string(),
            HostScalar::Str(_) => "str".to_string(),
            HostScalar::ZeroDim { .. } | HostScalar::Array { .. } => "ndarray".to_string(),
        }
    }
}

/// Read access to the runtime's cast table.
pub trait CastLookup {
    fn cast_function(&self, from: DType, to: DType) -> Option<CastFn>;

    /// Element size of `dtype`. Only native types are known by default.
    fn element_size(&self, dtype: DType) -> Option<usize> {
        dtype.itemsize()
    }
}

/// What a conversion needs to know about its surroundings: where to find
/// registered casts and which type number posit8_2 was given.
#[derive(Clone, Copy)]
pub struct CastContext<'a> {
    pub lookup: &'a dyn CastLookup,
    pub posit: DType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CastPolicy {
    /// Reject finite values outside [minpos, maxpos] instead of saturating.
    pub check_overflow: bool,
}

const MAXPOS: f64 = 16_777_216.0;
const MINPOS: f64 = 1.0 / 16_777_216.0;

fn checked(value: f64, policy: CastPolicy) -> Result<f64, CastError> {
    let magnitude = value.abs();
    if policy.check_overflow
        && value.is_finite()
        && (magnitude > MAXPOS || (value != 0.0 && magnitude < MINPOS))
    {
        return Err(CastError::Overflow(value));
    }
    Ok(value)
}

fn element_size(dtype: DType, ctx: CastContext<'_>) -> Result<usize, CastError> {
    if dtype == ctx.posit {
        return Ok(<Posit8_2 as Element>::SIZE);
    }
    ctx.lookup
        .element_size(dtype)
        .ok_or(CastError::NoCastPath { from: dtype })
}

/// Converts `input` to posit8_2.
///
/// Out of range values saturate unless `policy.check_overflow` is set. A
/// zero-dimensional array of another type goes through the cast the runtime
/// has registered towards posit8_2.
pub fn cast_to_posit8(
    input: &HostScalar,
    ctx: CastContext<'_>,
    policy: CastPolicy,
) -> Result<Posit8_2, CastError> {
    match input {
        HostScalar::Posit8(value) => Ok(*value),
        HostScalar::Float(value) | HostScalar::Float64(value) => {
            checked(*value, policy).map(|v| v.to_posit8())
        }
        HostScalar::Float32(value) => {
            checked(*value as f64, policy).map(|_| value.to_posit8())
        }
        HostScalar::Float16(value) => {
            checked(value.to_f64(), policy).map(|_| value.to_posit8())
        }
        HostScalar::Bool(value) => Ok(value.to_posit8()),
        HostScalar::Int(value) => {
            let Ok(long) = i64::try_from(*value) else {
                return Err(CastError::NotCoercible {
                    type_name: input.type_name(),
                });
            };
            checked(long as f64, policy).map(|_| long.to_posit8())
        }
        HostScalar::ZeroDim { dtype, bytes } => {
            let itemsize = element_size(*dtype, ctx)?;
            if bytes.len() != itemsize {
                return Err(CastError::ShortBuffer {
                    dtype: *dtype,
                    len: bytes.len(),
                    itemsize,
                });
            }
            if *dtype == ctx.posit {
                return Ok(codec::decode(bytes[0]));
            }
            let cast = ctx
                .lookup
                .cast_function(*dtype, ctx.posit)
                .ok_or(CastError::NoCastPath { from: *dtype })?;
            let mut out = [0u8; 1];
            cast(bytes, &mut out, 1);
            Ok(codec::decode(out[0]))
        }
        HostScalar::None | HostScalar::Str(_) | HostScalar::Array { .. } => {
            Err(CastError::NotCoercible {
                type_name: input.type_name(),
            })
        }
    }
}

pub fn to_native<T: NativeScalar>(value: Posit8_2) -> T {
    T::from_posit8(value)
}

/// Typed conversion used by the array cast loops.
pub trait Convert<To> {
    fn convert(self) -> To;
}

impl<T: NativeScalar> Convert<Posit8_2> for T {
    fn convert(self) -> Posit8_2 {
        self.to_posit8()
    }
}

impl<T: NativeScalar> Convert<T> for Posit8_2 {
    fn convert(self) -> T {
        T::from_posit8(self)
    }
}

/// Cast loop over `n` contiguous elements.
pub fn cast_loop<From, To>(from: &[u8], to: &mut [u8], n: usize)
where
    From: Element + Convert<To>,
    To: Element,
{
    let sources = from.chunks_exact(From::SIZE);
    let targets = to.chunks_exact_mut(To::SIZE);
    for (src, dst) in sources.zip(targets).take(n) {
        From::load(src).convert().store(dst);
    }
}

// "2.5e0" -> "2.5e+00": explicit sign, at least two exponent digits.
fn host_exponent(formatted: &str) -> String {
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted.to_string();
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

impl Posit8_2 {
    /// Scalar constructor as exposed to the host: `posit8_2(x)`.
    ///
    /// Arrays are cast element-wise and come back as posit8_2 arrays; every
    /// other accepted input comes back as a scalar, checked against `policy`.
    pub fn construct(
        args: &[HostScalar],
        kwargs: &[(String, HostScalar)],
        ctx: CastContext<'_>,
        policy: CastPolicy,
    ) -> Result<HostScalar, CastError> {
        if !kwargs.is_empty() {
            return Err(CastError::UnexpectedKeywords);
        }
        let [arg] = args else {
            return Err(CastError::WrongArity(args.len()));
        };

        if let HostScalar::Array { dtype, bytes } = arg {
            if *dtype == ctx.posit {
                return Ok(arg.clone());
            }
            let cast = ctx
                .lookup
                .cast_function(*dtype, ctx.posit)
                .ok_or(CastError::NoCastPath { from: *dtype })?;
            let itemsize = element_size(*dtype, ctx)?;
            if itemsize == 0 || bytes.len() % itemsize != 0 {
                return Err(CastError::ShortBuffer {
                    dtype: *dtype,
                    len: bytes.len(),
                    itemsize,
                });
            }
            let n = bytes.len() / itemsize;
            let mut out = vec![0u8; n];
            cast(bytes, &mut out, n);
            return Ok(HostScalar::Array {
                dtype: ctx.posit,
                bytes: out,
            });
        }

        cast_to_posit8(arg, ctx, policy).map(HostScalar::Posit8)
    }

    /// `"%f"` of the nearest `f32`.
    pub fn repr(&self) -> String {
        if self.is_nar() {
            return "nan".to_string();
        }
        format!("{:.6}", f32::from(*self))
    }

    /// Formats the `f32` value with a host format spec such as `".2"`,
    /// `"e"` or `">8.3"`. Unknown specs fall back to `repr`.
    pub fn format(&self, spec: &str) -> String {
        let value = f32::from(*self);
        let (align, rest) = match spec.chars().next() {
            Some(c @ ('<' | '>' | '^')) => (Some(c), &spec[1..]),
            _ => (None, spec),
        };
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (width_str, rest) = rest.split_at(digits);
        let width = width_str.parse::<usize>().unwrap_or(0);
        let (precision, kind) = match rest.strip_prefix('.') {
            Some(p) => {
                let digits = p.find(|c: char| !c.is_ascii_digit()).unwrap_or(p.len());
                (p[..digits].parse::<usize>().ok(), &p[digits..])
            }
            None => (None, rest),
        };
        let body = match (kind, precision) {
            ("" | "f", Some(p)) => format!("{:.*}", p, value),
            ("f", None) => format!("{:.6}", value),
            ("e", Some(p)) => host_exponent(&format!("{:.*e}", p, value)),
            ("e", None) => host_exponent(&format!("{:.6e}", value)),
            ("", None) => format!("{}", value),
            _ => return self.repr(),
        };
        match align {
            Some('<') => format!("{:<width$}", body),
            Some('^') => format!("{:^width$}", body),
            _ => format!("{:>width$}", body),
        }
    }

    /// Identity hash: the raw storage byte. Each value has one encoding.
    pub fn host_hash(&self) -> i64 {
        codec::encode(*self) as i64
    }

    /// `int(x)`: truncates through `f32`. NaR gives 0.
    pub fn to_host_int(&self) -> i64 {
        f32::from(*self) as i64
    }

    pub fn to_host_float(&self) -> f64 {
        f64::from(*self)
    }
}
