//! Element types known to the host runtime and the descriptor posit8_2
//! registers with it.

use std::{cmp::Ordering, fmt};

use half::f16;

use crate::{
    codec,
    convert::{CastContext, HostScalar},
    error::CastError,
    number_representations::posit::posit8_2::Posit8_2,
    strided::{StridedView, StridedViewMut},
};

/// Type number of an element type inside the host runtime.
///
/// Native types have fixed numbers; types registered at run time get a
/// `User` number handed out by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    Float32,
    Float64,
    User(u16),
}

impl DType {
    pub const NATIVE: [DType; 12] = [
        DType::Bool,
        DType::Int8,
        DType::Int16,
        DType::Int32,
        DType::Int64,
        DType::UInt8,
        DType::UInt16,
        DType::UInt32,
        DType::UInt64,
        DType::Float16,
        DType::Float32,
        DType::Float64,
    ];

    /// Element size of native types. User types answer through their descriptor.
    pub const fn itemsize(self) -> Option<usize> {
        match self {
            DType::Bool | DType::Int8 | DType::UInt8 => Some(1),
            DType::Int16 | DType::UInt16 | DType::Float16 => Some(2),
            DType::Int32 | DType::UInt32 | DType::Float32 => Some(4),
            DType::Int64 | DType::UInt64 | DType::Float64 => Some(8),
            DType::User(_) => None,
        }
    }

    pub const fn is_native(self) -> bool {
        !matches!(self, DType::User(_))
    }

    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::Float16 => "float16",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::User(_) => return None,
        };
        Some(name)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::User(num) => write!(f, "user#{}", num),
            native => f.write_str(native.name().unwrap_or("?")),
        }
    }
}

/// Compile-time tag of an element type.
///
/// The posit8_2 type number is only known once the runtime hands it out, so
/// loop and cast signatures are written in terms of this tag and resolved at
/// registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Native(DType),
    Posit8,
}

impl ElementKind {
    pub fn resolve(self, posit: DType) -> DType {
        match self {
            ElementKind::Native(dtype) => dtype,
            ElementKind::Posit8 => posit,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Native(dtype) => fmt::Display::fmt(dtype, f),
            ElementKind::Posit8 => f.write_str("posit8_2"),
        }
    }
}

/// A value that can be read from and written to an element slot of a buffer.
///
/// `load` and `store` expect at least `SIZE` bytes and use native byte order.
pub trait Element: Copy + 'static {
    const KIND: ElementKind;
    const SIZE: usize;

    fn load(bytes: &[u8]) -> Self;
    fn store(self, bytes: &mut [u8]);
}

macro_rules! impl_native_element {
    ($($ty:ty => $dtype:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const KIND: ElementKind = ElementKind::Native(DType::$dtype);
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn load(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$ty>::from_ne_bytes(raw)
                }

                fn store(self, bytes: &mut [u8]) {
                    bytes[..Self::SIZE].copy_from_slice(&self.to_ne_bytes());
                }
            }
        )*
    };
}

impl_native_element!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f16 => Float16,
    f32 => Float32,
    f64 => Float64,
);

impl Element for bool {
    const KIND: ElementKind = ElementKind::Native(DType::Bool);
    const SIZE: usize = 1;

    fn load(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    fn store(self, bytes: &mut [u8]) {
        bytes[0] = self as u8;
    }
}

impl Element for Posit8_2 {
    const KIND: ElementKind = ElementKind::Posit8;
    const SIZE: usize = 1;

    fn load(bytes: &[u8]) -> Self {
        codec::decode(bytes[0])
    }

    fn store(self, bytes: &mut [u8]) {
        bytes[0] = codec::encode(self);
    }
}

pub type GetItemFn = fn(&[u8]) -> HostScalar;
pub type SetItemFn = fn(&HostScalar, &mut [u8], CastContext<'_>) -> Result<(), CastError>;
/// `src == None` leaves `dst` untouched.
pub type CopySwapFn = fn(&mut [u8], Option<&[u8]>, bool);
pub type CopySwapNFn = fn(&mut StridedViewMut<'_>, Option<&StridedView<'_>>, usize, bool);
pub type NonZeroFn = fn(&[u8]) -> bool;
pub type FillFn = fn(&mut [u8]);
pub type DotFn = fn(&StridedView<'_>, &StridedView<'_>, &mut [u8], usize);
pub type CompareFn = fn(&[u8], &[u8]) -> Ordering;
pub type ArgFn = fn(&[u8], usize) -> usize;

/// Buffer-level operations the runtime calls on arrays of a type.
///
/// Every slot is optional because descriptors registered by someone else may
/// be incomplete; the posit8_2 descriptor fills all of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayHooks {
    pub getitem: Option<GetItemFn>,
    pub setitem: Option<SetItemFn>,
    pub copyswap: Option<CopySwapFn>,
    pub copyswapn: Option<CopySwapNFn>,
    pub nonzero: Option<NonZeroFn>,
    pub fill: Option<FillFn>,
    pub dot: Option<DotFn>,
    pub compare: Option<CompareFn>,
    pub argmax: Option<ArgFn>,
    pub argmin: Option<ArgFn>,
}

#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub name: String,
    pub kind: char,
    pub type_char: char,
    pub byte_order: char,
    pub itemsize: usize,
    pub alignment: usize,
    pub hooks: ArrayHooks,
}

impl TypeDescriptor {
    /// Descriptor of a native type. Natives carry no hooks here; the runtime
    /// handles them itself.
    pub fn native(dtype: DType) -> Option<Self> {
        let (name, itemsize) = (dtype.name()?, dtype.itemsize()?);
        let (kind, type_char) = match dtype {
            DType::Bool => ('b', '?'),
            DType::Int8 => ('i', 'b'),
            DType::Int16 => ('i', 'h'),
            DType::Int32 => ('i', 'i'),
            DType::Int64 => ('i', 'l'),
            DType::UInt8 => ('u', 'B'),
            DType::UInt16 => ('u', 'H'),
            DType::UInt32 => ('u', 'I'),
            DType::UInt64 => ('u', 'L'),
            DType::Float16 => ('f', 'e'),
            DType::Float32 => ('f', 'f'),
            DType::Float64 => ('f', 'd'),
            DType::User(_) => return None,
        };
        Some(TypeDescriptor {
            name: name.to_string(),
            kind,
            type_char,
            byte_order: '=',
            itemsize,
            alignment: itemsize,
            hooks: ArrayHooks::default(),
        })
    }
}
