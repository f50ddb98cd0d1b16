//! The host array runtime as seen from posit8_2, plus a small in-memory host
//! used by the tests, benches and the demo binary.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::trace;

use crate::{
    convert::{CastLookup, HostScalar},
    dtype::{DType, Element, TypeDescriptor},
    error::{RuntimeError, UfuncError},
    strided::{StridedView, StridedViewMut},
    ufunc::{LoopArgs, LoopFn},
};

/// Converts `n` contiguous elements from one buffer into another.
pub type CastFn = fn(&[u8], &mut [u8], usize);

/// What the posit8_2 registration needs from a host runtime.
pub trait ArrayRuntime: CastLookup {
    fn type_num_from_name(&self, name: &str) -> Option<DType>;
    fn descriptor(&self, dtype: DType) -> Option<&TypeDescriptor>;
    fn register_data_type(&mut self, descr: TypeDescriptor) -> Result<DType, RuntimeError>;
    fn register_cast_func(&mut self, from: DType, to: DType, func: CastFn) -> Result<(), RuntimeError>;
    /// Declares `from -> to` safe for automatic promotion.
    fn register_can_cast(&mut self, from: DType, to: DType) -> Result<(), RuntimeError>;
    /// Inputs plus outputs of the named ufunc.
    fn ufunc_nargs(&self, name: &str) -> Option<usize>;
    fn has_loop(&self, name: &str, signature: &[DType]) -> bool;
    fn register_loop(&mut self, name: &str, signature: Vec<DType>, func: LoopFn) -> Result<(), RuntimeError>;
}

/// A contiguous one-dimensional array.
#[derive(Debug, Clone, PartialEq)]
pub struct HostArray {
    dtype: DType,
    itemsize: usize,
    data: Vec<u8>,
}

impl HostArray {
    pub fn from_elements<T: Element>(dtype: DType, values: &[T]) -> Self {
        let mut data = vec![0u8; values.len() * T::SIZE];
        for (value, slot) in values.iter().zip(data.chunks_exact_mut(T::SIZE)) {
            value.store(slot);
        }
        HostArray {
            dtype,
            itemsize: T::SIZE,
            data,
        }
    }

    pub fn from_bytes(dtype: DType, itemsize: usize, data: Vec<u8>) -> Self {
        HostArray {
            dtype,
            itemsize,
            data,
        }
    }

    pub fn zeros(dtype: DType, itemsize: usize, len: usize) -> Self {
        HostArray {
            dtype,
            itemsize,
            data: vec![0u8; itemsize * len],
        }
    }

    pub fn to_elements<T: Element>(&self) -> Vec<T> {
        self.data.chunks_exact(T::SIZE).map(T::load).collect()
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn itemsize(&self) -> usize {
        self.itemsize
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.itemsize.max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn view(&self) -> StridedView<'_> {
        StridedView::contiguous(&self.data, self.itemsize)
    }

    pub fn view_mut(&mut self) -> StridedViewMut<'_> {
        StridedViewMut::contiguous(&mut self.data, self.itemsize)
    }
}

#[derive(Debug)]
struct Ufunc {
    nin: usize,
    nout: usize,
    loops: Vec<(Vec<DType>, LoopFn)>,
}

impl Ufunc {
    fn new(nin: usize, nout: usize) -> Self {
        Ufunc {
            nin,
            nout,
            loops: Vec::new(),
        }
    }
}

/// (name, inputs, outputs) of the ufuncs the in-memory host knows about.
const STANDARD_UFUNCS: &[(&str, usize, usize)] = &[
    ("add", 2, 1),
    ("subtract", 2, 1),
    ("multiply", 2, 1),
    ("divide", 2, 1),
    ("true_divide", 2, 1),
    ("floor_divide", 2, 1),
    ("remainder", 2, 1),
    ("mod", 2, 1),
    ("fmod", 2, 1),
    ("divmod", 2, 2),
    ("power", 2, 1),
    ("logaddexp", 2, 1),
    ("logaddexp2", 2, 1),
    ("negative", 1, 1),
    ("positive", 1, 1),
    ("absolute", 1, 1),
    ("fabs", 1, 1),
    ("rint", 1, 1),
    ("sign", 1, 1),
    ("heaviside", 2, 1),
    ("conjugate", 1, 1),
    ("exp", 1, 1),
    ("exp2", 1, 1),
    ("expm1", 1, 1),
    ("log", 1, 1),
    ("log2", 1, 1),
    ("log10", 1, 1),
    ("log1p", 1, 1),
    ("sqrt", 1, 1),
    ("square", 1, 1),
    ("cbrt", 1, 1),
    ("reciprocal", 1, 1),
    ("sin", 1, 1),
    ("cos", 1, 1),
    ("tan", 1, 1),
    ("arcsin", 1, 1),
    ("arccos", 1, 1),
    ("arctan", 1, 1),
    ("arctan2", 2, 1),
    ("hypot", 2, 1),
    ("sinh", 1, 1),
    ("cosh", 1, 1),
    ("tanh", 1, 1),
    ("arcsinh", 1, 1),
    ("arccosh", 1, 1),
    ("arctanh", 1, 1),
    ("deg2rad", 1, 1),
    ("rad2deg", 1, 1),
    ("equal", 2, 1),
    ("not_equal", 2, 1),
    ("less", 2, 1),
    ("greater", 2, 1),
    ("less_equal", 2, 1),
    ("greater_equal", 2, 1),
    ("maximum", 2, 1),
    ("minimum", 2, 1),
    ("fmax", 2, 1),
    ("fmin", 2, 1),
    ("logical_and", 2, 1),
    ("logical_or", 2, 1),
    ("logical_xor", 2, 1),
    ("logical_not", 1, 1),
    ("isfinite", 1, 1),
    ("isinf", 1, 1),
    ("isnan", 1, 1),
    ("signbit", 1, 1),
    ("copysign", 2, 1),
    ("modf", 1, 2),
    ("ldexp", 2, 1),
    ("frexp", 1, 2),
    ("floor", 1, 1),
    ("ceil", 1, 1),
    ("trunc", 1, 1),
    ("nextafter", 2, 1),
    ("spacing", 1, 1),
];

/// First type number handed to a registered type.
const FIRST_USER_TYPE: u16 = 256;

#[derive(Debug)]
pub struct InMemoryRuntime {
    descriptors: BTreeMap<DType, TypeDescriptor>,
    names: HashMap<String, DType>,
    casts: HashMap<(DType, DType), CastFn>,
    safe_casts: HashSet<(DType, DType)>,
    ufuncs: HashMap<String, Ufunc>,
    next_user: u16,
}

impl Default for InMemoryRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRuntime {
    pub fn new() -> Self {
        let mut descriptors = BTreeMap::new();
        let mut names = HashMap::new();
        for dtype in DType::NATIVE {
            if let Some(descr) = TypeDescriptor::native(dtype) {
                names.insert(descr.name.clone(), dtype);
                descriptors.insert(dtype, descr);
            }
        }
        let ufuncs = STANDARD_UFUNCS
            .iter()
            .map(|(name, nin, nout)| (name.to_string(), Ufunc::new(*nin, *nout)))
            .collect();

        InMemoryRuntime {
            descriptors,
            names,
            casts: HashMap::new(),
            safe_casts: HashSet::new(),
            ufuncs,
            next_user: FIRST_USER_TYPE,
        }
    }

    /// Number of types registered on top of the natives.
    pub fn user_type_count(&self) -> usize {
        self.descriptors.keys().filter(|d| !d.is_native()).count()
    }

    pub fn loop_count(&self, name: &str) -> usize {
        self.ufuncs.get(name).map_or(0, |u| u.loops.len())
    }

    pub fn can_cast_safely(&self, from: DType, to: DType) -> bool {
        from == to || self.safe_casts.contains(&(from, to))
    }

    fn itemsize(&self, dtype: DType) -> Result<usize, RuntimeError> {
        self.descriptors
            .get(&dtype)
            .map(|d| d.itemsize)
            .ok_or(RuntimeError::UnknownType(dtype))
    }

    fn ufunc(&self, name: &str) -> Result<&Ufunc, UfuncError> {
        self.ufuncs
            .get(name)
            .ok_or_else(|| UfuncError::UnknownUfunc(name.to_string()))
    }

    /// Runs the loop registered under exactly `signature`.
    pub fn execute(&self, name: &str, signature: &[DType], args: &mut LoopArgs<'_>) -> Result<(), UfuncError> {
        let ufunc = self.ufunc(name)?;
        if args.inputs.len() != ufunc.nin || args.outputs.len() != ufunc.nout {
            return Err(UfuncError::OperandCount {
                name: name.to_string(),
                expected: ufunc.nin + ufunc.nout,
                got: args.inputs.len() + args.outputs.len(),
            });
        }
        let func = ufunc
            .loops
            .iter()
            .find(|(sig, _)| sig.as_slice() == signature)
            .map(|(_, func)| *func)
            .ok_or_else(|| UfuncError::NoMatchingLoop {
                name: name.to_string(),
                signature: signature.to_vec(),
            })?;

        let shapes = args
            .inputs
            .iter()
            .map(|v| (v.len(), v.itemsize()))
            .chain(args.outputs.iter().map(|v| (v.len(), v.itemsize())));
        for ((len, itemsize), &dtype) in shapes.zip(signature) {
            let expected = self.itemsize(dtype)?;
            if itemsize != expected {
                return Err(RuntimeError::ItemsizeMismatch {
                    dtype,
                    expected,
                    got: itemsize,
                }
                .into());
            }
            if len < args.len {
                return Err(RuntimeError::BufferTooSmall {
                    dtype,
                    len: len * itemsize,
                    count: args.len,
                }
                .into());
            }
        }

        func(args).map_err(|err| {
            trace!(ufunc = name, error = %err, "loop reported an arithmetic error");
            UfuncError::from(err)
        })
    }

    /// Applies the ufunc to contiguous inputs, allocating the outputs.
    ///
    /// Inputs of length 1 are broadcast. The first loop whose input types
    /// match exactly is used.
    pub fn call(&self, name: &str, inputs: &[&HostArray]) -> Result<Vec<HostArray>, UfuncError> {
        let ufunc = self.ufunc(name)?;
        if inputs.len() != ufunc.nin {
            return Err(UfuncError::OperandCount {
                name: name.to_string(),
                expected: ufunc.nin,
                got: inputs.len(),
            });
        }
        let in_types: Vec<DType> = inputs.iter().map(|a| a.dtype()).collect();
        let signature = ufunc
            .loops
            .iter()
            .map(|(sig, _)| sig)
            .find(|sig| sig[..ufunc.nin] == in_types[..])
            .ok_or_else(|| UfuncError::NoMatchingLoop {
                name: name.to_string(),
                signature: in_types.clone(),
            })?;

        let len = inputs.iter().map(|a| a.len()).max().unwrap_or(0);
        let mut outputs = signature[ufunc.nin..]
            .iter()
            .map(|dtype| Ok(HostArray::zeros(*dtype, self.itemsize(*dtype)?, len)))
            .collect::<Result<Vec<_>, RuntimeError>>()?;
        self.call_into(name, inputs, &mut outputs)?;
        Ok(outputs)
    }

    /// Like `call` but writes into caller-owned outputs, which keep whatever
    /// the loop computed even when it reports an arithmetic error.
    pub fn call_into(&self, name: &str, inputs: &[&HostArray], outputs: &mut [HostArray]) -> Result<(), UfuncError> {
        let len = outputs.first().map_or(0, |o| o.len());
        if let Some(short) = outputs.iter().find(|o| o.len() != len) {
            return Err(RuntimeError::BufferTooSmall {
                dtype: short.dtype(),
                len: short.as_bytes().len(),
                count: len,
            }
            .into());
        }
        let mut signature: Vec<DType> = inputs.iter().map(|a| a.dtype()).collect();
        signature.extend(outputs.iter().map(|o| o.dtype()));

        let mut input_views = Vec::with_capacity(inputs.len());
        for array in inputs {
            let stride = if array.len() == 1 { 0 } else { array.itemsize() as isize };
            if array.len() != len && array.len() != 1 {
                return Err(RuntimeError::BufferTooSmall {
                    dtype: array.dtype(),
                    len: array.as_bytes().len(),
                    count: len,
                }
                .into());
            }
            input_views.push(StridedView::new(array.as_bytes(), 0, stride, array.itemsize(), len)?);
        }

        let mut args = LoopArgs {
            inputs: input_views,
            outputs: outputs.iter_mut().map(|o| o.view_mut()).collect(),
            len,
        };
        self.execute(name, &signature, &mut args)
    }

    pub fn cast(&self, array: &HostArray, to: DType) -> Result<HostArray, RuntimeError> {
        if array.dtype() == to {
            return Ok(array.clone());
        }
        let func = self
            .cast_function(array.dtype(), to)
            .ok_or(RuntimeError::NoCast {
                from: array.dtype(),
                to,
            })?;
        let mut out = HostArray::zeros(to, self.itemsize(to)?, array.len());
        func(array.as_bytes(), &mut out.data, array.len());
        Ok(out)
    }

    pub fn getitem(&self, array: &HostArray, index: usize) -> Result<HostScalar, RuntimeError> {
        if index >= array.len() {
            return Err(RuntimeError::ViewOutOfBounds {
                position: (index * array.itemsize()) as isize,
                len: array.as_bytes().len(),
            });
        }
        let bytes = array.view().element(index);
        let scalar = match array.dtype() {
            DType::Bool => HostScalar::Bool(bool::load(bytes)),
            DType::Int8 => HostScalar::Int(i8::load(bytes).into()),
            DType::Int16 => HostScalar::Int(i16::load(bytes).into()),
            DType::Int32 => HostScalar::Int(i32::load(bytes).into()),
            DType::Int64 => HostScalar::Int(i64::load(bytes).into()),
            DType::UInt8 => HostScalar::Int(u8::load(bytes).into()),
            DType::UInt16 => HostScalar::Int(u16::load(bytes).into()),
            DType::UInt32 => HostScalar::Int(u32::load(bytes).into()),
            DType::UInt64 => HostScalar::Int(u64::load(bytes).into()),
            DType::Float16 => HostScalar::Float16(half::f16::load(bytes)),
            DType::Float32 => HostScalar::Float32(f32::load(bytes)),
            DType::Float64 => HostScalar::Float64(f64::load(bytes)),
            user => {
                let getitem = self
                    .descriptor(user)
                    .and_then(|d| d.hooks.getitem)
                    .ok_or(RuntimeError::UnknownType(user))?;
                getitem(bytes)
            }
        };
        Ok(scalar)
    }

    /// Sorted copy, ordered by the type's compare hook.
    pub fn sort(&self, array: &HostArray) -> Result<HostArray, RuntimeError> {
        let compare = self
            .descriptor(array.dtype())
            .and_then(|d| d.hooks.compare)
            .ok_or(RuntimeError::UnknownType(array.dtype()))?;
        let mut items: Vec<&[u8]> = array.data.chunks_exact(array.itemsize).collect();
        items.sort_by(|a, b| compare(a, b));
        Ok(HostArray::from_bytes(array.dtype(), array.itemsize, items.concat()))
    }

    pub fn argmax(&self, array: &HostArray) -> Result<usize, RuntimeError> {
        let argmax = self
            .descriptor(array.dtype())
            .and_then(|d| d.hooks.argmax)
            .ok_or(RuntimeError::UnknownType(array.dtype()))?;
        Ok(argmax(array.as_bytes(), array.len()))
    }

    pub fn argmin(&self, array: &HostArray) -> Result<usize, RuntimeError> {
        let argmin = self
            .descriptor(array.dtype())
            .and_then(|d| d.hooks.argmin)
            .ok_or(RuntimeError::UnknownType(array.dtype()))?;
        Ok(argmin(array.as_bytes(), array.len()))
    }
}

impl CastLookup for InMemoryRuntime {
    fn cast_function(&self, from: DType, to: DType) -> Option<CastFn> {
        self.casts.get(&(from, to)).copied()
    }

    fn element_size(&self, dtype: DType) -> Option<usize> {
        self.descriptors.get(&dtype).map(|d| d.itemsize)
    }
}

impl ArrayRuntime for InMemoryRuntime {
    fn type_num_from_name(&self, name: &str) -> Option<DType> {
        self.names.get(name).copied()
    }

    fn descriptor(&self, dtype: DType) -> Option<&TypeDescriptor> {
        self.descriptors.get(&dtype)
    }

    fn register_data_type(&mut self, descr: TypeDescriptor) -> Result<DType, RuntimeError> {
        if self.names.contains_key(&descr.name) {
            return Err(RuntimeError::DuplicateTypeName(descr.name));
        }
        let dtype = DType::User(self.next_user);
        self.next_user += 1;
        self.names.insert(descr.name.clone(), dtype);
        self.descriptors.insert(dtype, descr);
        Ok(dtype)
    }

    fn register_cast_func(&mut self, from: DType, to: DType, func: CastFn) -> Result<(), RuntimeError> {
        for dtype in [from, to] {
            if !self.descriptors.contains_key(&dtype) {
                return Err(RuntimeError::UnknownType(dtype));
            }
        }
        self.casts.insert((from, to), func);
        Ok(())
    }

    fn register_can_cast(&mut self, from: DType, to: DType) -> Result<(), RuntimeError> {
        if !self.casts.contains_key(&(from, to)) {
            return Err(RuntimeError::NoCast { from, to });
        }
        self.safe_casts.insert((from, to));
        Ok(())
    }

    fn ufunc_nargs(&self, name: &str) -> Option<usize> {
        self.ufuncs.get(name).map(|u| u.nin + u.nout)
    }

    fn has_loop(&self, name: &str, signature: &[DType]) -> bool {
        self.ufuncs
            .get(name)
            .is_some_and(|u| u.loops.iter().any(|(sig, _)| sig.as_slice() == signature))
    }

    fn register_loop(&mut self, name: &str, signature: Vec<DType>, func: LoopFn) -> Result<(), RuntimeError> {
        if self.has_loop(name, &signature) {
            return Err(RuntimeError::DuplicateLoop {
                name: name.to_string(),
                signature,
            });
        }
        let ufunc = self
            .ufuncs
            .get_mut(name)
            .ok_or_else(|| RuntimeError::UnknownUfunc(name.to_string()))?;
        if signature.len() != ufunc.nin + ufunc.nout {
            return Err(RuntimeError::ArityMismatch {
                name: name.to_string(),
                nargs: ufunc.nin + ufunc.nout,
                loop_args: signature.len(),
            });
        }
        ufunc.loops.push((signature, func));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        convert::cast_loop, dtype::ArrayHooks, number_representations::posit::posit8_2::Posit8_2,
    };

    fn descriptor(name: &str) -> TypeDescriptor {
        TypeDescriptor {
            name: name.to_string(),
            kind: 'V',
            type_char: 'V',
            byte_order: '=',
            itemsize: 1,
            alignment: 1,
            hooks: ArrayHooks::default(),
        }
    }

    #[test]
    fn test_register_type_assigns_user_numbers() {
        let mut runtime = InMemoryRuntime::new();
        let first = runtime.register_data_type(descriptor("a")).unwrap();
        let second = runtime.register_data_type(descriptor("b")).unwrap();
        assert_eq!(first, DType::User(256));
        assert_eq!(second, DType::User(257));
        assert_eq!(runtime.type_num_from_name("b"), Some(second));
        assert_eq!(runtime.type_num_from_name("float32"), Some(DType::Float32));
        assert_eq!(
            runtime.register_data_type(descriptor("a")),
            Err(RuntimeError::DuplicateTypeName("a".to_string()))
        );
        assert_eq!(runtime.user_type_count(), 2);
    }

    #[test]
    fn test_cast_registration() {
        let mut runtime = InMemoryRuntime::new();
        let posit = runtime.register_data_type(descriptor("p")).unwrap();
        assert_eq!(
            runtime.register_can_cast(posit, DType::Float32),
            Err(RuntimeError::NoCast {
                from: posit,
                to: DType::Float32
            })
        );
        assert!(
            runtime
                .register_cast_func(DType::User(999), posit, cast_loop::<f32, Posit8_2>)
                .is_err()
        );
        runtime
            .register_cast_func(DType::Float32, posit, cast_loop::<f32, Posit8_2>)
            .unwrap();
        runtime
            .register_cast_func(posit, DType::Float32, cast_loop::<Posit8_2, f32>)
            .unwrap();
        runtime.register_can_cast(posit, DType::Float32).unwrap();
        assert!(runtime.can_cast_safely(posit, DType::Float32));
        assert!(!runtime.can_cast_safely(DType::Float32, posit));

        let array = HostArray::from_elements(DType::Float32, &[-1.0_f32, 2.5]);
        let narrow = runtime.cast(&array, posit).unwrap();
        assert_eq!(narrow.as_bytes(), &[0xC0, 0x4A]);
        let back = runtime.cast(&narrow, DType::Float32).unwrap();
        assert_eq!(back.to_elements::<f32>(), vec![-1.0, 2.5]);
        assert!(runtime.cast(&array, DType::Int8).is_err());
    }

    #[test]
    fn test_loop_registration_rules() {
        fn noop(_: &mut LoopArgs<'_>) -> Result<(), crate::error::ArithmeticError> {
            Ok(())
        }
        let mut runtime = InMemoryRuntime::new();
        let sig = vec![DType::Int8, DType::Int8];
        runtime.register_loop("negative", sig.clone(), noop).unwrap();
        assert!(runtime.has_loop("negative", &sig));
        assert!(matches!(
            runtime.register_loop("negative", sig.clone(), noop),
            Err(RuntimeError::DuplicateLoop { .. })
        ));
        assert!(matches!(
            runtime.register_loop("no_such_ufunc", sig, noop),
            Err(RuntimeError::UnknownUfunc(_))
        ));
        assert_eq!(runtime.ufunc_nargs("divmod"), Some(4));
        assert_eq!(runtime.ufunc_nargs("frexp"), Some(3));
    }

    #[test]
    fn test_call_into_rejects_mismatched_outputs() {
        let mut runtime = InMemoryRuntime::new();
        let posit = crate::register_default(&mut runtime).unwrap();
        let a = HostArray::from_elements(posit, &[Posit8_2::from(7.0_f32); 3]);
        let b = HostArray::from_elements(posit, &[Posit8_2::from(2.0_f32); 3]);

        let mut short_second = [HostArray::zeros(posit, 1, 3), HostArray::zeros(posit, 1, 1)];
        assert_eq!(
            runtime.call_into("divmod", &[&a, &b], &mut short_second),
            Err(UfuncError::Runtime(RuntimeError::BufferTooSmall {
                dtype: posit,
                len: 1,
                count: 3
            }))
        );

        let mut narrow_exponent = [HostArray::zeros(posit, 1, 3), HostArray::zeros(DType::Int32, 1, 3)];
        assert_eq!(
            runtime.call_into("frexp", &[&a], &mut narrow_exponent),
            Err(UfuncError::Runtime(RuntimeError::ItemsizeMismatch {
                dtype: DType::Int32,
                expected: 4,
                got: 1
            }))
        );

        let mut wide = [HostArray::zeros(posit, 2, 3)];
        assert!(matches!(
            runtime.call_into("negative", &[&a], &mut wide),
            Err(UfuncError::Runtime(RuntimeError::ItemsizeMismatch { expected: 1, got: 2, .. }))
        ));

        let mut short = vec![0u8; 1];
        let mut args = LoopArgs {
            inputs: vec![a.view()],
            outputs: vec![StridedViewMut::new(&mut short, 0, 1, 1, 1).unwrap()],
            len: 3,
        };
        assert!(matches!(
            runtime.execute("negative", &[posit, posit], &mut args),
            Err(UfuncError::Runtime(RuntimeError::BufferTooSmall { count: 3, .. }))
        ));

        let mut outputs = [HostArray::zeros(posit, 1, 3), HostArray::zeros(posit, 1, 3)];
        runtime.call_into("divmod", &[&a, &b], &mut outputs).unwrap();
        assert_eq!(outputs[0].as_bytes(), &[0x4C; 3]);
        assert_eq!(outputs[1].as_bytes(), &[0x40; 3]);
    }

    #[test]
    fn test_call_reports_missing_loops() {
        let runtime = InMemoryRuntime::new();
        let a = HostArray::from_elements(DType::Float32, &[1.0_f32]);
        assert!(matches!(
            runtime.call("add", &[&a, &a]),
            Err(UfuncError::NoMatchingLoop { .. })
        ));
        assert!(matches!(
            runtime.call("frobnicate", &[&a]),
            Err(UfuncError::UnknownUfunc(_))
        ));
        assert!(matches!(
            runtime.call("add", &[&a]),
            Err(UfuncError::OperandCount { expected: 2, got: 1, .. })
        ));
    }
}
