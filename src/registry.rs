//! One-time registration of posit8_2 with a host runtime.

use std::collections::HashSet;

use half::f16;
use tracing::{debug, error, info, warn};

use crate::{
    config::RegistryConfig,
    convert::{CastContext, HostScalar, cast_loop},
    dtype::{DType, Element, TypeDescriptor},
    error::{CastError, InitError, RuntimeError},
    hooks,
    number_representations::posit::posit8_2::Posit8_2,
    runtime::{ArrayRuntime, CastFn},
    ufunc::{LoopBinding, table},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    Uninitialized,
    Registered { dtype: DType, reused: bool },
}

/// A directed cast between posit8_2 and one native type.
#[derive(Debug, Clone, Copy)]
pub struct CastEdge {
    pub from: DType,
    pub to: DType,
    pub func: CastFn,
    /// Value preserving, so the runtime may apply it implicitly.
    pub safe: bool,
}

macro_rules! cast_edges {
    ($posit:expr; $($native:ty => $safe:expr),* $(,)?) => {
        vec![
            $(
                CastEdge {
                    from: <$native as Element>::KIND.resolve($posit),
                    to: $posit,
                    func: cast_loop::<$native, Posit8_2>,
                    safe: false,
                },
                CastEdge {
                    from: $posit,
                    to: <$native as Element>::KIND.resolve($posit),
                    func: cast_loop::<Posit8_2, $native>,
                    safe: $safe,
                },
            )*
        ]
    };
}

/// Both directions for every native type. Only widening to f32 and f64 is safe.
pub fn cast_edges(posit: DType) -> Vec<CastEdge> {
    cast_edges!(posit;
        bool => false,
        i8 => false,
        i16 => false,
        i32 => false,
        i64 => false,
        u8 => false,
        u16 => false,
        u32 => false,
        u64 => false,
        f16 => false,
        f32 => true,
        f64 => true,
    )
}

/// Owns the posit8_2 registration for one runtime.
///
/// `ensure_registered` is idempotent. When a complete posit8_2 type already
/// exists under the configured name (complete meaning it has an argmax hook),
/// that type is adopted instead of registering a second one.
#[derive(Debug)]
pub struct Posit8Registry {
    config: RegistryConfig,
    bindings: Vec<LoopBinding>,
    state: RegistryState,
}

impl Posit8Registry {
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_bindings(config, table::bindings())
    }

    pub fn with_bindings(config: RegistryConfig, bindings: Vec<LoopBinding>) -> Self {
        Posit8Registry {
            config,
            bindings,
            state: RegistryState::Uninitialized,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn state(&self) -> RegistryState {
        self.state
    }

    pub fn dtype(&self) -> Option<DType> {
        match self.state {
            RegistryState::Registered { dtype, .. } => Some(dtype),
            RegistryState::Uninitialized => None,
        }
    }

    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor {
            name: self.config.type_name.clone(),
            kind: self.config.kind,
            type_char: self.config.type_char,
            byte_order: '=',
            itemsize: <Posit8_2 as Element>::SIZE,
            alignment: 1,
            hooks: hooks::posit8_hooks(self.config.cast.check_overflow),
        }
    }

    /// The host constructor `posit8_2(x)`, checked with the configured cast policy.
    pub fn construct<R>(
        &self,
        runtime: &R,
        args: &[HostScalar],
        kwargs: &[(String, HostScalar)],
    ) -> Result<HostScalar, CastError>
    where
        R: ArrayRuntime,
    {
        let posit = self.dtype().ok_or(CastError::Unregistered)?;
        let ctx = CastContext {
            lookup: runtime,
            posit,
        };
        Posit8_2::construct(args, kwargs, ctx, self.config.cast_policy())
    }

    pub fn ensure_registered<R>(&mut self, runtime: &mut R) -> Result<DType, InitError>
    where
        R: ArrayRuntime + ?Sized,
    {
        if let RegistryState::Registered { dtype, .. } = self.state {
            return Ok(dtype);
        }

        if let Some(dtype) = self.find_reusable(runtime) {
            info!(
                type_name = %self.config.type_name,
                %dtype,
                "reusing posit8_2 type registered elsewhere"
            );
            self.state = RegistryState::Registered {
                dtype,
                reused: true,
            };
            return Ok(dtype);
        }

        if let Err(err) = self.validate(runtime) {
            warn!(error = %err, "posit8_2 registration rejected, runtime left untouched");
            return Err(err);
        }

        let dtype = self.register(runtime).inspect_err(|err| {
            error!(error = %err, "posit8_2 registration failed part way");
        })?;
        info!(
            type_name = %self.config.type_name,
            %dtype,
            loops = self.bindings.len(),
            "registered posit8_2"
        );
        self.state = RegistryState::Registered {
            dtype,
            reused: false,
        };
        Ok(dtype)
    }

    fn find_reusable<R>(&self, runtime: &R) -> Option<DType>
    where
        R: ArrayRuntime + ?Sized,
    {
        if !self.config.reuse_existing {
            return None;
        }
        let dtype = runtime.type_num_from_name(&self.config.type_name)?;
        runtime
            .descriptor(dtype)
            .filter(|descr| descr.hooks.argmax.is_some())
            .map(|_| dtype)
    }

    /// Checks everything that can be checked before the runtime is modified.
    fn validate<R>(&self, runtime: &R) -> Result<(), InitError>
    where
        R: ArrayRuntime + ?Sized,
    {
        if runtime.type_num_from_name(&self.config.type_name).is_some() {
            return Err(InitError::TypeCreation(RuntimeError::DuplicateTypeName(
                self.config.type_name.clone(),
            )));
        }

        let mut seen = HashSet::new();
        for binding in &self.bindings {
            let nargs = runtime
                .ufunc_nargs(binding.name)
                .ok_or_else(|| InitError::UnknownUfunc(binding.name.to_string()))?;
            if nargs != binding.signature.len() {
                return Err(InitError::ArityMismatch {
                    name: binding.name.to_string(),
                    nargs,
                    loop_args: binding.signature.len(),
                });
            }
            if !seen.insert((binding.name, binding.signature.clone())) {
                return Err(InitError::DuplicateLoop {
                    name: binding.name.to_string(),
                    signature: binding.signature.clone(),
                });
            }
        }
        Ok(())
    }

    // A failure past this point leaves whatever was already installed in the
    // runtime; there is no way to unregister.
    fn register<R>(&self, runtime: &mut R) -> Result<DType, InitError>
    where
        R: ArrayRuntime + ?Sized,
    {
        let dtype = runtime
            .register_data_type(self.descriptor())
            .map_err(InitError::TypeCreation)?;

        let edges = cast_edges(dtype);
        for edge in &edges {
            let cast_err = |source| InitError::CastRegistration {
                from: edge.from,
                to: edge.to,
                source,
            };
            runtime
                .register_cast_func(edge.from, edge.to, edge.func)
                .map_err(cast_err)?;
            if edge.safe {
                runtime.register_can_cast(edge.from, edge.to).map_err(cast_err)?;
            }
        }
        debug!(count = edges.len(), "installed posit8_2 casts");

        for binding in &self.bindings {
            runtime
                .register_loop(binding.name, binding.resolve(dtype), binding.func)
                .map_err(|source| InitError::LoopRegistration {
                    name: binding.name.to_string(),
                    source,
                })?;
        }
        debug!(count = self.bindings.len(), "installed posit8_2 loops");

        Ok(dtype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::CastConfig,
        convert::CastLookup,
        dtype::{ArrayHooks, ElementKind},
        runtime::InMemoryRuntime,
        ufunc::functors::{Add, Negative},
    };

    type P8 = Posit8_2;

    fn registry() -> Posit8Registry {
        Posit8Registry::new(RegistryConfig::default())
    }

    fn foreign_descriptor(hooks: ArrayHooks) -> TypeDescriptor {
        TypeDescriptor {
            name: "posit8_2".to_string(),
            kind: 'p',
            type_char: 'E',
            byte_order: '=',
            itemsize: 1,
            alignment: 1,
            hooks,
        }
    }

    #[test]
    fn test_registers_type_casts_and_loops() {
        let mut runtime = InMemoryRuntime::new();
        let mut registry = registry();
        let dtype = registry.ensure_registered(&mut runtime).unwrap();

        assert_eq!(
            registry.state(),
            RegistryState::Registered {
                dtype,
                reused: false
            }
        );
        assert_eq!(runtime.type_num_from_name("posit8_2"), Some(dtype));
        let descr = runtime.descriptor(dtype).unwrap();
        assert_eq!((descr.kind, descr.type_char, descr.itemsize), ('p', 'E', 1));

        assert!(runtime.can_cast_safely(dtype, DType::Float32));
        assert!(runtime.can_cast_safely(dtype, DType::Float64));
        assert!(!runtime.can_cast_safely(dtype, DType::Float16));
        assert!(!runtime.can_cast_safely(dtype, DType::Int64));
        assert!(!runtime.can_cast_safely(DType::Float32, dtype));
        for native in DType::NATIVE {
            assert!(runtime.cast_function(native, dtype).is_some(), "{} -> posit", native);
            assert!(runtime.cast_function(dtype, native).is_some(), "posit -> {}", native);
        }

        assert_eq!(runtime.loop_count("add"), 5);
        assert_eq!(runtime.loop_count("equal"), 3);
        assert_eq!(runtime.loop_count("divmod"), 1);
        assert!(runtime.has_loop("frexp", &[dtype, dtype, DType::Int32]));
        assert!(runtime.has_loop("ldexp", &[dtype, DType::Int32, dtype]));
        assert!(runtime.has_loop("add", &[DType::Float64, dtype, dtype]));
    }

    #[test]
    fn test_second_call_is_a_no_op() {
        let mut runtime = InMemoryRuntime::new();
        let mut registry = registry();
        let first = registry.ensure_registered(&mut runtime).unwrap();
        let second = registry.ensure_registered(&mut runtime).unwrap();
        assert_eq!(first, second);
        assert_eq!(runtime.user_type_count(), 1);
        assert_eq!(runtime.loop_count("add"), 5);
    }

    #[test]
    fn test_second_registry_reuses_existing_type() {
        let mut runtime = InMemoryRuntime::new();
        let first = registry().ensure_registered(&mut runtime).unwrap();

        let mut other = registry();
        let second = other.ensure_registered(&mut runtime).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            other.state(),
            RegistryState::Registered {
                dtype: first,
                reused: true
            }
        );
        assert_eq!(runtime.user_type_count(), 1);
    }

    #[test]
    fn test_incomplete_foreign_type_is_not_reused() {
        let mut runtime = InMemoryRuntime::new();
        runtime
            .register_data_type(foreign_descriptor(ArrayHooks::default()))
            .unwrap();

        let err = registry().ensure_registered(&mut runtime).unwrap_err();
        assert_eq!(
            err,
            InitError::TypeCreation(RuntimeError::DuplicateTypeName("posit8_2".to_string()))
        );
        assert_eq!(runtime.loop_count("add"), 0);
    }

    #[test]
    fn test_complete_foreign_type_is_adopted() {
        let mut runtime = InMemoryRuntime::new();
        let foreign = runtime
            .register_data_type(foreign_descriptor(hooks::posit8_hooks(false)))
            .unwrap();
        let mut registry = registry();
        assert_eq!(registry.ensure_registered(&mut runtime), Ok(foreign));
        assert_eq!(registry.dtype(), Some(foreign));

        let mut strict = Posit8Registry::new(RegistryConfig {
            reuse_existing: false,
            ..RegistryConfig::default()
        });
        assert!(matches!(
            strict.ensure_registered(&mut runtime),
            Err(InitError::TypeCreation(_))
        ));
        assert_eq!(strict.state(), RegistryState::Uninitialized);
    }

    #[test]
    fn test_validation_failures_leave_runtime_untouched() {
        let cases = vec![
            (
                vec![LoopBinding::unary::<P8, P8, Negative>("no_such_ufunc")],
                InitError::UnknownUfunc("no_such_ufunc".to_string()),
            ),
            (
                vec![LoopBinding::unary::<P8, P8, Negative>("add")],
                InitError::ArityMismatch {
                    name: "add".to_string(),
                    nargs: 3,
                    loop_args: 2,
                },
            ),
            (
                vec![
                    LoopBinding::binary::<P8, P8, P8, Add>("add"),
                    LoopBinding::binary::<P8, P8, P8, Add>("add"),
                ],
                InitError::DuplicateLoop {
                    name: "add".to_string(),
                    signature: vec![ElementKind::Posit8; 3],
                },
            ),
        ];

        for (bindings, expected) in cases {
            let mut runtime = InMemoryRuntime::new();
            let mut registry = Posit8Registry::with_bindings(RegistryConfig::default(), bindings);
            assert_eq!(registry.ensure_registered(&mut runtime), Err(expected));
            assert_eq!(registry.state(), RegistryState::Uninitialized);
            assert_eq!(runtime.user_type_count(), 0);
            assert_eq!(runtime.type_num_from_name("posit8_2"), None);
        }
    }

    #[test]
    fn test_construct_uses_configured_policy() {
        let mut runtime = InMemoryRuntime::new();
        let mut strict = Posit8Registry::new(RegistryConfig {
            cast: CastConfig {
                check_overflow: true,
            },
            ..RegistryConfig::default()
        });
        let big = [HostScalar::Float(1.0e12)];
        assert_eq!(
            strict.construct(&runtime, &big, &[]),
            Err(CastError::Unregistered)
        );

        strict.ensure_registered(&mut runtime).unwrap();
        assert_eq!(
            strict.construct(&runtime, &big, &[]),
            Err(CastError::Overflow(1.0e12))
        );

        let mut lenient = registry();
        lenient.ensure_registered(&mut runtime).unwrap();
        assert_eq!(
            lenient.construct(&runtime, &big, &[]),
            Ok(HostScalar::Posit8(P8::MAX))
        );
    }

    #[test]
    fn test_cast_edges_are_paired() {
        let posit = DType::User(400);
        let edges = cast_edges(posit);
        assert_eq!(edges.len(), 2 * DType::NATIVE.len());
        let safe: Vec<DType> = edges.iter().filter(|e| e.safe).map(|e| e.to).collect();
        assert_eq!(safe, vec![DType::Float32, DType::Float64]);
        assert!(edges.iter().all(|e| e.from == posit || e.to == posit));
    }
}
