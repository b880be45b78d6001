//! The cloning engine and its public entry points.

use std::fmt;
use std::sync::Arc;

use replica_host::{FieldDef, Host, Reflect, TypeId, Value};

use crate::cache::{CacheStats, CompileCache, ErasedCloner};
use crate::classify::Classifier;
use crate::compile::Compiler;
use crate::fields::FieldPlanner;
use crate::plan::{ClonerPair, Mode, Plan};
use crate::{CloneError, ClonerConfig, CustomClonerTable, SafeTypeTable};

/// Shallow and deep cloning over the types of one [`Host`].
///
/// The first clone of each type compiles a plan pair for it; later calls
/// reuse the cached pair. A `Cloner` is `Send + Sync` and meant to be
/// shared: build one per host at startup and pass it by reference.
pub struct Cloner {
    host: Host,
    classifier: Classifier,
    fields: FieldPlanner,
    typed: CompileCache<ClonerPair>,
    runtime: CompileCache<ErasedCloner>,
    config: ClonerConfig,
}

/// Builder for a [`Cloner`] with non-default tables or configuration.
#[must_use]
pub struct ClonerBuilder {
    host: Host,
    safe: SafeTypeTable,
    custom: CustomClonerTable,
    config: ClonerConfig,
}

impl ClonerBuilder {
    /// Replace the safe-type table (default: [`SafeTypeTable::builtin`]).
    pub fn safe_types(mut self, table: SafeTypeTable) -> Self {
        self.safe = table;
        self
    }

    /// Replace the custom cloner table (default:
    /// [`CustomClonerTable::builtin`]).
    pub fn custom_cloners(mut self, table: CustomClonerTable) -> Self {
        self.custom = table;
        self
    }

    pub fn config(mut self, config: ClonerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Cloner {
        let ClonerBuilder {
            host,
            safe,
            custom,
            config,
        } = self;

        let runtime = CompileCache::new(config.compile_policy);
        // The top type is never safe, yet an instance of it has nothing to
        // clone: both modes allocate a fresh empty object.
        runtime.seed(
            TypeId::OBJECT,
            ErasedCloner::new(Arc::new(ClonerPair {
                ty: TypeId::OBJECT,
                name: Arc::from("Object"),
                shallow: Plan::FreshObject,
                deep: Plan::FreshObject,
            })),
        );

        tracing::debug!(
            safe = safe.len(),
            custom = custom.len(),
            policy = %config.compile_policy,
            max_depth = config.max_depth,
            "built cloner"
        );

        Cloner {
            classifier: Classifier::new(host.clone(), safe, custom),
            fields: FieldPlanner::new(host.clone()),
            typed: CompileCache::new(config.compile_policy),
            runtime,
            config,
            host,
        }
    }
}

impl Cloner {
    /// Cloner with the built-in tables and default configuration.
    pub fn new(host: Host) -> Self {
        Self::builder(host).build()
    }

    pub fn builder(host: Host) -> ClonerBuilder {
        ClonerBuilder {
            host,
            safe: SafeTypeTable::builtin(),
            custom: CustomClonerTable::builtin(),
            config: ClonerConfig::default(),
        }
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn config(&self) -> &ClonerConfig {
        &self.config
    }

    pub fn safe_types(&self) -> &SafeTypeTable {
        self.classifier.safe_types()
    }

    pub fn custom_cloners(&self) -> &CustomClonerTable {
        self.classifier.custom_cloners()
    }

    // Classification

    /// Check if values of `ty` are returned unchanged by every clone.
    pub fn is_safe_to_copy(&self, ty: TypeId) -> Result<bool, CloneError> {
        self.classifier.is_safe_to_copy(ty)
    }

    /// Check if `ty` or its generic definition has a custom cloner.
    pub fn has_custom_cloner(&self, ty: TypeId) -> Result<bool, CloneError> {
        self.classifier.has_custom_cloner(ty)
    }

    /// Instance fields of `ty` in the order plans copy them.
    pub fn collect_fields(&self, ty: TypeId) -> Result<Arc<[FieldDef]>, CloneError> {
        self.fields.collect_fields(ty)
    }

    // Entry points

    /// Deep clone of `value`, declared as `declared`.
    pub fn deep_clone(&self, value: &Value, declared: TypeId) -> Result<Value, CloneError> {
        self.run(declared, value, Mode::Deep, 0)
    }

    /// Shallow clone of `value`, declared as `declared`.
    pub fn shallow_clone(&self, value: &Value, declared: TypeId) -> Result<Value, CloneError> {
        self.run(declared, value, Mode::Shallow, 0)
    }

    pub fn clone_value(
        &self,
        value: &Value,
        declared: TypeId,
        mode: Mode,
    ) -> Result<Value, CloneError> {
        self.run(declared, value, mode, 0)
    }

    /// Deep clone through the runtime-dispatch cache.
    ///
    /// `runtime_type` must be the exact runtime type of `value`.
    pub fn deep_clone_erased(
        &self,
        value: &Value,
        runtime_type: TypeId,
    ) -> Result<Value, CloneError> {
        self.run_erased(value, runtime_type, Mode::Deep)
    }

    /// Shallow clone through the runtime-dispatch cache.
    pub fn shallow_clone_erased(
        &self,
        value: &Value,
        runtime_type: TypeId,
    ) -> Result<Value, CloneError> {
        self.run_erased(value, runtime_type, Mode::Shallow)
    }

    /// Deep clone of a native value.
    pub fn deep<T: Reflect>(&self, value: T) -> Result<T, CloneError> {
        self.native(value, Mode::Deep)
    }

    /// Shallow clone of a native value.
    pub fn shallow<T: Reflect>(&self, value: T) -> Result<T, CloneError> {
        self.native(value, Mode::Shallow)
    }

    /// Handle on the compiled plans of `ty`, compiling them now if needed.
    pub fn typed(&self, ty: TypeId) -> Result<TypedCloner<'_>, CloneError> {
        Ok(TypedCloner {
            cloner: self,
            pair: self.pair(ty)?,
        })
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            typed: self.typed.len(),
            runtime: self.runtime.len(),
            compilations: self.typed.compilations(),
        }
    }

    fn run_erased(
        &self,
        value: &Value,
        runtime_type: TypeId,
        mode: Mode,
    ) -> Result<Value, CloneError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        self.erased(runtime_type)?.run(self, value, mode, 0)
    }

    fn native<T: Reflect>(&self, value: T, mode: Mode) -> Result<T, CloneError> {
        let cloned = self.run(T::TYPE, &value.into_value(), mode, 0)?;
        let (runtime, kind) = (self.host.runtime_type(&cloned), cloned.kind_name());
        if let Some(native) = T::from_value(cloned) {
            return Ok(native);
        }
        let found = match runtime {
            Some(ty) => self.host.name_of(ty)?,
            None => kind.into(),
        };
        Err(CloneError::TypeMismatch {
            expected: self.host.name_of(T::TYPE)?,
            found,
        })
    }

    // Caches

    /// Typed-cache entry for `ty`.
    pub(crate) fn pair(&self, ty: TypeId) -> Result<Arc<ClonerPair>, CloneError> {
        self.typed.get_or_compile(ty, || {
            Compiler::new(&self.host, &self.classifier, &self.fields).compile(ty)
        })
    }

    /// Runtime-dispatch-cache entry for the runtime type `ty`.
    pub(crate) fn erased(&self, ty: TypeId) -> Result<Arc<ErasedCloner>, CloneError> {
        self.runtime
            .get_or_compile(ty, || Ok(ErasedCloner::new(self.pair(ty)?)))
    }

    pub(crate) fn classifier(&self) -> &Classifier {
        &self.classifier
    }
}

impl fmt::Debug for Cloner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cloner")
            .field("classifier", &self.classifier)
            .field("stats", &self.stats())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// The plan pair of one type, resolved once.
///
/// Calls through a `TypedCloner` skip the typed-cache lookup of the top
/// level value.
pub struct TypedCloner<'a> {
    cloner: &'a Cloner,
    pair: Arc<ClonerPair>,
}

impl TypedCloner<'_> {
    pub fn ty(&self) -> TypeId {
        self.pair.ty
    }

    pub fn name(&self) -> &Arc<str> {
        &self.pair.name
    }

    /// Short name of the strategy compiled for `mode`, such as `identity`,
    /// `object-fields` or `runtime-dispatch`.
    pub fn strategy(&self, mode: Mode) -> &'static str {
        self.pair.plan(mode).name()
    }

    pub fn deep(&self, value: &Value) -> Result<Value, CloneError> {
        self.run(value, Mode::Deep)
    }

    pub fn shallow(&self, value: &Value) -> Result<Value, CloneError> {
        self.run(value, Mode::Shallow)
    }

    fn run(&self, value: &Value, mode: Mode) -> Result<Value, CloneError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        self.cloner.execute(&self.pair, mode, value, 0)
    }
}

impl fmt::Debug for TypedCloner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedCloner").field(&self.pair).finish()
    }
}

/// Context handed to custom procedures.
///
/// Nested clones made through the context count toward the depth limit
/// of the enclosing call.
pub struct CloneCx<'a> {
    cloner: &'a Cloner,
    depth: usize,
}

impl<'a> CloneCx<'a> {
    pub(crate) fn new(cloner: &'a Cloner, depth: usize) -> Self {
        CloneCx { cloner, depth }
    }

    pub fn host(&self) -> &'a Host {
        self.cloner.host()
    }

    /// Nesting depth of the value being cloned.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Deep clone of a nested value declared as `ty`.
    pub fn deep(&self, value: &Value, ty: TypeId) -> Result<Value, CloneError> {
        self.cloner.run(ty, value, Mode::Deep, self.depth + 1)
    }

    /// Shallow clone of a nested value declared as `ty`.
    pub fn shallow(&self, value: &Value, ty: TypeId) -> Result<Value, CloneError> {
        self.cloner.run(ty, value, Mode::Shallow, self.depth + 1)
    }

    /// Check if values of `ty` can be kept as they are in a deep clone.
    pub fn is_shared(&self, ty: TypeId) -> Result<bool, CloneError> {
        self.cloner.classifier().is_shared(ty)
    }
}
