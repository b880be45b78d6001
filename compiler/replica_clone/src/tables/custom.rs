use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use replica_host::{Host, TypeDescriptor, TypeId, Value};

use super::TypeKey;
use crate::{collections, CloneCx, CloneError};

/// Dedicated deep clone procedure for one closed type.
///
/// Receives the clone context (host access plus nested cloning) and the
/// source value, which is never null.
pub type CustomProcedure =
    Arc<dyn Fn(&CloneCx<'_>, &Value) -> Result<Value, CloneError> + Send + Sync>;

/// Builds the procedure for a closed type from its generic arguments
/// (empty for non-generic types).
pub type ClonerFactory =
    Arc<dyn Fn(&Host, &[TypeId]) -> Result<CustomProcedure, CloneError> + Send + Sync>;

/// Map from type key to the factory of its dedicated procedure.
#[derive(Clone, Default)]
pub struct CustomClonerTable {
    factories: FxHashMap<TypeKey, ClonerFactory>,
}

impl fmt::Debug for CustomClonerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

impl CustomClonerTable {
    /// Table with no procedures.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table with the procedures for every well-known mutable collection.
    pub fn builtin() -> Self {
        collections::register(Self::empty())
    }

    /// Register a factory, replacing any earlier one for `key`.
    #[must_use]
    pub fn with_factory<F>(mut self, key: impl Into<TypeKey>, factory: F) -> Self
    where
        F: Fn(&Host, &[TypeId]) -> Result<CustomProcedure, CloneError> + Send + Sync + 'static,
    {
        self.factories.insert(key.into(), Arc::new(factory));
        self
    }

    /// Register a procedure that does not depend on generic arguments.
    #[must_use]
    pub fn with_procedure<F>(self, key: impl Into<TypeKey>, procedure: F) -> Self
    where
        F: Fn(&CloneCx<'_>, &Value) -> Result<Value, CloneError> + Send + Sync + 'static,
    {
        let procedure: CustomProcedure = Arc::new(procedure);
        self.with_factory(key, move |_: &Host, _: &[TypeId]| Ok(Arc::clone(&procedure)))
    }

    /// Remove the factory for `key`.
    #[must_use]
    pub fn without(mut self, key: impl Into<TypeKey>) -> Self {
        self.factories.remove(&key.into());
        self
    }

    pub fn contains_key(&self, key: TypeKey) -> bool {
        self.factories.contains_key(&key)
    }

    /// Factory for `desc`, by exact type first, then by generic definition.
    pub fn find(&self, desc: &TypeDescriptor) -> Option<&ClonerFactory> {
        TypeKey::candidates(desc).find_map(|key| self.factories.get(&key))
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
