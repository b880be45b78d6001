//! Type classification: which types are shared instead of cloned, and
//! which have a dedicated clone procedure.


use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use replica_host::{Host, TypeDescriptor, TypeFlags, TypeId, TypeKind};

use crate::{ClonerFactory, CloneError, CustomClonerTable, SafeTypeTable};

/// Answers "is this type safe to copy?" and "does it have a custom
/// cloner?", memoizing the first answer.
pub(crate) struct Classifier {
    host: Host,
    safe: SafeTypeTable,
    custom: CustomClonerTable,
    memo: DashMap<TypeId, bool, FxBuildHasher>,
}

impl Classifier {
    pub fn new(host: Host, safe: SafeTypeTable, custom: CustomClonerTable) -> Self {
        Classifier {
            host,
            safe,
            custom,
            memo: DashMap::with_hasher(FxBuildHasher),
        }
    }

    pub fn safe_types(&self) -> &SafeTypeTable {
        &self.safe
    }

    pub fn custom_cloners(&self) -> &CustomClonerTable {
        &self.custom
    }

    /// Check if values of `ty` are returned unchanged by every clone.
    ///
    /// First match wins:
    /// 1. `ty` or its generic definition is in the safe-type table.
    /// 2. Value types: primitives, enums, pointer-sized integers and
    ///    marshal handles are safe; `Nullable<U>` is safe when `U` is; a
    ///    struct is safe when all of its fields are shared.
    /// 3. Reference types in the exception, delegate or expression-tree
    ///    families are safe.
    pub fn is_safe_to_copy(&self, ty: TypeId) -> Result<bool, CloneError> {
        if let Some(known) = self.memo.get(&ty) {
            return Ok(*known);
        }
        let desc = self.host.get(ty)?;
        let safe = self.classify(&desc)?;
        self.memo.insert(ty, safe);
        Ok(safe)
    }

    fn classify(&self, desc: &TypeDescriptor) -> Result<bool, CloneError> {
        if self.safe.contains(desc) {
            return Ok(true);
        }
        let flags = desc.flags();
        if flags.is_value_type() {
            if flags.intersects(
                TypeFlags::PRIMITIVE
                    | TypeFlags::ENUM
                    | TypeFlags::POINTER_SIZED
                    | TypeFlags::MARSHAL_BY_REF,
            ) {
                return Ok(true);
            }
            return match desc.kind() {
                TypeKind::Nullable { inner } => self.is_safe_to_copy(*inner),
                TypeKind::Struct => self.all_shared(desc),
                _ => Ok(false),
            };
        }
        Ok(flags.in_opaque_family())
    }

    fn all_shared(&self, desc: &TypeDescriptor) -> Result<bool, CloneError> {
        for field in desc.declared_fields() {
            if !self.is_shared(field.ty)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Check if a field or element of `ty` can be copied without recursion:
    /// safe and not handled by a custom cloner.
    pub fn is_shared(&self, ty: TypeId) -> Result<bool, CloneError> {
        Ok(self.is_safe_to_copy(ty)? && !self.has_custom_cloner(ty)?)
    }

    pub fn has_custom_cloner(&self, ty: TypeId) -> Result<bool, CloneError> {
        let desc = self.host.get(ty)?;
        Ok(self.custom.find(&desc).is_some())
    }

    /// Factory registered for `desc`, by exact type then generic definition.
    pub fn custom_factory(&self, desc: &TypeDescriptor) -> Option<&ClonerFactory> {
        self.custom.find(desc)
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("safe", &self.safe.len())
            .field("custom", &self.custom.len())
            .field("memoized", &self.memo.len())
            .finish()
    }
}
