//! Field planning: the flat, ordered field list of a type.


use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use replica_host::{FieldDef, Host, TypeId};

use crate::CloneError;

/// Collects and memoizes the instance fields of each type.
pub(crate) struct FieldPlanner {
    host: Host,
    memo: DashMap<TypeId, Arc<[FieldDef]>, FxBuildHasher>,
}

impl FieldPlanner {
    pub fn new(host: Host) -> Self {
        FieldPlanner {
            host,
            memo: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Instance fields of `ty` at every visibility.
    ///
    /// Value types have no inheritance chain, so this is their own declared
    /// fields. For reference types the base chain is walked up to, but not
    /// including, the top type; fields come base-first, in declaration order
    /// within each level, which is also slot order.
    pub fn collect_fields(&self, ty: TypeId) -> Result<Arc<[FieldDef]>, CloneError> {
        if let Some(fields) = self.memo.get(&ty) {
            return Ok(Arc::clone(&fields));
        }

        let desc = self.host.get(ty)?;
        let fields: Arc<[FieldDef]> = if desc.is_value_type() {
            desc.declared_fields().into()
        } else {
            let mut levels = Vec::new();
            let mut current = Some(desc);
            while let Some(level) = current {
                if level.is_object_root() {
                    break;
                }
                current = level.base().map(|base| self.host.get(base)).transpose()?;
                levels.push(level);
            }
            levels
                .iter()
                .rev()
                .flat_map(|level| level.declared_fields().iter().cloned())
                .collect()
        };

        tracing::trace!(ty = ty.raw(), count = fields.len(), "planned fields");
        Ok(Arc::clone(self.memo.entry(ty).or_insert(fields).value()))
    }
}
