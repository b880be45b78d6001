//! Strategy compiler: the per-type decision of how to clone.
//!
//! Deep policy, first match wins:
//! 1. a custom cloner is registered for the type or its definition
//! 2. the type is safe to copy
//! 3. `Nullable<U>`
//! 4. struct (plain copy when every field is shared)
//! 5. interface, abstract class or the top type: dispatch on the runtime
//!    type of each value
//! 6. array
//! 7. concrete class: allocate, then copy or clone each field
//!
//! The shallow policy follows the same shape but never recurses.

mod arrays;

pub use arrays::MAX_CLONED_RANK;


use std::sync::Arc;

use replica_host::{Host, Layout, TypeDescriptor, TypeId, TypeKind};

use crate::classify::Classifier;
use crate::fields::FieldPlanner;
use crate::plan::{AllocPath, ClonerPair, Dispatch, FieldCopy, FieldStep, Mode, ObjectPlan, Plan};
use crate::CloneError;

/// Builds [`ClonerPair`]s from descriptors.
///
/// Compilation only reads descriptors and tables. It never consults the
/// plan caches, so it can run while a cache entry for the same type is
/// being filled.
pub(crate) struct Compiler<'a> {
    host: &'a Host,
    classifier: &'a Classifier,
    fields: &'a FieldPlanner,
}

impl<'a> Compiler<'a> {
    pub fn new(host: &'a Host, classifier: &'a Classifier, fields: &'a FieldPlanner) -> Self {
        Compiler {
            host,
            classifier,
            fields,
        }
    }

    /// Compile both plans of `ty`.
    ///
    /// Configuration errors (no allocation path, unsupported layout, a
    /// failing cloner factory) become a [`Plan::Fail`] deep plan, so they
    /// are raised on every deep clone of the type without recompiling.
    #[tracing::instrument(level = "debug", skip(self), fields(ty = ty.raw()))]
    pub fn compile(&self, ty: TypeId) -> Result<ClonerPair, CloneError> {
        let desc = self.host.get(ty)?;
        let deep = self.deep_plan(&desc)?;
        let shallow = self.shallow_plan(&desc)?;

        if let Plan::Fail(err) = &deep {
            tracing::warn!(ty = %desc.name(), %err, "deep clone of type is unavailable");
        }
        tracing::debug!(
            ty = %desc.name(),
            shallow = shallow.name(),
            deep = deep.name(),
            "compiled clone plans"
        );

        Ok(ClonerPair {
            ty,
            name: Arc::clone(desc.name()),
            shallow,
            deep,
        })
    }

    fn deep_plan(&self, desc: &TypeDescriptor) -> Result<Plan, CloneError> {
        if let Some(factory) = self.classifier.custom_factory(desc) {
            return Ok(match factory(self.host, desc.generic_args()) {
                Ok(procedure) => Plan::Custom(procedure),
                Err(err) => Plan::Fail(err),
            });
        }
        if self.classifier.is_safe_to_copy(desc.id())? {
            return Ok(Plan::Identity);
        }
        match *desc.kind() {
            TypeKind::Nullable { inner } => Ok(Plan::Nullable { inner }),
            TypeKind::Struct => {
                let steps = self.field_steps(desc.id())?;
                Ok(if steps.is_empty() {
                    Plan::StructCopy
                } else {
                    Plan::StructFields { steps }
                })
            }
            _ if desc.flags().is_open() => Ok(Plan::RuntimeDispatch),
            TypeKind::Array { element, rank } => {
                self.array_plan(element, usize::from(rank), Mode::Deep)
            }
            TypeKind::Class => self.object_plan(desc),
            // Scalars, handles and enums are always safe.
            TypeKind::Primitive(_)
            | TypeKind::Handle
            | TypeKind::Enum { .. }
            | TypeKind::Interface => Ok(Plan::Identity),
        }
    }

    fn shallow_plan(&self, desc: &TypeDescriptor) -> Result<Plan, CloneError> {
        if self.classifier.is_safe_to_copy(desc.id())? {
            return Ok(Plan::Identity);
        }
        match *desc.kind() {
            TypeKind::Struct => Ok(Plan::StructCopy),
            _ if desc.flags().is_open() => Ok(Plan::RuntimeDispatch),
            TypeKind::Array { element, rank } => {
                self.array_plan(element, usize::from(rank), Mode::Shallow)
            }
            TypeKind::Class => Ok(Plan::Duplicate),
            TypeKind::Nullable { .. }
            | TypeKind::Primitive(_)
            | TypeKind::Handle
            | TypeKind::Enum { .. }
            | TypeKind::Interface => Ok(Plan::Identity),
        }
    }

    fn object_plan(&self, desc: &TypeDescriptor) -> Result<Plan, CloneError> {
        match desc.layout() {
            Layout::Fields => {}
            // Strings are immutable and opaque payloads are never looked
            // into: a duplicate of the object is the deepest clone there is.
            Layout::Str | Layout::Opaque => return Ok(Plan::Duplicate),
            layout => {
                return Ok(Plan::Fail(CloneError::UnsupportedLayout {
                    ty: desc.id(),
                    name: Arc::clone(desc.name()),
                    layout: layout.describe(),
                }))
            }
        }

        let allocation = desc.allocation();
        let alloc = if allocation.constructor.is_some() {
            AllocPath::Constructor
        } else if allocation.raw {
            AllocPath::Raw
        } else {
            return Ok(Plan::Fail(CloneError::NoAllocationPath {
                ty: desc.id(),
                name: Arc::clone(desc.name()),
            }));
        };

        let steps = self.field_steps(desc.id())?;
        let fields = if steps.is_empty() {
            FieldCopy::Wholesale
        } else {
            FieldCopy::PerField(steps)
        };
        Ok(Plan::Object(ObjectPlan { alloc, fields }))
    }

    /// Steps for every field of `ty` that must be cloned rather than shared.
    fn field_steps(&self, ty: TypeId) -> Result<Box<[FieldStep]>, CloneError> {
        let mut steps = Vec::new();
        for field in self.fields.collect_fields(ty)?.iter() {
            if !self.classifier.is_shared(field.ty)? {
                steps.push(FieldStep {
                    slot: field.slot,
                    ty: field.ty,
                    dispatch: self.dispatch_for(field.ty)?,
                });
            }
        }
        Ok(steps.into_boxed_slice())
    }

    fn dispatch_for(&self, ty: TypeId) -> Result<Dispatch, CloneError> {
        Ok(if self.host.get(ty)?.flags().is_open() {
            Dispatch::Runtime
        } else {
            Dispatch::Typed
        })
    }
}
