//! Compiled clone plans.
//!
//! A plan is the interpreted form of a per-type clone procedure: built once
//! when the type is first used, then executed on every call. Plans never
//! embed the plans of nested types. A step names the nested type and the
//! executor resolves it through the caches, so self-referential types
//! compile without recursion.

use std::fmt;
use std::sync::Arc;

use replica_host::TypeId;

use crate::{CloneError, CustomProcedure};

/// Which of the two procedures of a type to run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// New top-level container, interior payload shared.
    Shallow,
    /// Entire reachable non-safe graph duplicated.
    Deep,
}

/// The shallow and deep plans of one type.
pub(crate) struct ClonerPair {
    pub ty: TypeId,
    pub name: Arc<str>,
    pub shallow: Plan,
    pub deep: Plan,
}

impl ClonerPair {
    #[inline]
    pub fn plan(&self, mode: Mode) -> &Plan {
        match mode {
            Mode::Shallow => &self.shallow,
            Mode::Deep => &self.deep,
        }
    }
}

impl fmt::Debug for ClonerPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClonerPair")
            .field("ty", &self.ty)
            .field("name", &self.name)
            .field("shallow", &self.shallow)
            .field("deep", &self.deep)
            .finish()
    }
}

/// How a nested field or element value is resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Dispatch {
    /// The declared type is concrete: use its own plan.
    Typed,
    /// The declared type is open: use the plan of the value's runtime type.
    Runtime,
}

/// One field that must be cloned rather than shared.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct FieldStep {
    pub slot: usize,
    /// Declared field type.
    pub ty: TypeId,
    pub dispatch: Dispatch,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ElementStep {
    pub ty: TypeId,
    pub dispatch: Dispatch,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ArrayPlan {
    pub rank: usize,
    /// `None` copies elements without recursion.
    pub element: Option<ElementStep>,
}

/// How the target object of a deep object clone is allocated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum AllocPath {
    Constructor,
    Raw,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FieldCopy {
    /// Every field is shared: copy the whole slot block.
    Wholesale,
    /// Copy the slot block, then overwrite these slots with clones.
    PerField(Box<[FieldStep]>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ObjectPlan {
    pub alloc: AllocPath,
    pub fields: FieldCopy,
}

/// Interpreted clone procedure for one type and mode.
#[derive(Clone)]
pub(crate) enum Plan {
    /// Return the input unchanged.
    Identity,
    /// Allocate a fresh empty instance of the top type.
    FreshObject,
    /// Dedicated procedure from the custom cloner table.
    Custom(CustomProcedure),
    /// Clone the payload of a nullable with the inner type's plan.
    Nullable { inner: TypeId },
    /// Copy a struct value whose fields are all shared.
    StructCopy,
    /// Copy a struct value, then clone the listed fields.
    StructFields { steps: Box<[FieldStep]> },
    /// Use the plan of the value's runtime type.
    RuntimeDispatch,
    Array(ArrayPlan),
    Object(ObjectPlan),
    /// Field-level duplicate of the object, no constructor, children shared.
    Duplicate,
    /// Configuration error replayed on every call.
    Fail(CloneError),
}

impl Plan {
    /// Short strategy name for logs and introspection.
    pub fn name(&self) -> &'static str {
        match self {
            Plan::Identity => "identity",
            Plan::FreshObject => "fresh-object",
            Plan::Custom(_) => "custom",
            Plan::Nullable { .. } => "nullable",
            Plan::StructCopy => "struct-copy",
            Plan::StructFields { .. } => "struct-fields",
            Plan::RuntimeDispatch => "runtime-dispatch",
            Plan::Array(ArrayPlan { element: None, .. }) => "array-copy",
            Plan::Array(ArrayPlan { element: Some(_), .. }) => "array-clone",
            Plan::Object(ObjectPlan {
                fields: FieldCopy::Wholesale,
                ..
            }) => "object-wholesale",
            Plan::Object(ObjectPlan {
                fields: FieldCopy::PerField(_),
                ..
            }) => "object-fields",
            Plan::Duplicate => "duplicate",
            Plan::Fail(_) => "fail",
        }
    }
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plan::Custom(_) => f.write_str("Custom(..)"),
            Plan::Nullable { inner } => f.debug_struct("Nullable").field("inner", inner).finish(),
            Plan::StructFields { steps } => f.debug_tuple("StructFields").field(steps).finish(),
            Plan::Array(plan) => f.debug_tuple("Array").field(plan).finish(),
            Plan::Object(plan) => f.debug_tuple("Object").field(plan).finish(),
            Plan::Fail(err) => f.debug_tuple("Fail").field(err).finish(),
            other => f.write_str(other.name()),
        }
    }
}
