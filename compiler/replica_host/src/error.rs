//! Errors raised by the host reflection facility.

use std::sync::Arc;

use crate::{GenericDef, TypeId};

/// Failure of a registry, allocation, or field-access operation.
///
/// Names are captured at the point of failure so the error stays readable
/// without access to the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("unknown type handle {0:?}")]
    UnknownType(TypeId),

    #[error("unknown generic definition {0:?}")]
    UnknownDefinition(GenericDef),

    #[error("type `{0}` is declared but not yet defined")]
    Undefined(Arc<str>),

    #[error("type `{0}` is already defined")]
    AlreadyDefined(Arc<str>),

    #[error("a type named `{0}` already exists")]
    DuplicateName(Arc<str>),

    #[error("`{derived}` cannot derive from `{base}`: {reason}")]
    InvalidBase {
        derived: Arc<str>,
        base: Arc<str>,
        reason: &'static str,
    },

    #[error("`{0}` is not an interface")]
    NotAnInterface(Arc<str>),

    #[error("invalid definition of `{ty}`: {reason}")]
    InvalidDefinition { ty: Arc<str>, reason: &'static str },

    #[error("struct `{0}` contains itself by value")]
    RecursiveStruct(Arc<str>),

    #[error("array rank {0} is outside 1..=32")]
    InvalidRank(usize),

    #[error("`{name}` expects {expected} type arguments, got {found}")]
    Arity {
        name: Arc<str>,
        expected: usize,
        found: usize,
    },

    #[error("`{argument}` is not a valid argument for `{definition}`: {reason}")]
    InvalidTypeArgument {
        definition: Arc<str>,
        argument: Arc<str>,
        reason: &'static str,
    },

    #[error("`{0}` cannot be instantiated")]
    NotInstantiable(Arc<str>),

    #[error("`{0}` does not permit allocation without a constructor")]
    RawAllocationDenied(Arc<str>),

    #[error("`{0}` has no parameterless constructor")]
    NoConstructor(Arc<str>),

    #[error("constructor of `{ty}` failed: {message}")]
    Constructor { ty: Arc<str>, message: Arc<str> },

    #[error("type `{ty}` has no field `{field}`")]
    NoSuchField { ty: Arc<str>, field: Arc<str> },

    #[error("slot {slot} is out of range for `{ty}`")]
    SlotOutOfRange { ty: Arc<str>, slot: usize },

    #[error("index {index:?} is out of range for `{ty}`")]
    IndexOutOfRange { ty: Arc<str>, index: Box<[usize]> },

    #[error("`{ty}` does not use {expected} layout")]
    LayoutMismatch { ty: Arc<str>, expected: &'static str },

    #[error("array has rank {expected}, got {found} indices or lengths")]
    RankMismatch { expected: usize, found: usize },

    #[error("shape holds {expected} elements, got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("value of type `{found}` is not assignable to `{expected}`")]
    NotAssignable { expected: Arc<str>, found: Arc<str> },
}

impl HostError {
    /// Build a constructor failure from any displayable message.
    pub fn constructor(ty: &Arc<str>, message: impl std::fmt::Display) -> Self {
        HostError::Constructor {
            ty: Arc::clone(ty),
            message: message.to_string().into(),
        }
    }
}
