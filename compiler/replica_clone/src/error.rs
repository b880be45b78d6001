//! Errors raised while compiling or running clone plans.

use std::fmt;
use std::sync::Arc;

use replica_host::{HostError, TypeId};

/// Failure of a clone call.
///
/// Configuration errors (`NoAllocationPath`, `UnsupportedLayout`) are
/// produced when a type is first compiled and replayed from the cache on
/// every later call, which is why the type is `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CloneError {
    #[error("`{name}` has neither a parameterless constructor nor raw allocation")]
    NoAllocationPath { ty: TypeId, name: Arc<str> },

    #[error("`{name}` uses {layout} layout, which has no deep clone procedure")]
    UnsupportedLayout {
        ty: TypeId,
        name: Arc<str>,
        layout: &'static str,
    },

    #[error("expected a value of `{expected}`, got `{found}`")]
    TypeMismatch { expected: Arc<str>, found: Arc<str> },

    #[error("plan for `{ty}` expected {expected}, got {found}")]
    ShapeMismatch {
        ty: Arc<str>,
        expected: &'static str,
        found: &'static str,
    },

    #[error("clone recursion exceeded the depth limit of {limit}")]
    DepthExceeded { limit: usize },

    #[error(transparent)]
    Host(#[from] HostError),

    /// Raised by a custom procedure or cloner factory.
    #[error("{0}")]
    Custom(Arc<str>),
}

impl CloneError {
    /// Error for custom procedures and factories.
    pub fn custom(message: impl fmt::Display) -> Self {
        CloneError::Custom(message.to_string().into())
    }

    /// Check if this error is a per-type configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CloneError::NoAllocationPath { .. } | CloneError::UnsupportedLayout { .. }
        )
    }
}
