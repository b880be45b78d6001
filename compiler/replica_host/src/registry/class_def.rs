//! Builders for user type definitions.
//!
//! A builder only records what the caller asked for. All validation
//! (base rules, field types, struct self-containment) happens in the
//! registry when the definition is published.

use std::sync::Arc;

use crate::{CollectionShape, Constructor, Host, HostError, TypeId, Value, Visibility};

/// Field as written in a definition, before slots are assigned.
#[derive(Clone, Debug)]
pub(crate) struct PendingField {
    pub(crate) name: Arc<str>,
    pub(crate) ty: TypeId,
    pub(crate) visibility: Visibility,
}

/// Requested body layout of a class.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) enum ClassLayout {
    #[default]
    Fields,
    Collection(CollectionShape),
    Opaque,
}

/// Definition of a reference type.
///
/// ```text
/// ClassDef::new("Employee")
///     .extends(person)
///     .field("manager", person)
///     .private_field("salary", TypeId::F64)
/// ```
#[derive(Clone)]
pub struct ClassDef {
    pub(crate) name: Arc<str>,
    pub(crate) base: Option<TypeId>,
    pub(crate) interfaces: Vec<TypeId>,
    pub(crate) fields: Vec<PendingField>,
    pub(crate) is_abstract: bool,
    pub(crate) sealed: bool,
    pub(crate) constructor: Option<Constructor>,
    pub(crate) raw: bool,
    pub(crate) layout: ClassLayout,
}

impl ClassDef {
    /// Start a class deriving from the top reference type.
    ///
    /// Classes allow raw allocation unless
    /// [`without_raw_allocation`](Self::without_raw_allocation) is called.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        ClassDef {
            name: name.into(),
            base: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            is_abstract: false,
            sealed: false,
            constructor: None,
            raw: true,
            layout: ClassLayout::Fields,
        }
    }

    #[must_use]
    pub fn extends(mut self, base: TypeId) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub fn implements(mut self, interface: TypeId) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Add a public field.
    #[must_use]
    pub fn field(self, name: impl Into<Arc<str>>, ty: TypeId) -> Self {
        self.field_with(name, ty, Visibility::Public)
    }

    #[must_use]
    pub fn private_field(self, name: impl Into<Arc<str>>, ty: TypeId) -> Self {
        self.field_with(name, ty, Visibility::Private)
    }

    #[must_use]
    pub fn field_with(
        mut self,
        name: impl Into<Arc<str>>,
        ty: TypeId,
        visibility: Visibility,
    ) -> Self {
        self.fields.push(PendingField {
            name: name.into(),
            ty,
            visibility,
        });
        self
    }

    #[must_use]
    pub fn make_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn sealed(mut self) -> Self {
        self.sealed = true;
        self
    }

    /// Attach a parameterless constructor.
    ///
    /// The closure receives every instance slot (inherited ones first),
    /// already holding default values.
    #[must_use]
    pub fn constructor<F>(mut self, ctor: F) -> Self
    where
        F: Fn(&Host, &mut [Value]) -> Result<(), HostError> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(ctor));
        self
    }

    /// Forbid allocation that bypasses the constructor.
    #[must_use]
    pub fn without_raw_allocation(mut self) -> Self {
        self.raw = false;
        self
    }

    /// Store instances as a native collection body instead of field slots.
    #[must_use]
    pub fn collection(mut self, shape: CollectionShape) -> Self {
        self.layout = ClassLayout::Collection(shape);
        self
    }

    /// Store instances as a host payload the engine never inspects.
    #[must_use]
    pub fn opaque(mut self) -> Self {
        self.layout = ClassLayout::Opaque;
        self
    }

    pub fn name(&self) -> &Arc<str> {
        &self.name
    }
}

/// Definition of a user value type.
#[derive(Clone, Debug)]
pub struct StructDef {
    pub(crate) name: Arc<str>,
    pub(crate) interfaces: Vec<TypeId>,
    pub(crate) fields: Vec<PendingField>,
}

impl StructDef {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        StructDef {
            name: name.into(),
            interfaces: Vec::new(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn implements(mut self, interface: TypeId) -> Self {
        self.interfaces.push(interface);
        self
    }

    #[must_use]
    pub fn field(self, name: impl Into<Arc<str>>, ty: TypeId) -> Self {
        self.field_with(name, ty, Visibility::Public)
    }

    #[must_use]
    pub fn private_field(self, name: impl Into<Arc<str>>, ty: TypeId) -> Self {
        self.field_with(name, ty, Visibility::Private)
    }

    #[must_use]
    pub fn field_with(
        mut self,
        name: impl Into<Arc<str>>,
        ty: TypeId,
        visibility: Visibility,
    ) -> Self {
        self.fields.push(PendingField {
            name: name.into(),
            ty,
            visibility,
        });
        self
    }

    pub fn name(&self) -> &Arc<str> {
        &self.name
    }
}
