//! Type descriptors: the read-only, process-lifetime description of a type.
//!
//! A descriptor is built once by the registry and shared as
//! `Arc<TypeDescriptor>`. Nothing in it changes after publication.

use std::fmt;
use std::sync::Arc;

use crate::{GenericDef, Host, HostError, TypeFlags, TypeId, Value};

/// Built-in scalar kinds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Primitive {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    ISize,
    USize,
}

impl Primitive {
    /// Every primitive, in well-known `TypeId` order.
    pub const ALL: [Primitive; 14] = [
        Primitive::Bool,
        Primitive::Char,
        Primitive::I8,
        Primitive::I16,
        Primitive::I32,
        Primitive::I64,
        Primitive::U8,
        Primitive::U16,
        Primitive::U32,
        Primitive::U64,
        Primitive::F32,
        Primitive::F64,
        Primitive::ISize,
        Primitive::USize,
    ];

    /// Canonical type name.
    pub const fn name(self) -> &'static str {
        match self {
            Primitive::Bool => "Boolean",
            Primitive::Char => "Char",
            Primitive::I8 => "SByte",
            Primitive::I16 => "Int16",
            Primitive::I32 => "Int32",
            Primitive::I64 => "Int64",
            Primitive::U8 => "Byte",
            Primitive::U16 => "UInt16",
            Primitive::U32 => "UInt32",
            Primitive::U64 => "UInt64",
            Primitive::F32 => "Single",
            Primitive::F64 => "Double",
            Primitive::ISize => "IntPtr",
            Primitive::USize => "UIntPtr",
        }
    }

    /// Well-known handle of this primitive.
    pub const fn type_id(self) -> TypeId {
        match self {
            Primitive::Bool => TypeId::BOOL,
            Primitive::Char => TypeId::CHAR,
            Primitive::I8 => TypeId::I8,
            Primitive::I16 => TypeId::I16,
            Primitive::I32 => TypeId::I32,
            Primitive::I64 => TypeId::I64,
            Primitive::U8 => TypeId::U8,
            Primitive::U16 => TypeId::U16,
            Primitive::U32 => TypeId::U32,
            Primitive::U64 => TypeId::U64,
            Primitive::F32 => TypeId::F32,
            Primitive::F64 => TypeId::F64,
            Primitive::ISize => TypeId::ISIZE,
            Primitive::USize => TypeId::USIZE,
        }
    }

    /// Check if the primitive is pointer-sized.
    pub const fn is_pointer_sized(self) -> bool {
        matches!(self, Primitive::ISize | Primitive::USize)
    }

    /// Zero value of this primitive.
    pub fn zero(self) -> Value {
        match self {
            Primitive::Bool => Value::Bool(false),
            Primitive::Char => Value::Char('\0'),
            Primitive::I8 => Value::I8(0),
            Primitive::I16 => Value::I16(0),
            Primitive::I32 => Value::I32(0),
            Primitive::I64 => Value::I64(0),
            Primitive::U8 => Value::U8(0),
            Primitive::U16 => Value::U16(0),
            Primitive::U32 => Value::U32(0),
            Primitive::U64 => Value::U64(0),
            Primitive::F32 => Value::F32(0.0),
            Primitive::F64 => Value::F64(0.0),
            Primitive::ISize => Value::ISize(0),
            Primitive::USize => Value::USize(0),
        }
    }
}

/// The kind of a type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeKind {
    /// Built-in scalar value.
    Primitive(Primitive),
    /// Marshal-by-reference value handle.
    Handle,
    /// Integral constant set, stored as its underlying primitive.
    Enum { underlying: Primitive },
    /// User value type with inline fields.
    Struct,
    /// `Nullable<inner>`.
    Nullable { inner: TypeId },
    /// Reference type (concrete or abstract).
    Class,
    /// Interface.
    Interface,
    /// Array of `rank` dimensions.
    Array { element: TypeId, rank: u8 },
}

/// Shape of a native collection body.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CollectionShape {
    /// Sequence of elements.
    Items,
    /// Sequence of key/value (or element/priority) pairs.
    Pairs,
}

/// How instances of a type are laid out in memory.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Layout {
    /// Value type stored inside a `Value`.
    Inline,
    /// Heap object with one slot per instance field.
    Fields,
    /// Immutable string body.
    Str,
    /// Array body.
    Array,
    /// Native collection body.
    Collection(CollectionShape),
    /// Host-owned payload the engine never looks into.
    Opaque,
    /// Interfaces have no layout of their own.
    None,
}

impl Layout {
    /// Short name used in errors.
    pub const fn describe(self) -> &'static str {
        match self {
            Layout::Inline => "inline",
            Layout::Fields => "fields",
            Layout::Str => "string",
            Layout::Array => "array",
            Layout::Collection(CollectionShape::Items) => "item collection",
            Layout::Collection(CollectionShape::Pairs) => "pair collection",
            Layout::Opaque => "opaque",
            Layout::None => "no",
        }
    }
}

/// Visibility of a field.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Internal,
    Private,
}

/// Declared instance field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDef {
    /// Field name.
    pub name: Arc<str>,
    /// Declared field type.
    pub ty: TypeId,
    /// Field visibility.
    pub visibility: Visibility,
    /// Storage slot in the instance (inherited slots come first).
    pub slot: usize,
}

/// Parameterless constructor: receives default-initialized slots.
pub type Constructor = Arc<dyn Fn(&Host, &mut [Value]) -> Result<(), HostError> + Send + Sync>;

/// How a reference type can be brought into existence.
#[derive(Clone, Default)]
pub struct Allocation {
    /// Parameterless constructor, if the type has one.
    pub constructor: Option<Constructor>,
    /// Whether slots may be allocated without running any constructor.
    pub raw: bool,
}

impl fmt::Debug for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocation")
            .field("constructor", &self.constructor.is_some())
            .field("raw", &self.raw)
            .finish()
    }
}

/// A closed generic type: definition plus concrete arguments.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct GenericInstance {
    pub definition: GenericDef,
    pub args: Box<[TypeId]>,
}

/// Published description of a type.
#[derive(Debug)]
pub struct TypeDescriptor {
    pub(crate) id: TypeId,
    pub(crate) name: Arc<str>,
    pub(crate) kind: TypeKind,
    pub(crate) flags: TypeFlags,
    pub(crate) base: Option<TypeId>,
    pub(crate) interfaces: Box<[TypeId]>,
    pub(crate) generic: Option<GenericInstance>,
    pub(crate) fields: Box<[FieldDef]>,
    pub(crate) slot_count: usize,
    pub(crate) layout: Layout,
    pub(crate) allocation: Allocation,
}

impl TypeDescriptor {
    /// Handle of this type.
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Display name (`Dictionary<Int32, String>`, `Node[,]`, ...).
    #[inline]
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    #[inline]
    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    /// Direct base class. `None` for the top type, value types and interfaces.
    #[inline]
    pub fn base(&self) -> Option<TypeId> {
        self.base
    }

    /// Directly implemented (or, for interfaces, extended) interfaces.
    #[inline]
    pub fn interfaces(&self) -> &[TypeId] {
        &self.interfaces
    }

    /// Generic instance, if this type closes a generic definition.
    #[inline]
    pub fn generic(&self) -> Option<&GenericInstance> {
        self.generic.as_ref()
    }

    /// Open generic definition, if any.
    #[inline]
    pub fn definition(&self) -> Option<GenericDef> {
        self.generic.as_ref().map(|g| g.definition)
    }

    /// Generic arguments (empty for non-generic types).
    #[inline]
    pub fn generic_args(&self) -> &[TypeId] {
        self.generic.as_ref().map_or(&[], |g| &g.args)
    }

    /// Fields declared by this type itself, in declaration order.
    ///
    /// Inherited fields are not included; walk `base()` to reach them.
    #[inline]
    pub fn declared_fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Total number of instance slots, inherited ones included.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[inline]
    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    /// Element type and rank, if this is an array type.
    #[inline]
    pub fn array(&self) -> Option<(TypeId, usize)> {
        match self.kind {
            TypeKind::Array { element, rank } => Some((element, usize::from(rank))),
            _ => None,
        }
    }

    /// Inner type, if this is `Nullable<T>`.
    #[inline]
    pub fn nullable_inner(&self) -> Option<TypeId> {
        match self.kind {
            TypeKind::Nullable { inner } => Some(inner),
            _ => None,
        }
    }

    #[inline]
    pub fn is_value_type(&self) -> bool {
        self.flags.is_value_type()
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        self.flags.contains(TypeFlags::INTERFACE)
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(TypeFlags::ABSTRACT)
    }

    #[inline]
    pub fn is_object_root(&self) -> bool {
        self.flags.contains(TypeFlags::OBJECT_ROOT)
    }
}
