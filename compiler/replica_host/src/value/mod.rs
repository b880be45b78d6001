//! Runtime value model.
//!
//! Inline values (primitives, enums, structs, nullables) are copied on
//! assignment. Reference types live on the heap behind [`ObjRef`] and have
//! identity: two `Value::Ref`s are equal only if they point at the same
//! object. Use [`Value::equivalent`] for structural comparison.

mod equivalent;
mod object;


pub use object::{ArrayData, Body, CollectionData, ObjRef};

use std::fmt;

use crate::TypeId;

/// A value of any type.
#[derive(Clone, Default)]
pub enum Value {
    /// Null reference, also the default of every reference type.
    #[default]
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    ISize(isize),
    USize(usize),
    /// Marshal-by-reference handle.
    Handle(u64),
    Enum(EnumValue),
    Struct(StructValue),
    /// `Nullable<T>`: `None` when it has no value.
    Nullable(Option<Box<Value>>),
    Ref(ObjRef),
}

/// Enum value stored as its underlying integer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub ty: TypeId,
    pub bits: i64,
}

/// Inline value-type instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructValue {
    pub ty: TypeId,
    pub fields: Box<[Value]>,
}

impl Value {
    /// Check if this is the null reference.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_obj(&self) -> Option<&ObjRef> {
        match self {
            Value::Ref(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// A nullable holding `inner`.
    pub fn some(inner: Value) -> Self {
        Value::Nullable(Some(Box::new(inner)))
    }

    /// A nullable without a value.
    pub const fn none() -> Self {
        Value::Nullable(None)
    }

    /// Short type-category name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::I8(_)
            | Value::I16(_)
            | Value::I32(_)
            | Value::I64(_)
            | Value::ISize(_) => "signed integer",
            Value::U8(_)
            | Value::U16(_)
            | Value::U32(_)
            | Value::U64(_)
            | Value::USize(_) => "unsigned integer",
            Value::F32(_) | Value::F64(_) => "float",
            Value::Handle(_) => "handle",
            Value::Enum(_) => "enum",
            Value::Struct(_) => "struct",
            Value::Nullable(_) => "nullable",
            Value::Ref(_) => "reference",
        }
    }
}

// Floats compare by bit pattern so that equality stays reflexive.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a.to_bits() == b.to_bits(),
            (Value::F64(a), Value::F64(b)) => a.to_bits() == b.to_bits(),
            (Value::ISize(a), Value::ISize(b)) => a == b,
            (Value::USize(a), Value::USize(b)) => a == b,
            (Value::Handle(a), Value::Handle(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => a == b,
            (Value::Nullable(a), Value::Nullable(b)) => a == b,
            (Value::Ref(a), Value::Ref(b)) => ObjRef::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(v) => write!(f, "Bool({v})"),
            Value::Char(v) => write!(f, "Char({v:?})"),
            Value::I8(v) => write!(f, "I8({v})"),
            Value::I16(v) => write!(f, "I16({v})"),
            Value::I32(v) => write!(f, "I32({v})"),
            Value::I64(v) => write!(f, "I64({v})"),
            Value::U8(v) => write!(f, "U8({v})"),
            Value::U16(v) => write!(f, "U16({v})"),
            Value::U32(v) => write!(f, "U32({v})"),
            Value::U64(v) => write!(f, "U64({v})"),
            Value::F32(v) => write!(f, "F32({v:?})"),
            Value::F64(v) => write!(f, "F64({v:?})"),
            Value::ISize(v) => write!(f, "ISize({v})"),
            Value::USize(v) => write!(f, "USize({v})"),
            Value::Handle(v) => write!(f, "Handle({v:#x})"),
            Value::Enum(e) => write!(f, "Enum({:?}, {})", e.ty, e.bits),
            Value::Struct(s) => f
                .debug_struct("Struct")
                .field("ty", &s.ty)
                .field("fields", &s.fields)
                .finish(),
            Value::Nullable(None) => f.write_str("Nullable(None)"),
            Value::Nullable(Some(inner)) => write!(f, "Nullable({inner:?})"),
            // Never print through a reference: graphs may be cyclic.
            Value::Ref(obj) => write!(f, "Ref({obj:?})"),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    isize => ISize,
    usize => USize,
}

impl From<ObjRef> for Value {
    fn from(obj: ObjRef) -> Self {
        Value::Ref(obj)
    }
}

impl From<StructValue> for Value {
    fn from(value: StructValue) -> Self {
        Value::Struct(value)
    }
}

impl From<EnumValue> for Value {
    fn from(value: EnumValue) -> Self {
        Value::Enum(value)
    }
}
