//! Mapping from native Rust types onto registry types.

use crate::{Body, ObjRef, TypeId, Value};

/// A Rust type with a fixed counterpart in every registry.
///
/// Lets callers use typed entry points with native values:
///
/// ```text
/// let copy: i32 = cloner.deep(42)?;
/// ```
pub trait Reflect: Sized {
    /// Registry type of `Self`.
    const TYPE: TypeId;

    fn into_value(self) -> Value;

    /// Recover `Self`; `None` when the value has another shape.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_reflect_primitive {
    ($($ty:ty => $variant:ident, $id:ident);* $(;)?) => {
        $(
            impl Reflect for $ty {
                const TYPE: TypeId = TypeId::$id;

                #[inline]
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                #[inline]
                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_reflect_primitive! {
    bool => Bool, BOOL;
    char => Char, CHAR;
    i8 => I8, I8;
    i16 => I16, I16;
    i32 => I32, I32;
    i64 => I64, I64;
    u8 => U8, U8;
    u16 => U16, U16;
    u32 => U32, U32;
    u64 => U64, U64;
    f32 => F32, F32;
    f64 => F64, F64;
    isize => ISize, ISIZE;
    usize => USize, USIZE;
}

impl Reflect for String {
    const TYPE: TypeId = TypeId::STRING;

    fn into_value(self) -> Value {
        Value::Ref(ObjRef::new(TypeId::STRING, Body::Str(self.into())))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Ref(obj) => match obj.snapshot() {
                Body::Str(s) => Some(s.to_string()),
                _ => None,
            },
            _ => None,
        }
    }
}
