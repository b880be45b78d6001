//! Heap objects with reference identity.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use smallvec::SmallVec;

use super::Value;
use crate::{CollectionShape, TypeId};

/// Shared handle to a heap object.
///
/// Cloning an `ObjRef` copies the handle, not the object: equality and
/// hashing use object identity.
#[derive(Clone)]
pub struct ObjRef(Arc<HeapObject>);

struct HeapObject {
    ty: TypeId,
    body: RwLock<Body>,
}

impl ObjRef {
    pub(crate) fn new(ty: TypeId, body: Body) -> Self {
        ObjRef(Arc::new(HeapObject {
            ty,
            body: RwLock::new(body),
        }))
    }

    /// Runtime type of the object.
    #[inline]
    pub fn ty(&self) -> TypeId {
        self.0.ty
    }

    /// Check if both handles point at the same object.
    #[inline]
    pub fn ptr_eq(a: &ObjRef, b: &ObjRef) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Stable address, usable as an identity key.
    #[inline]
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }

    /// Read access to the body.
    pub fn read(&self) -> RwLockReadGuard<'_, Body> {
        self.0.body.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Body> {
        self.0.body.write()
    }

    /// Copy of the body, taken under a short read lock.
    pub fn snapshot(&self) -> Body {
        self.0.body.read().clone()
    }
}

impl PartialEq for ObjRef {
    fn eq(&self, other: &Self) -> bool {
        ObjRef::ptr_eq(self, other)
    }
}

impl Eq for ObjRef {}

impl Hash for ObjRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjRef({:?} @ {:#x})", self.ty(), self.addr())
    }
}

/// Storage of a heap object.
#[derive(Clone)]
pub enum Body {
    /// One value per instance slot, inherited slots first.
    Fields(Box<[Value]>),
    Array(ArrayData),
    Str(Arc<str>),
    Collection(CollectionData),
    /// Host payload, shared by duplicates.
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Body {
    pub fn as_fields(&self) -> Option<&[Value]> {
        match self {
            Body::Fields(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayData> {
        match self {
            Body::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Body::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&CollectionData> {
        match self {
            Body::Collection(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        match self {
            Body::Opaque(payload) => Some(payload),
            _ => None,
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
            Body::Array(array) => fmt::Debug::fmt(array, f),
            Body::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Body::Collection(data) => fmt::Debug::fmt(data, f),
            Body::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

/// Array storage: dimension lengths plus elements in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayData {
    lengths: SmallVec<[usize; 4]>,
    elements: Vec<Value>,
}

impl ArrayData {
    /// Build array storage. The caller guarantees
    /// `elements.len() == lengths.iter().product()`.
    pub(crate) fn new(lengths: &[usize], elements: Vec<Value>) -> Self {
        ArrayData {
            lengths: SmallVec::from_slice(lengths),
            elements,
        }
    }

    /// Same shape with new elements, in the same order.
    pub fn with_elements(&self, elements: Vec<Value>) -> Option<Self> {
        (elements.len() == self.elements.len()).then(|| ArrayData {
            lengths: self.lengths.clone(),
            elements,
        })
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.lengths.len()
    }

    #[inline]
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    #[inline]
    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    /// Total element count.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Row-major position of a multi-dimensional index.
    pub fn offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.lengths.len() {
            return None;
        }
        index
            .iter()
            .zip(&self.lengths)
            .try_fold(0usize, |acc, (&i, &len)| (i < len).then(|| acc * len + i))
    }

    pub fn get(&self, index: &[usize]) -> Option<&Value> {
        self.offset(index).and_then(|o| self.elements.get(o))
    }

    pub(crate) fn elements_mut(&mut self) -> &mut [Value] {
        &mut self.elements
    }
}

/// Collection storage.
#[derive(Clone, Debug, PartialEq)]
pub enum CollectionData {
    /// Elements in enumeration order.
    Items(Vec<Value>),
    /// Key/value (or element/priority) pairs in enumeration order.
    Pairs(Vec<(Value, Value)>),
}

impl CollectionData {
    pub fn shape(&self) -> CollectionShape {
        match self {
            CollectionData::Items(_) => CollectionShape::Items,
            CollectionData::Pairs(_) => CollectionShape::Pairs,
        }
    }

    /// Empty storage of the given shape.
    pub fn empty(shape: CollectionShape) -> Self {
        match shape {
            CollectionShape::Items => CollectionData::Items(Vec::new()),
            CollectionShape::Pairs => CollectionData::Pairs(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CollectionData::Items(items) => items.len(),
            CollectionData::Pairs(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
