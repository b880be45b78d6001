//! Host operations over the registry: allocation, field access, runtime
//! type queries and assignability checks.
//!
//! Every heap object is created here, so bodies always agree with their
//! descriptor's layout.


use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::{
    ArrayData, Body, CollectionData, HostError, Layout, ObjRef, StructValue, TypeDescriptor,
    TypeId, TypeKind, TypeRegistry, Value,
};

/// Cheap-to-clone handle to a type registry plus the operations that
/// create and inspect values of its types.
#[derive(Clone, Default)]
pub struct Host {
    registry: Arc<TypeRegistry>,
}

impl Deref for Host {
    type Target = TypeRegistry;

    fn deref(&self) -> &TypeRegistry {
        &self.registry
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("types", &self.registry.len())
            .finish()
    }
}

impl Host {
    /// Host over a fresh registry holding only the well-known types.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_registry(registry: Arc<TypeRegistry>) -> Self {
        Host { registry }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    // Allocation

    /// Allocate an instance and run its parameterless constructor.
    ///
    /// Collection types start out empty.
    pub fn construct(&self, ty: TypeId) -> Result<ObjRef, HostError> {
        let desc = self.instantiable(ty)?;
        match desc.layout {
            Layout::Fields => {
                let ctor = desc
                    .allocation
                    .constructor
                    .as_ref()
                    .ok_or_else(|| HostError::NoConstructor(Arc::clone(&desc.name)))?;
                let mut slots = self.default_slots(ty)?;
                ctor(self, &mut slots[..])?;
                Ok(ObjRef::new(ty, Body::Fields(slots)))
            }
            Layout::Collection(shape) => Ok(ObjRef::new(
                ty,
                Body::Collection(CollectionData::empty(shape)),
            )),
            _ => Err(HostError::NotInstantiable(Arc::clone(&desc.name))),
        }
    }

    /// Allocate an instance with default slots without running any
    /// constructor.
    pub fn allocate_uninitialized(&self, ty: TypeId) -> Result<ObjRef, HostError> {
        let desc = self.instantiable(ty)?;
        if !desc.allocation.raw {
            return Err(HostError::RawAllocationDenied(Arc::clone(&desc.name)));
        }
        match desc.layout {
            Layout::Fields => Ok(ObjRef::new(ty, Body::Fields(self.default_slots(ty)?))),
            Layout::Collection(shape) => Ok(ObjRef::new(
                ty,
                Body::Collection(CollectionData::empty(shape)),
            )),
            _ => Err(HostError::NotInstantiable(Arc::clone(&desc.name))),
        }
    }

    fn instantiable(&self, ty: TypeId) -> Result<Arc<TypeDescriptor>, HostError> {
        let desc = self.get(ty)?;
        if desc.is_value_type() || !desc.flags.is_instantiable() {
            return Err(HostError::NotInstantiable(Arc::clone(&desc.name)));
        }
        Ok(desc)
    }

    fn default_slots(&self, ty: TypeId) -> Result<Box<[Value]>, HostError> {
        self.instance_fields(ty)?
            .iter()
            .map(|field| self.default_value(field.ty))
            .collect()
    }

    /// Default value of a type: zero for scalars, no-value for nullables,
    /// default fields for structs, null for everything else.
    pub fn default_value(&self, ty: TypeId) -> Result<Value, HostError> {
        let desc = self.get(ty)?;
        Ok(match desc.kind {
            TypeKind::Primitive(primitive) => primitive.zero(),
            TypeKind::Handle => Value::Handle(0),
            TypeKind::Enum { .. } => Value::Enum(crate::EnumValue { ty, bits: 0 }),
            TypeKind::Nullable { .. } => Value::none(),
            TypeKind::Struct => Value::Struct(StructValue {
                ty,
                fields: desc
                    .fields
                    .iter()
                    .map(|field| self.default_value(field.ty))
                    .collect::<Result<_, _>>()?,
            }),
            TypeKind::Class | TypeKind::Interface | TypeKind::Array { .. } => Value::Null,
        })
    }

    /// A string object.
    pub fn string(&self, s: impl Into<Arc<str>>) -> Value {
        Value::Ref(ObjRef::new(TypeId::STRING, Body::Str(s.into())))
    }

    /// An array of type `ty` with the given dimension lengths and
    /// row-major elements.
    pub fn new_array(
        &self,
        ty: TypeId,
        lengths: &[usize],
        elements: Vec<Value>,
    ) -> Result<ObjRef, HostError> {
        let desc = self.get(ty)?;
        let (element, rank) = desc.array().ok_or_else(|| HostError::LayoutMismatch {
            ty: Arc::clone(&desc.name),
            expected: Layout::Array.describe(),
        })?;
        if lengths.len() != rank {
            return Err(HostError::RankMismatch {
                expected: rank,
                found: lengths.len(),
            });
        }
        let count = lengths
            .iter()
            .try_fold(1usize, |acc, &len| acc.checked_mul(len))
            .unwrap_or(usize::MAX);
        if count != elements.len() {
            return Err(HostError::DimensionMismatch {
                expected: count,
                found: elements.len(),
            });
        }
        for value in &elements {
            self.check_assignable(value, element)?;
        }
        Ok(ObjRef::new(ty, Body::Array(ArrayData::new(lengths, elements))))
    }

    /// A one-dimensional array of `element`.
    pub fn array(&self, element: TypeId, elements: Vec<Value>) -> Result<Value, HostError> {
        let ty = self.array_of(element, 1)?;
        let len = elements.len();
        self.new_array(ty, &[len], elements).map(Value::Ref)
    }

    /// A collection of type `ty` holding `data`.
    ///
    /// Elements are checked against the generic arguments: items against
    /// the first, pair keys against the first and pair values against the
    /// second.
    pub fn new_collection(&self, ty: TypeId, data: CollectionData) -> Result<ObjRef, HostError> {
        let desc = self.get(ty)?;
        if desc.layout != Layout::Collection(data.shape()) {
            return Err(HostError::LayoutMismatch {
                ty: Arc::clone(&desc.name),
                expected: Layout::Collection(data.shape()).describe(),
            });
        }
        let args = desc.generic_args();
        match &data {
            CollectionData::Items(items) => {
                if let Some(&element) = args.first() {
                    for item in items {
                        self.check_assignable(item, element)?;
                    }
                }
            }
            CollectionData::Pairs(pairs) => {
                if let [key_ty, value_ty] = *args {
                    for (key, value) in pairs {
                        self.check_assignable(key, key_ty)?;
                        self.check_assignable(value, value_ty)?;
                    }
                }
            }
        }
        Ok(ObjRef::new(ty, Body::Collection(data)))
    }

    /// An object of an opaque-layout type wrapping `payload`.
    pub fn opaque(
        &self,
        ty: TypeId,
        payload: Arc<dyn Any + Send + Sync>,
    ) -> Result<ObjRef, HostError> {
        let desc = self.instantiable(ty)?;
        if desc.layout != Layout::Opaque {
            return Err(HostError::LayoutMismatch {
                ty: Arc::clone(&desc.name),
                expected: Layout::Opaque.describe(),
            });
        }
        Ok(ObjRef::new(ty, Body::Opaque(payload)))
    }

    /// Reflection metadata object describing `ty`.
    pub fn type_info(&self, ty: TypeId) -> Result<Value, HostError> {
        if !self.contains(ty) {
            return Err(HostError::UnknownType(ty));
        }
        self.opaque(TypeId::TYPE_INFO, Arc::new(ty)).map(Value::Ref)
    }

    /// Field-level duplicate of an object. No constructor runs; children
    /// are shared.
    pub fn duplicate(&self, obj: &ObjRef) -> ObjRef {
        ObjRef::new(obj.ty(), obj.snapshot())
    }

    /// New object of the same runtime type as `source` carrying `body`.
    ///
    /// The body must have the same kind as the source's (fields, array,
    /// collection, ...) and, for arrays, the same shape. Element types are
    /// not re-checked.
    pub fn clone_with_body(&self, source: &ObjRef, body: Body) -> Result<ObjRef, HostError> {
        let compatible = match (&*source.read(), &body) {
            (Body::Fields(a), Body::Fields(b)) => a.len() == b.len(),
            (Body::Array(a), Body::Array(b)) => a.lengths() == b.lengths(),
            (Body::Collection(a), Body::Collection(b)) => a.shape() == b.shape(),
            (Body::Str(_), Body::Str(_)) | (Body::Opaque(_), Body::Opaque(_)) => true,
            _ => false,
        };
        if !compatible {
            let desc = self.get(source.ty())?;
            return Err(HostError::LayoutMismatch {
                ty: Arc::clone(&desc.name),
                expected: desc.layout.describe(),
            });
        }
        Ok(ObjRef::new(source.ty(), body))
    }

    // Fields

    /// Read a field by name; the most-derived declaration wins.
    pub fn field(&self, obj: &ObjRef, name: &str) -> Result<Value, HostError> {
        let field = self.field_named(obj.ty(), name)?;
        self.get_field(obj, field.slot)
    }

    pub fn set_field_by_name(
        &self,
        obj: &ObjRef,
        name: &str,
        value: Value,
    ) -> Result<(), HostError> {
        let field = self.field_named(obj.ty(), name)?;
        self.set_field(obj, field.slot, value)
    }

    pub fn get_field(&self, obj: &ObjRef, slot: usize) -> Result<Value, HostError> {
        let found = match &*obj.read() {
            Body::Fields(fields) => fields.get(slot).cloned(),
            _ => return Err(self.layout_error(obj.ty(), Layout::Fields)),
        };
        found.ok_or_else(|| self.slot_error(obj.ty(), slot))
    }

    /// Write a field, checking the value against the field's declared type.
    pub fn set_field(&self, obj: &ObjRef, slot: usize, value: Value) -> Result<(), HostError> {
        let field = self.field_at(obj.ty(), slot)?;
        self.check_assignable(&value, field.ty)?;
        match &mut *obj.write() {
            Body::Fields(fields) => {
                if let Some(target) = fields.get_mut(slot) {
                    *target = value;
                    return Ok(());
                }
            }
            _ => return Err(self.layout_error(obj.ty(), Layout::Fields)),
        }
        Err(self.slot_error(obj.ty(), slot))
    }

    /// Copy of every slot, inherited ones first.
    pub fn fields(&self, obj: &ObjRef) -> Result<Box<[Value]>, HostError> {
        match &*obj.read() {
            Body::Fields(fields) => Ok(fields.clone()),
            _ => Err(self.layout_error(obj.ty(), Layout::Fields)),
        }
    }

    /// Overwrite every slot at once.
    ///
    /// Values are not re-checked against the declared field types; callers
    /// pass values obtained from an instance of the same type.
    pub fn replace_fields(&self, obj: &ObjRef, values: Box<[Value]>) -> Result<(), HostError> {
        match &mut *obj.write() {
            Body::Fields(fields) if fields.len() == values.len() => {
                *fields = values;
                Ok(())
            }
            Body::Fields(fields) => Err(HostError::DimensionMismatch {
                expected: fields.len(),
                found: values.len(),
            }),
            _ => Err(self.layout_error(obj.ty(), Layout::Fields)),
        }
    }

    // Arrays

    pub fn element(&self, obj: &ObjRef, index: &[usize]) -> Result<Value, HostError> {
        let found = match &*obj.read() {
            Body::Array(array) => {
                if index.len() != array.rank() {
                    return Err(HostError::RankMismatch {
                        expected: array.rank(),
                        found: index.len(),
                    });
                }
                array.get(index).cloned()
            }
            _ => return Err(self.layout_error(obj.ty(), Layout::Array)),
        };
        found.ok_or_else(|| self.index_error(obj.ty(), index))
    }

    pub fn set_element(
        &self,
        obj: &ObjRef,
        index: &[usize],
        value: Value,
    ) -> Result<(), HostError> {
        let desc = self.get(obj.ty())?;
        let Some((element, _)) = desc.array() else {
            return Err(self.layout_error(obj.ty(), Layout::Array));
        };
        self.check_assignable(&value, element)?;
        if let Body::Array(array) = &mut *obj.write() {
            if let Some(offset) = array.offset(index) {
                array.elements_mut()[offset] = value;
                return Ok(());
            }
        }
        Err(self.index_error(obj.ty(), index))
    }

    // Collections

    /// Append an element to an items-shaped collection.
    pub fn push_item(&self, obj: &ObjRef, value: Value) -> Result<(), HostError> {
        let desc = self.get(obj.ty())?;
        if let Some(&element) = desc.generic_args().first() {
            self.check_assignable(&value, element)?;
        }
        match &mut *obj.write() {
            Body::Collection(CollectionData::Items(items)) => {
                items.push(value);
                Ok(())
            }
            _ => Err(HostError::LayoutMismatch {
                ty: Arc::clone(&desc.name),
                expected: "item collection",
            }),
        }
    }

    /// Append a pair to a pairs-shaped collection.
    pub fn push_pair(&self, obj: &ObjRef, key: Value, value: Value) -> Result<(), HostError> {
        let desc = self.get(obj.ty())?;
        if let [key_ty, value_ty] = *desc.generic_args() {
            self.check_assignable(&key, key_ty)?;
            self.check_assignable(&value, value_ty)?;
        }
        match &mut *obj.write() {
            Body::Collection(CollectionData::Pairs(pairs)) => {
                pairs.push((key, value));
                Ok(())
            }
            _ => Err(HostError::LayoutMismatch {
                ty: Arc::clone(&desc.name),
                expected: "pair collection",
            }),
        }
    }

    // Runtime types

    /// Runtime type of a value. `None` for null and for an empty nullable.
    pub fn runtime_type(&self, value: &Value) -> Option<TypeId> {
        Some(match value {
            Value::Null | Value::Nullable(None) => return None,
            Value::Bool(_) => TypeId::BOOL,
            Value::Char(_) => TypeId::CHAR,
            Value::I8(_) => TypeId::I8,
            Value::I16(_) => TypeId::I16,
            Value::I32(_) => TypeId::I32,
            Value::I64(_) => TypeId::I64,
            Value::U8(_) => TypeId::U8,
            Value::U16(_) => TypeId::U16,
            Value::U32(_) => TypeId::U32,
            Value::U64(_) => TypeId::U64,
            Value::F32(_) => TypeId::F32,
            Value::F64(_) => TypeId::F64,
            Value::ISize(_) => TypeId::ISIZE,
            Value::USize(_) => TypeId::USIZE,
            Value::Handle(_) => TypeId::HANDLE,
            Value::Enum(e) => e.ty,
            Value::Struct(s) => s.ty,
            Value::Nullable(Some(inner)) => return self.runtime_type(inner),
            Value::Ref(obj) => obj.ty(),
        })
    }

    /// Check if `value` may be stored in a location declared as `declared`.
    ///
    /// Null fits reference types only. Nullable locations require a
    /// `Value::Nullable` whose payload has exactly the inner type.
    pub fn check_assignable(&self, value: &Value, declared: TypeId) -> Result<(), HostError> {
        let desc = self.get(declared)?;
        let fits = match (value, desc.nullable_inner()) {
            (Value::Null, _) => !desc.is_value_type(),
            (Value::Nullable(None), inner) => inner.is_some(),
            (Value::Nullable(Some(payload)), Some(inner)) => {
                self.runtime_type(payload) == Some(inner)
            }
            (Value::Nullable(Some(_)), None) | (_, Some(_)) => false,
            (other, None) => match self.runtime_type(other) {
                Some(ty) => self.is_assignable(ty, declared)?,
                None => false,
            },
        };
        if fits {
            return Ok(());
        }
        let found = match self.runtime_type(value) {
            Some(ty) => self.name_of(ty)?,
            None => value.kind_name().into(),
        };
        Err(HostError::NotAssignable {
            expected: Arc::clone(&desc.name),
            found,
        })
    }

    /// Convert `value` to `declared`, wrapping into a nullable when the
    /// declared type is `Nullable<T>` and the value is a plain `T`.
    pub fn cast(&self, value: Value, declared: TypeId) -> Result<Value, HostError> {
        if let Some(inner) = self.get(declared)?.nullable_inner() {
            match value {
                Value::Null => return Ok(Value::none()),
                Value::Nullable(_) => {}
                plain => {
                    self.check_assignable(&plain, inner)?;
                    return Ok(Value::some(plain));
                }
            }
        }
        self.check_assignable(&value, declared)?;
        Ok(value)
    }

    fn layout_error(&self, ty: TypeId, expected: Layout) -> HostError {
        match self.name_of(ty) {
            Ok(name) => HostError::LayoutMismatch {
                ty: name,
                expected: expected.describe(),
            },
            Err(e) => e,
        }
    }

    fn slot_error(&self, ty: TypeId, slot: usize) -> HostError {
        match self.name_of(ty) {
            Ok(name) => HostError::SlotOutOfRange { ty: name, slot },
            Err(e) => e,
        }
    }

    fn index_error(&self, ty: TypeId, index: &[usize]) -> HostError {
        match self.name_of(ty) {
            Ok(name) => HostError::IndexOutOfRange {
                ty: name,
                index: index.to_vec().into(),
            },
            Err(e) => e,
        }
    }
}
