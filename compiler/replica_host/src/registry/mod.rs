//! Append-only, thread-safe type registry.
//!
//! The registry owns every [`TypeDescriptor`] for the lifetime of the
//! process. Types are referenced by [`TypeId`] and are never removed or
//! replaced once defined.
//!
//! # Design
//!
//! - Contiguous slot storage: well-known types first, then user types in
//!   definition order
//! - Forward declarations: `declare` reserves a handle so classes can refer
//!   to themselves (linked nodes, trees) before they are defined
//! - Interning: array and generic instances are deduplicated, so the same
//!   inputs always produce the same `TypeId`
//!
//! # Thread Safety
//!
//! Storage sits behind `parking_lot::RwLock`s. Interning uses a read fast
//! path and a double-checked write. Generic instantiation additionally
//! holds a reentrant lock so that a template may instantiate further
//! generics (including the instance being built) on the same thread.
//!
//! Lock order: `instantiating` -> `interned` -> `types`, `names` -> `types`.
//! No descriptor lookup happens while a write lock is held.

mod builtins;
mod class_def;


pub use class_def::{ClassDef, StructDef};
pub(crate) use class_def::{ClassLayout, PendingField};

use std::cell::RefCell;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    Allocation, FieldDef, GenericDef, GenericInstance, HostError, Layout, Primitive,
    TypeDescriptor, TypeFlags, TypeId, TypeKind,
};

/// Highest supported array rank.
pub const MAX_RANK: usize = 32;

/// Storage slot for one type handle.
pub(crate) enum Slot {
    /// Handle reserved by `declare`, not yet defined.
    Declared(Arc<str>),
    Defined(Arc<TypeDescriptor>),
}

/// Key for interned closed types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum InternKey {
    Array { element: TypeId, rank: u8 },
    Generic { definition: GenericDef, args: Box<[TypeId]> },
}

/// The instance a class template is asked to build.
pub struct Instantiation<'a> {
    /// Handle already reserved for the instance. Fields may refer to it.
    pub this: TypeId,
    /// Display name of the instance, e.g. `Node<Int32>`.
    pub name: &'a Arc<str>,
    /// Concrete type arguments.
    pub args: &'a [TypeId],
}

impl Instantiation<'_> {
    /// Start a class definition carrying the instance name.
    pub fn class(&self) -> ClassDef {
        ClassDef::new(Arc::clone(self.name))
    }
}

/// Produces the class for one set of generic arguments.
pub type ClassTemplate =
    Arc<dyn Fn(&TypeRegistry, &Instantiation<'_>) -> Result<ClassDef, HostError> + Send + Sync>;

/// Produces the extended interfaces for one set of generic arguments.
pub(crate) type InterfaceTemplate =
    Arc<dyn Fn(&TypeRegistry, &[TypeId]) -> Result<Vec<TypeId>, HostError> + Send + Sync>;

pub(crate) enum Template {
    Nullable,
    Class(ClassTemplate),
    Interface(InterfaceTemplate),
}

/// An open generic definition.
pub(crate) struct GenericDefinition {
    pub(crate) name: Arc<str>,
    pub(crate) arity: usize,
    pub(crate) template: Template,
}

/// Registry of all types known to a host.
pub struct TypeRegistry {
    types: RwLock<Vec<Slot>>,
    names: RwLock<FxHashMap<Arc<str>, TypeId>>,
    interned: RwLock<FxHashMap<InternKey, TypeId>>,
    generics: RwLock<Vec<Arc<GenericDefinition>>>,
    /// Instances whose template is currently running on the lock owner.
    instantiating: ReentrantMutex<RefCell<FxHashMap<InternKey, TypeId>>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a registry seeded with the well-known types and definitions.
    pub fn new() -> Self {
        let types = builtins::well_known_types();
        let names = types
            .iter()
            .map(|desc| (Arc::clone(&desc.name), desc.id))
            .collect();

        TypeRegistry {
            types: RwLock::new(types.into_iter().map(|d| Slot::Defined(Arc::new(d))).collect()),
            names: RwLock::new(names),
            interned: RwLock::new(FxHashMap::default()),
            generics: RwLock::new(
                builtins::well_known_definitions()
                    .into_iter()
                    .map(Arc::new)
                    .collect(),
            ),
            instantiating: ReentrantMutex::new(RefCell::new(FxHashMap::default())),
        }
    }

    /// Number of type handles, declared-only ones included.
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Always false: the well-known types are seeded at construction.
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// Check if the handle was issued by this registry.
    pub fn contains(&self, id: TypeId) -> bool {
        id.index() < self.len()
    }

    /// Look up a defined type.
    pub fn get(&self, id: TypeId) -> Result<Arc<TypeDescriptor>, HostError> {
        match self.types.read().get(id.index()) {
            Some(Slot::Defined(desc)) => Ok(Arc::clone(desc)),
            Some(Slot::Declared(name)) => Err(HostError::Undefined(Arc::clone(name))),
            None => Err(HostError::UnknownType(id)),
        }
    }

    /// Name of a declared or defined type.
    pub fn name_of(&self, id: TypeId) -> Result<Arc<str>, HostError> {
        match self.types.read().get(id.index()) {
            Some(Slot::Defined(desc)) => Ok(Arc::clone(&desc.name)),
            Some(Slot::Declared(name)) => Ok(Arc::clone(name)),
            None => Err(HostError::UnknownType(id)),
        }
    }

    /// Find a nominal type by name. Array and generic instances are not
    /// registered by name.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.names.read().get(name).copied()
    }

    pub fn base_of(&self, id: TypeId) -> Result<Option<TypeId>, HostError> {
        Ok(self.get(id)?.base)
    }

    /// Open generic definition of a closed type, if any.
    pub fn generic_definition(&self, id: TypeId) -> Result<Option<GenericDef>, HostError> {
        Ok(self.get(id)?.definition())
    }

    /// Name of an open generic definition (`List`, `Dictionary`, ...).
    pub fn definition_name(&self, def: GenericDef) -> Result<Arc<str>, HostError> {
        Ok(Arc::clone(&self.definition(def)?.name))
    }

    /// Number of type parameters of an open generic definition.
    pub fn definition_arity(&self, def: GenericDef) -> Result<usize, HostError> {
        Ok(self.definition(def)?.arity)
    }

    fn definition(&self, def: GenericDef) -> Result<Arc<GenericDefinition>, HostError> {
        self.generics
            .read()
            .get(def.index())
            .cloned()
            .ok_or(HostError::UnknownDefinition(def))
    }

    // Subtyping

    /// Check if `ty` is `target`, derives from it, or implements it.
    pub fn is_subtype(&self, ty: TypeId, target: TypeId) -> Result<bool, HostError> {
        if ty == target {
            return Ok(true);
        }
        let target_is_interface = self.get(target)?.is_interface();
        let mut current = Some(ty);
        while let Some(id) = current {
            if id == target {
                return Ok(true);
            }
            let desc = self.get(id)?;
            if target_is_interface && self.implements(&desc, target)? {
                return Ok(true);
            }
            current = desc.base;
        }
        Ok(false)
    }

    /// Check if a value whose runtime type is `ty` may be stored in a
    /// location declared as `declared`.
    ///
    /// Everything is assignable to the top type (value types are boxed),
    /// and `U` is assignable to `Nullable<U>`.
    pub fn is_assignable(&self, ty: TypeId, declared: TypeId) -> Result<bool, HostError> {
        if declared == TypeId::OBJECT || self.is_subtype(ty, declared)? {
            return Ok(true);
        }
        Ok(self.get(declared)?.nullable_inner() == Some(ty))
    }

    fn implements(&self, desc: &TypeDescriptor, interface: TypeId) -> Result<bool, HostError> {
        let mut stack: Vec<TypeId> = desc.interfaces.to_vec();
        let mut seen = FxHashSet::default();
        while let Some(id) = stack.pop() {
            if id == interface {
                return Ok(true);
            }
            if seen.insert(id) {
                stack.extend_from_slice(&self.get(id)?.interfaces);
            }
        }
        Ok(false)
    }

    // Definitions

    /// Reserve a handle for a type defined later.
    pub fn declare(&self, name: impl Into<Arc<str>>) -> Result<TypeId, HostError> {
        let name = name.into();
        let mut names = self.names.write();
        if names.contains_key(&name) {
            return Err(HostError::DuplicateName(name));
        }
        let id = self.push_slot(Slot::Declared(Arc::clone(&name)));
        names.insert(name, id);
        Ok(id)
    }

    /// Define a reference type. If the name was declared, the declared
    /// handle is used.
    pub fn define_class(&self, def: ClassDef) -> Result<TypeId, HostError> {
        let id = self.claim(&def.name)?;
        let desc = self.build_class(id, def, None)?;
        self.publish(desc)
    }

    /// Define a value type.
    pub fn define_struct(&self, def: StructDef) -> Result<TypeId, HostError> {
        let id = self.claim(&def.name)?;
        self.check_interfaces(&def.interfaces)?;
        for field in &def.fields {
            self.check_struct_field(id, &def.name, field.ty)?;
        }
        let fields = self.assign_slots(&def.name, 0, def.fields)?;
        self.publish(TypeDescriptor {
            id,
            name: def.name,
            kind: TypeKind::Struct,
            flags: TypeFlags::VALUE_TYPE | TypeFlags::SEALED,
            base: None,
            interfaces: def.interfaces.into(),
            generic: None,
            slot_count: fields.len(),
            fields,
            layout: Layout::Inline,
            allocation: Allocation::default(),
        })
    }

    /// Define an enum stored as an integral primitive.
    pub fn define_enum(
        &self,
        name: impl Into<Arc<str>>,
        underlying: Primitive,
    ) -> Result<TypeId, HostError> {
        let name = name.into();
        if matches!(
            underlying,
            Primitive::Bool | Primitive::Char | Primitive::F32 | Primitive::F64
        ) {
            return Err(HostError::InvalidDefinition {
                ty: name,
                reason: "enum storage must be an integral primitive",
            });
        }
        let id = self.claim(&name)?;
        self.publish(TypeDescriptor {
            id,
            name,
            kind: TypeKind::Enum { underlying },
            flags: TypeFlags::VALUE_TYPE | TypeFlags::ENUM | TypeFlags::SEALED,
            base: None,
            interfaces: Box::default(),
            generic: None,
            fields: Box::default(),
            slot_count: 0,
            layout: Layout::Inline,
            allocation: Allocation::default(),
        })
    }

    /// Define an interface extending `extends`.
    pub fn define_interface(
        &self,
        name: impl Into<Arc<str>>,
        extends: &[TypeId],
    ) -> Result<TypeId, HostError> {
        let name = name.into();
        self.check_interfaces(extends)?;
        let id = self.claim(&name)?;
        self.publish(interface_descriptor(id, name, extends.into(), None))
    }

    /// Define a generic class. The template runs once per distinct set of
    /// arguments, on first instantiation.
    pub fn define_generic<F>(
        &self,
        name: impl Into<Arc<str>>,
        arity: usize,
        template: F,
    ) -> Result<GenericDef, HostError>
    where
        F: Fn(&TypeRegistry, &Instantiation<'_>) -> Result<ClassDef, HostError>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        if arity == 0 {
            return Err(HostError::InvalidDefinition {
                ty: name,
                reason: "a generic definition takes at least one argument",
            });
        }
        let mut generics = self.generics.write();
        if generics.iter().any(|g| g.name == name) {
            return Err(HostError::DuplicateName(name));
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "definition count never approaches u32::MAX"
        )]
        let def = GenericDef::from_raw(generics.len() as u32);
        generics.push(Arc::new(GenericDefinition {
            name,
            arity,
            template: Template::Class(Arc::new(template)),
        }));
        Ok(def)
    }

    // Interning

    /// The array type with the given element type and rank.
    pub fn array_of(&self, element: TypeId, rank: usize) -> Result<TypeId, HostError> {
        let rank_u8 = u8::try_from(rank)
            .ok()
            .filter(|r| (1..=MAX_RANK).contains(&usize::from(*r)))
            .ok_or(HostError::InvalidRank(rank))?;
        let key = InternKey::Array {
            element,
            rank: rank_u8,
        };

        // Fast path: read lock only
        if let Some(&id) = self.interned.read().get(&key) {
            return Ok(id);
        }

        let name: Arc<str> = format!("{}[{}]", self.name_of(element)?, ",".repeat(rank - 1)).into();

        let mut interned = self.interned.write();
        if let Some(&id) = interned.get(&key) {
            return Ok(id);
        }
        let mut types = self.types.write();
        let id = next_id(&types);
        types.push(Slot::Defined(Arc::new(TypeDescriptor {
            id,
            name,
            kind: TypeKind::Array {
                element,
                rank: rank_u8,
            },
            flags: TypeFlags::REFERENCE
                | TypeFlags::ARRAY
                | TypeFlags::SEALED
                | TypeFlags::RAW_ALLOCATABLE,
            base: Some(TypeId::OBJECT),
            interfaces: Box::new([TypeId::ENUMERABLE]),
            generic: None,
            fields: Box::default(),
            slot_count: 0,
            layout: Layout::Array,
            allocation: Allocation {
                constructor: None,
                raw: true,
            },
        })));
        interned.insert(key, id);
        Ok(id)
    }

    /// `Nullable<inner>`.
    pub fn nullable_of(&self, inner: TypeId) -> Result<TypeId, HostError> {
        self.instantiate(GenericDef::NULLABLE, &[inner])
    }

    /// Close a generic definition over concrete arguments.
    pub fn instantiate(
        &self,
        definition: GenericDef,
        args: &[TypeId],
    ) -> Result<TypeId, HostError> {
        let generic = self.definition(definition)?;
        if args.len() != generic.arity {
            return Err(HostError::Arity {
                name: Arc::clone(&generic.name),
                expected: generic.arity,
                found: args.len(),
            });
        }
        if let Some(&unknown) = args.iter().find(|a| !self.contains(**a)) {
            return Err(HostError::UnknownType(unknown));
        }
        let key = InternKey::Generic {
            definition,
            args: args.into(),
        };

        if let Some(&id) = self.interned.read().get(&key) {
            return Ok(id);
        }

        let guard = self.instantiating.lock();
        // Reentrant request for an instance still being built on this thread
        let pending = guard.borrow().get(&key).copied();
        if let Some(id) = pending {
            return Ok(id);
        }
        if let Some(&id) = self.interned.read().get(&key) {
            return Ok(id);
        }

        let name = self.instance_name(&generic.name, args)?;
        let id = self.push_slot(Slot::Declared(Arc::clone(&name)));
        guard.borrow_mut().insert(key.clone(), id);
        let built = self.build_instance(id, &name, definition, &generic, args);
        guard.borrow_mut().remove(&key);

        let id = self.publish(built?)?;
        self.interned.write().insert(key, id);
        tracing::debug!(ty = %name, id = id.raw(), "instantiated generic type");
        Ok(id)
    }

    fn build_instance(
        &self,
        id: TypeId,
        name: &Arc<str>,
        definition: GenericDef,
        generic: &GenericDefinition,
        args: &[TypeId],
    ) -> Result<TypeDescriptor, HostError> {
        let instance = GenericInstance {
            definition,
            args: args.into(),
        };
        match &generic.template {
            Template::Nullable => {
                let &[inner] = args else {
                    return Err(HostError::Arity {
                        name: Arc::clone(&generic.name),
                        expected: 1,
                        found: args.len(),
                    });
                };
                let inner_desc = self.get(inner)?;
                if !inner_desc.is_value_type() || inner_desc.nullable_inner().is_some() {
                    return Err(HostError::InvalidTypeArgument {
                        definition: Arc::clone(&generic.name),
                        argument: Arc::clone(&inner_desc.name),
                        reason: "expected a non-nullable value type",
                    });
                }
                Ok(TypeDescriptor {
                    id,
                    name: Arc::clone(name),
                    kind: TypeKind::Nullable { inner },
                    flags: TypeFlags::VALUE_TYPE
                        | TypeFlags::NULLABLE
                        | TypeFlags::GENERIC
                        | TypeFlags::SEALED,
                    base: None,
                    interfaces: Box::default(),
                    generic: Some(instance),
                    fields: Box::default(),
                    slot_count: 0,
                    layout: Layout::Inline,
                    allocation: Allocation::default(),
                })
            }
            Template::Interface(template) => {
                let extends = template(self, args)?;
                self.check_interfaces(&extends)?;
                Ok(interface_descriptor(
                    id,
                    Arc::clone(name),
                    extends.into(),
                    Some(instance),
                ))
            }
            Template::Class(template) => {
                let mut def = template(
                    self,
                    &Instantiation {
                        this: id,
                        name,
                        args,
                    },
                )?;
                def.name = Arc::clone(name);
                self.build_class(id, def, Some(instance))
            }
        }
    }

    fn instance_name(&self, definition: &str, args: &[TypeId]) -> Result<Arc<str>, HostError> {
        let args = args
            .iter()
            .map(|&a| self.name_of(a))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("{definition}<{}>", args.join(", ")).into())
    }

    // Publication helpers

    fn push_slot(&self, slot: Slot) -> TypeId {
        let mut types = self.types.write();
        let id = next_id(&types);
        types.push(slot);
        id
    }

    /// Handle to define `name` into: its declared handle, or a fresh one.
    fn claim(&self, name: &Arc<str>) -> Result<TypeId, HostError> {
        let mut names = self.names.write();
        if let Some(&id) = names.get(name) {
            return match self.types.read().get(id.index()) {
                Some(Slot::Declared(_)) => Ok(id),
                _ => Err(HostError::AlreadyDefined(Arc::clone(name))),
            };
        }
        let id = self.push_slot(Slot::Declared(Arc::clone(name)));
        names.insert(Arc::clone(name), id);
        Ok(id)
    }

    fn publish(&self, desc: TypeDescriptor) -> Result<TypeId, HostError> {
        let id = desc.id;
        let mut types = self.types.write();
        let Some(slot) = types.get_mut(id.index()) else {
            return Err(HostError::UnknownType(id));
        };
        if let Slot::Defined(existing) = slot {
            return Err(HostError::AlreadyDefined(Arc::clone(&existing.name)));
        }
        tracing::debug!(ty = %desc.name, id = id.raw(), kind = ?desc.kind, "defined type");
        *slot = Slot::Defined(Arc::new(desc));
        Ok(id)
    }

    fn build_class(
        &self,
        id: TypeId,
        def: ClassDef,
        generic: Option<GenericInstance>,
    ) -> Result<TypeDescriptor, HostError> {
        let base_id = def.base.unwrap_or(TypeId::OBJECT);
        let base = self.get(base_id)?;
        let rejected = if base.is_interface() {
            Some("base is an interface")
        } else if base.is_value_type() {
            Some("base is a value type")
        } else if base.flags.contains(TypeFlags::SEALED) {
            Some("base is sealed")
        } else {
            None
        };
        if let Some(reason) = rejected {
            return Err(HostError::InvalidBase {
                derived: def.name,
                base: Arc::clone(&base.name),
                reason,
            });
        }
        self.check_interfaces(&def.interfaces)?;

        let layout = match (base.layout, def.layout) {
            (Layout::Opaque, _) | (_, ClassLayout::Opaque) => Layout::Opaque,
            (Layout::Fields, ClassLayout::Collection(shape)) => Layout::Collection(shape),
            (Layout::Fields, ClassLayout::Fields) => Layout::Fields,
            _ => {
                return Err(HostError::InvalidBase {
                    derived: def.name,
                    base: Arc::clone(&base.name),
                    reason: "base layout cannot be extended",
                })
            }
        };
        if layout != Layout::Fields && (base.slot_count > 0 || !def.fields.is_empty()) {
            return Err(HostError::InvalidDefinition {
                ty: def.name,
                reason: "only field-layout classes hold fields",
            });
        }

        let fields = self.assign_slots(&def.name, base.slot_count, def.fields)?;
        let mut flags = TypeFlags::REFERENCE | (base.flags & TypeFlags::INHERITED_MASK);
        flags.set(TypeFlags::ABSTRACT, def.is_abstract);
        flags.set(TypeFlags::SEALED, def.sealed);
        flags.set(TypeFlags::GENERIC, generic.is_some());
        flags.set(TypeFlags::HAS_CONSTRUCTOR, def.constructor.is_some());
        flags.set(TypeFlags::RAW_ALLOCATABLE, def.raw);

        Ok(TypeDescriptor {
            id,
            name: def.name,
            kind: TypeKind::Class,
            flags,
            base: Some(base_id),
            interfaces: def.interfaces.into(),
            generic,
            slot_count: base.slot_count + fields.len(),
            fields,
            layout,
            allocation: Allocation {
                constructor: def.constructor,
                raw: def.raw,
            },
        })
    }

    fn check_interfaces(&self, interfaces: &[TypeId]) -> Result<(), HostError> {
        for &id in interfaces {
            let desc = self.get(id)?;
            if !desc.is_interface() {
                return Err(HostError::NotAnInterface(Arc::clone(&desc.name)));
            }
        }
        Ok(())
    }

    fn assign_slots(
        &self,
        owner: &Arc<str>,
        first_slot: usize,
        pending: Vec<PendingField>,
    ) -> Result<Box<[FieldDef]>, HostError> {
        let mut seen = FxHashSet::default();
        pending
            .into_iter()
            .enumerate()
            .map(|(i, field)| {
                if !self.contains(field.ty) {
                    return Err(HostError::UnknownType(field.ty));
                }
                if !seen.insert(Arc::clone(&field.name)) {
                    return Err(HostError::DuplicateName(format!("{owner}.{}", field.name).into()));
                }
                Ok(FieldDef {
                    name: field.name,
                    ty: field.ty,
                    visibility: field.visibility,
                    slot: first_slot + i,
                })
            })
            .collect()
    }

    /// Reject a struct field that would make `this` contain itself.
    ///
    /// Declared-only field types are accepted: a struct defined later that
    /// closes the loop is rejected when it is defined.
    fn check_struct_field(
        &self,
        this: TypeId,
        owner: &Arc<str>,
        ty: TypeId,
    ) -> Result<(), HostError> {
        let mut stack = vec![ty];
        let mut seen = FxHashSet::default();
        while let Some(id) = stack.pop() {
            if id == this {
                return Err(HostError::RecursiveStruct(Arc::clone(owner)));
            }
            if !seen.insert(id) {
                continue;
            }
            let desc = match self.get(id) {
                Ok(desc) => desc,
                Err(HostError::Undefined(_)) => continue,
                Err(e) => return Err(e),
            };
            match desc.kind {
                TypeKind::Struct => stack.extend(desc.fields.iter().map(|f| f.ty)),
                TypeKind::Nullable { inner } => stack.push(inner),
                _ => {}
            }
        }
        Ok(())
    }

    // Field queries

    /// All instance fields of `ty`, inherited ones first, in slot order.
    pub(crate) fn instance_fields(&self, ty: TypeId) -> Result<Vec<FieldDef>, HostError> {
        let mut levels = Vec::new();
        let mut current = Some(ty);
        while let Some(id) = current {
            let desc = self.get(id)?;
            current = desc.base;
            levels.push(desc);
        }
        Ok(levels
            .iter()
            .rev()
            .flat_map(|level| level.fields.iter().cloned())
            .collect())
    }

    /// Field stored in `slot`, searched across the inheritance chain.
    pub fn field_at(&self, ty: TypeId, slot: usize) -> Result<FieldDef, HostError> {
        let mut current = Some(ty);
        while let Some(id) = current {
            let desc = self.get(id)?;
            if let Some(field) = desc.fields.iter().find(|f| f.slot == slot) {
                return Ok(field.clone());
            }
            current = desc.base;
        }
        Err(HostError::SlotOutOfRange {
            ty: self.name_of(ty)?,
            slot,
        })
    }

    /// Field named `name`; the most-derived declaration wins.
    pub fn field_named(&self, ty: TypeId, name: &str) -> Result<FieldDef, HostError> {
        let mut current = Some(ty);
        while let Some(id) = current {
            let desc = self.get(id)?;
            if let Some(field) = desc.fields.iter().find(|f| &*f.name == name) {
                return Ok(field.clone());
            }
            current = desc.base;
        }
        Err(HostError::NoSuchField {
            ty: self.name_of(ty)?,
            field: name.into(),
        })
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "registry never holds more than u32::MAX types"
)]
fn next_id(types: &[Slot]) -> TypeId {
    TypeId::from_raw(types.len() as u32)
}

pub(crate) fn interface_descriptor(
    id: TypeId,
    name: Arc<str>,
    extends: Box<[TypeId]>,
    generic: Option<GenericInstance>,
) -> TypeDescriptor {
    let mut flags = TypeFlags::INTERFACE;
    flags.set(TypeFlags::GENERIC, generic.is_some());
    TypeDescriptor {
        id,
        name,
        kind: TypeKind::Interface,
        flags,
        base: None,
        interfaces: extends,
        generic,
        fields: Box::default(),
        slot_count: 0,
        layout: Layout::None,
        allocation: Allocation::default(),
    }
}
