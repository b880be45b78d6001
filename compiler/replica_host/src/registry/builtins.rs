//! Well-known types and generic definitions seeded into every registry.
//!
//! Order matters: entry `i` of each table must carry the handle whose raw
//! value is `i` (see the constants on `TypeId` and `GenericDef`).

use std::sync::Arc;

use super::{interface_descriptor, GenericDefinition, Instantiation, Template, TypeRegistry};
use crate::{
    Allocation, ClassDef, CollectionShape, Constructor, FieldDef, GenericDef, Host, HostError,
    Layout, Primitive, TypeDescriptor, TypeFlags, TypeId, TypeKind, Value, Visibility,
};

/// Descriptors for `TypeId::OBJECT ..= TypeId::ENUMERABLE`.
pub(super) fn well_known_types() -> Vec<TypeDescriptor> {
    let no_op: Constructor =
        Arc::new(|_: &Host, _: &mut [Value]| -> Result<(), HostError> { Ok(()) });
    let mut types = Vec::with_capacity(TypeId::WELL_KNOWN_COUNT as usize);

    types.push(TypeDescriptor {
        allocation: Allocation {
            constructor: Some(Arc::clone(&no_op)),
            raw: true,
        },
        ..reference(
            TypeId::OBJECT,
            "Object",
            None,
            TypeFlags::OBJECT_ROOT | TypeFlags::HAS_CONSTRUCTOR | TypeFlags::RAW_ALLOCATABLE,
            Layout::Fields,
        )
    });
    types.push(TypeDescriptor {
        interfaces: Box::new([TypeId::ENUMERABLE]),
        ..reference(
            TypeId::STRING,
            "String",
            Some(TypeId::OBJECT),
            TypeFlags::SEALED,
            Layout::Str,
        )
    });

    for primitive in Primitive::ALL {
        let mut flags = TypeFlags::VALUE_TYPE | TypeFlags::PRIMITIVE | TypeFlags::SEALED;
        flags.set(TypeFlags::POINTER_SIZED, primitive.is_pointer_sized());
        types.push(value(
            primitive.type_id(),
            primitive.name(),
            TypeKind::Primitive(primitive),
            flags,
            Vec::new(),
        ));
    }

    types.push(value(
        TypeId::HANDLE,
        "Handle",
        TypeKind::Handle,
        TypeFlags::VALUE_TYPE | TypeFlags::MARSHAL_BY_REF | TypeFlags::SEALED,
        Vec::new(),
    ));
    types.push(value(
        TypeId::GUID,
        "Guid",
        TypeKind::Struct,
        TypeFlags::VALUE_TYPE | TypeFlags::SEALED,
        vec![("hi", TypeId::U64), ("lo", TypeId::U64)],
    ));
    types.push(value(
        TypeId::TIMESPAN,
        "TimeSpan",
        TypeKind::Struct,
        TypeFlags::VALUE_TYPE | TypeFlags::SEALED,
        vec![("ticks", TypeId::I64)],
    ));
    types.push(value(
        TypeId::DATETIME,
        "DateTime",
        TypeKind::Struct,
        TypeFlags::VALUE_TYPE | TypeFlags::SEALED,
        vec![("ticks", TypeId::I64)],
    ));

    types.push(TypeDescriptor {
        fields: private_fields(&[("message", TypeId::STRING), ("inner", TypeId::EXCEPTION)], 0),
        slot_count: 2,
        allocation: Allocation {
            constructor: Some(no_op),
            raw: true,
        },
        ..reference(
            TypeId::EXCEPTION,
            "Exception",
            Some(TypeId::OBJECT),
            TypeFlags::EXCEPTION_FAMILY | TypeFlags::HAS_CONSTRUCTOR | TypeFlags::RAW_ALLOCATABLE,
            Layout::Fields,
        )
    });
    types.push(reference(
        TypeId::DELEGATE,
        "Delegate",
        Some(TypeId::OBJECT),
        TypeFlags::DELEGATE_FAMILY | TypeFlags::ABSTRACT,
        Layout::Opaque,
    ));
    types.push(reference(
        TypeId::EXPRESSION,
        "Expression",
        Some(TypeId::OBJECT),
        TypeFlags::EXPRESSION_FAMILY | TypeFlags::ABSTRACT,
        Layout::Opaque,
    ));
    for (id, name) in [
        (TypeId::THREAD, "Thread"),
        (TypeId::MUTEX, "Mutex"),
        (TypeId::TYPE_INFO, "Type"),
    ] {
        types.push(reference(
            id,
            name,
            Some(TypeId::OBJECT),
            TypeFlags::SEALED,
            Layout::Opaque,
        ));
    }
    types.push(interface_descriptor(
        TypeId::ENUMERABLE,
        "IEnumerable".into(),
        Box::default(),
        None,
    ));

    debug_assert!(types
        .iter()
        .enumerate()
        .all(|(i, d)| d.id.index() == i));
    types
}

fn reference(
    id: TypeId,
    name: &str,
    base: Option<TypeId>,
    flags: TypeFlags,
    layout: Layout,
) -> TypeDescriptor {
    TypeDescriptor {
        id,
        name: name.into(),
        kind: TypeKind::Class,
        flags: TypeFlags::REFERENCE | flags,
        base,
        interfaces: Box::default(),
        generic: None,
        fields: Box::default(),
        slot_count: 0,
        layout,
        allocation: Allocation::default(),
    }
}

fn value(
    id: TypeId,
    name: &str,
    kind: TypeKind,
    flags: TypeFlags,
    fields: Vec<(&str, TypeId)>,
) -> TypeDescriptor {
    TypeDescriptor {
        id,
        name: name.into(),
        kind,
        flags,
        base: None,
        interfaces: Box::default(),
        generic: None,
        slot_count: fields.len(),
        fields: private_fields(&fields, 0),
        layout: Layout::Inline,
        allocation: Allocation::default(),
    }
}

fn private_fields(fields: &[(&str, TypeId)], first_slot: usize) -> Box<[FieldDef]> {
    fields
        .iter()
        .enumerate()
        .map(|(i, &(name, ty))| FieldDef {
            name: name.into(),
            ty,
            visibility: Visibility::Private,
            slot: first_slot + i,
        })
        .collect()
}

// Generic definitions

type Interfaces = fn(&TypeRegistry, &[TypeId]) -> Result<Vec<TypeId>, HostError>;

/// Definitions for `GenericDef::NULLABLE ..= GenericDef::I_READ_ONLY_DICTIONARY`.
pub(super) fn well_known_definitions() -> Vec<GenericDefinition> {
    use CollectionShape::{Items, Pairs};

    vec![
        GenericDefinition {
            name: "Nullable".into(),
            arity: 1,
            template: Template::Nullable,
        },
        collection("List", 1, Items, sequence_interfaces),
        collection("HashSet", 1, Items, sequence_interfaces),
        collection("Queue", 1, Items, sequence_interfaces),
        collection("Stack", 1, Items, sequence_interfaces),
        collection("LinkedList", 1, Items, sequence_interfaces),
        class("LinkedListNode", 1, |inst| {
            inst.class()
                .sealed()
                .field("value", inst.args[0])
                .field("next", inst.this)
        }),
        collection("SortedSet", 1, Items, sequence_interfaces),
        collection("Dictionary", 2, Pairs, dictionary_interfaces),
        collection("SortedDictionary", 2, Pairs, dictionary_interfaces),
        collection("PriorityQueue", 2, Pairs, |_, _| Ok(Vec::new())),
        collection("ConcurrentBag", 1, Items, sequence_interfaces),
        collection("ConcurrentQueue", 1, Items, sequence_interfaces),
        collection("ConcurrentStack", 1, Items, sequence_interfaces),
        collection("ConcurrentDictionary", 2, Pairs, dictionary_interfaces),
        collection("ImmutableList", 1, Items, sequence_interfaces),
        collection("ImmutableDictionary", 2, Pairs, dictionary_interfaces),
        class("Lazy", 1, |inst| inst.class().sealed().opaque()),
        class("Task", 1, |inst| inst.class().sealed().opaque()),
        interface("IEnumerable", 1, |_, _| Ok(vec![TypeId::ENUMERABLE])),
        interface("IReadOnlyCollection", 1, |registry, args| {
            Ok(vec![registry.instantiate(GenericDef::I_ENUMERABLE, args)?])
        }),
        interface("IReadOnlyDictionary", 2, |_, _| Ok(vec![TypeId::ENUMERABLE])),
    ]
}

fn sequence_interfaces(registry: &TypeRegistry, args: &[TypeId]) -> Result<Vec<TypeId>, HostError> {
    Ok(vec![
        registry.instantiate(GenericDef::I_ENUMERABLE, args)?,
        registry.instantiate(GenericDef::I_READ_ONLY_COLLECTION, args)?,
    ])
}

fn dictionary_interfaces(
    registry: &TypeRegistry,
    args: &[TypeId],
) -> Result<Vec<TypeId>, HostError> {
    Ok(vec![registry.instantiate(GenericDef::I_READ_ONLY_DICTIONARY, args)?])
}

fn collection(
    name: &str,
    arity: usize,
    shape: CollectionShape,
    interfaces: Interfaces,
) -> GenericDefinition {
    GenericDefinition {
        name: name.into(),
        arity,
        template: Template::Class(Arc::new(
            move |registry: &TypeRegistry, inst: &Instantiation<'_>| {
                collection_class(registry, inst, shape, interfaces)
            },
        )),
    }
}

fn collection_class(
    registry: &TypeRegistry,
    inst: &Instantiation<'_>,
    shape: CollectionShape,
    interfaces: Interfaces,
) -> Result<ClassDef, HostError> {
    let def = inst
        .class()
        .sealed()
        .collection(shape)
        .implements(TypeId::ENUMERABLE);
    Ok(interfaces(registry, inst.args)?
        .into_iter()
        .fold(def, ClassDef::implements))
}

fn class(
    name: &str,
    arity: usize,
    build: fn(&Instantiation<'_>) -> ClassDef,
) -> GenericDefinition {
    GenericDefinition {
        name: name.into(),
        arity,
        template: Template::Class(Arc::new(
            move |_: &TypeRegistry, inst: &Instantiation<'_>| -> Result<ClassDef, HostError> {
                Ok(build(inst))
            },
        )),
    }
}

fn interface(name: &str, arity: usize, extends: Interfaces) -> GenericDefinition {
    GenericDefinition {
        name: name.into(),
        arity,
        template: Template::Interface(Arc::new(extends)),
    }
}
