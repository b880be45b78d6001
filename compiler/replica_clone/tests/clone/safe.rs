use std::sync::Arc;

use pretty_assertions::assert_eq;
use replica_clone::{Cloner, Mode, SafeTypeTable};
use replica_host::{ClassDef, ObjRef, StructValue, TypeId, Value};

use crate::common::{obj, Model};

#[test]
fn primitives_are_returned_unchanged() {
    let model = Model::new();
    let cloner = &model.cloner;
    for (value, ty) in [
        (Value::Bool(true), TypeId::BOOL),
        (Value::Char('x'), TypeId::CHAR),
        (Value::I64(-9), TypeId::I64),
        (Value::U16(7), TypeId::U16),
        (Value::F32(1.5), TypeId::F32),
        (Value::ISize(-1), TypeId::ISIZE),
        (Value::USize(3), TypeId::USIZE),
        (Value::Handle(0xfeed), TypeId::HANDLE),
    ] {
        assert_eq!(cloner.deep_clone(&value, ty).unwrap(), value);
        assert_eq!(cloner.shallow_clone(&value, ty).unwrap(), value);
    }
}

#[test]
fn safe_reference_types_keep_identity() {
    let model = Model::new();
    let host = &model.host;
    let text = host.string("immutable");
    let info = host.type_info(model.person).unwrap();
    let mutex = Value::Ref(host.opaque(TypeId::MUTEX, Arc::new(())).unwrap());

    for (value, ty) in [
        (&text, TypeId::STRING),
        (&info, TypeId::TYPE_INFO),
        (&mutex, TypeId::MUTEX),
    ] {
        let deep = model.cloner.deep_clone(value, ty).unwrap();
        let shallow = model.cloner.shallow_clone(value, ty).unwrap();
        assert!(ObjRef::ptr_eq(obj(&deep), obj(value)));
        assert!(ObjRef::ptr_eq(obj(&shallow), obj(value)));
    }
}

#[test]
fn well_known_value_types_are_copied() {
    let model = Model::new();
    let guid = Value::Struct(StructValue {
        ty: TypeId::GUID,
        fields: Box::new([Value::U64(1), Value::U64(2)]),
    });
    assert_eq!(model.cloner.deep_clone(&guid, TypeId::GUID).unwrap(), guid);
    assert!(model.cloner.is_safe_to_copy(TypeId::DATETIME).unwrap());
}

#[test]
fn exceptions_are_shared() {
    let model = Model::new();
    let host = &model.host;
    let failure = host
        .define_class(
            ClassDef::new("IoFailure")
                .extends(TypeId::EXCEPTION)
                .field("path", TypeId::STRING),
        )
        .unwrap();
    let err = host.allocate_uninitialized(failure).unwrap();
    host.set_field_by_name(&err, "message", host.string("disk full"))
        .unwrap();
    let value = Value::Ref(err.clone());

    let copy = model.cloner.deep_clone(&value, TypeId::EXCEPTION).unwrap();
    assert!(ObjRef::ptr_eq(obj(&copy), &err));
}

#[test]
fn null_stays_null() {
    let model = Model::new();
    for ty in [model.person, TypeId::STRING, TypeId::OBJECT, TypeId::ENUMERABLE] {
        assert_eq!(model.cloner.deep_clone(&Value::Null, ty).unwrap(), Value::Null);
        assert_eq!(
            model.cloner.shallow_clone(&Value::Null, ty).unwrap(),
            Value::Null
        );
        assert_eq!(
            model.cloner.deep_clone_erased(&Value::Null, ty).unwrap(),
            Value::Null
        );
    }
}

#[test]
fn removing_string_from_the_table_duplicates_strings() {
    let model = Model::new();
    let cloner = Cloner::builder(model.host.clone())
        .safe_types(SafeTypeTable::builtin().without(TypeId::STRING))
        .build();
    let text = model.host.string("copied");
    let copy = cloner.deep_clone(&text, TypeId::STRING).unwrap();
    assert!(!ObjRef::ptr_eq(obj(&copy), obj(&text)));
    assert!(copy.equivalent(&text));
    assert_eq!(cloner.safe_types().len(), SafeTypeTable::builtin().len() - 1);
}

#[test]
fn safe_declared_types_share_subtype_values() {
    let model = Model::new();
    let host = &model.host;
    let config = host
        .define_class(ClassDef::new("Config").field("path", TypeId::STRING))
        .unwrap();
    let derived = host
        .define_class(
            ClassDef::new("DerivedConfig")
                .extends(config)
                .field("home", model.address),
        )
        .unwrap();
    let holder = host
        .define_class(ClassDef::new("Holder").field("config", config))
        .unwrap();
    let cloner = Cloner::builder(host.clone())
        .safe_types(SafeTypeTable::builtin().with(config))
        .build();
    assert_eq!(cloner.typed(config).unwrap().strategy(Mode::Deep), "identity");

    let instance = host.allocate_uninitialized(derived).unwrap();
    let value = Value::Ref(instance.clone());
    for mode in [Mode::Deep, Mode::Shallow] {
        let copy = cloner.clone_value(&value, config, mode).unwrap();
        assert!(ObjRef::ptr_eq(obj(&copy), &instance), "{mode:?}");
    }

    // The same value held in a field of the safe type is shared as well.
    let outer = host.allocate_uninitialized(holder).unwrap();
    host.set_field(&outer, 0, value).unwrap();
    let copy = cloner.deep_clone(&Value::Ref(outer), holder).unwrap();
    assert!(ObjRef::ptr_eq(obj(&model.field(&copy, "config")), &instance));

    // Declared as the derived type itself, the value is cloned.
    let own = cloner.deep_clone(&Value::Ref(instance.clone()), derived).unwrap();
    assert!(!ObjRef::ptr_eq(obj(&own), &instance));
}
