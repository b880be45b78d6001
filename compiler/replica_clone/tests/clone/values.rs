use pretty_assertions::assert_eq;
use replica_clone::Mode;
use replica_host::{ClassDef, EnumValue, Primitive, StructDef, StructValue, TypeId, Value};

use crate::common::Model;

/// `Waypoint { label: String, at: Address }`, a struct holding a reference.
fn waypoint(model: &Model) -> TypeId {
    model
        .host
        .define_struct(
            StructDef::new("Waypoint")
                .field("label", TypeId::STRING)
                .field("at", model.address),
        )
        .unwrap()
}

fn at(value: &Value) -> &Value {
    &value.as_struct().unwrap().fields[1]
}

#[test]
fn structs_of_shared_fields_are_copied() {
    let model = Model::new();
    let tag = model.tag("fragile", 0.25);
    for mode in [Mode::Deep, Mode::Shallow] {
        assert_eq!(model.cloner.clone_value(&tag, model.tag, mode).unwrap(), tag);
    }
    assert!(model.cloner.is_safe_to_copy(model.tag).unwrap());
}

#[test]
fn deep_clone_of_a_struct_clones_its_references() {
    let model = Model::new();
    let waypoint_ty = waypoint(&model);
    let source = Value::Struct(StructValue {
        ty: waypoint_ty,
        fields: Box::new([
            model.host.string("depot"),
            Value::Ref(model.address("North Haverbrook", 7)),
        ]),
    });

    let deep = model.cloner.deep_clone(&source, waypoint_ty).unwrap();
    assert_ne!(at(&deep), at(&source));
    assert!(deep.equivalent(&source));
    assert_eq!(
        deep.as_struct().unwrap().fields[0],
        source.as_struct().unwrap().fields[0]
    );

    let shallow = model.cloner.shallow_clone(&source, waypoint_ty).unwrap();
    assert_eq!(shallow, source);
    assert_eq!(
        model.cloner.typed(waypoint_ty).unwrap().strategy(Mode::Deep),
        "struct-fields"
    );
}

#[test]
fn structs_inside_objects_are_cloned_in_place() {
    let model = Model::new();
    let waypoint_ty = waypoint(&model);
    let route = model
        .host
        .define_class(
            ClassDef::new("Route")
                .field("stop", waypoint_ty)
                .field("mark", model.tag),
        )
        .unwrap();
    let source = model.host.allocate_uninitialized(route).unwrap();
    model
        .host
        .set_field_by_name(
            &source,
            "stop",
            Value::Struct(StructValue {
                ty: waypoint_ty,
                fields: Box::new([
                    model.host.string("pier"),
                    Value::Ref(model.address("Brockway", 3)),
                ]),
            }),
        )
        .unwrap();
    model
        .host
        .set_field_by_name(&source, "mark", model.tag("blue", 2.0))
        .unwrap();
    let source = Value::Ref(source);

    let copy = model.cloner.deep_clone(&source, route).unwrap();
    let (copied_stop, source_stop) = (model.field(&copy, "stop"), model.field(&source, "stop"));
    assert_ne!(at(&copied_stop), at(&source_stop));
    assert_eq!(model.field(&copy, "mark"), model.field(&source, "mark"));
    assert!(copy.equivalent(&source));
}

#[test]
fn nullables_clone_their_payload() {
    let model = Model::new();
    let waypoint_ty = waypoint(&model);
    let maybe = model.host.nullable_of(waypoint_ty).unwrap();

    let empty = Value::none();
    assert_eq!(model.cloner.deep_clone(&empty, maybe).unwrap(), Value::none());
    assert_eq!(model.cloner.shallow_clone(&empty, maybe).unwrap(), Value::none());

    let payload = Value::Struct(StructValue {
        ty: waypoint_ty,
        fields: Box::new([Value::Null, Value::Ref(model.address("Cypress Creek", 11))]),
    });
    let source = Value::some(payload);
    let copy = model.cloner.deep_clone(&source, maybe).unwrap();
    let (Value::Nullable(Some(copied)), Value::Nullable(Some(original))) = (&copy, &source) else {
        panic!("expected nullables with a value, got {copy:?}");
    };
    assert_ne!(at(copied), at(original));
    assert!(copy.equivalent(&source));

    // Shallow clones keep the payload as it is.
    assert_eq!(model.cloner.shallow_clone(&source, maybe).unwrap(), source);
}

#[test]
fn nullable_of_a_safe_type_is_safe() {
    let model = Model::new();
    let maybe_int = model.host.nullable_of(TypeId::I32).unwrap();
    let value = Value::some(Value::I32(5));
    assert_eq!(model.cloner.deep_clone(&value, maybe_int).unwrap(), value);
    assert!(model.cloner.is_safe_to_copy(maybe_int).unwrap());
}

#[test]
fn a_plain_value_under_a_nullable_is_rejected() {
    let model = Model::new();
    let waypoint_ty = waypoint(&model);
    let maybe = model.host.nullable_of(waypoint_ty).unwrap();
    let plain = Value::Struct(StructValue {
        ty: waypoint_ty,
        fields: Box::new([Value::Null, Value::Null]),
    });
    assert!(model.cloner.deep_clone(&plain, maybe).is_err());
}

#[test]
fn enums_are_copied() {
    let model = Model::new();
    let color = model.host.define_enum("Color", Primitive::U8).unwrap();
    let red = Value::Enum(EnumValue { ty: color, bits: 1 });
    assert_eq!(model.cloner.deep_clone(&red, color).unwrap(), red);
    assert_eq!(model.cloner.typed(color).unwrap().strategy(Mode::Shallow), "identity");
}
