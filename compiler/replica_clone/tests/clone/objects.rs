use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use replica_clone::{CloneError, Cloner, ClonerConfig, Mode};
use replica_host::{ClassDef, TypeId, Value};

use crate::common::{obj, Model};

#[test]
fn deep_clone_is_a_new_independent_graph() {
    let model = Model::new();
    let alice = model.person("Alice", 30);
    let bob = model.person("Bob", 31);
    model
        .host
        .set_field_by_name(&alice, "friend", Value::Ref(bob))
        .unwrap();
    let source = Value::Ref(alice.clone());

    let copy = model.cloner.deep_clone(&source, model.person).unwrap();
    assert_ne!(copy, source);
    assert!(copy.equivalent(&source));

    // Safe fields are shared, everything else is new.
    assert_eq!(model.field(&copy, "name"), model.field(&source, "name"));
    assert_ne!(model.field(&copy, "home"), model.field(&source, "home"));
    assert_ne!(model.field(&copy, "friend"), model.field(&source, "friend"));
    assert_eq!(model.field(&copy, "age"), Value::I32(30));

    // Mutating the copy leaves the source alone.
    let home = model.field(&copy, "home");
    model
        .host
        .set_field_by_name(obj(&home), "zip", Value::I32(1))
        .unwrap();
    let original_home = model.field(&source, "home");
    assert_eq!(model.field(&original_home, "zip"), Value::I32(4242));
}

#[test]
fn shallow_clone_shares_every_field() {
    let model = Model::new();
    let source = Value::Ref(model.person("Carol", 40));
    let copy = model.cloner.shallow_clone(&source, model.person).unwrap();

    assert_ne!(copy, source);
    for field in ["name", "age", "home", "friend", "extra"] {
        assert_eq!(model.field(&copy, field), model.field(&source, field), "{field}");
    }
}

#[test]
fn shared_references_are_not_preserved() {
    let model = Model::new();
    let pair = model
        .host
        .define_class(
            ClassDef::new("Twins")
                .field("left", model.address)
                .field("right", model.address),
        )
        .unwrap();
    let twins = model.host.allocate_uninitialized(pair).unwrap();
    let shared = Value::Ref(model.address("Ogdenville", 1));
    model.host.set_field(&twins, 0, shared.clone()).unwrap();
    model.host.set_field(&twins, 1, shared).unwrap();

    let copy = model
        .cloner
        .deep_clone(&Value::Ref(twins), pair)
        .unwrap();
    let (left, right) = (model.field(&copy, "left"), model.field(&copy, "right"));
    assert_ne!(left, right, "each field gets its own copy");
    assert!(left.equivalent(&right));
}

#[test]
fn inherited_and_private_fields_are_cloned() {
    let model = Model::new();
    let employee = model
        .host
        .define_class(
            ClassDef::new("Employee")
                .extends(model.person)
                .private_field("office", model.address),
        )
        .unwrap();
    let worker = model.host.allocate_uninitialized(employee).unwrap();
    model
        .host
        .set_field_by_name(&worker, "age", Value::I32(52))
        .unwrap();
    model
        .host
        .set_field_by_name(&worker, "office", Value::Ref(model.address("Capital City", 9)))
        .unwrap();
    let source = Value::Ref(worker);

    let copy = model.cloner.deep_clone(&source, employee).unwrap();
    assert_eq!(obj(&copy).ty(), employee);
    assert_eq!(model.field(&copy, "age"), Value::I32(52));
    assert_ne!(model.field(&copy, "office"), model.field(&source, "office"));
    assert!(copy.equivalent(&source));
}

#[test]
fn constructor_runs_once_per_deep_clone() {
    let model = Model::new();
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let account = model
        .host
        .define_class(
            ClassDef::new("Account")
                .field("balance", TypeId::I64)
                .field("owner", model.address)
                .constructor(move |_, slots| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    slots[0] = Value::I64(-1);
                    Ok(())
                }),
        )
        .unwrap();
    let source = model.host.construct(account).unwrap();
    model.host.set_field(&source, 0, Value::I64(100)).unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    let source = Value::Ref(source);
    let copy = model.cloner.deep_clone(&source, account).unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert_eq!(model.field(&copy, "balance"), Value::I64(100));

    // Shallow clones never run constructors.
    model.cloner.shallow_clone(&source, account).unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[test]
fn missing_allocation_path_is_reported_once_per_type() {
    let model = Model::new();
    let sealed_off = model
        .host
        .define_class(
            ClassDef::new("Handleless")
                .field("inner", model.address)
                .without_raw_allocation(),
        )
        .unwrap();
    assert!(model.host.allocate_uninitialized(sealed_off).is_err());
    assert!(model.host.construct(sealed_off).is_err());

    // No instance can exist, but a plan is still compiled for the type.
    let typed = model.cloner.typed(sealed_off).unwrap();
    assert_eq!(typed.strategy(Mode::Deep), "fail");
    assert_eq!(typed.strategy(Mode::Shallow), "duplicate");

    let before = model.cloner.stats().compilations;
    for _ in 0..3 {
        let err = model
            .cloner
            .deep_clone(&Value::I32(0), sealed_off)
            .unwrap_err();
        assert!(matches!(err, CloneError::NoAllocationPath { .. }));
        assert!(err.is_configuration());
    }
    assert_eq!(model.cloner.stats().compilations, before);
}

#[test]
fn top_type_instances_clone_to_fresh_objects() {
    let model = Model::new();
    let source = Value::Ref(model.host.construct(TypeId::OBJECT).unwrap());
    for mode in [Mode::Deep, Mode::Shallow] {
        let copy = model.cloner.clone_value(&source, TypeId::OBJECT, mode).unwrap();
        assert_eq!(obj(&copy).ty(), TypeId::OBJECT);
        assert_ne!(copy, source);
    }
}

fn chain(model: &Model, node: TypeId, length: i64) -> Value {
    let mut head = Value::Null;
    for i in 0..length {
        let link = model.host.allocate_uninitialized(node).unwrap();
        model.host.set_field(&link, 0, Value::I64(i)).unwrap();
        model.host.set_field(&link, 1, head).unwrap();
        head = Value::Ref(link);
    }
    head
}

/// Break a chain link by link so dropping it does not recurse.
fn unlink(model: &Model, head: Value) {
    let mut next = head;
    while let Value::Ref(link) = next {
        next = model.host.get_field(&link, 1).unwrap();
        model.host.set_field(&link, 1, Value::Null).unwrap();
    }
}

fn define_link(model: &Model) -> TypeId {
    let link = model.host.declare("Link").unwrap();
    model
        .host
        .define_class(
            ClassDef::new("Link")
                .field("value", TypeId::I64)
                .field("next", link),
        )
        .unwrap();
    link
}

#[test]
fn long_chains_clone_without_overflowing() {
    let model = Model::new();
    let link = define_link(&model);
    let head = chain(&model, link, 10_000);
    let copy = model.cloner.deep_clone(&head, link).unwrap();
    assert_ne!(copy, head);
    assert_eq!(model.field(&copy, "value"), Value::I64(9_999));
    assert!(matches!(model.field(&copy, "next"), Value::Ref(_)));
    unlink(&model, copy);
    unlink(&model, head);
}

#[test]
fn depth_limit_stops_runaway_graphs() {
    let model = Model::new();
    let link = define_link(&model);
    let cloner = Cloner::builder(model.host.clone())
        .config(ClonerConfig::default().with_max_depth(8))
        .build();

    assert!(cloner.deep_clone(&chain(&model, link, 8), link).is_ok());
    assert_eq!(
        cloner.deep_clone(&chain(&model, link, 10), link).unwrap_err(),
        CloneError::DepthExceeded { limit: 8 }
    );

    // A cycle never terminates on its own.
    let ring = model.host.allocate_uninitialized(link).unwrap();
    model
        .host
        .set_field(&ring, 1, Value::Ref(ring.clone()))
        .unwrap();
    assert!(matches!(
        cloner.deep_clone(&Value::Ref(ring), link),
        Err(CloneError::DepthExceeded { .. })
    ));
}

#[test]
fn values_of_the_wrong_type_are_rejected() {
    let model = Model::new();
    let source = Value::Ref(model.address("Shelbyville", 2));
    let err = model.cloner.deep_clone(&source, model.person).unwrap_err();
    assert_eq!(
        err,
        CloneError::TypeMismatch {
            expected: "Person".into(),
            found: "Address".into(),
        }
    );
    assert!(matches!(
        model.cloner.deep_clone(&Value::I32(1), model.person),
        Err(CloneError::ShapeMismatch { .. })
    ));
}
