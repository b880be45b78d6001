use pretty_assertions::assert_eq;
use replica_clone::{CloneError, Mode};
use replica_host::{ClassDef, TypeId, Value};

use crate::common::{obj, Model};

struct Zoo {
    model: Model,
    animal: TypeId,
    dog: TypeId,
    pet: TypeId,
}

/// `abstract Animal { name }`, `Dog: Animal, IPet { owner: Person }`.
fn zoo() -> Zoo {
    let model = Model::new();
    let pet = model.host.define_interface("IPet", &[]).unwrap();
    let animal = model
        .host
        .define_class(
            ClassDef::new("Animal")
                .make_abstract()
                .field("name", TypeId::STRING),
        )
        .unwrap();
    let dog = model
        .host
        .define_class(
            ClassDef::new("Dog")
                .extends(animal)
                .implements(pet)
                .field("owner", model.person),
        )
        .unwrap();
    Zoo {
        model,
        animal,
        dog,
        pet,
    }
}

impl Zoo {
    fn dog(&self, name: &str) -> Value {
        let host = &self.model.host;
        let dog = host.allocate_uninitialized(self.dog).unwrap();
        host.set_field_by_name(&dog, "name", host.string(name)).unwrap();
        let owner = self.model.person("Marge", 36);
        host.set_field_by_name(&dog, "owner", Value::Ref(owner))
            .unwrap();
        Value::Ref(dog)
    }
}

#[test]
fn open_declarations_clone_with_the_runtime_type() {
    let zoo = zoo();
    let source = zoo.dog("Santa's Little Helper");
    for declared in [zoo.animal, zoo.pet, TypeId::OBJECT, zoo.dog] {
        let copy = zoo.model.cloner.deep_clone(&source, declared).unwrap();
        assert_eq!(obj(&copy).ty(), zoo.dog);
        assert_ne!(copy, source);
        assert_ne!(
            zoo.model.field(&copy, "owner"),
            zoo.model.field(&source, "owner")
        );
        assert!(copy.equivalent(&source));
    }
    assert_eq!(
        zoo.model.cloner.typed(zoo.pet).unwrap().strategy(Mode::Deep),
        "runtime-dispatch"
    );
}

#[test]
fn fields_of_open_types_dispatch_per_value() {
    let zoo = zoo();
    let model = &zoo.model;
    let source = model.person("Bart", 10);
    let dog = zoo.dog("Laddie");
    model
        .host
        .set_field_by_name(&source, "extra", dog.clone())
        .unwrap();
    let source = Value::Ref(source);

    let copy = model.cloner.deep_clone(&source, model.person).unwrap();
    let extra = model.field(&copy, "extra");
    assert_eq!(obj(&extra).ty(), zoo.dog);
    assert_ne!(extra, dog);

    let shallow = model.cloner.shallow_clone(&source, model.person).unwrap();
    assert_eq!(model.field(&shallow, "extra"), dog);
}

#[test]
fn subclass_instances_keep_their_derived_fields() {
    let model = Model::new();
    let student = model
        .host
        .define_class(
            ClassDef::new("Student")
                .extends(model.person)
                .field("school", model.address),
        )
        .unwrap();
    let lisa = model.host.allocate_uninitialized(student).unwrap();
    model
        .host
        .set_field_by_name(&lisa, "school", Value::Ref(model.address("Springfield", 1)))
        .unwrap();
    let source = Value::Ref(lisa);

    // Declared as the concrete base, cloned as the subclass.
    for mode in [Mode::Deep, Mode::Shallow] {
        let copy = model.cloner.clone_value(&source, model.person, mode).unwrap();
        assert_eq!(obj(&copy).ty(), student);
        assert!(copy.equivalent(&source));
    }
    let deep = model.cloner.deep_clone(&source, model.person).unwrap();
    assert_ne!(model.field(&deep, "school"), model.field(&source, "school"));
}

#[test]
fn values_outside_the_declared_type_are_rejected() {
    let zoo = zoo();
    let model = &zoo.model;
    let stranger = Value::Ref(model.address("Shelbyville", 0));

    let err = model.cloner.deep_clone(&stranger, zoo.animal).unwrap_err();
    assert_eq!(
        err,
        CloneError::TypeMismatch {
            expected: "Animal".into(),
            found: "Address".into(),
        }
    );
    assert_eq!(
        err.to_string(),
        "expected a value of `Animal`, got `Address`"
    );
}

#[test]
fn erased_calls_use_the_runtime_type() {
    let zoo = zoo();
    let model = &zoo.model;
    let source = zoo.dog("Bolt");

    let deep = model.cloner.deep_clone_erased(&source, zoo.dog).unwrap();
    assert_ne!(deep, source);
    assert!(deep.equivalent(&source));
    let shallow = model.cloner.shallow_clone_erased(&source, zoo.dog).unwrap();
    assert_eq!(
        model.field(&shallow, "owner"),
        model.field(&source, "owner")
    );

    // The erased entry point is keyed by the exact runtime type.
    assert!(matches!(
        model.cloner.deep_clone_erased(&source, zoo.animal),
        Err(CloneError::TypeMismatch { .. })
    ));
    assert!(model.cloner.stats().runtime >= 2);
}

#[test]
fn native_values_round_trip() {
    let model = Model::new();
    assert_eq!(model.cloner.deep(42_i32).unwrap(), 42);
    assert_eq!(model.cloner.shallow(2.5_f64).unwrap(), 2.5);
    assert_eq!(model.cloner.deep(String::from("text")).unwrap(), "text");
    assert_eq!(model.cloner.deep('λ').unwrap(), 'λ');
}

#[test]
fn typed_handles_report_their_strategies() {
    let model = Model::new();
    let person = model.cloner.typed(model.person).unwrap();
    assert_eq!(person.ty(), model.person);
    assert_eq!(&**person.name(), "Person");
    assert_eq!(person.strategy(Mode::Deep), "object-fields");
    assert_eq!(person.strategy(Mode::Shallow), "duplicate");

    let address = model.cloner.typed(model.address).unwrap();
    assert_eq!(address.strategy(Mode::Deep), "object-wholesale");
    assert_eq!(
        model.cloner.typed(TypeId::STRING).unwrap().strategy(Mode::Deep),
        "identity"
    );

    let source = Value::Ref(model.person("Maggie", 1));
    let copy = person.deep(&source).unwrap();
    assert!(copy.equivalent(&source));
    assert_eq!(person.shallow(&Value::Null).unwrap(), Value::Null);
}
