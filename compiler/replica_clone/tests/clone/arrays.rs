use pretty_assertions::assert_eq;
use replica_clone::{Mode, MAX_CLONED_RANK};
use replica_host::{ClassDef, ObjRef, TypeId, Value};

use crate::common::{obj, Model};

fn addresses(model: &Model, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| Value::Ref(model.address("Springfield", i32::try_from(i).unwrap())))
        .collect()
}

fn elements(value: &Value) -> Vec<Value> {
    obj(value).snapshot().as_array().unwrap().elements().to_vec()
}

#[test]
fn deep_clone_of_a_vector_clones_every_element() {
    let model = Model::new();
    let source = model.host.array(model.address, addresses(&model, 10)).unwrap();
    let ty = model.host.array_of(model.address, 1).unwrap();

    let copy = model.cloner.deep_clone(&source, ty).unwrap();
    assert_ne!(copy, source);
    assert!(copy.equivalent(&source));
    for (copied, original) in elements(&copy).iter().zip(elements(&source)) {
        assert_ne!(*copied, original);
    }
}

#[test]
fn shallow_clone_of_a_vector_shares_elements() {
    let model = Model::new();
    let source = model.host.array(model.address, addresses(&model, 10)).unwrap();
    let ty = model.host.array_of(model.address, 1).unwrap();

    let copy = model.cloner.shallow_clone(&source, ty).unwrap();
    assert_ne!(copy, source);
    assert_eq!(elements(&copy), elements(&source));
}

#[test]
fn arrays_of_safe_elements_are_copied_not_shared() {
    let model = Model::new();
    let source = model
        .host
        .array(TypeId::I32, vec![Value::I32(1), Value::I32(2), Value::I32(3)])
        .unwrap();
    let ty = model.host.array_of(TypeId::I32, 1).unwrap();

    let copy = model.cloner.deep_clone(&source, ty).unwrap();
    assert!(!ObjRef::ptr_eq(obj(&copy), obj(&source)));
    assert_eq!(elements(&copy), elements(&source));
    assert_eq!(
        model.cloner.typed(ty).unwrap().strategy(Mode::Deep),
        "array-copy"
    );

    // The clone is a separate array.
    model
        .host
        .set_element(obj(&copy), &[0], Value::I32(99))
        .unwrap();
    assert_eq!(model.host.element(obj(&source), &[0]).unwrap(), Value::I32(1));
}

#[test]
fn multidimensional_arrays_keep_their_shape() {
    let model = Model::new();
    for rank in 2..=MAX_CLONED_RANK {
        let ty = model.host.array_of(model.address, rank).unwrap();
        let lengths: Vec<usize> = (0..rank).map(|d| d + 1).collect();
        let count = lengths.iter().product();
        let source = Value::Ref(
            model
                .host
                .new_array(ty, &lengths, addresses(&model, count))
                .unwrap(),
        );

        let copy = model.cloner.deep_clone(&source, ty).unwrap();
        let snapshot = obj(&copy).snapshot();
        let data = snapshot.as_array().unwrap();
        assert_eq!(data.rank(), rank);
        assert_eq!(data.lengths(), &lengths[..]);
        assert!(copy.equivalent(&source));

        let last: Vec<usize> = lengths.iter().map(|len| len - 1).collect();
        assert_ne!(
            model.host.element(obj(&copy), &last).unwrap(),
            model.host.element(obj(&source), &last).unwrap()
        );
    }
}

#[test]
fn arrays_above_the_cloned_rank_are_duplicated() {
    let model = Model::new();
    let rank = MAX_CLONED_RANK + 1;
    let ty = model.host.array_of(model.address, rank).unwrap();
    let lengths = [2, 1, 2, 1, 2];
    assert_eq!(lengths.len(), rank);
    let source = Value::Ref(
        model
            .host
            .new_array(ty, &lengths, addresses(&model, 8))
            .unwrap(),
    );

    let typed = model.cloner.typed(ty).unwrap();
    for mode in [Mode::Deep, Mode::Shallow] {
        assert_eq!(typed.strategy(mode), "duplicate");
        let copy = model.cloner.clone_value(&source, ty, mode).unwrap();
        assert_ne!(copy, source);
        assert_eq!(obj(&copy).snapshot().as_array().unwrap().lengths(), &lengths[..]);

        let (copied, original) = (elements(&copy), elements(&source));
        assert_eq!(copied.len(), 8);
        for (copied, original) in copied.iter().zip(&original) {
            assert!(ObjRef::ptr_eq(obj(copied), obj(original)), "{mode:?}");
        }
    }
}

#[test]
fn empty_arrays_clone_to_new_empty_arrays() {
    let model = Model::new();
    let ty = model.host.array_of(model.address, 2).unwrap();
    let source = Value::Ref(model.host.new_array(ty, &[0, 3], Vec::new()).unwrap());

    for mode in [Mode::Deep, Mode::Shallow] {
        let copy = model.cloner.clone_value(&source, ty, mode).unwrap();
        assert_ne!(copy, source);
        let snapshot = obj(&copy).snapshot();
        let data = snapshot.as_array().unwrap();
        assert!(data.is_empty());
        assert_eq!(data.lengths(), &[0, 3]);
    }
}

#[test]
fn jagged_arrays_clone_each_row() {
    let model = Model::new();
    let row_ty = model.host.array_of(model.address, 1).unwrap();
    let rows = vec![
        model.host.array(model.address, addresses(&model, 2)).unwrap(),
        Value::Null,
        model.host.array(model.address, addresses(&model, 1)).unwrap(),
    ];
    let source = model.host.array(row_ty, rows).unwrap();
    let ty = model.host.array_of(row_ty, 1).unwrap();

    let copy = model.cloner.deep_clone(&source, ty).unwrap();
    let (copied, original) = (elements(&copy), elements(&source));
    assert_ne!(copied[0], original[0]);
    assert_eq!(copied[1], Value::Null);
    assert_ne!(elements(&copied[2])[0], elements(&original[2])[0]);
    assert!(copy.equivalent(&source));
}

#[test]
fn interface_elements_dispatch_on_their_runtime_type() {
    let model = Model::new();
    let shape = model.host.define_interface("IShape", &[]).unwrap();
    let circle = model
        .host
        .define_class(
            ClassDef::new("Circle")
                .implements(shape)
                .field("center", model.address)
                .field("radius", TypeId::F64),
        )
        .unwrap();
    let square = model
        .host
        .define_class(ClassDef::new("Square").implements(shape).field("side", TypeId::F64))
        .unwrap();

    let round = model.host.allocate_uninitialized(circle).unwrap();
    model
        .host
        .set_field_by_name(&round, "center", Value::Ref(model.address("Ogdenville", 5)))
        .unwrap();
    let boxy = model.host.allocate_uninitialized(square).unwrap();
    let source = model
        .host
        .array(shape, vec![Value::Ref(round), Value::Ref(boxy), Value::Null])
        .unwrap();
    let ty = model.host.array_of(shape, 1).unwrap();

    let copy = model.cloner.deep_clone(&source, ty).unwrap();
    let copied = elements(&copy);
    assert_eq!(obj(&copied[0]).ty(), circle);
    assert_eq!(obj(&copied[1]).ty(), square);
    assert_eq!(copied[2], Value::Null);
    let original = elements(&source);
    assert_ne!(
        model.field(&copied[0], "center"),
        model.field(&original[0], "center")
    );
    assert!(copy.equivalent(&source));
}
