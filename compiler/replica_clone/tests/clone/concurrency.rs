use pretty_assertions::assert_eq;
use rayon::prelude::*;
use replica_clone::{Cloner, ClonerConfig, CompilePolicy, Mode, TypedCloner};
use replica_host::Value;

use crate::common::Model;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn cloners_are_shareable() {
    assert_send_sync::<Cloner>();
    assert_send_sync::<TypedCloner<'static>>();
}

fn clone_in_parallel(policy: CompilePolicy) -> (Model, Cloner) {
    let model = Model::new();
    let cloner = Cloner::builder(model.host.clone())
        .config(ClonerConfig::default().with_compile_policy(policy))
        .build();
    let people: Vec<Value> = (0..64)
        .map(|age| Value::Ref(model.person("Homer", age)))
        .collect();

    let copies: Vec<Value> = people
        .par_iter()
        .map(|person| cloner.deep_clone(person, model.person).unwrap())
        .collect();
    for (copy, person) in copies.iter().zip(&people) {
        assert_ne!(copy, person);
        assert!(copy.equivalent(person));
    }
    (model, cloner)
}

#[test]
fn single_flight_compiles_each_type_once() {
    let (_model, cloner) = clone_in_parallel(CompilePolicy::SingleFlight);
    let stats = cloner.stats();
    // Person and its Address field.
    assert_eq!(stats.compilations, 2);
    assert_eq!(stats.typed, 2);
    assert_eq!(stats.to_string(), "2 typed, 1 runtime, 2 compilations");
}

#[test]
fn racy_compilation_publishes_one_entry_per_type() {
    let (model, cloner) = clone_in_parallel(CompilePolicy::Racy);
    let stats = cloner.stats();
    assert_eq!(stats.typed, 2);
    assert!(stats.compilations >= 2);

    // Once published, entries are stable.
    let first = cloner.typed(model.person).unwrap().strategy(Mode::Deep);
    assert_eq!(first, "object-fields");
    assert_eq!(cloner.stats().typed, 2);
}

#[test]
fn one_cloner_serves_many_graphs_at_once() {
    let model = Model::new();
    let threads: Vec<Value> = (0..32)
        .map(|i| {
            let person = model.person("Lenny", i);
            let friend = model.person("Carl", i);
            model
                .host
                .set_field_by_name(&person, "friend", Value::Ref(friend))
                .unwrap();
            Value::Ref(person)
        })
        .collect();

    threads.par_iter().for_each(|person| {
        let copy = model.cloner.deep_clone(person, model.person).unwrap();
        assert!(copy.equivalent(person));
        assert_ne!(model.field(&copy, "friend"), model.field(person, "friend"));
    });
    let stats = model.cloner.stats();
    assert_eq!((stats.typed, stats.runtime), (2, 1));
}
