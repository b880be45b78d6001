//! Structural equivalence across object graphs.

use rustc_hash::FxHashSet;

use super::{Body, CollectionData, ObjRef, Value};

impl Value {
    /// Check if two values describe the same graph shape and data.
    ///
    /// Heap objects are compared by runtime type and body, recursively.
    /// Object pairs already under comparison are assumed equivalent, so
    /// cyclic graphs terminate. Opaque payloads are equivalent only when
    /// they are the same allocation.
    pub fn equivalent(&self, other: &Value) -> bool {
        let mut visiting = FxHashSet::default();
        equivalent_in(self, other, &mut visiting)
    }
}

fn equivalent_in(a: &Value, b: &Value, visiting: &mut FxHashSet<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Struct(x), Value::Struct(y)) => {
            x.ty == y.ty && all_equivalent(&x.fields, &y.fields, visiting)
        }
        (Value::Nullable(Some(x)), Value::Nullable(Some(y))) => equivalent_in(x, y, visiting),
        (Value::Ref(x), Value::Ref(y)) => objects_equivalent(x, y, visiting),
        _ => a == b,
    }
}

fn objects_equivalent(a: &ObjRef, b: &ObjRef, visiting: &mut FxHashSet<(usize, usize)>) -> bool {
    if ObjRef::ptr_eq(a, b) {
        return true;
    }
    if a.ty() != b.ty() {
        return false;
    }
    if !visiting.insert((a.addr(), b.addr())) {
        return true;
    }

    // Snapshots keep no lock held while recursing into shared children.
    let (left, right) = (a.snapshot(), b.snapshot());
    match (&left, &right) {
        (Body::Fields(x), Body::Fields(y)) => all_equivalent(x, y, visiting),
        (Body::Str(x), Body::Str(y)) => x == y,
        (Body::Array(x), Body::Array(y)) => {
            x.lengths() == y.lengths() && all_equivalent(x.elements(), y.elements(), visiting)
        }
        (
            Body::Collection(CollectionData::Items(x)),
            Body::Collection(CollectionData::Items(y)),
        ) => all_equivalent(x, y, visiting),
        (
            Body::Collection(CollectionData::Pairs(x)),
            Body::Collection(CollectionData::Pairs(y)),
        ) => {
            x.len() == y.len()
                && x.iter().zip(y).all(|((xk, xv), (yk, yv))| {
                    equivalent_in(xk, yk, visiting) && equivalent_in(xv, yv, visiting)
                })
        }
        (Body::Opaque(x), Body::Opaque(y)) => std::sync::Arc::ptr_eq(x, y),
        _ => false,
    }
}

fn all_equivalent(a: &[Value], b: &[Value], visiting: &mut FxHashSet<(usize, usize)>) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| equivalent_in(x, y, visiting))
}
