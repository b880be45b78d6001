//! Dedicated deep clone procedures for the well-known mutable collections.
//!
//! These collections keep their contents in a native body rather than in
//! fields, so the generic object plan cannot copy them. Each procedure
//! builds a new collection of the same type whose elements are the deep
//! clones of the source's, in the same order.


use std::sync::Arc;

use replica_host::{Body, CollectionData, GenericDef, Host, ObjRef, TypeId, Value};

use crate::exec::body_kind;
use crate::{CloneCx, CloneError, CustomClonerTable, CustomProcedure};

/// Sequence-shaped collections: one element type.
const ITEM_COLLECTIONS: [GenericDef; 9] = [
    GenericDef::LIST,
    GenericDef::HASH_SET,
    GenericDef::QUEUE,
    GenericDef::STACK,
    GenericDef::LINKED_LIST,
    GenericDef::SORTED_SET,
    GenericDef::CONCURRENT_BAG,
    GenericDef::CONCURRENT_QUEUE,
    GenericDef::CONCURRENT_STACK,
];

/// Pair-shaped collections: key (or element) type, then value (or
/// priority) type.
const PAIR_COLLECTIONS: [GenericDef; 4] = [
    GenericDef::DICTIONARY,
    GenericDef::SORTED_DICTIONARY,
    GenericDef::CONCURRENT_DICTIONARY,
    GenericDef::PRIORITY_QUEUE,
];

/// Add the collection procedures to `table`.
pub(crate) fn register(table: CustomClonerTable) -> CustomClonerTable {
    let table = ITEM_COLLECTIONS
        .into_iter()
        .fold(table, |table, def| table.with_factory(def, items_factory));
    PAIR_COLLECTIONS
        .into_iter()
        .fold(table, |table, def| table.with_factory(def, pairs_factory))
}

fn items_factory(_: &Host, args: &[TypeId]) -> Result<CustomProcedure, CloneError> {
    let &[element] = args else {
        return Err(arity_error("item", 1, args.len()));
    };
    Ok(Arc::new(move |cx: &CloneCx<'_>, value: &Value| {
        clone_items(cx, value, element)
    }))
}

fn pairs_factory(_: &Host, args: &[TypeId]) -> Result<CustomProcedure, CloneError> {
    let &[key, val] = args else {
        return Err(arity_error("pair", 2, args.len()));
    };
    Ok(Arc::new(move |cx: &CloneCx<'_>, value: &Value| {
        clone_pairs(cx, value, key, val)
    }))
}

fn arity_error(shape: &str, expected: usize, found: usize) -> CloneError {
    CloneError::custom(format!(
        "{shape} collection expects {expected} type arguments, got {found}"
    ))
}

fn clone_items(cx: &CloneCx<'_>, value: &Value, element: TypeId) -> Result<Value, CloneError> {
    let source = expect_ref(cx, value)?;
    let items = match source.snapshot() {
        Body::Collection(CollectionData::Items(items)) => items,
        other => return Err(shape_error(cx, source.ty(), "item collection", body_kind(&other))),
    };
    let items = if cx.is_shared(element)? {
        items
    } else {
        items
            .iter()
            .map(|item| cx.deep(item, element))
            .collect::<Result<_, _>>()?
    };
    let body = Body::Collection(CollectionData::Items(items));
    Ok(Value::Ref(cx.host().clone_with_body(source, body)?))
}

fn clone_pairs(
    cx: &CloneCx<'_>,
    value: &Value,
    key: TypeId,
    val: TypeId,
) -> Result<Value, CloneError> {
    let source = expect_ref(cx, value)?;
    let pairs = match source.snapshot() {
        Body::Collection(CollectionData::Pairs(pairs)) => pairs,
        other => return Err(shape_error(cx, source.ty(), "pair collection", body_kind(&other))),
    };
    let (key_shared, val_shared) = (cx.is_shared(key)?, cx.is_shared(val)?);
    let pairs = if key_shared && val_shared {
        pairs
    } else {
        pairs
            .iter()
            .map(|(k, v)| -> Result<(Value, Value), CloneError> {
                let k = if key_shared { k.clone() } else { cx.deep(k, key)? };
                let v = if val_shared { v.clone() } else { cx.deep(v, val)? };
                Ok((k, v))
            })
            .collect::<Result<_, _>>()?
    };
    let body = Body::Collection(CollectionData::Pairs(pairs));
    Ok(Value::Ref(cx.host().clone_with_body(source, body)?))
}

fn expect_ref<'v>(cx: &CloneCx<'_>, value: &'v Value) -> Result<&'v ObjRef, CloneError> {
    match value {
        Value::Ref(obj) => Ok(obj),
        other => match cx.host().runtime_type(other) {
            Some(ty) => Err(shape_error(cx, ty, "collection", other.kind_name())),
            None => Err(CloneError::custom("collection procedure received no value")),
        },
    }
}

fn shape_error(
    cx: &CloneCx<'_>,
    ty: TypeId,
    expected: &'static str,
    found: &'static str,
) -> CloneError {
    match cx.host().name_of(ty) {
        Ok(name) => CloneError::ShapeMismatch {
            ty: name,
            expected,
            found,
        },
        Err(err) => err.into(),
    }
}
