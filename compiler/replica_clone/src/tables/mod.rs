//! Lookup tables consulted by the classifier: types shared by contract and
//! types with dedicated clone procedures.
//!
//! Both tables are built before the `Cloner` that owns them and are
//! immutable afterwards, so lookups need no synchronization.

mod custom;
mod safe;


pub use custom::{ClonerFactory, CustomClonerTable, CustomProcedure};
pub use safe::SafeTypeTable;

use replica_host::{GenericDef, TypeDescriptor, TypeId};

/// Table key: one closed type, or every instance of an open generic
/// definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Exact(TypeId),
    Definition(GenericDef),
}

impl TypeKey {
    /// Keys under which `desc` may be registered, most specific first.
    pub(crate) fn candidates(desc: &TypeDescriptor) -> impl Iterator<Item = TypeKey> {
        std::iter::once(TypeKey::Exact(desc.id())).chain(desc.definition().map(TypeKey::Definition))
    }
}

impl From<TypeId> for TypeKey {
    fn from(ty: TypeId) -> Self {
        TypeKey::Exact(ty)
    }
}

impl From<GenericDef> for TypeKey {
    fn from(def: GenericDef) -> Self {
        TypeKey::Definition(def)
    }
}
