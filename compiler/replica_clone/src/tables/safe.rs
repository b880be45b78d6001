use rustc_hash::FxHashSet;

use replica_host::{GenericDef, TypeDescriptor, TypeId};

use super::TypeKey;

/// Types whose values are never cloned: a clone returns the original
/// value or reference.
///
/// Members are immutable values or values that are meaningless to
/// duplicate (synchronization primitives, reflection metadata, handles).
#[derive(Clone, Debug, Default)]
pub struct SafeTypeTable {
    keys: FxHashSet<TypeKey>,
}

const BUILTIN_TYPES: [TypeId; 8] = [
    TypeId::STRING,
    TypeId::GUID,
    TypeId::TIMESPAN,
    TypeId::DATETIME,
    TypeId::THREAD,
    TypeId::MUTEX,
    TypeId::TYPE_INFO,
    TypeId::HANDLE,
];

const BUILTIN_DEFINITIONS: [GenericDef; 5] = [
    GenericDef::LINKED_LIST_NODE,
    GenericDef::LAZY,
    GenericDef::TASK,
    GenericDef::IMMUTABLE_LIST,
    GenericDef::IMMUTABLE_DICTIONARY,
];

impl SafeTypeTable {
    /// Table with no members.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table holding the well-known safe types.
    pub fn builtin() -> Self {
        let exact = BUILTIN_TYPES.into_iter().map(TypeKey::Exact);
        let definitions = BUILTIN_DEFINITIONS.into_iter().map(TypeKey::Definition);
        SafeTypeTable {
            keys: exact.chain(definitions).collect(),
        }
    }

    /// Add a member.
    #[must_use]
    pub fn with(mut self, key: impl Into<TypeKey>) -> Self {
        self.keys.insert(key.into());
        self
    }

    /// Remove a member.
    #[must_use]
    pub fn without(mut self, key: impl Into<TypeKey>) -> Self {
        self.keys.remove(&key.into());
        self
    }

    pub fn contains_key(&self, key: TypeKey) -> bool {
        self.keys.contains(&key)
    }

    /// Check `desc` by exact type, then by its generic definition.
    pub fn contains(&self, desc: &TypeDescriptor) -> bool {
        TypeKey::candidates(desc).any(|key| self.keys.contains(&key))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
