//! Type and generic-definition handles.
//!
//! `TypeId` is the canonical type identity. All descriptors live in the
//! [`TypeRegistry`](crate::TypeRegistry) and are referenced by a 32-bit index.
//!
//! - Well-known types have fixed indices (0-26) for O(1) access
//! - Type equality is O(1) index comparison
//! - Copy, lightweight passing
//!
//! `GenericDef` plays the same role for open generic definitions
//! (`List<>`, `Dictionary<,>`, ...), which are not types themselves.

use std::fmt;

/// A 32-bit index into the type registry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    // === Roots (0-1) ===

    /// The universal top reference type. Every reference type derives from it.
    pub const OBJECT: Self = Self(0);
    /// Immutable UTF-8 string (reference type).
    pub const STRING: Self = Self(1);

    // === Primitives (2-15) ===
    /// Boolean.
    pub const BOOL: Self = Self(2);
    /// Unicode scalar value.
    pub const CHAR: Self = Self(3);
    /// 8-bit signed integer.
    pub const I8: Self = Self(4);
    /// 16-bit signed integer.
    pub const I16: Self = Self(5);
    /// 32-bit signed integer.
    pub const I32: Self = Self(6);
    /// 64-bit signed integer.
    pub const I64: Self = Self(7);
    /// 8-bit unsigned integer.
    pub const U8: Self = Self(8);
    /// 16-bit unsigned integer.
    pub const U16: Self = Self(9);
    /// 32-bit unsigned integer.
    pub const U32: Self = Self(10);
    /// 64-bit unsigned integer.
    pub const U64: Self = Self(11);
    /// 32-bit float.
    pub const F32: Self = Self(12);
    /// 64-bit float.
    pub const F64: Self = Self(13);
    /// Pointer-sized signed integer.
    pub const ISIZE: Self = Self(14);
    /// Pointer-sized unsigned integer.
    pub const USIZE: Self = Self(15);

    // === Well-known value types (16-19) ===
    /// Opaque marshal handle (value type wrapping a foreign reference).
    pub const HANDLE: Self = Self(16);
    /// 128-bit globally unique identifier.
    pub const GUID: Self = Self(17);
    /// Time interval in ticks.
    pub const TIMESPAN: Self = Self(18);
    /// Point in time in ticks.
    pub const DATETIME: Self = Self(19);

    // === Well-known reference types (20-26) ===
    /// Root of the error family.
    pub const EXCEPTION: Self = Self(20);
    /// Root of the callable family (abstract).
    pub const DELEGATE: Self = Self(21);
    /// Root of the expression-tree family (abstract).
    pub const EXPRESSION: Self = Self(22);
    /// Thread handle.
    pub const THREAD: Self = Self(23);
    /// Mutual exclusion primitive.
    pub const MUTEX: Self = Self(24);
    /// Reflection metadata for a type.
    pub const TYPE_INFO: Self = Self(25);
    /// Non-generic enumerable interface.
    pub const ENUMERABLE: Self = Self(26);

    /// Number of well-known types seeded by `TypeRegistry::new`.
    pub const WELL_KNOWN_COUNT: u32 = 27;

    /// Create a handle from a raw index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into registry storage.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the seeded well-known types.
    #[inline]
    pub const fn is_well_known(self) -> bool {
        self.0 < Self::WELL_KNOWN_COUNT
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::OBJECT => write!(f, "TypeId::OBJECT"),
            Self::STRING => write!(f, "TypeId::STRING"),
            Self::I32 => write!(f, "TypeId::I32"),
            Self::I64 => write!(f, "TypeId::I64"),
            Self::BOOL => write!(f, "TypeId::BOOL"),
            _ => write!(f, "TypeId({})", self.0),
        }
    }
}

/// Handle to an open generic definition.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct GenericDef(u32);

impl GenericDef {
    /// `Nullable<T>` value wrapper.
    pub const NULLABLE: Self = Self(0);
    /// `List<T>`.
    pub const LIST: Self = Self(1);
    /// `HashSet<T>`.
    pub const HASH_SET: Self = Self(2);
    /// `Queue<T>`.
    pub const QUEUE: Self = Self(3);
    /// `Stack<T>`.
    pub const STACK: Self = Self(4);
    /// `LinkedList<T>`.
    pub const LINKED_LIST: Self = Self(5);
    /// `LinkedListNode<T>`: a node handle owned by its list.
    pub const LINKED_LIST_NODE: Self = Self(6);
    /// `SortedSet<T>`.
    pub const SORTED_SET: Self = Self(7);
    /// `Dictionary<K, V>`.
    pub const DICTIONARY: Self = Self(8);
    /// `SortedDictionary<K, V>`.
    pub const SORTED_DICTIONARY: Self = Self(9);
    /// `PriorityQueue<E, P>`.
    pub const PRIORITY_QUEUE: Self = Self(10);
    /// `ConcurrentBag<T>`.
    pub const CONCURRENT_BAG: Self = Self(11);
    /// `ConcurrentQueue<T>`.
    pub const CONCURRENT_QUEUE: Self = Self(12);
    /// `ConcurrentStack<T>`.
    pub const CONCURRENT_STACK: Self = Self(13);
    /// `ConcurrentDictionary<K, V>`.
    pub const CONCURRENT_DICTIONARY: Self = Self(14);
    /// `ImmutableList<T>`.
    pub const IMMUTABLE_LIST: Self = Self(15);
    /// `ImmutableDictionary<K, V>`.
    pub const IMMUTABLE_DICTIONARY: Self = Self(16);
    /// `Lazy<T>`.
    pub const LAZY: Self = Self(17);
    /// `Task<T>`.
    pub const TASK: Self = Self(18);
    /// `IEnumerable<T>` interface.
    pub const I_ENUMERABLE: Self = Self(19);
    /// `IReadOnlyCollection<T>` interface.
    pub const I_READ_ONLY_COLLECTION: Self = Self(20);
    /// `IReadOnlyDictionary<K, V>` interface.
    pub const I_READ_ONLY_DICTIONARY: Self = Self(21);

    /// Number of well-known definitions seeded by `TypeRegistry::new`.
    pub const WELL_KNOWN_COUNT: u32 = 22;

    /// Create a handle from a raw index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into registry storage.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for GenericDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GenericDef({})", self.0)
    }
}

// Compile-time size assertion: handles must stay 4 bytes
const _: () = assert!(std::mem::size_of::<TypeId>() == 4);
const _: () = assert!(std::mem::size_of::<GenericDef>() == 4);
