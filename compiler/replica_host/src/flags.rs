//! Pre-computed type metadata flags.
//!
//! `TypeFlags` are computed once when a descriptor is published and never
//! recomputed, so category queries made by the cloning core (is this a
//! value type? does it derive from the error family?) are O(1) and do not
//! walk the base chain.

use bitflags::bitflags;

bitflags! {
    /// Pre-computed type properties for O(1) queries.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TypeFlags: u32 {
        // === Category Flags (bits 0-7) ===

        /// Stored inline and copied on assignment.
        const VALUE_TYPE = 1 << 0;
        /// Heap allocated, identity semantics.
        const REFERENCE = 1 << 1;
        /// Built-in scalar.
        const PRIMITIVE = 1 << 2;
        /// Named integral constant set.
        const ENUM = 1 << 3;
        /// `Nullable<T>` wrapper.
        const NULLABLE = 1 << 4;
        /// Interface (never instantiated directly).
        const INTERFACE = 1 << 5;
        /// Array of any rank.
        const ARRAY = 1 << 6;
        /// The universal top reference type.
        const OBJECT_ROOT = 1 << 7;

        // === Shape Flags (bits 8-15) ===

        /// Abstract class (never instantiated directly).
        const ABSTRACT = 1 << 8;
        /// Cannot be derived from.
        const SEALED = 1 << 9;
        /// Closed instance of a generic definition.
        const GENERIC = 1 << 10;
        /// Pointer-sized integer.
        const POINTER_SIZED = 1 << 11;
        /// Marshal-by-reference handle.
        const MARSHAL_BY_REF = 1 << 12;

        // === Family Flags (bits 16-23) ===
        // Inherited from the base type at definition time.

        /// Derives from the error family root.
        const EXCEPTION_FAMILY = 1 << 16;
        /// Derives from the callable family root.
        const DELEGATE_FAMILY = 1 << 17;
        /// Derives from the expression-tree family root.
        const EXPRESSION_FAMILY = 1 << 18;

        // === Allocation Flags (bits 24-31) ===

        /// Has a parameterless constructor.
        const HAS_CONSTRUCTOR = 1 << 24;
        /// May be allocated without running a constructor.
        const RAW_ALLOCATABLE = 1 << 25;
    }
}

impl TypeFlags {
    /// Flags that propagate from a base class to every derived class.
    pub const INHERITED_MASK: Self = Self::from_bits_truncate(
        Self::EXCEPTION_FAMILY.bits()
            | Self::DELEGATE_FAMILY.bits()
            | Self::EXPRESSION_FAMILY.bits(),
    );

    /// Families whose members are treated as opaque, atomic values.
    pub const OPAQUE_FAMILIES: Self = Self::INHERITED_MASK;

    /// Check if the type is stored inline.
    #[inline]
    pub const fn is_value_type(self) -> bool {
        self.contains(Self::VALUE_TYPE)
    }

    /// Check if the type is heap allocated.
    #[inline]
    pub const fn is_reference(self) -> bool {
        self.contains(Self::REFERENCE)
    }

    /// Check if the static type says nothing about the concrete layout:
    /// interface, abstract class, or the top reference type.
    #[inline]
    pub const fn is_open(self) -> bool {
        self.intersects(
            Self::INTERFACE
                .union(Self::ABSTRACT)
                .union(Self::OBJECT_ROOT),
        )
    }

    /// Check if the type belongs to one of the opaque families.
    #[inline]
    pub const fn in_opaque_family(self) -> bool {
        self.intersects(Self::OPAQUE_FAMILIES)
    }

    /// Check if the type can be instantiated at all.
    #[inline]
    pub const fn is_instantiable(self) -> bool {
        !self.intersects(Self::INTERFACE.union(Self::ABSTRACT))
    }
}
