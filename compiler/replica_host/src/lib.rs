//! Host reflection facility for the replica cloning engine.
//!
//! This crate provides the runtime type universe the engine works over:
//!
//! - [`TypeRegistry`]: append-only, thread-safe store of [`TypeDescriptor`]s
//!   with well-known types, user classes/structs/enums/interfaces, and
//!   interned array and generic instances
//! - [`Value`] / [`ObjRef`]: inline values and identity-carrying heap
//!   objects
//! - [`Host`]: allocation (constructor or raw), field and element access,
//!   runtime type queries and assignability casts
//! - [`Reflect`]: native Rust types mapped onto their registry types
//!
//! # Example
//!
//! ```text
//! let host = Host::new();
//! let node = host.declare("Node")?;
//! host.define_class(ClassDef::new("Node").field("next", node).field("value", TypeId::I32))?;
//! let obj = host.construct(node)?;
//! host.set_field_by_name(&obj, "value", Value::I32(7))?;
//! ```

mod descriptor;
mod error;
mod flags;
mod host;
mod idx;
mod reflect;
mod registry;
mod value;

pub use descriptor::{
    Allocation, CollectionShape, Constructor, FieldDef, GenericInstance, Layout, Primitive,
    TypeDescriptor, TypeKind, Visibility,
};
pub use error::HostError;
pub use flags::TypeFlags;
pub use host::Host;
pub use idx::{GenericDef, TypeId};
pub use reflect::Reflect;
pub use registry::{ClassDef, ClassTemplate, Instantiation, StructDef, TypeRegistry, MAX_RANK};
pub use value::{ArrayData, Body, CollectionData, EnumValue, ObjRef, StructValue, Value};
