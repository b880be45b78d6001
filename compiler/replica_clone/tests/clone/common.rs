//! Shared type fixtures.

use replica_host::{ClassDef, Host, ObjRef, StructDef, TypeId, Value};
use replica_clone::Cloner;

/// A small domain: people with an address, a best friend and a tag.
pub struct Model {
    pub host: Host,
    pub cloner: Cloner,
    /// `Address { city: String, zip: Int32 }`
    pub address: TypeId,
    /// `Person { name: String, age: Int32, home: Address, friend: Person, extra: Object }`
    pub person: TypeId,
    /// `Tag { label: String, weight: Double }`, a struct
    pub tag: TypeId,
}

impl Model {
    pub fn new() -> Self {
        replica_clone::init_tracing();
        let host = Host::new();
        let address = host
            .define_class(
                ClassDef::new("Address")
                    .field("city", TypeId::STRING)
                    .field("zip", TypeId::I32),
            )
            .unwrap();
        let person = host.declare("Person").unwrap();
        host.define_class(
            ClassDef::new("Person")
                .field("name", TypeId::STRING)
                .private_field("age", TypeId::I32)
                .field("home", address)
                .field("friend", person)
                .field("extra", TypeId::OBJECT),
        )
        .unwrap();
        let tag = host
            .define_struct(
                StructDef::new("Tag")
                    .field("label", TypeId::STRING)
                    .field("weight", TypeId::F64),
            )
            .unwrap();
        let cloner = Cloner::new(host.clone());
        Model {
            host,
            cloner,
            address,
            person,
            tag,
        }
    }

    pub fn address(&self, city: &str, zip: i32) -> ObjRef {
        let obj = self.host.allocate_uninitialized(self.address).unwrap();
        self.host
            .set_field_by_name(&obj, "city", self.host.string(city))
            .unwrap();
        self.host
            .set_field_by_name(&obj, "zip", Value::I32(zip))
            .unwrap();
        obj
    }

    pub fn person(&self, name: &str, age: i32) -> ObjRef {
        let obj = self.host.allocate_uninitialized(self.person).unwrap();
        self.host
            .set_field_by_name(&obj, "name", self.host.string(name))
            .unwrap();
        self.host
            .set_field_by_name(&obj, "age", Value::I32(age))
            .unwrap();
        let home = self.address("Springfield", 4242);
        self.host
            .set_field_by_name(&obj, "home", Value::Ref(home))
            .unwrap();
        obj
    }

    pub fn tag(&self, label: &str, weight: f64) -> Value {
        Value::Struct(replica_host::StructValue {
            ty: self.tag,
            fields: Box::new([self.host.string(label), Value::F64(weight)]),
        })
    }

    pub fn field(&self, obj: &Value, name: &str) -> Value {
        self.host.field(obj.as_obj().unwrap(), name).unwrap()
    }
}

/// Unwrap a reference value.
pub fn obj(value: &Value) -> &ObjRef {
    value.as_obj().expect("expected a reference")
}
