//! Plan interpreter.

mod arrays;

use std::sync::Arc;

use replica_host::{Body, StructValue, TypeId, Value};

use crate::plan::{AllocPath, ClonerPair, Dispatch, FieldCopy, FieldStep, Mode, ObjectPlan, Plan};
use crate::stack::ensure_sufficient_stack;
use crate::{CloneCx, CloneError, Cloner};

impl Cloner {
    /// Clone `value` declared as `ty`, `depth` levels below the entry call.
    pub(crate) fn run(
        &self,
        ty: TypeId,
        value: &Value,
        mode: Mode,
        depth: usize,
    ) -> Result<Value, CloneError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        self.check_depth(depth)?;
        let pair = self.pair(ty)?;
        ensure_sufficient_stack(|| self.execute(&pair, mode, value, depth))
    }

    pub(crate) fn check_depth(&self, depth: usize) -> Result<(), CloneError> {
        let limit = self.config().max_depth;
        if depth > limit {
            return Err(CloneError::DepthExceeded { limit });
        }
        Ok(())
    }

    /// Run one plan of `pair` on a non-null value.
    pub(crate) fn execute(
        &self,
        pair: &ClonerPair,
        mode: Mode,
        value: &Value,
        depth: usize,
    ) -> Result<Value, CloneError> {
        let plan = pair.plan(mode);

        // An instance of a strict subtype must not be cloned with the
        // base plan, or its derived fields would be lost. A safe declared
        // type shares every value it holds, subtypes included.
        if let Value::Ref(obj) = value {
            if obj.ty() != pair.ty && !matches!(plan, Plan::RuntimeDispatch | Plan::Identity) {
                return self.dispatch_runtime(value, pair.ty, mode, depth);
            }
        }

        match plan {
            Plan::Identity => Ok(value.clone()),
            Plan::FreshObject => Ok(Value::Ref(self.host().construct(TypeId::OBJECT)?)),
            Plan::Custom(procedure) => procedure(&CloneCx::new(self, depth), value),
            Plan::Nullable { inner } => match value {
                Value::Nullable(None) => Ok(Value::none()),
                Value::Nullable(Some(payload)) => {
                    Ok(Value::some(self.run(*inner, payload, mode, depth + 1)?))
                }
                other => Err(shape_mismatch(pair, "nullable", other.kind_name())),
            },
            Plan::StructCopy => {
                self.expect_struct(pair, value)?;
                Ok(value.clone())
            }
            Plan::StructFields { steps } => {
                let source = self.expect_struct(pair, value)?;
                let mut fields = source.fields.clone();
                self.apply_steps(pair, &mut fields, steps, mode, depth)?;
                Ok(Value::Struct(StructValue {
                    ty: source.ty,
                    fields,
                }))
            }
            Plan::RuntimeDispatch => self.dispatch_runtime(value, pair.ty, mode, depth),
            Plan::Array(plan) => self.clone_array(pair, plan, value, mode, depth),
            Plan::Object(plan) => self.clone_object(pair, plan, value, mode, depth),
            Plan::Duplicate => match value {
                Value::Ref(obj) => Ok(Value::Ref(self.host().duplicate(obj))),
                other => Err(shape_mismatch(pair, "reference", other.kind_name())),
            },
            Plan::Fail(err) => Err(err.clone()),
        }
    }

    /// Clone `value` with the plans of its runtime type, which must be
    /// assignable to `declared`.
    fn dispatch_runtime(
        &self,
        value: &Value,
        declared: TypeId,
        mode: Mode,
        depth: usize,
    ) -> Result<Value, CloneError> {
        let host = self.host();
        let Some(runtime) = host.runtime_type(value) else {
            return Ok(value.clone());
        };
        if runtime != declared && !host.is_assignable(runtime, declared)? {
            return Err(CloneError::TypeMismatch {
                expected: host.name_of(declared)?,
                found: host.name_of(runtime)?,
            });
        }
        tracing::trace!(
            declared = declared.raw(),
            runtime = runtime.raw(),
            "runtime dispatch"
        );
        self.erased(runtime)?.run(self, value, mode, depth)
    }

    /// Clone a field or element value one level down.
    fn clone_nested(
        &self,
        value: &Value,
        ty: TypeId,
        dispatch: Dispatch,
        mode: Mode,
        depth: usize,
    ) -> Result<Value, CloneError> {
        match dispatch {
            Dispatch::Typed => self.run(ty, value, mode, depth + 1),
            Dispatch::Runtime => {
                if value.is_null() {
                    return Ok(Value::Null);
                }
                self.check_depth(depth + 1)?;
                ensure_sufficient_stack(|| self.dispatch_runtime(value, ty, mode, depth + 1))
            }
        }
    }

    fn apply_steps(
        &self,
        pair: &ClonerPair,
        slots: &mut [Value],
        steps: &[FieldStep],
        mode: Mode,
        depth: usize,
    ) -> Result<(), CloneError> {
        for step in steps {
            let slot = slots
                .get_mut(step.slot)
                .ok_or_else(|| shape_mismatch(pair, "a field slot", "a shorter slot block"))?;
            let cloned = self.clone_nested(slot, step.ty, step.dispatch, mode, depth)?;
            *slot = cloned;
        }
        Ok(())
    }

    fn expect_struct<'v>(
        &self,
        pair: &ClonerPair,
        value: &'v Value,
    ) -> Result<&'v StructValue, CloneError> {
        match value {
            Value::Struct(source) if source.ty == pair.ty => Ok(source),
            Value::Struct(source) => Err(CloneError::TypeMismatch {
                expected: Arc::clone(&pair.name),
                found: self.host().name_of(source.ty)?,
            }),
            other => Err(shape_mismatch(pair, "struct", other.kind_name())),
        }
    }

    fn clone_object(
        &self,
        pair: &ClonerPair,
        plan: &ObjectPlan,
        value: &Value,
        mode: Mode,
        depth: usize,
    ) -> Result<Value, CloneError> {
        let Value::Ref(source) = value else {
            return Err(shape_mismatch(pair, "reference", value.kind_name()));
        };
        let target = match plan.alloc {
            AllocPath::Constructor => self.host().construct(pair.ty)?,
            AllocPath::Raw => self.host().allocate_uninitialized(pair.ty)?,
        };
        let mut slots = match source.snapshot() {
            Body::Fields(slots) => slots,
            other => return Err(shape_mismatch(pair, "fields", body_kind(&other))),
        };
        if let FieldCopy::PerField(steps) = &plan.fields {
            self.apply_steps(pair, &mut slots, steps, mode, depth)?;
        }
        self.host().replace_fields(&target, slots)?;
        Ok(Value::Ref(target))
    }
}

pub(crate) fn shape_mismatch(
    pair: &ClonerPair,
    expected: &'static str,
    found: &'static str,
) -> CloneError {
    CloneError::ShapeMismatch {
        ty: Arc::clone(&pair.name),
        expected,
        found,
    }
}

/// Short name of a body kind for errors.
pub(crate) fn body_kind(body: &Body) -> &'static str {
    match body {
        Body::Fields(_) => "fields",
        Body::Array(_) => "array",
        Body::Str(_) => "string",
        Body::Collection(_) => "collection",
        Body::Opaque(_) => "opaque",
    }
}
