use replica_host::{Body, Value};

use super::{body_kind, shape_mismatch};
use crate::plan::{ArrayPlan, ClonerPair, Mode};
use crate::{CloneError, Cloner};

impl Cloner {
    /// New array of the same shape; elements copied or cloned per `plan`.
    ///
    /// Storage is row-major for every rank, so ranks 1 through 4 share one
    /// element walk. An empty array yields a new empty array with the same
    /// lengths.
    pub(super) fn clone_array(
        &self,
        pair: &ClonerPair,
        plan: &ArrayPlan,
        value: &Value,
        mode: Mode,
        depth: usize,
    ) -> Result<Value, CloneError> {
        let Value::Ref(source) = value else {
            return Err(shape_mismatch(pair, "array", value.kind_name()));
        };
        let data = match source.snapshot() {
            Body::Array(data) => data,
            other => return Err(shape_mismatch(pair, "array", body_kind(&other))),
        };
        if data.rank() != plan.rank {
            return Err(shape_mismatch(pair, "array of the declared rank", "another rank"));
        }

        let elements = match plan.element {
            None => data.elements().to_vec(),
            Some(step) => data
                .elements()
                .iter()
                .map(|element| self.clone_nested(element, step.ty, step.dispatch, mode, depth))
                .collect::<Result<Vec<_>, _>>()?,
        };
        let cloned = data
            .with_elements(elements)
            .ok_or_else(|| shape_mismatch(pair, "array", "array of another length"))?;
        Ok(Value::Ref(self.host().clone_with_body(source, Body::Array(cloned))?))
    }
}
