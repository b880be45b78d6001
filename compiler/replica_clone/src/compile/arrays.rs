//! Array strategy.

use replica_host::TypeId;

use super::Compiler;
use crate::plan::{ArrayPlan, ElementStep, Mode, Plan};
use crate::CloneError;

/// Highest rank whose elements are cloned. Arrays of higher rank are
/// always duplicated as a whole, elements shared, in both modes.
pub const MAX_CLONED_RANK: usize = 4;

impl Compiler<'_> {
    pub(super) fn array_plan(
        &self,
        element: TypeId,
        rank: usize,
        mode: Mode,
    ) -> Result<Plan, CloneError> {
        if rank > MAX_CLONED_RANK {
            return Ok(Plan::Duplicate);
        }
        let element = match mode {
            Mode::Shallow => None,
            Mode::Deep if self.classifier.is_shared(element)? => None,
            Mode::Deep => Some(ElementStep {
                ty: element,
                dispatch: self.dispatch_for(element)?,
            }),
        };
        Ok(Plan::Array(ArrayPlan { rank, element }))
    }
}
