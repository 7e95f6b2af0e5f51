use crate::{Error, Plan, Result};

/// Sums the partial sums of the contributing slots of an executed plan.
///
/// The sum is taken in slot index order so that the floating-point result is reproducible.
/// Saturation slots are never included.
///
/// # Errors
///
/// Returns [`Error::MissingPartialSum`] if a contributing slot has not recorded a result, i.e.
/// if the plan has not been executed.
pub fn aggregate(plan: &Plan) -> Result<f64> {
    plan.contributing_slots()
        .iter()
        .try_fold(0.0, |total, slot| {
            slot.partial_sum()
                .map(|partial_sum| total + partial_sum)
                .ok_or(Error::MissingPartialSum {
                    slot_index: slot.index(),
                })
        })
}
