//! Worker lifecycle: one scoped OS thread per execution slot, each pinned to its processor.

use std::any::Any;
use std::thread;

use cpu_topology::SystemTopology;
use tracing::{debug, error, warn};

use crate::{Error, ExecutionSlot, Plan, Result, Step, integrate};

/// Runs every slot of the plan on its own thread and waits for all of them to complete.
///
/// All threads are spawned up front. Each thread receives exclusive access to exactly one slot:
/// it pins itself to the assigned processor (if any), integrates the slot's interval and records
/// the partial sum in the slot. The threads share nothing mutable, so no synchronization is
/// needed until the join, which makes the recorded partial sums visible to the caller.
///
/// Pinning failures are logged and otherwise ignored, as pinning only affects performance.
///
/// # Errors
///
/// Returns [`Error::ThreadSpawn`] if a thread cannot be started; threads that were already
/// started still run to completion before this returns. Returns [`Error::WorkerPanicked`] if the
/// integrand panics on any thread. In both cases the first error in slot order is returned.
pub fn execute<F>(
    plan: &mut Plan,
    step: Step,
    integrand: F,
    topology: &SystemTopology,
) -> Result<()>
where
    F: Fn(f64) -> f64 + Clone + Send,
{
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(plan.slot_count());
        let mut spawn_error = None;

        for slot in plan.slots_mut() {
            let slot_index = slot.index();
            let integrand = integrand.clone();

            let spawned = thread::Builder::new()
                .name(format!("para-int-slot-{slot_index}"))
                .spawn_scoped(scope, move || run_slot(slot, step, integrand, topology));

            match spawned {
                Ok(handle) => handles.push((slot_index, handle)),
                Err(source) => {
                    error!(slot_index, error = %source, "failed to spawn worker thread");
                    spawn_error = Some(Error::ThreadSpawn { slot_index, source });
                    break;
                }
            }
        }

        // Every handle is joined, even after a failure, so that a panic is always reported as an
        // error instead of resurfacing when the scope ends.
        let mut first_panic = None;

        for (slot_index, handle) in handles {
            if let Err(payload) = handle.join() {
                let message = panic_message(payload.as_ref());
                error!(slot_index, %message, "worker panicked");

                if first_panic.is_none() {
                    first_panic = Some(Error::WorkerPanicked {
                        slot_index,
                        message,
                    });
                }
            }
        }

        match spawn_error.or(first_panic) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    })
}

fn run_slot<F>(slot: &mut ExecutionSlot, step: Step, integrand: F, topology: &SystemTopology)
where
    F: Fn(f64) -> f64,
{
    let slot_index = slot.index();

    if let Some(processor) = slot.assigned_processor() {
        match topology.pin_current_thread_to(&processor) {
            Ok(()) => debug!(slot_index, processor_id = processor.id(), "worker pinned"),
            Err(e) => warn!(
                slot_index,
                processor_id = processor.id(),
                error = %e,
                "failed to pin worker; continuing unpinned"
            ),
        }
    }

    let interval = slot.interval();

    debug!(
        slot_index,
        %interval,
        contributes = slot.contributes(),
        "worker started"
    );

    let partial_sum = integrate(integrand, interval.begin(), interval.end(), step);
    slot.record_partial_sum(partial_sum);

    debug!(slot_index, partial_sum, "worker completed");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use cpu_topology::{Processor, ProcessorSet};

    use super::*;
    use crate::{Domain, Pinning, plan};

    fn processors(count: u32) -> ProcessorSet {
        ProcessorSet::from_processors((0..count).map(Processor::new)).unwrap()
    }

    fn step(width: f64) -> Step {
        Step::new(width).unwrap()
    }

    #[test]
    fn every_slot_gets_a_result() {
        let mut plan = plan(
            Domain::new(0.0, 4.0).unwrap(),
            3,
            &processors(5),
            Pinning::Disabled,
        )
        .unwrap();

        execute(&mut plan, step(0.01), |_| 1.0, &SystemTopology::current()).unwrap();

        assert!(plan.slots().iter().all(|s| s.partial_sum().is_some()));
    }

    #[test]
    fn partial_sums_match_sequential_integration() {
        let f = |x: f64| x * x;
        let mut plan = plan(
            Domain::new(-1.0, 2.0).unwrap(),
            4,
            &processors(2),
            Pinning::Disabled,
        )
        .unwrap();

        execute(&mut plan, step(0.001), f, &SystemTopology::current()).unwrap();

        for slot in plan.slots() {
            let interval = slot.interval();
            let expected = integrate(f, interval.begin(), interval.end(), step(0.001));

            assert_eq!(slot.partial_sum(), Some(expected));
        }
    }

    #[test]
    fn unusable_processor_is_not_fatal() {
        // No real system has this processor, so pinning fails but the work still completes.
        let set = ProcessorSet::from_processors([Processor::new(u32::MAX)]).unwrap();
        let mut plan = plan(Domain::new(0.0, 1.0).unwrap(), 2, &set, Pinning::Enabled).unwrap();

        execute(&mut plan, step(0.1), |_| 1.0, &SystemTopology::current()).unwrap();

        assert!(plan.slots().iter().all(|s| s.partial_sum().is_some()));
    }

    #[test]
    fn panicking_integrand_is_reported() {
        let mut plan = plan(
            Domain::new(0.0, 2.0).unwrap(),
            2,
            &processors(1),
            Pinning::Disabled,
        )
        .unwrap();

        let result = execute(
            &mut plan,
            step(0.5),
            |x| {
                assert!(x < 1.0, "sample {x} out of range");
                x
            },
            &SystemTopology::current(),
        );

        match result {
            Err(Error::WorkerPanicked {
                slot_index,
                message,
            }) => {
                assert_eq!(slot_index, 1);
                assert!(message.contains("out of range"));
            }
            other => panic!("expected WorkerPanicked, got {other:?}"),
        }

        // The worker that did not panic still completed.
        assert!(plan.slots()[0].partial_sum().is_some());
        assert!(plan.slots()[1].partial_sum().is_none());
    }
}
