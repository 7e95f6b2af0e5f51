//! Turns a domain, a worker count and a processor set into execution slots.

use std::num::NonZero;

use cpu_topology::ProcessorSet;
use tracing::debug;

use crate::{Domain, Error, ExecutionSlot, Interval, Result};

/// Whether workers pin themselves to their assigned processors.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Pinning {
    /// Every slot is assigned a processor and its worker pins itself to it.
    #[default]
    Enabled,

    /// No slot is assigned a processor; the OS scheduler places workers freely.
    Disabled,
}

/// The ordered execution slots of one run.
///
/// The first [`requested_workers()`][Plan::requested_workers] slots partition the domain and
/// contribute to the total. Any further slots exist only to give every processor a worker; they
/// replay the interval of a contributing slot and their results are discarded.
#[derive(Clone, Debug)]
pub struct Plan {
    domain: Domain,
    requested_workers: NonZero<usize>,
    slots: Box<[ExecutionSlot]>,
}

impl Plan {
    /// The domain being integrated.
    #[must_use]
    #[inline]
    pub const fn domain(&self) -> Domain {
        self.domain
    }

    /// The number of workers whose results make up the total.
    #[must_use]
    #[inline]
    pub const fn requested_workers(&self) -> NonZero<usize> {
        self.requested_workers
    }

    /// The total number of slots, including saturation slots.
    #[must_use]
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// All slots in index order.
    #[must_use]
    #[inline]
    pub fn slots(&self) -> &[ExecutionSlot] {
        &self.slots
    }

    /// The slots whose partial sums make up the total, in index order.
    #[must_use]
    pub fn contributing_slots(&self) -> &[ExecutionSlot] {
        self.slots
            .get(..self.requested_workers.get())
            .unwrap_or(&self.slots)
    }

    /// The slots that only exist to keep processors busy.
    #[must_use]
    pub fn saturation_slots(&self) -> &[ExecutionSlot] {
        self.slots
            .get(self.requested_workers.get()..)
            .unwrap_or_default()
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [ExecutionSlot] {
        &mut self.slots
    }
}

/// Plans a run: sizes the intervals and assigns processors to slots.
///
/// * There are `max(requested_workers, processors.len())` slots.
/// * Slot `i < requested_workers` integrates `[start + w * i, start + w * (i + 1))` where
///   `w = width / requested_workers`, except that the last contributing slot always ends exactly
///   at the end of the domain. Adjacent slots share bit-identical boundaries.
/// * Slot `i >= requested_workers` replays the interval of slot `i % requested_workers`.
/// * With pinning enabled, slot `i` is assigned processor `i % processors.len()` of the set.
///
/// # Errors
///
/// Returns [`Error::InvalidWorkerCount`] if `requested_workers` is zero and
/// [`Error::SlotAllocation`] if there is not enough memory to hold the slots.
///
/// # Example
///
/// ```
/// use cpu_topology::{Processor, ProcessorSet};
/// use para_int::{Domain, Pinning, plan};
///
/// let processors = ProcessorSet::from_processors([0, 1, 2, 3].map(Processor::new)).unwrap();
/// let plan = plan(Domain::new(0.0, 10.0).unwrap(), 2, &processors, Pinning::Enabled).unwrap();
///
/// assert_eq!(plan.slot_count(), 4);
/// assert_eq!(plan.contributing_slots().len(), 2);
/// assert_eq!(plan.slots()[1].interval().end(), 10.0);
/// ```
pub fn plan(
    domain: Domain,
    requested_workers: usize,
    processors: &ProcessorSet,
    pinning: Pinning,
) -> Result<Plan> {
    let requested =
        NonZero::new(requested_workers).ok_or(Error::InvalidWorkerCount { requested: 0 })?;

    let intervals = partition(domain, requested)?;
    let slot_count = requested_workers.max(processors.len());

    let ordered_processors = processors.iter().copied().collect::<Vec<_>>();

    let mut slots = Vec::new();
    slots
        .try_reserve_exact(slot_count)
        .map_err(|source| Error::SlotAllocation {
            slots: slot_count,
            source,
        })?;

    slots.extend(
        ordered_processors
            .iter()
            .cycle()
            .take(slot_count)
            .enumerate()
            .map(|(index, processor)| {
                let assigned_processor = match pinning {
                    Pinning::Enabled => Some(*processor),
                    Pinning::Disabled => None,
                };

                #[expect(
                    clippy::indexing_slicing,
                    clippy::arithmetic_side_effects,
                    reason = "modulo by the non-zero interval count is always a valid index"
                )]
                let interval = intervals[index % intervals.len()];

                ExecutionSlot::new(
                    index,
                    interval,
                    assigned_processor,
                    index < requested_workers,
                )
            }),
    );

    debug!(
        %domain,
        requested_workers,
        slot_count,
        processor_count = processors.len(),
        ?pinning,
        "planned execution slots"
    );

    Ok(Plan {
        domain,
        requested_workers: requested,
        slots: slots.into_boxed_slice(),
    })
}

fn partition(domain: Domain, parts: NonZero<usize>) -> Result<Vec<Interval>> {
    #[expect(
        clippy::cast_precision_loss,
        reason = "worker counts beyond 2^53 are not realistic"
    )]
    let width = domain.width() / parts.get() as f64;

    let boundary = |i: usize| {
        if i == parts.get() {
            // Forced rather than computed, so rounding in `width * i` cannot leave a gap or
            // overlap at the end of the domain.
            domain.end()
        } else {
            #[expect(
                clippy::cast_precision_loss,
                reason = "worker counts beyond 2^53 are not realistic"
            )]
            let i = i as f64;
            (domain.start() + width * i).min(domain.end())
        }
    };

    let mut intervals = Vec::new();
    intervals
        .try_reserve_exact(parts.get())
        .map_err(|source| Error::SlotAllocation {
            slots: parts.get(),
            source,
        })?;

    intervals.extend(
        (0..parts.get())
            .map(|i| Interval::new(boundary(i), boundary(i.saturating_add(1)))),
    );

    Ok(intervals)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use cpu_topology::{Location, Processor};

    use super::*;

    fn processors(count: u32) -> ProcessorSet {
        ProcessorSet::from_processors((0..count).map(Processor::new)).unwrap()
    }

    fn domain(start: f64, end: f64) -> Domain {
        Domain::new(start, end).unwrap()
    }

    #[test]
    fn zero_workers_is_rejected() {
        let result = plan(domain(0.0, 1.0), 0, &processors(4), Pinning::Enabled);

        assert!(matches!(
            result,
            Err(Error::InvalidWorkerCount { requested: 0 })
        ));
    }

    #[test]
    fn unallocatable_worker_count_is_error() {
        let workers = usize::MAX / 2;

        let result = plan(domain(0.0, 1.0), workers, &processors(2), Pinning::Enabled);

        assert!(matches!(
            result,
            Err(Error::SlotAllocation { slots, .. }) if slots == workers
        ));
    }

    #[test]
    fn slot_count_is_max_of_workers_and_processors() {
        for (workers, processor_count, expected) in
            [(1, 1, 1), (1, 4, 4), (4, 4, 4), (5, 4, 5), (17, 3, 17), (3, 16, 16)]
        {
            let plan = plan(
                domain(0.0, 1.0),
                workers,
                &processors(processor_count),
                Pinning::Enabled,
            )
            .unwrap();

            assert_eq!(
                plan.slot_count(),
                expected,
                "{workers} workers on {processor_count} processors"
            );
            assert_eq!(plan.contributing_slots().len(), workers);
            assert_eq!(plan.saturation_slots().len(), expected - workers);
        }
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "boundaries must be bit-exact")]
    fn contributing_intervals_tile_the_domain() {
        for (start, end) in [(0.0, 10.0), (-3.3, 7.1), (0.1, 0.7), (1e6, 1e6 + 1.0)] {
            for workers in 1..=13 {
                let domain = domain(start, end);
                let plan = plan(domain, workers, &processors(4), Pinning::Enabled).unwrap();
                let slots = plan.contributing_slots();

                assert_eq!(slots.len(), workers);
                assert_eq!(slots.first().unwrap().interval().begin(), start);
                assert_eq!(slots.last().unwrap().interval().end(), end);

                for pair in slots.windows(2) {
                    assert_eq!(pair[0].interval().end(), pair[1].interval().begin());
                    assert!(pair[0].interval().begin() < pair[0].interval().end());
                }

                let total_width = slots.iter().map(|s| s.interval().width()).sum::<f64>();
                assert!(
                    (total_width - domain.width()).abs() <= domain.width() * 1e-12,
                    "{workers} workers over {domain}"
                );
            }
        }
    }

    #[test]
    fn saturation_slots_mirror_contributing_slots() {
        let plan = plan(domain(0.0, 3.0), 3, &processors(8), Pinning::Enabled).unwrap();

        for slot in plan.saturation_slots() {
            let mirrored = &plan.slots()[slot.index() % 3];

            assert!(!slot.contributes());
            assert_eq!(slot.interval(), mirrored.interval());
        }

        assert!(plan.contributing_slots().iter().all(ExecutionSlot::contributes));
    }

    #[test]
    fn equal_counts_assign_each_processor_once() {
        let set = ProcessorSet::from_processors([5, 1, 9, 3].map(Processor::new)).unwrap();

        let plan = plan(domain(0.0, 1.0), 4, &set, Pinning::Enabled).unwrap();

        let assigned = plan
            .slots()
            .iter()
            .map(|s| s.assigned_processor().unwrap().id())
            .collect::<Vec<_>>();

        // In processor set order, which is the core-spreading order.
        assert_eq!(assigned, vec![5, 1, 9, 3]);
    }

    #[test]
    fn oversubscription_is_round_robin_balanced() {
        for (workers, processor_count) in [(5, 4), (10, 3), (7, 7), (100, 6)] {
            let plan = plan(
                domain(0.0, 1.0),
                workers,
                &processors(processor_count),
                Pinning::Enabled,
            )
            .unwrap();

            let mut uses = vec![0_usize; processor_count as usize];
            for (index, slot) in plan.slots().iter().enumerate() {
                let id = slot.assigned_processor().unwrap().id();

                assert_eq!(id as usize, index % processor_count as usize);
                uses[id as usize] += 1;
            }

            let max = *uses.iter().max().unwrap();
            let min = *uses.iter().min().unwrap();
            assert!(max - min <= 1, "{workers} workers on {processor_count} processors: {uses:?}");
        }
    }

    #[test]
    fn disabled_pinning_assigns_nothing() {
        let plan = plan(domain(0.0, 1.0), 2, &processors(4), Pinning::Disabled).unwrap();

        assert_eq!(plan.slot_count(), 4);
        assert!(plan.slots().iter().all(|s| s.assigned_processor().is_none()));
    }

    #[test]
    fn processor_locations_are_carried_into_slots() {
        let set = ProcessorSet::from_processors([
            Processor::with_location(0, Location::new(0, 0)),
            Processor::with_location(2, Location::new(0, 1)),
        ])
        .unwrap();

        let plan = plan(domain(0.0, 1.0), 1, &set, Pinning::Enabled).unwrap();

        assert_eq!(
            plan.slots()[1].assigned_processor().unwrap().location(),
            Some(Location::new(0, 1))
        );
    }

    #[test]
    fn slots_start_without_results() {
        let plan = plan(domain(0.0, 1.0), 3, &processors(2), Pinning::Enabled).unwrap();

        assert!(plan.slots().iter().all(|s| s.partial_sum().is_none()));
        assert!(
            plan.slots()
                .iter()
                .enumerate()
                .all(|(index, slot)| slot.index() == index)
        );
    }
}
