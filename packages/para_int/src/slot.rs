use cpu_topology::Processor;

use crate::Interval;

/// Size of the cache line that execution slots are aligned to.
pub const CACHE_LINE_SIZE: usize = 64;

/// One unit of scheduled work: an interval to integrate, the processor to integrate it on and
/// the storage for the result.
///
/// Each slot occupies its own cache line, so workers on different processors writing their
/// results into adjacent slots do not contend for the same line.
///
/// The partial sum is written exactly once, by the worker that owns the slot, and read only
/// after that worker has been joined.
#[derive(Clone, Debug, PartialEq)]
#[repr(align(64))]
pub struct ExecutionSlot {
    index: usize,
    interval: Interval,
    assigned_processor: Option<Processor>,
    contributes: bool,
    partial_sum: Option<f64>,
}

impl ExecutionSlot {
    pub(crate) const fn new(
        index: usize,
        interval: Interval,
        assigned_processor: Option<Processor>,
        contributes: bool,
    ) -> Self {
        Self {
            index,
            interval,
            assigned_processor,
            contributes,
            partial_sum: None,
        }
    }

    /// Position of the slot in the plan, starting from zero.
    #[must_use]
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The interval this slot integrates.
    #[must_use]
    #[inline]
    pub const fn interval(&self) -> Interval {
        self.interval
    }

    /// The processor the worker for this slot pins itself to, or `None` if pinning is disabled.
    #[must_use]
    #[inline]
    pub const fn assigned_processor(&self) -> Option<Processor> {
        self.assigned_processor
    }

    /// Whether the partial sum of this slot is part of the total.
    ///
    /// Slots that do not contribute exist only to keep every processor busy.
    #[must_use]
    #[inline]
    pub const fn contributes(&self) -> bool {
        self.contributes
    }

    /// The result of the worker, once it has completed.
    #[must_use]
    #[inline]
    pub const fn partial_sum(&self) -> Option<f64> {
        self.partial_sum
    }

    pub(crate) fn record_partial_sum(&mut self, partial_sum: f64) {
        debug_assert!(
            self.partial_sum.is_none(),
            "slot {} already has a partial sum",
            self.index
        );

        self.partial_sum = Some(partial_sum);
    }
}
