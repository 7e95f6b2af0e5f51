//! One complete benchmark run: discover, plan, execute, aggregate.

use std::fmt::{self, Display};
use std::time::{Duration, Instant};

use cpu_topology::{ProcessorSet, SystemTopology};
use tracing::{debug, info};

use crate::{Error, Plan, Result, RunConfig, aggregate, execute, plan};

/// The outcome of a completed run.
#[derive(Clone, Debug)]
pub struct RunReport {
    total: f64,
    elapsed: Duration,
    processors: ProcessorSet,
    plan: Plan,
}

impl RunReport {
    /// The approximation of the integral over the whole domain.
    #[must_use]
    #[inline]
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// Wall-clock time from starting the first worker until the last worker was joined.
    ///
    /// Discovery, planning and aggregation are not included.
    #[must_use]
    #[inline]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// The processors the run was planned against, in assignment order.
    #[must_use]
    #[inline]
    pub fn processors(&self) -> &ProcessorSet {
        &self.processors
    }

    /// The executed plan, with every slot holding its partial sum.
    #[must_use]
    #[inline]
    pub fn plan(&self) -> &Plan {
        &self.plan
    }
}

/// Per-slot breakdown, one line per slot, followed by the total.
impl Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} slots for {} workers over {} on {}",
            self.plan.slot_count(),
            self.plan.requested_workers(),
            self.plan.domain(),
            self.processors
        )?;

        for slot in self.plan.slots() {
            let processor = slot
                .assigned_processor()
                .map_or_else(|| "unpinned".to_string(), |p| p.to_string());
            let role = if slot.contributes() {
                "contributing"
            } else {
                "saturation"
            };

            write!(
                f,
                "  slot {:>3} {role:<12} {} on {processor}",
                slot.index(),
                slot.interval()
            )?;

            match slot.partial_sum() {
                Some(partial_sum) => writeln!(f, ": {partial_sum}")?,
                None => writeln!(f, ": no result")?,
            }
        }

        write!(
            f,
            "total {} in {:.3} s",
            self.total,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Performs a complete run with one of the catalogued integrands, discovering processors via the
/// real operating system topology.
///
/// # Errors
///
/// Returns an error if the processors cannot be discovered, if none of them are usable by the
/// current thread (only checked when affinity inheritance is enabled), or if any worker fails.
/// Failure to pin a worker is not an error.
pub fn run(config: &RunConfig, topology: &SystemTopology) -> Result<RunReport> {
    let discovered = topology.discover(config.strategy())?;

    let processors = if config.inherit_affinity() {
        topology
            .where_available_for_current_thread(&discovered)?
            .ok_or(Error::NoUsableProcessors)?
    } else {
        discovered
    };

    run_with(config, &processors, topology, config.integrand().function())
}

/// Performs a run against an explicit processor set and an arbitrary integrand.
///
/// The integrand configured in `config` is ignored in favor of `integrand`; discovery settings
/// are ignored because the processors are given.
///
/// # Errors
///
/// Returns an error if a worker thread cannot be started or panics.
pub fn run_with<F>(
    config: &RunConfig,
    processors: &ProcessorSet,
    topology: &SystemTopology,
    integrand: F,
) -> Result<RunReport>
where
    F: Fn(f64) -> f64 + Clone + Send,
{
    let mut plan = plan(
        config.domain(),
        config.workers().get(),
        processors,
        config.pinning(),
    )?;

    debug!(
        slots = plan.slot_count(),
        workers = config.workers().get(),
        %processors,
        "planned run"
    );

    let started = Instant::now();
    execute(&mut plan, config.step(), integrand, topology)?;
    let elapsed = started.elapsed();

    let total = aggregate(&plan)?;

    info!(
        total,
        elapsed_secs = elapsed.as_secs_f64(),
        workers = config.workers().get(),
        slots = plan.slot_count(),
        "run completed"
    );

    Ok(RunReport {
        total,
        elapsed,
        processors: processors.clone(),
        plan,
    })
}
