use std::num::NonZero;

use cpu_topology::TopologyStrategy;

use crate::{Domain, Error, Integrand, Pinning, Result, Step};

/// Default start of the integration domain.
pub const DEFAULT_DOMAIN_START: f64 = 0.0;

/// Default end of the integration domain.
pub const DEFAULT_DOMAIN_END: f64 = 10.0;

/// Default rectangle width.
pub const DEFAULT_STEP: f64 = 1e-7;

/// Everything that determines what a run computes and how it is placed on the hardware.
///
/// Only the worker count is mandatory; everything else has a default. All values are validated
/// when they are set, so a `RunConfig` is always valid and a run can start without any further
/// checks.
///
/// # Example
///
/// ```
/// use cpu_topology::TopologyStrategy;
/// use para_int::{Integrand, Pinning, RunConfig};
///
/// let config = RunConfig::new(8)
///     .unwrap()
///     .with_integrand(Integrand::PowerSeries)
///     .with_strategy(TopologyStrategy::Flat)
///     .with_pinning(Pinning::Disabled);
///
/// assert_eq!(config.workers().get(), 8);
/// assert_eq!(config.domain().end(), 10.0);
/// ```
#[derive(Clone, Debug)]
pub struct RunConfig {
    workers: NonZero<usize>,
    domain: Domain,
    step: Step,
    integrand: Integrand,
    pinning: Pinning,
    strategy: TopologyStrategy,
    inherit_affinity: bool,
}

impl RunConfig {
    /// Creates a configuration with the given worker count and defaults for everything else.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWorkerCount`] if `workers` is zero or negative.
    pub fn new(workers: i64) -> Result<Self> {
        let valid_workers = usize::try_from(workers)
            .ok()
            .and_then(NonZero::new)
            .ok_or(Error::InvalidWorkerCount { requested: workers })?;

        Ok(Self {
            workers: valid_workers,
            domain: Domain::new(DEFAULT_DOMAIN_START, DEFAULT_DOMAIN_END)?,
            step: Step::new(DEFAULT_STEP)?,
            integrand: Integrand::default(),
            pinning: Pinning::default(),
            strategy: TopologyStrategy::default(),
            inherit_affinity: false,
        })
    }

    /// Sets the domain to integrate over.
    #[must_use]
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    /// Sets the rectangle width.
    #[must_use]
    pub fn with_step(mut self, step: Step) -> Self {
        self.step = step;
        self
    }

    /// Sets the function to integrate.
    #[must_use]
    pub fn with_integrand(mut self, integrand: Integrand) -> Self {
        self.integrand = integrand;
        self
    }

    /// Sets whether workers pin themselves to processors.
    #[must_use]
    pub fn with_pinning(mut self, pinning: Pinning) -> Self {
        self.pinning = pinning;
        self
    }

    /// Sets how the available processors are discovered.
    #[must_use]
    pub fn with_strategy(mut self, strategy: TopologyStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets whether to only use processors that the affinity mask of the starting thread allows,
    /// honoring limits imposed from outside the process (e.g. via `taskset`).
    #[must_use]
    pub fn with_inherit_affinity(mut self, inherit_affinity: bool) -> Self {
        self.inherit_affinity = inherit_affinity;
        self
    }

    /// The number of workers that the domain is split between.
    #[must_use]
    pub const fn workers(&self) -> NonZero<usize> {
        self.workers
    }

    /// The domain to integrate over.
    #[must_use]
    pub const fn domain(&self) -> Domain {
        self.domain
    }

    /// The rectangle width.
    #[must_use]
    pub const fn step(&self) -> Step {
        self.step
    }

    /// The function to integrate.
    #[must_use]
    pub const fn integrand(&self) -> Integrand {
        self.integrand
    }

    /// Whether workers pin themselves to processors.
    #[must_use]
    pub const fn pinning(&self) -> Pinning {
        self.pinning
    }

    /// How the available processors are discovered.
    #[must_use]
    pub const fn strategy(&self) -> TopologyStrategy {
        self.strategy
    }

    /// Whether only processors allowed by the starting thread's affinity mask are used.
    #[must_use]
    pub const fn inherit_affinity(&self) -> bool {
        self.inherit_affinity
    }
}
