//! Complete runs against the real operating system, from configuration to total.

#![allow(missing_docs, reason = "No need for API documentation in test code")]

use cpu_topology::{Processor, ProcessorSet, SystemTopology, TopologyStrategy};
use para_int::{Domain, Error, Integrand, Pinning, RunConfig, Step, integrate, run, run_with};

fn processors(ids: impl IntoIterator<Item = u32>) -> ProcessorSet {
    ProcessorSet::from_processors(ids.into_iter().map(Processor::new)).unwrap()
}

#[test]
fn constant_over_ten_units_with_five_workers() {
    let config = RunConfig::new(5)
        .unwrap()
        .with_domain(Domain::new(0.0, 10.0).unwrap())
        .with_step(Step::new(0.1).unwrap())
        .with_integrand(Integrand::Constant);

    let report = run(&config, &SystemTopology::current()).unwrap();

    assert!((report.total() - 10.0).abs() < 1e-6, "total was {}", report.total());
    assert_eq!(report.plan().contributing_slots().len(), 5);
    assert!(report.plan().slot_count() >= 5);
}

#[test]
fn identity_with_single_worker_is_left_rectangle_sum() {
    let config = RunConfig::new(1)
        .unwrap()
        .with_domain(Domain::new(0.0, 1.0).unwrap())
        .with_step(Step::new(0.001).unwrap())
        .with_integrand(Integrand::Identity);

    let report = run(&config, &SystemTopology::current()).unwrap();

    // Left rectangles of x over [0, 1) with 1000 samples: 0.001 * (0 + 0.001 + ... + 0.999).
    assert!((report.total() - 0.4995).abs() < 1e-9, "total was {}", report.total());
}

#[test]
fn fractional_rectangle_counts_do_not_depend_on_worker_count() {
    // 10.1 / 1.0 is not a whole number of steps. With these worker counts every slot holds a
    // whole number of steps plus a fraction, and only the whole rectangles are sampled.
    for workers in [1, 2, 5, 10] {
        let config = RunConfig::new(workers)
            .unwrap()
            .with_domain(Domain::new(0.0, 10.1).unwrap())
            .with_step(Step::new(1.0).unwrap())
            .with_integrand(Integrand::Constant)
            .with_pinning(Pinning::Disabled);

        let report = run_with(
            &config,
            &processors([0]),
            &SystemTopology::current(),
            config.integrand().function(),
        )
        .unwrap();

        assert!(
            (report.total() - 10.0).abs() < 1e-9,
            "{workers} workers gave {}",
            report.total()
        );
    }
}

#[test]
fn non_positive_worker_count_is_rejected_before_any_work() {
    for workers in [0, -3] {
        let error = RunConfig::new(workers).unwrap_err();

        assert!(matches!(error, Error::InvalidWorkerCount { requested } if requested == workers));
        assert!(error.is_configuration_error());
    }
}

#[test]
fn undersubscription_saturates_every_processor() {
    let config = RunConfig::new(3)
        .unwrap()
        .with_domain(Domain::new(0.0, 3.0).unwrap())
        .with_step(Step::new(0.01).unwrap())
        .with_pinning(Pinning::Disabled);

    let report = run_with(
        &config,
        &processors(0..8),
        &SystemTopology::current(),
        |x: f64| x * x,
    )
    .unwrap();

    let plan = report.plan();
    assert_eq!(plan.slot_count(), 8);
    assert_eq!(plan.saturation_slots().len(), 5);
    assert!(plan.slots().iter().all(|slot| slot.partial_sum().is_some()));

    for slot in plan.saturation_slots() {
        let mirrored = &plan.slots()[slot.index() % 3];

        assert_eq!(slot.interval(), mirrored.interval());
        assert!(!slot.contributes());
    }

    let expected = integrate(|x| x * x, 0.0, 1.0, config.step())
        + integrate(|x| x * x, 1.0, 2.0, config.step())
        + integrate(|x| x * x, 2.0, 3.0, config.step());

    assert!((report.total() - expected).abs() < 1e-9);
}

#[test]
fn oversubscription_shares_processors_round_robin() {
    let config = RunConfig::new(7)
        .unwrap()
        .with_domain(Domain::new(0.0, 7.0).unwrap())
        .with_step(Step::new(0.01).unwrap())
        .with_integrand(Integrand::Constant);

    let topology = SystemTopology::current();
    let available = topology.discover(TopologyStrategy::Flat).unwrap();
    let first = *available.processors().first();

    let report = run_with(
        &config,
        &processors([first.id()]),
        &topology,
        config.integrand().function(),
    )
    .unwrap();

    let plan = report.plan();
    assert_eq!(plan.slot_count(), 7);
    assert!(plan.saturation_slots().is_empty());
    assert!(
        plan.slots()
            .iter()
            .all(|slot| slot.assigned_processor() == Some(first))
    );
    assert!((report.total() - 7.0).abs() < 1e-6);
}

#[test]
fn pinning_to_missing_processors_is_not_fatal() {
    let config = RunConfig::new(2)
        .unwrap()
        .with_domain(Domain::new(0.0, 2.0).unwrap())
        .with_step(Step::new(0.01).unwrap())
        .with_integrand(Integrand::Constant);

    let report = run_with(
        &config,
        &processors([u32::MAX - 1, u32::MAX]),
        &SystemTopology::current(),
        config.integrand().function(),
    )
    .unwrap();

    assert!((report.total() - 2.0).abs() < 1e-6);
}

#[test]
fn inherited_affinity_still_finds_processors() {
    let config = RunConfig::new(2)
        .unwrap()
        .with_domain(Domain::new(0.0, 1.0).unwrap())
        .with_step(Step::new(0.001).unwrap())
        .with_integrand(Integrand::Constant)
        .with_inherit_affinity(true);

    let report = run(&config, &SystemTopology::current()).unwrap();

    assert!((report.total() - 1.0).abs() < 1e-6);
}

#[test]
fn default_integrand_runs_on_small_domain() {
    let config = RunConfig::new(4)
        .unwrap()
        .with_domain(Domain::new(0.0, 1.0).unwrap())
        .with_step(Step::new(1e-4).unwrap());

    let report = run(&config, &SystemTopology::current()).unwrap();

    // cos(x^5 sin(atan x)) stays close to 1 on [0, 1): the argument never exceeds 1/sqrt(2).
    assert!(report.total() > 0.9 && report.total() < 1.0);
}
