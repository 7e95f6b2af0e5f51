#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Command line entry point for the parallel integration benchmark.
//!
//! Prints the integral to stdout. Diagnostics go to stderr and are controlled via `RUST_LOG`
//! (default `warn`).

use std::io;
use std::process::ExitCode;

use argh::FromArgs;
use cpu_topology::{SystemTopology, TopologyStrategy};
use para_int::{
    DEFAULT_DOMAIN_END, DEFAULT_DOMAIN_START, DEFAULT_STEP, Domain, Integrand, Pinning, RunConfig,
    Step, run,
};
use tracing_subscriber::EnvFilter;

/// Integrate a function over a fixed domain on a number of processor-pinned worker threads.
#[derive(Debug, FromArgs)]
struct Args {
    /// number of workers to split the domain between
    #[argh(positional)]
    workers: i64,

    /// start of the domain (inclusive)
    #[argh(option, default = "DEFAULT_DOMAIN_START")]
    start: f64,

    /// end of the domain (exclusive)
    #[argh(option, default = "DEFAULT_DOMAIN_END")]
    end: f64,

    /// width of each rectangle
    #[argh(option, default = "DEFAULT_STEP")]
    step: f64,

    /// function to integrate (oscillating, power-series, constant, identity)
    #[argh(option, default = "Integrand::default()")]
    integrand: Integrand,

    /// how to discover processors (auto, hierarchical, flat)
    #[argh(option, default = "TopologyStrategy::default()")]
    topology: TopologyStrategy,

    /// let the OS scheduler place workers instead of pinning them
    #[argh(switch)]
    no_pin: bool,

    /// only use processors allowed by the affinity mask this process was started with
    #[argh(switch)]
    inherit_affinity: bool,

    /// print the per-slot breakdown and elapsed time after the total
    #[argh(switch)]
    report: bool,
}

impl Args {
    fn to_config(&self) -> para_int::Result<RunConfig> {
        let pinning = if self.no_pin {
            Pinning::Disabled
        } else {
            Pinning::Enabled
        };

        Ok(RunConfig::new(self.workers)?
            .with_domain(Domain::new(self.start, self.end)?)
            .with_step(Step::new(self.step)?)
            .with_integrand(self.integrand)
            .with_strategy(self.topology)
            .with_pinning(pinning)
            .with_inherit_affinity(self.inherit_affinity))
    }
}

// Process entry point, exercised via the library and argument tests.
#[cfg_attr(test, mutants::skip)]
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let str_args = std::env::args().collect::<Vec<_>>();
    let str_args = str_args.iter().map(String::as_str).collect::<Vec<_>>();

    let (program_name, rest) = match str_args.split_first() {
        Some((program_name, rest)) => (*program_name, rest),
        None => ("para-int", &[][..]),
    };

    let args = match Args::from_args(&[program_name], rest) {
        Ok(args) => args,
        Err(early_exit) => {
            return if early_exit.status.is_ok() {
                println!("{}", early_exit.output);
                ExitCode::SUCCESS
            } else {
                eprintln!("{}", early_exit.output);
                eprintln!("Run {program_name} --help for more information.");
                ExitCode::FAILURE
            };
        }
    };

    let outcome = args
        .to_config()
        .and_then(|config| run(&config, &SystemTopology::current()));

    match outcome {
        Ok(report) => {
            println!("{}", report.total());

            if args.report {
                println!("{report}");
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");

            if e.is_configuration_error() {
                eprintln!("Usage: {program_name} <workers> [--start X] [--end X] [--step X]");
            }

            ExitCode::FAILURE
        }
    }
}
