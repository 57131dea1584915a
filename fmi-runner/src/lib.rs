//! Compile a Modelica model into an FMU, load it and simulate it.
//!
//! A run is driven by [`SimulationRunner`], which takes a [`RunConfig`] through three
//! collaborators, each consuming the output of the previous one:
//!
//! 1. a [`Compiler`] turns the model source into an artifact ([`compiler::OmcCompiler`] for
//!    Modelica sources, [`compiler::PrebuiltFmu`] for existing FMUs),
//! 2. a [`Loader`] instantiates the artifact ([`loader::FmuLoader`]),
//! 3. a [`Solver`] integrates the model over the configured interval ([`solver::FmpySolver`]).
//!
//! The interval is validated before any collaborator runs, and a failing stage stops the run.
//!
//! ```rust,no_run
//! use fmi_runner::{
//!     compiler::OmcCompiler, loader::FmuLoader, solver::FmpySolver, RunConfig, SimulationRunner,
//! };
//!
//! let runner = SimulationRunner::new(
//!     OmcCompiler::default(),
//!     FmuLoader::default(),
//!     FmpySolver::default(),
//! );
//! let config = RunConfig::new("HelloWorld", "HelloWorld.mo", 0.0, 5.0);
//! let result = runner.run(&config).unwrap();
//! assert_eq!(result.end_time(), 5.0);
//! ```
#![deny(clippy::all)]

pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod loader;
pub mod options;
pub mod result;
pub mod runner;
pub mod solver;
pub mod state;
pub mod traits;

#[cfg(test)]
mod test_util;

pub use config::RunConfig;
pub use error::Error;
pub use result::SimulationResult;
pub use runner::SimulationRunner;
pub use state::{RunReport, RunState, Stage};
pub use traits::{Compiler, Loader, Solver};

/// Run the model described by `options` with the backends it selects.
pub fn simulate(options: &options::FmiRunnerOptions) -> RunReport {
    if options.diagnostics {
        diagnostics::log_environment(log::Level::Info);
    }

    let runner = SimulationRunner::new(options.compiler(), options.loader(), options.solver());
    runner.run_with_report(&options.run_config())
}
