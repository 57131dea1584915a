//! The Compile → Load → Simulate pipeline.

use std::time::Instant;

use crate::{
    config::RunConfig,
    result::SimulationResult,
    state::{RunReport, RunState, Stage, StageTiming},
    traits::{Compiler, Loader, Solver},
    Error,
};

/// Runs one model through a [`Compiler`], a [`Loader`] and a [`Solver`], in that order.
///
/// Each stage consumes the output of the previous one, so a failing stage stops the run and no
/// later collaborator is invoked.
#[derive(Clone, Debug, Default)]
pub struct SimulationRunner<C, L, S> {
    compiler: C,
    loader: L,
    solver: S,
}

/// Tracks the state machine and stage timings of a single run.
struct Tracker {
    state: RunState,
    timings: Vec<StageTiming>,
}

impl Tracker {
    fn new() -> Self {
        Self {
            state: RunState::default(),
            timings: Vec::new(),
        }
    }

    /// Run `f` as `stage`, then advance or fail.
    fn stage<T, E, F>(&mut self, stage: Stage, f: F) -> Result<T, Error>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<Error>,
    {
        self.state = RunState::running(stage);
        log::info!("{}", self.state);

        let started = Instant::now();
        let outcome = f().map_err(Into::into);
        let elapsed = started.elapsed();

        match &outcome {
            Ok(_) => {
                log::debug!("Stage {stage} took {elapsed:?}");
                self.timings.push(StageTiming { stage, elapsed });
                self.state = self.state.advance();
            }
            Err(err) => {
                log::error!("Stage {stage} failed after {elapsed:?}: {err}");
                self.state = self.state.fail();
            }
        }
        outcome
    }
}

impl<C, L, S> SimulationRunner<C, L, S>
where
    C: Compiler,
    L: Loader<C::Artifact>,
    S: Solver<L::Model>,
{
    pub fn new(compiler: C, loader: L, solver: S) -> Self {
        Self {
            compiler,
            loader,
            solver,
        }
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Run `config` and return the simulation result.
    ///
    /// # Errors
    /// * [`Error::InvalidInterval`] if `final_time < start_time`, before any collaborator runs
    /// * [`Error::Compilation`], [`Error::Load`] or [`Error::Simulation`] from the failing stage
    pub fn run(&self, config: &RunConfig) -> Result<SimulationResult, Error> {
        self.run_with_report(config).into_result()
    }

    /// Run `config` and report the terminal state and stage timings along with the outcome.
    pub fn run_with_report(&self, config: &RunConfig) -> RunReport {
        let mut tracker = Tracker::new();
        let outcome = self.execute(config, &mut tracker);

        match &outcome {
            Ok(result) => log::info!(
                "Simulated '{}' over [{}, {}]: {} samples",
                config.model_name(),
                result.start_time(),
                result.end_time(),
                result.len()
            ),
            Err(err) => log::debug!("Run of '{}' failed: {err:?}", config.model_name()),
        }

        RunReport {
            model_name: config.model_name().to_owned(),
            state: tracker.state,
            timings: tracker.timings,
            outcome,
        }
    }

    fn execute(&self, config: &RunConfig, tracker: &mut Tracker) -> Result<SimulationResult, Error> {
        tracker.stage(Stage::Validate, || config.validate())?;

        let artifact = tracker.stage(Stage::Compile, || {
            self.compiler
                .compile(config.model_name(), config.model_file_path())
        })?;

        let model = tracker.stage(Stage::Load, || self.loader.load(artifact))?;

        tracker.stage(Stage::Simulate, || {
            let result = self
                .solver
                .simulate(model, config.start_time(), config.final_time())?;
            result.check_span(config.start_time(), config.final_time())?;
            Ok::<_, crate::error::SimulationError>(result)
        })
    }
}
