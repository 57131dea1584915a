//! Progress of a single run through its stages.

use std::{fmt::Display, time::Duration};

use crate::{result::SimulationResult, Error};

/// The stages of a run, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Compile,
    Load,
    Simulate,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Validate => write!(f, "validate"),
            Stage::Compile => write!(f, "compile"),
            Stage::Load => write!(f, "load"),
            Stage::Simulate => write!(f, "simulate"),
        }
    }
}

/// State machine of a run.
///
/// `Validating -> Compiling -> Loading -> Simulating -> Done`. A failure moves any running state to
/// `Failed`, remembering the stage it happened in. `Done` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Validating,
    Compiling,
    Loading,
    Simulating,
    Done,
    Failed(Stage),
}

impl RunState {
    /// The state a run is in while executing `stage`.
    pub fn running(stage: Stage) -> Self {
        match stage {
            Stage::Validate => RunState::Validating,
            Stage::Compile => RunState::Compiling,
            Stage::Load => RunState::Loading,
            Stage::Simulate => RunState::Simulating,
        }
    }

    /// The stage currently executing, `None` for terminal states.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            RunState::Validating => Some(Stage::Validate),
            RunState::Compiling => Some(Stage::Compile),
            RunState::Loading => Some(Stage::Load),
            RunState::Simulating => Some(Stage::Simulate),
            RunState::Done | RunState::Failed(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed(_))
    }

    /// Transition to the next state after the current stage succeeded.
    #[must_use]
    pub fn advance(self) -> Self {
        match self {
            RunState::Validating => RunState::Compiling,
            RunState::Compiling => RunState::Loading,
            RunState::Loading => RunState::Simulating,
            RunState::Simulating => RunState::Done,
            terminal => terminal,
        }
    }

    /// Transition to `Failed` from the current stage.
    #[must_use]
    pub fn fail(self) -> Self {
        match self.stage() {
            Some(stage) => RunState::Failed(stage),
            None => self,
        }
    }
}

impl Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Validating => write!(f, "Validating"),
            RunState::Compiling => write!(f, "Compiling"),
            RunState::Loading => write!(f, "Loading"),
            RunState::Simulating => write!(f, "Simulating"),
            RunState::Done => write!(f, "Done"),
            RunState::Failed(stage) => write!(f, "Failed ({stage})"),
        }
    }
}

/// Wall-clock duration of a completed stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageTiming {
    pub stage: Stage,
    pub elapsed: Duration,
}

/// Everything known about a finished run.
#[derive(Debug)]
pub struct RunReport {
    pub model_name: String,
    /// Terminal state of the run
    pub state: RunState,
    /// Durations of the stages that completed, in execution order
    pub timings: Vec<StageTiming>,
    pub outcome: Result<SimulationResult, Error>,
}

impl RunReport {
    pub fn total_elapsed(&self) -> Duration {
        self.timings.iter().map(|timing| timing.elapsed).sum()
    }

    pub fn into_result(self) -> Result<SimulationResult, Error> {
        self.outcome
    }
}
