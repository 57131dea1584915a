//! Capabilities consumed by [`crate::SimulationRunner`].

use std::path::Path;

use crate::{
    error::{CompilationError, LoadError, SimulationError},
    result::SimulationResult,
};

/// Turns a model source into an executable simulation artifact.
pub trait Compiler {
    /// The compiled artifact, handed to a [`Loader`] exactly once.
    type Artifact;

    /// Compile the model named `model_name` found in `source_path`.
    fn compile(
        &self,
        model_name: &str,
        source_path: &Path,
    ) -> Result<Self::Artifact, CompilationError>;
}

/// Instantiates a compiled artifact.
pub trait Loader<A> {
    /// The loaded model, handed to a [`Solver`] exactly once.
    type Model;

    fn load(&self, artifact: A) -> Result<Self::Model, LoadError>;
}

/// Integrates a loaded model over a time interval.
pub trait Solver<M> {
    /// Simulate `model` from `start_time` to `final_time`.
    ///
    /// # Returns
    /// The recorded samples. The first sample is at `start_time` and the last at `final_time`.
    fn simulate(
        &self,
        model: M,
        start_time: f64,
        final_time: f64,
    ) -> Result<SimulationResult, SimulationError>;
}
