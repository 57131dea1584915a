use std::path::PathBuf;

use arrow::error::ArrowError;

use crate::state::Stage;

/// Errors raised by a [`crate::traits::Compiler`].
#[derive(Debug, thiserror::Error)]
pub enum CompilationError {
    #[error("Model source {0:?} does not exist")]
    SourceNotFound(PathBuf),

    #[error("Invalid model name {0:?}")]
    InvalidModelName(String),

    #[error("Model '{model}' is not declared in {path:?}")]
    ModelNotFound { model: String, path: PathBuf },

    #[error("Expected an FMU archive, found {0:?}")]
    NotAnFmu(PathBuf),

    #[error("Failed to launch compiler {program:?}: {source}")]
    Launch {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("Compiler {status}:\n{output}")]
    CompilerFailed { status: String, output: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised by a [`crate::traits::Loader`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("FMU archive is missing modelDescription.xml")]
    MissingModelDescription,

    #[error("Unsupported FMI version: {0}")]
    UnsupportedFmiVersion(String),

    #[error("FMU contains model '{found}', expected '{expected}'")]
    ModelMismatch { expected: String, found: String },

    #[error("FMU implements neither Model Exchange nor Co-Simulation")]
    NoInterface,

    #[error("Unsupported platform {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("FMU has no binary for this platform, expected {0:?}")]
    MissingBinary(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Schema(#[from] fmi_schema::Error),
}

/// Errors raised by a [`crate::traits::Solver`].
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("final time {final_time} is before start time {start_time}")]
    InvalidInterval { start_time: f64, final_time: f64 },

    #[error("`output_interval` must be positive, got {0}")]
    InvalidOutputInterval(f64),

    #[error("Failed to launch simulator {program:?}: {source}")]
    Launch {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("Simulator {status}:\n{output}")]
    SolverFailed { status: String, output: String },

    #[error("Simulator produced no result at {0:?}")]
    MissingOutput(PathBuf),

    #[error("Result has no `time` column")]
    MissingTimeColumn,

    #[error("Result contains no samples")]
    EmptyResult,

    #[error("Result time decreases at sample {index}")]
    NonMonotonicTime { index: usize },

    #[error("Result spans [{start}, {end}], expected [{expected_start}, {expected_end}]")]
    SpanMismatch {
        expected_start: f64,
        expected_end: f64,
        start: f64,
        end: f64,
    },

    #[error(transparent)]
    Arrow(#[from] ArrowError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A failed run. Each variant names the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Compilation failed: {0}")]
    Compilation(#[from] CompilationError),

    #[error("Loading failed: {0}")]
    Load(#[from] LoadError),

    #[error("Invalid simulation interval: final time {final_time} is before start time {start_time}")]
    InvalidInterval { start_time: f64, final_time: f64 },

    #[error("Simulation failed: {0}")]
    Simulation(SimulationError),
}

impl From<SimulationError> for Error {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::InvalidInterval {
                start_time,
                final_time,
            } => Error::InvalidInterval {
                start_time,
                final_time,
            },
            err => Error::Simulation(err),
        }
    }
}

impl Error {
    /// The stage that raised this error.
    pub fn stage(&self) -> Stage {
        match self {
            Error::Compilation(_) => Stage::Compile,
            Error::Load(_) => Stage::Load,
            Error::InvalidInterval { .. } => Stage::Validate,
            Error::Simulation(_) => Stage::Simulate,
        }
    }
}
