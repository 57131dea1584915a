use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};

use crate::{
    compiler::{CompilerBackend, FmiVersion, FmuType, OmcCompiler, PrebuiltFmu},
    config::RunConfig,
    loader::FmuLoader,
    solver::{FmpySolver, Integrator},
};

/// How the model file is turned into an FMU.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum CompilerKind {
    /// Pick `prebuilt` for `.fmu` files, `omc` otherwise
    #[default]
    Auto,
    /// Compile a Modelica source with OpenModelica
    Omc,
    /// Use an existing FMU as is
    Prebuilt,
}

/// Compile, load and simulate a Modelica model as an FMU
#[derive(Debug, Parser)]
#[command(name = "fmi-runner", version, allow_negative_numbers = true)]
pub struct FmiRunnerOptions {
    /// Name of the model to simulate
    #[arg(short = 'm', long, env = "FMI_RUNNER_MODEL_NAME")]
    pub model_name: String,

    /// The Modelica source (`.mo`) or FMU (`.fmu`) containing the model
    #[arg(value_name = "MODEL_FILE", env = "FMI_RUNNER_MODEL_FILE")]
    pub model_file: PathBuf,

    /// Simulation start time
    #[arg(long, default_value_t = 0.0)]
    pub start_time: f64,

    /// Simulation final time
    #[arg(long, default_value_t = 1.0)]
    pub final_time: f64,

    /// Interval for sampling the outputs. Defaults to the model's default experiment.
    #[arg(long)]
    pub output_interval: Option<f64>,

    /// Relative tolerance of the integrator. Defaults to the model's default experiment.
    #[arg(long)]
    pub tolerance: Option<f64>,

    #[arg(long, value_enum, default_value_t = CompilerKind::Auto)]
    pub compiler: CompilerKind,

    /// The OpenModelica compiler executable
    #[arg(long, env = "OPENMODELICA_OMC", default_value = "omc")]
    pub omc: PathBuf,

    /// FMI version of the compiled FMU
    #[arg(long, value_enum, default_value_t = FmiVersion::V2)]
    pub fmi_version: FmiVersion,

    /// Interface(s) of the compiled FMU
    #[arg(long, value_enum, default_value_t = FmuType::Me)]
    pub fmu_type: FmuType,

    /// Modelica library to load before the model file, can be specified multiple times
    #[arg(long = "library", value_name = "LIB")]
    pub libraries: Vec<String>,

    /// The FMPy executable
    #[arg(long, env = "FMI_RUNNER_FMPY", default_value = "fmpy")]
    pub fmpy: PathBuf,

    /// Integrator for Model Exchange FMUs. Defaults to the simulator's choice.
    #[arg(long, value_enum)]
    pub integrator: Option<Integrator>,

    /// Record the values before and after events
    #[arg(long)]
    pub record_events: bool,

    /// Write the results to a CSV file instead of printing them
    #[arg(short, long, value_name = "CSV")]
    pub output_file: Option<PathBuf>,

    /// Log the working directory and environment before the run
    #[arg(long)]
    pub diagnostics: bool,

    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl FmiRunnerOptions {
    pub fn run_config(&self) -> RunConfig {
        RunConfig::new(
            self.model_name.clone(),
            self.model_file.clone(),
            self.start_time,
            self.final_time,
        )
    }

    pub fn compiler(&self) -> CompilerBackend {
        let omc = OmcCompiler {
            program: self.omc.clone(),
            fmi_version: self.fmi_version,
            fmu_type: self.fmu_type,
            libraries: self.libraries.clone(),
            build_root: None,
        };
        match self.compiler {
            CompilerKind::Auto => CompilerBackend::for_source(&self.model_file, omc),
            CompilerKind::Omc => CompilerBackend::Omc(omc),
            CompilerKind::Prebuilt => CompilerBackend::Prebuilt(PrebuiltFmu),
        }
    }

    pub fn loader(&self) -> FmuLoader {
        // Source-only FMUs are compiled by the simulator
        FmuLoader::default()
    }

    pub fn solver(&self) -> FmpySolver {
        FmpySolver {
            program: self.fmpy.clone(),
            integrator: self.integrator,
            output_interval: self.output_interval,
            tolerance: self.tolerance,
            record_events: self.record_events,
        }
    }
}
