use std::{
    path::{Path, PathBuf},
    process::Command,
};

use itertools::Itertools;

use crate::{error::CompilationError, traits::Compiler};

use super::{
    source::{validate_model_name, ModelicaSource},
    FmuArchive,
};

const SCRIPT_NAME: &str = "build.mos";

/// FMI version of the exported FMU.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FmiVersion {
    #[default]
    #[value(name = "2")]
    V2,
    #[value(name = "3")]
    V3,
}

impl FmiVersion {
    fn as_str(&self) -> &'static str {
        match self {
            FmiVersion::V2 => "2.0",
            FmiVersion::V3 => "3.0",
        }
    }
}

/// Interface(s) included in the exported FMU.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FmuType {
    /// Model Exchange
    #[default]
    Me,
    /// Co-Simulation
    Cs,
    /// Both Model Exchange and Co-Simulation
    MeCs,
}

impl FmuType {
    fn as_str(&self) -> &'static str {
        match self {
            FmuType::Me => "me",
            FmuType::Cs => "cs",
            FmuType::MeCs => "me_cs",
        }
    }
}

/// Compiles Modelica models into FMUs with the OpenModelica compiler (`omc`).
#[derive(Clone, Debug)]
pub struct OmcCompiler {
    /// The `omc` executable
    pub program: PathBuf,
    pub fmi_version: FmiVersion,
    pub fmu_type: FmuType,
    /// Libraries loaded with `loadModel()` before the source file, e.g. `Modelica`.
    pub libraries: Vec<String>,
    /// Directory in which the temporary build directories are created. Defaults to the system
    /// temporary directory.
    pub build_root: Option<PathBuf>,
}

impl Default for OmcCompiler {
    fn default() -> Self {
        Self {
            program: PathBuf::from("omc"),
            fmi_version: FmiVersion::default(),
            fmu_type: FmuType::default(),
            libraries: Vec::new(),
            build_root: None,
        }
    }
}

impl OmcCompiler {
    /// Render the `.mos` script that builds `model_name` from `source_path`.
    pub fn script(&self, model_name: &str, source_path: &Path, file_name_prefix: &str) -> String {
        let libraries = self
            .libraries
            .iter()
            .map(|library| format!("loadModel({library}); getErrorString();\n"))
            .join("");
        format!(
            "{libraries}\
             loadFile(\"{}\"); getErrorString();\n\
             buildModelFMU({model_name}, version=\"{}\", fmuType=\"{}\", fileNamePrefix=\"{file_name_prefix}\"); getErrorString();\n",
            escape_path(source_path),
            self.fmi_version.as_str(),
            self.fmu_type.as_str(),
        )
    }

    fn build_dir(&self) -> std::io::Result<tempfile::TempDir> {
        let builder = {
            let mut builder = tempfile::Builder::new();
            builder.prefix("fmi-runner-build");
            builder
        };
        match &self.build_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }
}

impl Compiler for OmcCompiler {
    type Artifact = FmuArchive;

    fn compile(&self, model_name: &str, source_path: &Path) -> Result<FmuArchive, CompilationError> {
        let source = ModelicaSource::read(source_path)?;
        source.ensure_declares(model_name)?;
        for library in &self.libraries {
            validate_model_name(library)?;
        }

        let source_path = std::path::absolute(source.path())?;
        let prefix = file_name_prefix(model_name);
        let build_dir = self.build_dir()?;
        let script = self.script(model_name, &source_path, &prefix);
        std::fs::write(build_dir.path().join(SCRIPT_NAME), &script)?;

        log::debug!("Running {:?} in {:?}", self.program, build_dir.path());
        log::trace!("{SCRIPT_NAME}:\n{script}");

        let output = Command::new(&self.program)
            .arg(SCRIPT_NAME)
            .current_dir(build_dir.path())
            .output()
            .map_err(|source| CompilationError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stdout.lines().filter(|line| !line.trim().is_empty()) {
            log::debug!("omc: {line}");
        }

        let fmu_path = build_dir.path().join(format!("{prefix}.fmu"));
        if !output.status.success() || !fmu_path.is_file() {
            let status = if output.status.success() {
                format!("finished without producing {prefix}.fmu")
            } else {
                format!("exited with {}", output.status)
            };
            return Err(CompilationError::CompilerFailed {
                status,
                output: format!("{stdout}{stderr}").trim_end().to_owned(),
            });
        }

        log::info!("Built FMU {fmu_path:?}");
        Ok(FmuArchive::with_build_dir(model_name, fmu_path, build_dir))
    }
}

/// `Modelica.Blocks.Examples.PID_Controller` -> `Modelica_Blocks_Examples_PID_Controller`
fn file_name_prefix(model_name: &str) -> String {
    model_name.replace('.', "_")
}

/// Quote a path for use inside a Modelica string literal.
fn escape_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .replace('"', "\\\"")
}
