//! [`Compiler`] backends producing FMU archives.

use std::path::{Path, PathBuf};

use crate::{error::CompilationError, traits::Compiler};

mod omc;
mod prebuilt;
pub mod source;

pub use omc::{FmiVersion, FmuType, OmcCompiler};
pub use prebuilt::PrebuiltFmu;

/// An FMU file on disk, as produced by a compiler backend.
///
/// When the FMU was built into a temporary directory, the archive keeps that directory alive until
/// it is dropped.
#[derive(Debug)]
pub struct FmuArchive {
    model_name: String,
    path: PathBuf,
    _build_dir: Option<tempfile::TempDir>,
}

impl FmuArchive {
    pub fn new(model_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            model_name: model_name.into(),
            path: path.into(),
            _build_dir: None,
        }
    }

    pub fn with_build_dir(
        model_name: impl Into<String>,
        path: impl Into<PathBuf>,
        build_dir: tempfile::TempDir,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            path: path.into(),
            _build_dir: Some(build_dir),
        }
    }

    /// The model the archive was compiled for.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn is_fmu_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("fmu"))
}

/// Selects between the compiler backends at runtime.
#[derive(Clone, Debug)]
pub enum CompilerBackend {
    Omc(OmcCompiler),
    Prebuilt(PrebuiltFmu),
}

impl CompilerBackend {
    /// Use the prebuilt backend for `.fmu` files and `omc` for everything else.
    pub fn for_source(source_path: &Path, omc: OmcCompiler) -> Self {
        if is_fmu_path(source_path) {
            CompilerBackend::Prebuilt(PrebuiltFmu)
        } else {
            CompilerBackend::Omc(omc)
        }
    }
}

impl Compiler for CompilerBackend {
    type Artifact = FmuArchive;

    fn compile(&self, model_name: &str, source_path: &Path) -> Result<FmuArchive, CompilationError> {
        match self {
            CompilerBackend::Omc(omc) => omc.compile(model_name, source_path),
            CompilerBackend::Prebuilt(prebuilt) => prebuilt.compile(model_name, source_path),
        }
    }
}
