use std::path::Path;

use crate::{error::CompilationError, traits::Compiler};

use super::FmuArchive;

/// A "compiler" for models that were already exported to an FMU by some other tool.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrebuiltFmu;

impl Compiler for PrebuiltFmu {
    type Artifact = FmuArchive;

    fn compile(&self, model_name: &str, source_path: &Path) -> Result<FmuArchive, CompilationError> {
        if !source_path.is_file() {
            return Err(CompilationError::SourceNotFound(source_path.to_path_buf()));
        }
        if !super::is_fmu_path(source_path) {
            return Err(CompilationError::NotAnFmu(source_path.to_path_buf()));
        }
        log::debug!("Using prebuilt FMU {source_path:?} for '{model_name}'");
        Ok(FmuArchive::new(model_name, source_path))
    }
}
