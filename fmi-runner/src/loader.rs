//! [`Loader`] backend that unpacks FMU archives.

use std::{
    io::Read,
    path::{Path, PathBuf},
    str::FromStr,
};

use fmi_schema::{minimal::MinModelDescription, InterfaceType, MajorVersion, ModelDescription};

use crate::{compiler::FmuArchive, error::LoadError, traits::Loader};

const MODEL_DESCRIPTION: &str = "modelDescription.xml";

/// Reads an FMU's model description and checks that it can be simulated here.
#[derive(Clone, Debug, Default)]
pub struct FmuLoader {
    /// Directory in which the FMU is extracted when `require_binary` is set. Defaults to the
    /// system temporary directory.
    pub extract_root: Option<PathBuf>,
    /// Require a shared library for the current platform inside the FMU, and extract the FMU.
    pub require_binary: bool,
}

/// An extracted FMU together with its parsed model description.
#[derive(Debug)]
pub struct LoadedFmu {
    archive: FmuArchive,
    /// Path to the unzipped FMU on disk, if it was extracted
    dir: Option<tempfile::TempDir>,
    model_description: ModelDescription,
    version: MajorVersion,
    interface: InterfaceType,
}

impl LoadedFmu {
    /// The `.fmu` file this model was extracted from
    pub fn archive_path(&self) -> &Path {
        self.archive.path()
    }

    /// The directory the FMU was extracted into
    pub fn extracted_path(&self) -> Option<&Path> {
        self.dir.as_ref().map(|dir| dir.path())
    }

    pub fn model_description(&self) -> &ModelDescription {
        &self.model_description
    }

    pub fn version(&self) -> MajorVersion {
        self.version
    }

    /// The interface used for simulation, Model Exchange when the FMU offers both
    pub fn interface(&self) -> InterfaceType {
        self.interface
    }

    pub fn model_identifier(&self) -> &str {
        self.model_description
            .model_identifier(self.interface)
            .unwrap_or(self.model_description.model_name.as_str())
    }
}

/// Name of the `binaries/` sub-folder holding the shared library for the current platform.
pub fn platform_folder(version: MajorVersion) -> Result<&'static str, LoadError> {
    use std::env::consts::{ARCH, OS};
    let folder = match (version, OS, ARCH) {
        (MajorVersion::FMI2, "windows", "x86_64") => Some("win64"),
        (MajorVersion::FMI2, "windows", "x86") => Some("win32"),
        (MajorVersion::FMI2, "linux", "x86_64") => Some("linux64"),
        (MajorVersion::FMI2, "linux", "x86") => Some("linux32"),
        (MajorVersion::FMI2, "macos", "x86_64" | "aarch64") => Some("darwin64"),
        (MajorVersion::FMI3, "windows", "x86_64") => Some("x86_64-windows"),
        (MajorVersion::FMI3, "windows", "x86") => Some("x86-windows"),
        (MajorVersion::FMI3, "linux", "x86_64") => Some("x86_64-linux"),
        (MajorVersion::FMI3, "linux", "aarch64") => Some("aarch64-linux"),
        (MajorVersion::FMI3, "macos", "x86_64") => Some("x86_64-darwin"),
        (MajorVersion::FMI3, "macos", "aarch64") => Some("aarch64-darwin"),
        _ => None,
    };
    folder.ok_or_else(|| LoadError::UnsupportedPlatform {
        os: OS.to_string(),
        arch: ARCH.to_string(),
    })
}

/// Path of the shared library inside the extracted FMU, relative to its root.
pub fn shared_lib_path(version: MajorVersion, model_identifier: &str) -> Result<PathBuf, LoadError> {
    let fname = format!("{model_identifier}{}", std::env::consts::DLL_SUFFIX);
    Ok(PathBuf::from("binaries")
        .join(platform_folder(version)?)
        .join(fname))
}

impl FmuLoader {
    fn extract_dir(&self) -> std::io::Result<tempfile::TempDir> {
        let builder = {
            let mut builder = tempfile::Builder::new();
            builder.prefix("fmi-runner");
            builder
        };
        match &self.extract_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }
}

impl Loader<FmuArchive> for FmuLoader {
    type Model = LoadedFmu;

    fn load(&self, artifact: FmuArchive) -> Result<LoadedFmu, LoadError> {
        log::debug!("Opening FMU file {:?}", artifact.path());
        let file = std::fs::File::open(artifact.path())?;
        let mut archive = zip::ZipArchive::new(file)?;

        for fname in archive.file_names() {
            log::trace!("  - {}", fname);
        }

        let descr_xml = match archive.by_name(MODEL_DESCRIPTION) {
            Ok(mut entry) => {
                let mut xml = String::new();
                entry.read_to_string(&mut xml)?;
                xml
            }
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(LoadError::MissingModelDescription)
            }
            Err(err) => return Err(err.into()),
        };

        // Initial non-version-specific model description
        let min = MinModelDescription::from_str(&descr_xml)?;
        log::debug!("Found FMI {} named '{}'", min.fmi_version, min.model_name);
        let version = match min.major_version() {
            Ok(version @ (MajorVersion::FMI2 | MajorVersion::FMI3)) => version,
            _ => return Err(LoadError::UnsupportedFmiVersion(min.fmi_version)),
        };

        let model_description = ModelDescription::from_str(&descr_xml)?;
        if model_description.model_name != artifact.model_name() {
            return Err(LoadError::ModelMismatch {
                expected: artifact.model_name().to_owned(),
                found: model_description.model_name,
            });
        }

        let interface = model_description
            .interfaces()
            .next()
            .ok_or(LoadError::NoInterface)?;

        let dir = if self.require_binary {
            let temp_dir = self.extract_dir()?;
            log::debug!("Extracting into {temp_dir:?}");
            archive.extract(&temp_dir)?;
            Some(temp_dir)
        } else {
            None
        };

        let loaded = LoadedFmu {
            archive: artifact,
            dir,
            model_description,
            version,
            interface,
        };

        if let Some(extracted) = loaded.extracted_path() {
            let lib_path = shared_lib_path(version, loaded.model_identifier())?;
            if !extracted.join(&lib_path).is_file() {
                return Err(LoadError::MissingBinary(lib_path));
            }
        }

        log::info!(
            "Loaded FMI {} {} FMU '{}' with {} variables",
            loaded.version,
            loaded.interface,
            loaded.model_description.model_name,
            loaded.model_description.model_variables.len()
        );

        Ok(loaded)
    }
}
