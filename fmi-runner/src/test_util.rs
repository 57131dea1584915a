//! Fabricated FMU archives for unit tests.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use fmi_schema::MajorVersion;
use zip::write::SimpleFileOptions;

use crate::loader::shared_lib_path;

pub fn model_description_xml(fmi_version: &str, model_name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<fmiModelDescription fmiVersion="{fmi_version}" modelName="{model_name}" guid="{{0000}}" instantiationToken="{{0000}}">
  <ModelExchange modelIdentifier="{model_name}"/>
  <DefaultExperiment startTime="0" stopTime="5" stepSize="0.5"/>
  <ModelVariables>
    <ScalarVariable name="x" valueReference="0" causality="output"/>
  </ModelVariables>
</fmiModelDescription>"#
    )
}

/// What to put into a fabricated FMU.
pub struct FmuContents {
    pub model_description: Option<String>,
    /// Path of a dummy shared library, relative to the FMU root
    pub binary: Option<PathBuf>,
}

impl FmuContents {
    /// A description plus a dummy binary for the current platform.
    pub fn valid(fmi_version: &str, model_name: &str) -> Self {
        let version = match fmi_schema::parse_major_version(fmi_version) {
            Ok(MajorVersion::FMI3) => MajorVersion::FMI3,
            _ => MajorVersion::FMI2,
        };
        Self {
            model_description: Some(model_description_xml(fmi_version, model_name)),
            binary: shared_lib_path(version, model_name).ok(),
        }
    }
}

/// Write an FMU archive named `file_name` into `dir`.
pub fn write_fmu(dir: &Path, file_name: &str, contents: FmuContents) -> PathBuf {
    let path = dir.join(file_name);
    let file = std::fs::File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    if let Some(xml) = contents.model_description {
        zip.start_file("modelDescription.xml", options).unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
    }
    if let Some(binary) = contents.binary {
        let name = binary.to_string_lossy().replace('\\', "/");
        zip.start_file(name, options).unwrap();
        zip.write_all(b"\x7fELF").unwrap();
    }
    zip.start_file("sources/README.txt", options).unwrap();
    zip.write_all(b"fabricated for tests").unwrap();

    zip.finish().unwrap();
    path
}
