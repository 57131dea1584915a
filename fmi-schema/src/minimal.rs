//! Minimal FMI definitions for determining FMI version.

use std::str::FromStr;

use yaserde_derive::YaDeserialize;

use crate::MajorVersion;

/// A minimal model description that only contains the FMI version and the model name.
///
/// This is used to determine the FMI version of an FMU before anything else is read from it.
#[derive(Default, PartialEq, Debug, YaDeserialize)]
#[yaserde(rename = "fmiModelDescription")]
pub struct MinModelDescription {
    #[yaserde(attribute = true, rename = "fmiVersion")]
    pub fmi_version: String,
    #[yaserde(attribute = true, rename = "modelName")]
    pub model_name: String,
}

impl MinModelDescription {
    /// Returns the parsed FMI version as a semver::Version
    pub fn version(&self) -> Result<semver::Version, crate::Error> {
        crate::parse_version(&self.fmi_version)
    }

    /// Returns the parsed FMI version as a MajorVersion
    pub fn major_version(&self) -> Result<MajorVersion, crate::Error> {
        crate::parse_major_version(&self.fmi_version)
    }
}

impl FromStr for MinModelDescription {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::deserialize(s)
    }
}
