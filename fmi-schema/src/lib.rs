#![doc=include_str!( "../README.md")]
#![deny(unsafe_code)]
#![deny(clippy::all)]

use std::fmt::Display;

use thiserror::Error;
use yaserde::YaDeserialize;

pub mod minimal;
mod model_description;

pub use model_description::{
    Causality, CoSimulation, DefaultExperiment, InterfaceType, ModelDescription, ModelExchange,
    ModelVariables, Variable,
};

/// The major version of the FMI standard
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MajorVersion {
    FMI1,
    FMI2,
    FMI3,
}

impl Display for MajorVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MajorVersion::FMI1 => write!(f, "1.0"),
            MajorVersion::FMI2 => write!(f, "2.0"),
            MajorVersion::FMI3 => write!(f, "3.0"),
        }
    }
}

impl MajorVersion {
    fn from_semver(version: &semver::Version) -> Result<Self, Error> {
        match version.major {
            1 => Ok(MajorVersion::FMI1),
            2 => Ok(MajorVersion::FMI2),
            3 => Ok(MajorVersion::FMI3),
            _ => Err(Error::UnknownVersion(version.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Semver(#[from] lenient_semver::parser::OwnedError),

    #[error("Unknown FMI version {0}")]
    UnknownVersion(String),

    #[error("Error parsing XML: {0}")]
    XmlParse(String),
}

/// Parse the FMI version string found in `fmiVersion`, e.g. "2.0" or "3.0-beta.2".
pub fn parse_version(fmi_version: &str) -> Result<semver::Version, Error> {
    lenient_semver::parse(fmi_version).map_err(|e| e.owned().into())
}

/// Parse the FMI version string into its [`MajorVersion`].
pub fn parse_major_version(fmi_version: &str) -> Result<MajorVersion, Error> {
    MajorVersion::from_semver(&parse_version(fmi_version)?)
}

pub fn deserialize<T: YaDeserialize>(xml: &str) -> Result<T, Error> {
    yaserde::de::from_str(xml).map_err(Error::XmlParse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_version() {
        assert_eq!(parse_major_version("2.0"), Ok(MajorVersion::FMI2));
        assert_eq!(parse_major_version("3.0-beta.2"), Ok(MajorVersion::FMI3));
        assert_eq!(parse_major_version("1.0"), Ok(MajorVersion::FMI1));
        assert!(matches!(
            parse_major_version("4.0"),
            Err(Error::UnknownVersion(_))
        ));
        assert!(parse_major_version("not a version").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(MajorVersion::FMI2.to_string(), "2.0");
        assert_eq!(MajorVersion::FMI3.to_string(), "3.0");
    }
}
