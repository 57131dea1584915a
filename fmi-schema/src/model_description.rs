use std::{fmt::Display, str::FromStr};

use yaserde_derive::YaDeserialize;

use crate::MajorVersion;

/// The subset of `fmiModelDescription` shared by FMI 2.0 and FMI 3.0.
#[derive(Default, Debug, YaDeserialize)]
#[yaserde(rename = "fmiModelDescription")]
pub struct ModelDescription {
    /// Version of FMI that was used to generate the XML file.
    #[yaserde(attribute = true, rename = "fmiVersion")]
    pub fmi_version: String,

    /// The name of the model as used in the modeling environment that generated the XML file, such
    /// as Modelica.Mechanics.Rotational.Examples.CoupledClutches.
    #[yaserde(attribute = true, rename = "modelName")]
    pub model_name: String,

    /// FMI 2.0 fingerprint of the XML file.
    #[yaserde(attribute = true)]
    pub guid: Option<String>,

    /// FMI 3.0 replacement of `guid`.
    #[yaserde(attribute = true, rename = "instantiationToken")]
    pub instantiation_token: Option<String>,

    #[yaserde(attribute = true)]
    pub description: Option<String>,

    /// Name of the tool that generated the XML file.
    #[yaserde(attribute = true, rename = "generationTool")]
    pub generation_tool: Option<String>,

    /// If present, the FMU is based on FMI for Model Exchange
    #[yaserde(rename = "ModelExchange")]
    pub model_exchange: Option<ModelExchange>,

    /// If present, the FMU is based on FMI for Co-Simulation
    #[yaserde(rename = "CoSimulation")]
    pub co_simulation: Option<CoSimulation>,

    /// Providing default settings for the integrator, such as stop time and relative tolerance.
    #[yaserde(rename = "DefaultExperiment")]
    pub default_experiment: Option<DefaultExperiment>,

    #[yaserde(rename = "ModelVariables")]
    pub model_variables: ModelVariables,
}

impl ModelDescription {
    /// Returns the parsed FMI version as a MajorVersion
    pub fn major_version(&self) -> Result<MajorVersion, crate::Error> {
        crate::parse_major_version(&self.fmi_version)
    }

    /// The interfaces implemented by this FMU, Model Exchange first.
    pub fn interfaces(&self) -> impl Iterator<Item = InterfaceType> + '_ {
        self.model_exchange
            .as_ref()
            .map(|_| InterfaceType::ModelExchange)
            .into_iter()
            .chain(self.co_simulation.as_ref().map(|_| InterfaceType::CoSimulation))
    }

    /// The `modelIdentifier` of the given interface, if the FMU implements it.
    pub fn model_identifier(&self, interface: InterfaceType) -> Option<&str> {
        match interface {
            InterfaceType::ModelExchange => self
                .model_exchange
                .as_ref()
                .map(|me| me.model_identifier.as_str()),
            InterfaceType::CoSimulation => self
                .co_simulation
                .as_ref()
                .map(|cs| cs.model_identifier.as_str()),
        }
    }

    /// All declared variables, regardless of their type.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.model_variables.iter()
    }

    /// Names of the variables with `causality="output"`.
    pub fn outputs(&self) -> impl Iterator<Item = &str> {
        self.variables()
            .filter(|var| var.causality == Causality::Output)
            .map(|var| var.name.as_str())
    }
}

impl FromStr for ModelDescription {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::deserialize(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterfaceType {
    ModelExchange,
    CoSimulation,
}

impl Display for InterfaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterfaceType::ModelExchange => write!(f, "ModelExchange"),
            InterfaceType::CoSimulation => write!(f, "CoSimulation"),
        }
    }
}

#[derive(Default, PartialEq, Debug, YaDeserialize)]
pub struct ModelExchange {
    /// Short class name according to C-syntax
    #[yaserde(attribute = true, rename = "modelIdentifier")]
    pub model_identifier: String,
}

#[derive(Default, PartialEq, Debug, YaDeserialize)]
pub struct CoSimulation {
    /// Short class name according to C-syntax
    #[yaserde(attribute = true, rename = "modelIdentifier")]
    pub model_identifier: String,
}

#[derive(Default, PartialEq, Debug, YaDeserialize)]
pub struct DefaultExperiment {
    #[yaserde(attribute = true, rename = "startTime")]
    pub start_time: Option<f64>,
    #[yaserde(attribute = true, rename = "stopTime")]
    pub stop_time: Option<f64>,
    #[yaserde(attribute = true)]
    pub tolerance: Option<f64>,
    #[yaserde(attribute = true, rename = "stepSize")]
    pub step_size: Option<f64>,
}

/// FMI 2.0 lists every variable as a `ScalarVariable`, FMI 3.0 uses one element per type.
#[derive(Default, PartialEq, Debug, YaDeserialize)]
pub struct ModelVariables {
    #[yaserde(rename = "ScalarVariable")]
    pub scalar: Vec<Variable>,
    #[yaserde(rename = "Float64")]
    pub float64: Vec<Variable>,
    #[yaserde(rename = "Float32")]
    pub float32: Vec<Variable>,
    #[yaserde(rename = "Int32")]
    pub int32: Vec<Variable>,
    #[yaserde(rename = "Int64")]
    pub int64: Vec<Variable>,
    #[yaserde(rename = "Boolean")]
    pub boolean: Vec<Variable>,
}

impl ModelVariables {
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.scalar
            .iter()
            .chain(&self.float64)
            .chain(&self.float32)
            .chain(&self.int32)
            .chain(&self.int64)
            .chain(&self.boolean)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

#[derive(Default, PartialEq, Debug, YaDeserialize)]
pub struct Variable {
    #[yaserde(attribute = true)]
    pub name: String,
    #[yaserde(attribute = true, rename = "valueReference")]
    pub value_reference: u32,
    #[yaserde(attribute = true)]
    pub causality: Causality,
    #[yaserde(attribute = true)]
    pub description: Option<String>,
}

#[derive(Clone, Default, PartialEq, Debug, YaDeserialize)]
pub enum Causality {
    #[yaserde(rename = "parameter")]
    Parameter,
    #[yaserde(rename = "calculatedParameter")]
    CalculatedParameter,
    #[yaserde(rename = "structuralParameter")]
    StructuralParameter,
    #[yaserde(rename = "input")]
    Input,
    #[yaserde(rename = "output")]
    Output,
    #[default]
    #[yaserde(rename = "local")]
    Local,
    #[yaserde(rename = "independent")]
    Independent,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FMI2_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<fmiModelDescription
  fmiVersion="2.0"
  modelName="HelloWorld"
  guid="{8c4e810f-3df3-4a00-8276-176fa3c9f003}"
  generationTool="OpenModelica Compiler"
  numberOfEventIndicators="0">
  <ModelExchange modelIdentifier="HelloWorld">
    <SourceFiles>
      <File name="HelloWorld.c"/>
    </SourceFiles>
  </ModelExchange>
  <DefaultExperiment startTime="0.0" stopTime="5.0" tolerance="1e-06" stepSize="0.01"/>
  <ModelVariables>
    <ScalarVariable name="x" valueReference="0" causality="output">
      <Real start="1.0"/>
    </ScalarVariable>
    <ScalarVariable name="der(x)" valueReference="1">
      <Real derivative="1"/>
    </ScalarVariable>
    <ScalarVariable name="a" valueReference="2" causality="parameter">
      <Real start="-1.0"/>
    </ScalarVariable>
  </ModelVariables>
  <ModelStructure>
    <Outputs>
      <Unknown index="1"/>
    </Outputs>
  </ModelStructure>
</fmiModelDescription>"#;

    const FMI3_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<fmiModelDescription
  fmiVersion="3.0"
  modelName="BouncingBall"
  instantiationToken="{1AE5E10D-9521-4DE3-80B9-D0EAAA7D5AF1}">
  <ModelExchange modelIdentifier="BouncingBall"/>
  <CoSimulation modelIdentifier="BouncingBall" canHandleVariableCommunicationStepSize="true"/>
  <DefaultExperiment startTime="0" stopTime="3" stepSize="0.01"/>
  <ModelVariables>
    <Float64 name="time" valueReference="0" causality="independent" variability="continuous"/>
    <Float64 name="h" valueReference="1" causality="output" variability="continuous" start="1"/>
    <Float64 name="v" valueReference="3" causality="output" variability="continuous" start="0"/>
    <Float64 name="g" valueReference="5" causality="parameter" variability="fixed" start="-9.81"/>
  </ModelVariables>
  <ModelStructure>
    <Output valueReference="1"/>
    <Output valueReference="3"/>
  </ModelStructure>
</fmiModelDescription>"#;

    #[test]
    fn test_fmi2() {
        let md = ModelDescription::from_str(FMI2_XML).unwrap();
        assert_eq!(md.major_version().unwrap(), MajorVersion::FMI2);
        assert_eq!(md.model_name, "HelloWorld");
        assert_eq!(
            md.guid.as_deref(),
            Some("{8c4e810f-3df3-4a00-8276-176fa3c9f003}")
        );
        assert_eq!(md.interfaces().collect::<Vec<_>>(), [InterfaceType::ModelExchange]);
        assert_eq!(
            md.model_identifier(InterfaceType::ModelExchange),
            Some("HelloWorld")
        );
        assert_eq!(md.model_identifier(InterfaceType::CoSimulation), None);

        let de = md.default_experiment.as_ref().unwrap();
        assert_eq!(de.stop_time, Some(5.0));
        assert_eq!(de.step_size, Some(0.01));

        assert_eq!(md.model_variables.len(), 3);
        assert_eq!(md.outputs().collect::<Vec<_>>(), ["x"]);
        assert_eq!(md.model_variables.scalar[1].causality, Causality::Local);
    }

    #[test]
    fn test_fmi3() {
        let md = ModelDescription::from_str(FMI3_XML).unwrap();
        assert_eq!(md.major_version().unwrap(), MajorVersion::FMI3);
        assert_eq!(md.guid, None);
        assert!(md.instantiation_token.is_some());
        assert_eq!(
            md.interfaces().collect::<Vec<_>>(),
            [InterfaceType::ModelExchange, InterfaceType::CoSimulation]
        );
        assert_eq!(md.model_variables.float64.len(), 4);
        assert_eq!(md.outputs().collect::<Vec<_>>(), ["h", "v"]);
        assert_eq!(
            md.default_experiment.and_then(|de| de.tolerance),
            None
        );
    }
}
