use std::collections::BTreeMap;
use std::sync::OnceLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;

/// Parsed parameter-definition document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterDefinition {
    pub auto_submit: Option<bool>,
    pub auto_submit_ui: Option<bool>,
    pub paginate: bool,
    pub page_count: Option<u32>,
    pub accepted_page: Option<i64>,
    pub parameters: Vec<ParameterInfo>,
    pub errors: Vec<DefinitionFault>,
}

impl ParameterDefinition {
    /// Whether the server may skip the parameter form and go straight to
    /// full content. `autoSubmit` wins over the UI default when present.
    pub fn allow_auto_submit(&self) -> bool {
        self.auto_submit.or(self.auto_submit_ui).unwrap_or(false)
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterInfo> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// One prompt parameter described by the definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterInfo {
    pub name: String,
    pub parameter_type: Option<String>,
    pub mandatory: bool,
    pub attributes: BTreeMap<String, String>,
    pub values: Vec<ParameterValue>,
}

/// One selectable value of a list parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterValue {
    pub label: Option<String>,
    pub value: String,
    pub selected: bool,
}

/// Validation error reported inside the definition document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionFault {
    /// Parameter the error refers to, or `None` for a global error.
    pub parameter: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("malformed parameter xml: {0}")]
    Xml(String),
    #[error("document has no <parameters> root")]
    MissingRoot,
}

/// Strips the illegal numeric character entities `&#00;` through `&#31;`
/// that some data sources leak into the definition document.
pub fn scrub_control_entities(input: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"&#(?:[0-9]|[0-2][0-9]|3[01]);").expect("static pattern"));
    pattern.replace_all(input, "").into_owned()
}

/// Parses a parameter-definition document, scrubbing control entities first.
pub fn parse_parameter_definition(xml: &str) -> Result<ParameterDefinition, DefinitionError> {
    let xml = scrub_control_entities(xml);
    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut definition: Option<ParameterDefinition> = None;
    let mut parameter: Option<ParameterInfo> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                match element.name().as_ref() {
                    b"parameters" => {
                        definition = Some(read_root(&element)?);
                    }
                    b"parameter" => {
                        let info = read_parameter(&element)?;
                        let Some(definition) = definition.as_mut() else {
                            return Err(DefinitionError::MissingRoot);
                        };
                        // A new <parameter> closes any still-open one.
                        if let Some(previous) = parameter.replace(info) {
                            definition.parameters.push(previous);
                        }
                    }
                    b"attribute" => {
                        if let Some(parameter) = parameter.as_mut() {
                            let (name, value) = read_attribute(&element)?;
                            parameter.attributes.insert(name, value);
                        }
                    }
                    b"value" => {
                        if let Some(parameter) = parameter.as_mut() {
                            parameter.values.push(read_value(&element)?);
                        }
                    }
                    b"error" | b"global-error" => {
                        if let Some(definition) = definition.as_mut() {
                            definition.errors.push(read_fault(&element)?);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(element)) => {
                if element.name().as_ref() == b"parameter" {
                    if let (Some(definition), Some(info)) =
                        (definition.as_mut(), parameter.take())
                    {
                        definition.parameters.push(info);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(DefinitionError::Xml(err.to_string())),
        }
    }

    let mut definition = definition.ok_or(DefinitionError::MissingRoot)?;
    if let Some(info) = parameter.take() {
        definition.parameters.push(info);
    }
    Ok(definition)
}

fn read_root(element: &BytesStart<'_>) -> Result<ParameterDefinition, DefinitionError> {
    let mut definition = ParameterDefinition::default();
    for (name, value) in attributes_of(element)? {
        match name.as_str() {
            "autoSubmit" => definition.auto_submit = Some(value == "true"),
            "autoSubmitUI" => definition.auto_submit_ui = Some(value == "true"),
            "is-paginate" | "paginate" => definition.paginate = value == "true",
            "page-count" => definition.page_count = value.parse().ok(),
            "accepted-page" => definition.accepted_page = value.parse().ok(),
            _ => {}
        }
    }
    Ok(definition)
}

fn read_parameter(element: &BytesStart<'_>) -> Result<ParameterInfo, DefinitionError> {
    let mut info = ParameterInfo::default();
    for (name, value) in attributes_of(element)? {
        match name.as_str() {
            "name" => info.name = value,
            "type" => info.parameter_type = Some(value),
            "is-mandatory" => info.mandatory = value == "true",
            _ => {}
        }
    }
    Ok(info)
}

fn read_attribute(element: &BytesStart<'_>) -> Result<(String, String), DefinitionError> {
    let mut name = String::new();
    let mut value = String::new();
    for (attr_name, attr_value) in attributes_of(element)? {
        match attr_name.as_str() {
            "name" => name = attr_value,
            "value" => value = attr_value,
            _ => {}
        }
    }
    Ok((name, value))
}

fn read_value(element: &BytesStart<'_>) -> Result<ParameterValue, DefinitionError> {
    let mut parameter_value = ParameterValue::default();
    for (name, value) in attributes_of(element)? {
        match name.as_str() {
            "label" => parameter_value.label = Some(value),
            "value" => parameter_value.value = value,
            "selected" => parameter_value.selected = value == "true",
            _ => {}
        }
    }
    Ok(parameter_value)
}

fn read_fault(element: &BytesStart<'_>) -> Result<DefinitionFault, DefinitionError> {
    let mut parameter = None;
    let mut message = String::new();
    for (name, value) in attributes_of(element)? {
        match name.as_str() {
            "parameter" => parameter = Some(value),
            "message" => message = value,
            _ => {}
        }
    }
    Ok(DefinitionFault { parameter, message })
}

fn attributes_of(element: &BytesStart<'_>) -> Result<Vec<(String, String)>, DefinitionError> {
    let mut pairs = Vec::new();
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|err| DefinitionError::Xml(err.to_string()))?;
        let name = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|err| DefinitionError::Xml(err.to_string()))?
            .into_owned();
        pairs.push((name, value));
    }
    Ok(pairs)
}
