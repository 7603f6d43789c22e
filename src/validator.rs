use crate::error::ValidationError;
use crate::reader::{Event, Reader};
use crate::value::ValueKind;
use log::debug;
use std::collections::{HashMap, HashSet};

/// Marks the document root in a rule's container list.
pub const ROOT_CONTAINER: &str = "/";

/// The value kinds accepted at one parameter position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParameterRule {
    pub number: bool,
    pub text: bool,
    pub group: bool,
}

impl ParameterRule {
    pub fn allows(&self, kind: ValueKind) -> bool {
        match kind {
            ValueKind::Number => self.number,
            ValueKind::Text => self.text,
            ValueKind::Group => self.group,
            ValueKind::Empty => false,
        }
    }
}

/// Everything an element with a given tag may contain and be contained by.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementRules {
    pub parameters: Vec<ParameterRule>,
    /// Leading parameters that must be present; the rest are optional.
    pub required: usize,
    pub containers: HashSet<String>,
    pub attributes: HashSet<String>,
}

/// A per-tag schema checked against reader events as they are produced.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: HashMap<String, ElementRules>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the rules for `tag`, replacing any earlier ones.
    ///
    /// - `parameters`: comma-separated positions, each a `|`-union of
    ///   `number`/`int`/`float`, `string`/`text` and `group`/`array`. A `?`
    ///   in front of a position makes it and every later position optional.
    /// - `containers`: comma-separated parent tags, `/` for the document root.
    /// - `attributes`: comma-separated attribute keys the element accepts.
    ///
    /// ```
    /// use info_markup::validator::Validator;
    ///
    /// let mut validator = Validator::new();
    /// validator
    ///     .set_element_rules("move", "text, ?number|text", "/", "anim, speed")
    ///     .unwrap();
    /// assert!(validator.has_rules("Move"));
    /// ```
    pub fn set_element_rules(
        &mut self,
        tag: &str,
        parameters: &str,
        containers: &str,
        attributes: &str,
    ) -> Result<(), ValidationError> {
        let tag = tag.trim().to_lowercase();
        let (parameters, required) = parse_parameter_rules(&tag, parameters)?;

        let rules = ElementRules {
            parameters,
            required,
            containers: split_list(containers),
            attributes: split_list(attributes),
        };
        debug!(
            "rules for [{}]: {} parameter(s), {} required",
            tag,
            rules.parameters.len(),
            rules.required
        );
        self.rules.insert(tag, rules);
        Ok(())
    }

    pub fn has_rules(&self, tag: &str) -> bool {
        self.rules.contains_key(&tag.to_lowercase())
    }

    pub fn rules(&self, tag: &str) -> Option<&ElementRules> {
        self.rules.get(&tag.to_lowercase())
    }

    /// Checks the reader's current event.
    pub fn validate<R>(&self, reader: &Reader<R>) -> Result<(), ValidationError> {
        match reader.event() {
            Event::ElementStart => self.validate_element(reader),
            Event::Attribute => self.validate_attribute(reader),
            Event::None | Event::ElementClose | Event::Option => Ok(()),
        }
    }

    fn validate_element<R>(&self, reader: &Reader<R>) -> Result<(), ValidationError> {
        let tag = reader.tag();
        let rules = self
            .rules
            .get(tag)
            .ok_or_else(|| ValidationError::UnknownElement {
                tag: tag.to_string(),
            })?;

        match reader.parent_tag() {
            None if !rules.containers.contains(ROOT_CONTAINER) => {
                return Err(ValidationError::TopLevelNotAllowed {
                    tag: tag.to_string(),
                });
            }
            Some(parent) if !rules.containers.contains(parent) => {
                return Err(ValidationError::ParentNotAllowed {
                    tag: tag.to_string(),
                    parent: parent.to_string(),
                });
            }
            _ => {}
        }

        let found = reader.parameter_count();
        if found < rules.required || found > rules.parameters.len() {
            return Err(ValidationError::ParameterCount {
                tag: tag.to_string(),
                min: rules.required,
                max: rules.parameters.len(),
                found,
            });
        }

        for (index, rule) in rules.parameters.iter().enumerate().take(found) {
            let allowed = reader
                .parameter_kind(index)
                .is_some_and(|kind| rule.allows(kind));
            if !allowed {
                return Err(ValidationError::ParameterType {
                    tag: tag.to_string(),
                    index,
                });
            }
        }

        Ok(())
    }

    /// Attributes are only checked inside elements that have rules.
    fn validate_attribute<R>(&self, reader: &Reader<R>) -> Result<(), ValidationError> {
        if reader.scope_count() == 0 {
            return Ok(());
        }
        let Some(rules) = self.rules.get(reader.tag()) else {
            return Ok(());
        };

        let key = reader.key().unwrap_or_default();
        if rules.attributes.contains(key) {
            Ok(())
        } else {
            Err(ValidationError::AttributeNotAllowed {
                key: key.to_string(),
                tag: reader.tag().to_string(),
            })
        }
    }
}

fn split_list(list: &str) -> HashSet<String> {
    list.split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_parameter_rules(
    tag: &str,
    parameters: &str,
) -> Result<(Vec<ParameterRule>, usize), ValidationError> {
    if parameters.trim().is_empty() {
        return Ok((Vec::new(), 0));
    }

    let mut rules = Vec::new();
    let mut required = None;

    for (index, position) in parameters.split(',').enumerate() {
        let mut position = position.trim();
        if let Some(rest) = position.strip_prefix('?') {
            position = rest;
            required.get_or_insert(index);
        }

        let mut rule = ParameterRule::default();
        for token in position.split('|') {
            match token.trim().to_lowercase().as_str() {
                "number" | "int" | "float" => rule.number = true,
                "string" | "text" => rule.text = true,
                "group" | "array" => rule.group = true,
                other => {
                    return Err(ValidationError::UnknownParameterType {
                        tag: tag.to_string(),
                        token: other.to_string(),
                    })
                }
            }
        }
        rules.push(rule);
    }

    let required = required.unwrap_or(rules.len());
    Ok((rules, required))
}
