use std::collections::{BTreeMap, BTreeSet};

use icd_model::{Location, parse_choices};

use crate::{Check, CheckError, CheckSyntaxError, known_field};

/// Rejects rows whose combination of key field values has occurred before.
///
/// The rule is a comma-separated list of field names forming the key.
#[derive(Debug)]
pub struct IsUniqueCheck {
    description: String,
    rule: String,
    key_field_names: Vec<String>,
    location: Location,
    seen_keys: BTreeSet<Vec<String>>,
}

impl IsUniqueCheck {
    pub fn new(
        description: &str,
        rule: &str,
        field_names: &[String],
        location: &Location,
    ) -> Result<Self, CheckSyntaxError> {
        let key_names = parse_choices(rule).map_err(|error| {
            CheckSyntaxError::new(format!("rule of check {description:?} is broken: {error}"))
        })?;
        if key_names.is_empty() {
            return Err(CheckSyntaxError::new(format!(
                "rule of check {description:?} must contain one or more field names"
            )));
        }
        let mut key_field_names = Vec::with_capacity(key_names.len());
        for name in &key_names {
            key_field_names.push(known_field(name, field_names, description)?);
        }
        Ok(Self {
            description: description.to_string(),
            rule: rule.to_string(),
            key_field_names,
            location: location.clone(),
            seen_keys: BTreeSet::new(),
        })
    }

    pub fn from_row(
        description: &str,
        rule: &str,
        field_names: &[String],
        location: &Location,
    ) -> Result<Box<dyn Check>, CheckSyntaxError> {
        Ok(Box::new(Self::new(description, rule, field_names, location)?))
    }
}

impl Check for IsUniqueCheck {
    fn description(&self) -> &str {
        &self.description
    }

    fn rule(&self) -> &str {
        &self.rule
    }

    fn location(&self) -> &Location {
        &self.location
    }

    fn check_row(
        &mut self,
        row: &BTreeMap<String, String>,
        _location: &Location,
    ) -> Result<(), CheckError> {
        let key: Vec<String> = self
            .key_field_names
            .iter()
            .map(|name| row.get(name).cloned().unwrap_or_default())
            .collect();
        if !self.seen_keys.insert(key.clone()) {
            return Err(CheckError::new(format!(
                "unique key ({}) has already occurred: ({})",
                self.key_field_names.join(", "),
                key.join(", ")
            )));
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.seen_keys.clear();
    }
}
