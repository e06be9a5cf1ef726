#![deny(unsafe_code)]

use std::collections::BTreeMap;

use icd_checks::{Check, CheckFactory};
use icd_fields::FieldFormat;
use icd_model::{DataFormat, IcdError, Location, Result, human_readable_join};

/// One declared column: its raw row parts plus the compiled field format.
#[derive(Debug)]
pub struct FieldDefinition {
    name: String,
    example: Option<String>,
    allow_empty: bool,
    length_text: String,
    type_name: String,
    rule: String,
    format: Box<dyn FieldFormat>,
}

impl FieldDefinition {
    pub(crate) fn new(
        name: String,
        example: Option<String>,
        allow_empty: bool,
        length_text: String,
        type_name: String,
        rule: String,
        format: Box<dyn FieldFormat>,
    ) -> Self {
        Self {
            name,
            example,
            allow_empty,
            length_text,
            type_name,
            rule,
            format,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }

    pub fn is_allow_empty(&self) -> bool {
        self.allow_empty
    }

    pub fn length_text(&self) -> &str {
        &self.length_text
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn format(&self) -> &dyn FieldFormat {
        self.format.as_ref()
    }
}

/// One declared check: its row parts, declaration location and the compiled
/// check instance.
#[derive(Debug)]
pub struct CheckDefinition {
    description: String,
    type_name: String,
    rule: String,
    field_names: Vec<String>,
    location: Location,
    factory: CheckFactory,
    check: Box<dyn Check>,
}

impl CheckDefinition {
    pub(crate) fn new(
        description: String,
        type_name: String,
        rule: String,
        field_names: Vec<String>,
        location: Location,
        factory: CheckFactory,
        check: Box<dyn Check>,
    ) -> Self {
        Self {
            description,
            type_name,
            rule,
            field_names,
            location,
            factory,
            check,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// The field names that were defined when this check was declared.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn check(&self) -> &dyn Check {
        self.check.as_ref()
    }

    /// Build a fresh check instance with its own state, e.g. one per
    /// validation worker.
    pub fn instantiate(&self) -> Result<Box<dyn Check>> {
        (self.factory)(&self.description, &self.rule, &self.field_names, &self.location).map_err(
            |error| {
                IcdError::check_definition(error.to_string(), &self.location, None)
            },
        )
    }
}

/// The compiled result of one ICD: data format, ordered field definitions
/// and named checks.
///
/// A schema is created empty, mutated only while the compiler runs and is
/// read-only afterwards.
#[derive(Debug, Default)]
pub struct Schema {
    data_format: Option<DataFormat>,
    fields: Vec<FieldDefinition>,
    field_name_to_index: BTreeMap<String, usize>,
    check_descriptions: Vec<String>,
    checks: BTreeMap<String, CheckDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// The data format, `None` until the first data-format row has been seen.
    pub fn data_format(&self) -> Option<&DataFormat> {
        self.data_format.as_ref()
    }

    pub(crate) fn data_format_mut(&mut self) -> Option<&mut DataFormat> {
        self.data_format.as_mut()
    }

    pub(crate) fn set_data_format(&mut self, data_format: DataFormat) {
        self.data_format = Some(data_format);
    }

    /// Field definitions in declaration order.
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|field| field.name().to_string()).collect()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_name_to_index.contains_key(name)
    }

    /// Check descriptions in declaration order.
    pub fn check_descriptions(&self) -> &[String] {
        &self.check_descriptions
    }

    pub fn check_definitions(&self) -> impl Iterator<Item = &CheckDefinition> {
        self.check_descriptions
            .iter()
            .map(|description| &self.checks[description])
    }

    pub(crate) fn check_definition(&self, description: &str) -> Option<&CheckDefinition> {
        self.checks.get(description)
    }

    /// The positional index of the field named `name`, starting at 0.
    pub fn field_index(&self, name: &str) -> Result<usize> {
        self.field_name_to_index.get(name).copied().ok_or_else(|| {
            let mut names = self.field_names();
            names.sort();
            IcdError::lookup(format!(
                "unknown field name {name:?} must be replaced by one of: {}",
                human_readable_join(&names)
            ))
        })
    }

    /// The value for field `name` in `row`.
    ///
    /// `row` must contain exactly one value per declared field; a mismatch
    /// raises a value error pointing at the calling code, since no
    /// row-scoped location exists here.
    #[track_caller]
    pub fn field_value_for<'a>(&self, name: &str, row: &'a [String]) -> Result<&'a str> {
        let expected = self.fields.len();
        let actual = row.len();
        if actual != expected {
            return Err(IcdError::field_value(
                format!("row must have {expected} values but has {actual}: {row:?}"),
                &Location::caller(),
            ));
        }
        let index = self.field_index(name)?;
        Ok(&row[index])
    }

    /// The field format for `name`.
    ///
    /// # Panics
    ///
    /// Panics when no field `name` has been defined; post-compilation callers
    /// are expected to only pass known names.
    pub fn field_format_for(&self, name: &str) -> &dyn FieldFormat {
        let index = self.field_name_to_index[name];
        self.fields[index].format()
    }

    /// The field format at position `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of bounds.
    pub fn field_format_at(&self, index: usize) -> &dyn FieldFormat {
        self.fields[index].format()
    }

    /// The check declared under `description`.
    ///
    /// # Panics
    ///
    /// Panics when no check `description` has been defined.
    pub fn check_for(&self, description: &str) -> &dyn Check {
        self.checks[description].check()
    }

    /// Field names and widths for fixed-width reading; `None` unless the
    /// data format is fixed. The compiler guarantees single-value lengths
    /// for every field of a fixed schema.
    pub fn fixed_field_widths(&self) -> Option<Vec<(String, usize)>> {
        if !self.data_format()?.is_fixed() {
            return None;
        }
        let mut widths = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let width = field.format().length().single_value()?;
            widths.push((field.name().to_string(), usize::try_from(width).ok()?));
        }
        Some(widths)
    }

    pub(crate) fn add_field(&mut self, field: FieldDefinition) {
        self.field_name_to_index
            .insert(field.name().to_string(), self.fields.len());
        self.fields.push(field);
        self.assert_consistent();
    }

    pub(crate) fn add_check(&mut self, check: CheckDefinition) {
        self.check_descriptions.push(check.description().to_string());
        self.checks.insert(check.description().to_string(), check);
        debug_assert_eq!(self.check_descriptions.len(), self.checks.len());
    }

    /// The field bookkeeping must stay in lockstep after every mutation.
    fn assert_consistent(&self) {
        debug_assert_eq!(self.fields.len(), self.field_name_to_index.len());
        for (index, field) in self.fields.iter().enumerate() {
            debug_assert_eq!(self.field_name_to_index.get(field.name()), Some(&index));
        }
    }
}
