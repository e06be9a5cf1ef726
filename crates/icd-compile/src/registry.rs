#![deny(unsafe_code)]

use std::collections::BTreeMap;

use icd_checks::{CheckFactory, DistinctCountCheck, IsUniqueCheck};
use icd_fields::{
    ChoiceFieldFormat, ConstantFieldFormat, DateTimeFieldFormat, DecimalFieldFormat,
    FieldFormatFactory, IntegerFieldFormat, PatternFieldFormat, RegexFieldFormat, TextFieldFormat,
};
use icd_model::{IcdError, Result, SyntaxError, human_readable_join};

/// Suffix every field format identifier must carry.
pub const FIELD_FORMAT_SUFFIX: &str = "FieldFormat";

/// Suffix every check identifier must carry.
pub const CHECK_SUFFIX: &str = "Check";

/// One capability family: identifier-with-suffix mapped to its factory.
#[derive(Debug, Clone)]
struct FactoryMap<F: Copy + PartialEq> {
    kind: &'static str,
    suffix: &'static str,
    entries: BTreeMap<String, F>,
}

impl<F: Copy + PartialEq> FactoryMap<F> {
    fn new(kind: &'static str, suffix: &'static str) -> Self {
        Self {
            kind,
            suffix,
            entries: BTreeMap::new(),
        }
    }

    fn register(&mut self, identifier: &str, factory: F) -> Result<()> {
        let stem_is_empty = match identifier.strip_suffix(self.suffix) {
            Some(stem) => stem.is_empty(),
            None => true,
        };
        if stem_is_empty {
            return Err(IcdError::configuration(format!(
                "{} identifier {identifier:?} must consist of a name followed by \
                 the suffix {:?}",
                self.kind, self.suffix
            )));
        }
        if let Some(existing) = self.entries.get(identifier) {
            // Re-registering the very same factory happens when plugin
            // loading runs more than once in a process and is a no-op.
            if *existing == factory {
                return Ok(());
            }
            return Err(IcdError::configuration(format!(
                "clashing {} names must be resolved: {identifier:?} is already \
                 registered with a different implementation",
                self.kind
            )));
        }
        self.entries.insert(identifier.to_string(), factory);
        Ok(())
    }

    fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Resolve a possibly dot-qualified type qualifier: only the final
    /// segment matters, the suffix is appended before lookup.
    fn resolve(&self, qualifier: &str) -> std::result::Result<F, SyntaxError> {
        let plain = qualifier.rsplit('.').next().unwrap_or(qualifier);
        let identifier = format!("{plain}{}", self.suffix);
        self.entries.get(&identifier).copied().ok_or_else(|| {
            SyntaxError::new(format!(
                "cannot find implementation for {} type {qualifier:?}: related name \
                 is {identifier:?} but must be one of: {}",
                self.kind,
                human_readable_join(&self.names())
            ))
        })
    }
}

/// Maps logical type names to field format and check factories.
///
/// Populated explicitly at process start from the built-in set; extensions
/// append entries into the same maps. Registering the same factory twice
/// under one name is tolerated, two distinct factories under one name are a
/// fatal configuration error.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    field_formats: FactoryMap<FieldFormatFactory>,
    checks: FactoryMap<CheckFactory>,
}

impl TypeRegistry {
    /// An empty registry without any providers.
    pub fn new() -> Self {
        Self {
            field_formats: FactoryMap::new("field", FIELD_FORMAT_SUFFIX),
            checks: FactoryMap::new("check", CHECK_SUFFIX),
        }
    }

    /// A registry with all built-in field formats and checks.
    pub fn built_in() -> Self {
        let mut registry = Self::new();
        registry
            .register_built_ins()
            .expect("built-in providers must not clash");
        registry
    }

    fn register_built_ins(&mut self) -> Result<()> {
        self.register_field_format("ChoiceFieldFormat", ChoiceFieldFormat::from_row)?;
        self.register_field_format("ConstantFieldFormat", ConstantFieldFormat::from_row)?;
        self.register_field_format("DateTimeFieldFormat", DateTimeFieldFormat::from_row)?;
        self.register_field_format("DecimalFieldFormat", DecimalFieldFormat::from_row)?;
        self.register_field_format("IntegerFieldFormat", IntegerFieldFormat::from_row)?;
        self.register_field_format("PatternFieldFormat", PatternFieldFormat::from_row)?;
        self.register_field_format("RegexFieldFormat", RegexFieldFormat::from_row)?;
        self.register_field_format("TextFieldFormat", TextFieldFormat::from_row)?;

        self.register_check("DistinctCountCheck", DistinctCountCheck::from_row)?;
        self.register_check("IsUniqueCheck", IsUniqueCheck::from_row)?;
        Ok(())
    }

    pub fn register_field_format(
        &mut self,
        identifier: &str,
        factory: FieldFormatFactory,
    ) -> Result<()> {
        self.field_formats.register(identifier, factory)
    }

    pub fn register_check(&mut self, identifier: &str, factory: CheckFactory) -> Result<()> {
        self.checks.register(identifier, factory)
    }

    pub fn resolve_field_format(
        &self,
        qualifier: &str,
    ) -> std::result::Result<FieldFormatFactory, SyntaxError> {
        self.field_formats.resolve(qualifier)
    }

    pub fn resolve_check(&self, qualifier: &str) -> std::result::Result<CheckFactory, SyntaxError> {
        self.checks.resolve(qualifier)
    }

    /// True when `identifier` (including suffix) names a registered check.
    pub fn has_check(&self, identifier: &str) -> bool {
        self.checks.contains(identifier)
    }

    pub fn field_format_names(&self) -> Vec<String> {
        self.field_formats.names()
    }

    pub fn check_names(&self) -> Vec<String> {
        self.checks.names()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::built_in()
    }
}
