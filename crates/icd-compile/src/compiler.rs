#![deny(unsafe_code)]

//! The ICD compiler: a single pass over rows of cells, dispatching on the
//! leading tag of each row.
//!
//! | Tag | Meaning |
//! |-----|--------------------------------------------------------------|
//! | `d` | data format; the first occurrence creates it, later rows set properties |
//! | `f` | field definition, materialized through the type registry |
//! | `c` | check definition, materialized through the type registry |
//! | blank | ignored |
//!
//! Any violation aborts compilation of the whole document with an error
//! located at the offending cell; a schema with a structural defect must
//! never be used for data validation.

use tracing::debug;

use icd_model::{DataFormat, IcdError, Location, Result, SeeAlso, validated_identifier};

use crate::registry::{CHECK_SUFFIX, TypeRegistry};
use crate::schema::{CheckDefinition, FieldDefinition, Schema};

/// Cell content marking a field as allowed to be empty.
const EMPTY_INDICATOR: &str = "x";

/// Field type used when a field definition row leaves the type cell blank.
const DEFAULT_FIELD_TYPE: &str = "Text";

/// Number of data cells every row is padded to, so that optional trailing
/// columns default uniformly.
const ROW_CELL_COUNT: usize = 6;

/// Compiles ICD rows into a [`Schema`] using the factories of a
/// [`TypeRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct Compiler<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> Compiler<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Compile the given rows, reporting `path` in every diagnostic.
    pub fn compile<I>(&self, path: &str, rows: I) -> Result<Schema>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut schema = Schema::new();
        let mut location = Location::new(path);

        for row in rows {
            if let Some((tag, data_cells)) = row.split_first() {
                let tag = tag.trim().to_lowercase();
                let padded = padded_cells(data_cells);
                match tag.as_str() {
                    "d" => self.data_format_row(&mut schema, &padded, &mut location)?,
                    "f" => self.field_row(&mut schema, data_cells, &padded, &mut location)?,
                    "c" => self.check_row(&mut schema, data_cells, &padded, &mut location)?,
                    "" => {}
                    other => {
                        return Err(IcdError::structure(
                            format!(
                                "ICD row tag is {other:?} but must be empty or one of: c, d or f"
                            ),
                            &location,
                        ));
                    }
                }
            }
            location.advance_line();
        }

        debug!(
            path,
            field_count = schema.fields().len(),
            check_count = schema.check_descriptions().len(),
            "compiled ICD"
        );
        Ok(schema)
    }

    fn data_format_row(
        &self,
        schema: &mut Schema,
        cells: &[String],
        location: &mut Location,
    ) -> Result<()> {
        let name = cells[0].trim();
        let value = cells[1].trim();

        location.advance_cell();
        if name.is_empty() {
            return Err(IcdError::structure(
                "name of data format property must be specified",
                location,
            ));
        }
        location.advance_cell();
        match schema.data_format_mut() {
            None => {
                let data_format = DataFormat::new(value)
                    .map_err(|error| IcdError::structure(error.to_string(), location))?;
                debug!(format = %data_format.format(), "created data format");
                schema.set_data_format(data_format);
            }
            Some(data_format) => {
                data_format
                    .set_property(name, value)
                    .map_err(|error| IcdError::structure(error.to_string(), location))?;
            }
        }
        Ok(())
    }

    fn field_row(
        &self,
        schema: &mut Schema,
        raw_cells: &[String],
        cells: &[String],
        location: &mut Location,
    ) -> Result<()> {
        if raw_cells.is_empty() {
            return Err(IcdError::field_definition(
                "field definition row (marked with \"f\") must at least contain a field name",
                location,
            ));
        }
        let Some(data_format) = schema.data_format() else {
            return Err(IcdError::structure(
                "data format must be specified before the first field",
                location,
            ));
        };
        let is_fixed = data_format.is_fixed();

        // Cell 1: field name.
        location.advance_cell();
        let field_name = validated_identifier("field name", &cells[0])
            .map_err(|error| IcdError::field_definition(error.to_string(), location))?;

        // Cell 2: optional example, validated once the format exists.
        location.advance_cell();
        let example = cells[1].clone();

        // Cell 3: optional empty flag.
        location.advance_cell();
        let empty_flag = cells[2].trim().to_lowercase();
        let allow_empty = match empty_flag.as_str() {
            "" => false,
            EMPTY_INDICATOR => true,
            other => {
                return Err(IcdError::field_definition(
                    format!(
                        "mark for empty field must be {EMPTY_INDICATOR:?} or empty \
                         but is: {other:?}"
                    ),
                    location,
                ));
            }
        };

        // Cell 4: optional length, interpreted by the field format itself.
        location.advance_cell();
        let length_text = cells[3].trim().to_string();

        // Cell 5: optional dot-qualified field type.
        location.advance_cell();
        let type_text = cells[4].trim();
        let type_name = if type_text.is_empty() {
            DEFAULT_FIELD_TYPE.to_string()
        } else {
            let mut validated_parts = Vec::new();
            for part in type_text.split('.') {
                let part = validated_identifier("field type part", part)
                    .map_err(|error| IcdError::field_definition(error.to_string(), location))?;
                validated_parts.push(part);
            }
            validated_parts.join(".")
        };

        // Cell 6: optional rule, passed opaquely to the factory.
        location.advance_cell();
        let rule = cells[5].trim().to_string();

        location.set_cell(5);
        let factory = self
            .registry
            .resolve_field_format(&type_name)
            .map_err(|error| IcdError::field_definition(error.to_string(), location))?;
        debug!(field = %field_name, field_type = %type_name, rule = %rule, "create field format");
        let format = factory(&field_name, allow_empty, &length_text, &rule, data_format)
            .map_err(|error| IcdError::field_definition(error.to_string(), location))?;

        if schema.has_field(&field_name) {
            location.set_cell(1);
            return Err(IcdError::field_definition(
                format!("field name must be used for only one field: {field_name}"),
                location,
            ));
        }

        if !example.is_empty() {
            // Under fixed format, data values reach the formats padded to the
            // field width; examples are written unpadded in the ICD.
            let example_value = match format.length().single_value() {
                Some(width) if is_fixed && width >= 1 => {
                    padded_to_width(&example, width as usize)
                }
                _ => example.clone(),
            };
            if let Err(error) = format.validated(&example_value) {
                location.set_cell(2);
                return Err(IcdError::field_definition(
                    format!("cannot validate example for field {field_name:?}: {error}"),
                    location,
                ));
            }
        }

        if is_fixed {
            location.set_cell(4);
            let length = format.length();
            if length.is_unbounded() {
                return Err(IcdError::field_definition(
                    format!("length of field {field_name:?} must be specified with fixed data format"),
                    location,
                ));
            }
            match length.single_value() {
                Some(value) if value >= 1 => {}
                Some(value) => {
                    return Err(IcdError::field_definition(
                        format!(
                            "length of field {field_name:?} for fixed data format must be \
                             at least 1 but is: {value}"
                        ),
                        location,
                    ));
                }
                None => {
                    return Err(IcdError::field_definition(
                        format!(
                            "length of field {field_name:?} for fixed data format must be \
                             a single value but is: {length}"
                        ),
                        location,
                    ));
                }
            }
        }

        location.set_cell(1);
        debug!(%location, field = %field_name, "defined field");
        schema.add_field(FieldDefinition::new(
            field_name,
            if example.is_empty() { None } else { Some(example) },
            allow_empty,
            length_text,
            type_name,
            rule,
            format,
        ));
        Ok(())
    }

    fn check_row(
        &self,
        schema: &mut Schema,
        raw_cells: &[String],
        cells: &[String],
        location: &mut Location,
    ) -> Result<()> {
        if raw_cells.len() < 2 {
            return Err(IcdError::check_definition(
                "check definition row (marked with \"c\") must contain at least 2 columns",
                location,
                None,
            ));
        }

        location.advance_cell();
        let description = cells[0].clone();

        // The description may span several otherwise-blank cells; scan for
        // the last cell whose value resolves as a check type.
        let mut check_type: Option<&str> = None;
        let mut rule_index = 2;
        for (index, cell) in cells.iter().enumerate().skip(1) {
            let candidate = cell.trim();
            if !candidate.is_empty() && self.registry.has_check(&format!("{candidate}{CHECK_SUFFIX}"))
            {
                check_type = Some(candidate);
                rule_index = index + 1;
            }
        }
        let Some(check_type) = check_type else {
            let mut names = self.registry.check_names();
            names.sort();
            return Err(IcdError::check_definition(
                format!(
                    "check type must be one of: {} but no column of the check row \
                     matches",
                    icd_model::human_readable_join(&names)
                ),
                location,
                None,
            ));
        };
        // Only the column directly after the type is honored as the rule.
        let rule = cells
            .get(rule_index)
            .map(|cell| cell.trim().to_string())
            .unwrap_or_default();

        location.set_cell(1);
        let field_names = schema.field_names();
        let factory = self
            .registry
            .resolve_check(check_type)
            .map_err(|error| IcdError::check_definition(error.to_string(), location, None))?;
        debug!(check = %description, check_type = %check_type, rule = %rule, "create check");
        let check = factory(&description, &rule, &field_names, location)
            .map_err(|error| IcdError::check_definition(error.to_string(), location, None))?;

        if let Some(existing) = schema.check_definition(&description) {
            return Err(IcdError::check_definition(
                format!("check description must be used only once: {description:?}"),
                location,
                Some(SeeAlso::new("initial declaration", existing.location())),
            ));
        }

        debug!(%location, check = %description, "defined check");
        schema.add_check(CheckDefinition::new(
            description,
            check_type.to_string(),
            rule,
            field_names,
            location.clone(),
            factory,
            check,
        ));
        Ok(())
    }
}

/// The data cells of a row, right-padded (and clipped) to the fixed cell
/// count so that optional trailing columns default to empty.
fn padded_cells(cells: &[String]) -> Vec<String> {
    let mut padded: Vec<String> = cells.iter().take(ROW_CELL_COUNT).cloned().collect();
    padded.resize(ROW_CELL_COUNT, String::new());
    padded
}

/// Right-pad `value` with spaces to `width` characters.
fn padded_to_width(value: &str, width: usize) -> String {
    let mut padded = value.to_string();
    let mut count = value.chars().count();
    while count < width {
        padded.push(' ');
        count += 1;
    }
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_fills_and_clips_to_six_cells() {
        assert_eq!(padded_cells(&[]).len(), ROW_CELL_COUNT);
        let long: Vec<String> = (0..9).map(|index| index.to_string()).collect();
        let padded = padded_cells(&long);
        assert_eq!(padded.len(), ROW_CELL_COUNT);
        assert_eq!(padded[5], "5");
    }
}
