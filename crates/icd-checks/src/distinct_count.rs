use std::collections::{BTreeMap, BTreeSet};

use icd_model::{Location, Token, tokenize};

use crate::{Check, CheckError, CheckSyntaxError, known_field};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,
}

impl Comparison {
    fn parse(operator: &str) -> Option<Self> {
        match operator {
            "<" => Some(Self::Less),
            "<=" => Some(Self::LessOrEqual),
            ">" => Some(Self::Greater),
            ">=" => Some(Self::GreaterOrEqual),
            "==" => Some(Self::Equal),
            "!=" => Some(Self::NotEqual),
            _ => None,
        }
    }

    fn holds(self, actual: i64, limit: i64) -> bool {
        match self {
            Self::Less => actual < limit,
            Self::LessOrEqual => actual <= limit,
            Self::Greater => actual > limit,
            Self::GreaterOrEqual => actual >= limit,
            Self::Equal => actual == limit,
            Self::NotEqual => actual != limit,
        }
    }
}

/// At end of data, the number of distinct values of a field must satisfy a
/// comparison rule such as `branch_id < 10`.
#[derive(Debug)]
pub struct DistinctCountCheck {
    description: String,
    rule: String,
    field_name: String,
    comparison: Comparison,
    limit: i64,
    location: Location,
    distinct_values: BTreeSet<String>,
}

impl DistinctCountCheck {
    pub fn new(
        description: &str,
        rule: &str,
        field_names: &[String],
        location: &Location,
    ) -> Result<Self, CheckSyntaxError> {
        let tokens = tokenize(rule).map_err(|error| {
            CheckSyntaxError::new(format!("rule of check {description:?} is broken: {error}"))
        })?;
        let (field_name, comparison, limit) = match tokens.as_slice() {
            [Token::Name(field), Token::Operator(operator), Token::Number(limit)] => {
                let comparison = Comparison::parse(operator).ok_or_else(|| {
                    CheckSyntaxError::new(format!(
                        "operator of check {description:?} must be one of: \
                         <, <=, >, >=, == or != but is: {operator:?}"
                    ))
                })?;
                let limit: i64 = limit.parse().map_err(|_| {
                    CheckSyntaxError::new(format!(
                        "limit of check {description:?} must be an integer number \
                         but is: {limit:?}"
                    ))
                })?;
                (known_field(field, field_names, description)?, comparison, limit)
            }
            _ => {
                return Err(CheckSyntaxError::new(format!(
                    "rule of check {description:?} must have the form \
                     \"field operator limit\" but is: {rule:?}"
                )));
            }
        };
        Ok(Self {
            description: description.to_string(),
            rule: rule.to_string(),
            field_name,
            comparison,
            limit,
            location: location.clone(),
            distinct_values: BTreeSet::new(),
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

impl Check for DistinctCountCheck {
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
        if let Some(value) = row.get(&self.field_name) {
            self.distinct_values.insert(value.clone());
        }
        Ok(())
    }

    fn check_at_end(&mut self, _location: &Location) -> Result<(), CheckError> {
        let actual = self.distinct_values.len() as i64;
        if !self.comparison.holds(actual, self.limit) {
            return Err(CheckError::new(format!(
                "distinct count for field {:?} is {actual} but must satisfy: {}",
                self.field_name, self.rule
            )));
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.distinct_values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(value: &str) -> BTreeMap<String, String> {
        [("branch_id".to_string(), value.to_string())]
            .into_iter()
            .collect()
    }

    fn check(rule: &str) -> DistinctCountCheck {
        DistinctCountCheck::new(
            "few branches",
            rule,
            &["branch_id".to_string()],
            &Location::new("icd.csv"),
        )
        .expect("check")
    }

    #[test]
    fn passes_when_comparison_holds() {
        let location = Location::new("data.csv");
        let mut check = check("branch_id < 3");
        for value in ["1", "2", "1"] {
            check.check_row(&row(value), &location).expect("row");
        }
        assert!(check.check_at_end(&location).is_ok());
    }

    #[test]
    fn fails_when_comparison_is_violated() {
        let location = Location::new("data.csv");
        let mut check = check("branch_id < 2");
        for value in ["1", "2", "3"] {
            check.check_row(&row(value), &location).expect("row");
        }
        let error = check.check_at_end(&location).expect_err("must fail");
        assert!(error.to_string().contains("is 3"));
    }

    #[test]
    fn each_operator_is_honored() {
        let location = Location::new("data.csv");
        for (rule, values, expect_ok) in [
            ("branch_id <= 2", vec!["1", "2"], true),
            ("branch_id > 1", vec!["1", "2"], true),
            ("branch_id >= 3", vec!["1", "2"], false),
            ("branch_id == 2", vec!["1", "2"], true),
            ("branch_id != 2", vec!["1", "2"], false),
        ] {
            let mut check = check(rule);
            for value in values {
                check.check_row(&row(value), &location).expect("row");
            }
            assert_eq!(check.check_at_end(&location).is_ok(), expect_ok, "{rule}");
        }
    }

    #[test]
    fn malformed_rules_are_syntax_errors() {
        let location = Location::new("icd.csv");
        let fields = ["branch_id".to_string()];
        for rule in ["", "branch_id", "branch_id < ten", "other < 10"] {
            assert!(
                DistinctCountCheck::new("few branches", rule, &fields, &location).is_err(),
                "{rule}"
            );
        }
    }
}
