// ABOUTME: Placeholder binding for report query templates
// ABOUTME: Merges supplied and default parameters and substitutes {name} placeholders

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::Parameters;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

#[derive(Error, Debug, PartialEq)]
pub enum BindError {
    #[error("Missing parameter: {0}")]
    MissingParameter(String),
    #[error("Parameter '{name}' has unsupported type: {kind}")]
    UnsupportedParameterType { name: String, kind: &'static str },
}

/// Distinct placeholder names in `template`, in order of first appearance
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Text form of a supplied parameter value
fn render_value(name: &str, value: &Value) -> Result<String, BindError> {
    let kind = match value {
        Value::String(s) => return Ok(s.clone()),
        Value::Number(n) => return Ok(n.to_string()),
        Value::Bool(b) => return Ok(b.to_string()),
        Value::Null => "null",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    Err(BindError::UnsupportedParameterType {
        name: name.to_string(),
        kind,
    })
}

/// Produce the final query text for a template.
///
/// Templates that do not require parameters come back untouched and any supplied
/// values are ignored. Otherwise supplied values override defaults key by key and
/// every placeholder is replaced in a single pass, so substituted text is never
/// rescanned for further placeholders. Values are inserted verbatim.
pub fn bind(
    template: &str,
    requires_parameters: bool,
    supplied: &Parameters,
    defaults: &BTreeMap<String, String>,
) -> Result<String, BindError> {
    if !requires_parameters {
        if !supplied.is_empty() {
            log::debug!(
                "Ignoring {} supplied parameter(s) for a template without placeholders",
                supplied.len()
            );
        }
        return Ok(template.to_string());
    }

    let mut merged = defaults.clone();
    for (name, value) in supplied {
        merged.insert(name.clone(), render_value(name, value)?);
    }

    if let Some(missing) = placeholders(template)
        .into_iter()
        .find(|name| !merged.contains_key(name))
    {
        return Err(BindError::MissingParameter(missing));
    }

    let bound = PLACEHOLDER.replace_all(template, |caps: &Captures| {
        merged
            .get(&caps[1])
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    });
    log::debug!("Bound {} parameter(s) into query template", merged.len());
    Ok(bound.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn params(pairs: &[(&str, Value)]) -> Parameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn defaults(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_placeholders_in_order_without_duplicates() {
        let names = placeholders("SELECT {b} FROM {a} WHERE x = {b} AND y = '{ not one }'");
        assert_eq!(names, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_unparameterized_template_is_untouched() {
        let template = "SELECT * FROM {table}";
        let supplied = params(&[("table", json!("rental"))]);
        let bound = bind(template, false, &supplied, &BTreeMap::new()).unwrap();
        assert_eq!(bound, template);
    }

    #[test]
    fn test_supplied_overrides_default() {
        let bound = bind(
            "SELECT COUNT(*) FROM {table} WHERE DAY(rental_date) = {day}",
            true,
            &params(&[("day", json!(5))]),
            &defaults(&[("table", "rental"), ("day", "15")]),
        )
        .unwrap();
        assert_eq!(bound, "SELECT COUNT(*) FROM rental WHERE DAY(rental_date) = 5");
    }

    #[test]
    fn test_missing_parameter() {
        let result = bind(
            "SELECT * FROM {table} WHERE day = {day}",
            true,
            &Parameters::new(),
            &defaults(&[("table", "rental")]),
        );
        assert_eq!(result, Err(BindError::MissingParameter("day".to_string())));
    }

    #[test]
    fn test_unsupported_parameter_type() {
        let result = bind(
            "SELECT {x}",
            true,
            &params(&[("x", json!([1, 2]))]),
            &BTreeMap::new(),
        );
        assert_eq!(
            result,
            Err(BindError::UnsupportedParameterType {
                name: "x".to_string(),
                kind: "array"
            })
        );

        let result = bind("SELECT {x}", true, &params(&[("x", Value::Null)]), &BTreeMap::new());
        assert!(matches!(result, Err(BindError::UnsupportedParameterType { .. })));
    }

    #[test]
    fn test_substituted_text_is_not_rescanned() {
        let bound = bind(
            "{a} {b}",
            true,
            &params(&[("a", json!("{b}")), ("b", json!(true))]),
            &BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(bound, "{b} true");
    }

    proptest! {
        #[test]
        fn prop_unparameterized_bind_is_identity(
            template in ".*",
            key in "[a-z]{1,8}",
            value in ".*",
        ) {
            let supplied = params(&[(key.as_str(), json!(value))]);
            let bound = bind(&template, false, &supplied, &BTreeMap::new()).unwrap();
            prop_assert_eq!(bound, template);
        }

        #[test]
        fn prop_every_x_replaced_and_others_kept(
            chunks in proptest::collection::vec("[a-z ,.=]{0,6}", 1..6),
        ) {
            let template = format!("{} {{y}}", chunks.join("{x}"));
            let supplied = params(&[("x", json!("5"))]);
            let defaults = defaults(&[("y", "{y}")]);
            let bound = bind(&template, true, &supplied, &defaults).unwrap();
            prop_assert_eq!(bound, format!("{} {{y}}", chunks.join("5")));
        }
    }
}
