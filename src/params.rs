//! Named query parameters.
//!
//! Kusto can bind values out of band: the statement opens with
//! `declare query_parameters(name:type, ...);` and the request carries the
//! encoded values next to it. [`Parameters`] keeps both halves in sync.
//!
//! ```
//! use kql::{Builder, Parameters};
//!
//! let params = Parameters::new().add("limit", 10i64)?.add("state", "TEXAS")?;
//! let stmt = Builder::new("")
//!     .add_parameters(&params)
//!     .add_literal("StormEvents | where State == state | take limit")
//!     .build();
//! assert_eq!(
//!     stmt.query(),
//!     "declare query_parameters(limit:long, state:string);\
//!      StormEvents | where State == state | take limit"
//! );
//! assert_eq!(params.values()["state"], "\"TEXAS\"");
//! # Ok::<(), kql::KqlError>(())
//! ```

use std::collections::BTreeMap;

use crate::error::{KqlError, KqlResult};
use crate::ident::is_simple_identifier;
use crate::literal::{Literal, quote_string};

/// An ordered set of typed query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    entries: Vec<(String, Literal)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter.
    ///
    /// The name must be a simple identifier and unique within the set.
    pub fn add(mut self, name: &str, value: impl Into<Literal>) -> KqlResult<Self> {
        if !is_simple_identifier(name) {
            return Err(KqlError::InvalidParameterName(name.to_string()));
        }
        if self.entries.iter().any(|(n, _)| n == name) {
            return Err(KqlError::DuplicateParameter(name.to_string()));
        }
        self.entries.push((name.to_string(), value.into()));
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `declare query_parameters(a:int, b:string);`, or `""` when empty.
    pub fn declaration(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let decls: Vec<String> = self
            .entries
            .iter()
            .map(|(name, value)| format!("{}:{}", name, value.type_name()))
            .collect();
        format!("declare query_parameters({});", decls.join(", "))
    }

    /// Encoded value of every parameter, keyed by name.
    ///
    /// A parameter value is always a literal, so the raw string kind is
    /// sent as a quoted string here rather than verbatim.
    pub fn values(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(name, value)| (name.clone(), encode(value)))
            .collect()
    }

    /// The values as a JSON object, ready for a request's parameter property.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values()
                .into_iter()
                .map(|(name, value)| (name, serde_json::Value::String(value)))
                .collect(),
        )
    }
}

fn encode(value: &Literal) -> String {
    match value {
        Literal::String(s) => quote_string(s),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_declaration() {
        let params = Parameters::new();
        assert!(params.is_empty());
        assert_eq!(params.declaration(), "");
        assert_eq!(params.to_json(), serde_json::json!({}));
    }

    #[test]
    fn test_declaration_keeps_insertion_order() {
        let params = Parameters::new()
            .add("z", 1i32)
            .unwrap()
            .add("a", TimeDelta::minutes(5))
            .unwrap()
            .add("m", 2.5)
            .unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(
            params.declaration(),
            "declare query_parameters(z:int, a:timespan, m:real);"
        );
    }

    #[test]
    fn test_values_are_encoded() {
        let params = Parameters::new()
            .add("n", 7i64)
            .unwrap()
            .add("s", r#"say "hi""#)
            .unwrap()
            .add("d", crate::literal::Literal::Dynamic("[1,2]".into()))
            .unwrap();
        let values = params.values();
        assert_eq!(values["n"], "long(7)");
        assert_eq!(values["s"], r#""say \"hi\"""#);
        assert_eq!(values["d"], r#"dynamic("[1,2]")"#);
    }

    #[test]
    fn test_to_json() {
        let params = Parameters::new().add("flag", true).unwrap();
        assert_eq!(params.to_json(), serde_json::json!({ "flag": "bool(true)" }));
    }

    #[test]
    fn test_rejects_bad_names() {
        let err = Parameters::new().add("not simple", 1i32).unwrap_err();
        assert!(matches!(err, KqlError::InvalidParameterName(n) if n == "not simple"));

        let err = Parameters::new().add("", 1i32).unwrap_err();
        assert!(matches!(err, KqlError::InvalidParameterName(_)));
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = Parameters::new()
            .add("x", 1i32)
            .unwrap()
            .add("x", 2i32)
            .unwrap_err();
        assert!(matches!(err, KqlError::DuplicateParameter(n) if n == "x"));
    }
}
