//! Statement builder.
//!
//! A [`Builder`] accumulates fixed query text and encoded values in call
//! order. Nothing already appended is ever touched again. [`Builder::build`]
//! freezes the text into an immutable [`Statement`].
//!
//! ```
//! use kql::Builder;
//!
//! let stmt = Builder::new("MyTable | where i != ")
//!     .add_int(32)
//!     .add_literal(" ;")
//!     .build();
//! assert_eq!(stmt.query(), "MyTable | where i != int(32) ;");
//! ```

use std::fmt;

use chrono::{DateTime, TimeDelta, TimeZone};
use serde::Serialize;
use uuid::Uuid;

use crate::ident::{quote_database, quote_identifier, quote_qualified_table};
use crate::literal::Literal;
use crate::params::Parameters;

/// Accumulates a statement under construction.
///
/// Every `add_*` method consumes the builder and hands it back with the new
/// fragment appended, so calls chain left to right. Clone a builder to fork
/// a shared prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Builder {
    text: String,
}

impl Builder {
    /// Start a statement from a fixed text fragment (may be empty).
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            text: initial.into(),
        }
    }

    /// Append trusted query text unmodified.
    pub fn add_literal(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }

    /// Append `int(n)`.
    pub fn add_int(self, value: i32) -> Self {
        self.add_value(Literal::Int(value))
    }

    /// Append `long(n)`.
    pub fn add_long(self, value: i64) -> Self {
        self.add_value(Literal::Long(value))
    }

    /// Append `real(x)`.
    pub fn add_real(self, value: f64) -> Self {
        self.add_value(Literal::Real(value))
    }

    /// Append `bool(true)` or `bool(false)`.
    pub fn add_bool(self, value: bool) -> Self {
        self.add_value(Literal::Bool(value))
    }

    /// Append `datetime(...)`, converting to UTC first.
    pub fn add_datetime<Tz: TimeZone>(self, value: DateTime<Tz>) -> Self {
        self.add_value(value)
    }

    /// Append `timespan(...)`.
    pub fn add_timespan(self, value: TimeDelta) -> Self {
        self.add_value(Literal::Timespan(value))
    }

    /// Append `dynamic("...")`. The JSON text is not parsed, only quoted.
    pub fn add_dynamic(self, json: &str) -> Self {
        self.add_value(Literal::Dynamic(json.to_string()))
    }

    /// Append `guid(...)`.
    pub fn add_guid(self, value: Uuid) -> Self {
        self.add_value(Literal::Guid(value))
    }

    /// Append `value` **verbatim**.
    ///
    /// Despite the name this does not produce a quoted string literal: no
    /// quotes are added and nothing is escaped. Use it only for fragments
    /// that are already safe where they land.
    pub fn add_string(self, value: &str) -> Self {
        self.add_value(Literal::String(value.to_string()))
    }

    /// Append any literal using its typed encoding.
    pub fn add_value(mut self, value: impl Into<Literal>) -> Self {
        self.text.push_str(&value.into().to_string());
        self
    }

    /// Append `database("<name>")`.
    pub fn add_database(mut self, name: &str) -> Self {
        self.text.push_str(&quote_database(name));
        self
    }

    /// Append a table name, bare or bracket-quoted.
    pub fn add_table(mut self, name: &str) -> Self {
        self.text.push_str(&quote_identifier(name));
        self
    }

    /// Append `database("<db>").<table>`.
    pub fn add_qualified_table(mut self, database: &str, table: &str) -> Self {
        self.text.push_str(&quote_qualified_table(database, table));
        self
    }

    /// Append a column name, bare or bracket-quoted.
    pub fn add_column(mut self, name: &str) -> Self {
        self.text.push_str(&quote_identifier(name));
        self
    }

    /// Append a function name, bare or bracket-quoted.
    pub fn add_function(mut self, name: &str) -> Self {
        self.text.push_str(&quote_identifier(name));
        self
    }

    /// Append a `declare query_parameters(...);` line for `params`.
    pub fn add_parameters(mut self, params: &Parameters) -> Self {
        self.text.push_str(&params.declaration());
        self
    }

    /// The text accumulated so far.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Freeze the accumulated text.
    pub fn build(self) -> Statement {
        tracing::debug!(len = self.text.len(), "built statement");
        Statement { query: self.text }
    }
}

/// A finished statement. Immutable and freely shareable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Statement {
    query: String,
}

impl Statement {
    /// The full query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn into_query(self) -> String {
        self.query
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}

impl AsRef<str> for Statement {
    fn as_ref(&self) -> &str {
        &self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn prefix() -> Builder {
        Builder::new("MyTable | where i != ")
    }

    #[test]
    fn test_empty() {
        assert_eq!(Builder::new("").build().query(), "");
        assert_eq!(Builder::default().build().query(), "");
    }

    #[test]
    fn test_literals_concatenate_in_order() {
        let stmt = Builder::new("foo")
            .add_literal("bar")
            .add_literal("")
            .add_literal("\"baz\\")
            .build();
        assert_eq!(stmt.query(), "foobar\"baz\\");
    }

    #[test]
    fn test_add_int() {
        let stmt = prefix().add_int(32).add_literal(" ;").build();
        assert_eq!(stmt.query(), "MyTable | where i != int(32) ;");
    }

    #[test]
    fn test_add_long_real_bool() {
        assert_eq!(prefix().add_long(32).build().query(), "MyTable | where i != long(32)");
        assert_eq!(prefix().add_real(32.5).build().query(), "MyTable | where i != real(32.5)");
        assert_eq!(prefix().add_bool(true).build().query(), "MyTable | where i != bool(true)");
    }

    #[test]
    fn test_add_datetime_and_timespan() {
        let dt = Utc.with_ymd_and_hms(2019, 1, 2, 3, 4, 5).unwrap()
            + TimeDelta::nanoseconds(600);
        let span = TimeDelta::hours(49)
            + TimeDelta::minutes(2)
            + TimeDelta::seconds(3)
            + TimeDelta::microseconds(4);
        let stmt = Builder::new("")
            .add_datetime(dt)
            .add_literal(" ")
            .add_timespan(span)
            .build();
        assert_eq!(
            stmt.query(),
            "datetime(2019-01-02T03:04:05.0000006Z) timespan(2.01:02:03.0004000)"
        );
    }

    #[test]
    fn test_add_string_is_not_quoted() {
        let stmt = prefix().add_string("foo\"bar").add_literal(" ;").build();
        assert_eq!(stmt.query(), "MyTable | where i != foo\"bar ;");
    }

    #[test]
    fn test_add_value_dispatches_on_type() {
        let stmt = Builder::new("")
            .add_value(1i32)
            .add_value(2i64)
            .add_value(false)
            .build();
        assert_eq!(stmt.query(), "int(1)long(2)bool(false)");
    }

    #[test]
    fn test_fork_shared_prefix() {
        let base = Builder::new("T | where x == ");
        let a = base.clone().add_int(1).build();
        let b = base.add_int(2).build();
        assert_eq!(a.query(), "T | where x == int(1)");
        assert_eq!(b.query(), "T | where x == int(2)");
    }

    #[test]
    fn test_as_str_tracks_progress() {
        let b = Builder::new("T").add_literal(" | take ");
        assert_eq!(b.as_str(), "T | take ");
    }

    #[test]
    fn test_statement_accessors() {
        let stmt = Builder::new("T | count").build();
        assert_eq!(stmt.to_string(), "T | count");
        assert_eq!(stmt.as_ref(), "T | count");
        assert_eq!(serde_json::to_string(&stmt).unwrap(), r#""T | count""#);
        assert_eq!(stmt.into_query(), "T | count");
    }

    #[test]
    fn test_statement_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Statement>();
    }
}
