//! Safe KQL identifier handling.
//!
//! Names matching `[A-Za-z_][A-Za-z0-9_]*` are emitted bare. Anything else is
//! bracket-quoted as `["..."]` with `\`, `"` and newline escaped. Database
//! names always use the `database("...")` form.
//!
//! Only ASCII letters count as letters here, so `é` or `ሴ` force quoting no
//! matter what the Unicode tables say.

use std::fmt;

use crate::literal::quote_string;

/// What kind of schema element a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentKind {
    Database,
    Table,
    Column,
    Function,
}

impl fmt::Display for IdentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentKind::Database => write!(f, "database"),
            IdentKind::Table => write!(f, "table"),
            IdentKind::Column => write!(f, "column"),
            IdentKind::Function => write!(f, "function"),
        }
    }
}

/// A schema element name tagged with its kind.
///
/// `Display` renders the quoted form that is safe to splice into a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub kind: IdentKind,
    pub name: String,
}

impl Ident {
    pub fn new(kind: IdentKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn database(name: impl Into<String>) -> Self {
        Self::new(IdentKind::Database, name)
    }

    pub fn table(name: impl Into<String>) -> Self {
        Self::new(IdentKind::Table, name)
    }

    pub fn column(name: impl Into<String>) -> Self {
        Self::new(IdentKind::Column, name)
    }

    pub fn function(name: impl Into<String>) -> Self {
        Self::new(IdentKind::Function, name)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IdentKind::Database => f.write_str(&quote_database(&self.name)),
            IdentKind::Table | IdentKind::Column | IdentKind::Function => {
                f.write_str(&quote_identifier(&self.name))
            }
        }
    }
}

/// Whether `name` can be emitted as a bare token.
pub fn is_simple_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Quote a table, column or function name.
pub fn quote_identifier(name: &str) -> String {
    if is_simple_identifier(name) {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len() + 4);
    out.push_str("[\"");
    for c in name.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push_str("\"]");
    out
}

/// Quote a database name as `database("<name>")`, whether simple or not.
pub fn quote_database(name: &str) -> String {
    format!("database({})", quote_string(name))
}

/// Render `database("<db>").<table>`.
pub fn quote_qualified_table(database: &str, table: &str) -> String {
    format!("{}.{}", quote_database(database), quote_identifier(table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_identifiers() {
        for name in ["foo_1", "_bar", "_baz", "func_", "_", "A1b2"] {
            assert!(is_simple_identifier(name), "{name} should be simple");
        }
    }

    #[test]
    fn test_not_simple_identifiers() {
        for name in ["", "1abc", "a-b", "a b", "é", "f_u_n\u{1234}c", "a.b", "[x]"] {
            assert!(!is_simple_identifier(name), "{name:?} should not be simple");
        }
    }

    #[test]
    fn test_bare_when_simple() {
        assert_eq!(quote_identifier("_bar"), "_bar");
        assert_eq!(quote_identifier("func_"), "func_");
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(quote_identifier(""), r#"[""]"#);
    }

    #[test]
    fn test_bracket_escaping() {
        assert_eq!(quote_identifier(r"b\a\r"), r#"["b\\a\\r"]"#);
        assert_eq!(quote_identifier("b\na\nz"), r#"["b\na\nz"]"#);
        assert_eq!(quote_identifier(r#"say "hi""#), r#"["say \"hi\""]"#);
    }

    #[test]
    fn test_non_ascii_passes_through() {
        assert_eq!(quote_identifier("f_u_n\u{1234}c"), "[\"f_u_n\u{1234}c\"]");
        assert_eq!(quote_identifier("naïve"), "[\"naïve\"]");
    }

    #[test]
    fn test_carriage_return_not_escaped() {
        assert_eq!(quote_identifier("a\rb"), "[\"a\rb\"]");
    }

    #[test]
    fn test_database_always_quoted() {
        assert_eq!(quote_database("foo_1"), r#"database("foo_1")"#);
        assert_eq!(quote_database(r#"f""o"#), r#"database("f\"\"o")"#);
        assert_eq!(quote_database(""), r#"database("")"#);
    }

    #[test]
    fn test_qualified_table() {
        assert_eq!(
            quote_qualified_table("Samples", "StormEvents"),
            r#"database("Samples").StormEvents"#
        );
        assert_eq!(
            quote_qualified_table("Samples", "Storm Events"),
            r#"database("Samples").["Storm Events"]"#
        );
    }

    #[test]
    fn test_ident_display() {
        assert_eq!(Ident::database("db").to_string(), r#"database("db")"#);
        assert_eq!(Ident::table("my table").to_string(), r#"["my table"]"#);
        assert_eq!(Ident::column("col").to_string(), "col");
        assert_eq!(Ident::function("f-1").to_string(), r#"["f-1"]"#);
        assert_eq!(IdentKind::Column.to_string(), "column");
    }
}
