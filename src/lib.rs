//! # KQL — safe statement building for Kusto
//!
//! > **Stop concatenating strings. Encode your values.**
//!
//! Build Kusto Query Language statements from trusted fixed text and
//! untrusted values. Every value is rendered with its type tag and escaping,
//! every schema name is quoted when it needs to be.
//!
//! ## Quick Example
//!
//! ```
//! use kql::prelude::*;
//!
//! let stmt = Builder::new("")
//!     .add_database("Samples")
//!     .add_literal(".")
//!     .add_table("Storm Events")
//!     .add_literal(" | where ")
//!     .add_column("State")
//!     .add_literal(" != ")
//!     .add_dynamic(r#"{"a": 1}"#)
//!     .build();
//!
//! assert_eq!(
//!     stmt.query(),
//!     r#"database("Samples").["Storm Events"] | where State != dynamic("{\"a\": 1}")"#
//! );
//! ```
//!
//! ## Literal kinds
//!
//! | Kind       | Output                          |
//! |------------|---------------------------------|
//! | `int`      | `int(32)`                       |
//! | `long`     | `long(32)`                      |
//! | `real`     | `real(32.5)`                    |
//! | `bool`     | `bool(true)`                    |
//! | `datetime` | `datetime(2019-01-02T03:04:05.0000006Z)` |
//! | `timespan` | `timespan(2.01:02:03.0004000)`  |
//! | `dynamic`  | `dynamic("{\"a\": 3}")`         |
//! | `guid`     | `guid(12345678-1234-1234-1234-123456789012)` |
//! | `string`   | appended verbatim, **not quoted** |

pub mod builder;
pub mod config;
pub mod error;
pub mod ident;
pub mod literal;
pub mod params;
pub mod template;

pub use builder::{Builder, Statement};
pub use error::{KqlError, KqlResult};
pub use literal::Literal;
pub use params::Parameters;

pub mod prelude {
    pub use crate::builder::{Builder, Statement};
    pub use crate::error::*;
    pub use crate::ident::{Ident, IdentKind};
    pub use crate::literal::Literal;
    pub use crate::params::Parameters;
    pub use crate::template::{Segment, render};
}

/// Render a statement template such as `"{table:T} | take {int:10}"`.
///
/// # Example
///
/// ```
/// let stmt = kql::render("{table:My Table} | where x == {long:7}").unwrap();
/// assert_eq!(stmt.query(), r#"["My Table"] | where x == long(7)"#);
/// ```
pub fn render(template: &str) -> KqlResult<Statement> {
    template::render(template)
}
