//! Typed literal encoding.
//!
//! Every [`Literal`] renders, through its `Display` impl, as a self-delimiting
//! KQL literal carrying its type tag: `int(32)`, `datetime(...)`,
//! `dynamic("...")` and so on. The one exception is [`Literal::String`],
//! which is spliced verbatim.

use std::fmt;

use chrono::{DateTime, TimeDelta, TimeZone, Timelike, Utc};
use uuid::Uuid;

/// A value that can be spliced into a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// 32-bit integer, `int(n)`
    Int(i32),
    /// 64-bit integer, `long(n)`
    Long(i64),
    /// Double precision float, `real(x)`
    Real(f64),
    /// Boolean, `bool(true)`
    Bool(bool),
    /// Timestamp, always rendered in UTC
    DateTime(DateTime<Utc>),
    /// Duration, `timespan([D.]HH:MM:SS.fffffff)`
    ///
    /// The fraction is the sub-second nanosecond count padded to 7 digits,
    /// so 4µs prints as `.0004000`. From 10 ms up it prints 8 or 9 digits:
    /// 1.5 s is `timespan(00:00:01.500000000)`.
    Timespan(TimeDelta),
    /// Opaque JSON text, wrapped as a quoted string inside `dynamic(...)`
    Dynamic(String),
    /// Unique identifier, `guid(...)`
    Guid(Uuid),
    /// Raw text appended as-is.
    ///
    /// **No quoting and no escaping happens here.** The caller must hand in a
    /// fragment that is already safe at its point of use.
    String(String),
}

impl Literal {
    /// KQL scalar type name of this literal.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Int(_) => "int",
            Literal::Long(_) => "long",
            Literal::Real(_) => "real",
            Literal::Bool(_) => "bool",
            Literal::DateTime(_) => "datetime",
            Literal::Timespan(_) => "timespan",
            Literal::Dynamic(_) => "dynamic",
            Literal::Guid(_) => "guid",
            Literal::String(_) => "string",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "int({})", n),
            Literal::Long(n) => write!(f, "long({})", n),
            Literal::Real(x) => write_real(f, *x),
            Literal::Bool(b) => write!(f, "bool({})", b),
            Literal::DateTime(dt) => write_datetime(f, dt),
            Literal::Timespan(span) => write_timespan(f, span),
            Literal::Dynamic(json) => write!(f, "dynamic({})", quote_string(json)),
            Literal::Guid(u) => write!(f, "guid({})", u.hyphenated()),
            Literal::String(s) => f.write_str(s),
        }
    }
}

fn write_real(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        f.write_str("real(nan)")
    } else if x.is_infinite() {
        let sign = if x > 0.0 { '+' } else { '-' };
        write!(f, "real({}inf)", sign)
    } else {
        // Display is the shortest text that parses back to the same f64.
        write!(f, "real({})", x)
    }
}

fn write_datetime(f: &mut fmt::Formatter<'_>, dt: &DateTime<Utc>) -> fmt::Result {
    // Leap seconds are reported as nanosecond() >= 1e9.
    let ticks = dt.nanosecond() % 1_000_000_000 / 100;
    write!(
        f,
        "datetime({}.{:07}Z)",
        dt.format("%Y-%m-%dT%H:%M:%S"),
        ticks
    )
}

fn write_timespan(f: &mut fmt::Formatter<'_>, span: &TimeDelta) -> fmt::Result {
    let sign = if *span < TimeDelta::zero() { "-" } else { "" };
    // subsec_nanos carries the same sign as num_seconds.
    let secs = span.num_seconds().unsigned_abs();
    let nanos = span.subsec_nanos().unsigned_abs();

    let days = secs / 86_400;
    let hours = secs % 86_400 / 3_600;
    let minutes = secs % 3_600 / 60;
    let seconds = secs % 60;

    write!(f, "timespan({}", sign)?;
    if days > 0 {
        write!(f, "{}.", days)?;
    }
    // Fraction field is the sub-second nanosecond count, zero padded to 7.
    write!(f, "{:02}:{:02}:{:02}.{:07})", hours, minutes, seconds, nanos)
}

/// Render `s` as a double-quoted KQL string literal.
///
/// Only `\` and `"` are escaped; every other character, newlines and
/// non-ASCII included, is kept as is.
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Int(n)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Long(n)
    }
}

impl From<f64> for Literal {
    fn from(x: f64) -> Self {
        Literal::Real(x)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Literal {
    fn from(dt: DateTime<Tz>) -> Self {
        Literal::DateTime(dt.with_timezone(&Utc))
    }
}

impl From<TimeDelta> for Literal {
    fn from(span: TimeDelta) -> Self {
        Literal::Timespan(span)
    }
}

impl From<Uuid> for Literal {
    fn from(u: Uuid) -> Self {
        Literal::Guid(u)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}
