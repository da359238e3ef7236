//! Statement templates.
//!
//! A template is fixed query text with typed placeholders:
//!
//! ```text
//! {table:Storm Events} | where StartTime > {datetime:2007-01-01T00:00:00Z}
//! ─────────┬────────── ─────────┬──────── ────────────────┬───────────────
//!          │                    │                         │
//!          │                    │                         └── Typed literal
//!          │                    └── Fixed text, copied verbatim
//!          └── Identifier
//! ```
//!
//! Placeholder kinds are the literal kinds (`int`, `long`, `real`, `bool`,
//! `datetime`, `timespan`, `dynamic`, `guid`, `string`) and the identifier
//! kinds (`database`, `table`, `column`, `function`).
//!
//! `{{` and `}}` stand for literal braces. Inside a placeholder value `\}`
//! and `\\` are escapes; any other backslash is kept.

use chrono::{DateTime, TimeDelta};
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while1},
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_res, opt, value},
    multi::{many0, many1},
    sequence::{delimited, preceded, separated_pair, terminated, tuple},
    IResult,
};
use uuid::Uuid;

use crate::builder::{Builder, Statement};
use crate::error::{KqlError, KqlResult};
use crate::ident::{Ident, IdentKind};
use crate::literal::Literal;

/// Upper bound of a KQL timespan in whole days.
const MAX_TIMESPAN_DAYS: i64 = 10_675_199;

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Fixed query text.
    Text(String),
    /// A typed literal placeholder.
    Value(Literal),
    /// A schema element placeholder.
    Ident(Ident),
}

impl Segment {
    /// Build a placeholder segment from its kind and raw value.
    pub fn placeholder(kind: &str, raw: &str) -> KqlResult<Self> {
        let ident_kind = match kind {
            "database" => Some(IdentKind::Database),
            "table" => Some(IdentKind::Table),
            "column" => Some(IdentKind::Column),
            "function" => Some(IdentKind::Function),
            _ => None,
        };
        match ident_kind {
            Some(k) => Ok(Segment::Ident(Ident::new(k, raw))),
            None => parse_literal(kind, raw).map(Segment::Value),
        }
    }

    /// Append this segment to `builder`.
    pub fn apply(&self, builder: Builder) -> Builder {
        tracing::trace!(segment = ?self, "applying template segment");
        match self {
            Segment::Text(text) => builder.add_literal(text),
            Segment::Value(literal) => builder.add_value(literal.clone()),
            Segment::Ident(ident) => match ident.kind {
                IdentKind::Database => builder.add_database(&ident.name),
                IdentKind::Table => builder.add_table(&ident.name),
                IdentKind::Column => builder.add_column(&ident.name),
                IdentKind::Function => builder.add_function(&ident.name),
            },
        }
    }
}

/// Read `raw` as a literal of the given kind.
pub fn parse_literal(kind: &str, raw: &str) -> KqlResult<Literal> {
    match kind {
        "int" => raw
            .parse()
            .map(Literal::Int)
            .map_err(|e| KqlError::invalid("int", raw, e)),
        "long" => raw
            .parse()
            .map(Literal::Long)
            .map_err(|e| KqlError::invalid("long", raw, e)),
        "real" => raw
            .parse()
            .map(Literal::Real)
            .map_err(|e| KqlError::invalid("real", raw, e)),
        "bool" => match raw {
            "true" => Ok(Literal::Bool(true)),
            "false" => Ok(Literal::Bool(false)),
            _ => Err(KqlError::invalid("bool", raw, "expected 'true' or 'false'")),
        },
        "datetime" => DateTime::parse_from_rfc3339(raw)
            .map(Literal::from)
            .map_err(|e| KqlError::invalid("datetime", raw, e)),
        "timespan" => parse_timespan(raw).map(Literal::Timespan),
        "dynamic" => Ok(Literal::Dynamic(raw.to_string())),
        "guid" => Uuid::parse_str(raw)
            .map(Literal::Guid)
            .map_err(|e| KqlError::invalid("guid", raw, e)),
        "string" => Ok(Literal::String(raw.to_string())),
        other => Err(KqlError::UnknownKind(other.to_string())),
    }
}

/// Parse a template into segments.
pub fn parse(template: &str) -> KqlResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = template;

    while !rest.is_empty() {
        let position = template.len() - rest.len();

        if let Ok((next, text)) = parse_text(rest) {
            segments.push(Segment::Text(text));
            rest = next;
            continue;
        }

        match parse_placeholder(rest) {
            Ok((next, (kind, raw))) => {
                let segment = Segment::placeholder(kind, &raw)
                    .map_err(|e| KqlError::parse(position, e.to_string()))?;
                segments.push(segment);
                rest = next;
            }
            Err(_) if rest.starts_with('}') => {
                return Err(KqlError::parse(
                    position,
                    "Unmatched '}' (write '}}' for a literal brace)",
                ));
            }
            Err(_) => {
                return Err(KqlError::parse(
                    position,
                    "Malformed placeholder, expected '{kind:value}'",
                ));
            }
        }
    }

    Ok(segments)
}

/// Parse a template and render it into a statement.
pub fn render(template: &str) -> KqlResult<Statement> {
    let segments = parse(template)?;
    let builder = segments
        .iter()
        .fold(Builder::default(), |builder, segment| segment.apply(builder));
    Ok(builder.build())
}

/// Fixed text, with `{{`/`}}` unescaped.
fn parse_text(input: &str) -> IResult<&str, String> {
    map(
        many1(alt((
            value("{", tag("{{")),
            value("}", tag("}}")),
            is_not("{}"),
        ))),
        |parts: Vec<&str>| parts.concat(),
    )(input)
}

/// `{kind:value}`
fn parse_placeholder(input: &str) -> IResult<&str, (&str, String)> {
    delimited(
        char('{'),
        separated_pair(
            take_while1(|c: char| c.is_ascii_alphabetic()),
            char(':'),
            parse_placeholder_value,
        ),
        char('}'),
    )(input)
}

fn parse_placeholder_value(input: &str) -> IResult<&str, String> {
    map(
        many0(alt((
            value("}", tag("\\}")),
            value("\\", tag("\\\\")),
            is_not("\\}"),
            tag("\\"),
        ))),
        |parts: Vec<&str>| parts.concat(),
    )(input)
}

fn number<T: std::str::FromStr>(input: &str) -> IResult<&str, T> {
    map_res(digit1, str::parse::<T>)(input)
}

/// `[-][D.]HH:MM:SS[.nnnnnnnnn]`
fn timespan_parts(
    input: &str,
) -> IResult<&str, (bool, Option<i64>, i64, i64, i64, Option<&str>)> {
    tuple((
        map(opt(char('-')), |sign| sign.is_some()),
        opt(terminated(number::<i64>, char('.'))),
        number::<i64>,
        preceded(char(':'), number::<i64>),
        preceded(char(':'), number::<i64>),
        opt(preceded(char('.'), digit1)),
    ))(input)
}

/// Read a timespan in the form [`Literal::Timespan`] prints it.
///
/// The fraction field is a sub-second nanosecond count (`.0004000` is
/// 4000 ns), so rendering the result gives back the same text.
pub fn parse_timespan(raw: &str) -> KqlResult<TimeDelta> {
    let invalid = |reason: &str| KqlError::invalid("timespan", raw, reason);

    let (_, (negative, days, hours, minutes, seconds, fraction)) =
        all_consuming(timespan_parts)(raw)
            .map_err(|_| invalid("expected [-][D.]HH:MM:SS[.nnnnnnnnn]"))?;

    let days = days.unwrap_or(0);
    if days > MAX_TIMESPAN_DAYS {
        return Err(invalid("too many days"));
    }
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(invalid("field out of range"));
    }

    let fraction = fraction.unwrap_or("0");
    if fraction.len() > 9 {
        return Err(invalid("more than 9 fractional digits"));
    }
    let nanos: i64 = fraction.parse().map_err(|_| invalid("bad fraction"))?;

    let span = TimeDelta::days(days)
        + TimeDelta::hours(hours)
        + TimeDelta::minutes(minutes)
        + TimeDelta::seconds(seconds)
        + TimeDelta::nanoseconds(nanos);
    Ok(if negative { -span } else { span })
}
