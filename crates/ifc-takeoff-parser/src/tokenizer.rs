// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP record tokenizer using nom combinators
//!
//! Turns `NAME(attr, attr, ...)` into an owned attribute list. The same
//! grammar serves data records (`#12=IFCBEAM(...)`) and header records
//! (`FILE_NAME(...)`).

use ifc_takeoff_model::{AttributeValue, DecodedEntity, EntityId, IfcType};
use memchr::memchr;
use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{opt, recognize},
    error::{Error, ErrorKind},
    multi::separated_list0,
    sequence::{delimited, pair},
    IResult, Parser,
};

// ============================================================================
// Parsing Primitives
// ============================================================================

fn ws(input: &str) -> IResult<&str, ()> {
    let (input, _) = multispace0(input)?;
    Ok((input, ()))
}

fn fail(input: &str, kind: ErrorKind) -> nom::Err<Error<&str>> {
    nom::Err::Error(Error::new(input, kind))
}

/// Entity reference (#123)
fn entity_ref(input: &str) -> IResult<&str, AttributeValue> {
    let (rest, _) = char('#')(input)?;
    let (rest, digits) = take_while1(|c: char| c.is_ascii_digit())(rest)?;
    let id = digits
        .parse::<u32>()
        .map_err(|_| fail(input, ErrorKind::Digit))?;
    Ok((rest, AttributeValue::EntityRef(EntityId(id))))
}

/// STEP string ('text', with '' standing for one quote)
fn step_string(input: &str) -> IResult<&str, AttributeValue> {
    let (rest, _) = char('\'')(input)?;
    let bytes = rest.as_bytes();
    let mut from = 0;

    while let Some(offset) = memchr(b'\'', &bytes[from..]) {
        let quote = from + offset;
        if bytes.get(quote + 1) == Some(&b'\'') {
            from = quote + 2;
            continue;
        }
        let text = rest[..quote].replace("''", "'");
        return Ok((&rest[quote + 1..], AttributeValue::String(text)));
    }

    // Unterminated string
    Err(fail(input, ErrorKind::Char))
}

/// Integer or real, including forms such as `6000.` and `1.5E-3`
fn number(input: &str) -> IResult<&str, AttributeValue> {
    let (rest, text) = recognize((
        opt(alt((char('-'), char('+')))),
        take_while1(|c: char| c.is_ascii_digit()),
        opt(pair(char('.'), take_while(|c: char| c.is_ascii_digit()))),
        opt((
            alt((char('e'), char('E'))),
            opt(alt((char('+'), char('-')))),
            take_while1(|c: char| c.is_ascii_digit()),
        )),
    ))
    .parse(input)?;

    let value = if text.contains(['.', 'e', 'E']) {
        lexical_core::parse::<f64>(text.as_bytes())
            .ok()
            .or_else(|| text.parse::<f64>().ok())
            .map(AttributeValue::Float)
    } else {
        lexical_core::parse::<i64>(text.as_bytes())
            .ok()
            .map(AttributeValue::Integer)
    };

    value
        .map(|v| (rest, v))
        .ok_or_else(|| fail(input, ErrorKind::Float))
}

/// Enumeration (.VALUE.)
fn enumeration(input: &str) -> IResult<&str, AttributeValue> {
    let (rest, name) = delimited(
        char('.'),
        take_while1(|c: char| c.is_alphanumeric() || c == '_'),
        char('.'),
    )
    .parse(input)?;
    Ok((rest, AttributeValue::Enum(name.to_string())))
}

/// Null ($) or derived (*)
fn unset(input: &str) -> IResult<&str, AttributeValue> {
    let (rest, marker) = alt((char('$'), char('*'))).parse(input)?;
    let value = if marker == '$' {
        AttributeValue::Null
    } else {
        AttributeValue::Derived
    };
    Ok((rest, value))
}

/// Parenthesised, comma separated values
fn arguments(input: &str) -> IResult<&str, Vec<AttributeValue>> {
    delimited(
        pair(char('('), ws),
        separated_list0((ws, char(','), ws), value),
        pair(ws, char(')')),
    )
    .parse(input)
}

fn keyword(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

fn list(input: &str) -> IResult<&str, AttributeValue> {
    let (rest, items) = arguments(input)?;
    Ok((rest, AttributeValue::List(items)))
}

/// Typed value like IFCLABEL('text')
fn typed_value(input: &str) -> IResult<&str, AttributeValue> {
    let (rest, (name, _, args)) = (keyword, ws, arguments).parse(input)?;
    Ok((rest, AttributeValue::TypedValue(name.to_string(), args)))
}

/// Any attribute value
fn value(input: &str) -> IResult<&str, AttributeValue> {
    alt((
        entity_ref,
        step_string,
        unset,
        enumeration,
        number,
        list,
        typed_value,
    ))
    .parse(input)
}

// ============================================================================
// Records
// ============================================================================

/// Parse `KEYWORD(attr, ...)` with optional surrounding whitespace
///
/// Anything after the closing parenthesis (usually `;`) is ignored.
pub fn parse_record(input: &str) -> Result<(&str, Vec<AttributeValue>), String> {
    let (_, (_, name, _, attributes)) = (ws, keyword, ws, arguments)
        .parse(input)
        .map_err(|e| format!("malformed record: {e}"))?;
    Ok((name, attributes))
}

/// Parse a complete data record
///
/// Format: `#123=IFCBEAM(attr1,attr2,...);`
pub fn parse_entity(input: &str) -> Result<DecodedEntity, String> {
    let (rest, id) = (ws, entity_ref, ws, char('='))
        .parse(input)
        .map(|(rest, (_, id, _, _))| (rest, id))
        .map_err(|_: nom::Err<Error<&str>>| "expected `#id=` at start of record".to_string())?;

    let id = id
        .as_entity_ref()
        .ok_or_else(|| "expected entity id".to_string())?;
    let (type_name, attributes) = parse_record(rest)?;

    Ok(DecodedEntity {
        id,
        ifc_type: IfcType::parse(type_name),
        attributes,
    })
}
