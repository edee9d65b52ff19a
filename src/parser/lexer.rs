// Token-level parsers shared by the DSL commands

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, alphanumeric1, char, multispace0},
    combinator::{map, recognize},
    multi::many0_count,
    number::complete::double,
    sequence::{delimited, pair},
    IResult,
};

/// Wrap a parser so it ignores surrounding whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Column name: starts with a letter or `_`, then letters, digits, `_` or `.`
pub fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0_count(alt((alphanumeric1, tag("_"), tag(".")))),
        )),
        |s: &str| s.to_string(),
    )(input)
}

/// Double-quoted string without escapes
pub fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
        |s: &str| s.to_string(),
    )(input)
}

pub fn number_literal(input: &str) -> IResult<&str, f64> {
    double(input)
}

/// A column reference, bare or quoted (for names with spaces)
pub fn field_name(input: &str) -> IResult<&str, String> {
    alt((string_literal, identifier))(input)
}
