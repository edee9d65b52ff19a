// Command parsers for the chart DSL

use super::ast::{AppearanceSpec, ChartSpec, Command};
use super::lexer::{field_name, number_literal, string_literal, ws};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::map,
    error::{Error, ErrorKind},
    multi::separated_list0,
    sequence::preceded,
    IResult,
};

/// Parse the chart command
/// Format: correlation(x: col, y: col) or correlation(x: col, y: col, display: "Density")
pub fn parse_correlation(input: &str) -> IResult<&str, Command> {
    let start = input;
    let (input, _) = ws(tag("correlation"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        alt((
            map(preceded(ws(tag("x:")), ws(field_name)), |v| ("x", v)),
            map(preceded(ws(tag("y:")), ws(field_name)), |v| ("y", v)),
            map(preceded(ws(tag("display:")), ws(string_literal)), |v| ("display", v)),
        )),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut x = None;
    let mut y = None;
    let mut display = None;
    for (key, val) in args {
        match key {
            "x" => x = Some(val),
            "y" => y = Some(val),
            "display" => display = Some(val),
            _ => {}
        }
    }

    match (x, y) {
        (Some(x), Some(y)) => Ok((input, Command::Chart(ChartSpec { x, y, display }))),
        _ => Err(nom::Err::Error(Error::new(start, ErrorKind::Verify))),
    }
}

/// Parse appearance(background: "#fff", text: "#000")
pub fn parse_appearance(input: &str) -> IResult<&str, Command> {
    let (input, _) = ws(tag("appearance"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        alt((
            map(preceded(ws(tag("background:")), ws(string_literal)), |v| ("background", v)),
            map(preceded(ws(tag("text:")), ws(string_literal)), |v| ("text", v)),
        )),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut appearance = AppearanceSpec::default();
    for (key, val) in args {
        match key {
            "background" => appearance.background = Some(val),
            "text" => appearance.text = Some(val),
            _ => {}
        }
    }

    Ok((input, Command::Appearance(appearance)))
}

/// Parse grid(columns: 3)
pub fn parse_grid(input: &str) -> IResult<&str, Command> {
    let start = input;
    let (input, _) = ws(tag("grid"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, _) = ws(tag("columns:"))(input)?;
    let (input, columns) = ws(number_literal)(input)?;
    let (input, _) = ws(char(')'))(input)?;

    if columns < 1.0 || columns.fract() != 0.0 {
        return Err(nom::Err::Error(Error::new(start, ErrorKind::Verify)));
    }

    Ok((input, Command::Grid { columns: columns as usize }))
}

/// Parse size(width: 800, height: 600)
pub fn parse_size(input: &str) -> IResult<&str, Command> {
    let start = input;
    let (input, _) = ws(tag("size"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, _) = ws(tag("width:"))(input)?;
    let (input, width) = ws(number_literal)(input)?;
    let (input, _) = ws(char(','))(input)?;
    let (input, _) = ws(tag("height:"))(input)?;
    let (input, height) = ws(number_literal)(input)?;
    let (input, _) = ws(char(')'))(input)?;

    let valid = |v: f64| v.is_finite() && (1.0..=u32::MAX as f64).contains(&v);
    if !valid(width) || !valid(height) {
        return Err(nom::Err::Error(Error::new(start, ErrorKind::Verify)));
    }

    Ok((
        input,
        Command::Size {
            width: width as u32,
            height: height as u32,
        },
    ))
}

/// Parse any command
pub fn parse_command(input: &str) -> IResult<&str, Command> {
    alt((parse_correlation, parse_appearance, parse_grid, parse_size))(input)
}
