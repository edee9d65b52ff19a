// Pipeline parser for the chart DSL

use super::ast::{Command, WidgetSpec};
use super::command::parse_command;
use super::lexer::ws;
use nom::{
    bytes::complete::tag,
    combinator::eof,
    error::{Error, ErrorKind},
    multi::separated_list1,
    IResult,
};

/// Parse a complete widget specification
/// Format: correlation(...) | appearance(...) | grid(...) | size(...)
pub fn parse_widget_spec(input: &str) -> IResult<&str, WidgetSpec> {
    let start = input;
    let (input, commands) = separated_list1(ws(tag("|")), parse_command)(input)?;
    let (input, _) = ws(eof)(input)?;

    let mut chart = None;
    let mut appearance = None;
    let mut columns = None;
    let mut size = None;

    // Later components override earlier ones
    for cmd in commands {
        match cmd {
            Command::Chart(c) => chart = Some(c),
            Command::Appearance(a) => appearance = Some(a),
            Command::Grid { columns: c } => columns = Some(c),
            Command::Size { width, height } => size = Some((width, height)),
        }
    }

    let chart = match chart {
        Some(chart) => chart,
        None => return Err(nom::Err::Error(Error::new(start, ErrorKind::Verify))),
    };

    Ok((
        input,
        WidgetSpec {
            chart,
            appearance,
            columns,
            size,
        },
    ))
}
