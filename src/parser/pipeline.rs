// Pipeline parser for the mapping DSL
//
// Format: labels(0) | values(1, 2) | series(3) | categories(4) | aggregate(sum) | grid(by: value, ncol: 2)

use super::ast::{Command, GridSpec, MappingSpec};
use super::lexer::{identifier, index_literal, ws};
use crate::grid::SplitBy;
use crate::mapping::AggregationMode;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::{eof, map, map_res},
    multi::{separated_list0, separated_list1},
    sequence::{delimited, preceded},
    IResult,
};

fn index_list(input: &str) -> IResult<&str, Vec<usize>> {
    delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), ws(index_literal)),
        ws(char(')')),
    )(input)
}

fn parse_labels(input: &str) -> IResult<&str, Command> {
    let (input, _) = ws(tag("labels"))(input)?;
    let (input, col) = delimited(ws(char('(')), ws(index_literal), ws(char(')')))(input)?;
    Ok((input, Command::Labels(col)))
}

fn parse_aggregate(input: &str) -> IResult<&str, Command> {
    let (input, _) = ws(tag("aggregate"))(input)?;
    let (input, mode) = delimited(
        ws(char('(')),
        map_res(ws(identifier), |name: String| name.parse::<AggregationMode>()),
        ws(char(')')),
    )(input)?;
    Ok((input, Command::Aggregate(mode)))
}

fn split_by(input: &str) -> IResult<&str, SplitBy> {
    alt((
        map(tag("label"), |_| SplitBy::Label),
        map(tag("value"), |_| SplitBy::Value),
    ))(input)
}

enum GridArg {
    By(SplitBy),
    Ncol(usize),
}

fn parse_grid(input: &str) -> IResult<&str, Command> {
    let (input, _) = ws(tag("grid"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        alt((
            map(preceded(ws(tag("by:")), ws(split_by)), GridArg::By),
            map(preceded(ws(tag("ncol:")), ws(index_literal)), GridArg::Ncol),
        )),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut spec = GridSpec { by: SplitBy::default(), ncol: None };
    for arg in args {
        match arg {
            GridArg::By(by) => spec.by = by,
            GridArg::Ncol(n) => spec.ncol = Some(n),
        }
    }

    Ok((input, Command::Grid(spec)))
}

fn parse_command(input: &str) -> IResult<&str, Command> {
    alt((
        parse_labels,
        map(preceded(ws(tag("values")), index_list), Command::Values),
        map(preceded(ws(tag("series")), index_list), Command::Series),
        map(preceded(ws(tag("categories")), index_list), Command::Categories),
        parse_aggregate,
        parse_grid,
    ))(input)
}

/// Parse a complete mapping pipeline. Later commands override earlier ones.
pub fn parse_mapping_spec(input: &str) -> IResult<&str, MappingSpec> {
    let (input, commands) = separated_list1(ws(tag("|")), parse_command)(input)?;
    let (input, _) = ws(eof)(input)?;

    let mut spec = MappingSpec::default();
    for command in commands {
        match command {
            Command::Labels(col) => spec.labels = Some(col),
            Command::Values(cols) => spec.values = Some(cols),
            Command::Series(cols) => spec.series = Some(cols),
            Command::Categories(cols) => spec.categories = Some(cols),
            Command::Aggregate(mode) => spec.aggregation = Some(mode),
            Command::Grid(grid) => spec.grid = Some(grid),
        }
    }

    Ok((input, spec))
}
