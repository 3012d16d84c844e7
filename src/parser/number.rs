// Lenient number parsing for table cells.
//
// Accepts the longest numeric prefix after leading whitespace, the way a
// script `parseFloat` does: "12px" -> 12, "1e3x" -> 1000, "1e" -> 1,
// "-Infinity" -> -inf. Anything without a numeric prefix is NaN.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit0, digit1, one_of},
    combinator::{map, opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

use crate::data::Cell;

fn sign(input: &str) -> IResult<&str, Option<char>> {
    opt(one_of("+-"))(input)
}

/// Decimal literal with optional fraction and exponent.
/// The exponent is optional as a whole, so "1e" backtracks to "1".
fn decimal(input: &str) -> IResult<&str, f64> {
    let (rest, text) = recognize(tuple((
        sign,
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        opt(tuple((one_of("eE"), sign, digit1))),
    )))(input)?;

    // The recognized text is always valid float syntax
    match text.parse::<f64>() {
        Ok(v) => Ok((rest, v)),
        Err(_) => Ok((rest, f64::NAN)),
    }
}

fn infinity(input: &str) -> IResult<&str, f64> {
    map(pair(sign, tag("Infinity")), |(s, _)| {
        if s == Some('-') { f64::NEG_INFINITY } else { f64::INFINITY }
    })(input)
}

/// Parse the numeric prefix of `input`, or NaN when there is none
pub fn parse_float(input: &str) -> f64 {
    let trimmed = input.trim_start();
    match alt((infinity, decimal))(trimmed) {
        Ok((_, v)) => v,
        Err(_) => f64::NAN,
    }
}

/// Lenient parse of a cell's stringified value
pub fn parse_cell(cell: &Cell) -> f64 {
    match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => parse_float(s),
        Cell::Empty => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_float("10"), 10.0);
        assert_eq!(parse_float("-2.5"), -2.5);
        assert_eq!(parse_float("+.5"), 0.5);
        assert_eq!(parse_float("3."), 3.0);
        assert_eq!(parse_float("1.5e3"), 1500.0);
    }

    #[test]
    fn test_prefix_and_whitespace() {
        assert_eq!(parse_float("  42 apples"), 42.0);
        assert_eq!(parse_float("12px"), 12.0);
        assert_eq!(parse_float("1e"), 1.0);
        assert_eq!(parse_float("1e+"), 1.0);
        assert_eq!(parse_float("7.2.1"), 7.2);
    }

    #[test]
    fn test_infinity() {
        assert_eq!(parse_float("Infinity"), f64::INFINITY);
        assert_eq!(parse_float("-Infinityx"), f64::NEG_INFINITY);
    }

    #[test]
    fn test_not_a_number() {
        assert!(parse_float("abc").is_nan());
        assert!(parse_float("").is_nan());
        assert!(parse_float("-").is_nan());
        assert!(parse_float(".").is_nan());
        assert!(parse_float("$5").is_nan());
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell(&Cell::Number(4.0)), 4.0);
        assert_eq!(parse_cell(&Cell::from("4,000")), 4.0);
        assert!(parse_cell(&Cell::Empty).is_nan());
    }
}
