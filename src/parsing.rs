//! The lexical pieces of engineering notation: signs, numerals, exponents, and prefix symbols.
//! These are small `nom` parsers; deciding what the pieces mean is left to [`crate::parser`].

use nom::branch::alt;
use nom::character::complete::{char, digit1, multispace0, one_of};
use nom::combinator::{eof, fail, map, opt, recognize, value};
use nom::error::ParseError;
use nom::multi::many1;
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::IResult;

use crate::prefix::{lookup_prefix_at, Prefix};

/// A combinator that takes a parser `inner` and produces a parser that also consumes both leading and
/// trailing whitespace, returning the output of `inner`.
pub fn ws<'a, F: 'a, O, E: ParseError<&'a str>>(
    inner: F,
) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where
    F: Fn(&'a str) -> IResult<&'a str, O, E>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parses a minus sign, in many formats.
pub fn minus_sign(input: &str) -> IResult<&str, char> {
    one_of("-﹣－−")(input)
}

/// Parses an optional sign. Returns whether the number is negative.
pub fn sign(input: &str) -> IResult<&str, bool> {
    map(
        opt(alt((value(false, char('+')), value(true, minus_sign)))),
        |negative| negative.unwrap_or(false),
    )(input)
}

/// Whether `c` can separate the integer and fractional parts of a numeral.
pub fn is_decimal_separator(c: char) -> bool {
    c == '.' || c == ','
}

/// Recognizes the numeral region: digits with any number of `.` and `,` mixed in. Whether the
/// separators make sense is checked after [`normalize_interpunctuation`].
pub fn numeral_region(input: &str) -> IResult<&str, &str> {
    recognize(many1(alt((digit1, recognize(one_of(".,"))))))(input)
}

/// Parses a scientific exponent directly after a numeral, like `e-3` or `E12`, returning the
/// signed integer without the marker.
pub fn exponent(input: &str) -> IResult<&str, &str> {
    preceded(one_of("eE"), recognize(pair(opt(one_of("+-")), digit1)))(input)
}

/// Matches an exponent marker that is clearly trying to be an exponent but has no integer after
/// it, like `e-`, `e.5` or a trailing `e`. A marker followed by a letter is unit text instead
/// (`eV`).
pub fn broken_exponent(input: &str) -> IResult<&str, char> {
    terminated(one_of("eE"), alt((recognize(one_of("+-.,")), eof)))(input)
}

/// Parses an SI prefix symbol, preferring the longest spelling.
pub fn prefix_symbol(input: &str) -> IResult<&str, &'static Prefix> {
    match lookup_prefix_at(input) {
        Some((prefix, len)) => Ok((&input[len..], prefix)),
        None => fail(input),
    }
}

/// Rewrites the separators of a numeral so that `.` is the only decimal point.
///
/// - only commas: the commas are decimal points (`123,4`)
/// - both: whichever comes first is a thousands separator and is dropped (`1,234.5`, `1.234,5`)
///
/// `1,234` is undecidable between 1234 and 1.234 and is read as 1.234.
pub fn normalize_interpunctuation(numeral: &str) -> String {
    match (numeral.find(','), numeral.find('.')) {
        (None, _) => numeral.to_owned(),
        (Some(_), None) => numeral.replace(',', "."),
        (Some(comma), Some(point)) if comma < point => numeral.replace(',', ""),
        (Some(_), Some(_)) => numeral.replace('.', "").replace(',', "."),
    }
}
