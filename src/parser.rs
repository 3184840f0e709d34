//! Reads engineering notation like `15.0 mV`, `4k7` or `-2.2µF` into a number and a unit.
//!
//! A notation string is a sign, a numeral, an optional SI prefix, and an optional unit. The hard
//! part is that prefixes and units share an alphabet: `m` is milli or metre, `cd` is candela or
//! centi-days. Ambiguity is resolved in a fixed order:
//!
//! 1. A numeral written with a scientific exponent (`4e6`) never has a prefix.
//! 2. A prefix between two runs of digits is a decimal point (`4k7` is 4.7k).
//! 3. Text that is a known unit ([`crate::units`]) is that unit, unsplit.
//! 4. A prefix followed by more text is a prefix (`mV`, `m V`), unless that text starts with a
//!    digit (`m2` stays whole).
//! 5. Anything else, including a lone prefix character, is the unit.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;

use nom::character::complete::digit1;
use nom::sequence::pair;
use thiserror::Error;
use tracing::{debug, trace};

use crate::format::{self, DEFAULT_SIGNIFICANT_DIGITS};
use crate::parsing::{
    broken_exponent, exponent, is_decimal_separator, normalize_interpunctuation, numeral_region,
    prefix_symbol, sign, ws,
};
use crate::prefix::Prefix;
use crate::units::is_known_unit;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    #[error("No digits found in {0:?}")]
    NoDigitsFound(String),
    #[error("{0:?} does not start with a number")]
    InvalidNumeral(String),
    #[error("More than one decimal separator in {0:?}")]
    MultipleDecimalSeparators(String),
    #[error("Malformed exponent in {0:?}")]
    MalformedExponent(String),
    #[error("Expected unit {expected:?}, found {found:?}")]
    UnitMismatch { expected: String, found: String },
    #[error("Unknown timespan unit {0:?}")]
    UnknownTimespanUnit(String),
}

/// How the numeral of a notation string was written.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Notation {
    /// Digits and at most one decimal separator, like `15.0`.
    Plain,
    /// A numeral with an exponent, like `4.7e3`. Never combined with a prefix.
    Scientific,
    /// A prefix standing in for the decimal point, like `4k7`.
    PrefixAsDecimalPoint,
}

/// A notation string taken apart, before any arithmetic happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// Whether a minus sign was consumed.
    pub negative: bool,
    /// The unsigned numeral in a form [`f64::from_str`] accepts: `.` as the decimal point,
    /// thousands separators removed, and any exponent kept.
    pub number: String,
    /// The prefix consumed, if any.
    pub prefix: Option<&'static Prefix>,
    /// Whatever followed the numeral and prefix, trimmed.
    pub unit: String,
    pub notation: Notation,
}

impl Split {
    /// The decimal exponent contributed by the prefix.
    pub fn exponent(&self) -> i8 {
        self.prefix.map_or(0, |p| p.exponent)
    }

    /// The unsigned value as a single float literal. The prefix becomes an exponent instead of a
    /// multiplication, so the value is rounded once: `15.0e-3` is exactly the float `0.015`,
    /// while `15.0 * 0.001` is not.
    pub fn literal(&self) -> String {
        match self.prefix {
            Some(prefix) => format!("{}e{}", self.number, prefix.exponent),
            None => self.number.clone(),
        }
    }
}

/// A parsed quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedValue {
    /// The value with the prefix multiplier already applied.
    pub value: f64,
    /// The unit, without prefix. Empty if there was none.
    pub unit: String,
    /// The prefix that was applied to reach `value`, if any.
    pub prefix: Option<&'static Prefix>,
}

impl ParsedValue {
    pub fn into_parts(self) -> (f64, String) {
        (self.value, self.unit)
    }
}

impl FromStr for ParsedValue {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Formats with the best-fitting prefix. The precision, if given, is the number of significant
/// digits: `format!("{:.4}", v)`.
impl Display for ParsedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits = f.precision().unwrap_or(DEFAULT_SIGNIFICANT_DIGITS);
        write!(f, "{}", format::format(self.value, &self.unit, digits))
    }
}

/// The numeric head of a notation string: sign, numeral, and exponent.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Numeral<'a> {
    pub negative: bool,
    pub number: String,
    pub scientific: bool,
    /// Everything after the numeral, untrimmed.
    pub rest: &'a str,
}

/// Reads the sign, numeral and exponent at the start of `text`. `input` is the original string,
/// used in errors.
pub(crate) fn scan_numeral<'a>(text: &'a str, input: &str) -> Result<Numeral<'a>, ParseError> {
    if !text.contains(|c: char| c.is_ascii_digit()) {
        return Err(ParseError::NoDigitsFound(input.to_owned()));
    }
    let invalid = || ParseError::InvalidNumeral(input.to_owned());

    let (rest, negative) = ws(sign)(text).map_err(|_| invalid())?;
    let (rest, region) = numeral_region(rest).map_err(|_| invalid())?;
    if !region.contains(|c: char| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let mut number = normalize_interpunctuation(region);
    if number.matches('.').count() > 1 {
        return Err(ParseError::MultipleDecimalSeparators(input.to_owned()));
    }

    match exponent(rest) {
        Ok((rest, exp)) => {
            if rest.starts_with(is_decimal_separator) {
                return Err(ParseError::MalformedExponent(input.to_owned()));
            }
            number.push('e');
            number.push_str(exp);
            Ok(Numeral {
                negative,
                number,
                scientific: true,
                rest,
            })
        }
        Err(_) if broken_exponent(rest).is_ok() => {
            Err(ParseError::MalformedExponent(input.to_owned()))
        }
        Err(_) => Ok(Numeral {
            negative,
            number,
            scientific: false,
            rest,
        }),
    }
}

/// An engineering-notation parser. The default parser knows the built-in unit table; more units
/// can be added per instance with [`Parser::with_unit`]. The prefix table cannot be extended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parser {
    extra_units: BTreeSet<String>,
}

const DEFAULT_PARSER: Parser = Parser::new();

impl Parser {
    pub const fn new() -> Self {
        Self {
            extra_units: BTreeSet::new(),
        }
    }

    /// Treats `unit` as a whole unit that is never split into prefix and unit.
    pub fn with_unit<T: Into<String>>(mut self, unit: T) -> Self {
        self.extra_units.insert(unit.into());
        self
    }

    pub fn is_known_unit(&self, unit: &str) -> bool {
        is_known_unit(unit) || self.extra_units.contains(unit)
    }

    /// Takes a notation string apart without computing its value.
    pub fn split(&self, input: &str) -> Result<Split, ParseError> {
        let numeral = scan_numeral(input.trim(), input)?;

        let (prefix, unit, notation) = if numeral.scientific {
            (None, numeral.rest.trim(), Notation::Scientific)
        } else if let Ok((rest, (prefix, fraction))) = pair(prefix_symbol, digit1)(numeral.rest) {
            // "4k7": the prefix is the decimal point, so there can't be another one.
            if numeral.number.contains('.') || rest.starts_with(is_decimal_separator) {
                return Err(ParseError::MultipleDecimalSeparators(input.to_owned()));
            }
            let mut number = numeral.number;
            number.push('.');
            number.push_str(fraction);
            return self.finish(
                input,
                Split {
                    negative: numeral.negative,
                    number,
                    prefix: Some(prefix),
                    unit: rest.trim().to_owned(),
                    notation: Notation::PrefixAsDecimalPoint,
                },
            );
        } else {
            let (prefix, unit) = self.resolve_unit(numeral.rest.trim());
            (prefix, unit, Notation::Plain)
        };

        self.finish(
            input,
            Split {
                negative: numeral.negative,
                number: numeral.number,
                prefix,
                unit: unit.to_owned(),
                notation,
            },
        )
    }

    /// Rejects a unit that starts with a digit: that is a second number, not a unit.
    fn finish(&self, input: &str, split: Split) -> Result<Split, ParseError> {
        if split.unit.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(ParseError::InvalidNumeral(input.to_owned()));
        }
        trace!(input, ?split, "split engineering notation");
        Ok(split)
    }

    /// Separates the prefix from the unit in the text after a numeral.
    fn resolve_unit<'a>(&self, text: &'a str) -> (Option<&'static Prefix>, &'a str) {
        if self.is_known_unit(text) {
            return (None, text);
        }
        match prefix_symbol(text) {
            // A prefix needs a unit to apply to: a lone "m" is metres, "m2" is square metres.
            Ok((unit, prefix)) => {
                let unit = unit.trim_start();
                if unit.is_empty() || unit.starts_with(|c: char| c.is_ascii_digit()) {
                    (None, text)
                } else {
                    (Some(prefix), unit)
                }
            }
            Err(_) => (None, text),
        }
    }

    /// Parses a notation string into a value and unit.
    pub fn parse(&self, input: &str) -> Result<ParsedValue, ParseError> {
        self.try_parse(input).map_err(|err| {
            debug!(input, %err, "rejected engineering notation");
            err
        })
    }

    fn try_parse(&self, input: &str) -> Result<ParsedValue, ParseError> {
        let split = self.split(input)?;
        let magnitude: f64 = split
            .literal()
            .parse()
            .map_err(|_e| ParseError::InvalidNumeral(input.to_owned()))?;

        Ok(ParsedValue {
            value: if split.negative { -magnitude } else { magnitude },
            unit: split.unit,
            prefix: split.prefix,
        })
    }

    /// Parses a notation string, discarding the unit.
    pub fn parse_numeric(&self, input: &str) -> Result<f64, ParseError> {
        self.parse(input).map(|parsed| parsed.value)
    }

    /// Parses a notation string whose unit, if it has one, must be `unit`. A missing unit is
    /// accepted.
    pub fn parse_expecting_unit(&self, input: &str, unit: &str) -> Result<f64, ParseError> {
        let parsed = self.parse(input)?;
        if !parsed.unit.is_empty() && parsed.unit != unit {
            let err = ParseError::UnitMismatch {
                expected: unit.to_owned(),
                found: parsed.unit,
            };
            debug!(input, %err, "rejected engineering notation");
            return Err(err);
        }
        Ok(parsed.value)
    }
}

/// Parses with the default [`Parser`].
pub fn parse(input: &str) -> Result<ParsedValue, ParseError> {
    DEFAULT_PARSER.parse(input)
}

/// Splits with the default [`Parser`].
pub fn split(input: &str) -> Result<Split, ParseError> {
    DEFAULT_PARSER.split(input)
}

/// Parses with the default [`Parser`], discarding the unit.
pub fn parse_numeric(input: &str) -> Result<f64, ParseError> {
    DEFAULT_PARSER.parse_numeric(input)
}

/// See [`Parser::parse_expecting_unit`].
pub fn parse_expecting_unit(input: &str, unit: &str) -> Result<f64, ParseError> {
    DEFAULT_PARSER.parse_expecting_unit(input, unit)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    use crate::prefix::{DECA, KILO, MEGA, MICRO, MILLI};

    use super::*;

    fn parts(input: &str) -> (f64, String) {
        parse(input).unwrap().into_parts()
    }

    #[test]
    fn test_common_notation() {
        assert_eq!(parts("15.0 mV"), (0.015, "V".to_string()));
        assert_eq!(parts("4k7"), (4700.0, "".to_string()));
        assert_eq!(parts("-2.2µF"), (-0.0000022, "F".to_string()));
        assert_eq!(parts("-2.2uF"), parts("-2.2µF"));
        assert_eq!(parts("-2.2μF"), parts("-2.2µF"));
    }

    #[test]
    fn test_plain() {
        assert_eq!(parts("1234"), (1234.0, "".to_string()));
        assert_eq!(parts("  42 V "), (42.0, "V".to_string()));
        assert_eq!(parts("1A"), (1.0, "A".to_string()));
        assert_eq!(parts("0 Ω"), (0.0, "Ω".to_string()));
        assert_eq!(parts("+5"), (5.0, "".to_string()));
        assert_eq!(parts("- 5 V"), (-5.0, "V".to_string()));
        assert_eq!(parts("1."), (1.0, "".to_string()));
        assert_eq!(parts(".5 s"), (0.5, "s".to_string()));
        assert_eq!(parts("3.20 €"), (3.2, "€".to_string()));
        assert_eq!(parts("3.2 °C"), (3.2, "°C".to_string()));
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(parts("100 kΩ"), (1e5, "Ω".to_string()));
        assert_eq!(parts("1234kΩ"), (1234e3, "Ω".to_string()));
        assert_eq!(parts("3.2 MHz"), (3.2e6, "Hz".to_string()));
        assert_eq!(parts("100 mV"), (0.1, "V".to_string()));
        assert_eq!(parts("5 mm"), (0.005, "m".to_string()));
        assert_eq!(parts("2 dam"), (20.0, "m".to_string()));
        assert_eq!(parts("1 hPa"), (100.0, "Pa".to_string()));
        assert_eq!(parts("3 kmin"), (3000.0, "min".to_string()));
        assert_eq!(parse("3.2 MHz").unwrap().prefix, Some(&MEGA));
        assert_eq!(parse("4 uA").unwrap().prefix, Some(&MICRO));
    }

    #[test]
    fn test_interpunctuation() {
        assert_eq!(parts("1,234kΩ"), (1234.0, "Ω".to_string()));
        assert_eq!(parts("1,234.56kΩ"), (1234560.0, "Ω".to_string()));
        assert_eq!(parts("1.234,56 kΩ"), (1234560.0, "Ω".to_string()));
        assert_eq!(parts("-1,234.56kΩ"), (-1234560.0, "Ω".to_string()));
        assert_eq!(parts("2,5 mA"), (0.0025, "A".to_string()));
    }

    #[test]
    fn test_prefix_as_decimal_point() {
        assert_eq!(parts("1k234"), (1234.0, "".to_string()));
        assert_eq!(parts("1k234Ω"), (1234.0, "Ω".to_string()));
        assert_eq!(parts("1k234 Ω"), (1234.0, "Ω".to_string()));
        assert_eq!(parts("3k2 °C"), (3200.0, "°C".to_string()));
        assert_eq!(parts("2da5"), (25.0, "".to_string()));
        assert_relative_eq!(parse("1µ234 Ω").unwrap().value, 1.234e-6);
        assert_relative_eq!(parse("4m7").unwrap().value, 4.7e-3);

        let split = split("4k7").unwrap();
        assert_eq!(split.notation, Notation::PrefixAsDecimalPoint);
        assert_eq!(split.number, "4.7");
        assert_eq!(split.prefix, Some(&KILO));
    }

    #[test]
    fn test_scientific() {
        assert_eq!(parts("4e6A"), (4e6, "A".to_string()));
        assert_eq!(parts("-1e3 V"), (-1e3, "V".to_string()));
        assert_eq!(parts("1e-3"), (1e-3, "".to_string()));
        assert_eq!(parts("2.5E+2 Hz"), (250.0, "Hz".to_string()));
        // No prefix after an exponent: the rest is all unit.
        assert_eq!(parts("4e6nA"), (4e6, "nA".to_string()));
        assert_eq!(split("4E7").unwrap().notation, Notation::Scientific);
        // An exponent marker followed by a letter is unit text.
        assert_eq!(parts("5 eV"), (5.0, "eV".to_string()));
        assert_eq!(parts("5eV"), (5.0, "eV".to_string()));
    }

    #[test]
    fn test_lone_prefix_is_unit() {
        assert_eq!(parts("5 m"), (5.0, "m".to_string()));
        assert_eq!(parts("5m"), (5.0, "m".to_string()));
        assert_eq!(parts("1 h"), (1.0, "h".to_string()));
        assert_eq!(parts("2 T"), (2.0, "T".to_string()));
        assert_eq!(parts("3 da"), (3.0, "da".to_string()));
        assert_eq!(parse("5 m").unwrap().prefix, None);
    }

    #[test]
    fn test_known_units_are_not_split() {
        assert_eq!(parts("5 cd"), (5.0, "cd".to_string()));
        assert_eq!(parts("5 min"), (5.0, "min".to_string()));
        assert_eq!(parts("5 ppm"), (5.0, "ppm".to_string()));
        assert_eq!(parts("5 Pa"), (5.0, "Pa".to_string()));
        assert_eq!(parts("3 dB"), (3.0, "dB".to_string()));
        assert_eq!(parts("5 %"), (5.0, "%".to_string()));

        assert_eq!(parts("2 mi"), (0.002, "i".to_string()));
        let parser = Parser::new().with_unit("mi");
        assert_eq!(parser.parse("2 mi").unwrap().into_parts(), (2.0, "mi".to_string()));
    }

    #[test]
    fn test_prefix_before_spaced_unit() {
        assert_eq!(parts("5 m V"), (0.005, "V".to_string()));
        assert_eq!(parts("5 k Ω"), (5000.0, "Ω".to_string()));
        assert_eq!(parts("5 k  Ω "), (5000.0, "Ω".to_string()));
        assert_eq!(parse("5 mV").unwrap().prefix, Some(&MILLI));
        assert_eq!(parse("5 k Ω").unwrap().prefix, Some(&KILO));
        assert_eq!(parse("5 dam").unwrap().prefix, Some(&DECA));
        // Still a lone prefix when nothing but whitespace follows.
        assert_eq!(parts("5 k "), (5.0, "k".to_string()));
    }

    #[test]
    fn test_digit_after_prefix_is_unit_text() {
        assert_eq!(parts("5 m2"), (5.0, "m2".to_string()));
        assert_eq!(parts("5 m 2"), (5.0, "m 2".to_string()));
        assert_eq!(parse("5 m2").unwrap().prefix, None);
        // Without the space it is still a prefix used as a decimal point.
        assert_relative_eq!(parse("5m2").unwrap().value, 5.2e-3);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse("abc"),
            Err(ParseError::NoDigitsFound("abc".to_string()))
        );
        assert_eq!(parse(""), Err(ParseError::NoDigitsFound("".to_string())));
        assert_eq!(
            parse("1.2.3"),
            Err(ParseError::MultipleDecimalSeparators("1.2.3".to_string()))
        );
        assert!(matches!(
            parse("1,2,3 V"),
            Err(ParseError::MultipleDecimalSeparators(_))
        ));
        assert!(matches!(
            parse("1.2k3"),
            Err(ParseError::MultipleDecimalSeparators(_))
        ));
        assert!(matches!(
            parse("1k2.3"),
            Err(ParseError::MultipleDecimalSeparators(_))
        ));
        assert!(matches!(parse("1e-"), Err(ParseError::MalformedExponent(_))));
        assert_eq!(parse("1e"), Err(ParseError::MalformedExponent("1e".to_string())));
        assert_eq!(parse("1E"), Err(ParseError::MalformedExponent("1E".to_string())));
        assert!(matches!(parse("-2.5e"), Err(ParseError::MalformedExponent(_))));
        assert!(matches!(parse("1e+V"), Err(ParseError::MalformedExponent(_))));
        assert!(matches!(parse("1e.5"), Err(ParseError::MalformedExponent(_))));
        assert!(matches!(parse("1e3.5"), Err(ParseError::MalformedExponent(_))));
        assert!(matches!(parse("k12"), Err(ParseError::InvalidNumeral(_))));
        assert!(matches!(parse("V 5"), Err(ParseError::InvalidNumeral(_))));
        assert!(matches!(parse("-.V2"), Err(ParseError::InvalidNumeral(_))));
        assert!(matches!(parse("1 2"), Err(ParseError::InvalidNumeral(_))));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ParseError::NoDigitsFound("abc".to_string()).to_string(),
            "No digits found in \"abc\""
        );
        assert_eq!(
            ParseError::UnitMismatch {
                expected: "V".to_string(),
                found: "A".to_string()
            }
            .to_string(),
            "Expected unit \"V\", found \"A\""
        );
    }

    #[test]
    fn test_parse_expecting_unit() {
        assert_eq!(parse_expecting_unit("100 kΩ", "Ω"), Ok(1e5));
        assert_eq!(parse_expecting_unit("100", "Ω"), Ok(100.0));
        assert_eq!(
            parse_expecting_unit("100 mA", "V"),
            Err(ParseError::UnitMismatch {
                expected: "V".to_string(),
                found: "A".to_string()
            })
        );
        assert!(matches!(
            parse_expecting_unit("x", "V"),
            Err(ParseError::NoDigitsFound(_))
        ));
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("1k5"), Ok(1500.0));
        // A lone prefix is a unit, which parse_numeric throws away.
        assert_eq!(parse_numeric("1.5k"), Ok(1.5));
        assert_eq!(parse_numeric("2.3 kV"), Ok(2300.0));
    }

    #[test]
    fn test_from_str_and_display() {
        let v: ParsedValue = "4k7 Ω".parse().unwrap();
        assert_eq!(v.value, 4700.0);
        assert_eq!(v.to_string(), "4.70 kΩ");
        assert_eq!(format!("{:.2}", v), "4.7 kΩ");
    }

    #[test]
    fn test_split_literal() {
        let split = split("15.0 mV").unwrap();
        assert_eq!(
            split,
            Split {
                negative: false,
                number: "15.0".to_string(),
                prefix: Some(&MILLI),
                unit: "V".to_string(),
                notation: Notation::Plain,
            }
        );
        assert_eq!(split.literal(), "15.0e-3");
        assert_eq!(split.exponent(), -3);
    }
}
