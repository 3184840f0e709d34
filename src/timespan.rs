//! Durations like `1.5 h` or `250 ms`, normalized to seconds.
//!
//! Time units don't go through the prefix rules: `m` here is a minute, not milli-anything, and
//! `ms` is looked up whole. The numeral is read exactly as [`crate::parser`] reads it.

use phf::phf_map;
use tracing::debug;

use crate::parser::{scan_numeral, ParseError};

/// Seconds per unit. Months and years use the mean Gregorian year of 365.2425 days.
static TIMESPAN_UNITS: phf::Map<&'static str, f64> = phf_map! {
    "as" => 1e-18,
    "asec" => 1e-18,
    "asecs" => 1e-18,
    "attosecond" => 1e-18,
    "attoseconds" => 1e-18,

    "fs" => 1e-15,
    "fsec" => 1e-15,
    "fsecs" => 1e-15,
    "femtosecond" => 1e-15,
    "femtoseconds" => 1e-15,

    "ps" => 1e-12,
    "psec" => 1e-12,
    "psecs" => 1e-12,
    "picosecond" => 1e-12,
    "picoseconds" => 1e-12,

    "ns" => 1e-9,
    "nsec" => 1e-9,
    "nsecs" => 1e-9,
    "nanosecond" => 1e-9,
    "nanoseconds" => 1e-9,

    "\u{00B5}s" => 1e-6,
    "\u{03BC}s" => 1e-6,
    "us" => 1e-6,
    "\u{00B5}sec" => 1e-6,
    "usec" => 1e-6,
    "microsecond" => 1e-6,
    "microseconds" => 1e-6,

    "ms" => 1e-3,
    "msec" => 1e-3,
    "millisecond" => 1e-3,
    "milliseconds" => 1e-3,

    "s" => 1.0,
    "sec" => 1.0,
    "secs" => 1.0,
    "second" => 1.0,
    "seconds" => 1.0,

    "m" => 60.0,
    "min" => 60.0,
    "mins" => 60.0,
    "minute" => 60.0,
    "minutes" => 60.0,

    "h" => 3600.0,
    "hour" => 3600.0,
    "hours" => 3600.0,

    "d" => 86400.0,
    "day" => 86400.0,
    "days" => 86400.0,

    "w" => 604800.0,
    "week" => 604800.0,
    "weeks" => 604800.0,

    "mo" => 2629746.0,
    "month" => 2629746.0,
    "months" => 2629746.0,

    "y" => 31556952.0,
    "year" => 31556952.0,
    "years" => 31556952.0,

    "decade" => 315569520.0,
    "decades" => 315569520.0,
    "century" => 3155695200.0,
    "centuries" => 3155695200.0,
    "millenium" => 31556952000.0,
    "millenia" => 31556952000.0,

    "My" => 3.1556952e13,
    "Myr" => 3.1556952e13,
    "Myrs" => 3.1556952e13,
    "Gy" => 3.1556952e16,
    "Gyr" => 3.1556952e16,
    "Gyrs" => 3.1556952e16,
    "Ty" => 3.1556952e19,
    "Tyr" => 3.1556952e19,
    "Tyrs" => 3.1556952e19,
};

/// Seconds per `unit`, if it is a time unit.
pub fn seconds_per(unit: &str) -> Option<f64> {
    TIMESPAN_UNITS.get(unit).copied()
}

/// Parses a duration into seconds. A bare number is already in seconds.
///
/// ```
/// assert_eq!(engnot::parse_timespan("1.25 min"), Ok(75.0));
/// assert_eq!(engnot::parse_timespan("3600"), Ok(3600.0));
/// ```
pub fn parse_timespan(input: &str) -> Result<f64, ParseError> {
    let result = try_parse_timespan(input);
    if let Err(err) = &result {
        debug!(input, %err, "rejected timespan");
    }
    result
}

fn try_parse_timespan(input: &str) -> Result<f64, ParseError> {
    let numeral = scan_numeral(input.trim(), input)?;
    let magnitude: f64 = numeral
        .number
        .parse()
        .map_err(|_e| ParseError::InvalidNumeral(input.to_owned()))?;
    let value = if numeral.negative { -magnitude } else { magnitude };

    let unit = numeral.rest.trim();
    if unit.is_empty() {
        return Ok(value);
    }
    let factor =
        seconds_per(unit).ok_or_else(|| ParseError::UnknownTimespanUnit(unit.to_owned()))?;
    Ok(value * factor)
}
