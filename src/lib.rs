//! Engineering notation: numbers written with an SI prefix in place of a power of ten, like
//! `15.0 mV`, `4k7 Ω` or `2.2µF`.
//!
//! ```
//! use engnot::{format, parse};
//!
//! let parsed = parse("15.0 mV").unwrap();
//! assert_eq!(parsed.value, 0.015);
//! assert_eq!(parsed.unit, "V");
//! assert_eq!(format(parsed.value, &parsed.unit, 3), "15.0 mV");
//! ```

pub mod format;
pub mod parser;
pub mod parsing;
pub mod prefix;
pub mod timespan;
pub mod units;

pub use format::{
    format, format_value, format_with, FormatOptions, DEFAULT_SIGNIFICANT_DIGITS,
    MAX_SIGNIFICANT_DIGITS,
};
pub use parser::{
    parse, parse_expecting_unit, parse_numeric, split, Notation, ParseError, ParsedValue, Parser,
    Split,
};
pub use prefix::{exponent_for, symbol_for, Prefix, PREFIXES};
pub use timespan::parse_timespan;
