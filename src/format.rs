//! Renders numbers in engineering notation: a mantissa between 1 and 1000, rounded to a number of
//! significant digits, followed by the SI prefix for the power of 1000 that was factored out.
//!
//! Rounding is round-half-away-from-zero on the binary value ([`f64::round`]). A value whose
//! mantissa rounds up to 1000 moves to the next prefix: 999999 Hz is `1.00 MHz`, not
//! `1000 kHz`. Values too large or small for any prefix fall back to scientific notation.

use num_traits::Float;
use tracing::trace;

use crate::prefix::{Prefix, MAX_EXPONENT, MIN_EXPONENT};

/// The number of significant digits used when none is given.
pub const DEFAULT_SIGNIFICANT_DIGITS: usize = 3;

/// An `f64` carries no more than this many significant decimal digits. Larger requests are
/// capped.
pub const MAX_SIGNIFICANT_DIGITS: usize = 17;

/// How to render a value. Built per call and not changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatOptions {
    /// Digits to keep. Zero is treated as one, and anything above [`MAX_SIGNIFICANT_DIGITS`]
    /// as that maximum.
    pub significant_digits: usize,
    /// Appended after the prefix, with no separator.
    pub unit: String,
    /// Writes the prefix in place of the decimal point, as in `4k7`.
    pub use_fraction_notation: bool,
    /// Writes `u` instead of `µ`.
    pub ascii: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
            unit: String::new(),
            use_fraction_notation: false,
            ascii: false,
        }
    }
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit<T: Into<String>>(unit: T) -> Self {
        Self::default().unit(unit)
    }

    pub fn unit<T: Into<String>>(mut self, unit: T) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn significant_digits(mut self, digits: usize) -> Self {
        self.significant_digits = digits;
        self
    }

    pub fn fraction_notation(mut self, enabled: bool) -> Self {
        self.use_fraction_notation = enabled;
        self
    }

    pub fn ascii(mut self, enabled: bool) -> Self {
        self.ascii = enabled;
        self
    }

    /// Renders `value` with these options.
    pub fn format(&self, value: f64) -> String {
        let digits = self.significant_digits.clamp(1, MAX_SIGNIFICANT_DIGITS);

        if value.is_nan() {
            return join("NaN".to_string(), &self.unit);
        }
        if value.is_infinite() {
            let token = if value > 0.0 { "inf" } else { "-inf" };
            return join(token.to_string(), &self.unit);
        }
        if value == 0.0 {
            return join("0".to_string(), &self.unit);
        }

        let Some((mantissa, prefix)) = engineering_parts(value, digits) else {
            trace!(value, "no prefix in range, using scientific notation");
            return join(format!("{:.*e}", digits - 1, value), &self.unit);
        };

        let number = render_mantissa(mantissa, digits);
        let Some(prefix) = prefix else {
            return join(number, &self.unit);
        };
        let symbol = if self.ascii { prefix.ascii } else { prefix.symbol };

        if self.use_fraction_notation {
            if let Some((integer, fraction)) = number.split_once('.') {
                let fraction = fraction.trim_end_matches('0');
                if !fraction.is_empty() {
                    return join(format!("{integer}{symbol}{fraction}"), &self.unit);
                }
            }
        }

        join(number, &format!("{symbol}{}", self.unit))
    }
}

/// Formats `value` with `significant_digits` digits and the best-fitting prefix for `unit`.
///
/// ```
/// assert_eq!(engnot::format(0.015, "V", 3), "15.0 mV");
/// assert_eq!(engnot::format(999999.0, "Hz", 3), "1.00 MHz");
/// ```
pub fn format(value: f64, unit: &str, significant_digits: usize) -> String {
    FormatOptions::with_unit(unit)
        .significant_digits(significant_digits)
        .format(value)
}

/// Formats `value` with `options`. Same as [`FormatOptions::format`].
pub fn format_with(value: f64, options: &FormatOptions) -> String {
    options.format(value)
}

/// Like [`FormatOptions::format`], for any float type.
pub fn format_value<T: Float>(value: T, options: &FormatOptions) -> String {
    options.format(value.to_f64().unwrap_or(f64::NAN))
}

/// Joins a number and the text after it, leaving out the space when there is no text.
fn join(number: String, suffix: &str) -> String {
    if suffix.is_empty() {
        number
    } else {
        format!("{number} {suffix}")
    }
}

/// The exponent of the leading digit of `x`, i.e. `floor(log10(|x|))` for nonzero `x`. Read off
/// the shortest decimal representation, since `log10` can land a hair on the wrong side of an
/// exact power of ten.
fn decimal_exponent(x: f64) -> i32 {
    let repr = format!("{:e}", x.abs());
    repr.split_once('e')
        .and_then(|(_, exp)| exp.parse().ok())
        .unwrap_or_else(|| x.abs().log10().floor() as i32)
}

/// Multiplies `x` by `10^-exponent`, using whichever operation keeps the power of ten exact.
fn scale(x: f64, exponent: i32) -> f64 {
    if exponent >= 0 {
        x / 10f64.powi(exponent)
    } else {
        x * 10f64.powi(-exponent)
    }
}

/// Rounds `x` to `digits` significant digits, half away from zero.
fn round_significant(x: f64, digits: usize) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    let decimals = digits as i32 - 1 - decimal_exponent(x);
    let rounded = scale(scale(x, -decimals).round(), decimals);
    if rounded.is_finite() {
        rounded
    } else {
        x
    }
}

/// Splits a finite, nonzero value into a rounded mantissa and the engineering prefix it goes
/// with (`None` for 10⁰). Returns `None` if the value is out of the prefix table's range.
fn engineering_parts(value: f64, digits: usize) -> Option<(f64, Option<&'static Prefix>)> {
    // Rounding can lift a value by at most one decade, so anything further out than that can
    // skip it. This also keeps the powers of ten in `round_significant` away from overflow.
    let magnitude = decimal_exponent(value);
    if magnitude < i32::from(MIN_EXPONENT) - 1 || magnitude > i32::from(MAX_EXPONENT) + 2 {
        return None;
    }

    // The tier comes from the rounded value, so 999.9e-27 becomes 1.00 y rather than falling
    // out of the table.
    let mut tier = decimal_exponent(round_significant(value, digits)).div_euclid(3) * 3;
    if !(i32::from(MIN_EXPONENT)..=i32::from(MAX_EXPONENT)).contains(&tier) {
        return None;
    }

    let mut mantissa = round_significant(scale(value, tier), digits);
    if mantissa.abs() >= 1000.0 {
        tier += 3;
        trace!(value, tier, "mantissa rounded up to 1000, moving to the next prefix");
        if tier > i32::from(MAX_EXPONENT) {
            return None;
        }
        mantissa = round_significant(mantissa / 1000.0, digits);
    }

    if !mantissa.is_finite() {
        return None;
    }
    let tier = i8::try_from(tier).ok()?;
    Some((mantissa, Prefix::for_exponent(tier)))
}

/// Writes a rounded mantissa with exactly `digits` significant digits, padding with zeros:
/// `15.0`, `1.00`, `235`. Integer digits past `digits` are kept (`100` with one digit).
fn render_mantissa(mantissa: f64, digits: usize) -> String {
    let integer_digits = (mantissa.abs().trunc() as u64)
        .checked_ilog10()
        .map_or(1, |d| d as usize + 1);
    let decimals = digits.saturating_sub(integer_digits);
    format!("{:.*}", decimals, mantissa)
}
