//! Units that must be read whole. Many unit symbols begin with a character that is also an SI
//! prefix: read naively, `5 cd` would be five centi-days instead of five candela. Any text that
//! appears in this table after a number is taken as the unit with no prefix.
//!
//! Prefixed spellings (`ms`, `km`, `mmol`) are deliberately absent: those are a prefix plus a
//! unit. Plain `m` is absent too, since a lone prefix character is always a unit anyway.

use phf::phf_set;

static KNOWN_UNITS: phf::Set<&'static str> = phf_set! {
    // Electrical. The two Ω are different code points (Greek capital omega and the ohm sign).
    "F", "A", "\u{03A9}", "\u{2126}", "R", "W", "H", "C", "K", "Hz", "V", "J", "S", "T",
    // Time
    "s", "h", "min", "hour", "hours", "day", "days",
    // Fractions
    "ppm", "ppb", "%",
    // Lighting
    "lm", "lx", "cd",
    // Pressure, amount, level
    "Pa", "mol", "dB",
    // Composite
    "C/W", "€/km", "€/m", "F/m",
    // Length
    "Å", "Angstrom", "angstrom", "meter", "meters", "mil", "in", "\"", "inch", "inches",
    "foot", "feet", "ft", "yd", "yard", "mile", "miles", "pt", "point", "points",
    "au", "AU", "AUs", "ly", "lightyear", "lightyears", "nautical mile", "nautical miles",
    "pc", "parsec", "parsecs",
    // Currencies
    "€", "$", "元", "﷼", "₽", "௹", "૱", "₺", "Zł", "₩", "¥",
};

/// Whether `unit` is in the built-in table of units that are never split into a prefix.
pub fn is_known_unit(unit: &str) -> bool {
    KNOWN_UNITS.contains(unit)
}
