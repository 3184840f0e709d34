//! The SI prefix table shared by the parser and the formatter. The table is closed: every prefix
//! is a compile-time constant and there is no way to register more at runtime.

use phf::phf_map;

/// An SI prefix: a symbol standing in for a power-of-ten multiplier, like `k` for 10³.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Prefix {
    /// The canonical symbol, used when formatting.
    pub symbol: &'static str,
    /// A spelling restricted to ASCII. Identical to `symbol` for everything but micro.
    pub ascii: &'static str,
    /// The English name of the prefix.
    pub name: &'static str,
    /// The decimal exponent of the multiplier.
    pub exponent: i8,
}

macro_rules! prefix {
    ($i:ident, $sym:literal, $asc:literal, $name:literal, $exp:literal) => {
        pub const $i: Prefix = Prefix::new($sym, $asc, $name, $exp);
    };
}

prefix!(YOCTO, "y", "y", "yocto", -24);
prefix!(ZEPTO, "z", "z", "zepto", -21);
prefix!(ATTO, "a", "a", "atto", -18);
prefix!(FEMTO, "f", "f", "femto", -15);
prefix!(PICO, "p", "p", "pico", -12);
prefix!(NANO, "n", "n", "nano", -9);
prefix!(MICRO, "\u{00B5}", "u", "micro", -6);
prefix!(MILLI, "m", "m", "milli", -3);
prefix!(CENTI, "c", "c", "centi", -2);
prefix!(DECI, "d", "d", "deci", -1);
prefix!(DECA, "da", "da", "deca", 1);
prefix!(HECTO, "h", "h", "hecto", 2);
prefix!(KILO, "k", "k", "kilo", 3);
prefix!(MEGA, "M", "M", "mega", 6);
prefix!(GIGA, "G", "G", "giga", 9);
prefix!(TERA, "T", "T", "tera", 12);
prefix!(PETA, "P", "P", "peta", 15);
prefix!(EXA, "E", "E", "exa", 18);
prefix!(ZETTA, "Z", "Z", "zetta", 21);
prefix!(YOTTA, "Y", "Y", "yotta", 24);

/// Every prefix, in ascending order of exponent.
pub static PREFIXES: [Prefix; 20] = [
    YOCTO, ZEPTO, ATTO, FEMTO, PICO, NANO, MICRO, MILLI, CENTI, DECI, DECA, HECTO, KILO, MEGA,
    GIGA, TERA, PETA, EXA, ZETTA, YOTTA,
];

/// The smallest exponent with a prefix.
pub const MIN_EXPONENT: i8 = -24;
/// The largest exponent with a prefix.
pub const MAX_EXPONENT: i8 = 24;

/// Every spelling accepted on input. Micro has two non-canonical spellings: the ASCII `u` and the
/// Greek small letter mu, which looks identical to the micro sign but is a different code point.
static SYMBOL_EXPONENTS: phf::Map<&'static str, i8> = phf_map! {
    "y" => -24,
    "z" => -21,
    "a" => -18,
    "f" => -15,
    "p" => -12,
    "n" => -9,
    "\u{00B5}" => -6,
    "\u{03BC}" => -6,
    "u" => -6,
    "m" => -3,
    "c" => -2,
    "d" => -1,
    "da" => 1,
    "h" => 2,
    "k" => 3,
    "M" => 6,
    "G" => 9,
    "T" => 12,
    "P" => 15,
    "E" => 18,
    "Z" => 21,
    "Y" => 24,
};

impl Prefix {
    pub const fn new(
        symbol: &'static str,
        ascii: &'static str,
        name: &'static str,
        exponent: i8,
    ) -> Self {
        Self {
            symbol,
            ascii,
            name,
            exponent,
        }
    }

    /// The prefix for an exponent, if there is one. There is no prefix for 10⁰.
    pub const fn for_exponent(exponent: i8) -> Option<&'static Prefix> {
        match exponent {
            -24 => Some(&YOCTO),
            -21 => Some(&ZEPTO),
            -18 => Some(&ATTO),
            -15 => Some(&FEMTO),
            -12 => Some(&PICO),
            -9 => Some(&NANO),
            -6 => Some(&MICRO),
            -3 => Some(&MILLI),
            -2 => Some(&CENTI),
            -1 => Some(&DECI),
            1 => Some(&DECA),
            2 => Some(&HECTO),
            3 => Some(&KILO),
            6 => Some(&MEGA),
            9 => Some(&GIGA),
            12 => Some(&TERA),
            15 => Some(&PETA),
            18 => Some(&EXA),
            21 => Some(&ZETTA),
            24 => Some(&YOTTA),
            _ => None,
        }
    }

    /// Looks up a prefix by any accepted spelling, including `u` for micro.
    pub fn from_symbol(symbol: &str) -> Option<&'static Prefix> {
        exponent_for(symbol).and_then(Self::for_exponent)
    }
}

/// The exponent for a prefix symbol. Accepts the ASCII fallback `u` and Greek `μ` for micro.
pub fn exponent_for(symbol: &str) -> Option<i8> {
    SYMBOL_EXPONENTS.get(symbol).copied()
}

/// The canonical symbol for an exponent. Micro is always `µ`, never the ASCII fallback.
pub fn symbol_for(exponent: i8) -> Option<&'static str> {
    Prefix::for_exponent(exponent).map(|p| p.symbol)
}

/// Finds the prefix spelled at the very start of `text`, preferring the longest spelling so that
/// `da` is never read as `d` followed by `a`. Returns the prefix and its length in bytes.
pub fn lookup_prefix_at(text: &str) -> Option<(&'static Prefix, usize)> {
    let ends: Vec<usize> = text
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take(2)
        .collect();

    ends.into_iter()
        .rev()
        .find_map(|end| Prefix::from_symbol(&text[..end]).map(|p| (p, end)))
}
