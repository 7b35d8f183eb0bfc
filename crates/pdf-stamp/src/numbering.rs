//! Page number formatting and label templates

use crate::types::StampError;
use std::str::FromStr;

/// Numeral system used for page numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberStyle {
    /// `1, 2, 3`
    #[default]
    Arabic,
    /// `01, 02, 03` (minimum width 2)
    ZeroPadded,
    /// `i, ii, iii`
    RomanLower,
    /// `I, II, III`
    RomanUpper,
}

impl FromStr for NumberStyle {
    type Err = StampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(NumberStyle::Arabic),
            "01" => Ok(NumberStyle::ZeroPadded),
            "i" => Ok(NumberStyle::RomanLower),
            "I" => Ok(NumberStyle::RomanUpper),
            other => Err(StampError::Config(format!("Unknown number format: {other}"))),
        }
    }
}

/// Text wrapped around the formatted number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberTemplate {
    /// `{n}`
    #[default]
    Number,
    /// `Page {n}`
    PageN,
    /// `Page {n} of {total}`
    PageNOfTotal,
}

impl NumberTemplate {
    pub fn render(self, number: &str, total: &str) -> String {
        match self {
            NumberTemplate::Number => number.to_string(),
            NumberTemplate::PageN => format!("Page {number}"),
            NumberTemplate::PageNOfTotal => format!("Page {number} of {total}"),
        }
    }
}

impl FromStr for NumberTemplate {
    type Err = StampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "number" => Ok(NumberTemplate::Number),
            "page_n" => Ok(NumberTemplate::PageN),
            "page_n_of_total" => Ok(NumberTemplate::PageNOfTotal),
            other => Err(StampError::Config(format!("Unknown template: {other}"))),
        }
    }
}

const ROMAN_TABLE: [(i64, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Render `n` in the given numeral system.
///
/// Roman numerals have no zero or negatives; `n <= 0` renders as an empty
/// string in those styles.
pub fn format_number(n: i64, style: NumberStyle) -> String {
    match style {
        NumberStyle::Arabic => n.to_string(),
        NumberStyle::ZeroPadded => format!("{n:02}"),
        NumberStyle::RomanLower => to_roman(n).to_ascii_lowercase(),
        NumberStyle::RomanUpper => to_roman(n),
    }
}

fn to_roman(mut n: i64) -> String {
    let mut out = String::new();
    for &(value, symbol) in &ROMAN_TABLE {
        while n >= value {
            out.push_str(symbol);
            n -= value;
        }
    }
    out
}
