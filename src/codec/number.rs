//! Decimal rendering and parsing with locale separators.

use crate::locale::{FormatSettings, SymbolPosition};
use crate::mpx::{MpxError, MpxResult};

/// Shape of a rendered number: fraction digit bounds and whether the
/// integer part is grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberPattern {
    pub min_fraction: usize,
    pub max_fraction: usize,
    pub grouping: bool,
}

impl NumberPattern {
    /// Plain decimals: hours per day, numeric fields, untyped floats.
    pub const DECIMAL: Self = Self::new(2, 3, false);
    /// Units, durations and percentages.
    pub const COMPACT: Self = Self::new(0, 2, false);

    pub const fn new(min_fraction: usize, max_fraction: usize, grouping: bool) -> Self {
        Self {
            min_fraction,
            max_fraction,
            grouping,
        }
    }

    fn currency(digits: u8) -> Self {
        let digits = usize::from(digits);
        Self::new(digits, digits, true)
    }
}

/// Fails for NaN and infinities, which have no decimal rendering.
pub fn format_number(value: f64, pattern: NumberPattern, settings: &FormatSettings) -> MpxResult<String> {
    if !value.is_finite() {
        return Err(MpxError::NonFiniteNumber(value));
    }
    let rounded = format!("{:.*}", pattern.max_fraction, value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((&rounded, ""));

    let mut frac = frac_part.trim_end_matches('0');
    if frac.len() < pattern.min_fraction {
        frac = &frac_part[..pattern.min_fraction];
    }

    let mut out = String::with_capacity(rounded.len() + 4);
    let negative = value.is_sign_negative() && rounded.bytes().any(|b| matches!(b, b'1'..=b'9'));
    if negative {
        out.push('-');
    }
    if pattern.grouping {
        push_grouped(&mut out, int_part, settings.thousands_separator);
    } else {
        out.push_str(int_part);
    }
    if !frac.is_empty() {
        out.push(settings.decimal_separator);
        out.push_str(frac);
    }
    Ok(out)
}

fn push_grouped(out: &mut String, digits: &str, separator: char) {
    let len = digits.len();
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
}

pub fn format_currency(value: f64, settings: &FormatSettings) -> MpxResult<String> {
    let amount = format_number(value.abs(), NumberPattern::currency(settings.currency_digits), settings)?;
    let symbol = settings.currency_symbol.as_str();
    let body = match settings.symbol_position {
        SymbolPosition::Before => format!("{symbol}{amount}"),
        SymbolPosition::After => format!("{amount}{symbol}"),
        SymbolPosition::BeforeWithSpace => format!("{symbol} {amount}"),
        SymbolPosition::AfterWithSpace => format!("{amount} {symbol}"),
    };
    if value < 0.0 && amount.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        Ok(format!("-{body}"))
    } else {
        Ok(body)
    }
}

/// Parses a number written with the locale's separators.
///
/// Grouping separators are dropped wherever they appear. NaN and infinities
/// are rejected.
pub fn parse_number(text: &str, settings: &FormatSettings) -> Option<f64> {
    let mut normalized = String::with_capacity(text.len());
    for ch in text.trim().chars() {
        if ch == settings.decimal_separator {
            normalized.push('.');
        } else if ch == settings.thousands_separator || ch.is_whitespace() {
            continue;
        } else {
            normalized.push(ch);
        }
    }
    normalized.parse().ok().filter(|value: &f64| value.is_finite())
}

pub fn parse_currency(text: &str, settings: &FormatSettings) -> Option<f64> {
    let trimmed = text.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let symbol = settings.currency_symbol.as_str();
    let rest = if symbol.is_empty() {
        rest
    } else {
        rest.trim_start_matches(symbol).trim_end_matches(symbol)
    };
    let amount = parse_number(rest, settings)?;
    Some(if negative { -amount } else { amount })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        let settings = FormatSettings::default();
        assert_eq!(format_currency(1234567.5, &settings).unwrap(), "$1,234,567.50");
        assert_eq!(format_currency(-12.0, &settings).unwrap(), "-$12.00");
    }

    #[test]
    fn trims_to_min_fraction() {
        let settings = FormatSettings::default();
        assert_eq!(format_number(8.0, NumberPattern::DECIMAL, &settings).unwrap(), "8.00");
        assert_eq!(format_number(1.2346, NumberPattern::DECIMAL, &settings).unwrap(), "1.235");
        assert_eq!(format_number(1.5, NumberPattern::COMPACT, &settings).unwrap(), "1.5");
        assert_eq!(format_number(-0.001, NumberPattern::COMPACT, &settings).unwrap(), "0");
    }

    #[test]
    fn parses_locale_separators() {
        let settings = FormatSettings {
            thousands_separator: '.',
            decimal_separator: ',',
            ..FormatSettings::default()
        };
        assert_eq!(parse_number("1.234,5", &settings), Some(1234.5));
        assert_eq!(parse_currency("$1.234,50", &settings), Some(1234.5));
    }

    #[test]
    fn non_finite_values_are_refused() {
        let settings = FormatSettings::default();
        assert_eq!(parse_number("NaN", &settings), None);
        assert_eq!(parse_number("inf", &settings), None);
        assert_eq!(parse_currency("-infinity", &settings), None);
        assert!(matches!(
            format_number(f64::NAN, NumberPattern::DECIMAL, &settings),
            Err(MpxError::NonFiniteNumber(_))
        ));
        assert!(format_currency(f64::INFINITY, &settings).is_err());
    }
}
