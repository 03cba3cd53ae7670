//! Locale-specific name tables and number/date formatting settings.

use crate::mpx::MpxResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Where the currency symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SymbolPosition {
    After = 0,
    #[default]
    Before = 1,
    AfterWithSpace = 2,
    BeforeWithSpace = 3,
}

impl SymbolPosition {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::After),
            1 => Some(Self::Before),
            2 => Some(Self::AfterWithSpace),
            3 => Some(Self::BeforeWithSpace),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateOrder {
    MonthDayYear = 0,
    #[default]
    DayMonthYear = 1,
    YearMonthDay = 2,
}

impl DateOrder {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::MonthDayYear),
            1 => Some(Self::DayMonthYear),
            2 => Some(Self::YearMonthDay),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    TwelveHour = 0,
    #[default]
    TwentyFourHour = 1,
}

impl TimeFormat {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::TwelveHour),
            1 => Some(Self::TwentyFourHour),
            _ => None,
        }
    }
}

/// Separators, symbols and orderings that shape every formatted value.
///
/// These are the values carried by the currency and date/time settings
/// records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
    pub delimiter: char,
    pub currency_symbol: String,
    pub symbol_position: SymbolPosition,
    pub currency_digits: u8,
    pub thousands_separator: char,
    pub decimal_separator: char,
    pub date_order: DateOrder,
    pub time_format: TimeFormat,
    /// Default start time, minutes past midnight.
    pub default_start_time: Option<u32>,
    pub date_separator: char,
    pub time_separator: char,
    pub am_text: String,
    pub pm_text: String,
    pub date_format: i32,
    pub bar_text_date_format: i32,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            delimiter: ',',
            currency_symbol: "$".to_string(),
            symbol_position: SymbolPosition::Before,
            currency_digits: 2,
            thousands_separator: ',',
            decimal_separator: '.',
            date_order: DateOrder::DayMonthYear,
            time_format: TimeFormat::TwentyFourHour,
            default_start_time: Some(8 * 60),
            date_separator: '/',
            time_separator: ':',
            am_text: "am".to_string(),
            pm_text: "pm".to_string(),
            date_format: 0,
            bar_text_date_format: 0,
        }
    }
}

/// Name tables and defaults for one locale.
///
/// Tables are fixed-size arrays indexed by enumeration code, so a file
/// with a short table fails to load instead of failing mid-write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleData {
    pub name: String,
    pub settings: FormatSettings,
    pub yes: String,
    pub no: String,
    /// Start, end, prorated.
    pub accrue_types: [String; 3],
    /// Indexed by constraint code; entry 0 is as-soon-as-possible.
    pub constraint_types: [String; 8],
    /// Indexed by priority band minus one.
    pub priority_types: [String; 10],
    /// Indexed by relation type code: FF, FS, SF, SS.
    pub relation_types: [String; 4],
    /// Indexed by time unit code.
    pub time_units: [String; 14],
}

impl LocaleData {
    pub fn english() -> Self {
        Self {
            name: "en".to_string(),
            settings: FormatSettings::default(),
            yes: "Yes".to_string(),
            no: "No".to_string(),
            accrue_types: strings(["Start", "End", "Prorated"]),
            constraint_types: strings([
                "As Soon As Possible",
                "As Late As Possible",
                "Must Start On",
                "Must Finish On",
                "Start No Earlier Than",
                "Start No Later Than",
                "Finish No Earlier Than",
                "Finish No Later Than",
            ]),
            priority_types: strings([
                "Lowest",
                "Very Low",
                "Lower",
                "Low",
                "Medium",
                "High",
                "Higher",
                "Very High",
                "Highest",
                "Do Not Level",
            ]),
            relation_types: strings(["FF", "FS", "SF", "SS"]),
            time_units: strings([
                "m", "h", "d", "w", "mo", "%", "y", "em", "eh", "ed", "ew", "emo", "e%", "ey",
            ]),
        }
    }

    pub fn from_json_str(json: &str) -> MpxResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> MpxResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> MpxResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn yes_no(&self, value: bool) -> &str {
        if value { &self.yes } else { &self.no }
    }
}

impl Default for LocaleData {
    fn default() -> Self {
        Self::english()
    }
}

fn strings<const N: usize>(names: [&str; N]) -> [String; N] {
    names.map(str::to_string)
}
