//! Per-kind value formatting and parsing.
//!
//! [`ValueCodec`] turns attribute values into field text and back. It knows
//! nothing about records; escaping for the line grammar lives in [`escape`].

pub mod charset;
pub mod datetime;
pub mod escape;
pub mod number;

use crate::attributes::Value;
use crate::field::DataKind;
use crate::locale::{FormatSettings, LocaleData};
use crate::mpx::{MpxError, MpxResult};
use crate::types::{
    AccrueType, ConstraintType, Duration, Priority, Rate, Relation, RelationType, TaskType,
    TimeUnit,
};
use number::NumberPattern;
use tracing::warn;

/// Maps between a task's unique id and its positional id.
///
/// Relations hold unique ids; the text format refers to tasks by
/// positional id.
pub trait TaskIdLookup {
    fn id_for_unique_id(&self, unique_id: i32) -> Option<i32>;
    fn unique_id_for_id(&self, id: i32) -> Option<i32>;
}

/// Treats positional and unique ids as the same number.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLookup;

impl TaskIdLookup for IdentityLookup {
    fn id_for_unique_id(&self, unique_id: i32) -> Option<i32> {
        Some(unique_id)
    }

    fn unique_id_for_id(&self, id: i32) -> Option<i32> {
        Some(id)
    }
}

pub struct ValueCodec<'a> {
    settings: &'a FormatSettings,
    names: &'a LocaleData,
    tasks: &'a dyn TaskIdLookup,
}

impl<'a> ValueCodec<'a> {
    pub fn new(settings: &'a FormatSettings, names: &'a LocaleData) -> Self {
        Self {
            settings,
            names,
            tasks: &IdentityLookup,
        }
    }

    /// Resolves relation targets through `tasks`.
    pub fn with_tasks(mut self, tasks: &'a dyn TaskIdLookup) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn settings(&self) -> &FormatSettings {
        self.settings
    }

    pub fn names(&self) -> &LocaleData {
        self.names
    }

    /// Formats `value` as `kind`. Absent values format to empty text.
    ///
    /// The result is not escaped.
    pub fn format(&self, kind: DataKind, value: Option<&Value>) -> MpxResult<String> {
        let Some(value) = value else {
            return Ok(String::new());
        };
        let mismatch = || MpxError::TypeMismatch {
            kind,
            found: value.type_name(),
        };

        let text = match (kind, value) {
            (DataKind::Text, v) => self.format_untyped(v)?.ok_or_else(mismatch)?,
            (DataKind::Date, Value::Date(d)) => datetime::format_date(*d, self.settings),
            (DataKind::Date, Value::DateTime(dt)) => datetime::format_date(dt.date(), self.settings),
            (DataKind::DateTime, v) => {
                datetime::format_datetime(v.as_datetime().ok_or_else(mismatch)?, self.settings)
            }
            (DataKind::Time, Value::Time(t)) => datetime::format_time(*t, self.settings),
            (DataKind::Time, Value::DateTime(dt)) => datetime::format_time(dt.time(), self.settings),
            (DataKind::Currency, v) => {
                number::format_currency(v.as_f64().ok_or_else(mismatch)?, self.settings)?
            }
            (DataKind::Units, v) => self.format_units(v.as_f64().ok_or_else(mismatch)?)?,
            (DataKind::Percentage, v) => self.format_percentage(v.as_f64().ok_or_else(mismatch)?)?,
            (DataKind::Duration, Value::Duration(d)) => self.format_duration(*d)?,
            (DataKind::Rate, Value::Rate(r)) => self.format_rate(*r)?,
            (DataKind::Accrue, Value::Accrue(a)) => self.names.accrue_types[a.name_index()].clone(),
            (DataKind::Constraint, Value::Constraint(c)) => {
                self.names.constraint_types[c.code() as usize].clone()
            }
            (DataKind::Priority, Value::Priority(p)) => self.format_priority(*p),
            (DataKind::Priority, Value::Integer(p)) => self.format_priority(Priority::new(*p)),
            (DataKind::RelationList, Value::Relations(list)) => self.format_relations(list)?,
            (DataKind::Boolean, Value::Bool(b)) => self.names.yes_no(*b).to_string(),
            (DataKind::TaskType, Value::TaskType(t)) => {
                self.names.yes_no(*t == TaskType::FixedDuration).to_string()
            }
            (DataKind::Integer, Value::Integer(i)) => i.to_string(),
            (DataKind::Numeric, v) => self.format_decimal(v.as_f64().ok_or_else(mismatch)?)?,
            _ => return Err(mismatch()),
        };
        Ok(text)
    }

    /// Text fields accept any scalar and render it the plain way.
    fn format_untyped(&self, value: &Value) -> MpxResult<Option<String>> {
        Ok(match value {
            Value::Text(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Number(n) => Some(self.format_decimal(*n)?),
            Value::Bool(b) => Some(self.names.yes_no(*b).to_string()),
            _ => None,
        })
    }

    pub fn format_decimal(&self, value: f64) -> MpxResult<String> {
        number::format_number(value, NumberPattern::DECIMAL, self.settings)
    }

    pub fn format_currency(&self, value: f64) -> MpxResult<String> {
        number::format_currency(value, self.settings)
    }

    /// Units are held as hundredths; `100` renders as `1`.
    pub fn format_units(&self, value: f64) -> MpxResult<String> {
        number::format_number(value / 100.0, NumberPattern::COMPACT, self.settings)
    }

    pub fn format_percentage(&self, value: f64) -> MpxResult<String> {
        let mut text = number::format_number(value, NumberPattern::COMPACT, self.settings)?;
        text.push('%');
        Ok(text)
    }

    pub fn format_time_unit(&self, units: TimeUnit) -> &str {
        &self.names.time_units[units.code() as usize]
    }

    pub fn format_duration(&self, value: Duration) -> MpxResult<String> {
        let mut text = number::format_number(value.duration, NumberPattern::COMPACT, self.settings)?;
        text.push_str(self.format_time_unit(value.units));
        Ok(text)
    }

    pub fn format_rate(&self, value: Rate) -> MpxResult<String> {
        Ok(format!(
            "{}/{}",
            number::format_currency(value.amount, self.settings)?,
            self.format_time_unit(value.units)
        ))
    }

    pub fn format_priority(&self, value: Priority) -> String {
        self.names.priority_types[value.band() - 1].clone()
    }

    fn format_relation(&self, relation: &Relation) -> MpxResult<String> {
        let id = self
            .tasks
            .id_for_unique_id(relation.task_unique_id)
            .ok_or_else(|| {
                MpxError::InvalidData(format!(
                    "relation refers to unknown task unique id {}",
                    relation.task_unique_id
                ))
            })?;
        let mut text = id.to_string();
        let lag = relation.lag.duration;
        if lag != 0.0 || relation.kind != RelationType::FinishStart {
            text.push_str(&self.names.relation_types[relation.kind.code() as usize]);
        }
        if lag != 0.0 {
            if lag > 0.0 {
                text.push('+');
            }
            text.push_str(&self.format_duration(relation.lag)?);
        }
        Ok(text)
    }

    pub fn format_relations(&self, relations: &[Relation]) -> MpxResult<String> {
        let mut text = String::new();
        for relation in relations {
            if !text.is_empty() {
                text.push(self.settings.delimiter);
            }
            text.push_str(&self.format_relation(relation)?);
        }
        Ok(text)
    }

    /// Parses unescaped field text as `kind`. Empty text parses to `None`.
    pub fn parse(&self, kind: DataKind, text: &str) -> MpxResult<Option<Value>> {
        if text.is_empty() {
            return Ok(None);
        }
        let invalid = || MpxError::InvalidData(format!("'{text}' is not a valid {kind:?} value"));

        let value = match kind {
            DataKind::Text => Value::Text(text.to_string()),
            DataKind::Date => {
                Value::Date(datetime::parse_date(text, self.settings).ok_or_else(invalid)?)
            }
            DataKind::DateTime => {
                Value::DateTime(datetime::parse_datetime(text, self.settings).ok_or_else(invalid)?)
            }
            DataKind::Time => {
                Value::Time(datetime::parse_time(text, self.settings).ok_or_else(invalid)?)
            }
            DataKind::Currency => {
                Value::Number(number::parse_currency(text, self.settings).ok_or_else(invalid)?)
            }
            DataKind::Units => {
                Value::Number(number::parse_number(text, self.settings).ok_or_else(invalid)? * 100.0)
            }
            DataKind::Percentage => {
                let digits = text.trim().trim_end_matches('%');
                Value::Number(number::parse_number(digits, self.settings).ok_or_else(invalid)?)
            }
            DataKind::Duration => Value::Duration(self.parse_duration(text).ok_or_else(invalid)?),
            DataKind::Rate => Value::Rate(self.parse_rate(text).ok_or_else(invalid)?),
            DataKind::Accrue => match self.name_index(&self.names.accrue_types, text) {
                Some(idx) => Value::Accrue(AccrueType::from_code(idx as i32 + 1).ok_or_else(invalid)?),
                None => {
                    warn!(value = %text, "unknown accrue type, field dropped");
                    return Ok(None);
                }
            },
            DataKind::Constraint => {
                let code = self
                    .name_index(&self.names.constraint_types, text)
                    .map(|idx| idx as i32)
                    .or_else(|| text.trim().parse().ok());
                Value::Constraint(ConstraintType::from_code(code))
            }
            DataKind::Priority => Value::Priority(self.parse_priority(text)),
            DataKind::RelationList => Value::Relations(self.parse_relations(text)?),
            DataKind::Boolean => Value::Bool(self.parse_bool(text).ok_or_else(invalid)?),
            DataKind::TaskType => {
                let fixed = self.parse_bool(text).ok_or_else(invalid)?;
                Value::TaskType(if fixed {
                    TaskType::FixedDuration
                } else {
                    TaskType::FixedUnits
                })
            }
            DataKind::Integer => Value::Integer(text.trim().parse().map_err(|_| invalid())?),
            DataKind::Numeric => {
                Value::Number(number::parse_number(text, self.settings).ok_or_else(invalid)?)
            }
        };
        Ok(Some(value))
    }

    fn name_index(&self, table: &[String], text: &str) -> Option<usize> {
        let text = text.trim();
        table.iter().position(|name| name.eq_ignore_ascii_case(text))
    }

    pub fn parse_bool(&self, text: &str) -> Option<bool> {
        let text = text.trim();
        if text.eq_ignore_ascii_case(&self.names.yes) || text == "1" {
            Some(true)
        } else if text.eq_ignore_ascii_case(&self.names.no) || text == "0" {
            Some(false)
        } else {
            None
        }
    }

    pub fn parse_time_unit(&self, text: &str) -> Option<TimeUnit> {
        let idx = self.name_index(&self.names.time_units, text)?;
        TimeUnit::from_code(idx as i32)
    }

    /// Parses `<magnitude><unit>`; a bare magnitude is in days.
    pub fn parse_duration(&self, text: &str) -> Option<Duration> {
        let text = text.trim();
        let split = text
            .find(|c: char| {
                !(c.is_ascii_digit() || c == '-' || c == '+' || c == self.settings.decimal_separator)
            })
            .unwrap_or(text.len());
        let (magnitude, unit) = text.split_at(split);
        let duration = number::parse_number(magnitude, self.settings)?;
        let units = if unit.trim().is_empty() {
            TimeUnit::Days
        } else {
            self.parse_time_unit(unit)?
        };
        Some(Duration::new(duration, units))
    }

    pub fn parse_rate(&self, text: &str) -> Option<Rate> {
        let (amount, unit) = text.rsplit_once('/')?;
        let amount = number::parse_currency(amount, self.settings)?;
        Some(Rate::new(amount, self.parse_time_unit(unit)?))
    }

    /// Out-of-table names fall back to a number, then to medium priority.
    pub fn parse_priority(&self, text: &str) -> Priority {
        if let Some(idx) = self.name_index(&self.names.priority_types, text) {
            return Priority::from_band(idx + 1);
        }
        match text.trim().parse() {
            Ok(value) => Priority::new(value),
            Err(_) => {
                warn!(value = %text, "unknown priority, using medium");
                Priority::default()
            }
        }
    }

    pub fn parse_relations(&self, text: &str) -> MpxResult<Vec<Relation>> {
        text.split(self.settings.delimiter)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| self.parse_relation(item))
            .collect()
    }

    fn parse_relation(&self, text: &str) -> MpxResult<Relation> {
        let invalid = || MpxError::InvalidData(format!("'{text}' is not a valid relation"));

        let digits = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
        let id: i32 = text[..digits].parse().map_err(|_| invalid())?;
        let unique_id = self.tasks.unique_id_for_id(id).ok_or_else(|| {
            MpxError::InvalidData(format!("relation refers to unknown task id {id}"))
        })?;

        let mut rest = &text[digits..];
        let mut kind = RelationType::FinishStart;
        for (code, name) in self.names.relation_types.iter().enumerate() {
            if let Some(tail) = strip_prefix_ignore_case(rest, name) {
                kind = RelationType::ALL[code];
                rest = tail;
                break;
            }
        }

        let rest = rest.trim();
        let lag = if rest.is_empty() {
            Duration::zero()
        } else {
            self.parse_duration(rest.strip_prefix('+').unwrap_or(rest))
                .ok_or_else(invalid)?
        };
        Ok(Relation::new(unique_id, kind, lag))
    }
}

fn strip_prefix_ignore_case<'t>(text: &'t str, prefix: &str) -> Option<&'t str> {
    if prefix.is_empty() || text.len() < prefix.len() || !text.is_char_boundary(prefix.len()) {
        return None;
    }
    let (head, tail) = text.split_at(prefix.len());
    head.eq_ignore_ascii_case(prefix).then_some(tail)
}
