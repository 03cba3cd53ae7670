use crate::types::Duration;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceType {
    /// Code written to the recurring task record.
    pub fn code(self) -> i32 {
        match self {
            RecurrenceType::Daily => 1,
            RecurrenceType::Weekly => 4,
            RecurrenceType::Monthly => 8,
            RecurrenceType::Yearly => 16,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(RecurrenceType::Daily),
            4 => Some(RecurrenceType::Weekly),
            8 => Some(RecurrenceType::Monthly),
            16 => Some(RecurrenceType::Yearly),
            _ => None,
        }
    }
}

/// Recurrence definition attached to a task.
///
/// The index fields record the state of the recurrence dialog of the
/// tool that wrote the file; they are carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurringTask {
    pub start: Option<NaiveDateTime>,
    pub finish: Option<NaiveDateTime>,
    pub duration: Option<Duration>,
    pub occurrences: Option<i32>,
    /// Without a recurrence type only the owning task's unique id is written.
    pub recurrence_type: Option<RecurrenceType>,
    pub not_sure_index: Option<i32>,
    pub length_radio_index: Option<i32>,
    pub daily_workday: bool,
    /// Sunday first.
    pub weekly_days: [bool; 7],
    pub monthly_box_radio_index: Option<i32>,
    pub yearly_box_radio_index: Option<i32>,
    pub daily_frequency: Option<i32>,
    pub weekly_frequency: Option<i32>,
    pub monthly_first_last_combo_index: Option<i32>,
    pub monthly_day_combo_index: Option<i32>,
    pub monthly_bottom_frequency_combo_index: Option<i32>,
    pub monthly_day_index: Option<i32>,
    pub monthly_top_frequency_combo_index: Option<i32>,
    pub yearly_first_last_combo_index: Option<i32>,
    pub yearly_day_combo_index: Option<i32>,
    pub yearly_month_combo_index: Option<i32>,
    pub yearly_date: Option<NaiveDateTime>,
}

impl RecurringTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weekly day flags as seven `0`/`1` characters, Sunday first.
    pub fn weekly_days_code(&self) -> String {
        self.weekly_days
            .iter()
            .map(|&on| if on { '1' } else { '0' })
            .collect()
    }

    pub fn set_weekly_days_code(&mut self, code: &str) {
        for (slot, ch) in self.weekly_days.iter_mut().zip(code.chars()) {
            *slot = ch == '1';
        }
    }
}
