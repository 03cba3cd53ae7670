use crate::attributes::{AttributeStore, Value};
use crate::field::HeaderField;
use crate::locale::FormatSettings;
use crate::types::{Rate, TimeUnit};
use serde::{Deserialize, Serialize};

/// Code page named by the file creation record. Byte output is encoded in
/// it and byte input is decoded with it: ANSI is windows-1252, MAC is Mac
/// Roman, 850 and 437 are the DOS pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CodePage {
    #[default]
    Ansi,
    Mac,
    Latin,
    Us,
}

impl CodePage {
    pub fn as_str(self) -> &'static str {
        match self {
            CodePage::Ansi => "ANSI",
            CodePage::Mac => "MAC",
            CodePage::Latin => "850",
            CodePage::Us => "437",
        }
    }

    /// Unrecognised labels fall back to ANSI.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "MAC" => CodePage::Mac,
            "850" => CodePage::Latin,
            "437" => CodePage::Us,
            _ => CodePage::Ansi,
        }
    }
}

/// First line of every file: producing program, format version, code page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCreationRecord {
    pub program_name: String,
    pub file_version: String,
    pub code_page: CodePage,
}

impl Default for FileCreationRecord {
    fn default() -> Self {
        Self {
            program_name: env!("CARGO_PKG_NAME").to_string(),
            file_version: "4.0".to_string(),
            code_page: CodePage::Ansi,
        }
    }
}

/// Project-wide defaults carried by the default settings record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSettings {
    pub duration_units: TimeUnit,
    pub duration_is_fixed: bool,
    pub work_units: TimeUnit,
    pub minutes_per_day: f64,
    pub minutes_per_week: f64,
    pub standard_rate: Rate,
    pub overtime_rate: Rate,
    pub updating_task_status_updates_resource_status: bool,
    pub split_in_progress_tasks: bool,
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            duration_units: TimeUnit::Days,
            duration_is_fixed: false,
            work_units: TimeUnit::Hours,
            minutes_per_day: 480.0,
            minutes_per_week: 2400.0,
            standard_rate: Rate::new(0.0, TimeUnit::Hours),
            overtime_rate: Rate::new(0.0, TimeUnit::Hours),
            updating_task_status_updates_resource_status: true,
            split_in_progress_tasks: true,
        }
    }
}

/// Project-level properties: the project header record fields plus the
/// settings records that precede it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectHeader {
    fields: AttributeStore<HeaderField>,
    pub format: FormatSettings,
    pub defaults: DefaultSettings,
}

impl ProjectHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: HeaderField) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: HeaderField, value: impl Into<Value>) {
        self.fields.put(field, Some(value.into()));
    }

    pub fn clear(&mut self, field: HeaderField) {
        self.fields.put(field, None);
    }

    pub fn fields(&self) -> &AttributeStore<HeaderField> {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut AttributeStore<HeaderField> {
        &mut self.fields
    }

    pub fn project_title(&self) -> Option<&str> {
        self.get(HeaderField::PROJECT_TITLE).and_then(Value::as_str)
    }

    pub fn set_project_title(&mut self, title: impl Into<String>) {
        self.set(HeaderField::PROJECT_TITLE, title.into());
    }

    pub fn calendar_name(&self) -> Option<&str> {
        self.get(HeaderField::CALENDAR_NAME).and_then(Value::as_str)
    }

    pub fn set_calendar_name(&mut self, name: impl Into<String>) {
        self.set(HeaderField::CALENDAR_NAME, name.into());
    }
}
