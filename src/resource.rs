use crate::attributes::{AttributeStore, Value};
use crate::calendar::ProjectCalendar;
use crate::field::ResourceField;
use crate::project::{ProjectError, ProjectResult};
use crate::types::{AccrueType, Rate};

/// A person, machine or cost bucket that can be assigned to tasks.
///
/// Identifier fields are owned by the project; change them through
/// [`crate::ProjectFile::set_resource_id`] and
/// [`crate::ProjectFile::set_resource_unique_id`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    fields: AttributeStore<ResourceField>,
    calendar: Option<ProjectCalendar>,
}

impl Resource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: ResourceField) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: ResourceField, value: impl Into<Value>) -> ProjectResult<()> {
        Self::check_writable(field)?;
        self.fields.put(field, Some(value.into()));
        Ok(())
    }

    pub fn clear(&mut self, field: ResourceField) -> ProjectResult<()> {
        Self::check_writable(field)?;
        self.fields.put(field, None);
        Ok(())
    }

    fn check_writable(field: ResourceField) -> ProjectResult<()> {
        if field.is_identifier() {
            return Err(ProjectError::IdentifierField(format!("{field:?}")));
        }
        Ok(())
    }

    pub fn fields(&self) -> &AttributeStore<ResourceField> {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut AttributeStore<ResourceField> {
        &mut self.fields
    }

    pub fn id(&self) -> Option<i32> {
        self.get(ResourceField::ID).and_then(Value::as_i32)
    }

    pub fn unique_id(&self) -> Option<i32> {
        self.get(ResourceField::UNIQUE_ID).and_then(Value::as_i32)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(ResourceField::NAME).and_then(Value::as_str)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.fields.put(ResourceField::NAME, Some(Value::Text(name.into())));
    }

    pub fn initials(&self) -> Option<&str> {
        self.get(ResourceField::INITIALS).and_then(Value::as_str)
    }

    pub fn set_initials(&mut self, initials: impl Into<String>) {
        self.fields
            .put(ResourceField::INITIALS, Some(Value::Text(initials.into())));
    }

    pub fn notes(&self) -> Option<&str> {
        self.get(ResourceField::NOTES).and_then(Value::as_str)
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.fields
            .put(ResourceField::NOTES, Some(Value::Text(notes.into())));
    }

    /// Maximum units in hundredths: `100.0` is one full-time unit.
    pub fn max_units(&self) -> Option<f64> {
        self.get(ResourceField::MAX_UNITS).and_then(Value::as_f64)
    }

    pub fn set_max_units(&mut self, units: f64) {
        self.fields
            .put(ResourceField::MAX_UNITS, Some(Value::Number(units)));
    }

    pub fn standard_rate(&self) -> Option<Rate> {
        self.get(ResourceField::STANDARD_RATE).and_then(Value::as_rate)
    }

    pub fn set_standard_rate(&mut self, rate: Rate) {
        self.fields
            .put(ResourceField::STANDARD_RATE, Some(Value::Rate(rate)));
    }

    pub fn accrue_at(&self) -> Option<AccrueType> {
        match self.get(ResourceField::ACCRUE_AT) {
            Some(Value::Accrue(accrue)) => Some(*accrue),
            _ => None,
        }
    }

    pub fn set_accrue_at(&mut self, accrue: AccrueType) {
        self.fields
            .put(ResourceField::ACCRUE_AT, Some(Value::Accrue(accrue)));
    }

    /// Number1..=Number20. Reads and writes use the same field.
    pub fn number(&self, n: u16) -> Option<f64> {
        self.get(ResourceField::number(n)).and_then(Value::as_f64)
    }

    pub fn set_number(&mut self, n: u16, value: f64) {
        self.fields
            .put(ResourceField::number(n), Some(Value::Number(value)));
    }

    pub fn text(&self, n: u16) -> Option<&str> {
        self.get(ResourceField::text(n)).and_then(Value::as_str)
    }

    pub fn set_text(&mut self, n: u16, value: impl Into<String>) {
        self.fields
            .put(ResourceField::text(n), Some(Value::Text(value.into())));
    }

    pub fn calendar(&self) -> Option<&ProjectCalendar> {
        self.calendar.as_ref()
    }

    pub fn calendar_mut(&mut self) -> Option<&mut ProjectCalendar> {
        self.calendar.as_mut()
    }

    /// Attaches a calendar deriving from the base calendar `base_name`.
    ///
    /// A resource owns at most one calendar; a second attempt fails with
    /// [`ProjectError::MaximumRecordsExceeded`] and leaves the first intact.
    pub fn add_calendar(&mut self, base_name: impl Into<String>) -> ProjectResult<&mut ProjectCalendar> {
        if self.calendar.is_some() {
            return Err(ProjectError::MaximumRecordsExceeded {
                what: "resource calendar",
            });
        }
        Ok(self.calendar.insert(ProjectCalendar::derived(base_name)))
    }
}
