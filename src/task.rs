use crate::attributes::{AttributeStore, Value};
use crate::field::TaskField;
use crate::project::{AssignmentKey, ProjectError, ProjectResult, TaskKey};
use crate::recurring::RecurringTask;
use crate::types::{ConstraintType, Duration, Priority, Relation};
use chrono::NaiveDateTime;

/// One row of the task table.
///
/// Tasks live in a [`crate::ProjectFile`], which owns the hierarchy and the
/// identifier fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Task {
    fields: AttributeStore<TaskField>,
    recurring: Option<RecurringTask>,
    pub(crate) parent: Option<TaskKey>,
    pub(crate) children: Vec<TaskKey>,
    pub(crate) assignments: Vec<AssignmentKey>,
}

impl Task {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: TaskField) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: TaskField, value: impl Into<Value>) -> ProjectResult<()> {
        Self::check_writable(field)?;
        self.fields.put(field, Some(value.into()));
        Ok(())
    }

    pub fn clear(&mut self, field: TaskField) -> ProjectResult<()> {
        Self::check_writable(field)?;
        self.fields.put(field, None);
        Ok(())
    }

    fn check_writable(field: TaskField) -> ProjectResult<()> {
        if field.is_identifier() {
            return Err(ProjectError::IdentifierField(format!("{field:?}")));
        }
        Ok(())
    }

    pub fn fields(&self) -> &AttributeStore<TaskField> {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut AttributeStore<TaskField> {
        &mut self.fields
    }

    pub fn id(&self) -> Option<i32> {
        self.get(TaskField::ID).and_then(Value::as_i32)
    }

    pub fn unique_id(&self) -> Option<i32> {
        self.get(TaskField::UNIQUE_ID).and_then(Value::as_i32)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(TaskField::NAME).and_then(Value::as_str)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.fields.put(TaskField::NAME, Some(Value::Text(name.into())));
    }

    pub fn notes(&self) -> Option<&str> {
        self.get(TaskField::NOTES).and_then(Value::as_str)
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.fields.put(TaskField::NOTES, Some(Value::Text(notes.into())));
    }

    pub fn outline_level(&self) -> Option<i32> {
        self.get(TaskField::OUTLINE_LEVEL).and_then(Value::as_i32)
    }

    pub(crate) fn set_outline_level(&mut self, level: i32) {
        self.fields
            .put(TaskField::OUTLINE_LEVEL, Some(Value::Integer(level)));
    }

    pub fn duration(&self) -> Option<Duration> {
        self.get(TaskField::DURATION).and_then(Value::as_duration)
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.fields
            .put(TaskField::DURATION, Some(Value::Duration(duration)));
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.get(TaskField::START).and_then(Value::as_datetime)
    }

    pub fn set_start(&mut self, start: NaiveDateTime) {
        self.fields.put(TaskField::START, Some(Value::DateTime(start)));
    }

    pub fn finish(&self) -> Option<NaiveDateTime> {
        self.get(TaskField::FINISH).and_then(Value::as_datetime)
    }

    pub fn set_finish(&mut self, finish: NaiveDateTime) {
        self.fields
            .put(TaskField::FINISH, Some(Value::DateTime(finish)));
    }

    pub fn priority(&self) -> Option<Priority> {
        match self.get(TaskField::PRIORITY) {
            Some(Value::Priority(priority)) => Some(*priority),
            _ => None,
        }
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.fields
            .put(TaskField::PRIORITY, Some(Value::Priority(priority)));
    }

    /// Absent constraints read as as-soon-as-possible.
    pub fn constraint_type(&self) -> ConstraintType {
        match self.get(TaskField::CONSTRAINT_TYPE) {
            Some(Value::Constraint(constraint)) => *constraint,
            _ => ConstraintType::default(),
        }
    }

    pub fn set_constraint_type(&mut self, constraint: ConstraintType) {
        self.fields
            .put(TaskField::CONSTRAINT_TYPE, Some(Value::Constraint(constraint)));
    }

    pub fn predecessors(&self) -> &[Relation] {
        self.get(TaskField::PREDECESSORS)
            .and_then(Value::as_relations)
            .unwrap_or_default()
    }

    /// Moves relations on `old` to `new`. When `new` is unset those
    /// relations are removed.
    pub(crate) fn retarget_predecessors(&mut self, old: i32, new: Option<i32>) {
        match self.fields.take(TaskField::PREDECESSORS) {
            Some(Value::Relations(mut list)) => {
                match new {
                    Some(new) => list
                        .iter_mut()
                        .filter(|relation| relation.task_unique_id == old)
                        .for_each(|relation| relation.task_unique_id = new),
                    None => list.retain(|relation| relation.task_unique_id != old),
                }
                let value = (!list.is_empty()).then_some(Value::Relations(list));
                self.fields.put(TaskField::PREDECESSORS, value);
            }
            other => self.fields.put(TaskField::PREDECESSORS, other),
        }
    }

    /// Appends to the predecessor list, keeping insertion order.
    pub fn add_predecessor(&mut self, relation: Relation) {
        match self.fields.take(TaskField::PREDECESSORS) {
            Some(Value::Relations(mut list)) => {
                list.push(relation);
                self.fields
                    .put(TaskField::PREDECESSORS, Some(Value::Relations(list)));
            }
            _ => self
                .fields
                .put(TaskField::PREDECESSORS, Some(Value::Relations(vec![relation]))),
        }
    }

    pub fn number(&self, n: u16) -> Option<f64> {
        self.get(TaskField::number(n)).and_then(Value::as_f64)
    }

    pub fn set_number(&mut self, n: u16, value: f64) {
        self.fields
            .put(TaskField::number(n), Some(Value::Number(value)));
    }

    pub fn text(&self, n: u16) -> Option<&str> {
        self.get(TaskField::text(n)).and_then(Value::as_str)
    }

    pub fn set_text(&mut self, n: u16, value: impl Into<String>) {
        self.fields
            .put(TaskField::text(n), Some(Value::Text(value.into())));
    }

    pub fn flag(&self, n: u16) -> Option<bool> {
        self.get(TaskField::flag(n)).and_then(Value::as_bool)
    }

    pub fn set_flag(&mut self, n: u16, value: bool) {
        self.fields.put(TaskField::flag(n), Some(Value::Bool(value)));
    }

    pub fn recurring(&self) -> Option<&RecurringTask> {
        self.recurring.as_ref()
    }

    pub fn set_recurring(&mut self, recurring: Option<RecurringTask>) {
        self.recurring = recurring;
    }

    pub fn parent(&self) -> Option<TaskKey> {
        self.parent
    }

    pub fn children(&self) -> &[TaskKey] {
        &self.children
    }

    pub fn assignments(&self) -> &[AssignmentKey] {
        &self.assignments
    }
}
