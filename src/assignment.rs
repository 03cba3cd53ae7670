use crate::attributes::{AttributeStore, Value};
use crate::field::AssignmentField;
use crate::project::{ProjectError, ProjectResult, ResourceKey, TaskKey};
use crate::types::Duration;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Workgroup messaging state written after an assignment row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkgroupFields {
    pub message_unique_id: Option<String>,
    pub confirmed: bool,
    pub response_pending: bool,
    pub update_start: Option<NaiveDateTime>,
    pub update_finish: Option<NaiveDateTime>,
    pub schedule_id: Option<String>,
}

/// Allocation of a resource to a task.
///
/// The assignment refers to both ends by key and keeps a copy of their
/// identifiers; the project refreshes the copies whenever an identifier
/// changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceAssignment {
    fields: AttributeStore<AssignmentField>,
    task: TaskKey,
    resource: ResourceKey,
    pub(crate) task_id: Option<i32>,
    pub(crate) task_unique_id: Option<i32>,
    workgroup: Option<WorkgroupFields>,
}

impl ResourceAssignment {
    pub(crate) fn new(task: TaskKey, resource: ResourceKey) -> Self {
        Self {
            fields: AttributeStore::new(),
            task,
            resource,
            task_id: None,
            task_unique_id: None,
            workgroup: None,
        }
    }

    pub fn task(&self) -> TaskKey {
        self.task
    }

    pub fn resource(&self) -> ResourceKey {
        self.resource
    }

    pub fn get(&self, field: AssignmentField) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: AssignmentField, value: impl Into<Value>) -> ProjectResult<()> {
        if field.is_identifier() {
            return Err(ProjectError::IdentifierField(format!("{field:?}")));
        }
        self.fields.put(field, Some(value.into()));
        Ok(())
    }

    pub fn fields(&self) -> &AttributeStore<AssignmentField> {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut AttributeStore<AssignmentField> {
        &mut self.fields
    }

    pub fn resource_id(&self) -> Option<i32> {
        self.get(AssignmentField::RESOURCE_ID).and_then(Value::as_i32)
    }

    pub fn resource_unique_id(&self) -> Option<i32> {
        self.get(AssignmentField::RESOURCE_UNIQUE_ID)
            .and_then(Value::as_i32)
    }

    pub(crate) fn set_resource_id(&mut self, id: Option<i32>) {
        self.fields
            .put(AssignmentField::RESOURCE_ID, id.map(Value::Integer));
    }

    pub(crate) fn set_resource_unique_id(&mut self, id: Option<i32>) {
        self.fields
            .put(AssignmentField::RESOURCE_UNIQUE_ID, id.map(Value::Integer));
    }

    pub fn task_id(&self) -> Option<i32> {
        self.task_id
    }

    pub fn task_unique_id(&self) -> Option<i32> {
        self.task_unique_id
    }

    /// Units in hundredths: `100.0` is one full-time unit.
    pub fn units(&self) -> Option<f64> {
        self.get(AssignmentField::UNITS).and_then(Value::as_f64)
    }

    pub fn set_units(&mut self, units: f64) {
        self.fields
            .put(AssignmentField::UNITS, Some(Value::Number(units)));
    }

    pub fn work(&self) -> Option<Duration> {
        self.get(AssignmentField::WORK).and_then(Value::as_duration)
    }

    pub fn set_work(&mut self, work: Duration) {
        self.fields
            .put(AssignmentField::WORK, Some(Value::Duration(work)));
    }

    pub fn workgroup(&self) -> Option<&WorkgroupFields> {
        self.workgroup.as_ref()
    }

    pub fn set_workgroup(&mut self, workgroup: Option<WorkgroupFields>) {
        self.workgroup = workgroup;
    }
}
