use crate::assignment::ResourceAssignment;
use crate::attributes::Value;
use crate::calendar::{Day, ProjectCalendar, TimeRange};
use crate::codec::TaskIdLookup;
use crate::field::{ResourceField, TaskField};
use crate::header::{FileCreationRecord, ProjectHeader};
use crate::resource::Resource;
use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("maximum number of {what} records exceeded")]
    MaximumRecordsExceeded { what: &'static str },
    #[error("{entity} identifier {id} is already in use")]
    DuplicateIdentifier { entity: &'static str, id: i32 },
    #[error("{0} is an identifier field; set it through the project")]
    IdentifierField(String),
    #[error("working time range overlaps an existing range")]
    OverlappingRange,
    #[error("resource is not part of this project")]
    UnknownResource,
    #[error("task is not part of this project")]
    UnknownTask,
}

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskKey(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssignmentKey(usize);

/// Identifier numbering switches.
///
/// With a switch on, new entities draw the identifier from a counter owned
/// by the project. Counters skip identifiers already mapped explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub auto_task_id: bool,
    pub auto_task_unique_id: bool,
    pub auto_resource_id: bool,
    pub auto_resource_unique_id: bool,
    /// Child tasks get their parent's outline level plus one.
    pub auto_outline_level: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            auto_task_id: true,
            auto_task_unique_id: true,
            auto_resource_id: true,
            auto_resource_unique_id: true,
            auto_outline_level: true,
        }
    }
}

impl ProjectConfig {
    /// Every identifier supplied by the caller.
    pub fn manual() -> Self {
        Self {
            auto_task_id: false,
            auto_task_unique_id: false,
            auto_resource_id: false,
            auto_resource_unique_id: false,
            auto_outline_level: true,
        }
    }
}

/// Reverse lookup from identifier to entity, plus the auto-number counter.
///
/// The counter is `None` once it has passed `i32::MAX`; allocation then
/// falls back to the lowest unused positive id.
#[derive(Debug, Clone)]
struct IdMap<K> {
    entity: &'static str,
    by_id: HashMap<i32, K>,
    next: Option<i32>,
}

impl<K: Copy + Eq> IdMap<K> {
    fn new(entity: &'static str) -> Self {
        Self {
            entity,
            by_id: HashMap::new(),
            next: Some(1),
        }
    }

    fn get(&self, id: i32) -> Option<K> {
        self.by_id.get(&id).copied()
    }

    fn check(&self, id: Option<i32>, key: K) -> ProjectResult<()> {
        match id.and_then(|id| self.by_id.get(&id).map(|owner| (id, *owner))) {
            Some((id, owner)) if owner != key => Err(ProjectError::DuplicateIdentifier {
                entity: self.entity,
                id,
            }),
            _ => Ok(()),
        }
    }

    fn rebind(&mut self, old: Option<i32>, new: Option<i32>, key: K) {
        if let Some(old) = old {
            if self.by_id.get(&old) == Some(&key) {
                self.by_id.remove(&old);
            }
        }
        if let Some(new) = new {
            self.by_id.insert(new, key);
            if self.next.is_some_and(|next| new >= next) {
                self.next = new.checked_add(1);
            }
        }
    }

    fn allocate(&mut self) -> Option<i32> {
        while let Some(next) = self.next {
            self.next = next.checked_add(1);
            if !self.by_id.contains_key(&next) {
                return Some(next);
            }
        }
        let id = (1..=i32::MAX).find(|id| !self.by_id.contains_key(id));
        if id.is_none() {
            warn!(entity = self.entity, "identifiers exhausted, left unset");
        }
        id
    }

    fn clear(&mut self) {
        self.by_id.clear();
        self.next = Some(1);
    }
}

/// Aggregate root: every calendar, resource, task and assignment of one
/// project, plus the identifier maps that keep them consistent.
#[derive(Debug, Clone)]
pub struct ProjectFile {
    config: ProjectConfig,
    file_creation: FileCreationRecord,
    header: ProjectHeader,
    base_calendars: Vec<ProjectCalendar>,
    resources: Vec<Resource>,
    tasks: Vec<Task>,
    top_level: Vec<TaskKey>,
    assignments: Vec<ResourceAssignment>,
    resource_ids: IdMap<ResourceKey>,
    resource_unique_ids: IdMap<ResourceKey>,
    task_ids: IdMap<TaskKey>,
    task_unique_ids: IdMap<TaskKey>,
}

impl Default for ProjectFile {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectFile {
    pub fn new() -> Self {
        Self::with_config(ProjectConfig::default())
    }

    pub fn with_config(config: ProjectConfig) -> Self {
        Self {
            config,
            file_creation: FileCreationRecord::default(),
            header: ProjectHeader::default(),
            base_calendars: Vec::new(),
            resources: Vec::new(),
            tasks: Vec::new(),
            top_level: Vec::new(),
            assignments: Vec::new(),
            resource_ids: IdMap::new("resource"),
            resource_unique_ids: IdMap::new("resource unique"),
            task_ids: IdMap::new("task"),
            task_unique_ids: IdMap::new("task unique"),
        }
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Later additions follow `config`; existing identifiers are kept.
    pub fn set_config(&mut self, config: ProjectConfig) {
        self.config = config;
    }

    pub fn file_creation(&self) -> &FileCreationRecord {
        &self.file_creation
    }

    pub fn file_creation_mut(&mut self) -> &mut FileCreationRecord {
        &mut self.file_creation
    }

    pub fn header(&self) -> &ProjectHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut ProjectHeader {
        &mut self.header
    }

    // Calendars

    pub fn add_base_calendar(&mut self, name: impl Into<String>) -> &mut ProjectCalendar {
        self.base_calendars.push(ProjectCalendar::base(name));
        let last = self.base_calendars.len() - 1;
        &mut self.base_calendars[last]
    }

    /// Adds the "Standard" calendar: Monday to Friday, 08:00-12:00 and
    /// 13:00-17:00.
    pub fn add_default_base_calendar(&mut self) -> ProjectResult<&mut ProjectCalendar> {
        let calendar = self.add_base_calendar("Standard");
        for day in &Day::ALL[1..6] {
            let hours = calendar.add_hours(*day);
            hours.add_range(TimeRange::hours(8, 12))?;
            hours.add_range(TimeRange::hours(13, 17))?;
        }
        Ok(calendar)
    }

    pub fn base_calendars(&self) -> &[ProjectCalendar] {
        &self.base_calendars
    }

    pub fn base_calendars_mut(&mut self) -> &mut [ProjectCalendar] {
        &mut self.base_calendars
    }

    pub fn base_calendar(&self, name: &str) -> Option<&ProjectCalendar> {
        self.base_calendars
            .iter()
            .find(|cal| cal.name() == Some(name))
    }

    pub fn base_calendar_mut(&mut self, name: &str) -> Option<&mut ProjectCalendar> {
        self.base_calendars
            .iter_mut()
            .find(|cal| cal.name() == Some(name))
    }

    // Resources

    /// Adds a resource, numbering it when auto-numbering is on.
    pub fn add_resource(&mut self) -> ResourceKey {
        let key = ResourceKey(self.resources.len());
        self.resources.push(Resource::new());
        if self.config.auto_resource_unique_id {
            let id = self.resource_unique_ids.allocate();
            self.apply_resource_unique_id(key, id);
        }
        if self.config.auto_resource_id {
            let id = self.resource_ids.allocate();
            self.apply_resource_id(key, id);
        }
        key
    }

    /// Panics when `key` belongs to another project.
    pub fn resource(&self, key: ResourceKey) -> &Resource {
        &self.resources[key.0]
    }

    pub fn resource_mut(&mut self, key: ResourceKey) -> &mut Resource {
        &mut self.resources[key.0]
    }

    /// Resources in insertion order.
    pub fn resources(&self) -> impl Iterator<Item = (ResourceKey, &Resource)> {
        self.resources
            .iter()
            .enumerate()
            .map(|(idx, resource)| (ResourceKey(idx), resource))
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn resource_by_id(&self, id: i32) -> Option<ResourceKey> {
        self.resource_ids.get(id)
    }

    pub fn resource_by_unique_id(&self, unique_id: i32) -> Option<ResourceKey> {
        self.resource_unique_ids.get(unique_id)
    }

    /// Changes a resource's positional id and every assignment's copy of it.
    pub fn set_resource_id(&mut self, key: ResourceKey, id: Option<i32>) -> ProjectResult<()> {
        if key.0 >= self.resources.len() {
            return Err(ProjectError::UnknownResource);
        }
        self.resource_ids.check(id, key)?;
        self.apply_resource_id(key, id);
        Ok(())
    }

    /// Changes a resource's unique id and every assignment's copy of it.
    pub fn set_resource_unique_id(&mut self, key: ResourceKey, unique_id: Option<i32>) -> ProjectResult<()> {
        if key.0 >= self.resources.len() {
            return Err(ProjectError::UnknownResource);
        }
        self.resource_unique_ids.check(unique_id, key)?;
        self.apply_resource_unique_id(key, unique_id);
        Ok(())
    }

    fn apply_resource_id(&mut self, key: ResourceKey, id: Option<i32>) {
        let resource = &mut self.resources[key.0];
        self.resource_ids.rebind(resource.id(), id, key);
        resource.fields_mut().put(ResourceField::ID, id.map(Value::Integer));
        for assignment in self.assignments.iter_mut().filter(|a| a.resource() == key) {
            assignment.set_resource_id(id);
        }
    }

    fn apply_resource_unique_id(&mut self, key: ResourceKey, unique_id: Option<i32>) {
        let resource = &mut self.resources[key.0];
        self.resource_unique_ids
            .rebind(resource.unique_id(), unique_id, key);
        resource
            .fields_mut()
            .put(ResourceField::UNIQUE_ID, unique_id.map(Value::Integer));
        for assignment in self.assignments.iter_mut().filter(|a| a.resource() == key) {
            assignment.set_resource_unique_id(unique_id);
        }
    }

    /// Renumbers positional ids 1.. in insertion order.
    pub fn renumber_resource_ids(&mut self) {
        self.resource_ids.clear();
        for idx in 0..self.resources.len() {
            let key = ResourceKey(idx);
            self.resources[key.0].fields_mut().put(ResourceField::ID, None);
            self.apply_resource_id(key, Some(idx as i32 + 1));
        }
    }

    // Tasks

    /// Adds a top-level task.
    pub fn add_task(&mut self) -> TaskKey {
        let key = self.push_task(None);
        self.top_level.push(key);
        key
    }

    pub fn add_child_task(&mut self, parent: TaskKey) -> ProjectResult<TaskKey> {
        if parent.0 >= self.tasks.len() {
            return Err(ProjectError::UnknownTask);
        }
        let key = self.push_task(Some(parent));
        self.tasks[parent.0].children.push(key);
        Ok(key)
    }

    fn push_task(&mut self, parent: Option<TaskKey>) -> TaskKey {
        let key = TaskKey(self.tasks.len());
        let mut task = Task::new();
        task.parent = parent;
        if self.config.auto_outline_level {
            let level = parent
                .and_then(|p| self.tasks[p.0].outline_level())
                .map_or(1, |level| level + 1);
            task.set_outline_level(level);
        }
        self.tasks.push(task);
        if self.config.auto_task_unique_id {
            let id = self.task_unique_ids.allocate();
            self.apply_task_unique_id(key, id);
        }
        if self.config.auto_task_id {
            let id = self.task_ids.allocate();
            self.apply_task_id(key, id);
        }
        key
    }

    /// Panics when `key` belongs to another project.
    pub fn task(&self, key: TaskKey) -> &Task {
        &self.tasks[key.0]
    }

    pub fn task_mut(&mut self, key: TaskKey) -> &mut Task {
        &mut self.tasks[key.0]
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = (TaskKey, &Task)> {
        self.tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| (TaskKey(idx), task))
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn child_tasks(&self) -> &[TaskKey] {
        &self.top_level
    }

    /// Every task depth-first: each parent before its children.
    pub fn tasks_in_outline_order(&self) -> Vec<TaskKey> {
        let mut order = Vec::with_capacity(self.tasks.len());
        let mut stack: Vec<TaskKey> = self.top_level.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            order.push(key);
            stack.extend(self.tasks[key.0].children.iter().rev().copied());
        }
        order
    }

    pub fn task_by_id(&self, id: i32) -> Option<TaskKey> {
        self.task_ids.get(id)
    }

    pub fn task_by_unique_id(&self, unique_id: i32) -> Option<TaskKey> {
        self.task_unique_ids.get(unique_id)
    }

    pub fn set_task_id(&mut self, key: TaskKey, id: Option<i32>) -> ProjectResult<()> {
        if key.0 >= self.tasks.len() {
            return Err(ProjectError::UnknownTask);
        }
        self.task_ids.check(id, key)?;
        self.apply_task_id(key, id);
        Ok(())
    }

    pub fn set_task_unique_id(&mut self, key: TaskKey, unique_id: Option<i32>) -> ProjectResult<()> {
        if key.0 >= self.tasks.len() {
            return Err(ProjectError::UnknownTask);
        }
        self.task_unique_ids.check(unique_id, key)?;
        self.apply_task_unique_id(key, unique_id);
        Ok(())
    }

    fn apply_task_id(&mut self, key: TaskKey, id: Option<i32>) {
        let task = &mut self.tasks[key.0];
        self.task_ids.rebind(task.id(), id, key);
        task.fields_mut().put(TaskField::ID, id.map(Value::Integer));
        for assignment in self.assignments.iter_mut().filter(|a| a.task() == key) {
            assignment.task_id = id;
        }
    }

    /// Also rewrites every predecessor relation that named the old unique id.
    fn apply_task_unique_id(&mut self, key: TaskKey, unique_id: Option<i32>) {
        let task = &mut self.tasks[key.0];
        let old = task.unique_id();
        self.task_unique_ids.rebind(old, unique_id, key);
        task.fields_mut()
            .put(TaskField::UNIQUE_ID, unique_id.map(Value::Integer));
        for assignment in self.assignments.iter_mut().filter(|a| a.task() == key) {
            assignment.task_unique_id = unique_id;
        }
        if let Some(old) = old.filter(|old| Some(*old) != unique_id) {
            for task in &mut self.tasks {
                task.retarget_predecessors(old, unique_id);
            }
        }
    }

    /// Renumbers positional ids 1.. in outline order.
    pub fn renumber_task_ids(&mut self) {
        self.task_ids.clear();
        for (idx, key) in self.tasks_in_outline_order().into_iter().enumerate() {
            self.tasks[key.0].fields_mut().put(TaskField::ID, None);
            self.apply_task_id(key, Some(idx as i32 + 1));
        }
    }

    // Assignments

    pub fn add_assignment(&mut self, task: TaskKey, resource: ResourceKey) -> ProjectResult<AssignmentKey> {
        let owner = self.tasks.get(task.0).ok_or(ProjectError::UnknownTask)?;
        let assigned = self
            .resources
            .get(resource.0)
            .ok_or(ProjectError::UnknownResource)?;

        let mut assignment = ResourceAssignment::new(task, resource);
        assignment.task_id = owner.id();
        assignment.task_unique_id = owner.unique_id();
        assignment.set_resource_id(assigned.id());
        assignment.set_resource_unique_id(assigned.unique_id());

        let key = AssignmentKey(self.assignments.len());
        self.assignments.push(assignment);
        self.tasks[task.0].assignments.push(key);
        Ok(key)
    }

    pub fn assignment(&self, key: AssignmentKey) -> &ResourceAssignment {
        &self.assignments[key.0]
    }

    pub fn assignment_mut(&mut self, key: AssignmentKey) -> &mut ResourceAssignment {
        &mut self.assignments[key.0]
    }

    pub fn assignments(&self) -> impl Iterator<Item = (AssignmentKey, &ResourceAssignment)> {
        self.assignments
            .iter()
            .enumerate()
            .map(|(idx, assignment)| (AssignmentKey(idx), assignment))
    }

    pub fn resource_assignments(&self, resource: ResourceKey) -> impl Iterator<Item = &ResourceAssignment> {
        self.assignments
            .iter()
            .filter(move |a| a.resource() == resource)
    }
}

impl TaskIdLookup for ProjectFile {
    fn id_for_unique_id(&self, unique_id: i32) -> Option<i32> {
        self.task_by_unique_id(unique_id)
            .and_then(|key| self.task(key).id())
    }

    fn unique_id_for_id(&self, id: i32) -> Option<i32> {
        self.task_by_id(id)
            .and_then(|key| self.task(key).unique_id())
    }
}
