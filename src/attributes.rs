use crate::field::{DataKind, FieldSchema};
use crate::types::{
    AccrueType, ConstraintType, Duration, Priority, Rate, Relation, TaskType,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use std::marker::PhantomData;

/// A value held in an [`AttributeStore`] slot.
///
/// The store does not check a value against its field's [`DataKind`]; the
/// value codec does that when the field is formatted.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i32),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Duration(Duration),
    Rate(Rate),
    Accrue(AccrueType),
    Constraint(ConstraintType),
    Priority(Priority),
    Relations(Vec<Relation>),
    TaskType(TaskType),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            Value::Integer(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(v) => Some(*v),
            Value::Date(d) => Some(d.and_time(NaiveTime::MIN)),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Value::Duration(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_rate(&self) -> Option<Rate> {
        match self {
            Value::Rate(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_relations(&self) -> Option<&[Relation]> {
        match self {
            Value::Relations(v) => Some(v),
            _ => None,
        }
    }

    /// Short name of the variant, used in type mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Time(_) => "time",
            Value::Duration(_) => "duration",
            Value::Rate(_) => "rate",
            Value::Accrue(_) => "accrue",
            Value::Constraint(_) => "constraint",
            Value::Priority(_) => "priority",
            Value::Relations(_) => "relations",
            Value::TaskType(_) => "task type",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::Time(value)
    }
}

impl From<Duration> for Value {
    fn from(value: Duration) -> Self {
        Value::Duration(value)
    }
}

impl From<Rate> for Value {
    fn from(value: Rate) -> Self {
        Value::Rate(value)
    }
}

impl From<AccrueType> for Value {
    fn from(value: AccrueType) -> Self {
        Value::Accrue(value)
    }
}

impl From<ConstraintType> for Value {
    fn from(value: ConstraintType) -> Self {
        Value::Constraint(value)
    }
}

impl From<Priority> for Value {
    fn from(value: Priority) -> Self {
        Value::Priority(value)
    }
}

impl From<Vec<Relation>> for Value {
    fn from(value: Vec<Relation>) -> Self {
        Value::Relations(value)
    }
}

impl From<TaskType> for Value {
    fn from(value: TaskType) -> Self {
        Value::TaskType(value)
    }
}

/// Identifier space of one entity type.
///
/// Identifiers below [`FieldSet::STANDARD_COUNT`] are defined by the file
/// format; the following [`FieldSet::EXTENDED_COUNT`] identifiers hold
/// user-defined attributes with no slot in the format's own numbering.
pub trait FieldSet: Copy + Eq + fmt::Debug + 'static {
    const STANDARD_COUNT: usize;
    const EXTENDED_COUNT: usize;
    const TOTAL: usize = Self::STANDARD_COUNT + Self::EXTENDED_COUNT;

    /// Builds a field from its raw identifier, `None` when out of range.
    fn from_id(id: usize) -> Option<Self>;

    fn id(self) -> usize;

    fn schema() -> &'static FieldSchema;

    fn kind(self) -> DataKind {
        Self::schema().kind_of(self.id())
    }

    fn is_extended(self) -> bool {
        self.id() >= Self::STANDARD_COUNT
    }
}

/// Dense, array-backed attribute storage for one entity instance.
#[derive(Clone, PartialEq)]
pub struct AttributeStore<F: FieldSet> {
    slots: Box<[Option<Value>]>,
    _fields: PhantomData<F>,
}

impl<F: FieldSet> AttributeStore<F> {
    pub fn new() -> Self {
        Self {
            slots: vec![None; F::TOTAL].into_boxed_slice(),
            _fields: PhantomData,
        }
    }

    pub fn get(&self, field: F) -> Option<&Value> {
        self.slots[Self::slot(field)].as_ref()
    }

    /// Stores `value`, or clears the slot when `value` is `None`.
    pub fn put(&mut self, field: F, value: Option<Value>) {
        self.slots[Self::slot(field)] = value;
    }

    pub fn take(&mut self, field: F) -> Option<Value> {
        self.slots[Self::slot(field)].take()
    }

    pub fn is_set(&self, field: F) -> bool {
        self.get(field).is_some()
    }

    /// Iterates the populated slots in identifier order.
    pub fn populated(&self) -> impl Iterator<Item = (F, &Value)> + '_ {
        self.slots.iter().enumerate().filter_map(|(id, slot)| {
            let value = slot.as_ref()?;
            F::from_id(id).map(|field| (field, value))
        })
    }

    fn slot(field: F) -> usize {
        let id = field.id();
        assert!(
            id < F::TOTAL,
            "field identifier {id} exceeds the declared maximum {}",
            F::TOTAL
        );
        id
    }
}

impl<F: FieldSet> Default for AttributeStore<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FieldSet> fmt::Debug for AttributeStore<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.populated()).finish()
    }
}
