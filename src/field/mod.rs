//! Field identifiers and the schema mapping each identifier to the data kind
//! that drives its formatting and parsing.

mod assignment;
mod resource;
mod task;

pub use assignment::{AssignmentField, HeaderField};
pub use resource::ResourceField;
pub use task::TaskField;

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataKind {
    /// Passthrough; also the kind of every unmapped identifier.
    #[default]
    Text,
    Date,
    DateTime,
    Time,
    Currency,
    /// Assignment/resource units held as hundredths (100 == 100%).
    Units,
    Percentage,
    Duration,
    Rate,
    Accrue,
    Constraint,
    Priority,
    RelationList,
    Boolean,
    TaskType,
    Integer,
    Numeric,
}

/// Immutable identifier -> kind table for one entity type.
///
/// Each table is built once on first use and shared by every writer and
/// reader afterwards.
#[derive(Debug)]
pub struct FieldSchema {
    kinds: Box<[DataKind]>,
}

impl FieldSchema {
    pub(crate) fn build<I>(size: usize, entries: I) -> Self
    where
        I: IntoIterator<Item = (usize, DataKind)>,
    {
        let mut kinds = vec![DataKind::Text; size];
        for (id, kind) in entries {
            kinds[id] = kind;
        }
        Self {
            kinds: kinds.into_boxed_slice(),
        }
    }

    /// Kind of `id`; identifiers without an entry resolve to [`DataKind::Text`].
    pub fn kind_of(&self, id: usize) -> DataKind {
        self.kinds.get(id).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Expands `(first, count)` into `count` consecutive schema entries.
pub(crate) fn run(first: usize, count: usize, kind: DataKind) -> impl Iterator<Item = (usize, DataKind)> {
    (first..first + count).map(move |id| (id, kind))
}
