use crate::attributes::{AttributeStore, FieldSet};
use crate::field::{ResourceField, TaskField};
use crate::project::ProjectFile;
use std::collections::BTreeSet;
use tracing::warn;

/// Ordered list of the fields written for every row of one entity type.
///
/// Only standard fields can be part of a model; notes are written as
/// their own record and never appear in one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldModel<F: FieldSet> {
    fields: Vec<F>,
}

impl<F: FieldSet + Ord> FieldModel<F> {
    /// Builds a model from an explicit field order.
    ///
    /// Extended fields, notes and repeated fields are dropped with a warning.
    pub fn new(fields: impl IntoIterator<Item = F>, notes: F) -> Self {
        let mut seen = BTreeSet::new();
        let mut kept = Vec::new();
        for field in fields {
            if field.is_extended() || field == notes {
                warn!(?field, "field cannot be part of a record model, skipped");
                continue;
            }
            if seen.insert(field) {
                kept.push(field);
            }
        }
        Self { fields: kept }
    }

    /// Every populated standard field across `stores` plus `always`, in
    /// identifier order.
    fn derive<'s>(
        stores: impl Iterator<Item = &'s AttributeStore<F>>,
        always: &[F],
        notes: F,
    ) -> Self {
        let mut fields: BTreeSet<F> = always.iter().copied().collect();
        for store in stores {
            fields.extend(
                store
                    .populated()
                    .map(|(field, _)| field)
                    .filter(|field| !field.is_extended() && *field != notes),
            );
        }
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn fields(&self) -> &[F] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field numbers as written in the numeric model record.
    pub fn record_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.fields.iter().map(|field| field.id())
    }
}

impl FieldModel<ResourceField> {
    pub fn resources(fields: impl IntoIterator<Item = ResourceField>) -> Self {
        Self::new(fields, ResourceField::NOTES)
    }

    /// Model covering every field any resource of `project` has set.
    pub fn for_resources(project: &ProjectFile) -> Self {
        Self::derive(
            project.resources().map(|(_, r)| r.fields()),
            &[ResourceField::ID, ResourceField::NAME, ResourceField::UNIQUE_ID],
            ResourceField::NOTES,
        )
    }
}

impl FieldModel<TaskField> {
    pub fn tasks(fields: impl IntoIterator<Item = TaskField>) -> Self {
        Self::new(fields, TaskField::NOTES)
    }

    /// Model covering every field any task of `project` has set.
    ///
    /// The outline level is always present so the hierarchy survives a
    /// round trip.
    pub fn for_tasks(project: &ProjectFile) -> Self {
        Self::derive(
            project.tasks().map(|(_, t)| t.fields()),
            &[
                TaskField::NAME,
                TaskField::OUTLINE_LEVEL,
                TaskField::ID,
                TaskField::UNIQUE_ID,
            ],
            TaskField::NOTES,
        )
    }
}
