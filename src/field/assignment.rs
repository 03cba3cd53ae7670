use super::{DataKind, FieldSchema};
use crate::attributes::FieldSet;
use std::sync::LazyLock;

/// Resource assignment field.
///
/// The assignment record has a fixed layout; identifiers follow the column
/// order of that record, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssignmentField(u16);

impl AssignmentField {
    pub const RESOURCE_ID: Self = Self(1);
    pub const UNITS: Self = Self(2);
    pub const WORK: Self = Self(3);
    pub const PLANNED_WORK: Self = Self(4);
    pub const ACTUAL_WORK: Self = Self(5);
    pub const OVERTIME_WORK: Self = Self(6);
    pub const COST: Self = Self(7);
    pub const PLANNED_COST: Self = Self(8);
    pub const ACTUAL_COST: Self = Self(9);
    pub const START: Self = Self(10);
    pub const FINISH: Self = Self(11);
    pub const DELAY: Self = Self(12);
    pub const RESOURCE_UNIQUE_ID: Self = Self(13);

    /// Every field in record column order.
    pub const RECORD: [Self; 13] = [
        Self::RESOURCE_ID,
        Self::UNITS,
        Self::WORK,
        Self::PLANNED_WORK,
        Self::ACTUAL_WORK,
        Self::OVERTIME_WORK,
        Self::COST,
        Self::PLANNED_COST,
        Self::ACTUAL_COST,
        Self::START,
        Self::FINISH,
        Self::DELAY,
        Self::RESOURCE_UNIQUE_ID,
    ];

    pub fn is_identifier(self) -> bool {
        self == Self::RESOURCE_ID || self == Self::RESOURCE_UNIQUE_ID
    }
}

impl FieldSet for AssignmentField {
    const STANDARD_COUNT: usize = 14;
    const EXTENDED_COUNT: usize = 0;

    fn from_id(id: usize) -> Option<Self> {
        (1..Self::TOTAL)
            .contains(&id)
            .then(|| Self(id as u16))
    }

    fn id(self) -> usize {
        usize::from(self.0)
    }

    fn schema() -> &'static FieldSchema {
        &ASSIGNMENT_SCHEMA
    }
}

static ASSIGNMENT_SCHEMA: LazyLock<FieldSchema> = LazyLock::new(|| {
    use DataKind::*;
    let kinds = [
        Integer, Units, Duration, Duration, Duration, Duration, Currency, Currency, Currency,
        DateTime, DateTime, Duration, Integer,
    ];
    FieldSchema::build(
        AssignmentField::TOTAL,
        AssignmentField::RECORD.iter().map(|f| f.id()).zip(kinds),
    )
});

/// Project header field, numbered in the column order of the project
/// header record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeaderField(u16);

impl HeaderField {
    pub const PROJECT_TITLE: Self = Self(1);
    pub const COMPANY: Self = Self(2);
    pub const MANAGER: Self = Self(3);
    pub const CALENDAR_NAME: Self = Self(4);
    pub const START_DATE: Self = Self(5);
    pub const FINISH_DATE: Self = Self(6);
    /// `0` schedules from the start date, `1` from the finish date.
    pub const SCHEDULE_FROM: Self = Self(7);
    pub const CURRENT_DATE: Self = Self(8);
    pub const COMMENTS: Self = Self(9);
    pub const COST: Self = Self(10);
    pub const BASELINE_COST: Self = Self(11);
    pub const ACTUAL_COST: Self = Self(12);
    pub const WORK: Self = Self(13);
    pub const BASELINE_WORK: Self = Self(14);
    pub const ACTUAL_WORK: Self = Self(15);
    pub const WORK2: Self = Self(16);
    pub const DURATION: Self = Self(17);
    pub const BASELINE_DURATION: Self = Self(18);
    pub const ACTUAL_DURATION: Self = Self(19);
    pub const PERCENTAGE_COMPLETE: Self = Self(20);
    pub const BASELINE_START: Self = Self(21);
    pub const BASELINE_FINISH: Self = Self(22);
    pub const ACTUAL_START: Self = Self(23);
    pub const ACTUAL_FINISH: Self = Self(24);
    pub const START_VARIANCE: Self = Self(25);
    pub const FINISH_VARIANCE: Self = Self(26);
    pub const SUBJECT: Self = Self(27);
    pub const AUTHOR: Self = Self(28);
    pub const KEYWORDS: Self = Self(29);

    /// Every field in record column order.
    pub fn record() -> impl Iterator<Item = Self> {
        (1..Self::TOTAL as u16).map(Self)
    }
}

impl FieldSet for HeaderField {
    const STANDARD_COUNT: usize = 30;
    const EXTENDED_COUNT: usize = 0;

    fn from_id(id: usize) -> Option<Self> {
        (1..Self::TOTAL)
            .contains(&id)
            .then(|| Self(id as u16))
    }

    fn id(self) -> usize {
        usize::from(self.0)
    }

    fn schema() -> &'static FieldSchema {
        &HEADER_SCHEMA
    }
}

static HEADER_SCHEMA: LazyLock<FieldSchema> = LazyLock::new(|| {
    use DataKind::*;
    let entries = [
        (HeaderField::START_DATE, DateTime),
        (HeaderField::FINISH_DATE, DateTime),
        (HeaderField::SCHEDULE_FROM, Integer),
        (HeaderField::CURRENT_DATE, DateTime),
        (HeaderField::COST, Currency),
        (HeaderField::BASELINE_COST, Currency),
        (HeaderField::ACTUAL_COST, Currency),
        (HeaderField::WORK, Duration),
        (HeaderField::BASELINE_WORK, Duration),
        (HeaderField::ACTUAL_WORK, Duration),
        (HeaderField::WORK2, Percentage),
        (HeaderField::DURATION, Duration),
        (HeaderField::BASELINE_DURATION, Duration),
        (HeaderField::ACTUAL_DURATION, Duration),
        (HeaderField::PERCENTAGE_COMPLETE, Percentage),
        (HeaderField::BASELINE_START, DateTime),
        (HeaderField::BASELINE_FINISH, DateTime),
        (HeaderField::ACTUAL_START, DateTime),
        (HeaderField::ACTUAL_FINISH, DateTime),
        (HeaderField::START_VARIANCE, Duration),
        (HeaderField::FINISH_VARIANCE, Duration),
    ];
    FieldSchema::build(
        HeaderField::TOTAL,
        entries.into_iter().map(|(field, kind)| (field.id(), kind)),
    )
});
