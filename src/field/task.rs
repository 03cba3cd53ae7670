use super::{DataKind, FieldSchema, run};
use crate::attributes::FieldSet;
use std::sync::LazyLock;

/// Task field identifier.
///
/// Standard identifiers are the task field numbers of the MPX format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskField(u16);

const EXTENDED_OFFSET: u16 = 153;

// Offsets of each extended family past EXTENDED_OFFSET.
const EXT_TEXT: u16 = 0;
const EXT_START: u16 = 20;
const EXT_FINISH: u16 = 27;
const EXT_COST: u16 = 34;
const EXT_DATE: u16 = 41;
const EXT_FLAG: u16 = 51;
const EXT_NUMBER: u16 = 61;
const EXT_DURATION: u16 = 76;
const EXT_OUTLINE_CODE: u16 = 83;
const EXT_COUNT: u16 = 93;

impl TaskField {
    pub const NAME: Self = Self(1);
    pub const WBS: Self = Self(2);
    pub const OUTLINE_LEVEL: Self = Self(3);
    pub const TEXT1: Self = Self(4);
    /// Notes travel in their own record and never appear in a field model.
    pub const NOTES: Self = Self(14);
    pub const CONTACT: Self = Self(15);
    pub const RESOURCE_GROUP: Self = Self(16);
    pub const WORK: Self = Self(20);
    pub const BASELINE_WORK: Self = Self(21);
    pub const ACTUAL_WORK: Self = Self(22);
    pub const REMAINING_WORK: Self = Self(23);
    pub const WORK_VARIANCE: Self = Self(24);
    pub const PERCENT_WORK_COMPLETE: Self = Self(25);
    pub const COST: Self = Self(30);
    pub const BASELINE_COST: Self = Self(31);
    pub const ACTUAL_COST: Self = Self(32);
    pub const REMAINING_COST: Self = Self(33);
    pub const COST_VARIANCE: Self = Self(34);
    pub const FIXED_COST: Self = Self(35);
    pub const COST1: Self = Self(36);
    pub const DURATION: Self = Self(40);
    pub const BASELINE_DURATION: Self = Self(41);
    pub const ACTUAL_DURATION: Self = Self(42);
    pub const REMAINING_DURATION: Self = Self(43);
    pub const PERCENT_COMPLETE: Self = Self(44);
    pub const DURATION_VARIANCE: Self = Self(45);
    pub const DURATION1: Self = Self(46);
    pub const START: Self = Self(50);
    pub const FINISH: Self = Self(51);
    pub const EARLY_START: Self = Self(52);
    pub const EARLY_FINISH: Self = Self(53);
    pub const LATE_START: Self = Self(54);
    pub const LATE_FINISH: Self = Self(55);
    pub const BASELINE_START: Self = Self(56);
    pub const BASELINE_FINISH: Self = Self(57);
    pub const ACTUAL_START: Self = Self(58);
    pub const ACTUAL_FINISH: Self = Self(59);
    pub const START1: Self = Self(60);
    pub const FINISH1: Self = Self(61);
    pub const START_VARIANCE: Self = Self(66);
    pub const FINISH_VARIANCE: Self = Self(67);
    pub const CONSTRAINT_DATE: Self = Self(68);
    pub const PREDECESSORS: Self = Self(70);
    pub const SUCCESSORS: Self = Self(71);
    pub const RESOURCE_NAMES: Self = Self(72);
    pub const RESOURCE_INITIALS: Self = Self(73);
    pub const UNIQUE_ID_PREDECESSORS: Self = Self(74);
    pub const UNIQUE_ID_SUCCESSORS: Self = Self(75);
    /// Rendered as yes/no: yes for fixed-duration tasks.
    pub const FIXED: Self = Self(80);
    pub const MILESTONE: Self = Self(81);
    pub const CRITICAL: Self = Self(82);
    pub const MARKED: Self = Self(83);
    pub const ROLLUP: Self = Self(84);
    pub const BCWS: Self = Self(85);
    pub const BCWP: Self = Self(86);
    pub const SV: Self = Self(87);
    pub const CV: Self = Self(88);
    pub const ID: Self = Self(90);
    pub const CONSTRAINT_TYPE: Self = Self(91);
    pub const DELAY: Self = Self(92);
    pub const FREE_SLACK: Self = Self(93);
    pub const TOTAL_SLACK: Self = Self(94);
    pub const PRIORITY: Self = Self(95);
    pub const SUBPROJECT_NAME: Self = Self(96);
    pub const PROJECT: Self = Self(97);
    pub const UNIQUE_ID: Self = Self(98);
    pub const OUTLINE_NUMBER: Self = Self(99);
    pub const FLAG1: Self = Self(110);
    pub const SUMMARY: Self = Self(120);
    pub const OBJECTS: Self = Self(121);
    pub const LINKED_FIELDS: Self = Self(122);
    pub const HIDE_BAR: Self = Self(123);
    pub const NUMBER1: Self = Self(140);
    pub const STOP: Self = Self(150);
    pub const RESUME_NO_EARLIER_THAN: Self = Self(151);
    pub const RESUME: Self = Self(152);

    pub fn text(n: u16) -> Self {
        Self::numbered("text", n, 30, Self::TEXT1, 10, EXT_TEXT)
    }

    pub fn start(n: u16) -> Self {
        assert!((1..=10).contains(&n), "task start field {n} out of range");
        if n <= 3 {
            Self(Self::START1.0 + 2 * (n - 1))
        } else {
            Self(EXTENDED_OFFSET + EXT_START + n - 4)
        }
    }

    pub fn finish(n: u16) -> Self {
        assert!((1..=10).contains(&n), "task finish field {n} out of range");
        if n <= 3 {
            Self(Self::FINISH1.0 + 2 * (n - 1))
        } else {
            Self(EXTENDED_OFFSET + EXT_FINISH + n - 4)
        }
    }

    pub fn cost(n: u16) -> Self {
        Self::numbered("cost", n, 10, Self::COST1, 3, EXT_COST)
    }

    pub fn date(n: u16) -> Self {
        assert!((1..=10).contains(&n), "task date field {n} out of range");
        Self(EXTENDED_OFFSET + EXT_DATE + n - 1)
    }

    pub fn flag(n: u16) -> Self {
        Self::numbered("flag", n, 20, Self::FLAG1, 10, EXT_FLAG)
    }

    pub fn number(n: u16) -> Self {
        Self::numbered("number", n, 20, Self::NUMBER1, 5, EXT_NUMBER)
    }

    pub fn duration(n: u16) -> Self {
        Self::numbered("duration", n, 10, Self::DURATION1, 3, EXT_DURATION)
    }

    pub fn outline_code(n: u16) -> Self {
        assert!((1..=10).contains(&n), "task outline code field {n} out of range");
        Self(EXTENDED_OFFSET + EXT_OUTLINE_CODE + n - 1)
    }

    /// Field `n` of a family whose first `standard` members are contiguous
    /// standard fields and whose remainder lives in the extended range.
    fn numbered(family: &str, n: u16, count: u16, first: Self, standard: u16, ext: u16) -> Self {
        assert!(
            (1..=count).contains(&n),
            "task {family} field {n} out of range 1..={count}"
        );
        if n <= standard {
            Self(first.0 + n - 1)
        } else {
            Self(EXTENDED_OFFSET + ext + n - standard - 1)
        }
    }

    pub fn is_identifier(self) -> bool {
        self == Self::ID || self == Self::UNIQUE_ID
    }
}

impl FieldSet for TaskField {
    const STANDARD_COUNT: usize = EXTENDED_OFFSET as usize;
    const EXTENDED_COUNT: usize = EXT_COUNT as usize;

    fn from_id(id: usize) -> Option<Self> {
        if id < Self::TOTAL {
            u16::try_from(id).ok().map(Self)
        } else {
            None
        }
    }

    fn id(self) -> usize {
        usize::from(self.0)
    }

    fn schema() -> &'static FieldSchema {
        &TASK_SCHEMA
    }
}

static TASK_SCHEMA: LazyLock<FieldSchema> = LazyLock::new(|| {
    use DataKind::*;
    let ext = (EXTENDED_OFFSET) as usize;
    let standard = [
        (TaskField::COST, Currency),
        (TaskField::BASELINE_COST, Currency),
        (TaskField::ACTUAL_COST, Currency),
        (TaskField::REMAINING_COST, Currency),
        (TaskField::COST_VARIANCE, Currency),
        (TaskField::FIXED_COST, Currency),
        (TaskField::BCWS, Currency),
        (TaskField::BCWP, Currency),
        (TaskField::SV, Currency),
        (TaskField::CV, Currency),
        (TaskField::WORK, Duration),
        (TaskField::BASELINE_WORK, Duration),
        (TaskField::ACTUAL_WORK, Duration),
        (TaskField::REMAINING_WORK, Duration),
        (TaskField::WORK_VARIANCE, Duration),
        (TaskField::DURATION, Duration),
        (TaskField::BASELINE_DURATION, Duration),
        (TaskField::ACTUAL_DURATION, Duration),
        (TaskField::REMAINING_DURATION, Duration),
        (TaskField::DURATION_VARIANCE, Duration),
        (TaskField::START_VARIANCE, Duration),
        (TaskField::FINISH_VARIANCE, Duration),
        (TaskField::DELAY, Duration),
        (TaskField::FREE_SLACK, Duration),
        (TaskField::TOTAL_SLACK, Duration),
        (TaskField::PERCENT_WORK_COMPLETE, Percentage),
        (TaskField::PERCENT_COMPLETE, Percentage),
        (TaskField::START, DateTime),
        (TaskField::FINISH, DateTime),
        (TaskField::EARLY_START, DateTime),
        (TaskField::EARLY_FINISH, DateTime),
        (TaskField::LATE_START, DateTime),
        (TaskField::LATE_FINISH, DateTime),
        (TaskField::BASELINE_START, DateTime),
        (TaskField::BASELINE_FINISH, DateTime),
        (TaskField::ACTUAL_START, DateTime),
        (TaskField::ACTUAL_FINISH, DateTime),
        (TaskField::CONSTRAINT_DATE, DateTime),
        (TaskField::STOP, DateTime),
        (TaskField::RESUME_NO_EARLIER_THAN, DateTime),
        (TaskField::RESUME, DateTime),
        (TaskField::PREDECESSORS, RelationList),
        (TaskField::CONSTRAINT_TYPE, Constraint),
        (TaskField::PRIORITY, Priority),
        (TaskField::FIXED, TaskType),
        (TaskField::MILESTONE, Boolean),
        (TaskField::CRITICAL, Boolean),
        (TaskField::MARKED, Boolean),
        (TaskField::ROLLUP, Boolean),
        (TaskField::SUMMARY, Boolean),
        (TaskField::HIDE_BAR, Boolean),
        (TaskField::ID, Integer),
        (TaskField::UNIQUE_ID, Integer),
        (TaskField::OUTLINE_LEVEL, Integer),
        (TaskField::OBJECTS, Integer),
    ]
    .into_iter()
    .map(|(field, kind)| (field.id(), kind));

    let families = run(TaskField::COST1.id(), 3, Currency)
        .chain(run(TaskField::DURATION1.id(), 3, Duration))
        .chain(run(TaskField::START1.id(), 6, DateTime))
        .chain(run(TaskField::FLAG1.id(), 10, Boolean))
        .chain(run(TaskField::NUMBER1.id(), 5, Numeric));

    let extended = run(ext + EXT_START as usize, 7, DateTime)
        .chain(run(ext + EXT_FINISH as usize, 7, DateTime))
        .chain(run(ext + EXT_COST as usize, 7, Currency))
        .chain(run(ext + EXT_DATE as usize, 10, DateTime))
        .chain(run(ext + EXT_FLAG as usize, 10, Boolean))
        .chain(run(ext + EXT_NUMBER as usize, 15, Numeric))
        .chain(run(ext + EXT_DURATION as usize, 7, Duration));

    FieldSchema::build(TaskField::TOTAL, standard.chain(families).chain(extended))
});
