use super::{DataKind, FieldSchema, run};
use crate::attributes::FieldSet;
use std::sync::LazyLock;

/// Resource field identifier.
///
/// Standard identifiers are the resource field numbers of the MPX format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceField(u16);

const EXTENDED_OFFSET: u16 = 52;

impl ResourceField {
    pub const NAME: Self = Self(1);
    pub const INITIALS: Self = Self(2);
    pub const GROUP: Self = Self(3);
    pub const CODE: Self = Self(4);
    pub const TEXT1: Self = Self(5);
    pub const TEXT2: Self = Self(6);
    pub const TEXT3: Self = Self(7);
    pub const TEXT4: Self = Self(8);
    pub const TEXT5: Self = Self(9);
    /// Notes travel in their own record and never appear in a field model.
    pub const NOTES: Self = Self(10);
    pub const EMAIL_ADDRESS: Self = Self(11);
    pub const WORK: Self = Self(20);
    pub const BASELINE_WORK: Self = Self(21);
    pub const ACTUAL_WORK: Self = Self(22);
    pub const REMAINING_WORK: Self = Self(23);
    pub const OVERTIME_WORK: Self = Self(24);
    pub const WORK_VARIANCE: Self = Self(25);
    pub const PERCENT_WORK_COMPLETE: Self = Self(26);
    pub const COST: Self = Self(30);
    pub const BASELINE_COST: Self = Self(31);
    pub const ACTUAL_COST: Self = Self(32);
    pub const REMAINING_COST: Self = Self(33);
    pub const COST_VARIANCE: Self = Self(34);
    pub const ID: Self = Self(40);
    pub const MAX_UNITS: Self = Self(41);
    pub const STANDARD_RATE: Self = Self(42);
    pub const OVERTIME_RATE: Self = Self(43);
    pub const COST_PER_USE: Self = Self(44);
    pub const ACCRUE_AT: Self = Self(45);
    pub const OVERALLOCATED: Self = Self(46);
    pub const PEAK_UNITS: Self = Self(47);
    pub const BASE_CALENDAR: Self = Self(48);
    pub const UNIQUE_ID: Self = Self(49);
    pub const OBJECTS: Self = Self(50);
    pub const LINKED_FIELDS: Self = Self(51);

    /// Text1..=Text30; 1..=5 are standard, the rest extended.
    pub fn text(n: u16) -> Self {
        assert!((1..=30).contains(&n), "resource text field {n} out of range");
        if n <= 5 {
            Self(Self::TEXT1.0 + n - 1)
        } else {
            Self(EXTENDED_OFFSET + n - 6)
        }
    }

    pub fn start(n: u16) -> Self {
        Self::extended("start", n, 10, 25)
    }

    pub fn finish(n: u16) -> Self {
        Self::extended("finish", n, 10, 35)
    }

    pub fn cost(n: u16) -> Self {
        Self::extended("cost", n, 10, 45)
    }

    pub fn date(n: u16) -> Self {
        Self::extended("date", n, 10, 55)
    }

    pub fn flag(n: u16) -> Self {
        Self::extended("flag", n, 20, 65)
    }

    pub fn number(n: u16) -> Self {
        Self::extended("number", n, 20, 85)
    }

    pub fn duration(n: u16) -> Self {
        Self::extended("duration", n, 10, 105)
    }

    pub fn outline_code(n: u16) -> Self {
        Self::extended("outline code", n, 10, 115)
    }

    fn extended(family: &str, n: u16, count: u16, base: u16) -> Self {
        assert!(
            (1..=count).contains(&n),
            "resource {family} field {n} out of range 1..={count}"
        );
        Self(EXTENDED_OFFSET + base + n - 1)
    }

    pub fn is_identifier(self) -> bool {
        self == Self::ID || self == Self::UNIQUE_ID
    }
}

impl FieldSet for ResourceField {
    const STANDARD_COUNT: usize = EXTENDED_OFFSET as usize;
    const EXTENDED_COUNT: usize = 125;

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
        &RESOURCE_SCHEMA
    }
}

static RESOURCE_SCHEMA: LazyLock<FieldSchema> = LazyLock::new(|| {
    use DataKind::*;
    let ext = EXTENDED_OFFSET as usize;
    let standard = [
        (ResourceField::COST, Currency),
        (ResourceField::COST_PER_USE, Currency),
        (ResourceField::ACTUAL_COST, Currency),
        (ResourceField::REMAINING_COST, Currency),
        (ResourceField::COST_VARIANCE, Currency),
        (ResourceField::BASELINE_COST, Currency),
        (ResourceField::MAX_UNITS, Units),
        (ResourceField::PEAK_UNITS, Percentage),
        (ResourceField::PERCENT_WORK_COMPLETE, Percentage),
        (ResourceField::ACCRUE_AT, Accrue),
        (ResourceField::WORK, Duration),
        (ResourceField::ACTUAL_WORK, Duration),
        (ResourceField::OVERTIME_WORK, Duration),
        (ResourceField::REMAINING_WORK, Duration),
        (ResourceField::WORK_VARIANCE, Duration),
        (ResourceField::BASELINE_WORK, Duration),
        (ResourceField::STANDARD_RATE, Rate),
        (ResourceField::OVERTIME_RATE, Rate),
        (ResourceField::OVERALLOCATED, Boolean),
        (ResourceField::ID, Integer),
        (ResourceField::UNIQUE_ID, Integer),
        (ResourceField::OBJECTS, Integer),
    ]
    .into_iter()
    .map(|(field, kind)| (field.id(), kind));

    let extended = run(ext + 25, 10, DateTime)
        .chain(run(ext + 35, 10, DateTime))
        .chain(run(ext + 45, 10, Currency))
        .chain(run(ext + 55, 10, DateTime))
        .chain(run(ext + 65, 20, Boolean))
        .chain(run(ext + 85, 20, Numeric))
        .chain(run(ext + 105, 10, Duration));

    FieldSchema::build(ResourceField::TOTAL, standard.chain(extended))
});
