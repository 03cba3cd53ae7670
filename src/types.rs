use serde::{Deserialize, Serialize};

/// Unit attached to a duration or a rate.
///
/// The numeric codes are the ones written to the default settings and
/// recurring task records, and index the locale's time-unit name table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Minutes = 0,
    Hours = 1,
    Days = 2,
    Weeks = 3,
    Months = 4,
    Percent = 5,
    Years = 6,
    ElapsedMinutes = 7,
    ElapsedHours = 8,
    ElapsedDays = 9,
    ElapsedWeeks = 10,
    ElapsedMonths = 11,
    ElapsedPercent = 12,
    ElapsedYears = 13,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 14] = [
        TimeUnit::Minutes,
        TimeUnit::Hours,
        TimeUnit::Days,
        TimeUnit::Weeks,
        TimeUnit::Months,
        TimeUnit::Percent,
        TimeUnit::Years,
        TimeUnit::ElapsedMinutes,
        TimeUnit::ElapsedHours,
        TimeUnit::ElapsedDays,
        TimeUnit::ElapsedWeeks,
        TimeUnit::ElapsedMonths,
        TimeUnit::ElapsedPercent,
        TimeUnit::ElapsedYears,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }
}

/// A magnitude expressed in a [`TimeUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Duration {
    pub duration: f64,
    pub units: TimeUnit,
}

impl Duration {
    pub fn new(duration: f64, units: TimeUnit) -> Self {
        Self { duration, units }
    }

    pub fn days(duration: f64) -> Self {
        Self::new(duration, TimeUnit::Days)
    }

    pub fn hours(duration: f64) -> Self {
        Self::new(duration, TimeUnit::Hours)
    }

    pub fn zero() -> Self {
        Self::new(0.0, TimeUnit::Days)
    }

    pub fn is_zero(&self) -> bool {
        self.duration == 0.0
    }
}

/// Cost per unit of time, e.g. `$25.00/h`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub amount: f64,
    pub units: TimeUnit,
}

impl Rate {
    pub fn new(amount: f64, units: TimeUnit) -> Self {
        Self { amount, units }
    }
}

/// How a resource's cost accrues against a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccrueType {
    Start = 1,
    End = 2,
    Prorated = 3,
}

impl AccrueType {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Start),
            2 => Some(Self::End),
            3 => Some(Self::Prorated),
            _ => None,
        }
    }

    /// Position in the locale's accrue name table.
    pub(crate) fn name_index(self) -> usize {
        (self as usize) - 1
    }
}

/// Scheduling constraint applied to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConstraintType {
    #[default]
    AsSoonAsPossible = 0,
    AsLateAsPossible = 1,
    MustStartOn = 2,
    MustFinishOn = 3,
    StartNoEarlierThan = 4,
    StartNoLaterThan = 5,
    FinishNoEarlierThan = 6,
    FinishNoLaterThan = 7,
}

impl ConstraintType {
    pub const ALL: [ConstraintType; 8] = [
        ConstraintType::AsSoonAsPossible,
        ConstraintType::AsLateAsPossible,
        ConstraintType::MustStartOn,
        ConstraintType::MustFinishOn,
        ConstraintType::StartNoEarlierThan,
        ConstraintType::StartNoLaterThan,
        ConstraintType::FinishNoEarlierThan,
        ConstraintType::FinishNoLaterThan,
    ];

    /// Resolves a numeric constraint code.
    ///
    /// Absent or out-of-range codes resolve to [`ConstraintType::AsSoonAsPossible`].
    pub fn from_code(code: impl Into<Option<i32>>) -> Self {
        code.into()
            .and_then(|c| usize::try_from(c).ok())
            .and_then(|idx| Self::ALL.get(idx).copied())
            .unwrap_or_default()
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Task priority on the 0..=1000 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Priority(i32);

impl Priority {
    pub const LOWEST: i32 = 100;
    pub const VERY_LOW: i32 = 200;
    pub const LOWER: i32 = 300;
    pub const LOW: i32 = 400;
    pub const MEDIUM: i32 = 500;
    pub const HIGH: i32 = 600;
    pub const HIGHER: i32 = 700;
    pub const VERY_HIGH: i32 = 800;
    pub const HIGHEST: i32 = 900;
    pub const DO_NOT_LEVEL: i32 = 1000;

    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(self) -> i32 {
        self.0
    }

    /// Band number in `1..=10`, computed after clamping into `[100, 1000]`.
    pub fn band(self) -> usize {
        let clamped = self.0.clamp(Self::LOWEST, Self::DO_NOT_LEVEL);
        (clamped / 100) as usize
    }

    pub(crate) fn from_band(band: usize) -> Self {
        Self((band as i32) * 100)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(Self::MEDIUM)
    }
}

/// Dependency type between a predecessor and its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RelationType {
    FinishFinish = 0,
    #[default]
    FinishStart = 1,
    StartFinish = 2,
    StartStart = 3,
}

impl RelationType {
    pub const ALL: [RelationType; 4] = [
        RelationType::FinishFinish,
        RelationType::FinishStart,
        RelationType::StartFinish,
        RelationType::StartStart,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Link from a successor task to one of its predecessors.
///
/// The predecessor is held by unique id; the positional id written to the
/// file is resolved at write time so renumbering never leaves a stale link.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub task_unique_id: i32,
    pub kind: RelationType,
    pub lag: Duration,
}

impl Relation {
    pub fn new(task_unique_id: i32, kind: RelationType, lag: Duration) -> Self {
        Self {
            task_unique_id,
            kind,
            lag,
        }
    }

    pub fn finish_start(task_unique_id: i32) -> Self {
        Self::new(task_unique_id, RelationType::FinishStart, Duration::zero())
    }
}

/// Which of duration, units, or work is held fixed when a task changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskType {
    #[default]
    FixedUnits,
    FixedDuration,
    FixedWork,
}
