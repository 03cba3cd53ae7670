use crate::project::{ProjectError, ProjectResult};
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Maximum number of working-time ranges on one day or exception.
pub const MAX_RANGES: usize = 3;

/// Day of the week, numbered from Sunday as in the calendar records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code - 1)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    fn index(self) -> usize {
        (self as usize) - 1
    }
}

impl From<Weekday> for Day {
    fn from(value: Weekday) -> Self {
        Self::ALL[value.num_days_from_sunday() as usize]
    }
}

/// Working status of a weekday; `Default` defers to the base calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DayType {
    NonWorking = 0,
    Working = 1,
    #[default]
    Default = 2,
}

impl DayType {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::NonWorking),
            1 => Some(Self::Working),
            2 => Some(Self::Default),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Range from whole hours, e.g. `TimeRange::hours(8, 12)`.
    ///
    /// Panics when either hour is outside `0..24`.
    pub fn hours(start: u32, end: u32) -> Self {
        let at = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or_else(|| panic!("hour {h} out of range"));
        Self::new(at(start), at(end))
    }

    /// An end of midnight means the end of the day.
    fn end_minutes(&self) -> u32 {
        let minutes = minutes_of(self.end);
        if minutes == 0 { 24 * 60 } else { minutes }
    }

    fn overlaps(&self, other: &TimeRange) -> bool {
        minutes_of(self.start) < other.end_minutes() && minutes_of(other.start) < self.end_minutes()
    }
}

fn minutes_of(time: NaiveTime) -> u32 {
    use chrono::Timelike;
    time.hour() * 60 + time.minute()
}

fn push_range(ranges: &mut Vec<TimeRange>, range: TimeRange) -> ProjectResult<()> {
    if ranges.len() >= MAX_RANGES {
        return Err(ProjectError::MaximumRecordsExceeded {
            what: "working time range",
        });
    }
    if ranges.iter().any(|r| r.overlaps(&range)) {
        return Err(ProjectError::OverlappingRange);
    }
    ranges.push(range);
    Ok(())
}

/// Working hours for one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarHours {
    day: Day,
    ranges: Vec<TimeRange>,
}

impl CalendarHours {
    pub fn new(day: Day) -> Self {
        Self {
            day,
            ranges: Vec::new(),
        }
    }

    pub fn day(&self) -> Day {
        self.day
    }

    pub fn add_range(&mut self, range: TimeRange) -> ProjectResult<()> {
        push_range(&mut self.ranges, range)
    }

    pub fn range(&self, idx: usize) -> Option<&TimeRange> {
        self.ranges.get(idx)
    }

    pub fn ranges(&self) -> &[TimeRange] {
        &self.ranges
    }
}

/// Date span whose working status overrides the regular week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarException {
    from: NaiveDate,
    to: NaiveDate,
    working: bool,
    ranges: Vec<TimeRange>,
}

impl CalendarException {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from,
            to,
            working: false,
            ranges: Vec::new(),
        }
    }

    pub fn from_date(&self) -> NaiveDate {
        self.from
    }

    pub fn to_date(&self) -> NaiveDate {
        self.to
    }

    pub fn is_working(&self) -> bool {
        self.working
    }

    pub fn set_working(&mut self, working: bool) {
        self.working = working;
    }

    pub fn add_range(&mut self, range: TimeRange) -> ProjectResult<()> {
        push_range(&mut self.ranges, range)
    }

    pub fn range(&self, idx: usize) -> Option<&TimeRange> {
        self.ranges.get(idx)
    }

    pub fn ranges(&self) -> &[TimeRange] {
        &self.ranges
    }
}

impl Ord for CalendarException {
    fn cmp(&self, other: &Self) -> Ordering {
        self.from
            .cmp(&other.from)
            .then_with(|| self.to.cmp(&other.to))
    }
}

impl PartialOrd for CalendarException {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A base calendar, or a resource calendar deriving from one by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCalendar {
    name: Option<String>,
    base_calendar: Option<String>,
    days: [DayType; 7],
    hours: [Option<CalendarHours>; 7],
    exceptions: Vec<CalendarException>,
}

impl ProjectCalendar {
    /// Creates a base calendar with a Monday to Friday working week.
    pub fn base(name: impl Into<String>) -> Self {
        let mut days = [DayType::Working; 7];
        days[Day::Sunday.index()] = DayType::NonWorking;
        days[Day::Saturday.index()] = DayType::NonWorking;
        Self {
            name: Some(name.into()),
            base_calendar: None,
            days,
            hours: Default::default(),
            exceptions: Vec::new(),
        }
    }

    /// Creates a calendar deriving from the base calendar `base_name`;
    /// every day defers to the base.
    pub fn derived(base_name: impl Into<String>) -> Self {
        Self {
            name: None,
            base_calendar: Some(base_name.into()),
            days: [DayType::Default; 7],
            hours: Default::default(),
            exceptions: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn base_calendar_name(&self) -> Option<&str> {
        self.base_calendar.as_deref()
    }

    pub fn is_base(&self) -> bool {
        self.base_calendar.is_none()
    }

    pub fn day_type(&self, day: Day) -> DayType {
        self.days[day.index()]
    }

    pub fn set_day_type(&mut self, day: Day, day_type: DayType) {
        self.days[day.index()] = day_type;
    }

    pub fn day_types(&self) -> &[DayType; 7] {
        &self.days
    }

    /// Working hours for `day`, created empty on first use.
    pub fn add_hours(&mut self, day: Day) -> &mut CalendarHours {
        self.hours[day.index()].get_or_insert_with(|| CalendarHours::new(day))
    }

    pub fn hours(&self, day: Day) -> Option<&CalendarHours> {
        self.hours[day.index()].as_ref()
    }

    /// Hours records in weekday order, Sunday first.
    pub fn all_hours(&self) -> impl Iterator<Item = &CalendarHours> {
        self.hours.iter().flatten()
    }

    pub fn add_exception(&mut self, from: NaiveDate, to: NaiveDate) -> &mut CalendarException {
        self.exceptions.push(CalendarException::new(from, to));
        let last = self.exceptions.len() - 1;
        &mut self.exceptions[last]
    }

    /// Exceptions in insertion order.
    pub fn exceptions(&self) -> &[CalendarException] {
        &self.exceptions
    }

    /// Exceptions ordered by date, the order consumers of the file require.
    pub fn sorted_exceptions(&self) -> Vec<&CalendarException> {
        let mut sorted: Vec<&CalendarException> = self.exceptions.iter().collect();
        sorted.sort();
        sorted
    }
}
