use chrono::{NaiveDate, Weekday};
use pretty_assertions::assert_eq;
use schedule_mpx::{Day, DayType, ProjectCalendar, ProjectError, ProjectFile, TimeRange};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn base_calendar_works_weekdays() {
    let cal = ProjectCalendar::base("Standard");
    assert!(cal.is_base());
    assert_eq!(cal.name(), Some("Standard"));
    assert_eq!(cal.day_type(Day::Sunday), DayType::NonWorking);
    assert_eq!(cal.day_type(Day::Wednesday), DayType::Working);
    assert_eq!(cal.day_type(Day::Saturday), DayType::NonWorking);
}

#[test]
fn derived_calendar_defers_every_day() {
    let cal = ProjectCalendar::derived("Standard");
    assert!(!cal.is_base());
    assert_eq!(cal.name(), None);
    assert_eq!(cal.base_calendar_name(), Some("Standard"));
    assert!(cal.day_types().iter().all(|t| *t == DayType::Default));
}

#[test]
fn default_base_calendar_has_split_weekday_hours() {
    let mut project = ProjectFile::new();
    project.add_default_base_calendar().unwrap();

    let cal = project.base_calendar("Standard").unwrap();
    let monday = cal.hours(Day::Monday).unwrap();
    assert_eq!(
        monday.ranges(),
        &[TimeRange::hours(8, 12), TimeRange::hours(13, 17)]
    );
    assert!(cal.hours(Day::Sunday).is_none());
    assert_eq!(cal.all_hours().count(), 5);
}

#[test]
fn fourth_range_is_rejected() {
    let mut cal = ProjectCalendar::base("Shifts");
    let hours = cal.add_hours(Day::Monday);
    hours.add_range(TimeRange::hours(6, 8)).unwrap();
    hours.add_range(TimeRange::hours(9, 12)).unwrap();
    hours.add_range(TimeRange::hours(13, 17)).unwrap();

    let err = hours.add_range(TimeRange::hours(18, 20)).unwrap_err();
    assert!(matches!(
        err,
        ProjectError::MaximumRecordsExceeded { what: "working time range" }
    ));
    assert_eq!(hours.ranges().len(), 3);
}

#[test]
fn overlapping_ranges_are_rejected() {
    let mut cal = ProjectCalendar::base("Standard");
    let hours = cal.add_hours(Day::Tuesday);
    hours.add_range(TimeRange::hours(8, 12)).unwrap();
    hours.add_range(TimeRange::hours(12, 13)).unwrap();

    let err = hours.add_range(TimeRange::hours(11, 14)).unwrap_err();
    assert!(matches!(err, ProjectError::OverlappingRange));
}

#[test]
fn midnight_end_covers_the_rest_of_the_day() {
    let mut cal = ProjectCalendar::base("Night");
    let hours = cal.add_hours(Day::Friday);
    hours.add_range(TimeRange::hours(18, 0)).unwrap();
    hours.add_range(TimeRange::hours(6, 8)).unwrap();

    assert!(hours.add_range(TimeRange::hours(20, 22)).is_err());
}

#[test]
fn add_hours_reuses_the_day_entry() {
    let mut cal = ProjectCalendar::base("Standard");
    cal.add_hours(Day::Monday)
        .add_range(TimeRange::hours(8, 12))
        .unwrap();
    cal.add_hours(Day::Monday)
        .add_range(TimeRange::hours(13, 17))
        .unwrap();
    assert_eq!(cal.hours(Day::Monday).unwrap().ranges().len(), 2);
}

#[test]
fn exceptions_sort_by_date_but_keep_insertion_order() {
    let mut cal = ProjectCalendar::base("Standard");
    cal.add_exception(d(2024, 3, 1), d(2024, 3, 1));
    cal.add_exception(d(2024, 1, 15), d(2024, 1, 16));
    cal.add_exception(d(2024, 2, 10), d(2024, 2, 10))
        .set_working(true);

    let sorted: Vec<NaiveDate> = cal.sorted_exceptions().iter().map(|e| e.from_date()).collect();
    assert_eq!(sorted, vec![d(2024, 1, 15), d(2024, 2, 10), d(2024, 3, 1)]);

    let inserted: Vec<NaiveDate> = cal.exceptions().iter().map(|e| e.from_date()).collect();
    assert_eq!(inserted, vec![d(2024, 3, 1), d(2024, 1, 15), d(2024, 2, 10)]);
    assert!(cal.sorted_exceptions()[1].is_working());
}

#[test]
fn day_codes_start_at_sunday() {
    assert_eq!(Day::from(Weekday::Sun), Day::Sunday);
    assert_eq!(Day::from(Weekday::Sat), Day::Saturday);
    assert_eq!(Day::Monday.code(), 2);
    assert_eq!(Day::from_code(7), Some(Day::Saturday));
    assert_eq!(Day::from_code(0), None);
    assert_eq!(DayType::from_code(2), Some(DayType::Default));
}
