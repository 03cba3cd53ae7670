use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use schedule_mpx::locale::{DateOrder, SymbolPosition};
use schedule_mpx::{
    CodePage, Day, DayType, Duration, MpxError, MpxReader, MpxWriter, ProjectFile, ProjectReader,
    ProjectWriter, Rate, RecurrenceType, RecurringTask, Relation, RelationType, TaskField, TaskKey,
    TimeRange, TimeUnit, WorkgroupFields,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dt(y: i32, m: u32, day: u32, h: u32, min: u32) -> NaiveDateTime {
    d(y, m, day).and_hms_opt(h, min, 0).unwrap()
}

fn crlf(lines: &[&str]) -> String {
    lines.iter().map(|line| format!("{line}\r\n")).collect()
}

fn read(text: &str) -> ProjectFile {
    MpxReader::new().read_from_str(text).unwrap()
}

fn task_named(project: &ProjectFile, name: &str) -> TaskKey {
    project
        .tasks()
        .find(|(_, task)| task.name() == Some(name))
        .map(|(key, _)| key)
        .unwrap()
}

fn build_sample_project() -> ProjectFile {
    let mut project = ProjectFile::new();
    project.header_mut().set_project_title("Warehouse fit-out");
    let standard = project.add_default_base_calendar().unwrap();
    standard.add_exception(d(2024, 12, 25), d(2024, 12, 26));
    standard
        .add_exception(d(2024, 6, 1), d(2024, 6, 1))
        .set_working(true);

    let crew = project.add_resource();
    let resource = project.resource_mut(crew);
    resource.set_name("Crew \"A\"");
    resource.set_initials("CA");
    resource.set_max_units(250.0);
    resource.set_standard_rate(Rate::new(42.5, TimeUnit::Hours));
    resource.set_notes("Two vans\nOne trailer");
    let calendar = resource.add_calendar("Standard").unwrap();
    calendar.set_day_type(Day::Sunday, DayType::NonWorking);
    calendar.add_exception(d(2024, 8, 5), d(2024, 8, 9));

    let design = project.add_task();
    let task = project.task_mut(design);
    task.set_name("Design");
    task.set_duration(Duration::days(5.0));
    task.set_start(dt(2024, 7, 1, 8, 0));
    task.set_notes("Sign-off needed, see brief");

    let build = project.add_task();
    let task = project.task_mut(build);
    task.set_name("Build");
    task.set_duration(Duration::new(2.0, TimeUnit::Weeks));
    task.add_predecessor(Relation::finish_start(1));

    let inspect = project.add_child_task(build).unwrap();
    let task = project.task_mut(inspect);
    task.set_name("Inspect");
    task.set_flag(1, true);
    task.add_predecessor(Relation::new(1, RelationType::StartStart, Duration::days(3.0)));
    let mut recurring = RecurringTask::new();
    recurring.recurrence_type = Some(RecurrenceType::Daily);
    recurring.start = Some(dt(2024, 7, 8, 9, 0));
    recurring.occurrences = Some(5);
    recurring.daily_frequency = Some(1);
    recurring.daily_workday = true;
    task.set_recurring(Some(recurring));

    let assignment = project.add_assignment(build, crew).unwrap();
    let assignment = project.assignment_mut(assignment);
    assignment.set_units(50.0);
    assignment.set_work(Duration::hours(40.0));
    assignment.set_workgroup(Some(WorkgroupFields {
        schedule_id: Some("S-7".into()),
        response_pending: true,
        ..WorkgroupFields::default()
    }));
    project
}

#[test]
fn write_read_write_is_stable() {
    let writer = MpxWriter::new();
    let first = writer.write_to_string(&build_sample_project()).unwrap();
    let second = writer.write_to_string(&read(&first)).unwrap();
    assert_eq!(second, first);
}

#[test]
fn read_restores_entities() {
    let text = MpxWriter::new()
        .write_to_string(&build_sample_project())
        .unwrap();
    let project = read(&text);

    assert_eq!(project.header().project_title(), Some("Warehouse fit-out"));
    assert_eq!(project.base_calendars().len(), 1);
    let standard = project.base_calendar("Standard").unwrap();
    assert_eq!(
        standard.hours(Day::Friday).unwrap().ranges(),
        &[TimeRange::hours(8, 12), TimeRange::hours(13, 17)]
    );
    assert_eq!(standard.exceptions().len(), 2);
    assert!(standard.sorted_exceptions()[0].is_working());

    let crew = project.resource_by_id(1).unwrap();
    let resource = project.resource(crew);
    assert_eq!(resource.name(), Some("Crew \"A\""));
    assert_eq!(resource.notes(), Some("Two vans\nOne trailer"));
    assert_eq!(resource.max_units(), Some(250.0));
    assert_eq!(resource.standard_rate(), Some(Rate::new(42.5, TimeUnit::Hours)));
    let calendar = resource.calendar().unwrap();
    assert_eq!(calendar.base_calendar_name(), Some("Standard"));
    assert_eq!(calendar.day_type(Day::Sunday), DayType::NonWorking);
    assert_eq!(calendar.day_type(Day::Monday), DayType::Default);

    let design = task_named(&project, "Design");
    assert_eq!(project.task(design).start(), Some(dt(2024, 7, 1, 8, 0)));
    assert_eq!(project.task(design).notes(), Some("Sign-off needed, see brief"));

    let build = task_named(&project, "Build");
    let inspect = task_named(&project, "Inspect");
    assert_eq!(project.task(inspect).parent(), Some(build));
    assert_eq!(project.task(inspect).flag(1), Some(true));
    assert_eq!(
        project.task(inspect).predecessors(),
        &[Relation::new(1, RelationType::StartStart, Duration::days(3.0))]
    );
    let recurring = project.task(inspect).recurring().unwrap();
    assert_eq!(recurring.recurrence_type, Some(RecurrenceType::Daily));
    assert_eq!(recurring.occurrences, Some(5));
    assert!(recurring.daily_workday);

    let (_, assignment) = project.assignments().next().unwrap();
    assert_eq!(assignment.task(), build);
    assert_eq!(assignment.resource(), crew);
    assert_eq!(assignment.units(), Some(50.0));
    assert_eq!(assignment.work(), Some(Duration::hours(40.0)));
    let workgroup = assignment.workgroup().unwrap();
    assert_eq!(workgroup.schedule_id.as_deref(), Some("S-7"));
    assert!(workgroup.response_pending);
    assert!(!workgroup.confirmed);
}

#[test]
fn hierarchy_and_predecessors_from_foreign_file() {
    let text = crlf(&[
        "MPX,Other Tool,4.0,850",
        "30,Office move",
        "40,Name,Outline Level,ID,Predecessors",
        "61,1,3,90,70",
        "70,Plan,1,1",
        "70,Pack,2,2",
        "70,Label boxes,3,3,2",
        "70,Move,2,4,\"2,3FS+1d\"",
        "70,Unpack,1,5,4",
        "99,whatever",
    ]);
    let project = read(&text);

    assert_eq!(project.file_creation().program_name, "Other Tool");
    assert_eq!(project.file_creation().code_page, CodePage::Latin);
    assert_eq!(project.header().project_title(), Some("Office move"));

    let plan = task_named(&project, "Plan");
    let pack = task_named(&project, "Pack");
    let label = task_named(&project, "Label boxes");
    let moving = task_named(&project, "Move");
    let unpack = task_named(&project, "Unpack");
    assert_eq!(project.child_tasks(), &[plan, unpack]);
    assert_eq!(project.task(plan).children(), &[pack, moving]);
    assert_eq!(project.task(label).parent(), Some(pack));

    let unique_ids: Vec<Option<i32>> = project
        .tasks_in_outline_order()
        .into_iter()
        .map(|key| project.task(key).unique_id())
        .collect();
    assert_eq!(unique_ids, vec![Some(1), Some(2), Some(3), Some(4), Some(5)]);

    assert_eq!(project.task(label).predecessors(), &[Relation::finish_start(2)]);
    assert_eq!(
        project.task(moving).predecessors(),
        &[
            Relation::finish_start(2),
            Relation::new(3, RelationType::FinishStart, Duration::days(1.0)),
        ]
    );
    assert_eq!(project.task(unpack).predecessors(), &[Relation::finish_start(4)]);
}

#[test]
fn read_project_continues_numbering() {
    let text = crlf(&[
        "MPX,Other Tool,4.0,ANSI",
        "61,1,90,98",
        "70,First,3,30",
        "70,Second,7,31",
    ]);
    let mut project = read(&text);
    let added = project.add_task();
    assert_eq!(project.task(added).id(), Some(8));
    assert_eq!(project.task(added).unique_id(), Some(32));
}

#[test]
fn positional_ids_survive_renumbering_in_output() {
    let mut project = build_sample_project();
    let design = task_named(&project, "Design");
    project.set_task_id(design, Some(20)).unwrap();

    let text = MpxWriter::new().write_to_string(&project).unwrap();
    let reread = read(&text);
    let build = task_named(&reread, "Build");
    assert_eq!(reread.task_by_id(20), Some(task_named(&reread, "Design")));
    assert_eq!(reread.task(build).predecessors(), &[Relation::finish_start(1)]);
}

#[test]
fn settings_records_use_the_file_separators() {
    let text = crlf(&[
        "MPX;Tool;4.0;ANSI",
        "10;€;0;2;.;,",
        "11;2;0;1;7,50;37,50;10,00€/h;15,00€/h;1;0",
        "12;0;1;540;.;:;AM;PM;0;0",
        "30;Umzug;;;;06.14.2024 08:00",
    ]);
    let project = read(&text);

    let format = &project.header().format;
    assert_eq!(format.delimiter, ';');
    assert_eq!(format.currency_symbol, "€");
    assert_eq!(format.symbol_position, SymbolPosition::After);
    assert_eq!(format.thousands_separator, '.');
    assert_eq!(format.decimal_separator, ',');
    assert_eq!(format.date_order, DateOrder::MonthDayYear);
    assert_eq!(format.date_separator, '.');
    assert_eq!(format.default_start_time, Some(540));
    assert_eq!(format.am_text, "AM");

    let defaults = &project.header().defaults;
    assert_eq!(defaults.minutes_per_day, 450.0);
    assert_eq!(defaults.minutes_per_week, 2250.0);
    assert_eq!(defaults.standard_rate, Rate::new(10.0, TimeUnit::Hours));
    assert_eq!(defaults.overtime_rate, Rate::new(15.0, TimeUnit::Hours));
    assert!(!defaults.split_in_progress_tasks);

    assert_eq!(
        project
            .header()
            .get(schedule_mpx::HeaderField::START_DATE)
            .and_then(schedule_mpx::Value::as_datetime),
        Some(dt(2024, 6, 14, 8, 0))
    );
}

#[test]
fn assignment_to_unknown_resource_is_skipped() {
    let text = crlf(&[
        "MPX,Tool,4.0,ANSI",
        "41,1,40",
        "50,Alice,1",
        "61,1,90",
        "70,Design,1",
        "75,9,1,8h",
        "76,MSG,1,0",
        "75,1,1,8h",
    ]);
    let project = read(&text);
    let assignments: Vec<_> = project.assignments().collect();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].1.resource_id(), Some(1));
    assert!(assignments[0].1.workgroup().is_none());
}

#[test]
fn unreadable_values_are_skipped() {
    let text = crlf(&["MPX,Tool,4.0,ANSI", "61,1,40,90", "70,Design,soon,1"]);
    let project = read(&text);
    let design = task_named(&project, "Design");
    assert_eq!(project.task(design).duration(), None);
    assert_eq!(project.task(design).id(), Some(1));
}

#[test]
fn missing_file_creation_record_is_invalid() {
    let err = MpxReader::new().read_from_str("10,$,1,2\r\n").unwrap_err();
    assert!(matches!(err, MpxError::InvalidData(_)));
}

#[test]
fn row_before_its_model_is_invalid() {
    let text = crlf(&["MPX,Tool,4.0,ANSI", "50,Alice"]);
    let err = MpxReader::new().read_from_str(&text).unwrap_err();
    assert!(matches!(err, MpxError::InvalidData(_)));
}

#[test]
fn path_round_trip() {
    let project = build_sample_project();
    let file = tempfile::NamedTempFile::new().unwrap();
    let writer = MpxWriter::new();
    writer.write_to_path(&project, file.path()).unwrap();

    let reread = MpxReader::new().read_from_path(file.path()).unwrap();
    assert_eq!(reread.task_count(), 3);
    assert_eq!(reread.resource_count(), 1);
    assert_eq!(
        writer.write_to_string(&reread).unwrap(),
        writer.write_to_string(&project).unwrap()
    );
}

#[test]
fn non_finite_numbers_are_not_read() {
    let text = crlf(&[
        "MPX,Tool,4.0,ANSI",
        "61,1,90,30",
        "70,Design,1,NaN",
        "70,Build,2,inf",
    ]);
    let project = read(&text);
    let design = task_named(&project, "Design");
    assert_eq!(project.task(design).get(TaskField::COST), None);
    assert!(MpxWriter::new().write_to_string(&project).is_ok());
}

#[test]
fn unknown_model_fields_keep_later_columns_aligned() {
    let text = crlf(&[
        "MPX,Tool,4.0,ANSI",
        "61,1,9999,90",
        "70,Design,junk,4",
    ]);
    let project = read(&text);
    let design = project.task_by_id(4).unwrap();
    assert_eq!(project.task(design).name(), Some("Design"));
}

#[test]
fn bytes_are_decoded_with_the_declared_code_page() {
    let project = MpxReader::new()
        .read(&b"MPX,Tool,4.0,ANSI\r\n30,Caf\xE9\r\n"[..])
        .unwrap();
    assert_eq!(project.header().project_title(), Some("Café"));

    let project = MpxReader::new()
        .read(&b"MPX,Tool,4.0,850\r\n30,Caf\x82\r\n"[..])
        .unwrap();
    assert_eq!(project.header().project_title(), Some("Café"));
    assert_eq!(project.file_creation().code_page, CodePage::Latin);

    let project = MpxReader::new()
        .read(&b"\xEF\xBB\xBFMPX,Tool,4.0,ANSI\r\n30,Caf\xC3\xA9\r\n"[..])
        .unwrap();
    assert_eq!(project.header().project_title(), Some("Café"));
}

#[test]
fn non_ascii_names_survive_a_file_round_trip() {
    for code_page in [CodePage::Ansi, CodePage::Latin, CodePage::Us, CodePage::Mac] {
        let mut project = build_sample_project();
        project.file_creation_mut().code_page = code_page;
        let task = project.add_task();
        project.task_mut(task).set_name("Café Müller");

        let file = tempfile::NamedTempFile::new().unwrap();
        MpxWriter::new().write_to_path(&project, file.path()).unwrap();
        let reread = MpxReader::new().read_from_path(file.path()).unwrap();

        assert_eq!(reread.file_creation().code_page, code_page);
        let key = task_named(&reread, "Café Müller");
        assert_eq!(reread.task(key).name(), Some("Café Müller"));
    }
}

#[test]
fn characters_missing_from_the_code_page_become_question_marks() {
    let mut project = ProjectFile::new();
    let task = project.add_task();
    project.task_mut(task).set_name("Ship \u{2713}");

    let mut bytes = Vec::new();
    MpxWriter::new().write(&project, &mut bytes).unwrap();
    let reread = MpxReader::new().read(&bytes[..]).unwrap();
    let key = task_named(&reread, "Ship ?");
    assert_eq!(reread.task(key).id(), Some(1));
}
