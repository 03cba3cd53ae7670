use super::{
    BASE_CALENDAR_EXCEPTION_RECORD, BASE_CALENDAR_HOURS_RECORD, BASE_CALENDAR_RECORD,
    CURRENCY_SETTINGS_RECORD, DATE_TIME_SETTINGS_RECORD, DEFAULT_SETTINGS_RECORD,
    FILE_CREATION_TAG, MpxError, MpxResult, PROJECT_HEADER_RECORD, ProjectReader,
    RECURRING_TASK_RECORD, RESOURCE_ASSIGNMENT_RECORD, RESOURCE_ASSIGNMENT_WORKGROUP_RECORD,
    RESOURCE_CALENDAR_EXCEPTION_RECORD, RESOURCE_CALENDAR_HOURS_RECORD, RESOURCE_CALENDAR_RECORD,
    RESOURCE_MODEL_NUMERIC_RECORD, RESOURCE_MODEL_TEXT_RECORD, RESOURCE_NOTES_RECORD,
    RESOURCE_RECORD, TASK_MODEL_NUMERIC_RECORD, TASK_MODEL_TEXT_RECORD, TASK_NOTES_RECORD,
    TASK_RECORD, check_delimiter,
};
use crate::assignment::WorkgroupFields;
use crate::attributes::{FieldSet, Value};
use crate::calendar::{Day, DayType, ProjectCalendar, TimeRange};
use crate::codec::{ValueCodec, charset};
use crate::codec::datetime::{parse_date, parse_datetime, parse_time};
use crate::codec::escape::restore_line_breaks;
use crate::codec::number::parse_number;
use crate::field::{AssignmentField, DataKind, HeaderField, ResourceField, TaskField};
use crate::header::CodePage;
use crate::locale::{DateOrder, FormatSettings, LocaleData, SymbolPosition, TimeFormat};
use crate::project::{AssignmentKey, ProjectConfig, ProjectFile, ResourceKey, TaskKey};
use crate::recurring::{RecurrenceType, RecurringTask};
use crate::types::{Duration, TimeUnit};
use std::io::Read;
use tracing::{debug, trace, warn};

/// Reads MPX text back into a [`ProjectFile`].
///
/// The delimiter is taken from the file creation record. Unknown records
/// and unreadable field values are skipped with a warning.
#[derive(Debug, Clone)]
pub struct MpxReader {
    locale: LocaleData,
    config: ProjectConfig,
}

impl Default for MpxReader {
    fn default() -> Self {
        Self::new()
    }
}

impl MpxReader {
    pub fn new() -> Self {
        Self {
            locale: LocaleData::english(),
            config: ProjectConfig::default(),
        }
    }

    pub fn with_locale(mut self, locale: LocaleData) -> Self {
        self.locale = locale;
        self
    }

    /// Numbering applied to entities added after the read.
    pub fn with_config(mut self, config: ProjectConfig) -> Self {
        self.config = config;
        self
    }
}

impl ProjectReader for MpxReader {
    fn read<R: Read>(&self, mut input: R) -> MpxResult<ProjectFile> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        let code_page = charset::declared_code_page(&bytes);
        debug!(?code_page, "decoding mpx bytes");
        self.read_text(&charset::decode(&bytes, code_page))
    }

    fn read_from_str(&self, text: &str) -> MpxResult<ProjectFile> {
        self.read_text(text)
    }
}

impl MpxReader {
    fn read_text(&self, text: &str) -> MpxResult<ProjectFile> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let delimiter = text
            .strip_prefix(FILE_CREATION_TAG)
            .and_then(|rest| rest.chars().next())
            .ok_or_else(|| MpxError::InvalidData("missing file creation record".into()))?;
        let mut rows = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(check_delimiter(delimiter)?)
            .from_reader(text.as_bytes());

        let mut pass = ReadPass::new(&self.locale, delimiter);
        for row in rows.records() {
            let row = row?;
            let fields: Vec<String> = row
                .iter()
                .map(|field| restore_line_breaks(field).into_owned())
                .collect();
            pass.record(Fields(&fields))?;
        }
        Ok(pass.finish(self.config))
    }
}

/// Fields of one record; index 0 is the record tag.
#[derive(Clone, Copy)]
struct Fields<'f>(&'f [String]);

impl<'f> Fields<'f> {
    /// Missing fields read as empty.
    fn get(self, idx: usize) -> &'f str {
        self.0.get(idx).map(String::as_str).unwrap_or_default()
    }

    fn len(self) -> usize {
        self.0.len()
    }

    fn non_empty(self, idx: usize) -> Option<&'f str> {
        Some(self.get(idx)).filter(|text| !text.trim().is_empty())
    }

    fn int(self, idx: usize) -> Option<i32> {
        self.get(idx).trim().parse().ok()
    }

    fn char(self, idx: usize) -> Option<char> {
        self.non_empty(idx).and_then(|text| text.chars().next())
    }

    fn flag(self, idx: usize) -> Option<bool> {
        match self.get(idx).trim() {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        }
    }
}

#[derive(Clone, Copy)]
enum CalendarOwner {
    Base(usize),
    Resource(ResourceKey),
}

struct ReadPass<'l> {
    locale: &'l LocaleData,
    project: ProjectFile,
    format: FormatSettings,
    /// Model columns; `None` marks a column that is read past.
    resource_model: Option<Vec<Option<ResourceField>>>,
    task_model: Option<Vec<Option<TaskField>>>,
    calendar: Option<CalendarOwner>,
    resource: Option<ResourceKey>,
    task: Option<TaskKey>,
    assignment: Option<AssignmentKey>,
    /// Open ancestors of the next task with their outline levels.
    outline: Vec<(i32, TaskKey)>,
    /// Predecessor text, resolved once every task id is known.
    predecessors: Vec<(TaskKey, String)>,
    records: usize,
}

impl<'l> ReadPass<'l> {
    fn new(locale: &'l LocaleData, delimiter: char) -> Self {
        let format = FormatSettings {
            delimiter,
            ..FormatSettings::default()
        };
        Self {
            locale,
            project: ProjectFile::with_config(ProjectConfig::manual()),
            format,
            resource_model: None,
            task_model: None,
            calendar: None,
            resource: None,
            task: None,
            assignment: None,
            outline: Vec::new(),
            predecessors: Vec::new(),
            records: 0,
        }
    }

    fn record(&mut self, fields: Fields<'_>) -> MpxResult<()> {
        let tag = fields.get(0).trim();
        if tag.is_empty() {
            return Ok(());
        }
        self.records += 1;
        if tag == FILE_CREATION_TAG {
            let record = self.project.file_creation_mut();
            record.program_name = fields.get(1).to_string();
            record.file_version = fields.get(2).to_string();
            record.code_page = CodePage::from_label(fields.get(3));
            return Ok(());
        }

        let Ok(number) = tag.parse::<u8>() else {
            warn!(tag, "unrecognised record, skipped");
            return Ok(());
        };
        trace!(record = number, fields = fields.len(), "record");
        match number {
            CURRENCY_SETTINGS_RECORD => self.currency_settings(fields),
            DEFAULT_SETTINGS_RECORD => self.default_settings(fields),
            DATE_TIME_SETTINGS_RECORD => self.date_time_settings(fields),
            BASE_CALENDAR_RECORD => self.base_calendar(fields),
            RESOURCE_CALENDAR_RECORD => self.resource_calendar(fields),
            BASE_CALENDAR_HOURS_RECORD | RESOURCE_CALENDAR_HOURS_RECORD => {
                self.calendar_hours(fields)?
            }
            BASE_CALENDAR_EXCEPTION_RECORD | RESOURCE_CALENDAR_EXCEPTION_RECORD => {
                self.calendar_exception(fields)?
            }
            PROJECT_HEADER_RECORD => self.project_header(fields),
            RESOURCE_MODEL_TEXT_RECORD | TASK_MODEL_TEXT_RECORD => {}
            RESOURCE_MODEL_NUMERIC_RECORD => self.resource_model = Some(model(fields)),
            TASK_MODEL_NUMERIC_RECORD => self.task_model = Some(model(fields)),
            RESOURCE_RECORD => self.resource_row(fields)?,
            RESOURCE_NOTES_RECORD => match self.resource {
                Some(key) => self.project.resource_mut(key).set_notes(fields.get(1)),
                None => warn!("resource notes without a resource, skipped"),
            },
            TASK_RECORD => self.task_row(fields)?,
            TASK_NOTES_RECORD => match self.task {
                Some(key) => self.project.task_mut(key).set_notes(fields.get(1)),
                None => warn!("task notes without a task, skipped"),
            },
            RECURRING_TASK_RECORD => self.recurring_task(fields),
            RESOURCE_ASSIGNMENT_RECORD => self.assignment_row(fields)?,
            RESOURCE_ASSIGNMENT_WORKGROUP_RECORD => self.workgroup(fields),
            other => warn!(record = other, "unsupported record, skipped"),
        }
        Ok(())
    }

    fn currency_settings(&mut self, fields: Fields<'_>) {
        let format = &mut self.format;
        if let Some(symbol) = fields.non_empty(1) {
            format.currency_symbol = symbol.to_string();
        }
        if let Some(position) = fields.int(2).and_then(SymbolPosition::from_code) {
            format.symbol_position = position;
        }
        if let Some(digits) = fields.int(3).and_then(|d| u8::try_from(d).ok()) {
            format.currency_digits = digits;
        }
        if let Some(sep) = fields.char(4) {
            format.thousands_separator = sep;
        }
        if let Some(sep) = fields.char(5) {
            format.decimal_separator = sep;
        }
    }

    fn default_settings(&mut self, fields: Fields<'_>) {
        let codec = ValueCodec::new(&self.format, self.locale);
        let defaults = &mut self.project.header_mut().defaults;
        if let Some(units) = fields.int(1).and_then(TimeUnit::from_code) {
            defaults.duration_units = units;
        }
        if let Some(fixed) = fields.flag(2) {
            defaults.duration_is_fixed = fixed;
        }
        if let Some(units) = fields.int(3).and_then(TimeUnit::from_code) {
            defaults.work_units = units;
        }
        if let Some(hours) = parse_number(fields.get(4), &self.format) {
            defaults.minutes_per_day = hours * 60.0;
        }
        if let Some(hours) = parse_number(fields.get(5), &self.format) {
            defaults.minutes_per_week = hours * 60.0;
        }
        if let Some(rate) = codec.parse_rate(fields.get(6)) {
            defaults.standard_rate = rate;
        }
        if let Some(rate) = codec.parse_rate(fields.get(7)) {
            defaults.overtime_rate = rate;
        }
        if let Some(flag) = fields.flag(8) {
            defaults.updating_task_status_updates_resource_status = flag;
        }
        if let Some(flag) = fields.flag(9) {
            defaults.split_in_progress_tasks = flag;
        }
    }

    fn date_time_settings(&mut self, fields: Fields<'_>) {
        let format = &mut self.format;
        if let Some(order) = fields.int(1).and_then(DateOrder::from_code) {
            format.date_order = order;
        }
        if let Some(time_format) = fields.int(2).and_then(TimeFormat::from_code) {
            format.time_format = time_format;
        }
        format.default_start_time = fields.get(3).trim().parse().ok();
        if let Some(sep) = fields.char(4) {
            format.date_separator = sep;
        }
        if let Some(sep) = fields.char(5) {
            format.time_separator = sep;
        }
        if let Some(am) = fields.non_empty(6) {
            format.am_text = am.to_string();
        }
        if let Some(pm) = fields.non_empty(7) {
            format.pm_text = pm.to_string();
        }
        if let Some(code) = fields.int(8) {
            format.date_format = code;
        }
        if let Some(code) = fields.int(9) {
            format.bar_text_date_format = code;
        }
    }

    fn base_calendar(&mut self, fields: Fields<'_>) {
        let calendar = self.project.add_base_calendar(fields.get(1));
        apply_day_types(calendar, fields);
        self.calendar = Some(CalendarOwner::Base(self.project.base_calendars().len() - 1));
    }

    fn resource_calendar(&mut self, fields: Fields<'_>) {
        self.calendar = None;
        let Some(key) = self.resource else {
            warn!("resource calendar without a resource, skipped");
            return;
        };
        match self.project.resource_mut(key).add_calendar(fields.get(1)) {
            Ok(calendar) => {
                apply_day_types(calendar, fields);
                self.calendar = Some(CalendarOwner::Resource(key));
            }
            Err(err) => warn!(error = %err, "resource calendar skipped"),
        }
    }

    fn calendar_mut(&mut self) -> Option<&mut ProjectCalendar> {
        match self.calendar? {
            CalendarOwner::Base(idx) => self.project.base_calendars_mut().get_mut(idx),
            CalendarOwner::Resource(key) => self.project.resource_mut(key).calendar_mut(),
        }
    }

    fn calendar_hours(&mut self, fields: Fields<'_>) -> MpxResult<()> {
        let Some(day) = fields.int(1).and_then(Day::from_code) else {
            warn!(day = fields.get(1), "calendar hours with unknown day, skipped");
            return Ok(());
        };
        let ranges = parse_ranges(fields, 2, &self.format);
        let Some(calendar) = self.calendar_mut() else {
            warn!("calendar hours without a calendar, skipped");
            return Ok(());
        };
        let hours = calendar.add_hours(day);
        for range in ranges {
            hours.add_range(range)?;
        }
        Ok(())
    }

    fn calendar_exception(&mut self, fields: Fields<'_>) -> MpxResult<()> {
        let Some(from) = parse_date(fields.get(1), &self.format) else {
            warn!(date = fields.get(1), "calendar exception without a start date, skipped");
            return Ok(());
        };
        let to = parse_date(fields.get(2), &self.format).unwrap_or(from);
        let working = fields.flag(3).unwrap_or(false);
        let ranges = parse_ranges(fields, 4, &self.format);
        let Some(calendar) = self.calendar_mut() else {
            warn!("calendar exception without a calendar, skipped");
            return Ok(());
        };
        let exception = calendar.add_exception(from, to);
        exception.set_working(working);
        for range in ranges {
            exception.add_range(range)?;
        }
        Ok(())
    }

    fn project_header(&mut self, fields: Fields<'_>) {
        let codec = ValueCodec::new(&self.format, self.locale);
        let header = self.project.header_mut();
        for idx in 1..fields.len() {
            let Some(field) = HeaderField::from_id(idx) else {
                break;
            };
            let value = parse_value(&codec, field.kind(), fields.get(idx), field);
            header.fields_mut().put(field, value);
        }
    }

    fn resource_row(&mut self, fields: Fields<'_>) -> MpxResult<()> {
        let model = self
            .resource_model
            .clone()
            .ok_or_else(|| MpxError::InvalidData("resource record before resource model".into()))?;
        let codec = ValueCodec::new(&self.format, self.locale);
        let key = self.project.add_resource();
        for (idx, field) in model.into_iter().enumerate() {
            let Some(field) = field else {
                continue;
            };
            let Some(value) = parse_value(&codec, field.kind(), fields.get(idx + 1), field) else {
                continue;
            };
            let applied = match field {
                ResourceField::ID => self.project.set_resource_id(key, value.as_i32()),
                ResourceField::UNIQUE_ID => self.project.set_resource_unique_id(key, value.as_i32()),
                _ => {
                    self.project
                        .resource_mut(key)
                        .fields_mut()
                        .put(field, Some(value));
                    Ok(())
                }
            };
            if let Err(err) = applied {
                warn!(error = %err, "resource identifier skipped");
            }
        }
        self.resource = Some(key);
        self.calendar = None;
        Ok(())
    }

    fn task_row(&mut self, fields: Fields<'_>) -> MpxResult<()> {
        let model = self
            .task_model
            .clone()
            .ok_or_else(|| MpxError::InvalidData("task record before task model".into()))?;
        let codec = ValueCodec::new(&self.format, self.locale);

        let mut values = Vec::with_capacity(model.len());
        let mut predecessors = None;
        for (idx, field) in model.into_iter().enumerate() {
            let Some(field) = field else {
                continue;
            };
            let text = fields.get(idx + 1);
            if field == TaskField::PREDECESSORS {
                predecessors = Some(text.to_string()).filter(|t| !t.trim().is_empty());
            } else if let Some(value) = parse_value(&codec, field.kind(), text, field) {
                values.push((field, value));
            }
        }

        let level = values
            .iter()
            .find(|(field, _)| *field == TaskField::OUTLINE_LEVEL)
            .and_then(|(_, value)| value.as_i32())
            .unwrap_or(1);
        while self
            .outline
            .last()
            .is_some_and(|(open, _)| *open >= level)
        {
            self.outline.pop();
        }
        let key = match self.outline.last() {
            Some((_, parent)) => self.project.add_child_task(*parent)?,
            None => self.project.add_task(),
        };
        self.outline.push((level, key));

        for (field, value) in values {
            let applied = match field {
                TaskField::ID => self.project.set_task_id(key, value.as_i32()),
                TaskField::UNIQUE_ID => self.project.set_task_unique_id(key, value.as_i32()),
                _ => {
                    self.project
                        .task_mut(key)
                        .fields_mut()
                        .put(field, Some(value));
                    Ok(())
                }
            };
            if let Err(err) = applied {
                warn!(error = %err, "task identifier skipped");
            }
        }
        if let Some(text) = predecessors {
            self.predecessors.push((key, text));
        }
        self.task = Some(key);
        self.assignment = None;
        Ok(())
    }

    fn recurring_task(&mut self, fields: Fields<'_>) {
        let Some(key) = self.task else {
            warn!("recurring task record without a task, skipped");
            return;
        };
        let format = &self.format;
        let datetime = |idx| parse_datetime(fields.get(idx), format);

        let mut record = RecurringTask::new();
        if let Some(recurrence) = fields.int(7).and_then(RecurrenceType::from_code) {
            record.recurrence_type = Some(recurrence);
            record.start = datetime(2);
            record.finish = datetime(3);
            record.duration = parse_number(fields.get(4), format).map(|magnitude| {
                let units = fields.int(5).and_then(TimeUnit::from_code).unwrap_or(TimeUnit::Days);
                Duration::new(magnitude, units)
            });
            record.occurrences = fields.int(6);
            record.not_sure_index = fields.int(8);
            record.length_radio_index = fields.int(9);
            record.daily_workday = fields.flag(10).unwrap_or(false);
            record.set_weekly_days_code(fields.get(11));
            record.monthly_box_radio_index = fields.int(12);
            record.yearly_box_radio_index = fields.int(13);
            record.daily_frequency = fields.int(14);
            record.weekly_frequency = fields.int(15);
            record.monthly_first_last_combo_index = fields.int(16);
            record.monthly_day_combo_index = fields.int(17);
            record.monthly_bottom_frequency_combo_index = fields.int(18);
            record.monthly_day_index = fields.int(19);
            record.monthly_top_frequency_combo_index = fields.int(20);
            record.yearly_first_last_combo_index = fields.int(21);
            record.yearly_day_combo_index = fields.int(22);
            record.yearly_month_combo_index = fields.int(23);
            record.yearly_date = datetime(24);
        }
        self.project.task_mut(key).set_recurring(Some(record));
    }

    fn assignment_row(&mut self, fields: Fields<'_>) -> MpxResult<()> {
        self.assignment = None;
        let Some(task) = self.task else {
            warn!("resource assignment without a task, skipped");
            return Ok(());
        };
        let Some(resource) = fields.int(1).and_then(|id| self.project.resource_by_id(id)) else {
            warn!(resource = fields.get(1), "assignment to unknown resource, skipped");
            return Ok(());
        };

        let key = self.project.add_assignment(task, resource)?;
        let codec = ValueCodec::new(&self.format, self.locale);
        let assignment = self.project.assignment_mut(key);
        for (idx, field) in AssignmentField::RECORD.into_iter().enumerate() {
            if field.is_identifier() {
                continue;
            }
            let value = parse_value(&codec, field.kind(), fields.get(idx + 1), field);
            assignment.fields_mut().put(field, value);
        }
        self.assignment = Some(key);
        Ok(())
    }

    fn workgroup(&mut self, fields: Fields<'_>) {
        let Some(key) = self.assignment else {
            warn!("workgroup record without an assignment, skipped");
            return;
        };
        let record = WorkgroupFields {
            message_unique_id: fields.non_empty(1).map(str::to_string),
            confirmed: fields.flag(2).unwrap_or(false),
            response_pending: fields.flag(3).unwrap_or(false),
            update_start: parse_datetime(fields.get(4), &self.format),
            update_finish: parse_datetime(fields.get(5), &self.format),
            schedule_id: fields.non_empty(6).map(str::to_string),
        };
        self.project.assignment_mut(key).set_workgroup(Some(record));
    }

    /// Numbers entities the file left without a unique id, then resolves
    /// predecessor lists against the positional ids read.
    fn finish(mut self, config: ProjectConfig) -> ProjectFile {
        let mut next = self
            .project
            .resources()
            .filter_map(|(_, r)| r.unique_id())
            .max()
            .unwrap_or(0);
        let unnumbered: Vec<ResourceKey> = self
            .project
            .resources()
            .filter(|(_, r)| r.unique_id().is_none())
            .map(|(key, _)| key)
            .collect();
        for key in unnumbered {
            next += 1;
            if let Err(err) = self.project.set_resource_unique_id(key, Some(next)) {
                warn!(error = %err, "resource left without a unique id");
            }
        }

        let mut next = self
            .project
            .tasks()
            .filter_map(|(_, t)| t.unique_id())
            .max()
            .unwrap_or(0);
        for key in self.project.tasks_in_outline_order() {
            if self.project.task(key).unique_id().is_none() {
                next += 1;
                if let Err(err) = self.project.set_task_unique_id(key, Some(next)) {
                    warn!(error = %err, "task left without a unique id");
                }
            }
        }

        let codec = ValueCodec::new(&self.format, self.locale).with_tasks(&self.project);
        let resolved: Vec<(TaskKey, Value)> = self
            .predecessors
            .iter()
            .filter_map(|(key, text)| match codec.parse_relations(text) {
                Ok(list) => Some((*key, Value::Relations(list))),
                Err(err) => {
                    warn!(error = %err, "predecessors skipped");
                    None
                }
            })
            .collect();
        for (key, value) in resolved {
            self.project
                .task_mut(key)
                .fields_mut()
                .put(TaskField::PREDECESSORS, Some(value));
        }

        self.project.header_mut().format = self.format;
        self.project.set_config(config);
        debug!(
            records = self.records,
            resources = self.project.resource_count(),
            tasks = self.project.task_count(),
            "mpx read complete"
        );
        self.project
    }
}

/// One entry per column after the tag. Unknown and extended fields keep
/// their column as `None`; trailing empty columns are dropped.
fn model<F: FieldSet>(fields: Fields<'_>) -> Vec<Option<F>> {
    let mut model: Vec<Option<F>> = (1..fields.len())
        .map(|idx| {
            let text = fields.get(idx).trim();
            if text.is_empty() {
                return None;
            }
            let field = text
                .parse()
                .ok()
                .and_then(F::from_id)
                .filter(|field: &F| !field.is_extended());
            if field.is_none() {
                warn!(field = text, "unknown model field, column ignored");
            }
            field
        })
        .collect();
    while model.last().is_some_and(Option::is_none) {
        model.pop();
    }
    model
}

fn parse_value<F: FieldSet>(codec: &ValueCodec<'_>, kind: DataKind, text: &str, field: F) -> Option<Value> {
    match codec.parse(kind, text) {
        Ok(value) => value,
        Err(err) => {
            warn!(?field, error = %err, "unreadable field value, skipped");
            None
        }
    }
}

fn apply_day_types(calendar: &mut ProjectCalendar, fields: Fields<'_>) {
    for (offset, day) in Day::ALL.into_iter().enumerate() {
        if let Some(day_type) = fields.int(offset + 2).and_then(DayType::from_code) {
            calendar.set_day_type(day, day_type);
        }
    }
}

/// Up to three from/to pairs starting at `first`; incomplete pairs are
/// ignored.
fn parse_ranges(fields: Fields<'_>, first: usize, format: &FormatSettings) -> Vec<TimeRange> {
    (0..crate::calendar::MAX_RANGES)
        .filter_map(|pair| {
            let idx = first + pair * 2;
            let start = parse_time(fields.get(idx), format)?;
            let end = parse_time(fields.get(idx + 1), format)?;
            Some(TimeRange::new(start, end))
        })
        .collect()
}
