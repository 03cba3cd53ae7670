use super::{
    CURRENCY_SETTINGS_RECORD, CalendarSerializer, DATE_TIME_SETTINGS_RECORD,
    DEFAULT_SETTINGS_RECORD, FILE_CREATION_TAG, FieldModel, LineTerminator, MpxError, MpxResult,
    PROJECT_HEADER_RECORD,
    ProjectWriter, RECURRING_TASK_RECORD, RESOURCE_ASSIGNMENT_RECORD,
    RESOURCE_ASSIGNMENT_WORKGROUP_RECORD, RESOURCE_MODEL_NUMERIC_RECORD, RESOURCE_NOTES_RECORD,
    RESOURCE_RECORD, RecordAssembler, TASK_MODEL_NUMERIC_RECORD, TASK_NOTES_RECORD, TASK_RECORD,
    check_delimiter,
};
use crate::assignment::{ResourceAssignment, WorkgroupFields};
use crate::attributes::FieldSet;
use crate::codec::ValueCodec;
use crate::codec::datetime::format_datetime;
use crate::codec::number::{NumberPattern, format_number};
use crate::field::{AssignmentField, HeaderField, ResourceField, TaskField};
use crate::header::{CodePage, DefaultSettings, FileCreationRecord, ProjectHeader};
use crate::locale::{FormatSettings, LocaleData};
use crate::project::{ProjectFile, TaskKey};
use crate::recurring::RecurringTask;
use crate::resource::Resource;
use chrono::NaiveDateTime;
use std::io::Write;
use tracing::{debug, trace};

/// Writes a [`ProjectFile`] as MPX text.
///
/// ```no_run
/// use schedule_mpx::{MpxWriter, ProjectFile, ProjectWriter};
///
/// let mut project = ProjectFile::new();
/// project.add_default_base_calendar()?;
/// let task = project.add_task();
/// project.task_mut(task).set_name("Design");
/// MpxWriter::new().write_to_path(&project, "plan.mpx")?;
/// # Ok::<(), schedule_mpx::MpxError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MpxWriter {
    locale: LocaleData,
    use_locale_defaults: bool,
    resource_model: Option<FieldModel<ResourceField>>,
    task_model: Option<FieldModel<TaskField>>,
    line_terminator: LineTerminator,
}

impl Default for MpxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl MpxWriter {
    pub fn new() -> Self {
        Self {
            locale: LocaleData::english(),
            use_locale_defaults: true,
            resource_model: None,
            task_model: None,
            line_terminator: LineTerminator::CrLf,
        }
    }

    pub fn with_locale(mut self, locale: LocaleData) -> Self {
        self.locale = locale;
        self
    }

    /// When set, the locale's format settings replace the project's own
    /// for both formatting and the settings records.
    pub fn use_locale_defaults(mut self, enabled: bool) -> Self {
        self.use_locale_defaults = enabled;
        self
    }

    pub fn with_resource_model(mut self, model: FieldModel<ResourceField>) -> Self {
        self.resource_model = Some(model);
        self
    }

    pub fn with_task_model(mut self, model: FieldModel<TaskField>) -> Self {
        self.task_model = Some(model);
        self
    }

    pub fn with_line_terminator(mut self, terminator: LineTerminator) -> Self {
        self.line_terminator = terminator;
        self
    }

    pub fn locale(&self) -> &LocaleData {
        &self.locale
    }
}

impl ProjectWriter for MpxWriter {
    fn write<W: Write>(&self, project: &ProjectFile, out: W) -> MpxResult<()> {
        self.write_records(project, out, Some(project.file_creation().code_page))
    }

    fn write_to_string(&self, project: &ProjectFile) -> MpxResult<String> {
        let mut buffer = Vec::new();
        self.write_records(project, &mut buffer, None)?;
        String::from_utf8(buffer).map_err(|err| MpxError::InvalidData(err.to_string()))
    }
}

impl MpxWriter {
    /// Writes every record; `code_page` of `None` leaves the text as UTF-8.
    fn write_records<W: Write>(
        &self,
        project: &ProjectFile,
        out: W,
        code_page: Option<CodePage>,
    ) -> MpxResult<()> {
        let settings = if self.use_locale_defaults {
            &self.locale.settings
        } else {
            &project.header().format
        };
        check_delimiter(settings.delimiter)?;

        debug!(
            resources = project.resource_count(),
            tasks = project.task_count(),
            calendars = project.base_calendars().len(),
            "writing mpx"
        );
        let codec = ValueCodec::new(settings, &self.locale).with_tasks(project);
        let mut out = RecordAssembler::new(out, settings.delimiter, self.line_terminator);
        if let Some(code_page) = code_page {
            out = out.with_code_page(code_page);
        }
        let mut pass = WritePass {
            project,
            codec: &codec,
            out,
        };
        pass.run(self)?;
        pass.out.flush()?;
        debug!("mpx write complete");
        Ok(())
    }
}

/// State for one write: the project, the active codec and the line sink.
struct WritePass<'p, 'c, 'a, W: Write> {
    project: &'p ProjectFile,
    codec: &'c ValueCodec<'a>,
    out: RecordAssembler<W>,
}

impl<W: Write> WritePass<'_, '_, '_, W> {
    fn run(&mut self, writer: &MpxWriter) -> MpxResult<()> {
        let project = self.project;
        self.write_file_creation(project.file_creation())?;
        self.write_settings(self.codec.settings(), &project.header().defaults)?;

        let calendars = CalendarSerializer::new(self.codec);
        for calendar in project.base_calendars() {
            calendars.write(calendar, &mut self.out)?;
        }

        self.write_project_header(project.header())?;

        if project.resource_count() > 0 {
            let model = writer
                .resource_model
                .clone()
                .unwrap_or_else(|| FieldModel::for_resources(project));
            self.write_model(RESOURCE_MODEL_NUMERIC_RECORD, model.record_ids())?;
            for (_, resource) in project.resources() {
                self.write_resource(resource, &model)?;
            }
        }

        if project.task_count() > 0 {
            let model = writer
                .task_model
                .clone()
                .unwrap_or_else(|| FieldModel::for_tasks(project));
            self.write_model(TASK_MODEL_NUMERIC_RECORD, model.record_ids())?;
            for key in project.child_tasks() {
                self.write_task(*key, &model)?;
            }
        }
        Ok(())
    }

    fn write_file_creation(&mut self, record: &FileCreationRecord) -> MpxResult<()> {
        self.out
            .begin(FILE_CREATION_TAG)
            .field(&record.program_name)
            .field(&record.file_version)
            .field(record.code_page.as_str());
        self.out.finish_untrimmed()?;
        Ok(())
    }

    fn write_settings(&mut self, format: &FormatSettings, defaults: &DefaultSettings) -> MpxResult<()> {
        trace!("settings records");
        let codec = self.codec;

        self.out
            .begin(CURRENCY_SETTINGS_RECORD)
            .field(&format.currency_symbol)
            .raw(&format.symbol_position.code().to_string())
            .raw(&format.currency_digits.to_string())
            .field(&format.thousands_separator.to_string())
            .field(&format.decimal_separator.to_string());
        self.out.finish()?;

        let hours_per_day = codec.format_decimal(defaults.minutes_per_day / 60.0)?;
        let hours_per_week = codec.format_decimal(defaults.minutes_per_week / 60.0)?;
        let standard_rate = codec.format_rate(defaults.standard_rate)?;
        let overtime_rate = codec.format_rate(defaults.overtime_rate)?;
        self.out
            .begin(DEFAULT_SETTINGS_RECORD)
            .raw(&defaults.duration_units.code().to_string())
            .raw(flag(defaults.duration_is_fixed))
            .raw(&defaults.work_units.code().to_string())
            .field(&hours_per_day)
            .field(&hours_per_week)
            .field(&standard_rate)
            .field(&overtime_rate)
            .raw(flag(defaults.updating_task_status_updates_resource_status))
            .raw(flag(defaults.split_in_progress_tasks));
        self.out.finish()?;

        self.out
            .begin(DATE_TIME_SETTINGS_RECORD)
            .raw(&format.date_order.code().to_string())
            .raw(&format.time_format.code().to_string())
            .raw(&optional(format.default_start_time))
            .field(&format.date_separator.to_string())
            .field(&format.time_separator.to_string())
            .field(&format.am_text)
            .field(&format.pm_text)
            .raw(&format.date_format.to_string())
            .raw(&format.bar_text_date_format.to_string());
        self.out.finish()?;
        Ok(())
    }

    fn write_project_header(&mut self, header: &ProjectHeader) -> MpxResult<()> {
        trace!("project header record");
        self.out.begin(PROJECT_HEADER_RECORD);
        for field in HeaderField::record() {
            let text = self.codec.format(field.kind(), header.get(field))?;
            self.out.field(&text);
        }
        self.out.finish()?;
        Ok(())
    }

    fn write_model(&mut self, record: u8, ids: impl Iterator<Item = usize>) -> MpxResult<()> {
        self.out.begin(record);
        for id in ids {
            self.out.raw(&id.to_string());
        }
        self.out.finish()?;
        Ok(())
    }

    fn write_resource(&mut self, resource: &Resource, model: &FieldModel<ResourceField>) -> MpxResult<()> {
        trace!(id = ?resource.id(), "resource record");
        self.out.begin(RESOURCE_RECORD);
        for field in model.fields() {
            let text = self.codec.format(field.kind(), resource.get(*field))?;
            self.out.field(&text);
        }
        self.out.finish()?;

        if let Some(notes) = resource.notes().filter(|n| !n.is_empty()) {
            self.out.begin(RESOURCE_NOTES_RECORD).field(notes);
            self.out.finish()?;
        }

        if let Some(calendar) = resource.calendar() {
            CalendarSerializer::new(self.codec).write(calendar, &mut self.out)?;
        }
        Ok(())
    }

    /// Writes the task, its sub-records, then its children depth-first.
    fn write_task(&mut self, key: TaskKey, model: &FieldModel<TaskField>) -> MpxResult<()> {
        let project = self.project;
        let task = project.task(key);
        trace!(id = ?task.id(), "task record");
        self.out.begin(TASK_RECORD);
        for field in model.fields() {
            let text = self.codec.format(field.kind(), task.get(*field))?;
            self.out.field(&text);
        }
        self.out.finish()?;

        if let Some(notes) = task.notes().filter(|n| !n.is_empty()) {
            self.out.begin(TASK_NOTES_RECORD).field(notes);
            self.out.finish()?;
        }

        if let Some(recurring) = task.recurring() {
            self.write_recurring(task.unique_id(), recurring)?;
        }

        for assignment in task.assignments() {
            self.write_assignment(project.assignment(*assignment))?;
        }

        for child in task.children() {
            self.write_task(*child, model)?;
        }
        Ok(())
    }

    fn write_recurring(&mut self, task_unique_id: Option<i32>, record: &RecurringTask) -> MpxResult<()> {
        self.out
            .begin(RECURRING_TASK_RECORD)
            .raw(&optional(task_unique_id));

        if let Some(recurrence) = record.recurrence_type {
            let settings = self.codec.settings();
            let datetime = |value: Option<NaiveDateTime>| {
                value
                    .map(|v| format_datetime(v, settings))
                    .unwrap_or_default()
            };
            let magnitude = record
                .duration
                .map(|d| format_number(d.duration, NumberPattern::COMPACT, settings))
                .transpose()?
                .unwrap_or_default();
            let units = record.duration.map(|d| d.units.code());

            self.out
                .field(&datetime(record.start))
                .field(&datetime(record.finish))
                .field(&magnitude)
                .raw(&optional(units))
                .raw(&optional(record.occurrences))
                .raw(&recurrence.code().to_string())
                .raw(&optional(record.not_sure_index))
                .raw(&optional(record.length_radio_index))
                .raw(flag(record.daily_workday))
                .raw(&record.weekly_days_code())
                .raw(&optional(record.monthly_box_radio_index))
                .raw(&optional(record.yearly_box_radio_index))
                .raw(&optional(record.daily_frequency))
                .raw(&optional(record.weekly_frequency))
                .raw(&optional(record.monthly_first_last_combo_index))
                .raw(&optional(record.monthly_day_combo_index))
                .raw(&optional(record.monthly_bottom_frequency_combo_index))
                .raw(&optional(record.monthly_day_index))
                .raw(&optional(record.monthly_top_frequency_combo_index))
                .raw(&optional(record.yearly_first_last_combo_index))
                .raw(&optional(record.yearly_day_combo_index))
                .raw(&optional(record.yearly_month_combo_index))
                .field(&datetime(record.yearly_date));
        }
        self.out.finish()?;
        Ok(())
    }

    fn write_assignment(&mut self, assignment: &ResourceAssignment) -> MpxResult<()> {
        self.out.begin(RESOURCE_ASSIGNMENT_RECORD);
        for field in AssignmentField::RECORD {
            let text = self.codec.format(field.kind(), assignment.get(field))?;
            self.out.field(&text);
        }
        self.out.finish()?;

        if let Some(workgroup) = assignment.workgroup() {
            self.write_workgroup(workgroup)?;
        }
        Ok(())
    }

    fn write_workgroup(&mut self, record: &WorkgroupFields) -> MpxResult<()> {
        let settings = self.codec.settings();
        let datetime = |value: Option<NaiveDateTime>| {
            value
                .map(|v| format_datetime(v, settings))
                .unwrap_or_default()
        };
        let update_start = datetime(record.update_start);
        let update_finish = datetime(record.update_finish);

        self.out
            .begin(RESOURCE_ASSIGNMENT_WORKGROUP_RECORD)
            .field(record.message_unique_id.as_deref().unwrap_or_default())
            .raw(flag(record.confirmed))
            .raw(flag(record.response_pending))
            .field(&update_start)
            .field(&update_finish)
            .field(record.schedule_id.as_deref().unwrap_or_default());
        self.out.finish()?;
        Ok(())
    }
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
