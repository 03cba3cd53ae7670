use super::{
    BASE_CALENDAR_EXCEPTION_RECORD, BASE_CALENDAR_HOURS_RECORD, BASE_CALENDAR_RECORD, MpxResult,
    RESOURCE_CALENDAR_EXCEPTION_RECORD, RESOURCE_CALENDAR_HOURS_RECORD, RESOURCE_CALENDAR_RECORD,
    RecordAssembler,
};
use crate::calendar::{CalendarException, CalendarHours, ProjectCalendar, TimeRange};
use crate::codec::ValueCodec;
use crate::codec::datetime::{format_date, format_time};
use std::io::Write;
use tracing::trace;

struct RecordSet {
    header: u8,
    hours: u8,
    exception: u8,
}

const BASE: RecordSet = RecordSet {
    header: BASE_CALENDAR_RECORD,
    hours: BASE_CALENDAR_HOURS_RECORD,
    exception: BASE_CALENDAR_EXCEPTION_RECORD,
};

const RESOURCE: RecordSet = RecordSet {
    header: RESOURCE_CALENDAR_RECORD,
    hours: RESOURCE_CALENDAR_HOURS_RECORD,
    exception: RESOURCE_CALENDAR_EXCEPTION_RECORD,
};

/// Writes a calendar as a header line, its hours lines and its exception
/// lines.
///
/// Exceptions are emitted in date order whatever order they were added
/// in; consumers skip exceptions that are out of order.
pub struct CalendarSerializer<'c, 'a> {
    codec: &'c ValueCodec<'a>,
}

impl<'c, 'a> CalendarSerializer<'c, 'a> {
    pub fn new(codec: &'c ValueCodec<'a>) -> Self {
        Self { codec }
    }

    pub fn write<W: Write>(
        &self,
        calendar: &ProjectCalendar,
        out: &mut RecordAssembler<W>,
    ) -> MpxResult<()> {
        let records = if calendar.is_base() { &BASE } else { &RESOURCE };
        trace!(name = ?calendar.name(), base = calendar.is_base(), "calendar");

        let name = match calendar.base_calendar_name() {
            Some(base) => base,
            None => calendar.name().unwrap_or_default(),
        };
        out.begin(records.header).field(name);
        for day_type in calendar.day_types() {
            out.raw(&day_type.code().to_string());
        }
        out.finish_untrimmed()?;

        for hours in calendar.all_hours() {
            self.write_hours(records.hours, hours, out)?;
        }
        for exception in calendar.sorted_exceptions() {
            self.write_exception(records.exception, exception, out)?;
        }
        Ok(())
    }

    fn write_hours<W: Write>(
        &self,
        record: u8,
        hours: &CalendarHours,
        out: &mut RecordAssembler<W>,
    ) -> MpxResult<()> {
        out.begin(record).raw(&hours.day().code().to_string());
        self.push_ranges(hours.ranges(), out);
        out.finish()?;
        Ok(())
    }

    fn write_exception<W: Write>(
        &self,
        record: u8,
        exception: &CalendarException,
        out: &mut RecordAssembler<W>,
    ) -> MpxResult<()> {
        let settings = self.codec.settings();
        out.begin(record)
            .field(&format_date(exception.from_date(), settings))
            .field(&format_date(exception.to_date(), settings))
            .raw(if exception.is_working() { "1" } else { "0" });
        self.push_ranges(exception.ranges(), out);
        out.finish()?;
        Ok(())
    }

    /// Three from/to pairs; missing ranges leave both fields empty.
    fn push_ranges<W: Write>(&self, ranges: &[TimeRange], out: &mut RecordAssembler<W>) {
        let settings = self.codec.settings();
        for idx in 0..crate::calendar::MAX_RANGES {
            match ranges.get(idx) {
                Some(range) => {
                    out.field(&format_time(range.start, settings))
                        .field(&format_time(range.end, settings));
                }
                None => {
                    out.field("").field("");
                }
            }
        }
    }
}
