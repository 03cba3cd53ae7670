pub mod assignment;
pub mod attributes;
pub mod calendar;
pub mod codec;
pub mod field;
pub mod header;
pub mod locale;
pub mod mpx;
pub mod project;
pub mod recurring;
pub mod resource;
pub mod task;
pub mod types;

pub use assignment::{ResourceAssignment, WorkgroupFields};
pub use attributes::{AttributeStore, FieldSet, Value};
pub use calendar::{CalendarException, CalendarHours, Day, DayType, ProjectCalendar, TimeRange};
pub use codec::ValueCodec;
pub use field::{AssignmentField, DataKind, FieldSchema, HeaderField, ResourceField, TaskField};
pub use header::{CodePage, DefaultSettings, FileCreationRecord, ProjectHeader};
pub use locale::{FormatSettings, LocaleData};
pub use mpx::{
    LineTerminator, MpxError, MpxReader, MpxResult, MpxWriter, ProjectReader, ProjectWriter,
};
pub use project::{
    AssignmentKey, ProjectConfig, ProjectError, ProjectFile, ProjectResult, ResourceKey, TaskKey,
};
pub use recurring::{RecurrenceType, RecurringTask};
pub use resource::Resource;
pub use task::Task;
pub use types::{
    AccrueType, ConstraintType, Duration, Priority, Rate, Relation, RelationType, TaskType,
    TimeUnit,
};
