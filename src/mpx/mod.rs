//! The MPX delimited text format.

mod assembler;
mod calendar;
mod field_model;
mod reader;
mod writer;

pub use assembler::RecordAssembler;
pub use calendar::CalendarSerializer;
pub use field_model::FieldModel;
pub use reader::MpxReader;
pub use writer::MpxWriter;

use crate::field::DataKind;
use crate::project::{ProjectError, ProjectFile};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Leading tag of the file creation record.
pub const FILE_CREATION_TAG: &str = "MPX";

pub const CURRENCY_SETTINGS_RECORD: u8 = 10;
pub const DEFAULT_SETTINGS_RECORD: u8 = 11;
pub const DATE_TIME_SETTINGS_RECORD: u8 = 12;
pub const BASE_CALENDAR_RECORD: u8 = 20;
pub const BASE_CALENDAR_HOURS_RECORD: u8 = 25;
pub const BASE_CALENDAR_EXCEPTION_RECORD: u8 = 26;
pub const PROJECT_HEADER_RECORD: u8 = 30;
pub const RESOURCE_MODEL_TEXT_RECORD: u8 = 40;
pub const RESOURCE_MODEL_NUMERIC_RECORD: u8 = 41;
pub const RESOURCE_RECORD: u8 = 50;
pub const RESOURCE_NOTES_RECORD: u8 = 51;
pub const RESOURCE_CALENDAR_RECORD: u8 = 55;
pub const RESOURCE_CALENDAR_HOURS_RECORD: u8 = 56;
pub const RESOURCE_CALENDAR_EXCEPTION_RECORD: u8 = 57;
pub const TASK_MODEL_TEXT_RECORD: u8 = 60;
pub const TASK_MODEL_NUMERIC_RECORD: u8 = 61;
pub const TASK_RECORD: u8 = 70;
pub const TASK_NOTES_RECORD: u8 = 71;
pub const RECURRING_TASK_RECORD: u8 = 72;
pub const RESOURCE_ASSIGNMENT_RECORD: u8 = 75;
pub const RESOURCE_ASSIGNMENT_WORKGROUP_RECORD: u8 = 76;

#[derive(Debug, Error)]
pub enum MpxError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("locale data error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error("{found} value cannot be written as {kind:?}")]
    TypeMismatch { kind: DataKind, found: &'static str },
    #[error("{0} cannot be written as a number")]
    NonFiniteNumber(f64),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("unsupported field delimiter {0:?}")]
    UnsupportedDelimiter(char),
}

pub type MpxResult<T> = Result<T, MpxError>;

/// Delimiters must be ASCII punctuation other than `"`, a space or a tab.
pub(crate) fn check_delimiter(delimiter: char) -> MpxResult<u8> {
    match u8::try_from(delimiter) {
        Ok(byte) if (byte.is_ascii_punctuation() && byte != b'"') || matches!(byte, b' ' | b'\t') => {
            Ok(byte)
        }
        _ => Err(MpxError::UnsupportedDelimiter(delimiter)),
    }
}

/// Line endings the reader splits records on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTerminator {
    #[default]
    CrLf,
    Lf,
    Cr,
}

impl LineTerminator {
    pub fn as_str(self) -> &'static str {
        match self {
            LineTerminator::CrLf => "\r\n",
            LineTerminator::Lf => "\n",
            LineTerminator::Cr => "\r",
        }
    }
}

/// Sink for a whole project.
///
/// Byte output is encoded in the code page named by the project's file
/// creation record; string output is plain text.
pub trait ProjectWriter {
    fn write<W: Write>(&self, project: &ProjectFile, out: W) -> MpxResult<()>;

    fn write_to_string(&self, project: &ProjectFile) -> MpxResult<String>;

    fn write_to_path<P: AsRef<Path>>(&self, project: &ProjectFile, path: P) -> MpxResult<()> {
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);
        self.write(project, &mut out)?;
        out.flush()?;
        Ok(())
    }
}

/// Source of a whole project.
///
/// Byte input is decoded with the code page its first line declares;
/// string input is taken as already decoded text.
pub trait ProjectReader {
    fn read<R: Read>(&self, input: R) -> MpxResult<ProjectFile>;

    fn read_from_str(&self, text: &str) -> MpxResult<ProjectFile>;

    fn read_from_path<P: AsRef<Path>>(&self, path: P) -> MpxResult<ProjectFile> {
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }
}
