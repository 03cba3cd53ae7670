use super::LineTerminator;
use crate::codec::charset;
use crate::codec::escape::escape;
use crate::header::CodePage;
use std::fmt::Display;
use std::io::{self, Write};

/// Builds one record line at a time and writes it to the sink as soon as
/// it is finished.
///
/// Fields added with [`RecordAssembler::field`] are escaped;
/// [`RecordAssembler::raw`] appends text that is already safe. Lines are
/// written as UTF-8 unless a code page is set.
pub struct RecordAssembler<W: Write> {
    out: W,
    delimiter: char,
    terminator: LineTerminator,
    code_page: Option<CodePage>,
    line: String,
}

impl<W: Write> RecordAssembler<W> {
    pub fn new(out: W, delimiter: char, terminator: LineTerminator) -> Self {
        Self {
            out,
            delimiter,
            terminator,
            code_page: None,
            line: String::with_capacity(256),
        }
    }

    pub fn with_code_page(mut self, code_page: CodePage) -> Self {
        self.code_page = Some(code_page);
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Starts a new line with its record tag.
    pub fn begin(&mut self, record: impl Display) -> &mut Self {
        self.line.clear();
        self.line.push_str(&record.to_string());
        self
    }

    pub fn field(&mut self, text: &str) -> &mut Self {
        self.line.push(self.delimiter);
        self.line.push_str(&escape(text, self.delimiter));
        self
    }

    pub fn raw(&mut self, text: &str) -> &mut Self {
        self.line.push(self.delimiter);
        self.line.push_str(text);
        self
    }

    /// Drops trailing empty fields, terminates the line and writes it.
    pub fn finish(&mut self) -> io::Result<()> {
        let tag_end = self.line.find(self.delimiter).unwrap_or(self.line.len());
        let trimmed = self.line.trim_end_matches(self.delimiter).len().max(tag_end);
        self.line.truncate(trimmed);
        self.write_line()
    }

    /// Terminates and writes the line without trimming.
    pub fn finish_untrimmed(&mut self) -> io::Result<()> {
        self.write_line()
    }

    fn write_line(&mut self) -> io::Result<()> {
        self.line.push_str(self.terminator.as_str());
        match self.code_page {
            Some(code_page) => self.out.write_all(&charset::encode(&self.line, code_page))?,
            None => self.out.write_all(self.line.as_bytes())?,
        }
        self.line.clear();
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_only_trailing_empty_fields() {
        let mut assembler = RecordAssembler::new(Vec::new(), ',', LineTerminator::Lf);
        assembler.begin(50).field("a").field("").field("b").field("").field("");
        assembler.finish().unwrap();
        assembler.begin(51).field("").field("");
        assembler.finish().unwrap();
        let text = String::from_utf8(assembler.into_inner()).unwrap();
        assert_eq!(text, "50,a,,b\n51\n");
    }

    #[test]
    fn encodes_lines_in_the_code_page() {
        let mut assembler =
            RecordAssembler::new(Vec::new(), ',', LineTerminator::CrLf).with_code_page(CodePage::Ansi);
        assembler.begin(30).field("Café");
        assembler.finish().unwrap();
        assert_eq!(assembler.into_inner(), b"30,Caf\xE9\r\n");
    }
}
