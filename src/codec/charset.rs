//! Byte encodings behind the code page label of the file creation record.

use crate::header::CodePage;
use encoding_rs::{Encoding, MACINTOSH, WINDOWS_1252};
use oem_cp::code_table::{
    DECODING_TABLE_CP437, DECODING_TABLE_CP850, ENCODING_TABLE_CP437, ENCODING_TABLE_CP850,
};
use oem_cp::{decode_string_complete_table, encode_string_lossy};
use std::borrow::Cow;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encodes `text` for `code_page`. Characters the page lacks become `?`.
pub fn encode(text: &str, code_page: CodePage) -> Cow<'_, [u8]> {
    match code_page {
        CodePage::Ansi => encode_with(text, WINDOWS_1252),
        CodePage::Mac => encode_with(text, MACINTOSH),
        CodePage::Latin => Cow::Owned(encode_string_lossy(text, &ENCODING_TABLE_CP850)),
        CodePage::Us => Cow::Owned(encode_string_lossy(text, &ENCODING_TABLE_CP437)),
    }
}

fn encode_with<'t>(text: &'t str, encoding: &'static Encoding) -> Cow<'t, [u8]> {
    let (bytes, _, unmappable) = encoding.encode(text);
    if !unmappable {
        return bytes;
    }
    let mut buf = [0u8; 4];
    let replaced: String = text
        .chars()
        .map(|ch| {
            let (_, _, missing) = encoding.encode(ch.encode_utf8(&mut buf));
            if missing { '?' } else { ch }
        })
        .collect();
    Cow::Owned(encoding.encode(&replaced).0.into_owned())
}

/// Decodes bytes written in `code_page`. A leading UTF-8 byte order mark
/// overrides the label.
pub fn decode(bytes: &[u8], code_page: CodePage) -> Cow<'_, str> {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return String::from_utf8_lossy(rest);
    }
    match code_page {
        CodePage::Ansi => WINDOWS_1252.decode_without_bom_handling(bytes).0,
        CodePage::Mac => MACINTOSH.decode_without_bom_handling(bytes).0,
        CodePage::Latin => Cow::Owned(decode_string_complete_table(bytes, &DECODING_TABLE_CP850)),
        CodePage::Us => Cow::Owned(decode_string_complete_table(bytes, &DECODING_TABLE_CP437)),
    }
}

/// Reads the code page label from the raw first line: the field after the
/// last delimiter, where the delimiter is the byte following `MPX`.
pub fn declared_code_page(bytes: &[u8]) -> CodePage {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let line = bytes
        .split(|b| matches!(b, b'\r' | b'\n'))
        .next()
        .unwrap_or_default();
    let Some(&delimiter) = line.strip_prefix(b"MPX").and_then(|rest| rest.first()) else {
        return CodePage::default();
    };
    let label = line
        .rsplit(|b| *b == delimiter)
        .next()
        .unwrap_or_default();
    CodePage::from_label(&String::from_utf8_lossy(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_uses_windows_1252() {
        assert_eq!(encode("Café", CodePage::Ansi).as_ref(), b"Caf\xE9");
        assert_eq!(decode(b"Caf\xE9", CodePage::Ansi), "Café");
        assert_eq!(encode("Plan \u{2713}", CodePage::Ansi).as_ref(), b"Plan ?");
    }

    #[test]
    fn dos_pages_use_oem_tables() {
        assert_eq!(encode("Café", CodePage::Us).as_ref(), b"Caf\x82");
        assert_eq!(decode(b"Caf\x82", CodePage::Latin), "Café");
    }

    #[test]
    fn label_comes_from_the_first_line() {
        assert_eq!(declared_code_page(b"MPX;Tool;4.0;850\r\n30;x"), CodePage::Latin);
        assert_eq!(declared_code_page(b"MPX,Caf\xE9,4.0,MAC\n"), CodePage::Mac);
        assert_eq!(declared_code_page(b"10,$"), CodePage::Ansi);
    }

    #[test]
    fn byte_order_mark_means_utf8() {
        assert_eq!(decode(b"\xEF\xBB\xBFCaf\xC3\xA9", CodePage::Ansi), "Café");
    }
}
