use std::path::Path;

use crate::report::config_reader::Encoding;
use crate::report::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Decodes the raw content of a text file.
///
/// Every byte is a valid Latin-1 character, so only UTF-8 decoding may fail.
pub fn decode_text(bytes: Vec<u8>, encoding: Encoding, path: &str) -> ReportResult<String> {
    match encoding {
        Encoding::Latin1 => Ok(bytes.iter().map(|b| *b as char).collect()),
        Encoding::Utf8 => String::from_utf8(bytes).context(DecodingSnafu {
            path,
            encoding: "UTF-8",
        }),
    }
}

/// Renders an Excel cell as the text it would have in a CSV export.
pub fn cell_text(cell: &calamine::DataType) -> String {
    match cell {
        calamine::DataType::Empty => "".to_string(),
        calamine::DataType::String(s) => s.clone(),
        calamine::DataType::Float(f) => format_number(*f),
        calamine::DataType::Int(i) => i.to_string(),
        calamine::DataType::Bool(b) => b.to_string(),
        // Formula errors such as #DIV/0! are read as missing values.
        calamine::DataType::Error(_) => "".to_string(),
        other => other.to_string(),
    }
}
