//! Upload decoding with format, encoding and delimiter auto-detection.
//!
//! Workbooks (xlsx, xlsm, xlsb, xls, ods) are read through [`workbook`];
//! delimited text goes through the CSV path below. Either way the result
//! is a [`Table`] of typed cells with trimmed column labels.

pub mod workbook;

use serde::Serialize;
use std::path::Path;

use crate::error::{DecodeError, DecodeResult};
use crate::models::{Cell, Table};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const TEXT_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// Where the decoded table came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    /// "xlsx", "xls", "ods", "csv", ...
    pub format: String,
    /// Sheet read, for workbooks.
    pub sheet: Option<String>,
    /// Detected encoding, for delimited text.
    pub encoding: Option<String>,
    /// Detected delimiter, for delimited text.
    pub delimiter: Option<String>,
    pub row_count: usize,
    pub columns: Vec<String>,
}

/// A decoded upload.
#[derive(Debug, Clone)]
pub struct DecodedSheet {
    pub table: Table,
    pub source: SourceInfo,
}

/// How the bytes will be read.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    Workbook(String),
    Delimited(String),
}

/// Decide how to read an upload from its leading bytes and file name.
pub fn detect_format(bytes: &[u8], file_name: Option<&str>) -> DecodeResult<SourceKind> {
    let extension = file_name.and_then(|name| {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    });

    if bytes.starts_with(ZIP_MAGIC) {
        return Ok(SourceKind::Workbook(
            extension.unwrap_or_else(|| "xlsx".to_string()),
        ));
    }
    if bytes.starts_with(OLE_MAGIC) {
        return Ok(SourceKind::Workbook(
            extension.unwrap_or_else(|| "xls".to_string()),
        ));
    }

    match extension {
        Some(ext) if TEXT_EXTENSIONS.contains(&ext.as_str()) => Ok(SourceKind::Delimited(ext)),
        None => Ok(SourceKind::Delimited("csv".to_string())),
        Some(ext) => Err(DecodeError::UnsupportedFormat(format!(
            "'.{}' file is not a readable spreadsheet",
            ext
        ))),
    }
}

/// Decode uploaded bytes into a table.
///
/// Workbooks yield their first sheet only.
pub fn decode(bytes: &[u8], file_name: Option<&str>) -> DecodeResult<DecodedSheet> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyFile);
    }

    match detect_format(bytes, file_name)? {
        SourceKind::Workbook(format) => {
            let (sheet, table) = workbook::read_first_sheet(bytes)?;
            Ok(DecodedSheet {
                source: SourceInfo {
                    format,
                    sheet: Some(sheet),
                    encoding: None,
                    delimiter: None,
                    row_count: table.len(),
                    columns: table.columns().to_vec(),
                },
                table,
            })
        }
        SourceKind::Delimited(format) => {
            let mut decoded = parse_bytes_auto(bytes)?;
            decoded.source.format = format;
            Ok(decoded)
        }
    }
}

/// Read and decode a file from disk.
pub fn decode_file<P: AsRef<Path>>(path: P) -> DecodeResult<DecodedSheet> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    decode(&bytes, path.file_name().and_then(|n| n.to_str()))
}

// =============================================================================
// Delimited text
// =============================================================================

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the given encoding. Invalid sequences
/// are replaced rather than rejected.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let text = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0,
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0,
        _ => String::from_utf8_lossy(bytes),
    };
    text.trim_start_matches('\u{feff}').to_string()
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse delimited text with an explicit delimiter.
///
/// The first non-blank record is the header. Blank records are skipped,
/// ragged records are padded or cut to the header width.
pub fn parse_delimited(content: &str, delimiter: char) -> DecodeResult<Table> {
    let delimiter = u8::try_from(delimiter).map_err(|_| {
        DecodeError::Encoding(format!("delimiter '{}' is not a single byte", delimiter))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut table: Option<Table> = None;

    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        match table.as_mut() {
            None => table = Some(Table::new(header_labels(record.iter()))),
            Some(t) => t.push_row(record.iter().map(Cell::infer).collect()),
        }
    }

    table.ok_or(DecodeError::EmptyFile)
}

/// Parse delimited bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> DecodeResult<DecodedSheet> {
    if bytes.contains(&0) {
        return Err(DecodeError::Encoding(
            "binary content is neither a workbook nor delimited text".to_string(),
        ));
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    let table = parse_delimited(&content, delimiter)?;

    Ok(DecodedSheet {
        source: SourceInfo {
            format: "csv".to_string(),
            sheet: None,
            encoding: Some(encoding),
            delimiter: Some(format_delimiter(delimiter).to_string()),
            row_count: table.len(),
            columns: table.columns().to_vec(),
        },
        table,
    })
}

/// Trimmed header labels; blanks become `Unnamed: <index>`.
pub(crate) fn header_labels<I, S>(cells: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    cells
        .into_iter()
        .enumerate()
        .map(|(i, cell)| {
            let label = cell.as_ref().trim();
            if label.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                label.to_string()
            }
        })
        .collect()
}

/// Format delimiter for display
pub fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}
