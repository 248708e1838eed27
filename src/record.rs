//! FANTOIR line records and the structural record classifier.
//!
//! A registry line carries no explicit type tag. Its kind is inferred from
//! the shape of the Rivoli code in the first ten columns:
//!
//! | trimmed code          | kind     |
//! |-----------------------|----------|
//! | 3 alphanumeric chars  | County   |
//! | 6 alphanumeric chars  | City     |
//! | 10 alphanumeric chars | Street   |
//! | anything else         | Unknown  |
//!
//! Field columns (0-indexed, end-exclusive):
//!
//! ```text
//! [0,2)    county key       \
//! [2]      direction key     > Rivoli code [0,10)
//! [3,6)    city key         /
//! [11,33)  complete street name
//! [11,42)  city name
//! [112,..) short street name
//! ```

/// Rivoli code columns.
pub const RIVOLI_CODE: (usize, usize) = (0, 10);
/// Complete street name columns.
pub const COMPLETE_NAME: (usize, usize) = (11, 33);
/// City name columns.
pub const CITY_NAME: (usize, usize) = (11, 42);
/// First column of the short street name; it runs to end of line.
pub const SHORT_NAME_START: usize = 112;

/// One raw registry line, with its line terminator removed.
///
/// Column access never fails: ranges past the end of the line are clamped
/// and yield shorter or empty slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    line: String,
}

impl Record {
    /// Create a record from a line, stripping a trailing `\n` or `\r\n`.
    pub fn from_line(line: &str) -> Self {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        Self {
            line: line.to_string(),
        }
    }

    /// The full line.
    pub fn as_str(&self) -> &str {
        &self.line
    }

    /// Line length in columns.
    pub fn len(&self) -> usize {
        self.line.len()
    }

    /// Whether the line is empty.
    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    /// Columns `[start, end)`, clamped to the line length.
    pub fn columns(&self, start: usize, end: usize) -> &str {
        let end = end.min(self.line.len());
        let start = start.min(end);
        self.line.get(start..end).unwrap_or("")
    }

    /// Columns from `start` to end of line.
    pub fn tail(&self, start: usize) -> &str {
        self.columns(start, self.line.len())
    }
}

/// Kind of a registry line, derived from its Rivoli code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    County,
    City,
    Street,
    Unknown,
}

impl RecordKind {
    /// Classify a trimmed Rivoli code.
    pub fn classify(rivoli_code: &str) -> Self {
        if !rivoli_code.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return RecordKind::Unknown;
        }
        match rivoli_code.len() {
            6 => RecordKind::City,
            10 => RecordKind::Street,
            3 => RecordKind::County,
            _ => RecordKind::Unknown,
        }
    }
}

/// Typed fields of one registry line.
///
/// All fields are extracted regardless of kind; `complete_name` and
/// `short_name` only mean something for streets, `city_name` only for
/// cities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    pub rivoli_code: String,
    /// INSEE city code: county key followed by city key.
    pub city_code: String,
    pub complete_name: String,
    pub short_name: String,
    pub city_name: String,
    pub kind: RecordKind,
}

impl DecodedRecord {
    /// Decode a record. Short lines degrade to empty fields.
    pub fn decode(record: &Record) -> Self {
        let rivoli_code = record.columns(RIVOLI_CODE.0, RIVOLI_CODE.1).trim();
        // The direction key at column 2 is not part of the INSEE code.
        let city_code = format!("{}{}", record.columns(0, 2), record.columns(3, 6));

        Self {
            rivoli_code: rivoli_code.to_string(),
            city_code,
            complete_name: record
                .columns(COMPLETE_NAME.0, COMPLETE_NAME.1)
                .trim()
                .to_string(),
            short_name: record.tail(SHORT_NAME_START).trim().to_string(),
            city_name: record.columns(CITY_NAME.0, CITY_NAME.1).trim().to_string(),
            kind: RecordKind::classify(rivoli_code),
        }
    }

    /// Decode a raw line.
    pub fn from_line(line: &str) -> Self {
        Self::decode(&Record::from_line(line))
    }
}
