// Pattern table reader.
//
// The corpus export is a semicolon-separated table with a header row and
// three leading columns:
//
//   intervals;id;instances
//   [2, 2, -1, 3];p17;42
//
// The interval column holds a Python-style integer list or tuple:
// `[2, -1, 3]`, `[2, -1, 3,]`, `[+2]`, `(2, -1)`, `(3,)`, `[]`. A
// parenthesised single value without a trailing comma, `(3)`, is a bare
// integer rather than a tuple and is rejected. The id and instance count are
// kept verbatim; they only end up in output file names. Extra
// columns are ignored. Rows are numbered from 1, header excluded.

use crate::error::{Error, Result};
use std::io::Read;
use std::path::Path;

pub const DELIMITER: u8 = b';';

/// One row of the pattern table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRow {
    /// 1-based position among the data rows.
    pub index: usize,
    pub intervals: Vec<i32>,
    pub pattern_id: String,
    /// Number of times the pattern occurs in the corpus, as written.
    pub instances: String,
}

/// Why an interval literal could not be read.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    #[error("expected a list like [2, -1, 3] or a tuple like (2, -1, 3)")]
    NotASequence,

    #[error("empty element at position {0}")]
    EmptyElement(usize),

    #[error("{0:?} is not an integer")]
    NotAnInteger(String),

    #[error("a single parenthesised value needs a trailing comma to be a tuple")]
    BareParenthesised,
}

/// Parse an interval literal such as `[2, -1, 3]` or `(2, -1, 3,)`.
pub fn parse_intervals(literal: &str) -> std::result::Result<Vec<i32>, LiteralError> {
    let literal = literal.trim();
    let (body, is_tuple) = if let Some(body) = literal
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        (body, false)
    } else if let Some(body) = literal
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        (body, true)
    } else {
        return Err(LiteralError::NotASequence);
    };

    let body = body.trim();
    if body.is_empty() {
        return Ok(Vec::new());
    }
    let (items, trailing_comma) = match body.strip_suffix(',') {
        Some(items) => (items, true),
        None => (body, false),
    };

    let intervals = items
        .split(',')
        .enumerate()
        .map(|(position, item)| parse_integer(position, item))
        .collect::<std::result::Result<Vec<i32>, LiteralError>>()?;

    if is_tuple && intervals.len() == 1 && !trailing_comma {
        return Err(LiteralError::BareParenthesised);
    }
    Ok(intervals)
}

/// One signed decimal integer, optionally `+`/`-` prefixed.
fn parse_integer(position: usize, item: &str) -> std::result::Result<i32, LiteralError> {
    let item = item.trim();
    if item.is_empty() {
        return Err(LiteralError::EmptyElement(position));
    }
    let not_an_integer = || LiteralError::NotAnInteger(item.to_string());

    let (negative, digits) = match item.as_bytes()[0] {
        b'-' => (true, item[1..].trim_start()),
        b'+' => (false, item[1..].trim_start()),
        _ => (false, item),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_an_integer());
    }
    // Python rejects leading zeros such as `07`, but allows `0` and `00`.
    if digits.len() > 1 && digits.starts_with('0') && digits.bytes().any(|b| b != b'0') {
        return Err(not_an_integer());
    }

    let magnitude: i64 = digits.parse().map_err(|_| not_an_integer())?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).map_err(|_| not_an_integer())
}

/// Iterate over the rows of a table, parsing each as it is read.
pub fn pattern_rows<R: Read>(input: R) -> impl Iterator<Item = Result<PatternRow>> {
    csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(input)
        .into_records()
        .enumerate()
        .map(|(i, record)| parse_record(i + 1, &record?))
}

fn parse_record(index: usize, record: &csv::StringRecord) -> Result<PatternRow> {
    let column = |column: usize| {
        record
            .get(column)
            .ok_or(Error::MissingColumn { row: index, column })
    };

    let literal = column(0)?;
    let intervals = parse_intervals(literal).map_err(|source| Error::IntervalLiteral {
        row: index,
        literal: literal.to_string(),
        source,
    })?;

    Ok(PatternRow {
        index,
        intervals,
        pattern_id: column(1)?.to_string(),
        instances: column(2)?.to_string(),
    })
}

/// Read every row from a table. Stops at the first malformed row.
pub fn read_patterns<R: Read>(input: R) -> Result<Vec<PatternRow>> {
    pattern_rows(input).collect()
}

/// Open a table file for streaming.
pub fn open_pattern_file(path: &Path) -> Result<impl Iterator<Item = Result<PatternRow>>> {
    let file = std::fs::File::open(path)?;
    Ok(pattern_rows(std::io::BufReader::new(file)))
}
