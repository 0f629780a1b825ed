//! Cell coercion utilities.
//!
//! The `parse_*` functions turn raw cell text into typed values, each returning `None` when
//! the text does not carry a usable value. [`RowReader`] applies them to one data row through
//! a [`ColumnIndexMap`], supplying the documented defaults.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

use crate::error::CellError;
use crate::types::{Cell, ColumnIndexMap};

/// Placeholder some exports put in date/link columns instead of a value.
pub const DOWNLOAD_PLACEHOLDER: &str = "download";

/// Lower-cased spellings accepted as `true`.
pub const TRUTHY_VALUES: &[&str] = &["yes", "true", "1", "available", "y"];

/// Output format for every normalized date (ISO-8601, UTC, millisecond precision).
const ISO_OUTPUT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// `%Y` accepts one to four digits; anything earlier is a misread day or short year.
const MIN_PLAUSIBLE_YEAR: i32 = 1000;

const GENERIC_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d-%b-%Y %H:%M:%S",
    "%d-%b-%Y %H:%M",
    "%d %b %Y %H:%M:%S",
    "%b %d %Y %H:%M:%S",
];

const GENERIC_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
];

/// Date parsing attempts, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateStrategy {
    /// ISO-8601 / RFC 3339, RFC 2822 and unambiguous common layouts.
    Generic,
    /// `dd-mm-yyyy HH:mm:ss`
    DayMonthYearTime,
    /// `dd-mm-yyyy`
    DayMonthYear,
    /// Any `part1-part2-part3` (also `/` or `.`) read as day, month, year.
    SplitDayMonthYear,
}

const DATE_STRATEGIES: [DateStrategy; 4] = [
    DateStrategy::Generic,
    DateStrategy::DayMonthYearTime,
    DateStrategy::DayMonthYear,
    DateStrategy::SplitDayMonthYear,
];

impl DateStrategy {
    fn attempt(self, text: &str) -> Option<DateTime<Utc>> {
        match self {
            DateStrategy::Generic => parse_generic_datetime(text),
            DateStrategy::DayMonthYearTime => NaiveDateTime::parse_from_str(text, "%d-%m-%Y %H:%M:%S")
                .ok()
                .map(|dt| dt.and_utc()),
            DateStrategy::DayMonthYear => NaiveDate::parse_from_str(text, "%d-%m-%Y")
                .ok()
                .and_then(midnight_utc),
            DateStrategy::SplitDayMonthYear => parse_split_day_month_year(text),
        }
    }
}

fn strip_number_noise(text: &str) -> String {
    text.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect()
}

fn skip_digits(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    i
}

/// Longest leading `[sign] digits [. digits] [e [sign] digits]` of `text`, or `""`.
fn decimal_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut i = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let int_end = skip_digits(bytes, i);
    let mut digits = int_end - i;
    i = int_end;

    if bytes.get(i) == Some(&b'.') {
        let frac_end = skip_digits(bytes, i + 1);
        let frac = frac_end - (i + 1);
        if digits + frac > 0 {
            digits += frac;
            i = frac_end;
        }
    }
    if digits == 0 {
        return "";
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = skip_digits(bytes, j);
        if exp_end > j {
            i = exp_end;
        }
    }
    &text[..i]
}

/// Longest leading `[sign] digits` of `text`, or `""`.
fn integer_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let start = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let end = skip_digits(bytes, start);
    if end == start { "" } else { &text[..end] }
}

/// Parse the leading decimal number of a cell, ignoring thousands separators and whitespace.
///
/// Trailing text is ignored (`"5,00,000/-"` -> `500000`); text that does not start with a
/// number is unparseable, as are non-finite results.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned = strip_number_noise(text);
    let prefix = decimal_prefix(&cleaned);
    if prefix.is_empty() {
        return None;
    }
    prefix.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse the leading integer of a cell, ignoring thousands separators and whitespace.
///
/// Anything after the digits is ignored, so `"2019.0"` is `2019` and `"45,000 km"` is `45000`.
pub fn parse_int(text: &str) -> Option<i64> {
    let cleaned = strip_number_noise(text);
    let prefix = integer_prefix(&cleaned);
    if prefix.is_empty() {
        return None;
    }
    prefix.parse::<i64>().ok()
}

/// Parse a yes/no style flag. Empty text yields `None`; unknown text is `false`.
pub fn parse_bool(text: &str) -> Option<bool> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_lowercase();
    Some(TRUTHY_VALUES.contains(&lower.as_str()))
}

fn is_download_placeholder(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(DOWNLOAD_PLACEHOLDER)
}

/// Keep `text` only if it starts with `http://` or `https://` (lowercase scheme).
pub fn parse_url(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() || is_download_placeholder(trimmed) {
        return None;
    }
    (trimmed.starts_with("http://") || trimmed.starts_with("https://")).then(|| trimmed.to_string())
}

/// Read a list of URLs from a cell.
///
/// The cell is first read as a JSON array of strings; failing that, a cell that starts with
/// `http` is taken as a single URL. Anything else yields an empty list.
pub fn parse_url_list(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    json_string_list(trimmed)
        .or_else(|| single_url(trimmed))
        .unwrap_or_default()
}

fn json_string_list(text: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<serde_json::Value>(text).ok()? {
        serde_json::Value::Array(items) => Some(
            items
                .iter()
                .filter_map(json_entry_text)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        _ => None,
    }
}

fn json_entry_text(v: &serde_json::Value) -> Option<String> {
    match v {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn single_url(text: &str) -> Option<Vec<String>> {
    text.starts_with("http").then(|| vec![text.to_string()])
}

/// Parse a date/time and render it as ISO-8601 UTC.
///
/// Returns `None` for empty text, the `download` placeholder, or text no strategy accepts.
pub fn parse_date(text: &str) -> Option<String> {
    parse_datetime(text).map(format_iso)
}

/// Parse a date/time into a UTC instant, trying each strategy in turn.
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() || is_download_placeholder(trimmed) {
        return None;
    }
    DATE_STRATEGIES.iter().find_map(|s| {
        s.attempt(trimmed)
            .filter(|dt| dt.year() >= MIN_PLAUSIBLE_YEAR)
    })
}

/// Render an instant the way every date field is emitted.
pub fn format_iso(dt: DateTime<Utc>) -> String {
    dt.format(ISO_OUTPUT).to_string()
}

fn midnight_utc(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}

fn parse_generic_datetime(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    // A trailing `Z` without the rest of RFC 3339 (e.g. no seconds).
    let naive_text = text.strip_suffix('Z').unwrap_or(text);
    for format in GENERIC_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive_text, format) {
            return Some(dt.and_utc());
        }
    }
    GENERIC_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(midnight_utc)
}

fn parse_split_day_month_year(text: &str) -> Option<DateTime<Utc>> {
    let date_part = text.split_whitespace().next()?;
    let parts: Vec<&str> = date_part.split(['-', '/', '.']).collect();
    let [day, month, year] = parts.as_slice() else {
        return None;
    };
    let day: u32 = day.trim().parse().ok()?;
    let month: u32 = month.trim().parse().ok()?;
    let mut year: i32 = year.trim().parse().ok()?;
    if (0..100).contains(&year) {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day).and_then(midnight_utc)
}

/// Field accessor over one data row.
///
/// Every getter looks the field up in the [`ColumnIndexMap`], so a column missing from the
/// header, an index beyond the row's width and an empty cell all yield the default. Cells the
/// decoder reported as spreadsheet errors fail with [`CellError`].
#[derive(Debug, Clone, Copy)]
pub struct RowReader<'a> {
    row: usize,
    cells: &'a [Cell],
    columns: &'a ColumnIndexMap,
}

impl<'a> RowReader<'a> {
    /// `row` is the 1-based sheet row number, used in messages.
    pub fn new(row: usize, cells: &'a [Cell], columns: &'a ColumnIndexMap) -> Self {
        Self { row, cells, columns }
    }

    /// 1-based sheet row number.
    pub fn row_number(&self) -> usize {
        self.row
    }

    /// Raw cells of the row.
    pub fn cells(&self) -> &'a [Cell] {
        self.cells
    }

    fn cell(&self, field: &str) -> Option<&'a Cell> {
        self.columns.get(field).and_then(|idx| self.cells.get(idx))
    }

    /// Trimmed text of `field`, or `default` when there is no value.
    pub fn text(&self, field: &str, default: &str) -> Result<String, CellError> {
        match self.cell(field) {
            None | Some(Cell::Empty) => Ok(default.to_string()),
            Some(Cell::Error(value)) => Err(CellError::ErrorValue {
                field: field.to_string(),
                value: value.clone(),
            }),
            Some(cell) => Ok(cell.to_text().trim().to_string()),
        }
    }

    /// Returns `true` if `field` has non-empty text.
    pub fn has_text(&self, field: &str) -> Result<bool, CellError> {
        Ok(!self.text(field, "")?.is_empty())
    }

    /// Numeric value of `field`, or `default` when empty or unparseable.
    pub fn number(&self, field: &str, default: f64) -> Result<f64, CellError> {
        Ok(self.number_opt(field)?.unwrap_or(default))
    }

    /// Numeric value of `field`, or `None` when empty or unparseable.
    pub fn number_opt(&self, field: &str) -> Result<Option<f64>, CellError> {
        match self.cell(field) {
            Some(Cell::Float(f)) if f.is_finite() => Ok(Some(*f)),
            Some(Cell::Int(i)) => Ok(Some(*i as f64)),
            _ => Ok(parse_number(&self.text(field, "")?)),
        }
    }

    /// Integer value of `field`, or `default` when empty or unparseable.
    pub fn int(&self, field: &str, default: i64) -> Result<i64, CellError> {
        match self.cell(field) {
            Some(Cell::Int(i)) => Ok(*i),
            _ => Ok(parse_int(&self.text(field, "")?).unwrap_or(default)),
        }
    }

    /// ISO-8601 UTC rendering of `field`, or `None`.
    pub fn date(&self, field: &str) -> Result<Option<String>, CellError> {
        match self.cell(field) {
            Some(Cell::DateTime(dt)) => Ok(Some(format_iso(dt.and_utc()))),
            _ => Ok(parse_date(&self.text(field, "")?)),
        }
    }

    /// `http(s)` URL in `field`, or `None`.
    pub fn url(&self, field: &str) -> Result<Option<String>, CellError> {
        Ok(parse_url(&self.text(field, "")?))
    }

    /// List of URLs in `field`; possibly empty.
    pub fn url_list(&self, field: &str) -> Result<Vec<String>, CellError> {
        Ok(parse_url_list(&self.text(field, "")?))
    }

    /// Yes/no flag in `field`, or `default` when empty.
    pub fn flag(&self, field: &str, default: bool) -> Result<bool, CellError> {
        match self.cell(field) {
            Some(Cell::Bool(b)) => Ok(*b),
            _ => Ok(parse_bool(&self.text(field, "")?).unwrap_or(default)),
        }
    }

    /// Previews of the first `max_cells` cells, each cut to `max_chars` characters.
    pub fn preview(&self, max_cells: usize, max_chars: usize) -> Vec<String> {
        self.cells
            .iter()
            .take(max_cells)
            .map(|c| truncate_chars(&c.to_text(), max_chars))
            .collect()
    }
}

/// Cut `text` to at most `max_chars` characters (not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
