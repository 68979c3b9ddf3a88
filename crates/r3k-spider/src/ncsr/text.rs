use crate::error::ParseError;
use chrono::NaiveDate;
use regex::Regex;
use scraper::ElementRef;

lazy_static::lazy_static! {
    static ref CONTINUED: Regex = Regex::new(r"(?i)\(continued\)").expect("continued regex");
    static ref TRAILING_NUMBER: Regex =
        Regex::new(r"^\(?[0-9]*\.?[0-9]+\s*%?\)?$").expect("trailing number regex");
    static ref FOOTNOTE: Regex = Regex::new(r"(?i)\([a-f]\)").expect("footnote regex");
    static ref DATE_LONG: Regex =
        Regex::new(r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2}),?\s+(\d{4})\b").expect("date regex");
    static ref DATE_SLASH: Regex =
        Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("date regex");
    static ref DATE_ISO: Regex = Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").expect("date regex");
}

/// Cell contents meaning "no value".
const MISSING: [&str; 7] = ["\u{2013}", "\u{2014}", "-", "--", "---", "(e)", "(f)"];

// Windows-1252 code points for bytes 0x80..=0x9F; the rest of the range matches Latin-1.
const CP1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

/// Decode a raw filing: UTF-8 when valid, otherwise Windows-1252.
pub fn decode(buf: &[u8]) -> String {
    match std::str::from_utf8(buf) {
        Ok(text) => text.to_string(),
        Err(_) => buf
            .iter()
            .map(|&byte| match byte {
                0x80..=0x9F => CP1252_HIGH[(byte - 0x80) as usize],
                _ => byte as char,
            })
            .collect(),
    }
}

/// Collapse whitespace (non-breaking spaces included), straighten apostrophes and trim.
pub fn scrub(val: &str) -> String {
    val.replace('\u{2019}', "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scrubbed text content of an element.
pub(crate) fn element_text(element: ElementRef) -> String {
    scrub(&element.text().collect::<String>())
}

fn strip_number(val: &str) -> String {
    val.chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '$')
        .collect()
}

/// Whether a cell holds a plain integer (thousands separators allowed).
pub fn is_int(val: &str) -> bool {
    let number = strip_number(val);
    !number.is_empty() && number.chars().all(|c| c.is_ascii_digit())
}

/// Parse a share count or dollar value; dashes and some footnote markers stand for "no value".
pub fn parse_int(val: &str) -> Result<Option<i64>, ParseError> {
    let number = strip_number(val);
    if MISSING.contains(&number.as_str()) {
        return Ok(None);
    }
    number
        .parse()
        .map(Some)
        .map_err(|_| ParseError::Integer(val.to_string()))
}

pub fn is_footnote(val: &str) -> bool {
    FOOTNOTE.is_match(val)
}

/// Reduce a sector heading such as `Banks — 2.51% (continued)` to the sector name.
pub fn normalize_sector(val: &str) -> String {
    let sector = CONTINUED
        .replace_all(val, "")
        .replace(|c: char| c == '\u{2013}' || c == '\u{2014}', "---")
        .replace("&nbsp;", " ");
    let sector = scrub(&sector);

    if let Some(idx) = sector.rfind("---") {
        return sector[..idx].trim().to_string();
    }

    // older filings print the weight without a dash
    match sector.rsplit_once(' ') {
        Some((name, last)) if TRAILING_NUMBER.is_match(last) => name
            .trim_end_matches(|c: char| c == '-' || c.is_whitespace())
            .to_string(),
        _ => sector,
    }
}

/// Find the report date in a header line such as `September 30, 2014 (Unaudited)`.
pub fn parse_report_date(val: &str) -> Result<NaiveDate, ParseError> {
    let ymd = |y: &str, m: u32, d: &str| -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y.parse().ok()?, m, d.parse().ok()?)
    };

    let found = DATE_LONG
        .captures_iter(val)
        .find_map(|cap| ymd(&cap[3], month(&cap[1])?, &cap[2]))
        .or_else(|| {
            DATE_SLASH
                .captures(val)
                .and_then(|cap| ymd(&cap[3], cap[1].parse().ok()?, &cap[2]))
        })
        .or_else(|| {
            DATE_ISO
                .captures(val)
                .and_then(|cap| ymd(&cap[1], cap[2].parse().ok()?, &cap[3]))
        });

    found.ok_or_else(|| ParseError::ReportDate(val.to_string()))
}

fn month(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    let month = match name.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
