//! Filings before 2010-09-30: the schedule header is three paragraphs, and pages after the
//! first carry no column header.

use super::column::{ColumnKind, Schedule};
use super::pages::{split_pages, Page};
use super::text::{element_text, parse_report_date};
use super::{Header, ParsedFiling};
use crate::error::ParseError;
use regex::Regex;
use scraper::Selector;
use tracing::trace;

lazy_static::lazy_static! {
    static ref P: Selector = Selector::parse("p").expect("p selector");

    static ref SCHEDULE: Regex = Regex::new(r"(?is)schedule\s+of\s+investments").expect("regex");
    static ref SUMMARY: Regex =
        Regex::new(r"(?is)summary.*schedule.*of.*investments").expect("regex");
    static ref FUND: Regex = Regex::new(r"(?is)russell\s+3000\s+index\s+fund").expect("regex");
    static ref TOTAL_COMMON: Regex = Regex::new(r"(?is)total.*common.*stocks").expect("regex");

    static ref TITLE: Regex = Regex::new(r"(?i)^schedule\s+of\s+investments").expect("regex");
    static ref FUND_NAME: Regex =
        Regex::new(r"(?i)^ishares\s*®?\s+russell\s+3000\s+index\s+fund").expect("regex");
}

pub(crate) fn parse(html: &str) -> Result<ParsedFiling, ParseError> {
    let pages = schedule_pages(html);
    let first = pages.first().ok_or(ParseError::NoSchedule)?;
    let header = header(first)?;
    trace!("legacy schedule: {} pages, {header:?}", pages.len());

    let mut schedule = Schedule::default();
    'pages: for (i, page) in pages.iter().enumerate() {
        for (j, table) in page.tables().into_iter().enumerate() {
            let kind = match (i, j) {
                (0, 0) => ColumnKind::First,
                (0, _) => ColumnKind::Continuation,
                _ => ColumnKind::Bare,
            };
            schedule.read_column(table, kind)?;
            if schedule.is_complete() {
                break 'pages;
            }
        }
    }

    Ok(ParsedFiling {
        etf_name: header.etf_name,
        report_date: header.report_date,
        holdings: schedule.finish()?,
    })
}

/// The full schedule runs from its first page up to the page with the common stocks total.
fn schedule_pages(html: &str) -> Vec<Page> {
    let mut pages = Vec::new();
    for fragment in split_pages(html) {
        let page = Page::parse(fragment);
        let starts = pages.is_empty()
            && SCHEDULE.is_match(&page.text)
            && FUND.is_match(&page.text)
            && !SUMMARY.is_match(&page.text);
        if !starts && pages.is_empty() {
            continue;
        }

        let last = TOTAL_COMMON.is_match(&page.text);
        pages.push(page);
        if last {
            break;
        }
    }
    pages
}

fn header(page: &Page) -> Result<Header, ParseError> {
    let lines: Vec<String> = page
        .html
        .select(&P)
        .map(element_text)
        .filter(|line| !line.is_empty())
        .take(3)
        .collect();
    let [title, etf_name, report_date] = lines.as_slice() else {
        return Err(ParseError::Header(lines.join(" | ")));
    };

    if !TITLE.is_match(title) {
        return Err(ParseError::Header(title.clone()));
    }
    if !FUND_NAME.is_match(etf_name) {
        return Err(ParseError::FundName(etf_name.clone()));
    }

    Ok(Header {
        etf_name: etf_name.to_lowercase(),
        report_date: parse_report_date(report_date)?,
    })
}
