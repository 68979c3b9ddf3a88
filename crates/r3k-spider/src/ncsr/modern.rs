//! Filings from 2010-09-30 on: two holdings columns per page, with the schedule header
//! either in paragraphs above the columns or in a table of its own.

use super::column::{ColumnKind, Schedule};
use super::pages::{split_pages, Page};
use super::text::{element_text, parse_report_date};
use super::{Header, ParsedFiling};
use crate::error::ParseError;
use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::trace;

lazy_static::lazy_static! {
    static ref P: Selector = Selector::parse("p").expect("p selector");
    static ref TD: Selector = Selector::parse("td").expect("td selector");

    static ref SCHEDULE: Regex =
        Regex::new(r"(?is)schedule.*of.*investments.*russell.*3000").expect("regex");
    static ref SUMMARY: Regex =
        Regex::new(r"(?is)summary.*schedule.*of.*investments").expect("regex");
    static ref NOTES: Regex =
        Regex::new(r"(?is)notes\s+to\s+financial\s+statements").expect("regex");
    static ref SEE_NOTES: Regex =
        Regex::new(r"(?is)see.{0,7}notes\s+to\s+financial\s+statements").expect("regex");

    static ref TITLE: Regex = Regex::new(r"(?i)schedule of investments").expect("regex");
    static ref FUND_NAME: Regex =
        Regex::new(r"(?i)^ishares\s*®?\s+russell\s+3000\s+(etf|index\s+fund)$").expect("regex");
}

/// Where the schedule header sits, decided from the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// Paragraphs above the columns; tables 0 and 1 are the columns.
    Paragraphs,
    /// Table 0 is the header; tables 1 and 2 are the columns.
    Table,
}

pub(crate) fn parse(html: &str) -> Result<ParsedFiling, ParseError> {
    let pages = schedule_pages(html);
    let first = pages.first().ok_or(ParseError::NoSchedule)?;
    let layout = layout(first)?;
    let header = header(first, layout)?;
    trace!("{layout:?} schedule: {} pages, {header:?}", pages.len());

    let mut schedule = Schedule::default();
    'pages: for (i, page) in pages.iter().enumerate() {
        if i > 0 && self::header(page, layout)? != header {
            return Err(ParseError::InconsistentPages);
        }

        for (j, column) in columns(page, layout).into_iter().enumerate() {
            let kind = if i == 0 && j == 0 {
                ColumnKind::First
            } else {
                ColumnKind::Continuation
            };
            schedule.read_column(column, kind)?;
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

/// Full (non-summary) schedule pages; the notes that follow the schedule mention it too.
fn schedule_pages(html: &str) -> Vec<Page> {
    split_pages(html)
        .into_iter()
        .map(Page::parse)
        .filter(|page| {
            SCHEDULE.is_match(&page.text)
                && !SUMMARY.is_match(&page.text)
                && (!NOTES.is_match(&page.text) || SEE_NOTES.is_match(&page.text))
        })
        .collect()
}

fn layout(page: &Page) -> Result<Layout, ParseError> {
    let tables = page.tables();
    match tables.len() {
        3 if !SCHEDULE.is_match(&tables[0].text().collect::<String>()) => Ok(Layout::Paragraphs),
        3 | 4 => Ok(Layout::Table),
        n => Err(ParseError::TableLayout(n)),
    }
}

fn columns(page: &Page, layout: Layout) -> Vec<ElementRef<'_>> {
    let skip = match layout {
        Layout::Paragraphs => 0,
        Layout::Table => 1,
    };
    page.tables().into_iter().skip(skip).take(2).collect()
}

fn header(page: &Page, layout: Layout) -> Result<Header, ParseError> {
    let (title, etf_name, report_date) = match layout {
        Layout::Paragraphs => {
            // paragraphs before the first table
            let mut lines = Vec::new();
            for node in page.html.root_element().descendants() {
                let Some(element) = ElementRef::wrap(node) else {
                    continue;
                };
                match element.value().name() {
                    "table" => break,
                    "p" => lines.push(element_text(element)),
                    _ => {}
                }
            }
            lines.retain(|line| !line.is_empty());
            match lines.as_slice() {
                [title, etf_name, report_date, ..] => {
                    (title.clone(), etf_name.clone(), report_date.clone())
                }
                _ => return Err(ParseError::Header(lines.join(" | "))),
            }
        }
        Layout::Table => {
            let table = page
                .tables()
                .into_iter()
                .next()
                .ok_or_else(|| ParseError::Header("no header table".to_string()))?;
            let paragraphs = non_empty(table, &P);
            let cells = non_empty(table, &TD);
            // paragraph headers list the date before the fund, cell headers after it
            match (paragraphs.as_slice(), cells.as_slice()) {
                ([title, report_date, etf_name, ..], _) => {
                    (title.clone(), etf_name.clone(), report_date.clone())
                }
                (_, [title, etf_name, report_date, ..]) => {
                    (title.clone(), etf_name.clone(), report_date.clone())
                }
                _ => return Err(ParseError::Header(cells.join(" | "))),
            }
        }
    };

    if !TITLE.is_match(&title) {
        return Err(ParseError::Header(title));
    }
    if !FUND_NAME.is_match(&etf_name) {
        return Err(ParseError::FundName(etf_name));
    }

    Ok(Header {
        etf_name: etf_name.to_lowercase(),
        report_date: parse_report_date(&report_date)?,
    })
}

fn non_empty(element: ElementRef, selector: &Selector) -> Vec<String> {
    element
        .select(selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}
