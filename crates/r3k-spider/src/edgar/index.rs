use super::table::{parse_table, text, titles, Row};
use crate::error::EdgarError;
use chrono::NaiveDate;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

lazy_static::lazy_static! {
    static ref TABLE: Selector = Selector::parse("table").expect("table selector");
    static ref INFO_HEAD: Selector = Selector::parse("div.infoHead").expect("infoHead selector");
    static ref INFO: Selector = Selector::parse("div.info").expect("info selector");

    /// First period of report filed in the modern schedule layout.
    static ref FIRST_MODERN_PERIOD: NaiveDate =
        NaiveDate::from_ymd_opt(2010, 9, 30).expect("valid date");

    /// Later periods that still use the legacy layout.
    static ref LEGACY_PERIODS: [NaiveDate; 1] =
        [NaiveDate::from_ymd_opt(2015, 9, 30).expect("valid date")];
}

// listing
// ----------------------------------------------------------------------------

/// Rows of the EDGAR company browse listing ("Filings", "Format", "Description",
/// "Filing Date", "File/Film Number"); "Format" holds the filing index href.
pub fn parse_filing_list(html: &str) -> Result<Vec<Row>, EdgarError> {
    let document = Html::parse_document(html);

    // the listing is the last table on the page; pages past the end have none
    let listing = document
        .select(&TABLE)
        .filter(|table| titles(*table).iter().any(|title| title == "Format"))
        .last();

    match listing {
        Some(table) => parse_table(table),
        None => Ok(vec![]),
    }
}

// filing index
// ----------------------------------------------------------------------------

/// A document row of a filing index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub seq: Option<u32>,
    pub description: String,
    pub href: String,
    pub doc_type: String,
    pub size: String,
}

/// The index page EDGAR keeps for every filing: when it was filed, the period it
/// reports on, and the documents it is made of.
#[derive(Debug, Clone)]
pub struct FilingIndex {
    pub uri: String,
    pub info: HashMap<String, String>,
    pub documents: Vec<Document>,
}

pub fn parse_filing_index(uri: &str, html: &str) -> Result<FilingIndex, EdgarError> {
    let document = Html::parse_document(html);

    // every infoHead is followed by its info
    let info: HashMap<String, String> = document
        .select(&INFO_HEAD)
        .map(text)
        .zip(document.select(&INFO).map(text))
        .collect();
    if !info.contains_key("Documents") {
        return Err(EdgarError::MissingField {
            uri: uri.to_string(),
            field: "Documents",
        });
    }

    let table = document
        .select(&TABLE)
        .next()
        .ok_or_else(|| EdgarError::MissingTable(uri.to_string()))?;

    let mut documents = parse_table(table)?
        .into_iter()
        .map(|mut row| {
            let mut take = |field: &'static str| {
                row.remove(field).ok_or_else(|| EdgarError::MissingField {
                    uri: uri.to_string(),
                    field,
                })
            };
            Ok(Document {
                seq: take("Seq")?.parse().ok(),
                description: take("Description")?,
                href: take("Document")?,
                doc_type: take("Type")?,
                size: take("Size")?,
            })
        })
        .collect::<Result<Vec<_>, EdgarError>>()?;
    documents.sort_by_key(|doc| (doc.seq.is_none(), doc.seq));

    Ok(FilingIndex {
        uri: uri.to_string(),
        info,
        documents,
    })
}

impl FilingIndex {
    /// The N-CSR (or N-CSRS) document itself, as opposed to exhibits and certifications.
    pub fn main_document(&self) -> Result<&Document, EdgarError> {
        self.documents
            .iter()
            .find(|doc| doc.doc_type.to_uppercase().contains("N-CSR"))
            .ok_or_else(|| EdgarError::NoMainDocument(self.uri.clone()))
    }

    fn field(&self, field: &'static str) -> Result<&str, EdgarError> {
        self.info
            .get(field)
            .map(String::as_str)
            .ok_or_else(|| EdgarError::MissingField {
                uri: self.uri.clone(),
                field,
            })
    }
}

// record
// ----------------------------------------------------------------------------

/// Which schedule of investments layout a filing uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum FormatVersion {
    /// Filings before 2010-09-30, plus the odd later exception.
    Legacy,
    Modern,
}

impl FormatVersion {
    pub fn for_period(period: NaiveDate) -> Self {
        if period < *FIRST_MODERN_PERIOD || LEGACY_PERIODS.contains(&period) {
            FormatVersion::Legacy
        } else {
            FormatVersion::Modern
        }
    }
}

impl From<FormatVersion> for u8 {
    fn from(version: FormatVersion) -> u8 {
        match version {
            FormatVersion::Legacy => 1,
            FormatVersion::Modern => 2,
        }
    }
}

impl TryFrom<u8> for FormatVersion {
    type Error = EdgarError;

    fn try_from(version: u8) -> Result<Self, Self::Error> {
        match version {
            1 => Ok(FormatVersion::Legacy),
            2 => Ok(FormatVersion::Modern),
            other => Err(EdgarError::Version(other)),
        }
    }
}

/// One row of `filing-index.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct FilingRecord {
    pub filing_date: NaiveDate,
    pub period_of_report: NaiveDate,
    pub form_type: String,
    pub size: u64,
    pub uri: String,
    pub version: FormatVersion,
}

impl FilingRecord {
    /// Header row of `filing-index.csv`.
    pub const COLUMNS: [&'static str; 6] = [
        "FILING_DATE",
        "PERIOD_OF_REPORT",
        "FORM_TYPE",
        "SIZE",
        "URI",
        "VERSION",
    ];

    pub fn from_index(index: &FilingIndex) -> Result<Self, EdgarError> {
        let main = index.main_document()?;
        let period_of_report = de_date(index.field("Period of Report")?)?;
        let size = main
            .size
            .replace(',', "")
            .parse()
            .map_err(|_| EdgarError::Size(main.size.clone()))?;

        Ok(FilingRecord {
            filing_date: de_date(index.field("Filing Date")?)?,
            period_of_report,
            form_type: main.doc_type.clone(),
            size,
            uri: strip_viewer(&main.href).to_string(),
            version: FormatVersion::for_period(period_of_report),
        })
    }

    /// Local file name of the raw document: `<period>_<document name>`.
    pub fn file_name(&self) -> String {
        let name = self.uri.rsplit('/').next().unwrap_or(&self.uri);
        format!("{}_{name}", self.period_of_report)
    }
}

fn de_date(date: &str) -> Result<NaiveDate, EdgarError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| EdgarError::Date(date.to_string()))
}

// newer filings link through the inline XBRL viewer
fn strip_viewer(href: &str) -> &str {
    href.strip_prefix("/ix?doc=").unwrap_or(href)
}
