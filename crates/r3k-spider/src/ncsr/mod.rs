mod column;
mod extract;
mod legacy;
mod modern;
mod pages;

pub mod text;

pub use extract::{extract, ParseSummary, SKIP_FILES};
pub use pages::split_pages;

use crate::edgar::FormatVersion;
use crate::error::ParseError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single position in the schedule of investments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Holding {
    pub sector: String,
    pub company_name: String,
    pub shares: Option<i64>,
    pub value: Option<i64>,
}

/// The common stocks of one filing's Russell 3000 schedule of investments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFiling {
    /// Lower-cased, e.g. `ishares® russell 3000 etf`.
    pub etf_name: String,
    pub report_date: NaiveDate,
    pub holdings: Vec<Holding>,
}

/// One line of a parsed holdings `.csv`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct HoldingRow<'a> {
    pub sector: &'a str,
    pub company_name: &'a str,
    pub shares: Option<i64>,
    pub value: Option<i64>,
    pub report_date: NaiveDate,
    pub etf_name: &'a str,
}

impl HoldingRow<'_> {
    /// Header row of a holdings `.csv`.
    pub const COLUMNS: [&'static str; 6] = [
        "SECTOR",
        "COMPANY_NAME",
        "SHARES",
        "VALUE",
        "REPORT_DATE",
        "ETF_NAME",
    ];
}

impl ParsedFiling {
    pub fn rows(&self) -> Vec<HoldingRow<'_>> {
        self.holdings
            .iter()
            .map(|holding| HoldingRow {
                sector: &holding.sector,
                company_name: &holding.company_name,
                shares: holding.shares,
                value: holding.value,
                report_date: self.report_date,
                etf_name: &self.etf_name,
            })
            .collect()
    }
}

/// Fund name and report date printed atop each schedule page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Header {
    pub(crate) etf_name: String,
    pub(crate) report_date: NaiveDate,
}

/// Extract the Russell 3000 holdings from a raw N-CSR filing.
pub fn parse_filing(buf: &[u8], version: FormatVersion) -> Result<ParsedFiling, ParseError> {
    let html = text::decode(buf);
    match version {
        FormatVersion::Legacy => legacy::parse(&html),
        FormatVersion::Modern => modern::parse(&html),
    }
}
