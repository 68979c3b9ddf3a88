use super::text::{element_text, is_footnote, is_int, normalize_sector, parse_int};
use super::Holding;
use crate::error::ParseError;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

lazy_static::lazy_static! {
    static ref TR: Selector = Selector::parse("tr").expect("tr selector");
    static ref TD: Selector = Selector::parse("td").expect("td selector");
    static ref COMMON_STOCK: Regex =
        Regex::new(r"(?is)common.*stock").expect("common stock regex");
    static ref COMMON_STOCKS: Regex =
        Regex::new(r"(?is)common stocks").expect("common stocks regex");
}

const HEADER: [&str; 3] = ["Security", "Shares", "Value"];

/// How a holdings column starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    /// First column of the schedule: column header, then the "Common Stocks" heading.
    First,
    /// Column header only.
    Continuation,
    /// Straight into holdings (legacy pages after the first).
    Bare,
}

/// Holdings accumulated column by column, until the common stocks total is read.
#[derive(Debug, Default)]
pub(crate) struct Schedule {
    holdings: Vec<Holding>,
    current_sector: Option<String>,
    sector_totals: BTreeMap<String, i64>,
    grand_total_next: bool,
    grand_total: Option<i64>,
}

impl Schedule {
    /// Whether the common stocks total has been read.
    pub(crate) fn is_complete(&self) -> bool {
        self.grand_total.is_some()
    }

    pub(crate) fn read_column(
        &mut self,
        table: ElementRef,
        kind: ColumnKind,
    ) -> Result<(), ParseError> {
        // rows of non-empty cells
        let rows: Vec<Vec<String>> = table
            .select(&TR)
            .map(|tr| {
                tr.select(&TD)
                    .map(element_text)
                    .filter(|cell| !cell.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|row| !row.is_empty())
            .collect();

        let start = match kind {
            ColumnKind::Bare => 0,
            ColumnKind::Continuation => {
                check_header(&rows)?;
                1
            }
            ColumnKind::First => {
                check_header(&rows)?;
                match rows.get(1).map(Vec::as_slice) {
                    Some([heading]) if COMMON_STOCKS.is_match(heading) => {}
                    other => {
                        return Err(ParseError::Column(format!(
                            "expected a common stocks heading, found {other:?}"
                        )))
                    }
                }
                2
            }
        };

        for row in rows.iter().skip(start) {
            let cells: Vec<&str> = row
                .iter()
                .map(String::as_str)
                .filter(|cell| *cell != "$")
                .collect();

            match cells.as_slice() {
                [] => continue,
                [total] if is_int(total) => {
                    let total = parse_int(total)?.unwrap_or_default();
                    if self.grand_total_next {
                        self.grand_total = Some(total);
                        return Ok(());
                    }
                    let sector = self
                        .current_sector
                        .clone()
                        .ok_or(ParseError::OrphanTotal(total))?;
                    if self.sector_totals.contains_key(&sector) {
                        return Err(ParseError::DuplicateTotal(sector));
                    }
                    trace!("sector total {sector}: {total}");
                    self.sector_totals.insert(sector, total);
                }
                [heading] => {
                    let sector = normalize_sector(heading);
                    if COMMON_STOCK.is_match(&sector) {
                        self.grand_total_next = true;
                    } else {
                        self.current_sector = Some(sector);
                    }
                }
                // "Total Common Stocks | 1,234,567" on one line
                [_, total] => {
                    let total = parse_int(total)?
                        .ok_or_else(|| ParseError::Integer(total.to_string()))?;
                    self.grand_total = Some(total);
                    return Ok(());
                }
                [company, shares, value] => self.push(company, shares, value)?,
                // a footnote closing the row wins over (e)/(f) standing in for a missing value
                [company, first, second, last] if is_footnote(last) => {
                    self.push(company, first, second)?
                }
                [company, rest @ ..] if rest.len() == 3 => {
                    let footnote = rest
                        .iter()
                        .position(|cell| is_footnote(cell))
                        .ok_or_else(|| ParseError::Row(row.clone()))?;
                    let numbers: Vec<&str> = rest
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != footnote)
                        .map(|(_, cell)| *cell)
                        .collect();
                    self.push(company, numbers[0], numbers[1])?;
                }
                _ => return Err(ParseError::Row(row.clone())),
            }
        }

        Ok(())
    }

    fn push(&mut self, company: &str, shares: &str, value: &str) -> Result<(), ParseError> {
        let sector = self
            .current_sector
            .clone()
            .ok_or_else(|| ParseError::OrphanHolding(company.to_string()))?;
        self.holdings.push(Holding {
            sector,
            company_name: company.trim().to_string(),
            shares: parse_int(shares)?,
            value: parse_int(value)?,
        });
        Ok(())
    }

    /// Check the holdings against the totals printed in the filing.
    pub(crate) fn finish(self) -> Result<Vec<Holding>, ParseError> {
        let grand_total = self.grand_total.ok_or(ParseError::MissingGrandTotal)?;

        let mut derived: HashMap<&str, i64> = HashMap::new();
        let mut derived_total = 0;
        for holding in &self.holdings {
            let value = holding.value.unwrap_or_default();
            *derived.entry(holding.sector.as_str()).or_default() += value;
            derived_total += value;
        }

        if derived_total != grand_total {
            return Err(ParseError::TotalMismatch {
                label: "Total Common Stocks".to_string(),
                stated: grand_total,
                derived: derived_total,
            });
        }

        for (sector, &stated) in &self.sector_totals {
            let derived = derived.get(sector.as_str()).copied().unwrap_or_default();
            if derived != stated {
                return Err(ParseError::TotalMismatch {
                    label: sector.clone(),
                    stated,
                    derived,
                });
            }
        }

        Ok(self.holdings)
    }
}

fn check_header(rows: &[Vec<String>]) -> Result<(), ParseError> {
    match rows.first() {
        Some(row) if row.len() >= 3 && row[..3] == HEADER => Ok(()),
        other => Err(ParseError::Column(format!(
            "expected a Security | Shares | Value header, found {other:?}"
        ))),
    }
}
