use crate::error::EdgarError;
use scraper::{ElementRef, Selector};
use std::collections::HashMap;

/// A table row keyed by column title.
pub type Row = HashMap<String, String>;

lazy_static::lazy_static! {
    static ref TR: Selector = Selector::parse("tr").expect("tr selector");
    static ref TH: Selector = Selector::parse("th").expect("th selector");
    static ref TD: Selector = Selector::parse("td").expect("td selector");
    static ref LINK: Selector = Selector::parse("a[href]").expect("link selector");
}

/// Parse one of the EDGAR page tables.
///
/// The first row holds the `<th>` titles; every later row maps those titles to its `<td>`
/// cells, where a cell holding a link contributes the link's `href` instead of its text.
pub fn parse_table(table: ElementRef) -> Result<Vec<Row>, EdgarError> {
    let titles = titles(table);
    let mut rows = table.select(&TR);
    if rows.next().is_none() {
        return Ok(vec![]);
    }

    let mut records = Vec::new();
    for row in rows {
        let cells: Vec<String> = row
            .select(&TD)
            .map(|td| match td.select(&LINK).next() {
                Some(link) => link.value().attr("href").unwrap_or_default().to_string(),
                None => text(td),
            })
            .collect();

        if cells.is_empty() {
            continue;
        }
        if cells.len() != titles.len() {
            return Err(EdgarError::RowWidth {
                expected: titles.len(),
                found: cells.len(),
            });
        }

        records.push(titles.iter().cloned().zip(cells).collect());
    }

    Ok(records)
}

/// Column titles from the `<th>` cells of the first row.
pub(crate) fn titles(table: ElementRef) -> Vec<String> {
    match table.select(&TR).next() {
        Some(head) => head.select(&TH).map(text).collect(),
        None => vec![],
    }
}

/// Whitespace-collapsed text content of an element.
pub(crate) fn text(element: ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
