use regex::Regex;
use scraper::{ElementRef, Html, Selector};

lazy_static::lazy_static! {
    static ref PAGE_BREAK: Regex = Regex::new(
        r"(?i)<(?:p|div|hr)\b[^>]*?page-break-(before|after)\s*:\s*always[^>]*>"
    )
    .expect("page break regex");
    static ref TABLE: Selector = Selector::parse("table").expect("table selector");
}

/// Split a filing into its printed pages.
///
/// A page starts at a tag styled `page-break-before: always`, or right after one styled
/// `page-break-after: always`, and runs to the next page start. Anything before the
/// first break (the cover) is not a page.
pub fn split_pages(html: &str) -> Vec<&str> {
    let mut starts: Vec<usize> = PAGE_BREAK
        .captures_iter(html)
        .filter_map(|cap| {
            let tag = cap.get(0)?;
            if cap[1].eq_ignore_ascii_case("before") {
                Some(tag.start())
            } else {
                Some(tag.end())
            }
        })
        .collect();
    starts.sort_unstable();
    starts.dedup();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(html.len());
            &html[start..end]
        })
        .filter(|page| !page.trim().is_empty())
        .collect()
}

/// A parsed page, with its full text for classification.
pub(crate) struct Page {
    pub(crate) html: Html,
    pub(crate) text: String,
}

impl Page {
    pub(crate) fn parse(fragment: &str) -> Self {
        let html = Html::parse_document(fragment);
        let text = html.root_element().text().collect();
        Page { html, text }
    }

    /// Every table on the page, nested ones included, in document order.
    pub(crate) fn tables(&self) -> Vec<ElementRef<'_>> {
        self.html.select(&TABLE).collect()
    }
}
