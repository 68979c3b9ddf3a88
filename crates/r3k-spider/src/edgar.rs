use crate::error::EdgarError;
use crate::http::*;
use crate::tui;
use futures::{stream, StreamExt, TryStreamExt};
use std::time::Duration;
use tracing::{debug, error, trace};

mod index;
mod pull;
mod table;

pub use index::{
    parse_filing_index, parse_filing_list, Document, FilingIndex, FilingRecord, FormatVersion,
};
pub use pull::{scrape, PullSummary};
pub use table::{parse_table, Row};

pub const SEC_URL: &str = "https://www.sec.gov";

/// EDGAR series id of the iShares Russell 3000 fund.
pub const SERIES_ID: &str = "S000004341";

/// Rows per page of the EDGAR browse listing.
pub const PAGE_SIZE: usize = 100;

/// Pause after every request; the SEC allows at most 10 requests per second.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);

/// Name of the filing index written next to the raw filings.
pub const FILING_INDEX_FILE: &str = "filing-index.csv";

/// Rate-limited client for the SEC's EDGAR pages.
#[derive(Debug, Clone)]
pub struct Edgar {
    client: HttpClient,
    base_url: String,
    delay: Duration,
}

impl Edgar {
    pub fn new(user_agent: &str) -> anyhow::Result<Self> {
        Ok(Self {
            client: crate::std_client_build(user_agent)?,
            base_url: SEC_URL.to_string(),
            delay: DEFAULT_DELAY,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Resolve an href from an EDGAR page against the base URL.
    pub fn url(&self, uri: &str) -> String {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            uri.to_string()
        } else if uri.starts_with('/') {
            format!("{}{uri}", self.base_url)
        } else {
            format!("{}/{uri}", self.base_url)
        }
    }

    async fn get(&self, uri: &str) -> anyhow::Result<Vec<u8>> {
        let url = self.url(uri);
        trace!("GET {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| {
                error!("failed to fetch {url}, error({err})");
                err
            })?;
        let body = response.bytes().await?;

        tokio::time::sleep(self.delay).await;

        Ok(body.to_vec())
    }

    /// Every row of the EDGAR N-CSR/N-CSRS listing for [`SERIES_ID`], following pagination.
    pub async fn filing_list(&self) -> anyhow::Result<Vec<Row>> {
        let mut rows = Vec::new();
        let mut start = 0;
        loop {
            let uri = format!(
                "/cgi-bin/browse-edgar?action=getcompany&CIK={SERIES_ID}&type=N-CSR&dateb=\
                &count={PAGE_SIZE}&start={start}&scd=filings&search_text="
            );
            let body = self.get(&uri).await?;
            let page = parse_filing_list(&String::from_utf8_lossy(&body))?;
            trace!("{} filings listed from offset {start}", page.len());

            let len = page.len();
            rows.extend(page);
            if len < PAGE_SIZE {
                break;
            }
            start += PAGE_SIZE;
        }

        debug!("{} filings listed on EDGAR", rows.len());
        Ok(rows)
    }

    /// Fetch and parse a single filing index page.
    pub async fn filing_index(&self, uri: &str) -> anyhow::Result<FilingIndex> {
        let body = self.get(uri).await?;
        let index = parse_filing_index(uri, &String::from_utf8_lossy(&body))?;
        Ok(index)
    }

    /// One [`FilingRecord`] per listed filing, in EDGAR order (newest first).
    pub async fn filing_records(&self, tui: bool) -> anyhow::Result<Vec<FilingRecord>> {
        let spinner = tui::spinner("listing filings ...", tui)?;
        let list = self.filing_list().await?;
        spinner.finish_and_clear();

        let pb = tui::progress_bar(list.len(), "fetching filing indexes ...", tui)?;
        let records = stream::iter(&list)
            .then(|row| {
                let pb = &pb;
                async move {
                    let uri = row.get("Format").ok_or_else(|| EdgarError::MissingField {
                        uri: "filing list".to_string(),
                        field: "Format",
                    })?;
                    let index = self.filing_index(uri).await?;
                    let record = FilingRecord::from_index(&index)?;
                    trace!("{} [{}] {}", record.period_of_report, record.form_type, record.uri);
                    pb.inc(1);
                    Ok::<_, anyhow::Error>(record)
                }
            })
            .try_collect::<Vec<_>>()
            .await?;
        pb.finish_and_clear();

        Ok(records)
    }

    /// Raw bytes of a filing document.
    pub async fn download(&self, uri: &str) -> anyhow::Result<Vec<u8>> {
        self.get(uri).await
    }
}
