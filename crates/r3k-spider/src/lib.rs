/// iShares filings on [EDGAR]; the filing list, filing indexes and raw N-CSR documents.
///
/// [EDGAR]: https://www.sec.gov/cgi-bin/browse-edgar?action=getcompany&CIK=S000004341&type=N-CSR
pub mod edgar;

pub mod error;
pub mod fs;

/// Russell 3000 schedule of investments, extracted from raw N-CSR documents.
pub mod ncsr;

pub(crate) mod tui;

/// Shortcut for required API elements.
pub(crate) mod http {
    pub(crate) use reqwest::Client as HttpClient;
}

/// Build the HTTP client used for every SEC request.
///
/// The SEC rejects anonymous traffic, so `user_agent` should carry a name and contact email.
pub fn std_client_build(user_agent: &str) -> anyhow::Result<http::HttpClient> {
    let client = reqwest::ClientBuilder::new()
        .user_agent(user_agent)
        .gzip(true)
        .build()?;
    Ok(client)
}

/// Human-readable time since `time`, for closing log lines.
pub(crate) fn time_elapsed(time: std::time::Instant) -> String {
    format!("time elapsed: {:?}", time.elapsed())
}
