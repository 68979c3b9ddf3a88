use colored::Colorize;
use dotenv::var;
use r3k_spider as spider;
use spider::edgar::Edgar;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info};

/// The SEC user agent: the `--user-agent` flag, else `USER_AGENT` from the environment.
pub(crate) fn user_agent(flag: Option<String>) -> anyhow::Result<String> {
    let user_agent = flag
        .or_else(|| var("USER_AGENT").ok())
        .map(|agent| agent.trim().to_string())
        .filter(|agent| !agent.is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "a user agent is required by the SEC; pass --user-agent \"<name> <email>\" or set USER_AGENT"
            )
        })?;
    Ok(user_agent)
}

/// Download every filing into `output`.
pub(crate) async fn pull(
    user_agent: &str,
    output: &Path,
    replace_existing: bool,
    delay_ms: u64,
    tui: bool,
) -> anyhow::Result<()> {
    let time = std::time::Instant::now();

    let edgar = Edgar::new(user_agent)?.with_delay(Duration::from_millis(delay_ms));
    debug!("EDGAR client built, {delay_ms}ms between requests");

    let summary = spider::edgar::scrape(&edgar, output, replace_existing, tui)
        .await
        .map_err(|err| {
            error!("pull failed: {err:#}");
            err
        })?;

    info!(
        "pull finished collecting data, time elapsed: {:?}",
        time.elapsed()
    );
    if tui {
        println!(
            "{} {} filings in {} ({} downloaded, {} already present)",
            "pulled".green().bold(),
            summary.filings,
            output.display(),
            summary.downloaded,
            summary.skipped
        );
    }

    Ok(())
}

/// Parse every filing in `input` into `output`.
pub(crate) async fn parse(
    input: &Path,
    output: &Path,
    replace_existing: bool,
    jobs: Option<usize>,
    tui: bool,
) -> anyhow::Result<()> {
    let time = std::time::Instant::now();

    let summary = spider::ncsr::extract(input, output, replace_existing, jobs, tui)
        .await
        .map_err(|err| {
            error!("parse failed: {err:#}");
            err
        })?;

    info!("parse finished, time elapsed: {:?}", time.elapsed());
    if tui {
        println!(
            "{} {} filings into {} ({} skipped)",
            "parsed".green().bold(),
            summary.parsed,
            output.display(),
            summary.skipped
        );
    }

    Ok(())
}
