use super::{Edgar, FilingRecord, FILING_INDEX_FILE};
use crate::{fs, tui};
use std::path::Path;
use tracing::{debug, error, info, trace};

/// What a [`scrape`] run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PullSummary {
    pub filings: usize,
    pub downloaded: usize,
    pub skipped: usize,
}

/// Collect every iShares Russell 3000 N-CSR/N-CSRS filing into `output`.
///
/// Writes [`FILING_INDEX_FILE`] and one raw document per filing. Documents already present
/// are left alone, unless `replace_existing` wipes `output` first.
pub async fn scrape(
    edgar: &Edgar,
    output: &Path,
    replace_existing: bool,
    tui: bool,
) -> anyhow::Result<PullSummary> {
    let time = std::time::Instant::now();

    // 1. resolve the main document of every filing
    tui::banner("filing indexes", tui);
    info!("fetching iShares N-CSR filing indexes ...");
    let records = edgar.filing_records(tui).await.map_err(|err| {
        error!("failed to collect filing indexes, error({err})");
        err
    })?;
    debug!("{} filings found", records.len());

    // 2. write the index alongside the filings
    fs::prepare_dir(output, replace_existing).await?;
    let index_path = output.join(FILING_INDEX_FILE);
    fs::write_csv(&index_path, &FilingRecord::COLUMNS, &records).await?;
    debug!("filing index written to {}", index_path.display());

    // 3. download the documents
    tui::banner("filings", tui);
    let pb = tui::progress_bar(records.len(), "downloading filings ...", tui)?;
    let mut summary = PullSummary {
        filings: records.len(),
        ..Default::default()
    };
    for record in &records {
        let path = output.join(record.file_name());
        if tokio::fs::try_exists(&path).await? {
            trace!("{} already downloaded", path.display());
            summary.skipped += 1;
            pb.inc(1);
            continue;
        }

        let body = edgar.download(&record.uri).await.map_err(|err| {
            error!("failed to download {}, error({err})", record.uri);
            err
        })?;
        fs::write_bytes(&path, &body).await?;
        trace!("{} downloaded to {}", record.uri, path.display());

        summary.downloaded += 1;
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        "{} filings downloaded, {} already present. {}",
        summary.downloaded,
        summary.skipped,
        crate::time_elapsed(time)
    );

    Ok(summary)
}
