use crate::edgar::{FilingRecord, FormatVersion, FILING_INDEX_FILE};
use crate::{fs, tui};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use super::HoldingRow;
use tracing::{debug, error, info, trace, warn};

/// Filings whose schedule cannot be read.
pub const SKIP_FILES: [&str; 3] = [
    "2013-09-30_d609194dncsrs.htm",
    "2015-09-30_d93555dncsrs.htm",
    "2006-09-30_dncsrs.htm",
];

/// What an [`extract`] run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseSummary {
    pub parsed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// One filing to parse.
#[derive(Debug)]
struct Job {
    file_name: String,
    source: PathBuf,
    target: PathBuf,
    version: FormatVersion,
}

impl Job {
    fn run(&self) -> anyhow::Result<usize> {
        let buf = std::fs::read(&self.source)?;
        let filing = super::parse_filing(&buf, self.version)?;
        fs::write_csv_blocking(&self.target, &HoldingRow::COLUMNS, &filing.rows())?;
        Ok(filing.holdings.len())
    }
}

/// Parse every filing listed in `input`'s filing index into one `<period>.csv` per
/// reporting period in `output`.
///
/// Filings are parsed in parallel on `jobs` threads (all cores when `None`). A filing that
/// fails to parse is logged and the rest carry on; the run as a whole then returns an error.
pub async fn extract(
    input: &Path,
    output: &Path,
    replace_existing: bool,
    jobs: Option<usize>,
    tui: bool,
) -> anyhow::Result<ParseSummary> {
    let time = std::time::Instant::now();

    fs::prepare_dir(output, replace_existing).await?;

    let index_path = input.join(FILING_INDEX_FILE);
    let records: Vec<FilingRecord> = fs::read_csv(&index_path).await.map_err(|err| {
        error!("failed to read {}, error({err})", index_path.display());
        err
    })?;
    debug!("{} filings indexed in {}", records.len(), index_path.display());

    // select the filings still to parse
    let mut summary = ParseSummary::default();
    let mut periods = HashSet::new();
    let mut todo = Vec::new();
    for record in records {
        let file_name = record.file_name();
        let target = output.join(format!("{}.csv", record.period_of_report));

        if SKIP_FILES.contains(&file_name.as_str()) {
            warn!("skipping {file_name}, known to be unparseable");
            summary.skipped += 1;
            continue;
        }
        if !periods.insert(record.period_of_report) {
            warn!(
                "skipping {file_name}, period {} already indexed",
                record.period_of_report
            );
            summary.skipped += 1;
            continue;
        }
        if tokio::fs::try_exists(&target).await? {
            trace!("{} already parsed", target.display());
            summary.skipped += 1;
            continue;
        }

        todo.push(Job {
            source: input.join(&file_name),
            file_name,
            target,
            version: record.version,
        });
    }

    // parse them
    tui::banner("filings", tui);
    let total = todo.len();
    let threads = jobs.unwrap_or_else(num_cpus::get).max(1);
    let pb = tui::progress_bar(total, "parsing filings ...", tui)?;
    debug!("parsing {total} filings on {threads} threads");

    let failed = tokio::task::spawn_blocking({
        let pb = pb.clone();
        move || -> anyhow::Result<usize> {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            let failed = pool.install(|| {
                todo.par_iter()
                    .filter(|job| {
                        let outcome = job.run();
                        pb.inc(1);
                        match outcome {
                            Ok(holdings) => {
                                trace!("{}: {holdings} holdings", job.file_name);
                                false
                            }
                            Err(err) => {
                                error!("failed to parse {}, error({err:#})", job.file_name);
                                true
                            }
                        }
                    })
                    .count()
            });
            Ok(failed)
        }
    })
    .await??;
    pb.finish_and_clear();

    summary.parsed = total - failed;
    summary.failed = failed;
    info!(
        "{} filings parsed, {} skipped, {} failed. {}",
        summary.parsed,
        summary.skipped,
        summary.failed,
        crate::time_elapsed(time)
    );

    if failed > 0 {
        anyhow::bail!("{failed} of {total} filings failed to parse");
    }

    Ok(summary)
}
