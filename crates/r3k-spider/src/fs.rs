use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error, trace};

/// Make `dir` ready to receive output, creating it (and any parents) as necessary.
///
/// With `replace_existing`, the directory and everything in it is deleted first.
pub async fn prepare_dir(dir: &Path, replace_existing: bool) -> anyhow::Result<()> {
    if replace_existing && tokio::fs::try_exists(dir).await? {
        debug!("removing existing directory {}", dir.display());
        tokio::fs::remove_dir_all(dir).await.map_err(|err| {
            error!("failed to remove {}, error({err})", dir.display());
            err
        })?;
    }

    trace!("checking directory path: {}", dir.display());
    tokio::fs::create_dir_all(dir).await?;

    Ok(())
}

/// Reads a `.csv` file with a header row from `path`.
pub async fn read_csv<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    trace!("reading file path: {}", path.display());
    let file = tokio::fs::read(path).await?;
    trace!("file read; deserializing rows ...");
    let mut reader = csv::Reader::from_reader(file.as_slice());
    let rows = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
    Ok(rows)
}

/// Renders `rows` as `.csv` under a `header` row.
///
/// The header is written even when `rows` is empty.
pub fn to_csv<T: Serialize>(header: &[&str], rows: &[T]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("failed to flush csv buffer, error({})", err.error()))
}

/// Writes `rows` to `path` as `.csv` under a `header` row.
///
/// The file only appears under its final name once fully written, so an existing
/// output file always holds a complete result.
pub async fn write_csv<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: &[T],
) -> anyhow::Result<()> {
    let buf = to_csv(header, rows)?;
    write_bytes(path, &buf).await?;
    trace!("{} rows written to {}", rows.len(), path.display());
    Ok(())
}

/// [`write_csv`] for worker threads outside the async runtime.
pub fn write_csv_blocking<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: &[T],
) -> anyhow::Result<()> {
    let buf = to_csv(header, rows)?;
    let part = part_path(path);
    std::fs::write(&part, &buf)?;
    std::fs::rename(&part, path)?;
    trace!("{} rows written to {}", rows.len(), path.display());
    Ok(())
}

/// Writes raw `bytes` to `path`, with the same all-or-nothing behaviour as [`write_csv`].
pub async fn write_bytes(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let part = part_path(path);
    tokio::fs::write(&part, bytes).await?;
    tokio::fs::rename(&part, path).await?;
    trace!("{} bytes written to {}", bytes.len(), path.display());
    Ok(())
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}
