// src/export/write.rs
use anyhow::{ensure, Context, Result};
use arrow::csv::WriterBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::debug;

use super::Frame;
use crate::table::NA;

/// `out/afl_player_data.csv` → `out/afl_player_data.csv.tmp`
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write through a sibling `.tmp` file so a reader never sees a partial file.
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(File) -> Result<()>,
{
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let tmp = tmp_path(path);
    let file = File::create(&tmp).with_context(|| format!("creating {}", tmp.display()))?;
    if let Err(e) = write(file) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    fs::rename(&tmp, path)
        .with_context(|| format!("renaming {} to {}", tmp.display(), path.display()))?;
    Ok(())
}

/// Comma-separated with a header row; missing cells are written as `NA`.
pub fn write_csv(frame: &Frame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let batch = frame.to_record_batch()?;
    write_atomically(path, |file| {
        let mut writer = WriterBuilder::new()
            .with_header(true)
            .with_null(NA.to_string())
            .build(BufWriter::new(file));
        writer.write(&batch).context("writing csv batch")?;
        writer.into_inner().flush().context("flushing csv")?;
        Ok(())
    })?;
    debug!(path = %path.display(), rows = frame.len(), "wrote csv");
    Ok(())
}

/// Snappy-compressed Parquet; missing cells are nulls.
pub fn write_parquet(frame: &Frame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure!(
        !frame.columns().is_empty(),
        "refusing to write {} with no columns",
        path.display()
    );
    let batch = frame.to_record_batch()?;
    write_atomically(path, |file| {
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let mut writer = ArrowWriter::try_new(BufWriter::new(file), batch.schema(), Some(props))
            .context("creating parquet writer")?;
        writer.write(&batch).context("writing parquet batch")?;
        writer.close().context("closing parquet writer")?;
        Ok(())
    })?;
    debug!(path = %path.display(), rows = frame.len(), "wrote parquet");
    Ok(())
}
