//! Pipeline composition: walk → load → rewrite → resolve → sink.
//!
//! Files stream through one at a time; the bounded walker channel gives
//! implicit back-pressure and the first error from any stage aborts the
//! whole run. There is no partial-output recovery.

use crate::config::AliasMap;
use crate::error::Error;
use crate::resolver;
use crate::rewrite::rewrite;
use crate::walk::{walk, FileRecord};
use std::path::{Path, PathBuf};

/// Settings for one rewriting run. The alias map and flags are shared
/// read-only across all files.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Traversal root (the compiled output tree).
    pub target: PathBuf,
    /// Destination root; may equal `target`. Parent directories are the
    /// caller's responsibility, the sink never creates them.
    pub out: PathBuf,
    pub aliases: AliasMap,
    /// Rewrite relative specifiers to explicit extension/`index` form.
    pub esm: bool,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub files_written: usize,
}

/// Run the full pipeline over `options.target`.
pub async fn run(options: &RunOptions) -> Result<RunSummary, Error> {
    let mut records = walk(options.target.clone());
    let mut files_written = 0;

    while let Some(result) = records.recv().await {
        let mut record = result?;
        load(&options.target, &mut record).await?;

        let content = record.content.take().unwrap_or_default();
        let mut content = rewrite(&content, &options.aliases, record.depth);

        if options.esm {
            let rel = Path::new(&record.path);
            let file_dir = options.target.join(rel.parent().unwrap_or(Path::new("")));
            content = resolver::resolve(content, &file_dir, rel).await?;
        }

        record.content = Some(content);
        sink(&options.out, &record).await?;
        files_written += 1;
    }

    Ok(RunSummary { files_written })
}

/// Attach the file's content to its record. Read failure is fatal for
/// the run.
async fn load(root: &Path, record: &mut FileRecord) -> Result<(), Error> {
    let bytes = tokio::fs::read(root.join(&record.path)).await?;
    record.content = Some(String::from_utf8_lossy(&bytes).into_owned());
    Ok(())
}

/// Write the record's final content under `root`, mirroring its relative
/// path. No parent directories are created.
async fn sink(root: &Path, record: &FileRecord) -> Result<(), Error> {
    let content = record.content.as_deref().unwrap_or_default();
    tokio::fs::write(root.join(&record.path), content).await?;
    Ok(())
}
