//! Tree traversal.
//!
//! Walks the compiled output directory and emits one [`FileRecord`] per
//! eligible source file into a bounded channel. Ordering contract: all
//! eligible files of a directory are emitted before any of its
//! subdirectories are entered, and each record's depth is measured from
//! the traversal root (not the immediate parent), so it equals the
//! number of ascent steps needed to reach the root from the file's
//! location.

use crate::error::Error;
use crate::paths::is_eligible_source;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// One source file flowing through the pipeline.
///
/// Created here without content; the loader attaches content, the
/// rewrite stages replace it, the sink consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path relative to the traversal root, `/`-separated.
    pub path: String,
    /// Directory nesting level below the traversal root. Fixed at
    /// creation.
    pub depth: usize,
    /// File content, absent until loaded.
    pub content: Option<String>,
}

/// Channel capacity for the walker producer. Small on purpose: a slow
/// sink stalls upstream production.
const WALK_CHANNEL_CAPACITY: usize = 16;

/// Start walking `root`, returning the receiving end of the record
/// stream. Filesystem errors are forwarded through the channel and end
/// the walk.
#[must_use]
pub fn walk(root: PathBuf) -> mpsc::Receiver<Result<FileRecord, Error>> {
    let (tx, rx) = mpsc::channel(WALK_CHANNEL_CAPACITY);
    tokio::spawn(produce(root, tx));
    rx
}

/// Explicit worklist traversal: depth-first by directory, files before
/// subdirectories at each level.
async fn produce(root: PathBuf, tx: mpsc::Sender<Result<FileRecord, Error>>) {
    let mut stack: Vec<(PathBuf, String, usize)> = vec![(root, String::new(), 0)];

    while let Some((dir, rel_dir, depth)) = stack.pop() {
        let listing = match list_dir(&dir).await {
            Ok(listing) => listing,
            Err(err) => {
                let _ = tx.send(Err(err)).await;
                return;
            }
        };

        for name in listing.files {
            let record = FileRecord {
                path: join_rel(&rel_dir, &name),
                depth,
                content: None,
            };
            if tx.send(Ok(record)).await.is_err() {
                return;
            }
        }

        // Pushed in reverse so the stack visits subdirectories in
        // listing order.
        for name in listing.dirs.into_iter().rev() {
            let rel = join_rel(&rel_dir, &name);
            stack.push((dir.join(&name), rel, depth + 1));
        }
    }
}

struct Listing {
    files: Vec<String>,
    dirs: Vec<String>,
}

/// List a directory, partitioning entries into eligible files and
/// subdirectories. Entry stat probes run concurrently; symlinks and
/// other non-regular entries are skipped silently.
async fn list_dir(dir: &Path) -> Result<Listing, Error> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    let probes = join_all(names.iter().map(|name| {
        let path = dir.join(name);
        async move { tokio::fs::symlink_metadata(path).await }
    }))
    .await;

    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for (name, meta) in names.into_iter().zip(probes) {
        let meta = meta?;
        if meta.is_dir() {
            dirs.push(name);
        } else if meta.is_file() && is_eligible_source(&name) {
            files.push(name);
        }
    }
    Ok(Listing { files, dirs })
}

fn join_rel(rel_dir: &str, name: &str) -> String {
    if rel_dir.is_empty() {
        name.to_string()
    } else {
        format!("{rel_dir}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    async fn collect(root: PathBuf) -> Vec<FileRecord> {
        let mut rx = walk(root);
        let mut records = Vec::new();
        while let Some(result) = rx.recv().await {
            records.push(result.unwrap());
        }
        records
    }

    #[tokio::test]
    async fn test_filters_by_extension() {
        let dir = tempdir().unwrap();
        for name in ["a.js", "a.ts", "a.mjs", "a.json"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("sub")).unwrap();

        let records = collect(dir.path().to_path_buf()).await;
        let mut names: Vec<_> = records.iter().map(|r| r.path.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a.js", "a.mjs", "a.ts"]);
    }

    #[tokio::test]
    async fn test_depth_measured_from_root() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("top.js"), "").unwrap();
        fs::write(dir.path().join("a/mid.js"), "").unwrap();
        fs::write(dir.path().join("a/b/leaf.js"), "").unwrap();

        let records = collect(dir.path().to_path_buf()).await;
        let depth_of = |path: &str| {
            records
                .iter()
                .find(|r| r.path == path)
                .map(|r| r.depth)
                .unwrap()
        };
        assert_eq!(depth_of("top.js"), 0);
        assert_eq!(depth_of("a/mid.js"), 1);
        assert_eq!(depth_of("a/b/leaf.js"), 2);

        // The worklist counter must agree with the pure depth
        // computation for every record.
        for record in &records {
            let parent = Path::new(&record.path)
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .to_string_lossy()
                .into_owned();
            assert_eq!(record.depth, crate::paths::depth(&parent, ""));
        }
    }

    #[tokio::test]
    async fn test_files_emitted_before_subdirectories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/inner.js"), "").unwrap();
        fs::write(dir.path().join("one.js"), "").unwrap();
        fs::write(dir.path().join("two.js"), "").unwrap();

        let records = collect(dir.path().to_path_buf()).await;
        let inner_pos = records.iter().position(|r| r.path == "nested/inner.js");
        let last_top = records
            .iter()
            .rposition(|r| r.depth == 0)
            .expect("top-level files present");
        assert!(inner_pos.unwrap() > last_top);
    }

    #[tokio::test]
    async fn test_symlinks_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("real.js"), "").unwrap();
        #[cfg(unix)]
        std::os::unix::fs::symlink(dir.path().join("real.js"), dir.path().join("link.js"))
            .unwrap();

        let records = collect(dir.path().to_path_buf()).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "real.js");
    }

    #[tokio::test]
    async fn test_missing_root_reports_error() {
        let dir = tempdir().unwrap();
        let mut rx = walk(dir.path().join("does-not-exist"));
        let first = rx.recv().await.unwrap();
        assert!(first.is_err());
    }
}
