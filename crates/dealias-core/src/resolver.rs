//! Local specifier resolution for ESM mode.
//!
//! Rewrites relative import/export/dynamic-import specifiers so they
//! name a concrete file: a directory specifier gains `/index`, and the
//! winning extension from the probe order is appended. An unresolvable
//! specifier aborts the run.

use crate::error::Error;
use crate::imports::{scan_modules, ModuleRef, RefKind};
use std::io;
use std::ops::Range;
use std::path::Path;

/// Probe order when a specifier names no existing file directly. The
/// leading empty entry checks the exact path first, so specifiers that
/// already carry an extension pass through unchanged.
const RESOLVE_EXTENSIONS: &[&str] = &["", ".js", ".mjs", ".cjs", ".ts", ".json"];

/// Resolve every local specifier in `content`, where `file_dir` is the
/// directory containing the file being rewritten and `file` is its
/// root-relative path for diagnostics.
///
/// Static and export-from specifiers are handled first; dynamic imports
/// are rescanned from the mutated text as a second batch, keeping the
/// two lexical shapes from interfering with each other's spans.
pub async fn resolve(content: String, file_dir: &Path, file: &Path) -> Result<String, Error> {
    let content = resolve_batch(content, file_dir, file, false).await?;
    resolve_batch(content, file_dir, file, true).await
}

async fn resolve_batch(
    content: String,
    file_dir: &Path,
    file: &Path,
    dynamic: bool,
) -> Result<String, Error> {
    let refs: Vec<ModuleRef> = scan_modules(&content)
        .into_iter()
        .filter(|r| (r.kind == RefKind::Dynamic) == dynamic)
        .filter(|r| r.specifier.contains("./"))
        .collect();
    if refs.is_empty() {
        return Ok(content);
    }

    let mut replacements = Vec::with_capacity(refs.len());
    for module_ref in &refs {
        let resolved = resolve_specifier(&module_ref.specifier, file_dir)
            .await?
            .ok_or_else(|| Error::Unresolved {
                specifier: module_ref.specifier.clone(),
                file: file.to_path_buf(),
            })?;
        replacements.push((module_ref.span.clone(), resolved));
    }
    Ok(splice(&content, replacements))
}

/// Resolve one specifier to its extension-correct form, or `None` when
/// no probe hits.
async fn resolve_specifier(specifier: &str, file_dir: &Path) -> Result<Option<String>, Error> {
    // Directory check comes first: "./utils" with a utils/ directory
    // resolves to its index even when utils.js also exists.
    let target = if is_directory(&file_dir.join(specifier)).await? {
        format!("{specifier}/index")
    } else {
        specifier.to_string()
    };

    for ext in RESOLVE_EXTENSIONS {
        let candidate = format!("{target}{ext}");
        if is_file(&file_dir.join(&candidate)).await? {
            return Ok(Some(ensure_relative(candidate)));
        }
    }
    Ok(None)
}

/// lstat-style directory probe; a missing path is simply not a
/// directory, any other error propagates.
async fn is_directory(path: &Path) -> Result<bool, Error> {
    match tokio::fs::symlink_metadata(path).await {
        Ok(meta) => Ok(meta.is_dir()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}

async fn is_file(path: &Path) -> Result<bool, Error> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}

fn ensure_relative(specifier: String) -> String {
    if specifier.starts_with('.') {
        specifier
    } else {
        format!("./{specifier}")
    }
}

/// Splice replacement texts into `content` at ascending, non-overlapping
/// spans (the order the scanner emits them in).
fn splice(content: &str, replacements: Vec<(Range<usize>, String)>) -> String {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for (span, text) in replacements {
        out.push_str(&content[last..span.start]);
        out.push_str(&text);
        last = span.end;
    }
    out.push_str(&content[last..]);
    out
}
