//! Pure path arithmetic: traversal depth, depth-relative path
//! synthesis, and source-file eligibility. No I/O.

use std::path::Path;

/// Extensions treated as rewritable source files.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "ts", "mjs"];

/// Number of path segments by which `dir` is nested below `root`.
///
/// Trailing separators on either argument do not change the result.
#[must_use]
pub fn depth(dir: &str, root: &str) -> usize {
    segments(dir).saturating_sub(segments(root))
}

fn segments(path: &str) -> usize {
    path.trim_end_matches(['/', '\\'])
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .count()
}

/// Synthesize the relative path from a file `depth` levels below the
/// output root to `target_dir`, which is expressed relative to that
/// root. Depth is all the information needed: the traversal measures it
/// from the root, so no per-file directory comparison is required.
#[must_use]
pub fn relative_from_depth(depth: usize, target_dir: &str) -> String {
    if depth == 0 {
        return format!("./{target_dir}");
    }
    let mut out = "../".repeat(depth);
    out.push_str(target_dir);
    out
}

/// True when `filename` has one of the recognized source extensions.
#[must_use]
pub fn is_eligible_source(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}
