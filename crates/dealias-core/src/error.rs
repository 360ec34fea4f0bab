use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dealias operations.
///
/// Every failure mode is fatal: the run stops at the point of occurrence
/// instead of producing a partially rewritten output tree.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No target directory: pass one or set compilerOptions.outDir")]
    TargetMissing,

    #[error("Cannot resolve specifier {specifier:?} in {file}")]
    Unresolved { specifier: String, file: PathBuf },
}
