#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Core pipeline for dealias.
//!
//! Rewrites compiled JavaScript/TypeScript output so that tsconfig path
//! aliases become plain relative imports, and (in ESM mode) relative
//! specifiers carry explicit extensions and directory `index` targets.
//!
//! Logging is owned by the CLI crate to keep this library lightweight.

pub mod config;
pub mod error;
pub mod imports;
pub mod paths;
pub mod pipeline;
pub mod resolver;
pub mod rewrite;
pub mod walk;

pub use config::{AliasMap, CompilerOptions, PackageJson, TsConfig};
pub use error::Error;
pub use imports::{scan_modules, ModuleRef, RefKind};
pub use pipeline::{run, RunOptions, RunSummary};
pub use walk::FileRecord;
