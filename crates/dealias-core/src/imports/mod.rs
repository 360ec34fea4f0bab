//! Module specifier discovery.

mod scan;

pub use scan::{scan_modules, ModuleRef, RefKind};
