//! Lexical scanner for import/export specifiers.
//!
//! Scans JavaScript/TypeScript source for static imports, `export ...
//! from` re-exports, and dynamic `import()` calls without full parsing.
//! Unlike a reporting scanner, every occurrence is emitted (each one
//! gets rewritten) and the byte span of the specifier literal is
//! recorded so replacements can be spliced in place.

use std::ops::Range;

/// Kind of module reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// `import ... from "..."` or side-effect `import "..."`.
    Static,
    /// `export ... from "..."`.
    ExportFrom,
    /// `import("...")`.
    Dynamic,
}

/// A discovered module reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRef {
    /// Specifier exactly as found, quotes excluded.
    pub specifier: String,
    /// Byte range of the specifier text within the source.
    pub span: Range<usize>,
    pub kind: RefKind,
}

/// Statements longer than this are abandoned mid-scan; keeps malformed
/// input from pinning the scanner.
const STATEMENT_SCAN_LIMIT: usize = 1000;

/// Scan source code for module references, in source order.
#[must_use]
pub fn scan_modules(source: &str) -> Vec<ModuleRef> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut refs = Vec::new();
    let mut i = 0;

    while i < len {
        // Skip single-line comments
        if i + 1 < len && bytes[i] == b'/' && bytes[i + 1] == b'/' {
            while i < len && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }

        // Skip block comments
        if i + 1 < len && bytes[i] == b'/' && bytes[i + 1] == b'*' {
            i += 2;
            while i + 1 < len && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                i += 1;
            }
            i += 2;
            continue;
        }

        if matches_keyword(bytes, i, b"import") {
            let start = i;
            i += 6;
            if let Some((module_ref, end)) = scan_import(source, bytes, i) {
                refs.push(module_ref);
                i = end;
                continue;
            }
            i = start + 1;
            continue;
        }

        if matches_keyword(bytes, i, b"export") {
            let start = i;
            i += 6;
            if let Some((module_ref, end)) = scan_export_from(source, bytes, i) {
                refs.push(module_ref);
                i = end;
                continue;
            }
            i = start + 1;
            continue;
        }

        i += 1;
    }

    refs
}

/// Check if bytes at `pos` match a keyword with word boundaries.
fn matches_keyword(bytes: &[u8], pos: usize, keyword: &[u8]) -> bool {
    let len = keyword.len();
    if pos + len > bytes.len() || &bytes[pos..pos + len] != keyword {
        return false;
    }
    if pos > 0 && is_ident_byte(bytes[pos - 1]) {
        return false;
    }
    if pos + len < bytes.len() && is_ident_byte(bytes[pos + len]) {
        return false;
    }
    true
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Scan past an `import` keyword: dynamic call, `from` clause, or
/// side-effect import. Returns the reference and the position after its
/// closing quote.
fn scan_import(source: &str, bytes: &[u8], start: usize) -> Option<(ModuleRef, usize)> {
    let len = bytes.len();
    let mut i = start;

    // import.meta is not an import statement
    if i < len && bytes[i] == b'.' {
        return None;
    }

    while i < len && bytes[i].is_ascii_whitespace() {
        i += 1;
    }

    // Dynamic import: import("...")
    if i < len && bytes[i] == b'(' {
        i += 1;
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let (specifier, span, end) = read_string_literal(source, bytes, i)?;
        return Some((
            ModuleRef {
                specifier,
                span,
                kind: RefKind::Dynamic,
            },
            end,
        ));
    }

    // Static import: scan until "from" or a direct specifier string.
    while i < len && i < start + STATEMENT_SCAN_LIMIT {
        if matches_keyword(bytes, i, b"from") {
            i += 4;
            while i < len && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let (specifier, span, end) = read_string_literal(source, bytes, i)?;
            return Some((
                ModuleRef {
                    specifier,
                    span,
                    kind: RefKind::Static,
                },
                end,
            ));
        }

        // Side-effect import: import "specifier"
        if bytes[i] == b'"' || bytes[i] == b'\'' || bytes[i] == b'`' {
            let (specifier, span, end) = read_string_literal(source, bytes, i)?;
            return Some((
                ModuleRef {
                    specifier,
                    span,
                    kind: RefKind::Static,
                },
                end,
            ));
        }

        if bytes[i] == b';' {
            break;
        }
        i += 1;
    }

    None
}

/// Scan past an `export` keyword for a `from` clause.
fn scan_export_from(source: &str, bytes: &[u8], start: usize) -> Option<(ModuleRef, usize)> {
    let len = bytes.len();
    let mut i = start;

    while i < len && i < start + STATEMENT_SCAN_LIMIT {
        if matches_keyword(bytes, i, b"from") {
            i += 4;
            while i < len && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let (specifier, span, end) = read_string_literal(source, bytes, i)?;
            return Some((
                ModuleRef {
                    specifier,
                    span,
                    kind: RefKind::ExportFrom,
                },
                end,
            ));
        }

        if bytes[i] == b';' {
            break;
        }
        i += 1;
    }

    None
}

/// Read a quoted string literal starting at `i`. Returns the literal
/// text, its byte span (quotes excluded), and the position after the
/// closing quote. Escape sequences are skipped, not interpreted.
fn read_string_literal(
    source: &str,
    bytes: &[u8],
    i: usize,
) -> Option<(String, Range<usize>, usize)> {
    let len = bytes.len();
    if i >= len {
        return None;
    }
    let quote = bytes[i];
    if quote != b'"' && quote != b'\'' && quote != b'`' {
        return None;
    }

    let start = i + 1;
    let mut j = start;
    while j < len && bytes[j] != quote {
        if bytes[j] == b'\\' && j + 1 < len {
            j += 2;
            continue;
        }
        j += 1;
    }
    if j >= len {
        return None;
    }

    let specifier = source[start..j].to_string();
    Some((specifier, start..j, j + 1))
}
