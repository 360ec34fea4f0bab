//! Parsed configuration surfaces: tsconfig, package.json, and the
//! derived alias table.
//!
//! Config files are located and read by the CLI; this module only models
//! the already-parsed structures the pipeline consumes.

use crate::error::Error;
use serde::Deserialize;
use std::path::Path;

/// The subset of tsconfig.json the pipeline cares about.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    #[serde(default)]
    pub compiler_options: CompilerOptions,
}

/// `compilerOptions` fields consumed by the pipeline.
///
/// `paths` is kept as a `serde_json::Map` because the crate's
/// `preserve_order` feature makes it retain declaration order, which the
/// alias substitution pass depends on (later patterns see text already
/// rewritten by earlier ones).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(default)]
    pub paths: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub out_dir: Option<String>,
}

impl TsConfig {
    /// Parse tsconfig JSON; `path` is only used for error reporting.
    pub fn parse(path: &Path, json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The subset of package.json used to infer ESM mode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageJson {
    #[serde(default, rename = "type")]
    pub package_type: Option<String>,
}

impl PackageJson {
    /// Parse package.json; `path` is only used for error reporting.
    pub fn parse(path: &Path, json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// True when `"type": "module"`.
    #[must_use]
    pub fn is_module(&self) -> bool {
        self.package_type.as_deref() == Some("module")
    }
}

/// Ordered alias table derived from `compilerOptions.paths`.
///
/// Each entry maps a literal alias prefix to a directory relative to the
/// output root, with `/*` wildcard markers already stripped from both
/// sides. Declaration order is preserved and never validated for
/// overlap: substitution is first-declared, first-applied.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    entries: Vec<(String, String)>,
}

impl AliasMap {
    /// Build the alias table from `compilerOptions.paths`.
    ///
    /// The first target per key is used (tsconfig allows several); keys
    /// without a usable string target are skipped.
    #[must_use]
    pub fn from_compiler_options(options: &CompilerOptions) -> Self {
        let entries = options
            .paths
            .iter()
            .filter_map(|(pattern, targets)| {
                let first = targets.as_array()?.first()?.as_str()?;
                Some((strip_star(pattern), strip_star(first)))
            })
            .collect();
        Self { entries }
    }

    /// Alias pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(pattern, target)| (pattern.as_str(), target.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Strip the first `/*` wildcard marker from an alias pattern or target.
fn strip_star(s: &str) -> String {
    s.replacen("/*", "", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(json: &str) -> CompilerOptions {
        let config = TsConfig::parse(Path::new("tsconfig.json"), json).unwrap();
        config.compiler_options
    }

    #[test]
    fn test_alias_map_strips_wildcards() {
        let opts = options(r#"{"compilerOptions": {"paths": {"@lib/*": ["lib/*"]}}}"#);
        let map = AliasMap::from_compiler_options(&opts);
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, vec![("@lib", "lib")]);
    }

    #[test]
    fn test_alias_map_uses_first_target() {
        let opts = options(
            r#"{"compilerOptions": {"paths": {"@a/*": ["first/*", "second/*"]}}}"#,
        );
        let map = AliasMap::from_compiler_options(&opts);
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, vec![("@a", "first")]);
    }

    #[test]
    fn test_alias_map_preserves_declaration_order() {
        let opts = options(
            r##"{"compilerOptions": {"paths": {
                "@app/core/*": ["core/*"],
                "@app/*": ["app/*"],
                "#shared/*": ["shared/*"]
            }}}"##,
        );
        let map = AliasMap::from_compiler_options(&opts);
        let patterns: Vec<_> = map.iter().map(|(p, _)| p).collect();
        assert_eq!(patterns, vec!["@app/core", "@app", "#shared"]);
    }

    #[test]
    fn test_alias_map_skips_non_string_targets() {
        let opts = options(r#"{"compilerOptions": {"paths": {"@bad/*": [], "@ok/*": ["ok/*"]}}}"#);
        let map = AliasMap::from_compiler_options(&opts);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_missing_paths_gives_empty_map() {
        let opts = options(r#"{"compilerOptions": {"outDir": "dist"}}"#);
        let map = AliasMap::from_compiler_options(&opts);
        assert!(map.is_empty());
        assert_eq!(opts.out_dir.as_deref(), Some("dist"));
    }

    #[test]
    fn test_package_json_module_type() {
        let pkg = PackageJson::parse(Path::new("package.json"), r#"{"type": "module"}"#).unwrap();
        assert!(pkg.is_module());

        let pkg = PackageJson::parse(Path::new("package.json"), r#"{"name": "x"}"#).unwrap();
        assert!(!pkg.is_module());
    }

    #[test]
    fn test_parse_error_names_path() {
        let err = TsConfig::parse(Path::new("bad/tsconfig.json"), "{").unwrap_err();
        assert!(err.to_string().contains("bad/tsconfig.json"));
    }
}
