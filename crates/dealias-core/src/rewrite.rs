//! Alias substitution.
//!
//! Replaces every occurrence of each alias pattern with the relative
//! path from the file's nesting depth to the alias target. Patterns are
//! applied in declaration order, so later patterns see text already
//! rewritten by earlier ones; overlapping aliases are the configuration
//! author's responsibility.

use crate::config::AliasMap;
use crate::paths::relative_from_depth;

/// Rewrite all alias occurrences in `content` for a file at `depth`
/// levels below the output root.
#[must_use]
pub fn rewrite(content: &str, aliases: &AliasMap, depth: usize) -> String {
    let mut out = content.to_string();
    for (pattern, target) in aliases.iter() {
        let replacement = relative_from_depth(depth, target);
        if out.contains(pattern) {
            out = out.replace(pattern, &replacement);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CompilerOptions, TsConfig};
    use std::path::Path;

    fn aliases(json: &str) -> AliasMap {
        let config = TsConfig::parse(Path::new("tsconfig.json"), json).unwrap();
        AliasMap::from_compiler_options(&config.compiler_options)
    }

    fn lib_alias() -> AliasMap {
        aliases(r#"{"compilerOptions": {"paths": {"@lib/*": ["lib/*"]}}}"#)
    }

    #[test]
    fn test_no_match_returns_identical_content() {
        let content = "import fs from 'fs';\nconsole.log('@other/thing');\n";
        assert_eq!(rewrite(content, &lib_alias(), 3), content);
    }

    #[test]
    fn test_alias_at_depth_two() {
        let content = "import { x } from '@lib/foo';";
        assert_eq!(
            rewrite(content, &lib_alias(), 2),
            "import { x } from '../../lib/foo';"
        );
    }

    #[test]
    fn test_alias_at_depth_zero() {
        let content = "import { x } from '@lib/foo';";
        assert_eq!(
            rewrite(content, &lib_alias(), 0),
            "import { x } from './lib/foo';"
        );
    }

    #[test]
    fn test_all_occurrences_replaced() {
        let content = "import a from '@lib/a';\nexport * from '@lib/b';\n";
        let out = rewrite(content, &lib_alias(), 1);
        assert_eq!(out, "import a from '../lib/a';\nexport * from '../lib/b';\n");
    }

    #[test]
    fn test_most_specific_first_declaration_order() {
        let map = aliases(
            r#"{"compilerOptions": {"paths": {
                "@app/core/*": ["core/*"],
                "@app/*": ["app/*"]
            }}}"#,
        );
        let out = rewrite("import '@app/core/x'; import '@app/y';", &map, 0);
        assert_eq!(out, "import './core/x'; import './app/y';");
    }

    #[test]
    fn test_empty_alias_map_is_identity() {
        let map = aliases(r#"{"compilerOptions": {}}"#);
        let content = "import '@lib/foo';";
        assert_eq!(rewrite(content, &map, 2), content);
    }
}
