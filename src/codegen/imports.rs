//! Import aliasing for generated files.

use std::collections::{BTreeMap, HashSet};

use crate::model::Type;

/// Assigns each imported package a unique, valid Go identifier.
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    /// Import path -> alias
    aliases: BTreeMap<String, String>,
    self_package: Option<String>,
}

impl ImportTable {
    /// Build a table for `paths`, leaving out `self_package`.
    ///
    /// `reserved` names (identifiers already used by the generated file)
    /// are never handed out as aliases.
    pub fn new<'a>(
        paths: impl IntoIterator<Item = &'a str>,
        self_package: Option<&str>,
        reserved: &[&str],
    ) -> Self {
        let mut taken: HashSet<String> = reserved.iter().map(|s| s.to_string()).collect();
        let mut aliases = BTreeMap::new();

        let mut sorted: Vec<&str> = paths.into_iter().collect();
        sorted.sort_unstable();
        sorted.dedup();

        for path in sorted {
            if Some(path) == self_package {
                continue;
            }
            let base = sanitize(path.rsplit('/').next().unwrap_or(path));
            let mut alias = base.clone();
            let mut n = 1;
            while taken.contains(&alias) {
                alias = format!("{}{}", base, n);
                n += 1;
            }
            taken.insert(alias.clone());
            aliases.insert(path.to_string(), alias);
        }

        ImportTable {
            aliases,
            self_package: self_package.map(str::to_string),
        }
    }

    /// Build a table covering every package referenced by `types`.
    pub fn for_types<'t>(
        types: impl IntoIterator<Item = &'t Type>,
        self_package: Option<&str>,
        reserved: &[&str],
    ) -> Self {
        let mut paths = Vec::new();
        for ty in types {
            ty.collect_imports(&mut paths);
        }
        Self::new(paths.iter().map(String::as_str), self_package, reserved)
    }

    /// Alias for `path`; `None` for the self package.
    pub fn alias(&self, path: &str) -> Option<String> {
        if self.self_package.as_deref() == Some(path) {
            return None;
        }
        Some(
            self.aliases
                .get(path)
                .cloned()
                .unwrap_or_else(|| sanitize(path.rsplit('/').next().unwrap_or(path))),
        )
    }

    /// Render a type using this table's aliases.
    pub fn render(&self, ty: &Type) -> String {
        ty.render(&|path| self.alias(path))
    }

    /// Render the `import ( ... )` block; `extra` are unaliased std imports.
    pub fn render_block(&self, extra: &[&str]) -> String {
        if self.aliases.is_empty() && extra.is_empty() {
            return String::new();
        }
        let mut out = String::from("import (\n");
        for path in extra {
            out.push_str(&format!("\t\"{}\"\n", path));
        }
        if !self.aliases.is_empty() && !extra.is_empty() {
            out.push('\n');
        }
        for (path, alias) in &self.aliases {
            let last = path.rsplit('/').next().unwrap_or(path);
            if alias == last {
                out.push_str(&format!("\t\"{}\"\n", path));
            } else {
                out.push_str(&format!("\t{} \"{}\"\n", alias, path));
            }
        }
        out.push_str(")\n");
        out
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Turn a path element into a Go identifier (`yaml.v3` -> `yaml_v3`).
fn sanitize(segment: &str) -> String {
    let mut out: String = segment
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_are_unique_and_valid() {
        let table = ImportTable::new(
            ["example.com/a/http", "net/http", "gopkg.in/yaml.v3"],
            None,
            &["sync"],
        );
        assert_eq!(table.alias("example.com/a/http").as_deref(), Some("http"));
        assert_eq!(table.alias("net/http").as_deref(), Some("http1"));
        assert_eq!(table.alias("gopkg.in/yaml.v3").as_deref(), Some("yaml_v3"));
    }

    #[test]
    fn test_reserved_names_are_avoided() {
        let table = ImportTable::new(["example.com/sync"], None, &["sync"]);
        assert_eq!(table.alias("example.com/sync").as_deref(), Some("sync1"));
    }

    #[test]
    fn test_self_package_is_unqualified() {
        let table = ImportTable::new(["example.com/me", "context"], Some("example.com/me"), &[]);
        assert!(table.alias("example.com/me").is_none());
        assert_eq!(
            table.render(&Type::pointer(Type::named("example.com/me", "Thing"))),
            "*Thing"
        );
        let block = table.render_block(&["sync"]);
        assert!(block.contains("\t\"context\"\n"));
        assert!(!block.contains("example.com/me"));
    }

    #[test]
    fn test_render_block_aliases_only_when_needed() {
        let table = ImportTable::new(["gopkg.in/yaml.v3", "net/http"], None, &[]);
        let block = table.render_block(&[]);
        assert!(block.contains("\tyaml_v3 \"gopkg.in/yaml.v3\"\n"));
        assert!(block.contains("\t\"net/http\"\n"));
    }

    #[test]
    fn test_empty_block() {
        let table = ImportTable::new(Vec::<&str>::new(), None, &[]);
        assert!(table.is_empty());
        assert_eq!(table.render_block(&[]), "");
    }
}
