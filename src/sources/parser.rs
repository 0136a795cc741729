//! Go source parser for source-mode mock generation.
//!
//! Extracts the package clause, the import table and every top-level
//! `type X interface { ... }` declaration from a single file. Method
//! signatures are handed to [`TypeParser`].
//!
//! Embedded interfaces and type-set constraints are skipped with a warning;
//! grouped `type ( ... )` declarations and generic interfaces are not seen.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use regex::Regex;

use super::typeexpr::{matching_close, split_top_level, TypeParser};
use super::SourceParser;
use crate::model::{Interface, Method, Package};
use crate::util::fs::read_to_string;

static BLOCK_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/\*[\s\S]*?\*/").unwrap());

static LINE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"//[^\n]*").unwrap());

static PACKAGE_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*package\s+(\w+)").unwrap());

static IMPORT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bimport\s*\(([^)]*)\)").unwrap());

static IMPORT_SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bimport\s+((?:\w+|\.)\s+)?"([^"]+)""#).unwrap());

static IMPORT_SPEC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*((?:\w+|\.)\s+)?"([^"]+)""#).unwrap());

static INTERFACE_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\btype\s+(\w+)\s+interface\s*\{").unwrap());

/// The interfaces declared in one Go file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFile {
    /// Package clause name
    pub package: String,

    /// Interfaces in declaration order
    pub interfaces: Vec<Interface>,
}

/// Parser for Go source files.
#[derive(Debug, Clone, Default)]
pub struct GoSourceParser;

impl GoSourceParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a Go file from disk.
    pub fn parse_path(&self, path: &Path) -> Result<ParsedFile> {
        let content = read_to_string(path)?;
        self.parse_content(&content)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse Go source text.
    pub fn parse_content(&self, content: &str) -> Result<ParsedFile> {
        let content = strip_comments(content);

        let package = match PACKAGE_CLAUSE.captures(&content) {
            Some(cap) => cap[1].to_string(),
            None => bail!("missing package clause"),
        };

        let imports = parse_imports(&content);
        let types = TypeParser::new(&imports);

        let mut interfaces = Vec::new();
        for cap in INTERFACE_DECL.captures_iter(&content) {
            let name = &cap[1];
            let whole = cap.get(0).map_or(0..0, |m| m.range());
            let open = whole.end - 1;
            let close = matching_close(&content, open)
                .with_context(|| format!("unterminated interface `{}`", name))?;
            let body = &content[open + 1..close];

            let mut interface = Interface::new(name);
            for item in body_items(body) {
                if let Some(method) = parse_method(item, &types)
                    .with_context(|| format!("in interface `{}`", name))?
                {
                    interface.methods.push(method);
                }
            }
            tracing::debug!(
                "parsed interface {} with {} method(s)",
                name,
                interface.methods.len()
            );
            interfaces.push(interface);
        }

        Ok(ParsedFile {
            package,
            interfaces,
        })
    }
}

impl SourceParser for GoSourceParser {
    fn parse_file(&self, path: &Path) -> Result<Package> {
        let parsed = self.parse_path(path)?;
        Ok(Package {
            name: parsed.package,
            interfaces: parsed.interfaces,
        })
    }
}

/// Remove comments, keeping line structure outside block comments.
fn strip_comments(content: &str) -> String {
    let content = BLOCK_COMMENT.replace_all(content, " ");
    LINE_COMMENT.replace_all(&content, "").into_owned()
}

/// Map each package qualifier to its import path.
///
/// The qualifier is the explicit alias, or else the last path element.
/// Blank (`_`) and dot imports cannot qualify a type and are dropped.
fn parse_imports(content: &str) -> HashMap<String, String> {
    let mut imports = HashMap::new();
    let mut add = |alias: Option<&str>, path: &str| {
        let qualifier = match alias.map(str::trim) {
            Some("_") | Some(".") => return,
            Some(alias) => alias.to_string(),
            None => path.rsplit('/').next().unwrap_or(path).to_string(),
        };
        imports.insert(qualifier, path.to_string());
    };

    for block in IMPORT_BLOCK.captures_iter(content) {
        for spec in IMPORT_SPEC.captures_iter(&block[1]) {
            add(spec.get(1).map(|m| m.as_str()), &spec[2]);
        }
    }
    for single in IMPORT_SINGLE.captures_iter(content) {
        add(single.get(1).map(|m| m.as_str()), &single[2]);
    }

    imports
}

/// Split an interface body into its declarations.
fn body_items(body: &str) -> Vec<&str> {
    split_top_level(body, '\n')
        .into_iter()
        .flat_map(|line| split_top_level(line, ';'))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Parse `Name(params) results`; `Ok(None)` for items that are not methods.
fn parse_method(item: &str, types: &TypeParser<'_>) -> Result<Option<Method>> {
    let Some(open) = item.find('(') else {
        tracing::warn!("skipping embedded interface or constraint `{}`", item);
        return Ok(None);
    };

    let name = item[..open].trim();
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        tracing::warn!("skipping unsupported interface element `{}`", item);
        return Ok(None);
    }

    let close = matching_close(item, open)
        .with_context(|| format!("unbalanced parentheses in `{}`", item))?;
    let params = types
        .parse_params(&item[open + 1..close])
        .with_context(|| format!("bad parameters for method `{}`", name))?;
    let results = types
        .parse_results(&item[close + 1..])
        .with_context(|| format!("bad results for method `{}`", name))?;

    Ok(Some(Method {
        name: name.to_string(),
        params: params.params,
        results,
        variadic: params.variadic,
    }))
}
