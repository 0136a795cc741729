//! Type descriptions for method signatures.
//!
//! [`Type`] is a tagged union: each node carries its kind, and composite
//! kinds nest arbitrarily. Named types break reference cycles, so a method
//! may mention a type that (indirectly) mentions the interface itself.
//!
//! The variant order is part of the wire contract (see [`super::wire`]).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A Go type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// Builtin types (`int`, `error`, ...) plus `interface{}` and `struct{}`
    Predeclared(String),

    /// A declared type; `package` is the import path, empty for the local package
    Named { package: String, name: String },

    Pointer(Box<Type>),

    Array { len: i64, elem: Box<Type> },

    Slice(Box<Type>),

    Map { key: Box<Type>, value: Box<Type> },

    Chan { dir: ChanDir, elem: Box<Type> },

    Func(Box<FuncType>),
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChanDir {
    Both,
    Recv,
    Send,
}

/// A function signature used as a type (`func(int) error`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuncType {
    pub params: Vec<Type>,
    pub results: Vec<Type>,
    /// Element type of a trailing `...T` parameter
    pub variadic: Option<Type>,
}

impl Type {
    pub fn predeclared(name: impl Into<String>) -> Self {
        Type::Predeclared(name.into())
    }

    pub fn named(package: impl Into<String>, name: impl Into<String>) -> Self {
        Type::Named {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn pointer(elem: Type) -> Self {
        Type::Pointer(Box::new(elem))
    }

    pub fn slice(elem: Type) -> Self {
        Type::Slice(Box::new(elem))
    }

    pub fn array(len: i64, elem: Type) -> Self {
        Type::Array {
            len,
            elem: Box::new(elem),
        }
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn chan(dir: ChanDir, elem: Type) -> Self {
        Type::Chan {
            dir,
            elem: Box::new(elem),
        }
    }

    pub fn func(func: FuncType) -> Self {
        Type::Func(Box::new(func))
    }

    /// Attach `import_path` to every unqualified named type.
    pub fn qualified(self, import_path: &str) -> Type {
        let q = |t: Box<Type>| Box::new((*t).qualified(import_path));
        match self {
            Type::Named { package, name } if package.is_empty() => Type::Named {
                package: import_path.to_string(),
                name,
            },
            Type::Pointer(elem) => Type::Pointer(q(elem)),
            Type::Slice(elem) => Type::Slice(q(elem)),
            Type::Array { len, elem } => Type::Array { len, elem: q(elem) },
            Type::Map { key, value } => Type::Map {
                key: q(key),
                value: q(value),
            },
            Type::Chan { dir, elem } => Type::Chan { dir, elem: q(elem) },
            Type::Func(f) => {
                let FuncType {
                    params,
                    results,
                    variadic,
                } = *f;
                Type::func(FuncType {
                    params: params.into_iter().map(|t| t.qualified(import_path)).collect(),
                    results: results.into_iter().map(|t| t.qualified(import_path)).collect(),
                    variadic: variadic.map(|t| t.qualified(import_path)),
                })
            }
            other => other,
        }
    }

    /// Push every import path this type refers to.
    pub fn collect_imports(&self, out: &mut Vec<String>) {
        match self {
            Type::Predeclared(_) => {}
            Type::Named { package, .. } => {
                if !package.is_empty() {
                    out.push(package.clone());
                }
            }
            Type::Pointer(elem) | Type::Slice(elem) => elem.collect_imports(out),
            Type::Array { elem, .. } | Type::Chan { elem, .. } => elem.collect_imports(out),
            Type::Map { key, value } => {
                key.collect_imports(out);
                value.collect_imports(out);
            }
            Type::Func(f) => {
                for t in f.params.iter().chain(&f.results).chain(&f.variadic) {
                    t.collect_imports(out);
                }
            }
        }
    }

    /// Render as Go source.
    ///
    /// `qualifier` maps an import path to the identifier used to refer to it;
    /// returning `None` renders the name unqualified.
    pub fn render(&self, qualifier: &dyn Fn(&str) -> Option<String>) -> String {
        match self {
            Type::Predeclared(name) => name.clone(),
            Type::Named { package, name } => {
                if package.is_empty() {
                    return name.clone();
                }
                match qualifier(package) {
                    Some(alias) => format!("{}.{}", alias, name),
                    None => name.clone(),
                }
            }
            Type::Pointer(elem) => format!("*{}", elem.render(qualifier)),
            Type::Array { len, elem } => format!("[{}]{}", len, elem.render(qualifier)),
            Type::Slice(elem) => format!("[]{}", elem.render(qualifier)),
            Type::Map { key, value } => {
                format!("map[{}]{}", key.render(qualifier), value.render(qualifier))
            }
            Type::Chan { dir, elem } => {
                let elem_src = elem.render(qualifier);
                match dir {
                    ChanDir::Both => format!("chan {}", elem_src),
                    ChanDir::Recv => format!("<-chan {}", elem_src),
                    ChanDir::Send => format!("chan<- {}", elem_src),
                }
            }
            Type::Func(f) => f.render(qualifier),
        }
    }
}

impl FuncType {
    /// Render as `func(...) ...`.
    pub fn render(&self, qualifier: &dyn Fn(&str) -> Option<String>) -> String {
        let mut params: Vec<String> = self.params.iter().map(|t| t.render(qualifier)).collect();
        if let Some(ref v) = self.variadic {
            params.push(format!("...{}", v.render(qualifier)));
        }
        let results: Vec<String> = self.results.iter().map(|t| t.render(qualifier)).collect();

        let mut out = format!("func({})", params.join(", "));
        match results.len() {
            0 => {}
            1 => {
                out.push(' ');
                out.push_str(&results[0]);
            }
            _ => out.push_str(&format!(" ({})", results.join(", "))),
        }
        out
    }
}

/// Renders with full import paths, e.g. `*net/http.Request`.
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&|path| Some(path.to_string())))
    }
}
