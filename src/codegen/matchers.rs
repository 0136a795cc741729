//! Argument matchers.
//!
//! One matcher type is generated per distinct parameter type, however many
//! methods use it. The matcher's name is derived from the type's shape, so
//! `[]byte` becomes `SliceOfByte` and `*http.Request` becomes
//! `PtrToHttpRequest`.

use std::collections::BTreeMap;

use crate::model::{ChanDir, Package, Type};

use super::{header, ImportTable};

/// Package clause of generated matcher files.
pub const MATCHERS_PACKAGE: &str = "matchers";

/// Name of the matcher type for `ty`.
pub fn matcher_name(ty: &Type) -> String {
    match ty {
        Type::Predeclared(name) => camel(name),
        Type::Named { package, name } => {
            if package.is_empty() {
                camel(name)
            } else {
                let last = package.rsplit('/').next().unwrap_or(package);
                format!("{}{}", camel(last), camel(name))
            }
        }
        Type::Pointer(elem) => format!("PtrTo{}", matcher_name(elem)),
        Type::Slice(elem) => format!("SliceOf{}", matcher_name(elem)),
        Type::Array { len, elem } => format!("ArrayOf{}{}", len, matcher_name(elem)),
        Type::Map { key, value } => {
            format!("MapOf{}To{}", matcher_name(key), matcher_name(value))
        }
        Type::Chan { dir, elem } => {
            let prefix = match dir {
                ChanDir::Both => "ChanOf",
                ChanDir::Recv => "RecvChanOf",
                ChanDir::Send => "SendChanOf",
            };
            format!("{}{}", prefix, matcher_name(elem))
        }
        Type::Func(f) => {
            let mut name = String::from("Func");
            let mut params: Vec<String> = f.params.iter().map(matcher_name).collect();
            if let Some(ref v) = f.variadic {
                params.push(format!("Variadic{}", matcher_name(v)));
            }
            if !params.is_empty() {
                name.push_str("Of");
                name.push_str(&params.concat());
            }
            if !f.results.is_empty() {
                name.push_str("Returning");
                name.push_str(&f.results.iter().map(matcher_name).collect::<String>());
            }
            name
        }
    }
}

/// Every distinct parameter type in `pkg`, keyed by matcher name.
///
/// Variadic parameters contribute their element type.
pub fn matcher_types(pkg: &Package) -> BTreeMap<String, Type> {
    let mut out = BTreeMap::new();
    for interface in &pkg.interfaces {
        for method in &interface.methods {
            for param in method.params.iter().chain(method.variadic.iter()) {
                let name = matcher_name(&param.ty);
                if let Some(existing) = out.get(&name) {
                    if existing != &param.ty {
                        tracing::warn!(
                            "matcher name {} is shared by {} and {}; keeping the first",
                            name,
                            existing,
                            param.ty
                        );
                    }
                    continue;
                }
                out.insert(name, param.ty.clone());
            }
        }
    }
    out
}

/// Render the matcher file for one type.
pub fn render_matcher(name: &str, ty: &Type, source: &str, self_package: Option<&str>) -> String {
    let imports = ImportTable::for_types([ty], self_package, &["reflect"]);
    let ty_src = imports.render(ty);

    let mut out = header(source);
    out.push('\n');
    out.push_str(&format!("package {}\n\n", MATCHERS_PACKAGE));
    out.push_str(&imports.render_block(&["reflect"]));
    out.push('\n');
    out.push_str(&format!(
        "// {name} reports whether an argument of type {ty_src} matches.\n\
         type {name} func({ty_src}) bool\n\
         \n\
         // Any{name} matches every {ty_src}.\n\
         func Any{name}() {name} {{\n\
         \treturn func({ty_src}) bool {{ return true }}\n\
         }}\n\
         \n\
         // Eq{name} matches arguments deeply equal to want.\n\
         func Eq{name}(want {ty_src}) {name} {{\n\
         \treturn func(got {ty_src}) bool {{ return reflect.DeepEqual(got, want) }}\n\
         }}\n\
         \n\
         // Matches applies the matcher to an untyped argument.\n\
         func (m {name}) Matches(arg interface{{}}) bool {{\n\
         \tv, ok := arg.({ty_src})\n\
         \treturn ok && m(v)\n\
         }}\n",
        name = name,
        ty_src = ty_src,
    ));
    out
}

/// `net/http` -> `Http`, `yaml.v3` -> `YamlV3`, `interface{}` -> `Interface`.
fn camel(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}
