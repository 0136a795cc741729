//! Function-field mocks.
//!
//! Each interface `Foo` becomes a struct `MockFoo` with one `<Method>Func`
//! field per method. Calling a method records its arguments and delegates to
//! the field, panicking when the field is unset.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::Result;
use tracing::{debug, warn};

use super::matchers::{matcher_types, render_matcher};
use super::{header, CodeGenerator, GeneratedSource, GeneratorOptions, ImportTable};
use crate::model::{Interface, Method, Package, Parameter, Type};

/// Identifiers the mock file itself uses.
const RESERVED: &[&str] = &["sync", "m", "matchers"];

/// Default [`CodeGenerator`] emitting plain Go with no runtime dependency.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoMockGenerator;

impl GoMockGenerator {
    pub fn new() -> Self {
        GoMockGenerator
    }

    fn mock_type_name(interface: &Interface, pkg: &Package, opts: &GeneratorOptions) -> String {
        match opts.mock_name.as_deref() {
            Some(name) if !name.is_empty() && pkg.interfaces.len() == 1 => name.to_string(),
            _ => format!("Mock{}", interface.name),
        }
    }
}

impl CodeGenerator for GoMockGenerator {
    fn generate(
        &self,
        pkg: &Package,
        source: &str,
        opts: &GeneratorOptions,
    ) -> Result<GeneratedSource> {
        if opts.mock_name.as_deref().is_some_and(|n| !n.is_empty()) && pkg.interfaces.len() != 1 {
            warn!(
                "--mock-name ignored: {} interfaces requested, name applies to exactly one",
                pkg.interfaces.len()
            );
        }

        let package_clause = match opts.package.as_deref() {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => format!("mock_{}", pkg.name.to_lowercase()),
        };

        let imports = ImportTable::new(
            pkg.imports().iter().map(String::as_str),
            opts.self_package.as_deref(),
            RESERVED,
        );

        let mut out = header(source);
        out.push('\n');
        let _ = writeln!(out, "package {}\n", package_clause);
        out.push_str(&imports.render_block(&["sync"]));

        for interface in &pkg.interfaces {
            let name = Self::mock_type_name(interface, pkg, opts);
            debug!("rendering {} for {}", name, interface.name);
            out.push('\n');
            render_mock(&mut out, &name, interface, &imports);
        }

        let mut matchers = BTreeMap::new();
        for (name, ty) in matcher_types(pkg) {
            let text = render_matcher(&name, &ty, source, opts.self_package.as_deref());
            matchers.insert(name, text.into_bytes());
        }

        Ok(GeneratedSource {
            mock: out.into_bytes(),
            matchers,
        })
    }
}

fn render_mock(out: &mut String, name: &str, interface: &Interface, imports: &ImportTable) {
    let _ = writeln!(out, "// {} is a mock of the {} interface.", name, interface.name);
    let _ = writeln!(out, "type {} struct {{", name);
    out.push_str("\tmu    sync.Mutex\n");
    out.push_str("\tcalls map[string][][]interface{}\n");
    for method in &interface.methods {
        let _ = writeln!(
            out,
            "\n\t{}Func func{}",
            method.name,
            signature(method, imports, false)
        );
    }
    out.push_str("}\n\n");

    let _ = writeln!(out, "// New{} creates a mock with no behaviour set.", name);
    let _ = writeln!(out, "func New{}() *{} {{", name, name);
    let _ = writeln!(
        out,
        "\treturn &{}{{calls: map[string][][]interface{{}}{{}}}}",
        name
    );
    out.push_str("}\n");

    for method in &interface.methods {
        out.push('\n');
        render_method(out, name, method, imports);
    }

    let _ = write!(
        out,
        "\n// Calls returns the arguments of every call to method, in order.\n\
         func (m *{name}) Calls(method string) [][]interface{{}} {{\n\
         \tm.mu.Lock()\n\
         \tdefer m.mu.Unlock()\n\
         \treturn append([][]interface{{}}(nil), m.calls[method]...)\n\
         }}\n\
         \n\
         func (m *{name}) record(method string, args ...interface{{}}) {{\n\
         \tm.mu.Lock()\n\
         \tdefer m.mu.Unlock()\n\
         \tm.calls[method] = append(m.calls[method], args)\n\
         }}\n",
        name = name
    );
}

fn render_method(out: &mut String, mock: &str, method: &Method, imports: &ImportTable) {
    let _ = writeln!(
        out,
        "func (m *{}) {}{} {{",
        mock,
        method.name,
        signature(method, imports, true)
    );

    let args = arg_names(method);
    let _ = writeln!(out, "\tm.record({:?}{})", method.name, prefixed(&args));
    let _ = writeln!(out, "\tif m.{}Func == nil {{", method.name);
    let _ = writeln!(
        out,
        "\t\tpanic(\"unexpected call to {}.{}\")",
        mock, method.name
    );
    out.push_str("\t}\n");

    let mut call_args = args.clone();
    if method.variadic.is_some() {
        if let Some(last) = call_args.last_mut() {
            last.push_str("...");
        }
    }
    let call = format!("m.{}Func({})", method.name, call_args.join(", "));
    if method.results.is_empty() {
        let _ = writeln!(out, "\t{}", call);
    } else {
        let _ = writeln!(out, "\treturn {}", call);
    }
    out.push_str("}\n");
}

/// `(params) results`; parameter names are `_a0, _a1, ...` when `named`.
fn signature(method: &Method, imports: &ImportTable, named: bool) -> String {
    let args = arg_names(method);
    let mut params: Vec<String> = method
        .params
        .iter()
        .map(|p| render_type(&p.ty, imports))
        .collect();
    if let Some(ref v) = method.variadic {
        params.push(format!("...{}", render_type(&v.ty, imports)));
    }
    if named {
        params = args
            .iter()
            .zip(params)
            .map(|(a, t)| format!("{} {}", a, t))
            .collect();
    }

    let results = render_results(&method.results, imports);
    format!("({}){}", params.join(", "), results)
}

fn render_results(results: &[Parameter], imports: &ImportTable) -> String {
    match results {
        [] => String::new(),
        [only] => format!(" {}", render_type(&only.ty, imports)),
        many => {
            let rendered: Vec<String> = many.iter().map(|r| render_type(&r.ty, imports)).collect();
            format!(" ({})", rendered.join(", "))
        }
    }
}

fn render_type(ty: &Type, imports: &ImportTable) -> String {
    imports.render(ty)
}

fn arg_names(method: &Method) -> Vec<String> {
    let n = method.params.len() + usize::from(method.variadic.is_some());
    (0..n).map(|i| format!("_a{}", i)).collect()
}

fn prefixed(args: &[String]) -> String {
    args.iter().map(|a| format!(", {}", a)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{reader_interface, reader_writer_package, service_package};

    fn generate(pkg: &Package, opts: &GeneratorOptions) -> (String, BTreeMap<String, Vec<u8>>) {
        let out = GoMockGenerator::new()
            .generate(pkg, "example.com/pkg (interfaces: Reader, Writer)", opts)
            .unwrap();
        (String::from_utf8(out.mock).unwrap(), out.matchers)
    }

    #[test]
    fn test_mock_per_interface_in_order() {
        let (src, _) = generate(&reader_writer_package(), &GeneratorOptions::default());

        assert!(src.starts_with("// Code generated by mockforge. DO NOT EDIT.\n"));
        assert!(src.contains("// Source: example.com/pkg (interfaces: Reader, Writer)\n"));
        assert!(src.contains("package mock_pkg\n"));
        assert!(src.contains("\t\"sync\"\n"));

        let reader = src.find("type MockReader struct").unwrap();
        let writer = src.find("type MockWriter struct").unwrap();
        assert!(reader < writer);
        assert!(src.contains("\tReadFunc func([]byte) (int, error)\n"));
        assert!(src.contains("func (m *MockReader) Read(_a0 []byte) (int, error) {"));
        assert!(src.contains("\tm.record(\"Read\", _a0)\n"));
        assert!(src.contains("\treturn m.ReadFunc(_a0)\n"));
        assert!(src.contains("func NewMockWriter() *MockWriter {"));
    }

    #[test]
    fn test_variadic_forwarding_and_imports() {
        let (src, matchers) = generate(&service_package(), &GeneratorOptions::default());

        assert!(src.contains("\t\"context\"\n"));
        assert!(src.contains("\t\"net/http\"\n"));
        assert!(src.contains(
            "func (m *MockService) Handle(_a0 context.Context, _a1 *http.Request) error {"
        ));
        assert!(src.contains(
            "func (m *MockService) Lookup(_a0 map[string]int, _a1 ...string) []byte {"
        ));
        assert!(src.contains("\treturn m.LookupFunc(_a0, _a1...)\n"));
        assert_eq!(matchers.len(), 4);
    }

    #[test]
    fn test_no_results_is_plain_call() {
        let pkg = Package::new("p").with_interface(
            Interface::new("Closer").with_method(Method::new("Close")),
        );
        let (src, matchers) = generate(&pkg, &GeneratorOptions::default());
        assert!(src.contains("func (m *MockCloser) Close() {"));
        assert!(src.contains("\tm.record(\"Close\")\n"));
        assert!(src.contains("\tm.CloseFunc()\n"));
        assert!(matchers.is_empty());
    }

    #[test]
    fn test_mock_name_and_package_overrides() {
        let pkg = Package::new("io").with_interface(reader_interface());
        let opts = GeneratorOptions {
            mock_name: Some("FakeReader".into()),
            package: Some("fakes".into()),
            self_package: None,
        };
        let (src, _) = generate(&pkg, &opts);
        assert!(src.contains("package fakes\n"));
        assert!(src.contains("type FakeReader struct"));
        assert!(!src.contains("MockReader"));
    }

    #[test]
    fn test_mock_name_ignored_for_several_interfaces() {
        let opts = GeneratorOptions {
            mock_name: Some("Fake".into()),
            ..Default::default()
        };
        let (src, _) = generate(&reader_writer_package(), &opts);
        assert!(src.contains("type MockReader struct"));
        assert!(src.contains("type MockWriter struct"));
    }

    #[test]
    fn test_self_package_types_are_unqualified() {
        let pkg = Package::new("shapes").with_interface(
            Interface::new("Drawer").with_method(
                Method::new("Draw")
                    .with_param(Parameter::unnamed(Type::pointer(Type::named(
                        "example.com/shapes",
                        "Shape",
                    )))),
            ),
        );
        let opts = GeneratorOptions {
            self_package: Some("example.com/shapes".into()),
            ..Default::default()
        };
        let (src, _) = generate(&pkg, &opts);
        assert!(src.contains("func (m *MockDrawer) Draw(_a0 *Shape) {"));
        assert!(!src.contains("\"example.com/shapes\""));
    }
}
