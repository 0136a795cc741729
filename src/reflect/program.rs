//! The introspection program.
//!
//! The program imports the target package, reflects on each requested
//! interface through the helper package, and writes the encoded model to
//! standard output. Caller-supplied strings only ever reach the template as
//! validated identifiers or as escaped Go string literals.

use std::fmt::Write as _;

use super::{ExtractionRequest, ReflectError};

/// Go import path of the helper package the program links against.
///
/// The helper lives in `go/reflectwire`. It walks an interface's method set
/// and encodes the model in the format read by [`crate::model::wire::decode`].
/// The module building the program must require (or `replace`) it.
pub const DEFAULT_HELPER_IMPORT: &str = "github.com/mockforge/mockforge-go/reflectwire";

/// Source file name inside the workspace.
pub const PROGRAM_SOURCE: &str = "prog.go";

/// Check that a request can be substituted into the template.
///
/// Symbols may only contain letters, digits and `_`. Whether a symbol is a
/// well-formed Go identifier (no leading digit, not a keyword) is left to the
/// compiler, whose diagnostics are reported verbatim.
pub fn validate(request: &ExtractionRequest) -> Result<(), ReflectError> {
    validate_import_path(&request.import_path)?;

    if request.symbols.is_empty() {
        return Err(ReflectError::InvalidRequest(
            "no interface symbols given".to_string(),
        ));
    }
    for symbol in &request.symbols {
        if symbol.is_empty() {
            return Err(ReflectError::InvalidRequest(
                "empty interface symbol".to_string(),
            ));
        }
        if let Some(c) = symbol.chars().find(|c| !(c.is_alphanumeric() || *c == '_')) {
            return Err(ReflectError::InvalidRequest(format!(
                "symbol `{}` contains invalid character {:?}",
                symbol, c
            )));
        }
    }
    Ok(())
}

/// Check an import path before it is embedded in Go source.
pub fn validate_import_path(path: &str) -> Result<(), ReflectError> {
    if path.is_empty() {
        return Err(ReflectError::InvalidRequest(
            "empty import path".to_string(),
        ));
    }
    if let Some(c) = path
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '\\' | '`'))
    {
        return Err(ReflectError::InvalidRequest(format!(
            "import path `{}` contains invalid character {:?}",
            path.escape_debug(),
            c
        )));
    }
    Ok(())
}

/// Render the program source. The request must already be validated.
pub fn render(request: &ExtractionRequest, helper_import: &str) -> String {
    let import_path = go_quote(&request.import_path);

    let mut entries = String::new();
    for symbol in &request.symbols {
        let _ = writeln!(
            entries,
            "\t\t{{{}, reflect.TypeOf((*pkg_.{})(nil)).Elem()}},",
            go_quote(symbol),
            symbol
        );
    }

    format!(
        r#"// Code generated by mockforge. DO NOT EDIT.

// This program reflects on interface types and writes the encoded model
// to standard output.
package main

import (
	"fmt"
	"os"
	"path"
	"reflect"

	mockwire {helper}

	pkg_ {import_path}
)

func main() {{
	its := []struct {{
		sym string
		typ reflect.Type
	}}{{
{entries}	}}
	pkg := &mockwire.Package{{
		// The reflect package does not expose the package name, so this
		// assumes it matches the last import path element.
		Name: path.Base({import_path}),
	}}

	for _, it := range its {{
		intf, err := mockwire.InterfaceFromInterfaceType(it.typ)
		if err != nil {{
			fmt.Fprintf(os.Stderr, "Reflection: %v\n", err)
			os.Exit(1)
		}}
		intf.Name = it.sym
		pkg.Interfaces = append(pkg.Interfaces, intf)
	}}
	if err := mockwire.Encode(os.Stdout, pkg); err != nil {{
		fmt.Fprintf(os.Stderr, "encode: %v\n", err)
		os.Exit(1)
	}}
}}
"#,
        helper = go_quote(helper_import),
        import_path = import_path,
        entries = entries,
    )
}

/// Quote a string as a Go interpreted string literal.
fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
