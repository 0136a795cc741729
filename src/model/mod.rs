//! Canonical interface model.
//!
//! A [`Package`] describes the method sets of one or more Go interfaces,
//! independent of whether it was parsed from source, loaded statically, or
//! produced by the reflection program. Every model source yields the same
//! shape, so the code generator never needs to know where it came from.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

mod types;
pub mod wire;

pub use types::{ChanDir, FuncType, Type};

/// A package containing the interfaces to mock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Go package name (not the import path)
    pub name: String,

    /// Interfaces in request order
    pub interfaces: Vec<Interface>,
}

impl Package {
    /// Create an empty package.
    pub fn new(name: impl Into<String>) -> Self {
        Package {
            name: name.into(),
            interfaces: Vec::new(),
        }
    }

    /// Append an interface.
    pub fn with_interface(mut self, interface: Interface) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Look up an interface by name.
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Names of all interfaces, in order.
    pub fn interface_names(&self) -> Vec<&str> {
        self.interfaces.iter().map(|i| i.name.as_str()).collect()
    }

    /// Import paths referenced by any method signature, sorted and deduplicated.
    pub fn imports(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for interface in &self.interfaces {
            for method in &interface.methods {
                method.collect_imports(&mut paths);
            }
        }
        paths.sort();
        paths.dedup();
        paths
    }

    /// Write a human-readable dump of the model.
    pub fn print(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "package {}", self.name)?;
        for interface in &self.interfaces {
            writeln!(w, "interface {}", interface.name)?;
            for method in &interface.methods {
                writeln!(w, "  - method {}", method.name)?;
                if !method.params.is_empty() {
                    writeln!(w, "    in:")?;
                    for p in &method.params {
                        writeln!(w, "      - {}", p)?;
                    }
                }
                if let Some(ref v) = method.variadic {
                    writeln!(w, "    ...:")?;
                    writeln!(w, "      - {}", v)?;
                }
                if !method.results.is_empty() {
                    writeln!(w, "    out:")?;
                    for r in &method.results {
                        writeln!(w, "      - {}", r)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// A single interface and its method set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    pub methods: Vec<Method>,
}

impl Interface {
    /// Create an interface with no methods.
    pub fn new(name: impl Into<String>) -> Self {
        Interface {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Append a method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }
}

/// A method signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,

    /// Fixed parameters
    pub params: Vec<Parameter>,

    /// Results (possibly named)
    pub results: Vec<Parameter>,

    /// Trailing `...T` parameter; `ty` holds the element type
    pub variadic: Option<Parameter>,
}

impl Method {
    /// Create a method with no parameters or results.
    pub fn new(name: impl Into<String>) -> Self {
        Method {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Add a result.
    pub fn with_result(mut self, result: Parameter) -> Self {
        self.results.push(result);
        self
    }

    /// Set the variadic parameter.
    pub fn with_variadic(mut self, param: Parameter) -> Self {
        self.variadic = Some(param);
        self
    }

    fn collect_imports(&self, out: &mut Vec<String>) {
        let all = self
            .params
            .iter()
            .chain(self.results.iter())
            .chain(self.variadic.iter());
        for p in all {
            p.ty.collect_imports(out);
        }
    }
}

/// A named or unnamed parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name (empty for unnamed parameters)
    pub name: String,
    pub ty: Type,
}

impl Parameter {
    /// Create a parameter.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Parameter {
            name: name.into(),
            ty,
        }
    }

    /// Create an unnamed parameter.
    pub fn unnamed(ty: Type) -> Self {
        Parameter::new("", ty)
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.ty)
        } else {
            write!(f, "{} {}", self.name, self.ty)
        }
    }
}
