//! Mock and matcher source generation.
//!
//! A [`CodeGenerator`] turns a [`Package`] into the text of one mock file
//! plus one matcher file per distinct argument type.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::model::Package;

mod imports;
pub mod matchers;
mod mock;

pub use imports::ImportTable;
pub use mock::GoMockGenerator;

/// Naming options for generated code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Name of the mock type (only honoured when mocking a single interface)
    pub mock_name: Option<String>,

    /// Package clause of the mock file (default `mock_<package>`)
    pub package: Option<String>,

    /// Import path of the package the mock is generated into; its types are
    /// referenced unqualified
    pub self_package: Option<String>,
}

/// Output of one generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedSource {
    /// The mock file
    pub mock: Vec<u8>,

    /// Matcher type name -> matcher file, one per distinct argument type
    pub matchers: BTreeMap<String, Vec<u8>>,
}

/// Renders mock and matcher source for a model.
pub trait CodeGenerator {
    /// Generate sources for every interface in `pkg`.
    ///
    /// `source` describes where the model came from and is embedded in the
    /// generated header.
    fn generate(
        &self,
        pkg: &Package,
        source: &str,
        opts: &GeneratorOptions,
    ) -> Result<GeneratedSource>;
}

/// Header written at the top of every generated file.
pub(crate) fn header(source: &str) -> String {
    format!(
        "// Code generated by mockforge. DO NOT EDIT.\n// Source: {}\n",
        source
    )
}
