//! mockforge - mock generation for Go interfaces
//!
//! This crate provides the core library functionality for mockforge:
//! building an interface model (from a source file, a static package load,
//! or by reflection through a generated Go program), rendering mocks and
//! argument matchers, and writing them out.

pub mod codegen;
pub mod model;
pub mod ops;
pub mod reflect;
pub mod sources;
pub mod toolchain;
pub mod util;

/// Test utilities for mockforge unit tests.
///
/// Fake `go` toolchains, fake introspection binaries and model fixtures.
#[cfg(test)]
pub mod test_support;

pub use codegen::{CodeGenerator, GeneratorOptions, GoMockGenerator};
pub use model::{Interface, Method, Package, Parameter, Type};
pub use reflect::{Extraction, ExtractionRequest, ModelExtractor, ReflectError};
pub use util::context::GlobalContext;
