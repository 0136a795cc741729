//! Model and source fixtures shared by unit tests.

use crate::model::{Interface, Method, Package, Parameter, Type};

/// `io`-style `Reader` interface.
pub fn reader_interface() -> Interface {
    Interface::new("Reader").with_method(
        Method::new("Read")
            .with_param(Parameter::new("p", Type::slice(Type::predeclared("byte"))))
            .with_result(Parameter::new("n", Type::predeclared("int")))
            .with_result(Parameter::new("err", Type::predeclared("error"))),
    )
}

/// `io`-style `Writer` interface.
pub fn writer_interface() -> Interface {
    Interface::new("Writer").with_method(
        Method::new("Write")
            .with_param(Parameter::new("p", Type::slice(Type::predeclared("byte"))))
            .with_result(Parameter::new("n", Type::predeclared("int")))
            .with_result(Parameter::new("err", Type::predeclared("error"))),
    )
}

/// Package `pkg` with `Reader` and `Writer`, in that order.
pub fn reader_writer_package() -> Package {
    Package::new("pkg")
        .with_interface(reader_interface())
        .with_interface(writer_interface())
}

/// A package whose methods reference foreign packages and composite types.
pub fn service_package() -> Package {
    Package::new("svc").with_interface(
        Interface::new("Service")
            .with_method(
                Method::new("Handle")
                    .with_param(Parameter::new("ctx", Type::named("context", "Context")))
                    .with_param(Parameter::new(
                        "req",
                        Type::pointer(Type::named("net/http", "Request")),
                    ))
                    .with_result(Parameter::unnamed(Type::predeclared("error"))),
            )
            .with_method(
                Method::new("Lookup")
                    .with_param(Parameter::new(
                        "keys",
                        Type::map(Type::predeclared("string"), Type::predeclared("int")),
                    ))
                    .with_variadic(Parameter::new("opts", Type::predeclared("string")))
                    .with_result(Parameter::unnamed(Type::slice(Type::predeclared("byte")))),
            ),
    )
}

/// Go source declaring `Reader` and `Writer` plus an unrelated struct.
pub const READER_WRITER_SOURCE: &str = r#"
package pkg

import (
	"context"
	nethttp "net/http"
)

// Reader reads.
type Reader interface {
	Read(p []byte) (n int, err error)
}

type notAnInterface struct {
	x int
}

/* Writer writes. */
type Writer interface {
	Write(p []byte) (n int, err error)
	Flush(ctx context.Context, req *nethttp.Request, opts ...string) error
}
"#;
