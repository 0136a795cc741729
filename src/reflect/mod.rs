//! Model extraction by reflection.
//!
//! Go exposes method sets at runtime but not to an outside process, so the
//! extractor writes a small Go program that imports the target package,
//! builds it with the host toolchain, runs it, and decodes the model the
//! program prints:
//!
//! ```text
//! render prog.go -> go build -o prog.bin prog.go -> ./prog.bin -> decode stdout
//! ```
//!
//! The program and binary live in a [`Workspace`] that is removed when the
//! extraction returns, whether it succeeded or not.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{wire, Package};
use crate::toolchain::{program_binary_name, GoToolchain};
use crate::util::process::ProcessBuilder;

pub mod program;

pub use program::DEFAULT_HELPER_IMPORT;

/// Prefix of every reflection workspace directory.
pub const WORKSPACE_PREFIX: &str = ".tmp_mockforge_reflect_";

/// Error during reflection.
#[derive(Debug, Error)]
pub enum ReflectError {
    #[error("invalid reflection request: {0}")]
    InvalidRequest(String),

    #[error("failed to prepare reflection workspace: {0}")]
    Workspace(#[source] io::Error),

    #[error("{0:#}")]
    Toolchain(anyhow::Error),

    /// The program failed to compile. `status` is the process error and
    /// `stderr` the compiler's full diagnostic output.
    #[error("{status} caused by:\n{stderr}")]
    Build { status: String, stderr: String },

    #[error("{0}")]
    Spawn(#[source] io::Error),

    #[error("{0}")]
    Exited(ExitStatus),

    #[error("{0}")]
    Decode(#[from] bincode::Error),

    #[error("failed to emit reflection program: {0}")]
    Emit(#[source] io::Error),
}

/// Interfaces to extract from one importable package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub import_path: String,

    /// Interface names; their order is the order of the resulting interfaces
    pub symbols: Vec<String>,
}

impl ExtractionRequest {
    pub fn new<I, S>(import_path: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExtractionRequest {
            import_path: import_path.into(),
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }
}

/// Per-call routing options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflectOptions<'a> {
    /// Run this introspection binary instead of building one
    pub prebuilt: Option<&'a Path>,

    /// Emit the program source instead of building and running it
    pub program_only: bool,

    /// Where program-only output goes (the output stream when `None`)
    pub output_path: Option<&'a Path>,
}

/// Result of a reflection call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The decoded model
    Model(Package),

    /// Program-only mode: the source was emitted and nothing else ran.
    /// Callers should stop processing.
    ProgramEmitted,
}

/// An ephemeral, uniquely named build directory.
///
/// The directory and everything in it is deleted when this value drops.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh workspace under `root`.
    pub fn create(root: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(root)?;
        debug!("created reflection workspace {}", dir.path().display());
        Ok(Workspace { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Extracts a [`Package`] by building and running an introspection program.
#[derive(Debug, Clone)]
pub struct ModelExtractor {
    go: Option<PathBuf>,
    helper_import: String,
    workspace_root: Option<PathBuf>,
}

impl Default for ModelExtractor {
    fn default() -> Self {
        ModelExtractor {
            go: None,
            helper_import: DEFAULT_HELPER_IMPORT.to_string(),
            workspace_root: None,
        }
    }
}

impl ModelExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific `go` executable instead of detecting one.
    pub fn with_go(mut self, go: Option<PathBuf>) -> Self {
        self.go = go;
        self
    }

    /// Import path of the Go helper package.
    pub fn with_helper_import(mut self, helper_import: impl Into<String>) -> Self {
        self.helper_import = helper_import.into();
        self
    }

    /// Directory in which workspaces are created (default: the current directory).
    ///
    /// The program is built with the workspace as its working directory, so
    /// this must lie inside a Go module that can resolve the target package.
    pub fn with_workspace_root(mut self, root: Option<PathBuf>) -> Self {
        self.workspace_root = root;
        self
    }

    /// Extract the requested interfaces.
    ///
    /// In program-only mode the rendered source is written to
    /// `opts.output_path`, or to `out` when no path is given, and
    /// [`Extraction::ProgramEmitted`] is returned without building anything.
    pub fn extract(
        &self,
        request: &ExtractionRequest,
        opts: &ReflectOptions<'_>,
        out: &mut dyn Write,
    ) -> Result<Extraction, ReflectError> {
        // Held until return so the build directory outlives the run.
        let _workspace: Option<Workspace>;

        let program = match opts.prebuilt {
            Some(path) => {
                _workspace = None;
                path.to_path_buf()
            }
            None => {
                program::validate(request)?;
                program::validate_import_path(&self.helper_import)?;
                let source = program::render(request, &self.helper_import);

                if opts.program_only {
                    emit_program(&source, opts.output_path, out)?;
                    return Ok(Extraction::ProgramEmitted);
                }

                let workspace = self.create_workspace()?;
                let binary = self.build(&workspace, &source)?;
                _workspace = Some(workspace);
                binary
            }
        };

        let stdout = run(&program)?;
        let pkg = wire::decode(&stdout)?;
        info!(
            "reflected {} interface(s) from package `{}`",
            pkg.interfaces.len(),
            pkg.name
        );
        Ok(Extraction::Model(pkg))
    }

    fn create_workspace(&self) -> Result<Workspace, ReflectError> {
        let root = match self.workspace_root {
            Some(ref root) => root.clone(),
            None => std::env::current_dir().map_err(ReflectError::Workspace)?,
        };
        Workspace::create(&root).map_err(ReflectError::Workspace)
    }

    /// Write the program into the workspace and compile it.
    fn build(&self, workspace: &Workspace, source: &str) -> Result<PathBuf, ReflectError> {
        std::fs::write(workspace.path().join(program::PROGRAM_SOURCE), source)
            .map_err(ReflectError::Workspace)?;

        let toolchain = GoToolchain::detect(self.go.as_deref()).map_err(ReflectError::Toolchain)?;
        debug!("building reflection program with {}", toolchain.program().display());
        let binary = program_binary_name();
        let cmd = toolchain.build(workspace.path(), &binary, program::PROGRAM_SOURCE);

        match cmd.exec() {
            Ok(output) if output.status.success() => {
                debug!("built {}", binary);
                Ok(workspace.path().join(binary))
            }
            Ok(output) => Err(ReflectError::Build {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }),
            Err(e) => Err(ReflectError::Build {
                status: e.to_string(),
                stderr: String::new(),
            }),
        }
    }
}

fn emit_program(source: &str, path: Option<&Path>, out: &mut dyn Write) -> Result<(), ReflectError> {
    match path {
        Some(path) => {
            std::fs::write(path, source).map_err(ReflectError::Emit)?;
            info!("wrote reflection program to {}", path.display());
        }
        None => {
            out.write_all(source.as_bytes()).map_err(ReflectError::Emit)?;
            out.flush().map_err(ReflectError::Emit)?;
        }
    }
    Ok(())
}

/// Run the introspection program and return its standard output.
fn run(program: &Path) -> Result<Vec<u8>, ReflectError> {
    let output = ProcessBuilder::new(program)
        .inherit_stderr()
        .exec()
        .map_err(ReflectError::Spawn)?;
    if !output.status.success() {
        return Err(ReflectError::Exited(output.status));
    }
    Ok(output.stdout)
}
