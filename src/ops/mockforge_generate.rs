//! Implementation of `mockforge generate`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::codegen::{CodeGenerator, GeneratedSource, GeneratorOptions};
use crate::model::Package;
use crate::ops::layout::{Mode, OutputLayout};
use crate::reflect::{Extraction, ExtractionRequest, ModelExtractor, ReflectOptions};
use crate::sources::{PackageLoader, SourceParser};
use crate::util::config::MatcherExclusions;
use crate::util::fs::{ensure_dir, write_bytes};

/// Options for the generate command.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Directory for the mock file when no explicit output is given
    pub output_dir: PathBuf,

    /// Explicit mock file path (also the program-only destination)
    pub output: Option<PathBuf>,

    /// Naming passed through to the code generator
    pub generator: GeneratorOptions,

    /// Print the model before generating
    pub debug_parser: bool,

    /// Load packages statically instead of by reflection
    pub use_experimental_loader: bool,

    /// Write matcher files
    pub generate_matchers: bool,

    /// Matchers directory override
    pub matchers_dir: Option<PathBuf>,

    /// Matcher types not to write
    pub skip_matchers: MatcherExclusions,

    /// Run this introspection binary instead of building one
    pub exec_only: Option<PathBuf>,

    /// Only emit the introspection program
    pub prog_only: bool,
}

impl GenerateOptions {
    fn output_override(&self) -> Option<&Path> {
        self.output
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// Pluggable pieces of the pipeline.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub parser: &'a dyn SourceParser,
    pub loader: &'a dyn PackageLoader,
    pub extractor: &'a ModelExtractor,
    pub generator: &'a dyn CodeGenerator,
}

/// A model, or the notice that only the reflection program was emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedModel {
    Model(Package),
    ProgramEmitted,
}

/// What a generate call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// The mock file, and any matcher files, were written
    Written {
        layout: OutputLayout,
        matchers_written: Vec<PathBuf>,
    },

    /// Program-only mode: the reflection program was emitted, nothing else
    ProgramEmitted,
}

/// Acquire the model for `mode`.
///
/// Program-only output goes to the explicit output path if set, else `out`.
pub fn load_model(
    mode: &Mode,
    opts: &GenerateOptions,
    collab: &Collaborators<'_>,
    out: &mut dyn Write,
) -> Result<LoadedModel> {
    match mode {
        Mode::Source(path) => {
            if opts.prog_only || opts.exec_only.is_some() {
                tracing::warn!("reflection options are ignored in source mode");
            }
            tracing::debug!("parsing {}", path.display());
            let pkg = collab.parser.parse_file(path)?;
            Ok(LoadedModel::Model(pkg))
        }
        Mode::Package {
            import_path,
            symbols,
            ..
        } if opts.use_experimental_loader => {
            tracing::debug!("loading {} statically", import_path);
            let pkg = collab.loader.load(import_path, symbols)?;
            Ok(LoadedModel::Model(pkg))
        }
        Mode::Package {
            import_path,
            symbols,
            ..
        } => {
            let request = ExtractionRequest::new(import_path.clone(), symbols.iter().cloned());
            let program_out = opts.output_override().filter(|_| opts.prog_only);
            if let Some(parent) = program_out.and_then(Path::parent) {
                ensure_dir(parent)?;
            }
            let reflect_opts = ReflectOptions {
                prebuilt: opts.exec_only.as_deref(),
                program_only: opts.prog_only,
                output_path: program_out,
            };
            match collab.extractor.extract(&request, &reflect_opts, out)? {
                Extraction::Model(pkg) => Ok(LoadedModel::Model(pkg)),
                Extraction::ProgramEmitted => Ok(LoadedModel::ProgramEmitted),
            }
        }
    }
}

/// Generate a mock (and optionally matchers) for `args`.
///
/// `args` are either a single `.go` file or an import path followed by a
/// comma-separated list of interfaces. Argument errors are reported before
/// anything is read or written.
pub fn generate(
    args: &[String],
    opts: &GenerateOptions,
    collab: &Collaborators<'_>,
    out: &mut dyn Write,
) -> Result<GenerateOutcome> {
    let mode = Mode::from_args(args)?;

    let loaded = load_model(&mode, opts, collab, out).context("loading input failed")?;
    let pkg = match loaded {
        LoadedModel::Model(pkg) => pkg,
        LoadedModel::ProgramEmitted => return Ok(GenerateOutcome::ProgramEmitted),
    };

    if opts.debug_parser {
        pkg.print(out).context("failed to print model")?;
    }

    let layout = OutputLayout::resolve(
        &mode,
        &opts.output_dir,
        opts.output_override(),
        opts.generate_matchers,
        opts.matchers_dir.as_deref(),
    );

    let generated = collab
        .generator
        .generate(&pkg, &mode.provenance(), &opts.generator)?;

    let matchers_written = write_outputs(&layout, &generated, &opts.skip_matchers)?;
    Ok(GenerateOutcome::Written {
        layout,
        matchers_written,
    })
}

/// Write the mock file and the non-excluded matcher files.
fn write_outputs(
    layout: &OutputLayout,
    generated: &GeneratedSource,
    skip: &MatcherExclusions,
) -> Result<Vec<PathBuf>> {
    if let Some(parent) = layout.mock_path.parent() {
        ensure_dir(parent)?;
    }
    write_bytes(&layout.mock_path, &generated.mock)?;
    tracing::info!("wrote {}", layout.mock_path.display());

    let mut written = Vec::new();
    if let Some(ref dir) = layout.matchers_dir {
        ensure_dir(dir)?;
        for (name, path) in layout.matcher_paths(generated.matchers.keys().map(String::as_str), skip) {
            write_bytes(&path, &generated.matchers[name])?;
            tracing::debug!("wrote matcher {}", path.display());
            written.push(path);
        }
        let skipped = generated.matchers.len() - written.len();
        tracing::info!(
            "wrote {} matcher(s) to {} ({} skipped)",
            written.len(),
            dir.display(),
            skipped
        );
    }
    Ok(written)
}
