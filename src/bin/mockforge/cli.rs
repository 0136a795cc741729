//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// mockforge - mock generation for Go interfaces
#[derive(Parser)]
#[command(name = "mockforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a mock file (and optionally matchers)
    Generate(GenerateArgs),

    /// Print the interface model without writing anything
    Model(ModelArgs),
}

/// How the model is obtained; shared by every command.
#[derive(Args)]
pub struct SourceArgs {
    /// A `.go` source file, or an import path and a comma-separated list of
    /// interfaces
    pub args: Vec<String>,

    /// Load packages statically instead of by reflection
    #[arg(long = "use-experimental-model-gen")]
    pub experimental: bool,

    /// Run this prebuilt introspection binary instead of building one
    #[arg(long, value_name = "PATH")]
    pub exec_only: Option<PathBuf>,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory for the mock file
    #[arg(short = 'd', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Mock file path (overrides --output-dir)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Name of the mock type (single interface only)
    #[arg(long)]
    pub mock_name: Option<String>,

    /// Package name of the generated mock
    #[arg(long)]
    pub package: Option<String>,

    /// Import path of the package the mock lives in
    #[arg(long)]
    pub self_package: Option<String>,

    /// Print the parsed model before generating
    #[arg(long)]
    pub debug_parser: bool,

    /// Generate argument matchers
    #[arg(short = 'm', long)]
    pub generate_matchers: bool,

    /// Directory for matcher files (default: `matchers` beside the mock)
    #[arg(long, value_name = "DIR")]
    pub matchers_dir: Option<PathBuf>,

    /// Comma-separated matcher types not to write
    #[arg(long, value_name = "LIST")]
    pub skip_matchers: Option<String>,

    /// Only emit the reflection program (to --output, or stdout)
    #[arg(long)]
    pub prog_only: bool,
}

#[derive(Args)]
pub struct ModelArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}
