//! High-level operations.
//!
//! This module contains the implementation of mockforge commands.

pub mod layout;
pub mod mockforge_generate;

pub use layout::{output_file_path, Mode, OutputLayout, UsageError};
pub use mockforge_generate::{
    generate, load_model, Collaborators, GenerateOptions, GenerateOutcome, LoadedModel,
};
