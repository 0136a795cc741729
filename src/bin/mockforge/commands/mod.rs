//! Command implementations

pub mod generate;
pub mod model;

use mockforge::reflect::ModelExtractor;
use mockforge::util::Config;

/// Reflection settings from configuration.
pub fn extractor(config: &Config) -> ModelExtractor {
    let mut extractor = ModelExtractor::new()
        .with_go(config.reflect.go.clone())
        .with_workspace_root(config.reflect.workspace_root.clone());
    if let Some(ref helper) = config.reflect.helper_import {
        extractor = extractor.with_helper_import(helper.clone());
    }
    extractor
}
