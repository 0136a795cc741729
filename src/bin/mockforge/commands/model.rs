//! `mockforge model` command

use std::io::Write;

use anyhow::{Context, Result};

use crate::cli::ModelArgs;
use mockforge::codegen::GoMockGenerator;
use mockforge::ops::{load_model, Collaborators, GenerateOptions, LoadedModel, Mode};
use mockforge::sources::{GoListLoader, GoSourceParser};
use mockforge::util::GlobalContext;

pub fn execute(args: ModelArgs) -> Result<()> {
    let mode = Mode::from_args(&args.source.args)?;

    let ctx = GlobalContext::new()?;
    let config = ctx.load_config();
    let opts = GenerateOptions {
        use_experimental_loader: args.source.experimental || config.loader.experimental,
        exec_only: args.source.exec_only,
        ..Default::default()
    };

    let parser = GoSourceParser::new();
    let loader = GoListLoader::new(config.reflect.go.clone());
    let extractor = super::extractor(&config);
    let collab = Collaborators {
        parser: &parser,
        loader: &loader,
        extractor: &extractor,
        generator: &GoMockGenerator::new(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let loaded = load_model(&mode, &opts, &collab, &mut out).context("loading input failed")?;
    if let LoadedModel::Model(pkg) = loaded {
        pkg.print(&mut out).context("failed to print model")?;
        out.flush()?;
    }

    Ok(())
}
