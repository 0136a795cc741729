//! `mockforge generate` command

use anyhow::Result;

use crate::cli::GenerateArgs;
use mockforge::codegen::{GeneratorOptions, GoMockGenerator};
use mockforge::ops::{generate, Collaborators, GenerateOptions, GenerateOutcome, Mode};
use mockforge::sources::{GoListLoader, GoSourceParser};
use mockforge::util::{GlobalContext, MatcherExclusions};

pub fn execute(args: GenerateArgs) -> Result<()> {
    // Usage errors come before any config or filesystem access
    Mode::from_args(&args.source.args)?;

    let ctx = GlobalContext::new()?;

    // Load configuration (global + project); flags override it
    let config = ctx.load_config();

    let skip = args
        .skip_matchers
        .as_deref()
        .or(config.matchers.skip.as_deref())
        .map(MatcherExclusions::parse)
        .unwrap_or_default();

    let opts = GenerateOptions {
        output_dir: args
            .output_dir
            .or(config.output.dir.clone())
            .unwrap_or_else(|| ctx.cwd().to_path_buf()),
        output: args.output,
        generator: GeneratorOptions {
            mock_name: args.mock_name,
            package: args.package.or(config.output.package.clone()),
            self_package: args.self_package.or(config.output.self_package.clone()),
        },
        debug_parser: args.debug_parser,
        use_experimental_loader: args.source.experimental || config.loader.experimental,
        generate_matchers: args.generate_matchers || config.matchers.generate,
        matchers_dir: args.matchers_dir.or(config.matchers.destination.clone()),
        skip_matchers: skip,
        exec_only: args.source.exec_only,
        prog_only: args.prog_only,
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
    match generate(&args.source.args, &opts, &collab, &mut out)? {
        GenerateOutcome::Written {
            layout,
            matchers_written,
        } => {
            eprintln!("   Generated {}", layout.mock_path.display());
            if let Some(dir) = layout.matchers_dir {
                eprintln!(
                    "   Generated {} matcher(s) in {}",
                    matchers_written.len(),
                    dir.display()
                );
            }
        }
        GenerateOutcome::ProgramEmitted => {
            tracing::debug!("reflection program emitted; nothing else to do");
        }
    }

    Ok(())
}
