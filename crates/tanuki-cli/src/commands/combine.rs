// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use anyhow::{bail, Context, Result};
use tanuki_combine::{combine, CombineConfig};
use tanuki_similar::SimilaritySource;

use crate::cli::CombineArgs;

/// Builds the run configuration from `--config` and the flags.
fn config(args: CombineArgs) -> Result<CombineConfig> {
    let mut config = match &args.config {
        Some(path) => CombineConfig::load(path)?,
        None => {
            let (Some(input), Some(output)) = (&args.input, &args.output) else {
                bail!("--input and --output are required without --config");
            };
            CombineConfig::new(input, output)
        }
    };
    if let Some(input) = args.input {
        config.input = input;
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if args.overrides.is_some() {
        config.overrides = args.overrides;
    }
    config
        .similarity
        .extend(args.unscored.into_iter().map(SimilaritySource::unscored));
    config
        .similarity
        .extend(args.scored.into_iter().map(SimilaritySource::scored));
    if let Some(threshold) = args.score_threshold {
        config.score_threshold = threshold;
    }
    if args.keep_amalgamation_order {
        config.sort_amalgamations = false;
    }
    Ok(config)
}

pub fn run(args: CombineArgs) -> Result<()> {
    let config = config(args)?;
    combine(&config).with_context(|| {
        format!(
            "failed to combine {} into {}",
            config.input.display(),
            config.output.display()
        )
    })?;
    Ok(())
}
