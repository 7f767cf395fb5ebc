use std::fs;

use anyhow::{Context, Result};
use tracing::warn;

use super::output::{print_view, write_document};
use super::params::load_parameters;
use crate::cli::ParseArgs;
use crate::pipeline::{
    ExecutionContext, HeuristicParser, RenderPolicy, structure_in_context, validate_parameters,
};

pub fn run(args: ParseArgs) -> Result<()> {
    let params = load_parameters(&args.params)?;
    let ctx = ExecutionContext::new()?;

    let violations = validate_parameters(&params);
    if !violations.is_empty() {
        let _entered = ctx.span().enter();
        warn!(
            violations = violations.len(),
            "soil parameters are inconsistent; structuring anyway"
        );
    }

    let raw = fs::read_to_string(&args.response_file)
        .with_context(|| format!("failed to read {}", args.response_file.display()))?;

    let parser = HeuristicParser::new()?;
    let structured = structure_in_context(
        &ctx,
        &raw,
        &params,
        &parser,
        &RenderPolicy::default(),
    );

    print_view(&structured.interactive, args.format)?;

    if let Some(output) = &args.output {
        write_document(&ctx, &structured.document, output)?;
    }
    Ok(())
}
