use std::time::Duration;

use anyhow::Result;
use tracing::info;

use super::build_search;
use super::output::{print_view, write_document};
use super::params::load_parameters;
use crate::cli::ReportArgs;
use crate::corpus::KnowledgeCorpus;
use crate::pipeline::{
    Collaborators, ExecutionContext, HeuristicParser, RenderPolicy, generate_report,
    require_credential,
};
use crate::reasoning::{ChatCompletionsClient, ChatCompletionsConfig};
use crate::search::SearchProvider;

pub fn run(args: ReportArgs) -> Result<()> {
    let api_key = require_credential(args.reasoning.api_key.as_deref())?.to_string();
    let params = load_parameters(&args.params)?;
    let corpus = KnowledgeCorpus::load(&args.corpus.normatives_dir, &args.corpus.articles_dir);

    let search = build_search(&args.search)?;
    let reasoning = ChatCompletionsClient::new(ChatCompletionsConfig {
        api_base: args.reasoning.api_base.clone(),
        api_key,
        model: args.reasoning.model.clone(),
        timeout: Duration::from_secs(args.reasoning.reasoning_timeout_secs),
    })?;
    let parser = HeuristicParser::new()?;
    let collaborators = Collaborators {
        search: search
            .as_ref()
            .map(|provider| provider as &dyn SearchProvider),
        reasoning: &reasoning,
        parser: &parser,
    };

    let ctx = ExecutionContext::new()?;
    info!(
        run_id = ctx.run_id(),
        soil_type = params.soil_type.label(),
        model = %args.reasoning.model,
        "report started"
    );

    let policy = RenderPolicy::default();
    let outcome = generate_report(&ctx, &params, &args.notes, &corpus, &collaborators, &policy)?;

    if args.show_prompt {
        println!("{}\n", outcome.prompt);
    }
    if args.show_raw {
        println!("{}\n", outcome.raw_response);
    }

    print_view(&outcome.structured.interactive, args.format)?;
    write_document(&ctx, &outcome.structured.document, &args.output)?;

    info!(
        run_id = ctx.run_id(),
        rejected = outcome.structured.report.is_rejected(),
        "report completed"
    );
    Ok(())
}
