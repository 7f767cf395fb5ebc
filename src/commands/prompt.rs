use anyhow::Result;

use super::build_search;
use super::params::load_parameters;
use crate::cli::PromptArgs;
use crate::corpus::KnowledgeCorpus;
use crate::pipeline::{ExecutionContext, compose_prompt};
use crate::search::SearchProvider;

pub fn run(args: PromptArgs) -> Result<()> {
    let params = load_parameters(&args.params)?;
    let corpus = KnowledgeCorpus::load(&args.corpus.normatives_dir, &args.corpus.articles_dir);
    let search = build_search(&args.search)?;

    let ctx = ExecutionContext::new()?;
    let prompt = compose_prompt(
        &ctx,
        &params,
        &args.notes,
        &corpus,
        search
            .as_ref()
            .map(|provider| provider as &dyn SearchProvider),
    )?;

    println!("{prompt}");
    Ok(())
}
