use chrono::NaiveDate;
use tracing::info;

use super::assemble::{
    DocumentView, InteractiveView, RenderPolicy, assemble_document, assemble_interactive,
};
use super::context::ExecutionContext;
use super::prompt::{build_prompt, derive_search_queries};
use super::references::resolve_references;
use super::response::ResponseParser;
use super::validate::validate_parameters;
use crate::corpus::KnowledgeCorpus;
use crate::error::PipelineError;
use crate::model::{ParameterSet, ParsedReport};
use crate::reasoning::{CREDENTIAL_ENV, ReasoningClient, SYSTEM_PROMPT};
use crate::search::SearchProvider;
use crate::util::sha256_text;

pub struct Collaborators<'a> {
    pub search: Option<&'a dyn SearchProvider>,
    pub reasoning: &'a dyn ReasoningClient,
    pub parser: &'a dyn ResponseParser,
}

#[derive(Debug, Clone)]
pub struct StructuredReport {
    pub report: ParsedReport,
    pub interactive: InteractiveView,
    pub document: DocumentView,
}

#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub prompt: String,
    pub raw_response: String,
    pub structured: StructuredReport,
}

pub fn require_credential(api_key: Option<&str>) -> Result<&str, PipelineError> {
    api_key
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or(PipelineError::MissingCredential(CREDENTIAL_ENV))
}

pub fn ensure_valid(params: &ParameterSet) -> Result<(), PipelineError> {
    let violations = validate_parameters(params);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::Validation(violations))
    }
}

/// Validation, reference resolution and prompt assembly. Validation runs before any
/// search call is issued.
pub fn prepare_prompt(
    params: &ParameterSet,
    notes: &str,
    corpus: &KnowledgeCorpus,
    search: Option<&dyn SearchProvider>,
) -> Result<String, PipelineError> {
    ensure_valid(params)?;

    let references = match search {
        Some(provider) => resolve_references(provider, &derive_search_queries(params)),
        None => Vec::new(),
    };

    Ok(build_prompt(params, notes, corpus, &references))
}

pub fn structure_response(
    raw: &str,
    params: &ParameterSet,
    parser: &dyn ResponseParser,
    policy: &RenderPolicy,
    date: NaiveDate,
) -> StructuredReport {
    let report = parser.parse(raw);
    info!(
        rejected = report.is_rejected(),
        norms = report.norms.len(),
        references = report.references.len(),
        "response structured"
    );

    StructuredReport {
        interactive: assemble_interactive(&report, policy),
        document: assemble_document(&report, params, policy, date),
        report,
    }
}

/// [`prepare_prompt`] inside the context's `report` span.
pub fn compose_prompt(
    ctx: &ExecutionContext,
    params: &ParameterSet,
    notes: &str,
    corpus: &KnowledgeCorpus,
    search: Option<&dyn SearchProvider>,
) -> Result<String, PipelineError> {
    let _entered = ctx.span().enter();

    let prompt = prepare_prompt(params, notes, corpus, search)?;
    info!(
        prompt_chars = prompt.chars().count(),
        prompt_sha256 = %sha256_text(&prompt),
        "instruction document assembled"
    );
    Ok(prompt)
}

/// [`structure_response`] inside the context's `report` span, dated by the context.
pub fn structure_in_context(
    ctx: &ExecutionContext,
    raw: &str,
    params: &ParameterSet,
    parser: &dyn ResponseParser,
    policy: &RenderPolicy,
) -> StructuredReport {
    let _entered = ctx.span().enter();
    structure_response(raw, params, parser, policy, ctx.report_date())
}

pub fn generate_report(
    ctx: &ExecutionContext,
    params: &ParameterSet,
    notes: &str,
    corpus: &KnowledgeCorpus,
    collaborators: &Collaborators<'_>,
    policy: &RenderPolicy,
) -> Result<ReportOutcome, PipelineError> {
    let prompt = compose_prompt(ctx, params, notes, corpus, collaborators.search)?;

    let raw_response = {
        let _entered = ctx.span().enter();
        collaborators.reasoning.complete(SYSTEM_PROMPT, &prompt)?
    };

    let structured = structure_in_context(
        ctx,
        &raw_response,
        params,
        collaborators.parser,
        policy,
    );

    Ok(ReportOutcome {
        prompt,
        raw_response,
        structured,
    })
}
