use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::OutputFormat;
use crate::pipeline::{
    DocumentView, ExecutionContext, InteractiveView, render_document, render_interactive_text,
};

pub(super) fn print_view(view: &InteractiveView, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", render_interactive_text(view)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(view)
                .context("failed to serialize interactive view")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Renders the document into the context's scratch space, then copies it to `output`.
pub(super) fn write_document(
    ctx: &ExecutionContext,
    document: &DocumentView,
    output: &Path,
) -> Result<()> {
    let file_name = output
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("invalid document output path: {}", output.display()))?;

    let staged = ctx.stage(file_name, &render_document(document))?;
    ctx.hand_over(&staged, output)?;

    info!(
        path = %output.display(),
        sections = document.sections.len(),
        "wrote report document"
    );
    Ok(())
}
