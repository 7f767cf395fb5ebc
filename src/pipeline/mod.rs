mod assemble;
mod context;
mod prompt;
mod references;
mod render;
mod response;
mod run;
mod validate;

pub use assemble::{DocumentView, InteractiveView, RenderPolicy};
pub use context::ExecutionContext;
pub use render::{render_document, render_interactive_text};
pub use response::HeuristicParser;
pub use run::{
    Collaborators, compose_prompt, generate_report, require_credential, structure_in_context,
};
pub use validate::validate_parameters;
