use anyhow::{Result, bail};
use tracing::info;

use super::params::load_parameters;
use crate::cli::ValidateArgs;
use crate::pipeline::validate_parameters;

pub fn run(args: ValidateArgs) -> Result<()> {
    let params = load_parameters(&args.params)?;
    let violations = validate_parameters(&params);

    if violations.is_empty() {
        info!(soil_type = params.soil_type.label(), "soil parameters valid");
        println!("valid");
        return Ok(());
    }

    for violation in &violations {
        println!("- {violation}");
    }
    bail!("{} parameter violation(s) found", violations.len());
}
