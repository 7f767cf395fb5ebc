use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ParameterArgs;
use crate::model::ParameterSet;

/// Builds the parameter set from `--params-file` or from the individual flags.
pub(super) fn load_parameters(args: &ParameterArgs) -> Result<ParameterSet> {
    let mut params = match &args.params_file {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let params = serde_json::from_str::<ParameterSet>(&raw)
                .with_context(|| format!("failed to parse soil parameters: {}", path.display()))?;
            info!(path = %path.display(), "loaded soil parameters");
            params
        }
        None => ParameterSet::new(
            args.soil_type.context("--soil-type is required")?,
            args.water_table_depth
                .context("--water-table-depth is required")?,
            args.load_pressure.context("--load-pressure is required")?,
        ),
    };

    apply_overrides(&mut params, args);
    Ok(params)
}

fn apply_overrides(params: &mut ParameterSet, args: &ParameterArgs) {
    let overrides = [
        (&mut params.desired_strength_kpa, args.desired_strength),
        (&mut params.gravel_pct, args.gravel),
        (&mut params.sand_pct, args.sand),
        (&mut params.silt_pct, args.silt),
        (&mut params.clay_pct, args.clay),
        (&mut params.liquid_limit, args.liquid_limit),
        (&mut params.plastic_limit, args.plastic_limit),
        (&mut params.plasticity_index, args.plasticity_index),
        (&mut params.moisture_content_pct, args.moisture),
        (&mut params.ph, args.ph),
        (&mut params.cbr_pct, args.cbr),
    ];
    for (slot, value) in overrides {
        if value.is_some() {
            *slot = value;
        }
    }

    if args.swelling_potential.is_some() {
        params.swelling_potential = args.swelling_potential;
    }
}
