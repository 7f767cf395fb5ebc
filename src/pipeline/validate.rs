use crate::model::{Attribute, ParameterSet};

const TOLERANCE: f64 = 1e-6;

/// Checks every invariant that the present attributes make checkable.
/// Returns the ordered violation list; an empty list means the set is valid.
pub fn validate_parameters(params: &ParameterSet) -> Vec<String> {
    let mut violations = Vec::new();

    for attribute in Attribute::ALL {
        if let Some(value) = params.numeric_value(attribute) {
            if !value.is_finite() {
                violations.push(format!(
                    "{} debe ser un número finito",
                    attribute.label()
                ));
            }
        }
    }

    if let (Some(liquid), Some(plastic)) = (params.liquid_limit, params.plastic_limit) {
        if liquid < plastic {
            violations.push(
                "El límite líquido (LL) no puede ser menor que el límite plástico (LP)".to_string(),
            );
        }

        if let Some(index) = params.plasticity_index {
            if (index - (liquid - plastic)).abs() > TOLERANCE {
                violations.push(format!(
                    "El índice de plasticidad (IP = {index}) debe ser igual a LL - LP ({})",
                    liquid - plastic
                ));
            }
        }
    }

    if let Some(fractions) = params.granulometry() {
        let total = fractions.iter().sum::<f64>();
        if (total - 100.0).abs() > TOLERANCE {
            violations.push(format!(
                "Los porcentajes de granulometría deben sumar 100 (suman {total})"
            ));
        }
    }

    if params.water_table_depth_m < 0.0 {
        violations.push("El nivel freático no puede ser negativo".to_string());
    }

    if params.load_pressure_kpa < 0.0 {
        violations.push("La presión de carga no puede ser negativa".to_string());
    }

    for attribute in [
        Attribute::DesiredStrength,
        Attribute::Gravel,
        Attribute::Sand,
        Attribute::Silt,
        Attribute::Clay,
        Attribute::LiquidLimit,
        Attribute::PlasticLimit,
        Attribute::PlasticityIndex,
        Attribute::MoistureContent,
        Attribute::Cbr,
    ] {
        if params
            .numeric_value(attribute)
            .is_some_and(|value| value < 0.0)
        {
            violations.push(format!("{} no puede ser negativo", attribute.label()));
        }
    }

    if let Some(ph) = params.ph {
        if !(0.0..=14.0).contains(&ph) {
            violations.push(format!("El pH ({ph}) debe estar entre 0 y 14"));
        }
    }

    violations
}
