use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::util::format_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SoilType {
    Clay,
    SiltyClay,
    OrganicClay,
    Silt,
    OrganicSilt,
    Sand,
    SiltySand,
    ClayeySand,
    Gravel,
    SiltyGravel,
    ClayeyGravel,
    OrganicSoil,
    Peat,
    Loess,
    Laterite,
    Bentonite,
    Marl,
    ExpansiveClay,
    CollapsibleSoil,
    ResidualSoil,
    AlluvialSoil,
}

impl SoilType {
    pub const ALL: [SoilType; 21] = [
        Self::Clay,
        Self::SiltyClay,
        Self::OrganicClay,
        Self::Silt,
        Self::OrganicSilt,
        Self::Sand,
        Self::SiltySand,
        Self::ClayeySand,
        Self::Gravel,
        Self::SiltyGravel,
        Self::ClayeyGravel,
        Self::OrganicSoil,
        Self::Peat,
        Self::Loess,
        Self::Laterite,
        Self::Bentonite,
        Self::Marl,
        Self::ExpansiveClay,
        Self::CollapsibleSoil,
        Self::ResidualSoil,
        Self::AlluvialSoil,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Clay => "Arcilla (CH)",
            Self::SiltyClay => "Arcilla limosa (CL)",
            Self::OrganicClay => "Arcilla orgánica (OH)",
            Self::Silt => "Limo (ML)",
            Self::OrganicSilt => "Limo orgánico (OL)",
            Self::Sand => "Arena (SP)",
            Self::SiltySand => "Arena limosa (SM)",
            Self::ClayeySand => "Arena arcillosa (SC)",
            Self::Gravel => "Grava (GP)",
            Self::SiltyGravel => "Grava limosa (GM)",
            Self::ClayeyGravel => "Grava arcillosa (GC)",
            Self::OrganicSoil => "Suelo orgánico (Pt)",
            Self::Peat => "Turba (Pt)",
            Self::Loess => "Loess",
            Self::Laterite => "Laterita",
            Self::Bentonite => "Bentonita",
            Self::Marl => "Margas",
            Self::ExpansiveClay => "Arcillas expansivas",
            Self::CollapsibleSoil => "Suelos colapsables",
            Self::ResidualSoil => "Suelos residuales",
            Self::AlluvialSoil => "Suelos aluviales",
        }
    }

    /// Label without the trailing USCS group, e.g. `Arena` for `Arena (SP)`.
    pub fn name(self) -> &'static str {
        let label = self.label();
        label
            .split_once(" (")
            .map(|(name, _)| name)
            .unwrap_or(label)
    }

    pub fn uscs_code(self) -> Option<&'static str> {
        let (_, rest) = self.label().split_once(" (")?;
        rest.strip_suffix(')')
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SoilType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_lowercase();
        if needle.is_empty() {
            return Err("soil type must not be empty".to_string());
        }

        if let Some(soil) = Self::ALL.iter().copied().find(|soil| {
            soil.label().to_lowercase() == needle || soil.name().to_lowercase() == needle
        }) {
            return Ok(soil);
        }

        let by_code = Self::ALL
            .iter()
            .copied()
            .filter(|soil| {
                soil.uscs_code()
                    .map(|code| code.to_lowercase() == needle)
                    .unwrap_or(false)
            })
            .collect::<Vec<SoilType>>();
        if let [soil] = by_code.as_slice() {
            return Ok(*soil);
        }

        Err(format!(
            "unknown soil type '{}'; expected one of: {}",
            value.trim(),
            Self::ALL
                .iter()
                .map(|soil| soil.label())
                .collect::<Vec<&str>>()
                .join(", ")
        ))
    }
}

impl TryFrom<String> for SoilType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SoilType> for String {
    fn from(value: SoilType) -> Self {
        value.label().to_string()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SwellingPotential {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl SwellingPotential {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "bajo",
            Self::Medium => "medio",
            Self::High => "alto",
            Self::VeryHigh => "muy alto",
        }
    }
}

/// Measurements for one report request. Absent optional attributes are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterSet {
    pub soil_type: SoilType,
    pub water_table_depth_m: f64,
    pub load_pressure_kpa: f64,
    pub desired_strength_kpa: Option<f64>,
    pub gravel_pct: Option<f64>,
    pub sand_pct: Option<f64>,
    pub silt_pct: Option<f64>,
    pub clay_pct: Option<f64>,
    pub liquid_limit: Option<f64>,
    pub plastic_limit: Option<f64>,
    pub plasticity_index: Option<f64>,
    pub moisture_content_pct: Option<f64>,
    pub ph: Option<f64>,
    pub cbr_pct: Option<f64>,
    pub swelling_potential: Option<SwellingPotential>,
}

impl ParameterSet {
    pub fn new(soil_type: SoilType, water_table_depth_m: f64, load_pressure_kpa: f64) -> Self {
        Self {
            soil_type,
            water_table_depth_m,
            load_pressure_kpa,
            desired_strength_kpa: None,
            gravel_pct: None,
            sand_pct: None,
            silt_pct: None,
            clay_pct: None,
            liquid_limit: None,
            plastic_limit: None,
            plasticity_index: None,
            moisture_content_pct: None,
            ph: None,
            cbr_pct: None,
            swelling_potential: None,
        }
    }

    pub fn numeric_value(&self, attribute: Attribute) -> Option<f64> {
        match attribute {
            Attribute::SoilType | Attribute::SwellingPotential => None,
            Attribute::WaterTableDepth => Some(self.water_table_depth_m),
            Attribute::LoadPressure => Some(self.load_pressure_kpa),
            Attribute::DesiredStrength => self.desired_strength_kpa,
            Attribute::Gravel => self.gravel_pct,
            Attribute::Sand => self.sand_pct,
            Attribute::Silt => self.silt_pct,
            Attribute::Clay => self.clay_pct,
            Attribute::LiquidLimit => self.liquid_limit,
            Attribute::PlasticLimit => self.plastic_limit,
            Attribute::PlasticityIndex => self.plasticity_index,
            Attribute::MoistureContent => self.moisture_content_pct,
            Attribute::Ph => self.ph,
            Attribute::Cbr => self.cbr_pct,
        }
    }

    /// Display value (with unit) of an attribute, `None` when absent.
    pub fn display_value(&self, attribute: Attribute) -> Option<String> {
        match attribute {
            Attribute::SoilType => Some(self.soil_type.label().to_string()),
            Attribute::SwellingPotential => self
                .swelling_potential
                .map(|potential| potential.label().to_string()),
            _ => self.numeric_value(attribute).map(|value| {
                let number = format_number(value);
                match attribute.unit() {
                    Some("%") => format!("{number}%"),
                    Some(unit) => format!("{number} {unit}"),
                    None => number,
                }
            }),
        }
    }

    /// Present attributes in canonical order, each with its display value.
    pub fn present_attributes(&self) -> Vec<(Attribute, String)> {
        Attribute::ALL
            .iter()
            .filter_map(|attribute| {
                self.display_value(*attribute)
                    .map(|value| (*attribute, value))
            })
            .collect()
    }

    /// Gravel, sand, silt and clay percentages, only when all four are present.
    pub fn granulometry(&self) -> Option<[f64; 4]> {
        Some([
            self.gravel_pct?,
            self.sand_pct?,
            self.silt_pct?,
            self.clay_pct?,
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    SoilType,
    WaterTableDepth,
    LoadPressure,
    DesiredStrength,
    Gravel,
    Sand,
    Silt,
    Clay,
    LiquidLimit,
    PlasticLimit,
    PlasticityIndex,
    MoistureContent,
    Ph,
    Cbr,
    SwellingPotential,
}

impl Attribute {
    pub const ALL: [Attribute; 15] = [
        Self::SoilType,
        Self::WaterTableDepth,
        Self::LoadPressure,
        Self::DesiredStrength,
        Self::Gravel,
        Self::Sand,
        Self::Silt,
        Self::Clay,
        Self::LiquidLimit,
        Self::PlasticLimit,
        Self::PlasticityIndex,
        Self::MoistureContent,
        Self::Ph,
        Self::Cbr,
        Self::SwellingPotential,
    ];

    pub const GRANULOMETRY: [Attribute; 4] = [Self::Gravel, Self::Sand, Self::Silt, Self::Clay];

    pub fn label(self) -> &'static str {
        match self {
            Self::SoilType => "Tipo de suelo",
            Self::WaterTableDepth => "Nivel freático",
            Self::LoadPressure => "Presión de carga",
            Self::DesiredStrength => "Resistencia deseada",
            Self::Gravel => "Porcentaje de grava",
            Self::Sand => "Porcentaje de arena",
            Self::Silt => "Porcentaje de limo",
            Self::Clay => "Porcentaje de arcilla",
            Self::LiquidLimit => "Límite líquido (LL)",
            Self::PlasticLimit => "Límite plástico (LP)",
            Self::PlasticityIndex => "Índice de plasticidad (IP)",
            Self::MoistureContent => "Humedad natural",
            Self::Ph => "pH del suelo",
            Self::Cbr => "Índice CBR",
            Self::SwellingPotential => "Potencial de expansión",
        }
    }

    pub fn unit(self) -> Option<&'static str> {
        match self {
            Self::WaterTableDepth => Some("m"),
            Self::LoadPressure | Self::DesiredStrength => Some("kPa"),
            Self::Gravel
            | Self::Sand
            | Self::Silt
            | Self::Clay
            | Self::MoistureContent
            | Self::Cbr => Some("%"),
            _ => None,
        }
    }

    pub fn is_granulometry(self) -> bool {
        Self::GRANULOMETRY.contains(&self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicReference {
    pub title: String,
    pub authors: String,
    pub source: String,
    pub year: Option<i32>,
    pub snippet: String,
    pub url: Option<String>,
    pub engine: String,
    pub query: String,
}

impl AcademicReference {
    pub fn citation_line(&self) -> String {
        let year = self
            .year
            .map(|value| value.to_string())
            .unwrap_or_else(|| "Desconocido".to_string());
        let mut line = format!(
            "{} ({}). {}. {}",
            self.authors, year, self.title, self.source
        );
        if let Some(url) = &self.url {
            line.push_str(&format!(" [URL: {url}]"));
        }
        line
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    ParameterEvaluation,
    Classification,
    Problems,
    Recommendation,
    Justification,
    Applications,
}

impl Section {
    /// Declared order of the output contract.
    pub const ALL: [Section; 6] = [
        Self::ParameterEvaluation,
        Self::Classification,
        Self::Problems,
        Self::Recommendation,
        Self::Justification,
        Self::Applications,
    ];

    pub fn heading(self) -> &'static str {
        match self {
            Self::ParameterEvaluation => "Evaluación de Parámetros:",
            Self::Classification => "Clasificación del Suelo:",
            Self::Problems => "Problemas Identificados:",
            Self::Recommendation => "Recomendación Óptima:",
            Self::Justification => "Justificación Técnica:",
            Self::Applications => "Aplicaciones Recomendadas:",
        }
    }

    /// Heading text without the trailing colon, used as a display title.
    pub fn title(self) -> &'static str {
        self.heading().trim_end_matches(':')
    }
}

/// Bibliographic citation recovered from generated prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitedReference {
    pub authors: String,
    pub year: String,
    pub title: String,
    pub source: String,
}

impl CitedReference {
    pub fn citation_line(&self) -> String {
        format!(
            "{} ({}). {}. {}",
            self.authors, self.year, self.title, self.source
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedReport {
    pub parameter_evaluation: String,
    pub classification: String,
    pub problems: String,
    pub recommendation: String,
    pub justification: String,
    pub applications: String,
    pub norms: BTreeSet<String>,
    pub references: Vec<CitedReference>,
}

/// Markers in the evaluation section that reject the whole report.
pub const REJECTION_KEYWORDS: [&str; 2] = ["inconsistencias", "error"];

impl ParsedReport {
    pub fn section(&self, section: Section) -> &str {
        match section {
            Section::ParameterEvaluation => &self.parameter_evaluation,
            Section::Classification => &self.classification,
            Section::Problems => &self.problems,
            Section::Recommendation => &self.recommendation,
            Section::Justification => &self.justification,
            Section::Applications => &self.applications,
        }
    }

    pub fn section_mut(&mut self, section: Section) -> &mut String {
        match section {
            Section::ParameterEvaluation => &mut self.parameter_evaluation,
            Section::Classification => &mut self.classification,
            Section::Problems => &mut self.problems,
            Section::Recommendation => &mut self.recommendation,
            Section::Justification => &mut self.justification,
            Section::Applications => &mut self.applications,
        }
    }

    pub fn is_rejected(&self) -> bool {
        let evaluation = self.parameter_evaluation.to_lowercase();
        REJECTION_KEYWORDS
            .iter()
            .any(|keyword| evaluation.contains(keyword))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub partition: String,
    pub filename: String,
    pub bytes: u64,
    pub sha256: String,
    pub excerpt_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub normatives_dir: String,
    pub articles_dir: String,
    pub document_count: usize,
    pub documents: Vec<CorpusEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soil_type_parses_label_name_and_unique_code() {
        assert_eq!("Arena (SP)".parse::<SoilType>(), Ok(SoilType::Sand));
        assert_eq!("arena".parse::<SoilType>(), Ok(SoilType::Sand));
        assert_eq!("ch".parse::<SoilType>(), Ok(SoilType::Clay));
        assert_eq!("Bentonita".parse::<SoilType>(), Ok(SoilType::Bentonite));
        assert!("pt".parse::<SoilType>().is_err());
        assert!("granito".parse::<SoilType>().is_err());
    }

    #[test]
    fn parameter_set_deserializes_with_missing_optionals() {
        let raw = r#"
        {
          "soil_type": "Arcilla (CH)",
          "water_table_depth_m": 2.0,
          "load_pressure_kpa": 120,
          "liquid_limit": 55,
          "swelling_potential": "very-high"
        }
        "#;

        let params: ParameterSet = serde_json::from_str(raw).expect("parameter set");
        assert_eq!(params.soil_type, SoilType::Clay);
        assert_eq!(params.liquid_limit, Some(55.0));
        assert!(params.plastic_limit.is_none());
        assert_eq!(params.swelling_potential, Some(SwellingPotential::VeryHigh));
    }

    #[test]
    fn parameter_set_rejects_misspelled_keys() {
        let raw = r#"
        {
          "soil_type": "Arena (SP)",
          "water_table_depth_m": 1.5,
          "load_pressure_kpa": 150,
          "liquid_limt": 10,
          "plastic_limit": 20
        }
        "#;

        let err = serde_json::from_str::<ParameterSet>(raw).expect_err("unknown key");
        assert!(err.to_string().contains("liquid_limt"));
    }

    #[test]
    fn present_attributes_skip_absent_values() {
        let mut params = ParameterSet::new(SoilType::Sand, 1.5, 150.0);
        params.cbr_pct = Some(12.0);

        let present = params.present_attributes();
        let labels = present
            .iter()
            .map(|(attribute, _)| attribute.label())
            .collect::<Vec<&str>>();
        assert_eq!(
            labels,
            vec!["Tipo de suelo", "Nivel freático", "Presión de carga", "Índice CBR"]
        );
        assert_eq!(present[1].1, "1.5 m");
        assert_eq!(present[2].1, "150 kPa");
        assert_eq!(present[3].1, "12%");
    }

    #[test]
    fn granulometry_requires_all_four_fractions() {
        let mut params = ParameterSet::new(SoilType::Silt, 3.0, 80.0);
        params.gravel_pct = Some(5.0);
        params.sand_pct = Some(25.0);
        params.silt_pct = Some(50.0);
        assert!(params.granulometry().is_none());

        params.clay_pct = Some(20.0);
        assert_eq!(params.granulometry(), Some([5.0, 25.0, 50.0, 20.0]));
    }
}
