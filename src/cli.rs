use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::{SoilType, SwellingPotential};
use crate::reasoning::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::search::DEFAULT_SEARCH_ENDPOINT;

#[derive(Parser, Debug)]
#[command(
    name = "geotec",
    version,
    about = "Soil stabilization analysis and report generation"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check soil parameters for internal consistency.
    Validate(ValidateArgs),
    /// Print the instruction document sent to the reasoning service.
    Prompt(PromptArgs),
    /// Run the full analysis and write the paginated report.
    Report(ReportArgs),
    /// Structure a previously saved raw response.
    Parse(ParseArgs),
    /// Inventory the normative and article corpus.
    Corpus(CorpusInventoryArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ParameterArgs {
    /// JSON file with the soil parameters; optional flags override its values.
    #[arg(long, conflicts_with_all = ["soil_type", "water_table_depth", "load_pressure"])]
    pub params_file: Option<PathBuf>,

    #[arg(long, required_unless_present = "params_file")]
    pub soil_type: Option<SoilType>,

    /// Water table depth in metres.
    #[arg(long, required_unless_present = "params_file", allow_negative_numbers = true)]
    pub water_table_depth: Option<f64>,

    /// Load pressure in kPa.
    #[arg(long, required_unless_present = "params_file", allow_negative_numbers = true)]
    pub load_pressure: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub desired_strength: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub gravel: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub sand: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub silt: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub clay: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub liquid_limit: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub plastic_limit: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub plasticity_index: Option<f64>,

    /// Natural moisture content in percent.
    #[arg(long, allow_negative_numbers = true)]
    pub moisture: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub ph: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub cbr: Option<f64>,

    #[arg(long, value_enum)]
    pub swelling_potential: Option<SwellingPotential>,
}

#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    #[arg(long, default_value = "normas")]
    pub normatives_dir: PathBuf,

    #[arg(long, default_value = "articulos")]
    pub articles_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[arg(long, default_value = DEFAULT_SEARCH_ENDPOINT)]
    pub search_endpoint: String,

    #[arg(long, default_value_t = 10)]
    pub search_timeout_secs: u64,

    /// Skip the academic reference lookup.
    #[arg(long, default_value_t = false)]
    pub no_search: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ReasoningArgs {
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    #[arg(long, env = "GEOTEC_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, default_value_t = 120)]
    pub reasoning_timeout_secs: u64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub params: ParameterArgs,
}

#[derive(Args, Debug, Clone)]
pub struct PromptArgs {
    #[command(flatten)]
    pub params: ParameterArgs,

    /// Free-text project notes.
    #[arg(long, default_value = "")]
    pub notes: String,

    #[command(flatten)]
    pub corpus: CorpusArgs,

    #[command(flatten)]
    pub search: SearchArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub params: ParameterArgs,

    #[arg(long, default_value = "")]
    pub notes: String,

    #[command(flatten)]
    pub corpus: CorpusArgs,

    #[command(flatten)]
    pub search: SearchArgs,

    #[command(flatten)]
    pub reasoning: ReasoningArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(long, default_value = "informe_estabilizacion.txt")]
    pub output: PathBuf,

    #[arg(long, default_value_t = false)]
    pub show_prompt: bool,

    #[arg(long, default_value_t = false)]
    pub show_raw: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    #[command(flatten)]
    pub params: ParameterArgs,

    #[arg(long)]
    pub response_file: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the paginated document here.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CorpusInventoryArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}
