use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Attribute, ParameterSet, ParsedReport, Section};

pub const REPORT_TITLE: &str = "INFORME TÉCNICO DE ESTABILIZACIÓN DE SUELOS";

/// Bounded-count policy shared by both views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPolicy {
    pub citation_cap: usize,
    pub reference_cap: usize,
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self {
            citation_cap: 10,
            reference_cap: 5,
        }
    }
}

impl RenderPolicy {
    pub fn citations(&self, report: &ParsedReport) -> Vec<String> {
        report
            .norms
            .iter()
            .take(self.citation_cap)
            .cloned()
            .collect()
    }

    pub fn references(&self, report: &ParsedReport) -> Vec<String> {
        report
            .references
            .iter()
            .take(self.reference_cap)
            .map(|reference| reference.citation_line())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Block {
    Text(String),
    NotAvailable(String),
}

impl Block {
    fn from_section(report: &ParsedReport, section: Section) -> Self {
        let text = report.section(section);
        if text.is_empty() {
            Self::NotAvailable(missing_notice(section).to_string())
        } else {
            Self::Text(text.to_string())
        }
    }
}

pub fn missing_notice(section: Section) -> &'static str {
    match section {
        Section::ParameterEvaluation => "No se proporcionó evaluación de parámetros",
        Section::Classification => "No se pudo determinar la clasificación del suelo",
        Section::Problems => "No se identificaron problemas específicos",
        Section::Recommendation => "No se pudo generar una recomendación",
        Section::Justification => "No se proporcionó justificación técnica",
        Section::Applications => "No se especificaron aplicaciones para este método",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryGroup {
    pub classification: Block,
    pub problems: Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationGroup {
    pub recommendation: Block,
    pub justification: Block,
    pub citations: Vec<String>,
    pub references: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationsGroup {
    pub applications: Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InteractiveView {
    Rejected {
        evaluation: String,
    },
    Completed {
        summary: SummaryGroup,
        recommendation: RecommendationGroup,
        applications: ApplicationsGroup,
    },
}

pub fn assemble_interactive(report: &ParsedReport, policy: &RenderPolicy) -> InteractiveView {
    if report.is_rejected() {
        return InteractiveView::Rejected {
            evaluation: report.parameter_evaluation.clone(),
        };
    }

    InteractiveView::Completed {
        summary: SummaryGroup {
            classification: Block::from_section(report, Section::Classification),
            problems: Block::from_section(report, Section::Problems),
        },
        recommendation: RecommendationGroup {
            recommendation: Block::from_section(report, Section::Recommendation),
            justification: Block::from_section(report, Section::Justification),
            citations: policy.citations(report),
            references: policy.references(report),
        },
        applications: ApplicationsGroup {
            applications: Block::from_section(report, Section::Applications),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableRow {
    Value { label: String, value: String },
    Group { label: String, rows: Vec<(String, String)> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentBlock {
    Table { rows: Vec<TableRow> },
    Paragraph { text: String },
    Subsection { title: String, text: String },
    List { title: String, items: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSection {
    pub number: usize,
    pub title: String,
    pub new_page: bool,
    pub blocks: Vec<DocumentBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentView {
    pub title: String,
    pub date: NaiveDate,
    pub sections: Vec<DocumentSection>,
}

pub fn parameter_table(params: &ParameterSet) -> Vec<TableRow> {
    let grouped = params.granulometry().is_some();
    let mut rows = Vec::new();
    let mut granulometry = Vec::new();

    for (attribute, value) in params.present_attributes() {
        if grouped && attribute.is_granulometry() {
            granulometry.push((attribute.label().to_string(), value));
            if attribute == Attribute::Clay {
                rows.push(TableRow::Group {
                    label: "Granulometría".to_string(),
                    rows: std::mem::take(&mut granulometry),
                });
            }
            continue;
        }

        rows.push(TableRow::Value {
            label: attribute.label().to_string(),
            value,
        });
    }

    rows
}

/// Numbered sections mirroring the interactive grouping. Sections whose fields are all
/// empty are omitted and the numbering stays contiguous; the parameter table always renders.
pub fn assemble_document(
    report: &ParsedReport,
    params: &ParameterSet,
    policy: &RenderPolicy,
    date: NaiveDate,
) -> DocumentView {
    let mut drafts = vec![(
        "Datos del Suelo".to_string(),
        false,
        vec![DocumentBlock::Table {
            rows: parameter_table(params),
        }],
    )];

    if !report.parameter_evaluation.is_empty() {
        drafts.push((
            Section::ParameterEvaluation.title().to_string(),
            false,
            vec![DocumentBlock::Paragraph {
                text: report.parameter_evaluation.clone(),
            }],
        ));
    }

    if !report.is_rejected() {
        let analysis = [Section::Classification, Section::Problems]
            .into_iter()
            .filter(|section| !report.section(*section).is_empty())
            .map(|section| DocumentBlock::Subsection {
                title: section.title().to_string(),
                text: report.section(section).to_string(),
            })
            .collect::<Vec<DocumentBlock>>();
        if !analysis.is_empty() {
            drafts.push(("Análisis Técnico".to_string(), false, analysis));
        }

        let recommendation = recommendation_blocks(report, policy);
        if !recommendation.is_empty() {
            drafts.push((
                "Recomendación de Estabilización".to_string(),
                true,
                recommendation,
            ));
        }

        if !report.applications.is_empty() {
            drafts.push((
                Section::Applications.title().to_string(),
                true,
                vec![DocumentBlock::Paragraph {
                    text: report.applications.clone(),
                }],
            ));
        }
    }

    DocumentView {
        title: REPORT_TITLE.to_string(),
        date,
        sections: drafts
            .into_iter()
            .enumerate()
            .map(|(index, (title, new_page, blocks))| DocumentSection {
                number: index + 1,
                title,
                new_page,
                blocks,
            })
            .collect(),
    }
}

fn recommendation_blocks(report: &ParsedReport, policy: &RenderPolicy) -> Vec<DocumentBlock> {
    let mut blocks = Vec::new();

    for section in [Section::Recommendation, Section::Justification] {
        let text = report.section(section);
        if !text.is_empty() {
            blocks.push(DocumentBlock::Subsection {
                title: section.title().to_string(),
                text: text.to_string(),
            });
        }
    }

    let citations = policy.citations(report);
    if !citations.is_empty() {
        blocks.push(DocumentBlock::List {
            title: "Normativas Aplicables".to_string(),
            items: citations,
        });
    }

    let references = policy.references(report);
    if !references.is_empty() {
        blocks.push(DocumentBlock::List {
            title: "Referencias Técnicas".to_string(),
            items: references,
        });
    }

    blocks
}
