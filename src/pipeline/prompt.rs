use crate::corpus::{KnowledgeCorpus, Partition};
use crate::model::{AcademicReference, ParameterSet, Section};
use crate::util::{condense_whitespace, format_number, truncate_chars};

pub const CORPUS_DOCS_PER_PARTITION: usize = 5;
pub const CORPUS_SNIPPET_CHARS: usize = 500;
pub const PROMPT_REFERENCE_CAP: usize = super::references::MAX_REFERENCES;
pub const APPLICATION_COUNT: usize = 5;

const PREAMBLE: &str = "Eres un ingeniero geotécnico senior con 30 años de experiencia en estabilización de suelos.\n\
Realiza un análisis exhaustivo para este caso específico:";

/// Two or three search strings. Plasticity index wins over liquid limit; never both.
pub fn derive_search_queries(params: &ParameterSet) -> Vec<String> {
    let soil = params.soil_type.name();
    let mut queries = vec![
        format!(
            "estabilización de {soil} nivel freático {}m",
            format_number(params.water_table_depth_m)
        ),
        format!(
            "{soil} presión de carga {}kPa",
            format_number(params.load_pressure_kpa)
        ),
    ];

    let plasticity_term = params
        .plasticity_index
        .map(|index| format!("IP{}", format_number(index)))
        .or_else(|| {
            params
                .liquid_limit
                .map(|limit| format!("LL{}", format_number(limit)))
        });

    if let Some(term) = plasticity_term {
        queries.push(format!("métodos de estabilización para {soil} {term}"));
    }

    queries
}

/// Assembles the instruction document. Pure: same inputs, same output.
pub fn build_prompt(
    params: &ParameterSet,
    notes: &str,
    corpus: &KnowledgeCorpus,
    references: &[AcademicReference],
) -> String {
    let mut lines = vec![PREAMBLE.to_string(), String::new()];

    lines.push("### Datos Técnicos del Suelo:".to_string());
    for (index, (attribute, value)) in params.present_attributes().into_iter().enumerate() {
        lines.push(format!("{}. {}: {}", index + 1, attribute.label(), value));
    }
    lines.push(String::new());

    lines.push("### Contexto Técnico:".to_string());
    lines.extend(corpus_block(
        corpus,
        Partition::Normatives,
        "Normativas relevantes:",
        "No hay normativas disponibles",
    ));
    lines.extend(corpus_block(
        corpus,
        Partition::Articles,
        "Artículos técnicos:",
        "No hay artículos técnicos disponibles",
    ));
    lines.push(String::new());

    lines.push("### Referencias Académicas Relevantes:".to_string());
    if references.is_empty() {
        lines.push("No se encontraron referencias adicionales".to_string());
    } else {
        lines.extend(
            references
                .iter()
                .take(PROMPT_REFERENCE_CAP)
                .map(|reference| format!("- {}", reference.citation_line())),
        );
    }
    lines.push(String::new());

    lines.push("### Información Adicional del Proyecto:".to_string());
    let notes = notes.trim();
    if notes.is_empty() {
        lines.push("Ninguna proporcionada".to_string());
    } else {
        lines.push(notes.to_string());
    }
    lines.push(String::new());

    lines.extend(requirements_block(params));
    lines.push(String::new());
    lines.extend(output_contract_block());

    lines.join("\n")
}

fn corpus_block(
    corpus: &KnowledgeCorpus,
    partition: Partition,
    title: &str,
    placeholder: &str,
) -> Vec<String> {
    let documents = corpus.partition(partition);
    if documents.is_empty() {
        return vec![placeholder.to_string()];
    }

    let mut lines = vec![title.to_string()];
    for (name, content) in documents.iter().take(CORPUS_DOCS_PER_PARTITION) {
        let condensed = condense_whitespace(content);
        let snippet = truncate_chars(&condensed, CORPUS_SNIPPET_CHARS);
        let ellipsis = if snippet.len() < condensed.len() {
            "..."
        } else {
            ""
        };
        lines.push(format!("- {name}: {snippet}{ellipsis}"));
    }
    lines
}

fn requirements_block(params: &ParameterSet) -> Vec<String> {
    let mut criteria = vec![
        "Compatibilidad exacta con el tipo de suelo indicado",
        "Comportamiento con la profundidad del agua subterránea indicada",
        "Capacidad para la presión de carga indicada",
    ];
    if params.desired_strength_kpa.is_some() {
        criteria.push("Potencial para alcanzar la resistencia deseada");
    }
    if params.liquid_limit.is_some()
        || params.plastic_limit.is_some()
        || params.plasticity_index.is_some()
    {
        criteria.push("Respuesta frente a la plasticidad medida");
    }
    if params.swelling_potential.is_some() {
        criteria.push("Control de los cambios volumétricos del suelo");
    }

    let mut lines = vec![
        "### Requerimientos del Análisis:".to_string(),
        "1. Evaluación de coherencia:".to_string(),
        "   - Verifica la coherencia de los parámetros ingresados antes de cualquier otra conclusión"
            .to_string(),
        "   - Si hay inconsistencias, explica por qué no se puede realizar el análisis".to_string(),
        "2. Clasificación detallada:".to_string(),
        "   - Clasifica el suelo según los sistemas USCS y AASHTO".to_string(),
        "   - Explica cada parámetro suministrado y su implicación".to_string(),
        "3. Problemas identificados:".to_string(),
        "   - Enumera los problemas específicos de este suelo".to_string(),
        "   - Relaciona cada problema con los parámetros suministrados".to_string(),
        "4. Recomendación de estabilización:".to_string(),
        "   - Analiza métodos físicos (compactación, geosintéticos), químicos (cal, cemento, polímeros) e innovadores (biocementación, nanotecnología)"
            .to_string(),
        "   - Selecciona UN único método óptimo considerando:".to_string(),
    ];
    lines.extend(criteria.into_iter().map(|criterion| format!("     * {criterion}")));
    lines.extend([
        "   - El método debe ser ESPECÍFICO, no genérico (ej: \"Estabilización con cal al 5% + cemento al 3% para suelos arcillosos de alta plasticidad\")"
            .to_string(),
        "5. Justificación técnica:".to_string(),
        "   - Explica el mecanismo de acción, materiales, proceso constructivo y resultados esperados cuantificables"
            .to_string(),
        "   - Cita normativas aplicables (ASTM, AASHTO, ISO, EN, NTC) con sus identificadores exactos"
            .to_string(),
        "   - Referencia artículos técnicos con el formato: Autores (Año). Título. Fuente."
            .to_string(),
        "   - Compara con los métodos alternativos descartados y explica por qué no son óptimos"
            .to_string(),
        "6. Aplicaciones:".to_string(),
        format!(
            "   - Propone exactamente {APPLICATION_COUNT} aplicaciones concretas con tipo de proyecto, configuración y justificación"
        ),
    ]);
    lines
}

fn output_contract_block() -> Vec<String> {
    let mut lines = vec!["### Formato de Respuesta Estricto:".to_string()];
    for section in Section::ALL {
        lines.push(format!("**{}**", section.heading()));
        match section {
            Section::ParameterEvaluation => {
                lines.push("[Análisis de coherencia de los datos ingresados]".to_string())
            }
            Section::Classification => {
                lines.push("[Clasificación detallada según USCS y AASHTO]".to_string())
            }
            Section::Problems => {
                lines.push("[Lista de problemas específicos para este suelo]".to_string())
            }
            Section::Recommendation => {
                lines.push("[Método específico recomendado]".to_string())
            }
            Section::Justification => lines.push(
                "[Fundamentos técnicos, normativas y referencias bibliográficas]".to_string(),
            ),
            Section::Applications => lines.extend(
                (1..=APPLICATION_COUNT)
                    .map(|index| format!("{index}. [Proyecto específico {index} con justificación]")),
            ),
        }
        lines.push(String::new());
    }
    lines
}
