use super::assemble::{Block, DocumentBlock, DocumentView, InteractiveView, TableRow};

const PAGE_HEADER: &str = "Informe Técnico de Estabilización de Suelos";
const PAGE_BREAK: char = '\u{000C}';

pub fn render_interactive_text(view: &InteractiveView) -> String {
    let mut lines = Vec::new();

    match view {
        InteractiveView::Rejected { evaluation } => {
            lines.push("Problemas con los parámetros ingresados:".to_string());
            lines.push(evaluation.clone());
        }
        InteractiveView::Completed {
            summary,
            recommendation,
            applications,
        } => {
            lines.push("Análisis completado exitosamente".to_string());

            lines.push(String::new());
            lines.push("== Resumen Técnico ==".to_string());
            push_block(&mut lines, "Clasificación del Suelo", &summary.classification);
            push_block(&mut lines, "Problemas Identificados", &summary.problems);

            lines.push(String::new());
            lines.push("== Recomendación Detallada ==".to_string());
            push_block(
                &mut lines,
                "Método de Estabilización Recomendado",
                &recommendation.recommendation,
            );
            push_block(&mut lines, "Justificación Técnica", &recommendation.justification);
            push_list(&mut lines, "Normativas Aplicables", &recommendation.citations);
            push_list(&mut lines, "Referencias Técnicas", &recommendation.references);

            lines.push(String::new());
            lines.push("== Aplicaciones Específicas ==".to_string());
            push_block(&mut lines, "Aplicaciones Recomendadas", &applications.applications);
        }
    }

    lines.join("\n")
}

fn push_block(lines: &mut Vec<String>, title: &str, block: &Block) {
    lines.push(format!("-- {title} --"));
    match block {
        Block::Text(text) => lines.push(text.clone()),
        Block::NotAvailable(notice) => lines.push(format!("[No disponible] {notice}")),
    }
}

fn push_list(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(format!("-- {title} --"));
    lines.extend(items.iter().map(|item| format!("- {item}")));
}

/// Paginated plain-text rendering; pages are separated by a form feed.
pub fn render_document(view: &DocumentView) -> String {
    let mut pages = vec![vec![
        view.title.clone(),
        format!("Fecha: {}", view.date.format("%Y-%m-%d")),
        String::new(),
    ]];

    for section in &view.sections {
        if section.new_page && pages.last().is_some_and(|page| !page.is_empty()) {
            pages.push(Vec::new());
        }
        let Some(page) = pages.last_mut() else {
            continue;
        };

        page.push(format!("{}. {}", section.number, section.title));
        for block in &section.blocks {
            render_block(page, block);
        }
        page.push(String::new());
    }

    let page_count = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(index, body)| {
            let mut page = vec![PAGE_HEADER.to_string(), String::new()];
            page.extend(body);
            page.push(format!("Página {} de {}", index + 1, page_count));
            page.join("\n")
        })
        .collect::<Vec<String>>()
        .join(&format!("\n{PAGE_BREAK}\n"))
}

fn render_block(page: &mut Vec<String>, block: &DocumentBlock) {
    match block {
        DocumentBlock::Table { rows } => render_table(page, rows),
        DocumentBlock::Paragraph { text } => page.push(text.clone()),
        DocumentBlock::Subsection { title, text } => {
            page.push(format!("{title}:"));
            page.push(text.clone());
            page.push(String::new());
        }
        DocumentBlock::List { title, items } => {
            page.push(format!("{title}:"));
            page.extend(items.iter().map(|item| format!("- {item}")));
            page.push(String::new());
        }
    }
}

fn render_table(page: &mut Vec<String>, rows: &[TableRow]) {
    let width = rows
        .iter()
        .flat_map(|row| match row {
            TableRow::Value { label, .. } => vec![label.chars().count()],
            TableRow::Group { rows, .. } => rows
                .iter()
                .map(|(label, _)| label.chars().count() + 2)
                .collect(),
        })
        .chain(std::iter::once("Parámetro".chars().count()))
        .max()
        .unwrap_or_default();

    page.push(format!("{:<width$}  Valor", "Parámetro"));
    page.push(format!("{}  {}", "-".repeat(width), "-".repeat(24)));
    for row in rows {
        match row {
            TableRow::Value { label, value } => page.push(format!("{label:<width$}  {value}")),
            TableRow::Group { label, rows } => {
                page.push(label.clone());
                for (label, value) in rows {
                    let indented = format!("  {label}");
                    page.push(format!("{indented:<width$}  {value}"));
                }
            }
        }
    }
}
