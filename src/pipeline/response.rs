use std::collections::BTreeSet;

use anyhow::{Context, Result};
use regex::Regex;

use crate::model::{CitedReference, ParsedReport, Section};
use crate::util::condense_whitespace;

/// Recovers a [`ParsedReport`] from the generator's free text. Never fails: anything that
/// cannot be located is left empty.
pub trait ResponseParser {
    fn parse(&self, raw: &str) -> ParsedReport;
}

/// Pattern-matching recovery over unconstrained prose.
///
/// Bibliographic citations are matched on the shape `Authors (Year). Title. Source.` with the
/// next period closing each field, so a title or source that itself contains a period is cut
/// short or shifted into the following field.
pub struct HeuristicParser {
    norm_regex: Regex,
    designation_regex: Regex,
    reference_regex: Regex,
}

impl HeuristicParser {
    pub fn new() -> Result<Self> {
        let norm_regex = Regex::new(
            r"(?i)(?:ASTM [A-Z]+\s?\d+|AASHTO [A-Z]+\s?\d+|ISO \d+-\d+|EN \d+|NTC \d+)",
        )
        .context("failed to compile normative code regex")?;
        let designation_regex = Regex::new(r"^(ASTM|AASHTO) ([A-Z]+) (\d+)$")
            .context("failed to compile normative designation regex")?;
        let reference_regex = Regex::new(
            r"(?P<authors>[A-Za-zÁ-ÿ\s\.,]+(?:et al\.)?)\s*\((?P<year>\d{4})\)[^.]*\.\s*(?P<title>[^.]*?)\s*\.\s*(?P<source>[^.]*?)(?:\.|$)",
        )
        .context("failed to compile bibliographic reference regex")?;

        Ok(Self {
            norm_regex,
            designation_regex,
            reference_regex,
        })
    }

    /// Codes are stored uppercase with single spaces; an ASTM or AASHTO designation letter is
    /// joined to its number, so `astm d 1557` and `ASTM D1557` collapse into one entry.
    fn extract_norms(&self, raw: &str) -> BTreeSet<String> {
        self.norm_regex
            .find_iter(raw)
            .map(|found| self.normalize_norm(found.as_str()))
            .collect()
    }

    fn normalize_norm(&self, code: &str) -> String {
        let condensed = condense_whitespace(code).to_uppercase();
        self.designation_regex
            .replace(&condensed, "${1} ${2}${3}")
            .into_owned()
    }

    fn extract_references(&self, raw: &str) -> Vec<CitedReference> {
        self.reference_regex
            .captures_iter(raw)
            .filter_map(|captures| {
                let field = |name: &str| {
                    captures
                        .name(name)
                        .map(|value| condense_whitespace(value.as_str()))
                        .unwrap_or_default()
                };

                let reference = CitedReference {
                    authors: field("authors"),
                    year: field("year"),
                    title: field("title"),
                    source: field("source"),
                };
                (!reference.authors.is_empty() && !reference.title.is_empty()).then_some(reference)
            })
            .collect()
    }
}

impl ResponseParser for HeuristicParser {
    fn parse(&self, raw: &str) -> ParsedReport {
        let mut report = ParsedReport {
            norms: self.extract_norms(raw),
            references: self.extract_references(raw),
            ..ParsedReport::default()
        };

        for (section, body) in segment_sections(raw) {
            *report.section_mut(section) = body;
        }

        report
    }
}

#[derive(Debug, Clone, Copy)]
struct HeadingSpan {
    section: Section,
    position: usize,
    start: usize,
    body_start: usize,
}

/// Splits `raw` on the first occurrence of each canonical heading. A section ends where the
/// nearest later heading begins, whatever order the headings were declared in.
pub fn segment_sections(raw: &str) -> Vec<(Section, String)> {
    let spans = Section::ALL
        .iter()
        .filter_map(|section| {
            let heading = section.heading();
            let position = raw.find(heading)?;
            Some(HeadingSpan {
                section: *section,
                position,
                start: decoration_start(raw, position),
                body_start: skip_closing_decoration(raw, position + heading.len()),
            })
        })
        .collect::<Vec<HeadingSpan>>();

    spans
        .iter()
        .map(|span| {
            let end = spans
                .iter()
                .filter(|other| other.position > span.position)
                .map(|other| other.start)
                .min()
                .unwrap_or(raw.len())
                .max(span.body_start);
            (span.section, raw[span.body_start..end].trim().to_string())
        })
        .collect()
}

/// Start of the heading including its line prefix (`**`, `###`, `2.`) when the heading
/// opens its own line.
fn decoration_start(raw: &str, position: usize) -> usize {
    let line_start = raw[..position].rfind('\n').map(|index| index + 1).unwrap_or(0);
    let prefix = &raw[line_start..position];
    let is_decoration = prefix.chars().all(|character| {
        character.is_ascii_digit() || matches!(character, '*' | '#' | '.' | ')' | ' ' | '\t')
    });

    if is_decoration {
        line_start
    } else {
        raw[..position]
            .trim_end_matches(|character: char| matches!(character, '*' | ' ' | '\t'))
            .len()
    }
}

fn skip_closing_decoration(raw: &str, end: usize) -> usize {
    raw.len() - raw[end..].trim_start_matches('*').len()
}
