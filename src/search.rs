use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::SearchError;
use crate::model::AcademicReference;
use crate::util::{condense_whitespace, truncate_chars};

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.crossref.org/works";
const SNIPPET_MAX_CHARS: usize = 300;
const MAX_LISTED_AUTHORS: usize = 3;
const UNKNOWN: &str = "Desconocido";

/// External academic search collaborator.
pub trait SearchProvider {
    fn engine(&self) -> &str;

    fn search(&self, query: &str, limit: usize) -> Result<Vec<AcademicReference>, SearchError>;
}

pub struct CrossrefSearch {
    client: Client,
    endpoint: String,
    tag_regex: Regex,
}

impl CrossrefSearch {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("geotec/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build search http client")?;
        let tag_regex = Regex::new(r"<[^>]+>").context("failed to compile markup tag regex")?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            tag_regex,
        })
    }
}

impl SearchProvider for CrossrefSearch {
    fn engine(&self) -> &str {
        "Crossref"
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<AcademicReference>, SearchError> {
        let rows = limit.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query), ("rows", rows.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body: CrossrefResponse = response
            .json()
            .map_err(|err| SearchError::Decode(err.to_string()))?;

        let references = body
            .message
            .items
            .into_iter()
            .filter_map(|work| work_to_reference(work, query, self.engine(), &self.tag_regex))
            .take(limit)
            .collect::<Vec<AcademicReference>>();

        debug!(query, returned = references.len(), "search query answered");
        Ok(references)
    }
}

#[derive(Debug, Deserialize)]
struct CrossrefResponse {
    message: CrossrefMessage,
}

#[derive(Debug, Deserialize)]
struct CrossrefMessage {
    #[serde(default)]
    items: Vec<CrossrefWork>,
}

#[derive(Debug, Deserialize)]
struct CrossrefWork {
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<CrossrefAuthor>,
    #[serde(default, rename = "container-title")]
    container_title: Vec<String>,
    publisher: Option<String>,
    issued: Option<CrossrefDate>,
    #[serde(rename = "URL")]
    url: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrossrefAuthor {
    given: Option<String>,
    family: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrossrefDate {
    #[serde(default, rename = "date-parts")]
    date_parts: Vec<Vec<Option<i32>>>,
}

fn work_to_reference(
    work: CrossrefWork,
    query: &str,
    engine: &str,
    tag_regex: &Regex,
) -> Option<AcademicReference> {
    let title = work
        .title
        .first()
        .map(|value| condense_whitespace(value))
        .filter(|value| !value.is_empty())?;

    let source = work
        .container_title
        .first()
        .cloned()
        .or(work.publisher)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string());

    let year = work
        .issued
        .as_ref()
        .and_then(|date| date.date_parts.first())
        .and_then(|parts| parts.first().copied().flatten());

    let snippet = work
        .abstract_text
        .as_deref()
        .map(|raw| condense_whitespace(&tag_regex.replace_all(raw, " ")))
        .map(|text| truncate_chars(&text, SNIPPET_MAX_CHARS).to_string())
        .unwrap_or_default();

    Some(AcademicReference {
        title,
        authors: format_authors(&work.author),
        source,
        year,
        snippet,
        url: work.url,
        engine: engine.to_string(),
        query: query.to_string(),
    })
}

fn format_authors(authors: &[CrossrefAuthor]) -> String {
    let names = authors
        .iter()
        .filter_map(|author| match (&author.given, &author.family, &author.name) {
            (Some(given), Some(family), _) => Some(format!("{family}, {given}")),
            (None, Some(family), _) => Some(family.clone()),
            (_, None, Some(name)) => Some(name.clone()),
            _ => None,
        })
        .collect::<Vec<String>>();

    match names.len() {
        0 => UNKNOWN.to_string(),
        count if count > MAX_LISTED_AUTHORS => {
            format!("{} et al.", names[..MAX_LISTED_AUTHORS].join("; "))
        }
        _ => names.join("; "),
    }
}
