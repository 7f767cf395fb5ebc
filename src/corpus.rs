use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::util::truncate_chars;

pub const EXCERPT_MAX_CHARS: usize = 5000;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Partition {
    Normatives,
    Articles,
}

impl Partition {
    pub const ALL: [Partition; 2] = [Self::Normatives, Self::Articles];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normatives => "normatives",
            Self::Articles => "articles",
        }
    }
}

/// Read-only document excerpts, keyed by file name and ordered by it.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeCorpus {
    normatives: BTreeMap<String, String>,
    articles: BTreeMap<String, String>,
}

impl KnowledgeCorpus {
    pub fn load(normatives_dir: &Path, articles_dir: &Path) -> Self {
        let corpus = Self::from_partitions(
            load_documents(normatives_dir),
            load_documents(articles_dir),
        );

        info!(
            normatives = corpus.normatives.len(),
            articles = corpus.articles.len(),
            "knowledge corpus loaded"
        );
        corpus
    }

    pub fn from_partitions(
        normatives: BTreeMap<String, String>,
        articles: BTreeMap<String, String>,
    ) -> Self {
        Self {
            normatives,
            articles,
        }
    }

    pub fn partition(&self, partition: Partition) -> &BTreeMap<String, String> {
        match partition {
            Partition::Normatives => &self.normatives,
            Partition::Articles => &self.articles,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "md" => Some(Self::PlainText),
            _ => None,
        }
    }
}

/// Loads every supported document in `folder`. A missing folder yields an empty map.
pub fn load_documents(folder: &Path) -> BTreeMap<String, String> {
    let mut documents = BTreeMap::new();

    if !folder.is_dir() {
        warn!(path = %folder.display(), "corpus folder not found");
        return documents;
    }

    let paths = match discover_documents(folder) {
        Ok(paths) => paths,
        Err(err) => {
            warn!(path = %folder.display(), error = %err, "failed to list corpus folder");
            return documents;
        }
    };

    for path in paths {
        let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
            warn!(path = %path.display(), "skipping corpus document with non UTF-8 name");
            continue;
        };

        match read_document_text(&path) {
            Ok(text) => {
                documents.insert(
                    filename.to_string(),
                    truncate_chars(&text, EXCERPT_MAX_CHARS).to_string(),
                );
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable corpus document");
            }
        }
    }

    documents
}

pub fn discover_documents(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    let entries =
        fs::read_dir(folder).with_context(|| format!("failed to read {}", folder.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", folder.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        if DocumentKind::from_path(&path).is_some() {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

pub fn read_document_text(path: &Path) -> Result<String> {
    match DocumentKind::from_path(path) {
        Some(DocumentKind::Pdf) => extract_text_with_pdftotext(path),
        Some(DocumentKind::PlainText) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => bail!("unsupported corpus document: {}", path.display()),
    }
}

fn extract_text_with_pdftotext(pdf_path: &Path) -> Result<String> {
    let output = Command::new("pdftotext")
        .arg("-enc")
        .arg("UTF-8")
        .arg(pdf_path)
        .arg("-")
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    Ok(raw
        .split('\u{000C}')
        .map(|page| page.replace('\u{0000}', ""))
        .collect::<Vec<String>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_folder_yields_empty_partition() {
        let dir = tempfile::tempdir().expect("tempdir");
        let documents = load_documents(&dir.path().join("normas"));
        assert!(documents.is_empty());
    }

    #[test]
    fn text_documents_are_capped_and_sorted_by_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("b_articulo.txt"), "é".repeat(EXCERPT_MAX_CHARS + 50))
            .expect("write");
        fs::write(dir.path().join("a_norma.md"), "ASTM D1557 compactación").expect("write");
        fs::write(dir.path().join("ignored.docx"), "binary").expect("write");

        let documents = load_documents(dir.path());
        let names = documents.keys().cloned().collect::<Vec<String>>();
        assert_eq!(names, vec!["a_norma.md", "b_articulo.txt"]);
        assert_eq!(documents["b_articulo.txt"].chars().count(), EXCERPT_MAX_CHARS);
        assert_eq!(documents["a_norma.md"], "ASTM D1557 compactación");
    }
}
