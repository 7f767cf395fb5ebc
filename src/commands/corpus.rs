use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::{CorpusArgs, CorpusInventoryArgs};
use crate::corpus::{EXCERPT_MAX_CHARS, Partition, discover_documents, read_document_text};
use crate::model::{CorpusEntry, CorpusInventoryManifest};
use crate::util::{now_utc_string, sha256_file, truncate_chars, write_json_pretty};

pub fn run(args: CorpusInventoryArgs) -> Result<()> {
    let manifest = build_manifest(&args.corpus)?;

    for entry in &manifest.documents {
        println!(
            "{:<10}  {:>10}  {}  {}",
            entry.partition, entry.bytes, entry.sha256, entry.filename
        );
    }

    if let Some(manifest_path) = &args.manifest_path {
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote corpus manifest");
    }

    info!(
        document_count = manifest.document_count,
        "corpus inventory completed"
    );
    Ok(())
}

pub fn build_manifest(args: &CorpusArgs) -> Result<CorpusInventoryManifest> {
    let mut documents = Vec::new();

    for partition in Partition::ALL {
        let folder = match partition {
            Partition::Normatives => &args.normatives_dir,
            Partition::Articles => &args.articles_dir,
        };
        documents.extend(inventory_partition(partition, folder)?);
    }

    Ok(CorpusInventoryManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        normatives_dir: args.normatives_dir.display().to_string(),
        articles_dir: args.articles_dir.display().to_string(),
        document_count: documents.len(),
        documents,
    })
}

fn inventory_partition(partition: Partition, folder: &Path) -> Result<Vec<CorpusEntry>> {
    if !folder.is_dir() {
        warn!(
            partition = partition.as_str(),
            path = %folder.display(),
            "corpus folder not found"
        );
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for path in discover_documents(folder)? {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToOwned::to_owned)
            .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))?;

        let bytes = fs::metadata(&path)
            .with_context(|| format!("failed to stat {}", path.display()))?
            .len();
        let sha256 = sha256_file(&path)?;

        let excerpt_chars = match read_document_text(&path) {
            Ok(text) => truncate_chars(&text, EXCERPT_MAX_CHARS).chars().count(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "document text unavailable");
                0
            }
        };

        entries.push(CorpusEntry {
            partition: partition.as_str().to_string(),
            filename,
            bytes,
            sha256,
            excerpt_chars,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_lists_both_partitions_in_name_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let normatives_dir = dir.path().join("normas");
        fs::create_dir_all(&normatives_dir).expect("create normas");
        fs::write(normatives_dir.join("b_norma.txt"), "ASTM D698").expect("write");
        fs::write(normatives_dir.join("a_norma.md"), "x".repeat(6000)).expect("write");
        fs::write(normatives_dir.join("ignorada.docx"), "binario").expect("write");

        let args = CorpusArgs {
            normatives_dir,
            articles_dir: dir.path().join("articulos"),
        };
        let manifest = build_manifest(&args).expect("manifest");

        assert_eq!(manifest.document_count, 2);
        assert_eq!(manifest.documents[0].filename, "a_norma.md");
        assert_eq!(manifest.documents[0].partition, "normatives");
        assert_eq!(manifest.documents[0].bytes, 6000);
        assert_eq!(manifest.documents[0].excerpt_chars, EXCERPT_MAX_CHARS);
        assert_eq!(manifest.documents[1].excerpt_chars, 9);
        assert_eq!(manifest.documents[1].sha256.len(), 64);
    }
}
