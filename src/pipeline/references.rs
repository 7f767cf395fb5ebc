use std::collections::HashSet;

use tracing::{info, warn};

use crate::model::AcademicReference;
use crate::search::SearchProvider;

pub const RESULTS_PER_QUERY: usize = 5;
pub const MAX_REFERENCES: usize = 10;

/// Runs every query in order, absorbing per-query failures, then deduplicates by exact title
/// keeping the first occurrence and truncates to [`MAX_REFERENCES`].
pub fn resolve_references(
    provider: &dyn SearchProvider,
    queries: &[String],
) -> Vec<AcademicReference> {
    let mut collected = Vec::new();

    for query in queries {
        match provider.search(query, RESULTS_PER_QUERY) {
            Ok(mut results) => {
                results.truncate(RESULTS_PER_QUERY);
                collected.extend(results);
            }
            Err(err) => {
                warn!(
                    engine = provider.engine(),
                    query = %query,
                    error = %err,
                    "academic search failed; continuing without results"
                );
            }
        }
    }

    let unique = dedupe_by_title(collected, MAX_REFERENCES);
    info!(
        engine = provider.engine(),
        queries = queries.len(),
        references = unique.len(),
        "academic references resolved"
    );
    unique
}

fn dedupe_by_title(references: Vec<AcademicReference>, limit: usize) -> Vec<AcademicReference> {
    let mut seen_titles = HashSet::<String>::new();
    references
        .into_iter()
        .filter(|reference| seen_titles.insert(reference.title.clone()))
        .take(limit)
        .collect()
}
