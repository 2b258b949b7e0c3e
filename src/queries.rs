// Query list loading
// Reads `[{"subreddit": "...", "search_query": "flair_name:\"...\""}]`

use serde::Deserialize;
use std::path::Path;

use crate::error::{FeedError, Result};
use crate::models::CollectionQuery;

const FLAIR_PREFIX: &str = "flair_name:";

#[derive(Debug, Deserialize)]
struct QueryEntry {
    subreddit: String,
    search_query: String,
}

/// Strip the `flair_name:` prefix and surrounding quotes from a search query
pub fn parse_flair(search_query: &str) -> String {
    let trimmed = search_query.trim();
    let value = trimmed.strip_prefix(FLAIR_PREFIX).unwrap_or(trimmed);
    value.trim_matches('"').to_string()
}

/// Parse a query list from JSON text
pub fn parse_queries(json: &str) -> Result<Vec<CollectionQuery>> {
    let entries: Vec<QueryEntry> = serde_json::from_str(json)
        .map_err(|e| FeedError::ConfigLoad(format!("Invalid query list: {}", e)))?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let subreddit = entry.subreddit.trim().trim_start_matches("r/").to_string();
            if subreddit.is_empty() {
                return Err(FeedError::ConfigLoad(format!(
                    "Query #{} has an empty subreddit",
                    index + 1
                )));
            }

            Ok(CollectionQuery {
                subreddit,
                flair: parse_flair(&entry.search_query),
            })
        })
        .collect()
}

/// Load the query list from disk
pub fn load_queries(path: &Path) -> Result<Vec<CollectionQuery>> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        FeedError::ConfigLoad(format!(
            "Failed to read query list {}: {}",
            path.display(),
            e
        ))
    })?;

    let queries = parse_queries(&json)?;
    tracing::info!("Loaded {} queries from {}", queries.len(), path.display());
    Ok(queries)
}
