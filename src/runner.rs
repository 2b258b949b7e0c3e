// Serial query runner

use crate::executor::QueryExecutor;
use crate::models::{CollectionQuery, Post};

/// Aggregated result of one run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Posts in query-file order, each query's posts ranked by score
    pub posts: Vec<Post>,

    /// Queries that errored and contributed nothing
    pub failed_queries: usize,
}

/// Run every query in order, one request at a time
///
/// A failing query is logged and contributes zero posts; the rest still run.
pub async fn run_queries(
    executor: &QueryExecutor,
    token: &str,
    queries: &[CollectionQuery],
) -> RunSummary {
    let mut summary = RunSummary::default();

    for query in queries {
        tracing::info!(
            "Fetching posts from r/{} with flair '{}'",
            query.subreddit,
            query.flair
        );

        match executor
            .fetch_filtered(&query.subreddit, &query.flair, token)
            .await
        {
            Ok(posts) => {
                tracing::info!(
                    subreddit = %query.subreddit,
                    matches = posts.len(),
                    "Query complete"
                );
                summary.posts.extend(posts);
            }
            Err(e) => {
                tracing::error!(
                    subreddit = %query.subreddit,
                    error_kind = e.kind(),
                    "Query failed, skipping: {}",
                    e
                );
                summary.failed_queries += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::ApiClient;
    use mockito::Matcher;

    fn query(subreddit: &str, flair: &str) -> CollectionQuery {
        CollectionQuery {
            subreddit: subreddit.to_string(),
            flair: flair.to_string(),
        }
    }

    #[tokio::test]
    async fn test_failed_query_does_not_abort_run() {
        let mut server = mockito::Server::new_async().await;
        let broken = server
            .mock("GET", "/r/broken/new.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json at all")
            .expect(1)
            .create_async()
            .await;
        let good = server
            .mock("GET", "/r/good/new.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"data": {"children": [
                    {"data": {"title": "ok", "link_flair_text": "Clip", "permalink": "/r/good/1/", "ups": 1, "is_video": true}}
                ]}}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let executor = QueryExecutor::new(
            ApiClient::new("flairfeed-test/1.0", 5, 5).unwrap(),
            server.url(),
            false,
        );

        let summary = run_queries(
            &executor,
            "test-token",
            &[query("broken", "Clip"), query("good", "Clip"), query("bad name!", "Clip")],
        )
        .await;

        assert_eq!(summary.failed_queries, 2);
        assert_eq!(summary.posts.len(), 1);
        assert_eq!(summary.posts[0].title, "ok");

        broken.assert_async().await;
        good.assert_async().await;
    }

    #[tokio::test]
    async fn test_results_follow_query_order() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/r/first/new.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"data": {"children": [
                    {"data": {"title": "first-low", "link_flair_text": "A", "permalink": "/1/", "ups": 1, "is_video": true}}
                ]}}"#,
            )
            .create_async()
            .await;
        let _mock = server
            .mock("GET", "/r/second/new.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"data": {"children": [
                    {"data": {"title": "second-high", "link_flair_text": "B", "permalink": "/2/", "ups": 1000, "is_video": true}}
                ]}}"#,
            )
            .create_async()
            .await;

        let executor = QueryExecutor::new(
            ApiClient::new("flairfeed-test/1.0", 5, 5).unwrap(),
            server.url(),
            false,
        );

        let summary = run_queries(
            &executor,
            "test-token",
            &[query("first", "A"), query("second", "B")],
        )
        .await;

        // Ranking is per query, not across queries
        let titles: Vec<_> = summary.posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["first-low", "second-high"]);
        assert_eq!(summary.failed_queries, 0);
    }
}
