// Listing query executor
// Fetches one page of new posts for a subreddit, filters by flair and ranks by score

use crate::error::{FeedError, Result};
use crate::http_client::ApiClient;
use crate::models::{Listing, Post, RawPost};

/// Posts requested per listing page
pub const LISTING_PAGE_SIZE: u32 = 20;

/// Executes flair-filtered listing queries against the OAuth API host
#[derive(Clone, Debug)]
pub struct QueryExecutor {
    api: ApiClient,

    /// e.g. `https://oauth.reddit.com`
    api_base_url: String,

    /// Keep flair matches that are not videos
    include_non_media: bool,
}

impl QueryExecutor {
    pub fn new(api: ApiClient, api_base_url: impl Into<String>, include_non_media: bool) -> Self {
        Self {
            api,
            api_base_url: api_base_url.into(),
            include_non_media,
        }
    }

    /// Listing URL for a subreddit's newest posts
    fn listing_url(&self, subreddit: &str) -> Result<String> {
        let subreddit = subreddit.trim();
        if subreddit.is_empty()
            || !subreddit
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '+')
        {
            return Err(FeedError::RequestBuild(format!(
                "Invalid subreddit name: {:?}",
                subreddit
            )));
        }

        Ok(format!(
            "{}/r/{}/new.json",
            self.api_base_url.trim_end_matches('/'),
            subreddit
        ))
    }

    /// Fetch one page of posts from `subreddit`, keep those tagged `flair`, sorted by score
    pub async fn fetch_filtered(&self, subreddit: &str, flair: &str, token: &str) -> Result<Vec<Post>> {
        let token = token.trim();
        if token.is_empty() {
            return Err(FeedError::RequestBuild("Access token is empty".to_string()));
        }

        let url = self.listing_url(subreddit)?;
        let search = format!("flair_name:\"{}\"", flair);
        let limit = LISTING_PAGE_SIZE.to_string();

        let request = self
            .api
            .client()
            .get(&url)
            .query(&[
                ("q", search.as_str()),
                ("restrict_sr", "on"),
                ("limit", limit.as_str()),
            ])
            .header("Authorization", format!("bearer {}", token))
            .build()
            .map_err(|e| FeedError::RequestBuild(e.to_string()))?;

        let response = self.api.execute(request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| FeedError::Network(format!("Failed to read listing body: {}", e)))?;

        let listing: Listing = serde_json::from_str(&body)
            .map_err(|e| FeedError::Parse(format!("Invalid listing from r/{}: {}", subreddit, e)))?;

        let raw_posts = listing.into_posts();
        let fetched = raw_posts.len();
        let posts = filter_and_rank(raw_posts, flair, self.include_non_media);

        tracing::debug!(
            subreddit = subreddit,
            flair = flair,
            fetched = fetched,
            kept = posts.len(),
            "Listing filtered"
        );

        Ok(posts)
    }
}

/// Keep posts whose flair equals `flair` exactly (and that are videos unless
/// `include_non_media`), ordered by score descending. Equal scores keep server order.
pub fn filter_and_rank(raw_posts: Vec<RawPost>, flair: &str, include_non_media: bool) -> Vec<Post> {
    let mut posts: Vec<Post> = raw_posts
        .into_iter()
        .map(Post::from)
        .filter(|post| post.flair == flair && (include_non_media || post.is_media))
        .collect();

    // sort_by is stable
    posts.sort_by(|a, b| b.score.cmp(&a.score));
    posts
}
