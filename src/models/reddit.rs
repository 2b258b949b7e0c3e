use serde::Deserialize;

// ==================================================================================================
// Listing Models
// ==================================================================================================

/// Listing envelope: `{"kind": "Listing", "data": {"children": [...]}}`
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<ListingChild>,
}

/// Wrapper record, `{"kind": "t3", "data": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ListingChild {
    pub data: RawPost,
}

/// Post fields as reported by the API
///
/// Absent fields fall back to defaults; `link_flair_text` is `null` for unflaired posts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPost {
    pub title: String,
    pub link_flair_text: Option<String>,
    pub permalink: String,
    pub ups: i64,
    pub is_video: bool,
}

impl Listing {
    pub fn into_posts(self) -> Vec<RawPost> {
        self.data.children.into_iter().map(|child| child.data).collect()
    }
}

// ==================================================================================================
// Domain Models
// ==================================================================================================

/// A post that passed the flair filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub title: String,
    pub flair: String,
    pub permalink: String,
    pub score: i64,
    pub is_media: bool,
}

impl From<RawPost> for Post {
    fn from(raw: RawPost) -> Self {
        Self {
            title: raw.title,
            flair: raw.link_flair_text.unwrap_or_default(),
            permalink: raw.permalink,
            score: raw.ups,
            is_media: raw.is_video,
        }
    }
}

/// One subreddit + flair pair from the query list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    pub subreddit: String,
    pub flair: String,
}
