use serde::{Deserialize, Serialize};

pub use book::{format_star_rating, BookRecord};
pub use recommendation::Recommendation;

pub mod book;
mod recommendation;

/// Form body of the HTML page, and query string of `GET /recommend`.
///
/// `keyword` defaults to empty so a missing field is reported as missing
/// input instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordForm {
    #[serde(default)]
    pub keyword: String,
}

/// Request structure for `POST /api/recommendations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub keyword: String,
}

/// Response structure for `POST /api/recommendations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub keyword: String,
    /// Books in the search provider's order
    pub books: Vec<BookRecord>,
    /// Raw text from the AI provider, absent when it was not called or failed
    pub recommendation: Option<String>,
    /// Listed title the recommendation resolved to
    pub recommended_title: Option<String>,
    /// Why no recommendation is present
    pub error: Option<String>,
}

/// Health check response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in RFC3339 format
    pub timestamp: String,
}
