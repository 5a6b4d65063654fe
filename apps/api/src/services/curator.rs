use crate::{
    error::{ApiError, Result},
    models::{BookRecord, Recommendation},
    services::{templates::build_prompt, BookSearch, Recommender},
};
use std::sync::Arc;
use tracing::{info, warn};

/// Result of one keyword's trip through search and recommendation.
#[derive(Debug, Clone, PartialEq)]
pub enum Curation {
    /// The search succeeded but found nothing, so the AI was not asked.
    NoResults { keyword: String },
    Recommended {
        keyword: String,
        books: Vec<BookRecord>,
        recommendation: Recommendation,
    },
    /// Books were found but the AI call failed.
    RecommendationUnavailable {
        keyword: String,
        books: Vec<BookRecord>,
        message: String,
    },
}

impl Curation {
    pub fn keyword(&self) -> &str {
        match self {
            Curation::NoResults { keyword }
            | Curation::Recommended { keyword, .. }
            | Curation::RecommendationUnavailable { keyword, .. } => keyword,
        }
    }

    pub fn books(&self) -> &[BookRecord] {
        match self {
            Curation::NoResults { .. } => &[],
            Curation::Recommended { books, .. }
            | Curation::RecommendationUnavailable { books, .. } => books,
        }
    }
}

/// Keyword → book search → AI recommendation, strictly in that order.
#[derive(Clone)]
pub struct CuratorService {
    search: Arc<dyn BookSearch>,
    recommender: Arc<dyn Recommender>,
}

impl CuratorService {
    pub fn new(search: Arc<dyn BookSearch>, recommender: Arc<dyn Recommender>) -> Self {
        Self {
            search,
            recommender,
        }
    }

    /// Run the pipeline for one keyword.
    ///
    /// Missing input and search failures are errors; a failed recommendation
    /// is not, because the books found so far are still worth showing.
    pub async fn curate(&self, keyword: &str) -> Result<Curation> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ApiError::MissingInput);
        }
        let keyword = keyword.to_string();

        let books = self.search.search(&keyword).await?;
        if books.is_empty() {
            info!("No books found for '{}'", keyword);
            return Ok(Curation::NoResults { keyword });
        }

        let prompt = build_prompt(&keyword, &books);
        match self.recommender.recommend(&prompt).await {
            Ok(text) => {
                let recommendation = Recommendation::parse(text);
                if recommendation.featured(&books).is_none() {
                    warn!(
                        "Recommended title {:?} does not match any of the {} listed books",
                        recommendation.title,
                        books.len()
                    );
                }
                Ok(Curation::Recommended {
                    keyword,
                    books,
                    recommendation,
                })
            }
            Err(e) => Ok(Curation::RecommendationUnavailable {
                keyword,
                books,
                message: e.to_string(),
            }),
        }
    }
}
