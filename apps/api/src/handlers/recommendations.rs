use crate::{
    error::ApiError,
    models::{RecommendationRequest, RecommendationResponse},
    services::{Curation, CuratorService},
};
use actix_web::{
    web::{self, Json},
    HttpResponse,
};

pub fn recommendations_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/recommendations").route(web::post().to(get_recommendations)));
}

impl From<Curation> for RecommendationResponse {
    fn from(curation: Curation) -> Self {
        match curation {
            Curation::NoResults { keyword } => Self {
                keyword,
                books: Vec::new(),
                recommendation: None,
                recommended_title: None,
                error: None,
            },
            Curation::Recommended {
                keyword,
                books,
                recommendation,
            } => {
                let recommended_title = recommendation
                    .featured(&books)
                    .map(|book| book.title.clone());
                Self {
                    keyword,
                    books,
                    recommendation: Some(recommendation.text),
                    recommended_title,
                    error: None,
                }
            }
            Curation::RecommendationUnavailable {
                keyword,
                books,
                message,
            } => Self {
                keyword,
                books,
                recommendation: None,
                recommended_title: None,
                error: Some(message),
            },
        }
    }
}

/// Get a book recommendation for a keyword
///
/// Missing input answers 400 and a failed search 502, both as
/// `{"error": ...}`. A failed AI call still answers 200 with the books and
/// the failure in `error`.
pub async fn get_recommendations(
    request: Json<RecommendationRequest>,
    curator: web::Data<CuratorService>,
) -> Result<HttpResponse, ApiError> {
    let curation = curator.curate(&request.keyword).await?;

    Ok(HttpResponse::Ok().json(RecommendationResponse::from(curation)))
}
