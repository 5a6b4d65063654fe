use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("검색어를 입력해주세요")]
    MissingInput,

    #[error("도서 검색에 실패했습니다: {0}")]
    SearchFailed(String),

    #[error("AI 추천 생성에 실패했습니다: {0}")]
    RecommendationFailed(String),

    #[error("필수 설정이 없습니다: 환경 변수 {0}을(를) 설정해주세요")]
    ConfigurationMissing(String),

    #[error("잘못된 설정입니다: {0}")]
    InvalidConfiguration(String),

    #[error("내부 서버 오류가 발생했습니다: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingInput => StatusCode::BAD_REQUEST,
            ApiError::SearchFailed(_) | ApiError::RecommendationFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::InvalidConfiguration(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_failures_map_to_bad_gateway() {
        assert_eq!(
            ApiError::SearchFailed("down".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::RecommendationFailed("empty".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_missing_input_is_bad_request() {
        let response = ApiError::MissingInput.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_configuration_missing_names_variable() {
        let err = ApiError::ConfigurationMissing("ALADIN_TTBKEY".into());
        assert!(err.to_string().contains("ALADIN_TTBKEY"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_messages_are_korean_only() {
        let errors = [
            ApiError::MissingInput,
            ApiError::SearchFailed(String::new()),
            ApiError::RecommendationFailed(String::new()),
            ApiError::ConfigurationMissing(String::new()),
            ApiError::InvalidConfiguration(String::new()),
            ApiError::InternalError(String::new()),
        ];
        for err in errors {
            let message = err.to_string();
            assert!(
                !message.chars().any(|c| c.is_ascii_alphabetic()),
                "untranslated message: {}",
                message
            );
        }
        assert_eq!(
            ApiError::SearchFailed("x".into()).to_string(),
            "도서 검색에 실패했습니다: x"
        );
    }
}
