use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

pub const NO_TITLE: &str = "제목 없음";
pub const NO_AUTHOR: &str = "저자 없음";
pub const NO_DESCRIPTION: &str = "설명 없음";
pub const NO_RATING: &str = "별점 정보 없음";

/// Accepts `9.5`, `"9.5"`, `""` or `null`.
pub(crate) fn deserialize_optional_f32<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrFloat {
        String(String),
        Float(f32),
        Null,
    }

    match StringOrFloat::deserialize(deserializer)? {
        StringOrFloat::String(s) => {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                f32::from_str(s.trim())
                    .map(Some)
                    .map_err(serde::de::Error::custom)
            }
        }
        StringOrFloat::Float(f) => Ok(Some(f)),
        StringOrFloat::Null => Ok(None),
    }
}

pub(crate) fn deserialize_optional_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        String(String),
        Int(i32),
        Null,
    }

    match StringOrInt::deserialize(deserializer)? {
        StringOrInt::String(s) => {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                i32::from_str(s.trim())
                    .map(Some)
                    .map_err(serde::de::Error::custom)
            }
        }
        StringOrInt::Int(i) => Ok(Some(i)),
        StringOrInt::Null => Ok(None),
    }
}

/// One book as returned by the search provider, in the provider's order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    pub publisher: Option<String>,
    pub description: String,
    pub cover_url: Option<String>,
    pub isbn13: Option<String>,
    pub link: Option<String>,
    pub pub_date: Option<String>,
    pub star_rating: String,
}

impl BookRecord {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            publisher: None,
            description: NO_DESCRIPTION.to_string(),
            cover_url: None,
            isbn13: None,
            link: None,
            pub_date: None,
            star_rating: NO_RATING.to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn with_cover_url(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = Some(cover_url.into());
        self
    }

    pub fn with_star_rating(mut self, star_rating: impl Into<String>) -> Self {
        self.star_rating = star_rating.into();
        self
    }
}

/// Human readable rating text.
///
/// A positive rating score from the detail lookup wins, then a positive
/// customer review rank, then the "no rating" placeholder.
pub fn format_star_rating(rating_score: Option<f32>, review_rank: Option<i32>) -> String {
    match (rating_score, review_rank) {
        (Some(score), _) if score > 0.0 => format!("{:.1} / 10.0", score),
        (_, Some(rank)) if rank > 0 => format!("{} / 10", rank),
        _ => NO_RATING.to_string(),
    }
}
