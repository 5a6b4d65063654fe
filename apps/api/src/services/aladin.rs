use crate::{
    config::Config,
    error::{ApiError, Result},
    models::{
        book::{deserialize_optional_f32, deserialize_optional_i32, NO_AUTHOR, NO_DESCRIPTION, NO_TITLE},
        format_star_rating, BookRecord,
    },
};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use std::borrow::Cow;
use tracing::{debug, error, info, warn};

const ITEM_SEARCH: &str = "ItemSearch.aspx";
const ITEM_LOOKUP: &str = "ItemLookUp.aspx";
const API_VERSION: &str = "20131101";

/// Keyword search against a book catalogue.
#[async_trait]
pub trait BookSearch: Send + Sync {
    /// Books matching `keyword`, in the provider's relevance order.
    async fn search(&self, keyword: &str) -> Result<Vec<BookRecord>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AladinResponse {
    #[serde(default)]
    item: Vec<AladinItem>,
    error_code: Option<serde_json::Value>,
    error_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AladinItem {
    title: Option<String>,
    author: Option<String>,
    publisher: Option<String>,
    description: Option<String>,
    cover: Option<String>,
    isbn13: Option<String>,
    link: Option<String>,
    pub_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    customer_review_rank: Option<i32>,
    sub_info: Option<SubInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubInfo {
    rating_info: Option<RatingInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatingInfo {
    #[serde(default, deserialize_with = "deserialize_optional_f32")]
    rating_score: Option<f32>,
}

impl AladinItem {
    fn rating_score(&self) -> Option<f32> {
        self.sub_info
            .as_ref()
            .and_then(|sub| sub.rating_info.as_ref())
            .and_then(|rating| rating.rating_score)
    }

    fn isbn13(&self) -> Option<&str> {
        self.isbn13.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn into_record(self, star_rating: String) -> BookRecord {
        BookRecord {
            title: text_or(self.title, NO_TITLE),
            author: text_or(self.author, NO_AUTHOR),
            publisher: non_empty(self.publisher),
            description: text_or(self.description, NO_DESCRIPTION),
            cover_url: non_empty(self.cover),
            isbn13: non_empty(self.isbn13),
            link: non_empty(self.link),
            pub_date: non_empty(self.pub_date),
            star_rating,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn text_or(value: Option<String>, fallback: &str) -> String {
    non_empty(value).unwrap_or_else(|| fallback.to_string())
}

/// Rewrite the JavaScript-only `\'` escape to a plain `'` so the body is JSON.
///
/// Other escapes, including `\\`, pass through untouched.
fn relax_js_escapes(body: &str) -> Cow<'_, str> {
    if !body.contains("\\'") {
        return Cow::Borrowed(body);
    }

    let mut relaxed = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            relaxed.push(c);
            continue;
        }
        match chars.next() {
            Some('\'') => relaxed.push('\''),
            Some(escaped) => {
                relaxed.push('\\');
                relaxed.push(escaped);
            }
            None => relaxed.push('\\'),
        }
    }
    Cow::Owned(relaxed)
}

/// Decode an Aladin `output=js` body.
///
/// The provider reports failures such as a bad TTB key inside a 200 response,
/// and some endpoints terminate the JSON with a stray `;`.
fn parse_response(body: &str) -> std::result::Result<AladinResponse, String> {
    let json = relax_js_escapes(body.trim().trim_end_matches(';').trim_end());
    let response: AladinResponse =
        serde_json::from_str(&json).map_err(|e| format!("알라딘 응답을 해석하지 못했습니다: {}", e))?;

    if response.error_code.is_some() || response.error_message.is_some() {
        let code = response
            .error_code
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "?".to_string());
        let message = response.error_message.as_deref().unwrap_or("알 수 없는 오류");
        return Err(format!("알라딘 오류 {}: {}", code, message));
    }

    Ok(response)
}

fn excerpt(body: &str) -> String {
    body.chars().take(200).collect()
}

#[derive(Debug, Clone)]
pub struct AladinClient {
    client: Client,
    base_url: String,
    ttb_key: String,
    max_results: u32,
}

impl AladinClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::InternalError(format!("HTTP 클라이언트를 만들지 못했습니다: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.aladin_base_url.clone(),
            ttb_key: config.aladin_ttbkey.clone(),
            max_results: config.aladin_max_results,
        })
    }

    fn search_params(&self, keyword: &str) -> Vec<(&'static str, String)> {
        vec![
            ("ttbkey", self.ttb_key.clone()),
            ("Query", keyword.to_string()),
            ("QueryType", "Keyword".to_string()),
            ("MaxResults", self.max_results.to_string()),
            ("SearchTarget", "Book".to_string()),
            ("output", "js".to_string()),
            ("Version", API_VERSION.to_string()),
            ("Cover", "MidBig".to_string()),
        ]
    }

    fn lookup_params(&self, isbn13: &str) -> Vec<(&'static str, String)> {
        vec![
            ("ttbkey", self.ttb_key.clone()),
            ("itemId", isbn13.to_string()),
            ("ItemIdType", "ISBN13".to_string()),
            ("output", "js".to_string()),
            ("Version", API_VERSION.to_string()),
            ("OptResult", "ratingInfo".to_string()),
        ]
    }

    /// GET an Aladin endpoint and return the body of a successful response.
    ///
    /// Errors never carry the request URL, which includes the TTB key.
    async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> std::result::Result<String, String> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| format!("알라딘 서버와 통신 중 오류가 발생했습니다: {}", e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("알라딘 응답을 읽지 못했습니다: {}", e.without_url()))?;

        if !status.is_success() {
            return Err(format!("알라딘 서버가 {} 상태로 응답했습니다: {}", status, excerpt(&body)));
        }

        Ok(body)
    }

    async fn lookup(&self, isbn13: &str) -> std::result::Result<Option<AladinItem>, String> {
        let body = self.fetch(ITEM_LOOKUP, &self.lookup_params(isbn13)).await?;
        Ok(parse_response(&body)?.item.into_iter().next())
    }

    /// Rating text for one search hit. Lookup failures only cost the rating.
    async fn star_rating(&self, item: &AladinItem) -> String {
        let Some(isbn13) = item.isbn13() else {
            return format_star_rating(None, item.customer_review_rank);
        };

        match self.lookup(isbn13).await {
            Ok(Some(detail)) => format_star_rating(
                detail.rating_score(),
                detail.customer_review_rank.or(item.customer_review_rank),
            ),
            Ok(None) => format_star_rating(None, item.customer_review_rank),
            Err(e) => {
                warn!("Aladin detail lookup failed (ISBN13: {}): {}", isbn13, e);
                format_star_rating(None, item.customer_review_rank)
            }
        }
    }
}

#[async_trait]
impl BookSearch for AladinClient {
    async fn search(&self, keyword: &str) -> Result<Vec<BookRecord>> {
        info!("Searching Aladin for '{}'", keyword);

        let body = self
            .fetch(ITEM_SEARCH, &self.search_params(keyword))
            .await
            .map_err(|e| {
                error!("Aladin search request failed: {}", e);
                ApiError::SearchFailed(e)
            })?;

        let items = parse_response(&body)
            .map_err(|e| {
                error!("Aladin search response rejected: {}", e);
                ApiError::SearchFailed(e)
            })?
            .item;

        if items.is_empty() {
            warn!("No Aladin results for '{}'", keyword);
            return Ok(Vec::new());
        }

        debug!("Looking up ratings for {} books", items.len());
        let ratings = join_all(items.iter().map(|item| self.star_rating(item))).await;

        let books: Vec<BookRecord> = items
            .into_iter()
            .zip(ratings)
            .map(|(item, rating)| item.into_record(rating))
            .collect();

        info!("Aladin returned {} books for '{}'", books.len(), keyword);
        Ok(books)
    }
}
