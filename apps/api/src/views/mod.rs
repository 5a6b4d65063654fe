//! Server-rendered HTML for the keyword form and its results.
//!
//! Rendering is a pure function of its inputs: the same curation always
//! produces the same bytes.

use crate::{
    error::ApiError,
    models::{BookRecord, Recommendation},
    services::Curation,
};
use std::fmt::Write;

const STYLE: &str = "\
body{font-family:-apple-system,'Apple SD Gothic Neo','Noto Sans KR',sans-serif;background:#f6f3ee;color:#222;margin:0}
main{max-width:820px;margin:0 auto;padding:32px 20px}
form{display:flex;flex-wrap:wrap;gap:8px;margin:24px 0}
form label{width:100%;font-weight:600}
form input{flex:1;min-width:220px;padding:10px;border:1px solid #ccc;border-radius:8px}
form button{padding:10px 16px;border:0;border-radius:8px;background:#4b3f72;color:#fff;cursor:pointer}
.info{color:#555;font-size:.9em}
.notice{padding:12px 16px;border-radius:8px;margin:16px 0}
.notice.warning{background:#fff4d6}
.notice.error{background:#fde2e1}
.result-container{background:rgba(255,255,255,.9);border-radius:15px;padding:25px;box-shadow:0 6px 12px rgba(0,0,0,.15);border:1px solid #eee}
.result-container img{float:left;max-width:180px;margin:0 20px 12px 0}
.result-container details{clear:both}
.ai-reply pre{white-space:pre-wrap;background:#fff;padding:12px;border-radius:8px}
.books ol{padding-left:20px}
.books li{margin:12px 0;overflow:hidden}
.books img{float:left;width:60px;margin-right:12px}";

/// Static details shown on every page.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// AI model name shown in the header
    pub model: String,
}

/// What the page should show below the form.
#[derive(Debug, Clone, Copy)]
pub enum PageState<'a> {
    Empty,
    Curated(&'a Curation),
    Failed {
        keyword: &'a str,
        error: &'a ApiError,
    },
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Full HTML document. `model` is the AI model name shown in the header.
pub fn render_page(state: PageState<'_>, model: &str) -> String {
    let keyword = match state {
        PageState::Empty => "",
        PageState::Curated(curation) => curation.keyword(),
        PageState::Failed { keyword, .. } => keyword,
    };

    let mut body = String::new();
    match state {
        PageState::Empty => {}
        PageState::Failed { error, .. } => render_error(&mut body, error),
        PageState::Curated(Curation::NoResults { keyword }) => notice(
            &mut body,
            "error",
            &format!(
                "'{}'(와)과 관련된 책을 찾지 못했습니다. 다른 키워드로 다시 시도해주세요.",
                keyword
            ),
        ),
        PageState::Curated(Curation::Recommended {
            books,
            recommendation,
            ..
        }) => {
            render_recommendation(&mut body, recommendation, books);
            render_book_list(&mut body, books);
        }
        PageState::Curated(Curation::RecommendationUnavailable { books, message, .. }) => {
            notice(
                &mut body,
                "error",
                &format!("AI 추천을 가져오지 못했습니다: {}", message),
            );
            render_book_list(&mut body, books);
        }
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>AI 북 큐레이터</title>\n<style>\n{style}\n</style>\n</head>\n<body>\n<main>\n\
         <h1>📚 AI 북 큐레이터</h1>\n\
         <p class=\"info\">ℹ️ 알라딘 API와 Gemini {model} 모델로 추천합니다</p>\n\
         <form method=\"post\" action=\"/recommend\">\n\
         <label for=\"keyword\">어떤 책을 추천해 드릴까요?</label>\n\
         <input id=\"keyword\" name=\"keyword\" value=\"{keyword}\" \
         placeholder=\"키워드로 입력해주세요. 예: 사랑, 행복, 우주...\">\n\
         <button type=\"submit\">나만을 위한 책 추천받기</button>\n</form>\n\
         {body}</main>\n</body>\n</html>\n",
        style = STYLE,
        model = escape_html(model),
        keyword = escape_html(keyword),
        body = body,
    )
}

fn notice(out: &mut String, kind: &str, message: &str) {
    let _ = writeln!(
        out,
        "<div class=\"notice {}\">{}</div>",
        kind,
        escape_html(message)
    );
}

fn render_error(out: &mut String, error: &ApiError) {
    match error {
        ApiError::MissingInput => notice(
            out,
            "warning",
            "추천받고 싶은 책에 대한 내용을 입력해주세요!",
        ),
        other => notice(out, "error", &format!("오류가 발생했습니다: {}", other)),
    }
}

fn render_recommendation(out: &mut String, recommendation: &Recommendation, books: &[BookRecord]) {
    match recommendation.featured(books) {
        Some(book) => {
            let reason = recommendation
                .reason
                .as_deref()
                .unwrap_or(&recommendation.text);

            out.push_str("<article class=\"result-container\">\n<h2>✨ 당신을 위한 추천 도서 ✨</h2>\n");
            if let Some(cover) = &book.cover_url {
                let _ = writeln!(
                    out,
                    "<img src=\"{}\" alt=\"{}\">",
                    escape_html(cover),
                    escape_html(&book.title)
                );
            }
            let _ = writeln!(
                out,
                "<h3>{}</h3>\n<p><b>✍️ 저자:</b> {}</p>\n<p><b>⭐ 알라딘 별점:</b> {}</p>\n\
                 <p><b>💬 AI의 추천사:</b> <em>{}</em></p>\n\
                 <details><summary>📖 책 소개 더 보기</summary><p>{}</p></details>\n</article>",
                escape_html(&book.title),
                escape_html(&book.author),
                escape_html(&book.star_rating),
                escape_html(reason),
                escape_html(&book.description),
            );
        }
        None => notice(
            out,
            "error",
            "추천 결과를 처리하는 중 문제가 발생했습니다. AI의 추천 도서를 목록에서 찾을 수 없습니다.",
        ),
    }

    let _ = writeln!(
        out,
        "<section class=\"ai-reply\">\n<h3>🤖 AI 원문 응답</h3>\n<pre>{}</pre>\n</section>",
        escape_html(&recommendation.text)
    );
}

fn render_book_list(out: &mut String, books: &[BookRecord]) {
    out.push_str("<section class=\"books\">\n<h2>검색된 도서</h2>\n<ol>\n");
    for book in books {
        out.push_str("<li>");
        if let Some(cover) = &book.cover_url {
            let _ = write!(out, "<img src=\"{}\" alt=\"\">", escape_html(cover));
        }
        let _ = write!(
            out,
            "<strong class=\"title\">{}</strong><br>{}",
            escape_html(&book.title),
            escape_html(&book.author)
        );
        if let Some(publisher) = &book.publisher {
            let _ = write!(out, " · {}", escape_html(publisher));
        }
        let _ = writeln!(out, "<br>⭐ {}</li>", escape_html(&book.star_rating));
    }
    out.push_str("</ol>\n</section>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn books() -> Vec<BookRecord> {
        vec![
            BookRecord::new("해리 포터와 마법사의 돌", "J.K. 롤링")
                .with_cover_url("https://image.aladin.co.kr/1.jpg")
                .with_publisher("문학수첩"),
            BookRecord::new("해리 포터와 비밀의 방", "J.K. 롤링"),
        ]
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape_html("사랑"), "사랑");
    }

    #[test]
    fn test_empty_page_has_form_only() {
        let html = render_page(PageState::Empty, "gemini-1.5-flash");
        assert!(html.contains("<form method=\"post\" action=\"/recommend\">"));
        assert!(html.contains("Gemini gemini-1.5-flash"));
        assert!(!html.contains("class=\"notice"));
    }

    #[test]
    fn test_featured_card_and_full_list() {
        let curation = Curation::Recommended {
            keyword: "해리포터".into(),
            books: books(),
            recommendation: Recommendation::parse(
                "추천 도서: 해리 포터와 마법사의 돌\n추천 이유: 시작은 언제나 설렙니다.",
            ),
        };
        let html = render_page(PageState::Curated(&curation), "m");

        assert!(html.contains("<article class=\"result-container\">"));
        assert!(html.contains("<em>시작은 언제나 설렙니다.</em>"));
        assert!(html.contains("value=\"해리포터\""));
        for book in books() {
            assert!(html.contains(&book.title));
        }
        assert!(html.contains("문학수첩"));
    }

    #[test]
    fn test_unmatched_recommendation_shows_raw_reply() {
        let curation = Curation::Recommended {
            keyword: "해리포터".into(),
            books: books(),
            recommendation: Recommendation::parse("추천: 천천히 읽어보세요"),
        };
        let html = render_page(PageState::Curated(&curation), "m");

        assert!(!html.contains("<article class=\"result-container\">"));
        assert!(html.contains("목록에서 찾을 수 없습니다"));
        assert!(html.contains("<pre>추천: 천천히 읽어보세요</pre>"));
    }

    #[test]
    fn test_recommendation_failure_lists_books_with_error() {
        let curation = Curation::RecommendationUnavailable {
            keyword: "해리포터".into(),
            books: books(),
            message: "AI 추천 생성에 실패했습니다: quota".into(),
        };
        let html = render_page(PageState::Curated(&curation), "m");

        assert!(html.contains("AI 추천을 가져오지 못했습니다: AI 추천 생성에 실패했습니다: quota"));
        assert!(html.contains("해리 포터와 비밀의 방"));
        assert!(!html.contains("AI 원문 응답"));
    }

    #[test]
    fn test_errors_render_inside_page() {
        let html = render_page(
            PageState::Failed {
                keyword: "",
                error: &ApiError::MissingInput,
            },
            "m",
        );
        assert!(html.contains("내용을 입력해주세요"));

        let error = ApiError::SearchFailed("알라딘 서버가 503 상태로 응답했습니다".into());
        let html = render_page(
            PageState::Failed {
                keyword: "<b>",
                error: &error,
            },
            "m",
        );
        assert!(html.contains(
            "오류가 발생했습니다: 도서 검색에 실패했습니다: 알라딘 서버가 503 상태로 응답했습니다"
        ));
        assert!(html.contains("value=\"&lt;b&gt;\""));
        assert!(!html.contains("검색된 도서"));
    }

    #[test]
    fn test_no_results_notice() {
        let curation = Curation::NoResults {
            keyword: "zzz".into(),
        };
        let html = render_page(PageState::Curated(&curation), "m");
        assert!(html.contains("'zzz'(와)과 관련된 책을 찾지 못했습니다"));
    }
}
