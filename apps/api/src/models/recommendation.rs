use crate::models::BookRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static TITLE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[\s*#>-]*추천\s*도서\s*\**\s*[:：]\s*\**\s*(.+?)\s*$").unwrap()
});

static REASON_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s*#>-]*추천\s*이유\s*\**\s*[:：]\s*\**").unwrap());

/// Text produced by the AI provider plus the pieces we can read out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// The provider reply, untouched apart from trimming.
    pub text: String,
    /// Title named on the `추천 도서:` line, if the reply followed the format.
    pub title: Option<String>,
    pub reason: Option<String>,
}

impl Recommendation {
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into().trim().to_string();
        let title = parse_title(&text);
        let reason = parse_reason(&text);
        Self {
            text,
            title,
            reason,
        }
    }

    /// First listed book whose title contains the recommended title or is
    /// contained by it.
    pub fn featured<'a>(&self, books: &'a [BookRecord]) -> Option<&'a BookRecord> {
        let wanted = self.title.as_deref()?;
        books.iter().find(|book| {
            let title = book.title.trim();
            !title.is_empty() && (title.contains(wanted) || wanted.contains(title))
        })
    }
}

fn parse_title(text: &str) -> Option<String> {
    let captured = TITLE_LINE.captures(text)?.get(1)?.as_str();
    let title = captured
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '*' | '[' | ']' | '"' | '\'' | '「' | '」' | '『' | '』'))
        .to_string();
    (!title.is_empty()).then_some(title)
}

fn parse_reason(text: &str) -> Option<String> {
    let reason = match REASON_MARKER.find(text) {
        Some(marker) => text[marker.end()..].trim().to_string(),
        None => {
            // Without the marker, everything after the title line is the reason.
            let title_line = TITLE_LINE.find(text)?;
            text[title_line.end()..].trim().to_string()
        }
    };
    (!reason.is_empty()).then_some(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn books() -> Vec<BookRecord> {
        vec![
            BookRecord::new("해리 포터와 마법사의 돌 1", "J.K. 롤링"),
            BookRecord::new("해리 포터와 비밀의 방 1", "J.K. 롤링"),
            BookRecord::new("반지의 제왕", "J.R.R. 톨킨"),
        ]
    }

    #[test]
    fn test_parses_two_line_format() {
        let rec = Recommendation::parse(
            "추천 도서: 해리 포터와 비밀의 방\n추천 이유: 지친 마음에 모험을 선물해 줄 책입니다.",
        );
        assert_eq!(rec.title.as_deref(), Some("해리 포터와 비밀의 방"));
        assert_eq!(
            rec.reason.as_deref(),
            Some("지친 마음에 모험을 선물해 줄 책입니다.")
        );
    }

    #[test]
    fn test_tolerates_markdown_and_brackets() {
        let rec = Recommendation::parse("**추천 도서:** [반지의 제왕]\n**추천 이유:** 긴 여정.");
        assert_eq!(rec.title.as_deref(), Some("반지의 제왕"));
        assert_eq!(rec.reason.as_deref(), Some("긴 여정."));
    }

    #[test]
    fn test_reason_falls_back_to_lines_after_title() {
        let rec = Recommendation::parse("추천 도서: 반지의 제왕\n위로가 되는 이야기입니다.");
        assert_eq!(rec.reason.as_deref(), Some("위로가 되는 이야기입니다."));
    }

    #[test]
    fn test_free_form_reply_keeps_text_only() {
        let rec = Recommendation::parse("  추천: 아무 책이나 읽어보세요  ");
        assert_eq!(rec.text, "추천: 아무 책이나 읽어보세요");
        assert!(rec.title.is_none());
        assert!(rec.reason.is_none());
        assert!(rec.featured(&books()).is_none());
    }

    #[test]
    fn test_featured_matches_by_containment() {
        let books = books();
        let rec = Recommendation::parse("추천 도서: 해리 포터와 비밀의 방\n추천 이유: 재미");
        assert_eq!(
            rec.featured(&books).map(|b| b.title.as_str()),
            Some("해리 포터와 비밀의 방 1")
        );

        let rec = Recommendation::parse("추천 도서: 반지의 제왕 (합본)\n추천 이유: 재미");
        assert_eq!(
            rec.featured(&books).map(|b| b.title.as_str()),
            Some("반지의 제왕")
        );
    }

    #[test]
    fn test_unknown_title_is_not_featured() {
        let rec = Recommendation::parse("추천 도서: 어린 왕자\n추천 이유: 재미");
        assert!(rec.featured(&books()).is_none());
    }
}
