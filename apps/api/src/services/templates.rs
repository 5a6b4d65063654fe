use crate::models::BookRecord;
use std::fmt::Write;

const CURATOR_PERSONA: &str =
    "당신은 사용자의 상황과 감정을 깊이 이해하고 공감해주는 전문 북 큐레이터입니다.";

const ANSWER_INSTRUCTIONS: &str = "\
사용자의 요청에 가장 잘 맞는 책을 단 한 권만 골라주세요.
추천하는 이유를 사용자가 따뜻한 위로와 공감을 얻을 수 있도록 150자 내외의 진심 어린 문장으로 설명해주세요.
출력 형식은 반드시 아래와 같이 맞춰주세요:

추천 도서: [책 제목]
추천 이유: [당신의 추천사]";

/// Numbered listing of the candidate books, one block per book.
pub fn format_book_list(books: &[BookRecord]) -> String {
    let mut list = String::new();
    for (i, book) in books.iter().enumerate() {
        // Writing into a String cannot fail.
        let _ = write!(
            list,
            "\n{}. 제목: {}\n   저자: {}\n   소개: {}\n   별점: {}\n",
            i + 1,
            book.title,
            book.author,
            book.description,
            book.star_rating
        );
    }
    list
}

/// Prompt asking the model to pick one of `books` for `keyword`.
pub fn build_prompt(keyword: &str, books: &[BookRecord]) -> String {
    format!(
        "{persona}\n사용자의 요청: \"{keyword}\"\n\n\
         아래는 이 요청과 관련하여 찾은 책 목록입니다.\n\
         --- 책 목록 ---\n{books}\n--- 책 목록 끝 ---\n\n{instructions}",
        persona = CURATOR_PERSONA,
        keyword = keyword,
        books = format_book_list(books),
        instructions = ANSWER_INSTRUCTIONS,
    )
}
