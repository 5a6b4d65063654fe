use crate::{
    models::KeywordForm,
    services::CuratorService,
    views::{render_page, PageContext, PageState},
};
use actix_web::{get, http::StatusCode, web, HttpResponse, ResponseError};
use tracing::info;

pub fn pages_config(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(
        web::resource("/recommend")
            .route(web::post().to(recommend_form))
            .route(web::get().to(recommend_query)),
    );
}

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

#[get("/")]
pub async fn index(page: web::Data<PageContext>) -> HttpResponse {
    html(StatusCode::OK, render_page(PageState::Empty, &page.model))
}

/// Form submission from the page itself.
///
/// A body that is not a urlencoded form (or has no content type at all) is
/// treated as an empty keyword, so it still gets the rendered input warning.
pub async fn recommend_form(
    form: Option<web::Form<KeywordForm>>,
    curator: web::Data<CuratorService>,
    page: web::Data<PageContext>,
) -> HttpResponse {
    let keyword = form.map(|f| f.into_inner().keyword).unwrap_or_default();
    render_curation(&keyword, &curator, &page).await
}

/// Same as the form, for shareable `?keyword=` links.
pub async fn recommend_query(
    query: Option<web::Query<KeywordForm>>,
    curator: web::Data<CuratorService>,
    page: web::Data<PageContext>,
) -> HttpResponse {
    let keyword = query.map(|q| q.into_inner().keyword).unwrap_or_default();
    render_curation(&keyword, &curator, &page).await
}

// Every outcome, errors included, becomes a page; nothing reaches actix as an error.
async fn render_curation(
    keyword: &str,
    curator: &CuratorService,
    page: &PageContext,
) -> HttpResponse {
    match curator.curate(keyword).await {
        Ok(curation) => html(
            StatusCode::OK,
            render_page(PageState::Curated(&curation), &page.model),
        ),
        Err(error) => {
            info!("Rendering error page: {}", error);
            html(
                error.status_code(),
                render_page(
                    PageState::Failed {
                        keyword: keyword.trim(),
                        error: &error,
                    },
                    &page.model,
                ),
            )
        }
    }
}
