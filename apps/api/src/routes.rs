use actix_web::{web, Scope};

use crate::handlers::{health_check, pages_config, recommendations_config};

/// Configure all routes for the JSON API
pub fn api_routes() -> Scope {
    web::scope("/api")
        .service(health_check)
        .configure(recommendations_config)
}

/// Register the HTML pages and the JSON API.
///
/// Expects `web::Data<CuratorService>` and `web::Data<PageContext>` to be
/// registered as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_routes()).configure(pages_config);
}
