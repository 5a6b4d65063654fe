use crate::{
    config::Config,
    error::Result,
    routes,
    services::{AladinClient, CuratorService, GeminiClient},
    views::PageContext,
};
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use log::info;
use std::{net::TcpListener, sync::Arc};

pub struct Application {
    port: u16,
    host: String,
    config: Config,
}

impl Application {
    /// Create a new application instance
    pub fn new(config: &Config) -> Self {
        Self {
            port: config.port,
            host: config.host.clone(),
            config: config.clone(),
        }
    }

    /// Build and run the server
    pub async fn run(&self) -> Result<()> {
        let bind_address = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&bind_address)
            .with_context(|| format!("Failed to bind {}", bind_address))?;
        info!("Starting server at http://{}", bind_address);

        self.run_with_listener(listener).await
    }

    /// Run the server with a specific TCP listener
    /// This is useful for testing where we want to use a random port
    pub async fn run_with_listener(&self, listener: TcpListener) -> Result<()> {
        let aladin = AladinClient::new(&self.config)?;
        let gemini = GeminiClient::new(&self.config)?;
        let page = web::Data::new(PageContext {
            model: gemini.model().to_string(),
        });
        let curator = web::Data::new(CuratorService::new(Arc::new(aladin), Arc::new(gemini)));

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header();

            App::new()
                .wrap(cors)
                .wrap(Logger::default())
                .app_data(curator.clone())
                .app_data(page.clone())
                .configure(routes::configure)
        })
        .listen(listener)?
        .run()
        .await?;

        Ok(())
    }
}
