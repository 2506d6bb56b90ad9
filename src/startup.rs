use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::config::Settings;
use crate::message_manager::MessageManager;
use crate::mindbaz_client::MindbazClient;
use crate::routes::{
    create_subscriber, find_subscriber, health_check, send_message, unsubscribe_subscriber,
};
use crate::subscriber_manager::SubscriberManager;
use crate::transport::MindbazTransport;

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let transport = build_transport(&config)?;

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();
        let server = run(listener, transport)?;

        tracing::info!("Server listening on {}:{}", config.application.get_host(), port);

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/// Wires the Mindbaz client, both managers and the campaign table into a transport.
pub fn build_transport(config: &Settings) -> Result<MindbazTransport, std::io::Error> {
    let mindbaz_client = MindbazClient::new(
        config.get_mindbaz_base_url(),
        config.get_mindbaz_credentials(),
        Some(config.get_mindbaz_timeout()),
    )
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    let mindbaz_client = Arc::new(mindbaz_client);

    Ok(MindbazTransport::new(
        SubscriberManager::new(mindbaz_client.clone()),
        MessageManager::new(mindbaz_client),
        config.mindbaz.campaigns.clone(),
        config.mindbaz.insert_missing_subscribers,
    ))
}

pub fn run(listener: TcpListener, transport: MindbazTransport) -> Result<Server, std::io::Error> {
    let transport = web::Data::new(transport);

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/messages", web::post().to(send_message))
            .route("/subscribers", web::post().to(create_subscriber))
            .route("/subscribers", web::get().to(find_subscriber))
            .route(
                "/subscribers/{id}/unsubscribe",
                web::post().to(unsubscribe_subscriber),
            )
            .app_data(transport.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
