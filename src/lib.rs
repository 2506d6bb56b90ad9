pub mod config;
pub mod domain;
pub mod encoder;
pub mod message_manager;
pub mod mindbaz_client;
pub mod routes;
pub mod soap;
pub mod startup;
pub mod subscriber_manager;
pub mod telemetry;
pub mod transport;
pub mod web_service;
