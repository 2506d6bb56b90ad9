use config::{Config, ConfigError, File};
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use std::collections::HashMap;
use std::time;

use crate::soap::Credentials;

#[derive(Debug)]
pub enum Environment {
    Development,
    Production,
}

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub mindbaz: MindbazSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct MindbazSettings {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    pub credentials: CredentialsSettings,
    // Campaign selector name -> Mindbaz campaign id
    pub campaigns: HashMap<String, i64>,
    #[serde(default)]
    pub insert_missing_subscribers: bool,
}

#[derive(serde::Deserialize, Clone)]
pub struct CredentialsSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub id_site: i64,
    pub login: String,
    // secrecy protects secret information and prevents them to be exposed (eg: via logs)
    pub password: Secret<String>,
}

impl Settings {
    pub fn get_address(&self) -> String {
        format!(
            "{}:{}",
            self.application.get_host(),
            self.application.get_port()
        )
    }

    pub fn get_mindbaz_base_url(&self) -> String {
        self.mindbaz.base_url.clone()
    }

    pub fn get_mindbaz_timeout(&self) -> time::Duration {
        self.mindbaz.get_timeout()
    }

    pub fn get_mindbaz_credentials(&self) -> Credentials {
        self.mindbaz.credentials.get_credentials()
    }

    pub fn set_mindbaz_base_url(&mut self, new_base_url: String) {
        self.mindbaz.base_url = new_base_url
    }

    pub fn set_insert_missing_subscribers(&mut self, insert_missing_subscribers: bool) {
        self.mindbaz.insert_missing_subscribers = insert_missing_subscribers
    }

    pub fn set_app_port(&mut self, port: u16) {
        self.application.port = port;
    }

    pub fn validate(&self) -> Result<(), String> {
        self.mindbaz.validate()
    }
}

impl ApplicationSettings {
    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn get_host(&self) -> String {
        self.host.clone()
    }
}

impl MindbazSettings {
    pub fn get_timeout(&self) -> time::Duration {
        time::Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.credentials.login.trim().is_empty() {
            return Err("mindbaz.credentials.login cannot be empty".to_string());
        }
        if self.credentials.password.expose_secret().trim().is_empty() {
            return Err("mindbaz.credentials.password cannot be empty".to_string());
        }
        if self.campaigns.is_empty() {
            return Err("mindbaz.campaigns requires at least one campaign".to_string());
        }

        Ok(())
    }
}

impl CredentialsSettings {
    pub fn get_credentials(&self) -> Credentials {
        Credentials {
            id_site: self.id_site,
            login: self.login.clone(),
            password: self.password.clone(),
        }
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            unknown_env => Err(format!(
                "{} is not supported environment. Use either 'development' or 'production'.",
                unknown_env
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let root_path = std::env::current_dir()
        .map_err(|e| ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?;
    let config_directory = root_path.join("config");
    // Uses development environment by default
    let enviroment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "development".into())
        .try_into()
        .map_err(ConfigError::Message)?;
    let config_base_filepath = config_directory.join("base");
    let config_env_filepath = config_directory.join(enviroment.as_str());

    // It merges the base configuration file with the one from the specific environment (development or production)
    let settings = Config::builder()
        .add_source(File::from(config_base_filepath).required(true))
        .add_source(File::from(config_env_filepath).required(true))
        // Merge settings from environment variables with a prefix of APP and "__" separator
        // E.g APP_MINDBAZ__CREDENTIALS__LOGIN would set Settings.mindbaz.credentials.login
        .add_source(config::Environment::with_prefix("app").separator("__"))
        .build()?;

    tracing::info!("Application environment = {:?}", enviroment);

    // Try to convert the value from the configuration file into a Settings type
    let settings: Settings = settings.try_deserialize()?;
    settings.validate().map_err(ConfigError::Message)?;

    Ok(settings)
}
