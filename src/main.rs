use mindbaz_mailer::config::get_configuration;
use mindbaz_mailer::startup::Application;
use mindbaz_mailer::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber(String::from("mindbaz_mailer"), String::from("info"));

    init_subscriber(subscriber).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let config = get_configuration()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let application = Application::build(config).await?;

    application.run_until_stop().await
}
