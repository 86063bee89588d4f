use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use trigger_dependants::{Application, get_configuration};

#[tokio::main]
async fn main() -> ExitCode {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    info!("Starting trigger-dependants...");

    let configuration = match get_configuration() {
        Ok(configuration) => configuration,
        Err(e) => {
            error!("Failed to read configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let application = match Application::build(configuration) {
        Ok(application) => application,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    application.run().await
}
