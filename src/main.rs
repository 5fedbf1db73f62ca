use std::{process::ExitCode, sync::Arc};

use log::{error, info};
use mail_relay_app::{build_application, config::MailerConfig};
use mail_relay_lettre::LettreMailTransport;

mod logs;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Finishing in-flight deliveries...");
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    if let Err(e) = logs::init_logger() {
        eprintln!("Failed to initialize logger: {}", e);
        return ExitCode::FAILURE;
    }

    let config = match MailerConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Invalid mailer configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        "Relaying mail through {} as {}",
        config.relay_address(),
        config.sender_email()
    );

    let app = Arc::new(build_application(
        config,
        Arc::new(LettreMailTransport::new()),
    ));

    if let Err(e) = mail_relay_http_api::run(app, shutdown_signal()).await {
        error!("Server start error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
