use std::sync::Arc;

use anyhow::{Context, anyhow};

use airemax_service::config::Settings;
use airemax_service::ingest::aqicn::AqicnClient;
use airemax_service::logging::{self, DataSource};
use airemax_service::web::{AppState, create_router, shutdown_on};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load(None).context("loading configuration")?;

    logging::init_logger(
        settings.min_log_level(),
        settings.log_file.as_deref(),
        settings.console_timestamps,
    )
    .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    logging::info(
        DataSource::System,
        None,
        &format!(
            "Starting {} v{}",
            settings.project_name,
            env!("CARGO_PKG_VERSION")
        ),
    );

    if settings.aqicn_token.is_empty() {
        logging::warn(
            DataSource::System,
            None,
            "AQICN_TOKEN is not set; the provider will reject every request",
        );
    }

    let client = AqicnClient::from_settings(&settings)?;
    let addr = settings.bind_address();
    let state = AppState::new(settings, Arc::new(client));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    logging::info(DataSource::System, None, &format!("Listening on {}", addr));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await?;

    logging::info(DataSource::System, None, "Shut down cleanly");
    Ok(())
}
