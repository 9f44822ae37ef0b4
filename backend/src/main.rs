//! Backend entry-point: wires the queue services, REST endpoints, and the
//! day-rollover sweeper.

use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::server::{self, ServerConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env();
    let application = server::build_application(&config);
    tokio::spawn(application.sweeper.clone().run(config.sweep_interval));

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the probe handle stays available here.
    let server_health_state = health_state.clone();
    let state = application.state.clone();
    let server = HttpServer::new(move || {
        let state = state.clone();
        let health = server_health_state.clone();
        App::new().configure(|cfg| server::configure_app(cfg, state, health))
    })
    .bind(config.bind_addr.as_str())?;

    health_state.mark_ready();
    info!(addr = %config.bind_addr, "queue backend listening");
    server.run().await
}
