//! Server entry-point: loads settings, wires stores and services, and serves
//! the achievement API.

mod server;

use std::ffi::OsString;
use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use fitquest::composition::{ServiceRuntime, build_services, connect_driven_ports};
use fitquest::domain::RetryExecutor;
use fitquest::inbound::http::health::HealthState;
use fitquest::inbound::http::state::HttpState;
use fitquest::outbound::cache::InMemoryCatalogueCache;
use fitquest::outbound::queue::notification_channel;
use fitquest::settings::AppSettings;
use ortho_config::OrthoConfig;

use server::{ServerConfig, create_server};

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

    let settings = AppSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|err| std::io::Error::other(format!("invalid settings: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    let ports = connect_driven_ports(settings.database_url())
        .await
        .map_err(std::io::Error::other)?;

    let (sink, queue) = notification_channel();
    let _notification_logger = queue.spawn_logger();

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let services = build_services(
        &ports,
        ServiceRuntime {
            retry: RetryExecutor::new(settings.retry_policy()),
            cache: Arc::new(InMemoryCatalogueCache::new(clock.clone())),
            cache_ttl: settings.catalogue_cache_ttl(),
            notifications: Arc::new(sink),
            clock,
        },
    );
    let http_state = HttpState::new(services.completions, services.coordinator, services.progress);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(bind_addr, http_state))?;
    info!(%bind_addr, "fitquest listening");
    server.await
}
