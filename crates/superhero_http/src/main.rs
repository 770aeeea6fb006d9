//! `superheroes-http` server entry point.

use std::process::ExitCode;
use std::sync::Arc;

use log::{error, info};
use superhero_core::init_logging;
use superhero_http::{superhero_routes, AppState, HttpServerConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    let config = HttpServerConfig::from_env();

    if let Some(log_dir) = config.store.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.store.log_level, log_dir) {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    }

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=http_serve module=http status=error error={message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: HttpServerConfig) -> Result<(), String> {
    let state = AppState::open(&config.store).map_err(|err| err.to_string())?;
    let router = superhero_routes(Arc::new(state));

    let addr = config.socket_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|err| format!("cannot bind `{addr}`: {err}"))?;

    info!(
        "event=http_serve module=http status=start addr={} db={} assets={}",
        addr,
        config.store.db_path.display(),
        config.store.asset_root.display()
    );
    println!("Superheroes API listening on http://{addr}");

    axum::serve(listener, router)
        .await
        .map_err(|err| err.to_string())
}
