use std::error::Error;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::app::{AppState, create_app};
use crate::config::{BAUD_RATE, Config};
use crate::listener::Listener;
use crate::messages::SerialLink;

pub mod app;
pub mod config;
pub mod error;
pub mod listener;
pub mod messages;
pub mod ports;

/// Open the necklace link, start the listener and serve the control page until shutdown
pub async fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let port_path = ports::resolve_port(config.serial_port.as_deref())?;
    log::info!("Connecting to serial port {} at {} baud...", port_path, BAUD_RATE);

    let (sender, reader) = SerialLink::open(&port_path)?.split()?;

    let tcp = TcpListener::bind(config.address).await?;
    let listener = Listener::spawn(reader)?;

    let app = create_app(
        AppState {
            sender: Arc::new(sender),
        },
        &config.static_dir,
    );

    log::info!("Control page listening on http://{}", config.address);

    serve(tcp, app, listener, shutdown_signal()).await
}

/// Serve until `shutdown` resolves, then stop the listener off the async runtime.
/// The listener is stopped even when serving fails.
async fn serve<F>(
    tcp: TcpListener,
    app: Router,
    listener: Listener,
    shutdown: F,
) -> Result<(), Box<dyn Error>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let served = axum::serve(tcp, app).with_graceful_shutdown(shutdown).await;

    log::info!("Shutting down serial listener...");
    tokio::task::spawn_blocking(move || listener.stop()).await?;
    served?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
