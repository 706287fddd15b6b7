//! Graceful shutdown handling.
//!
//! On SIGINT/SIGTERM the listener stops accepting connections and in-flight
//! requests are given a bounded amount of time to finish.

use std::future::Future;
use std::io;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tokio::time::timeout;

/// Outcome of a server run
#[derive(Debug, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// All in-flight requests completed within the drain timeout
    Drained,
    /// The drain timeout elapsed and remaining requests were abandoned
    TimedOut,
}

/// Serve `app` until `shutdown` resolves, then drain for at most
/// `drain_timeout`.
pub async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    drain_timeout: Duration,
) -> io::Result<ShutdownOutcome>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (signal_tx, mut signal_rx) = watch::channel(false);

    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                let _ = signal_tx.send(true);
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            return flatten(result).map(|_| ShutdownOutcome::Drained);
        }
        _ = signal_rx.changed() => {}
    }

    tracing::info!(
        drain_timeout_secs = drain_timeout.as_secs(),
        "Draining in-flight requests"
    );

    match timeout(drain_timeout, &mut server).await {
        Ok(result) => flatten(result).map(|_| ShutdownOutcome::Drained),
        Err(_) => {
            tracing::warn!("Drain timeout elapsed, abandoning in-flight requests");
            server.abort();
            Ok(ShutdownOutcome::TimedOut)
        }
    }
}

fn flatten(result: Result<io::Result<()>, tokio::task::JoinError>) -> io::Result<()> {
    result.map_err(io::Error::other)?
}

/// Resolve on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
