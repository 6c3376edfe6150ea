//! OS signal handling: SIGINT/SIGTERM become `Message::Quit`

use tokio::sync::mpsc;

use crate::message::Message;
use promptlab_core::prelude::*;

/// Spawn a task that forwards the first termination signal as a quit message
pub fn spawn_signal_handler(tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(signal) => {
                info!("Received {signal}, shutting down");
                let _ = tx.send(Message::Quit).await;
            }
            Err(e) => error!("Signal handler error: {e}"),
        }
    });
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| Error::terminal(format!("Failed to create SIGINT handler: {e}")))?;
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| Error::terminal(format!("Failed to create SIGTERM handler: {e}")))?;

    tokio::select! {
        _ = sigint.recv() => Ok("SIGINT"),
        _ = sigterm.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| Error::terminal(format!("Failed to listen for Ctrl+C: {e}")))?;
    Ok("Ctrl+C")
}
