//! OS signal handling for graceful shutdown.
use std::io;
use std::sync::mpsc;
use std::thread;

use scout_logging::{scout_error, scout_info};

use crate::app::Input;

/// Starts a thread that reports the first termination signal as [`Input::Interrupt`].
pub fn spawn_signal_listener(tx: mpsc::Sender<Input>) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    thread::Builder::new()
        .name("scout-signals".to_string())
        .spawn(move || match runtime.block_on(wait_for_signal()) {
            Ok(()) => {
                scout_info!("Shutdown signal received");
                let _ = tx.send(Input::Interrupt);
            }
            Err(err) => scout_error!("Signal handler error: {}", err),
        })?;
    Ok(())
}

async fn wait_for_signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::select! {
            _ = sigint.recv() => scout_info!("Received SIGINT"),
            _ = sigterm.recv() => scout_info!("Received SIGTERM"),
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        scout_info!("Received Ctrl+C");
        Ok(())
    }
}
