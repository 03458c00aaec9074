//! Shutdown coordination between the consumer task and the health server.
//!
//! A single watch channel carries the stop request. The consumer checks it
//! between polls and while long-polling; the health server uses it for
//! axum's graceful shutdown.

use tokio::sync::watch;
use tracing::info;

/// Receiving half of the shutdown channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Waits until shutdown is requested.
    ///
    /// A dropped [`ShutdownController`] counts as a shutdown request.
    pub async fn wait(&mut self) {
        // An error means the controller is gone.
        let _ = self.receiver.wait_for(|stop| *stop).await;
    }

    /// Non-blocking check.
    pub fn is_shutdown(&self) -> bool {
        *self.receiver.borrow()
    }
}

/// Sending half of the shutdown channel.
#[derive(Debug)]
pub struct ShutdownController {
    sender: watch::Sender<bool>,
}

impl ShutdownController {
    /// Requests shutdown. Only the first request is logged.
    pub fn shutdown(&self) {
        let first = self.sender.send_if_modified(|stop| !std::mem::replace(stop, true));
        if first {
            info!(listeners = self.sender.receiver_count(), "Shutdown requested");
        }
    }

    /// Hands out another signal, e.g. for a task started after the channel
    /// was created. It observes a shutdown that was already requested.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            receiver: self.sender.subscribe(),
        }
    }
}

/// Creates a `(controller, signal)` pair. Clone the signal for every task
/// that needs to stop.
pub fn shutdown_channel() -> (ShutdownController, ShutdownSignal) {
    let (sender, receiver) = watch::channel(false);
    (ShutdownController { sender }, ShutdownSignal { receiver })
}

/// Waits for SIGTERM or SIGINT and returns the name of the signal received.
#[cfg(unix)]
pub async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    info!(signal = name, "Received termination signal");
    Ok(name)
}

/// Waits for Ctrl+C.
#[cfg(not(unix))]
pub async fn wait_for_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    info!(signal = "CTRL_C", "Received termination signal");
    Ok("CTRL_C")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn signal_starts_untriggered() {
        let (_controller, signal) = shutdown_channel();
        assert!(!signal.is_shutdown());
    }

    #[tokio::test]
    async fn wait_completes_after_shutdown() {
        let (controller, mut signal) = shutdown_channel();
        let observer = signal.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            controller.shutdown();
        });

        let result = tokio::time::timeout(Duration::from_secs(1), signal.wait()).await;
        assert!(result.is_ok(), "wait() should complete once shutdown is sent");
        assert!(observer.is_shutdown());
    }

    #[tokio::test]
    async fn repeated_shutdown_is_idempotent() {
        let (controller, mut signal) = shutdown_channel();

        controller.shutdown();
        controller.shutdown();

        assert!(signal.is_shutdown());
        let result = tokio::time::timeout(Duration::from_secs(1), signal.wait()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn late_subscriber_sees_earlier_shutdown() {
        let (controller, _signal) = shutdown_channel();
        controller.shutdown();

        let mut late = controller.subscribe();

        assert!(late.is_shutdown());
        let result = tokio::time::timeout(Duration::from_secs(1), late.wait()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn dropped_controller_releases_waiters() {
        let (controller, mut signal) = shutdown_channel();
        drop(controller);

        let result = tokio::time::timeout(Duration::from_secs(1), signal.wait()).await;
        assert!(result.is_ok());
    }
}
