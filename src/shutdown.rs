//! Graceful shutdown handling

use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

/// Shutdown coordinator
pub struct ShutdownCoordinator {
    sender: watch::Sender<bool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    /// Get a shutdown notifier
    pub fn subscribe(&self) -> ShutdownNotifier {
        ShutdownNotifier {
            receiver: self.sender.subscribe(),
        }
    }

    /// Wait for Ctrl+C or SIGTERM, then notify subscribers
    pub async fn wait_for_signal(&self) {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received Ctrl+C signal");
            }
            _ = terminate => {
                info!("Received SIGTERM signal");
            }
        }

        self.shutdown();
    }

    /// Trigger shutdown manually
    pub fn shutdown(&self) {
        info!("Shutdown triggered");
        self.sender.send_replace(true);
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Shutdown notifier for components
#[derive(Clone)]
pub struct ShutdownNotifier {
    receiver: watch::Receiver<bool>,
}

impl ShutdownNotifier {
    /// Resolves once shutdown has been signaled, including before the call
    pub async fn wait(&self) {
        let mut receiver = self.receiver.clone();
        // A dropped coordinator counts as shutdown
        let _ = receiver.wait_for(|stopped| *stopped).await;
    }

    /// Check if shutdown has been signaled (non-blocking)
    pub fn is_shutdown(&self) -> bool {
        *self.receiver.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_shutdown_coordinator() {
        let coordinator = ShutdownCoordinator::new();
        let notifier = coordinator.subscribe();

        let handle = tokio::spawn(async move {
            notifier.wait().await;
            true
        });

        coordinator.shutdown();

        let result = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result);
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_shutdown() {
        let coordinator = ShutdownCoordinator::new();
        let notifier = coordinator.subscribe();
        assert!(!notifier.is_shutdown());

        coordinator.shutdown();

        let late = coordinator.subscribe();
        assert!(late.is_shutdown());
        tokio::time::timeout(Duration::from_secs(1), late.wait())
            .await
            .unwrap();
    }
}
