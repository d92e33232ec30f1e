#[cfg(test)]
#[path = "health_test.rs"]
mod tests;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::domain::models::BackendBox;
use crate::domain::models::Event;
use crate::domain::models::HealthStatus;

/// Polls the backend health endpoint until shut down, reporting every result
/// as an `Event::HealthChecked`.
pub struct HealthMonitor {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl HealthMonitor {
    /// Checks once right away, then once per `interval`.
    pub fn start(
        backend: BackendBox,
        tx: mpsc::UnboundedSender<Event>,
        interval: Duration,
    ) -> HealthMonitor {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = ticker.tick() => {}
                }

                let status = tokio::select! {
                    _ = token.cancelled() => return,
                    status = HealthMonitor::check(&backend) => status,
                };

                if tx.send(Event::HealthChecked(status)).is_err() {
                    return;
                }
            }
        });

        return HealthMonitor {
            cancel,
            handle: Some(handle),
        };
    }

    pub async fn check(backend: &BackendBox) -> HealthStatus {
        match backend.health_check().await {
            Ok(_) => return HealthStatus::Healthy,
            Err(err) => {
                tracing::warn!(error = %err, "Backend health check failed");
                return HealthStatus::Unhealthy;
            }
        }
    }

    /// Stops polling. A check still waiting on the backend is dropped and
    /// its result discarded.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                tracing::error!(error = ?err, "Health monitor task failed");
            }
        }
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
