use std::sync::Arc;
use std::time::Duration;

use scout_logging::{scout_info, scout_warn};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{ApiStatus, Renderer, Transport, UiEvent};

#[derive(Debug, Clone)]
pub struct HealthSettings {
    pub base_url: String,
    pub interval: Duration,
    pub timeout: Duration,
}

/// Checks the backend once. A call that outlives `timeout` counts as offline.
pub async fn check_health(
    transport: &dyn Transport,
    timeout: Duration,
    shutdown: &CancellationToken,
) -> ApiStatus {
    let cancel = shutdown.child_token();
    match tokio::time::timeout(timeout, transport.health(&cancel)).await {
        Ok(Ok(_)) => ApiStatus::Online,
        Ok(Err(err)) => {
            scout_warn!("health check failed: {}", err);
            ApiStatus::Offline
        }
        Err(_) => {
            cancel.cancel();
            scout_warn!("health check timed out after {:?}", timeout);
            ApiStatus::Offline
        }
    }
}

/// Polls the backend until `shutdown` fires, reporting status changes only.
pub fn spawn_health_monitor(
    transport: Arc<dyn Transport>,
    renderer: Arc<dyn Renderer>,
    settings: HealthSettings,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last: Option<ApiStatus> = None;

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }
            let status = check_health(transport.as_ref(), settings.timeout, &shutdown).await;
            if shutdown.is_cancelled() {
                break;
            }
            if last != Some(status) {
                scout_info!("api at {} is {:?}", settings.base_url, status);
                renderer.emit(UiEvent::ApiStatus {
                    status,
                    base_url: settings.base_url.clone(),
                });
                last = Some(status);
            }
        }
    })
}
