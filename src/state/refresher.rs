use crate::state::messages::NetworkRequest;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Re-requests the bracket on a fixed interval. Team lookups stay cached, so
/// only the bracket itself is fetched again.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
    every: Duration,
}

impl PeriodicRefresher {
    pub fn new(network_requests: mpsc::Sender<NetworkRequest>, every: Duration) -> Self {
        Self { network_requests, every }
    }

    pub async fn run(self) {
        let mut reload_interval = interval(self.every);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        reload_interval.tick().await;

        loop {
            reload_interval.tick().await;
            if self
                .network_requests
                .send(NetworkRequest::LoadBracket)
                .await
                .is_err()
            {
                break;
            }
        }
    }
}
