use std::sync::Arc;

use tracing::{error, info, instrument};

use super::config::PagerConfig;
use crate::clients::UsersClient;
use crate::gateway::UserGateway;
use crate::users_actor::{ServiceResult, UsersService};

/// Starts the users service against a gateway and owns its task.
///
/// Must be created inside a Tokio runtime.
pub struct UsersSystem {
    pub users_client: UsersClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl UsersSystem {
    #[instrument(name = "users_system", skip(gateway))]
    pub fn new(config: &PagerConfig, gateway: Arc<dyn UserGateway>) -> Self {
        info!("Starting users system");

        let (users_service, users_client) =
            UsersService::new(config.buffer_size, config.page_size, gateway);
        let handles = vec![tokio::spawn(users_service.run())];

        info!("Users system started successfully");

        Self {
            users_client,
            handles,
        }
    }

    /// Stops the service and waits for its task. Work still in flight is
    /// abandoned and its callers see an actor communication error.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> ServiceResult<()> {
        info!("Shutting down users system");

        let _ = self.users_client.shutdown().await;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
            }
        }

        info!("Users system shutdown complete");
        Ok(())
    }
}
