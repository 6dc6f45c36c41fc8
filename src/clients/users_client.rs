use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, instrument};

use crate::domain::User;
use crate::users_actor::{
    FetchOutcome, ServiceResult, StoreError, UpdateFailure, UsersRequest, UsersView,
};

/// Handle to the users service. Cheap to clone; every clone talks to the
/// same service.
#[derive(Clone)]
pub struct UsersClient {
    sender: mpsc::Sender<UsersRequest>,
    view: watch::Receiver<UsersView>,
    failures: broadcast::Sender<UpdateFailure>,
}

impl UsersClient {
    pub fn new(
        sender: mpsc::Sender<UsersRequest>,
        view: watch::Receiver<UsersView>,
        failures: broadcast::Sender<UpdateFailure>,
    ) -> Self {
        Self {
            sender,
            view,
            failures,
        }
    }

    /// Receiver that always holds the latest view and wakes on every change.
    pub fn subscribe(&self) -> watch::Receiver<UsersView> {
        self.view.clone()
    }

    /// Stream of remote writes that failed, whether or not they were rolled back.
    pub fn subscribe_failures(&self) -> broadcast::Receiver<UpdateFailure> {
        self.failures.subscribe()
    }

    /// Last published view, without a round trip to the service.
    pub fn latest_view(&self) -> UsersView {
        self.view.borrow().clone()
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> ServiceResult<()> {
        debug!("Sending shutdown request");
        self.sender
            .send(UsersRequest::Shutdown)
            .await
            .map_err(|e| StoreError::ActorCommunicationError(e.to_string()))?;
        Ok(())
    }
}

client_method!(
    /// Sets or clears the selected user. Nothing else in the state moves.
    UsersClient => fn select_user(user: Option<User>) -> () as UsersRequest::SelectUser
);
client_method!(
    /// Replaces the entry with the same id before the remote write is
    /// confirmed. Returns `false` when no such entry is loaded.
    UsersClient => fn apply_local_update(user: User) -> bool as UsersRequest::ApplyLocalUpdate
);
client_method!(
    /// Fetches the next page. Rejected with [`StoreError::FetchInFlight`]
    /// while another fetch is outstanding.
    UsersClient => fn fetch_users() -> FetchOutcome as UsersRequest::FetchUsers
);
client_method!(
    /// Infinite-scroll trigger: fetches only when more pages exist and no
    /// fetch is outstanding.
    UsersClient => fn load_more() -> FetchOutcome as UsersRequest::LoadMore
);
client_method!(
    /// Writes `user` remotely. On failure the entry is restored to its value
    /// from before the optimistic edit, if it was loaded.
    UsersClient => fn update_user(user: User) -> () as UsersRequest::UpdateUser
);
client_method!(
    /// Optimistic local replace and remote write in one step.
    UsersClient => fn edit_user(user: User) -> () as UsersRequest::EditUser
);
client_method!(UsersClient => fn view() -> UsersView as UsersRequest::GetView);

// Test-only method for internal state inspection
#[cfg(test)]
client_method!(UsersClient => fn get_originals_count() -> usize as UsersRequest::GetOriginalsCount);
