use tokio::sync::oneshot;

use super::error::StoreError;
use super::state::UsersView;
use crate::domain::{User, UserId};
use crate::gateway::GatewayError;

/// Generic type aliases for service communication
pub type ServiceResult<T> = std::result::Result<T, StoreError>;
pub type ServiceResponse<T> = oneshot::Sender<ServiceResult<T>>;

/// How a fetch request ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page arrived and was appended.
    Loaded { received: usize },
    /// Pagination already ended; the gateway was not called.
    Exhausted,
    /// `load_more` found a fetch in flight and did nothing.
    Skipped,
}

/// Typed requests accepted by the users service. Each variant carries a
/// oneshot channel for the response.
#[derive(Debug)]
pub enum UsersRequest {
    SelectUser {
        user: Option<User>,
        respond_to: ServiceResponse<()>,
    },
    ApplyLocalUpdate {
        user: User,
        respond_to: ServiceResponse<bool>,
    },
    FetchUsers {
        respond_to: ServiceResponse<FetchOutcome>,
    },
    LoadMore {
        respond_to: ServiceResponse<FetchOutcome>,
    },
    UpdateUser {
        user: User,
        respond_to: ServiceResponse<()>,
    },
    EditUser {
        user: User,
        respond_to: ServiceResponse<()>,
    },
    GetView {
        respond_to: ServiceResponse<UsersView>,
    },
    Shutdown,
    #[cfg(test)]
    GetOriginalsCount {
        respond_to: ServiceResponse<usize>,
    },
}

/// Results of gateway calls, fed back into the service loop by the tasks
/// that made them.
#[derive(Debug)]
pub(crate) enum Completion {
    Fetch {
        result: Result<Vec<User>, GatewayError>,
        respond_to: ServiceResponse<FetchOutcome>,
    },
    Update {
        id: UserId,
        result: Result<(), GatewayError>,
        snapshot: Option<User>,
        respond_to: ServiceResponse<()>,
    },
}
