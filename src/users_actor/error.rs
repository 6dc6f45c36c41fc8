use thiserror::Error;

use crate::domain::{User, UserId};

/// Report of a remote write that did not go through.
///
/// `snapshot` is the value the entry was restored to. It is `None` when the
/// record was not in the local collection at write time, in which case
/// nothing was rolled back.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Update of user {id} failed: {message}")]
pub struct UpdateFailure {
    pub id: UserId,
    pub message: String,
    pub snapshot: Option<User>,
}

impl UpdateFailure {
    pub fn rolled_back(&self) -> bool {
        self.snapshot.is_some()
    }
}

/// Errors surfaced by the users service and its client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("A fetch is already in flight")]
    FetchInFlight,
    #[error("Fetch failed: {0}")]
    Fetch(String),
    #[error(transparent)]
    Update(UpdateFailure),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
