//! Contract for the remote data service holding the `users` resource.

mod memory;

pub use memory::InMemoryGateway;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{User, UserFields, UserId};

/// Failure reported by the remote store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("{0}")]
    Remote(String),
    #[error("User not found: {0}")]
    NotFound(UserId),
    #[error("Remote store failed without a message")]
    Unspecified,
}

impl GatewayError {
    /// Human-readable message carried by the failure, if the store gave one.
    pub fn message(&self) -> Option<String> {
        match self {
            GatewayError::Unspecified => None,
            other => Some(other.to_string()),
        }
    }
}

/// Range-read and keyed-update access to the remote `users` resource.
///
/// No retry, backoff or timeout is applied on top of these calls; a failure
/// goes straight back to the caller.
#[async_trait]
pub trait UserGateway: Send + Sync + 'static {
    /// Returns up to `limit` records starting at `offset`, in a stable
    /// store-defined order.
    async fn range_read(&self, offset: usize, limit: usize) -> Result<Vec<User>, GatewayError>;

    /// Writes `fields` to the record identified by `id`. Atomic per record.
    async fn keyed_update(&self, id: UserId, fields: UserFields) -> Result<(), GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unspecified_failure_has_no_message() {
        assert_eq!(GatewayError::Unspecified.message(), None);
        assert_eq!(
            GatewayError::Remote("permission denied".to_string()).message(),
            Some("permission denied".to_string())
        );
        assert_eq!(
            GatewayError::NotFound(3).message(),
            Some("User not found: 3".to_string())
        );
    }
}
