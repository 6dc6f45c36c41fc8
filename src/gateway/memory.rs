use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::{GatewayError, UserGateway};
use crate::domain::{User, UserFields, UserId};

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<UserId, User>,
    fail_reads: Option<String>,
    failing_ids: HashSet<UserId>,
}

/// In-process stand-in for the remote store. Records are served in id order.
///
/// Failures can be switched on for reads as a whole and for writes to
/// individual ids.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGateway {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `count` generated users, ids `1..=count`.
    pub fn seeded(count: u64) -> Self {
        let users = (1..=count)
            .map(|id| {
                let user = User::new(
                    id,
                    format!("Name{id}"),
                    format!("Surname{id}"),
                    18 + (id % 60) as i32,
                    format!("user{id}@example.com"),
                );
                (id, user)
            })
            .collect();

        Self {
            inner: Arc::new(RwLock::new(Inner {
                users,
                ..Inner::default()
            })),
        }
    }

    pub async fn get(&self, id: UserId) -> Option<User> {
        self.inner.read().await.users.get(&id).cloned()
    }

    /// Makes every subsequent read fail with `message`, or clears it with `None`.
    pub async fn fail_reads(&self, message: Option<String>) {
        self.inner.write().await.fail_reads = message;
    }

    /// Makes writes to `id` fail until [`Self::allow_writes`] is called.
    pub async fn fail_writes(&self, id: UserId) {
        self.inner.write().await.failing_ids.insert(id);
    }

    pub async fn allow_writes(&self, id: UserId) {
        self.inner.write().await.failing_ids.remove(&id);
    }
}

#[async_trait]
impl UserGateway for InMemoryGateway {
    #[instrument(skip(self))]
    async fn range_read(&self, offset: usize, limit: usize) -> Result<Vec<User>, GatewayError> {
        let inner = self.inner.read().await;
        if let Some(message) = &inner.fail_reads {
            warn!(%message, "Range read rejected");
            return Err(GatewayError::Remote(message.clone()));
        }

        let page: Vec<User> = inner
            .users
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        debug!(page_len = page.len(), "Range read served");
        Ok(page)
    }

    #[instrument(skip(self, fields))]
    async fn keyed_update(&self, id: UserId, fields: UserFields) -> Result<(), GatewayError> {
        let mut inner = self.inner.write().await;
        if inner.failing_ids.contains(&id) {
            warn!("Keyed update rejected");
            return Err(GatewayError::Remote(format!("write to user {id} rejected")));
        }

        match inner.users.get_mut(&id) {
            Some(stored) => {
                *stored = User::from_fields(id, fields);
                info!("Keyed update applied");
                Ok(())
            }
            None => Err(GatewayError::NotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn range_read_pages_in_id_order() {
        let gateway = InMemoryGateway::seeded(5);

        let first = gateway.range_read(0, 3).await.unwrap();
        let ids: Vec<UserId> = first.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let rest = gateway.range_read(3, 3).await.unwrap();
        let ids: Vec<UserId> = rest.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![4, 5]);

        assert!(gateway.range_read(10, 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn keyed_update_overwrites_fields() {
        let gateway = InMemoryGateway::seeded(2);
        let edited = User::new(2, "Alice", "Doe", 30, "alice@example.com");

        gateway.keyed_update(2, edited.fields()).await.unwrap();
        assert_eq!(gateway.get(2).await, Some(edited));
    }

    #[tokio::test]
    async fn keyed_update_of_unknown_id_fails() {
        let gateway = InMemoryGateway::new();
        let ghost = User::new(9, "Ghost", "None", 1, "ghost@example.com");

        let result = gateway.keyed_update(9, ghost.fields()).await;
        assert_eq!(result, Err(GatewayError::NotFound(9)));
    }

    #[tokio::test]
    async fn injected_failures_can_be_cleared() {
        let gateway = InMemoryGateway::seeded(3);

        gateway.fail_reads(Some("offline".to_string())).await;
        assert_eq!(
            gateway.range_read(0, 10).await,
            Err(GatewayError::Remote("offline".to_string()))
        );
        gateway.fail_reads(None).await;
        assert_eq!(gateway.range_read(0, 10).await.unwrap().len(), 3);

        let user = gateway.get(1).await.unwrap();
        gateway.fail_writes(1).await;
        assert!(gateway.keyed_update(1, user.fields()).await.is_err());
        gateway.allow_writes(1).await;
        assert!(gateway.keyed_update(1, user.fields()).await.is_ok());
    }
}
