//! # Mock Framework
//!
//! Utilities for testing the users service without a real remote store.
//!
//! Use [`create_mock_gateway`] to get a gateway and a receiver.
//! Then use [`expect_range_read`] or [`expect_keyed_update`] to inspect each
//! call and decide when and how it resolves.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::domain::{User, UserFields, UserId};
use crate::gateway::{GatewayError, UserGateway};

pub type GatewayResponder<T> = oneshot::Sender<Result<T, GatewayError>>;

/// One call made against the mock gateway.
#[derive(Debug)]
pub enum GatewayRequest {
    RangeRead {
        offset: usize,
        limit: usize,
        respond_to: GatewayResponder<Vec<User>>,
    },
    KeyedUpdate {
        id: UserId,
        fields: UserFields,
        respond_to: GatewayResponder<()>,
    },
}

/// Gateway that forwards every call to a channel the test controls.
#[derive(Clone)]
pub struct MockGateway {
    sender: mpsc::Sender<GatewayRequest>,
}

/// Creates a mock gateway and a receiver for asserting requests.
///
/// A call stays pending until the test answers on its responder, which makes
/// the "before the write resolves" window observable.
pub fn create_mock_gateway(buffer_size: usize) -> (MockGateway, mpsc::Receiver<GatewayRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (MockGateway { sender }, receiver)
}

#[async_trait]
impl UserGateway for MockGateway {
    async fn range_read(&self, offset: usize, limit: usize) -> Result<Vec<User>, GatewayError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(GatewayRequest::RangeRead { offset, limit, respond_to })
            .await
            .map_err(|_| GatewayError::Remote("mock gateway closed".to_string()))?;
        response
            .await
            .map_err(|_| GatewayError::Remote("mock responder dropped".to_string()))?
    }

    async fn keyed_update(&self, id: UserId, fields: UserFields) -> Result<(), GatewayError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(GatewayRequest::KeyedUpdate { id, fields, respond_to })
            .await
            .map_err(|_| GatewayError::Remote("mock gateway closed".to_string()))?;
        response
            .await
            .map_err(|_| GatewayError::Remote("mock responder dropped".to_string()))?
    }
}

/// Helper to verify that the next call is a range read
pub async fn expect_range_read(
    receiver: &mut mpsc::Receiver<GatewayRequest>,
) -> Option<(usize, usize, GatewayResponder<Vec<User>>)> {
    match receiver.recv().await {
        Some(GatewayRequest::RangeRead { offset, limit, respond_to }) => Some((offset, limit, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a keyed update
pub async fn expect_keyed_update(
    receiver: &mut mpsc::Receiver<GatewayRequest>,
) -> Option<(UserId, UserFields, GatewayResponder<()>)> {
    match receiver.recv().await {
        Some(GatewayRequest::KeyedUpdate { id, fields, respond_to }) => Some((id, fields, respond_to)),
        _ => None,
    }
}

/// Users with ids `first..=last`, named after their id.
pub fn sample_users(first: UserId, last: UserId) -> Vec<User> {
    (first..=last)
        .map(|id| User::new(id, format!("Name{id}"), format!("Surname{id}"), 30, format!("user{id}@example.com")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_gateway() {
        let (gateway, mut receiver) = create_mock_gateway(10);

        let read_task = tokio::spawn(async move { gateway.range_read(200, 100).await });

        let (offset, limit, responder) = expect_range_read(&mut receiver)
            .await
            .expect("Expected RangeRead request");
        assert_eq!((offset, limit), (200, 100));
        responder.send(Ok(sample_users(201, 203))).unwrap();

        let page = read_task.await.unwrap().unwrap();
        assert_eq!(page.len(), 3);
        assert_eq!(page[0].id, 201);
    }

    #[tokio::test]
    async fn dropped_responder_surfaces_as_gateway_error() {
        let (gateway, mut receiver) = create_mock_gateway(10);
        let user = sample_users(1, 1).remove(0);

        let write_task = tokio::spawn(async move { gateway.keyed_update(1, user.fields()).await });

        let (id, _fields, responder) = expect_keyed_update(&mut receiver)
            .await
            .expect("Expected KeyedUpdate request");
        assert_eq!(id, 1);
        drop(responder);

        assert!(write_task.await.unwrap().is_err());
    }
}
