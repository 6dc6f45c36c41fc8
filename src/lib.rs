//! # User Pager
//!
//! Client-side synchronization core for browsing and editing a paginated list
//! of users kept in a remote store.
//!
//! ## Ingredients
//!
//! - **Domain types** - Plain records with no actor concerns → [`domain::User`]
//! - **Paged collection** - Arrival-ordered records, cursor, rollback snapshots → [`collection::PagedCollection`]
//! - **Gateway** - Range-read and keyed-update contract for the remote store → [`gateway::UserGateway`]
//! - **Service** - Single owner of the state; intents in, views out → [`users_actor::UsersService`]
//! - **Client** - Cloneable handle with macro-generated, traced methods → [`clients::UsersClient`]
//! - **System coordinator** - Startup, wiring and shutdown → [`app_system::UsersSystem`]
//! - **Tracing setup** - `RUST_LOG`-driven structured logging → [`app_system::setup_tracing`]
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use user_pager::app_system::{PagerConfig, UsersSystem};
//! use user_pager::gateway::InMemoryGateway;
//!
//! # async fn demo() -> Result<(), user_pager::users_actor::StoreError> {
//! let system = UsersSystem::new(&PagerConfig::default(), Arc::new(InMemoryGateway::seeded(250)));
//! let client = system.users_client.clone();
//!
//! // Infinite scroll: call whenever the list nears its end.
//! client.load_more().await?;
//!
//! // Optimistic edit, rolled back if the remote write fails.
//! let user = client.view().await?.users[0].with_name("Alice");
//! let _ = client.edit_user(user).await;
//!
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod app_system;
pub mod clients;
pub mod collection;
pub mod domain;
pub mod gateway;
pub mod users_actor;

#[cfg(test)]
mod mock_framework;
