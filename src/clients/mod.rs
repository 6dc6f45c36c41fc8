//! Client handles for talking to service actors.

#[macro_use]
mod macros;
mod users_client;

pub use users_client::UsersClient;
