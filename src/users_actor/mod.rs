//! The users service: paginated collection, selection, and optimistic edits
//! with rollback.

pub mod error;
mod messages;
mod service;
pub mod state;

pub use error::*;
pub use messages::{FetchOutcome, ServiceResponse, ServiceResult, UsersRequest};
pub use service::UsersService;
pub use state::{UsersEvent, UsersState, UsersView, FETCH_ERROR_FALLBACK};
