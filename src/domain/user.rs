use serde::{Deserialize, Serialize};

use crate::collection::Entity;

/// Identifier assigned by the remote store. Stable for the lifetime of a record.
pub type UserId = u64;

/// A user record as stored remotely and mirrored in the local collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub surname: String,
    pub age: i32,
    pub email: String,
}

/// Writable fields of a user, sent with a keyed update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFields {
    pub name: String,
    pub surname: String,
    pub age: i32,
    pub email: String,
}

impl User {
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        surname: impl Into<String>,
        age: i32,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            surname: surname.into(),
            age,
            email: email.into(),
        }
    }

    /// Everything except the id, as written by a keyed update.
    pub fn fields(&self) -> UserFields {
        UserFields {
            name: self.name.clone(),
            surname: self.surname.clone(),
            age: self.age,
            email: self.email.clone(),
        }
    }

    /// Rebuilds a record from its id and a field set.
    pub fn from_fields(id: UserId, fields: UserFields) -> Self {
        Self {
            id,
            name: fields.name,
            surname: fields.surname,
            age: fields.age,
            email: fields.email,
        }
    }

    /// Copy of this user with a different display name.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &UserId {
        &self.id
    }
}
