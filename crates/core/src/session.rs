use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated caller. Every store and repository call is scoped by
/// `user_id`; a `Session` is built per request and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
}

impl Session {
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }
}
