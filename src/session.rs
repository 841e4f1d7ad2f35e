//! The identity of the signed-in user.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The identifier of the user that owns a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user ID from `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The current user's identity and display name.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// The ID used to scope every store query.
    pub user_id: UserId,
    /// The full name shown in the greeting.
    pub display_name: String,
}

impl Session {
    /// Create a session for `user_id`.
    pub fn new(user_id: UserId, display_name: &str) -> Self {
        Self {
            user_id,
            display_name: display_name.to_owned(),
        }
    }

    /// The first word of the display name, or "User" if there is none.
    pub fn first_name(&self) -> &str {
        self.display_name.split_whitespace().next().unwrap_or("User")
    }
}

/// The salutation for the local `hour` of the day (0-23).
pub fn greeting(hour: u8) -> &'static str {
    match hour {
        0..12 => "Good morning",
        12..18 => "Good afternoon",
        _ => "Good evening",
    }
}
