//! UI-agnostic state types
//!
//! Plain data carried between screens. Nothing here is persisted; every
//! screen owns its own copy.

use serde::{Deserialize, Serialize};

/// Birth details collected on the home screen.
///
/// The strings are kept exactly as typed. Format is a convention
/// (`YYYY-MM-DD`, 24-hour `HH:MM`) that only the remote service checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthQuery {
    pub date_of_birth: String,
    pub time_of_birth: String,
    pub place_of_birth: String,
}

impl BirthQuery {
    pub fn new(
        date_of_birth: impl Into<String>,
        time_of_birth: impl Into<String>,
        place_of_birth: impl Into<String>,
    ) -> Self {
        Self {
            date_of_birth: date_of_birth.into(),
            time_of_birth: time_of_birth.into(),
            place_of_birth: place_of_birth.into(),
        }
    }
}

/// A chat message in the Kundali conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}
