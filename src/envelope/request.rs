//! Request body construction.
//!
//! The body is produced by `serde_json`, so untrusted user text needs no manual
//! escaping: quotes, backslashes and control characters are escaped per JSON rules
//! and every other code point is carried as UTF-8.

use serde::{Deserialize, Serialize};

use super::prompt::Prompt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// Wire form of a `generateContent` request: `{ contents: [ { parts: [ { text } ] } ] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub contents: Vec<Content>,
}

impl RequestEnvelope {
    /// Wrap a prompt in a single-content, single-part envelope. Total for any input.
    pub fn build(prompt: &Prompt) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.as_str().to_string(),
                }],
            }],
        }
    }

    /// The embedded prompt text.
    pub fn text(&self) -> Option<&str> {
        self.contents
            .first()
            .and_then(|c| c.parts.first())
            .map(|p| p.text.as_str())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<&Prompt> for RequestEnvelope {
    fn from(prompt: &Prompt) -> Self {
        Self::build(prompt)
    }
}
