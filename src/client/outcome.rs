use crate::error::ApiError;

/// Shown when a 2xx generation response carries no recoverable text.
pub const FALLBACK_ANSWER: &str =
    "Sorry, I couldn't understand the response for that one. Could you rephrase your travel question?";

/// Shown in place of an answer when a query is not travel-related.
pub const REDIRECT_MESSAGE: &str = "I'm specialized in travel-related questions only! Please ask about \
trips, destinations, travel planning, accommodations, or other travel topics. Try typing 'help' for ideas!";

/// Used when the greeting call fails.
pub const DEFAULT_GREETING: &str = "Ready to help you plan your next adventure!";

/// Terminal state of one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// In-domain query with an answer (possibly [`FALLBACK_ANSWER`]).
    Answered(String),
    /// Out-of-domain query; no generation call was made.
    Rejected,
    /// An upstream call failed. Nothing was retried.
    Failed(ApiError),
}

impl QueryOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, QueryOutcome::Answered(_))
    }

    /// User-facing text for this outcome.
    pub fn reply(&self) -> String {
        match self {
            QueryOutcome::Answered(text) => text.clone(),
            QueryOutcome::Rejected => REDIRECT_MESSAGE.to_string(),
            QueryOutcome::Failed(ApiError::Auth { .. }) => {
                "Authentication error with the Gemini API. Please check your API key.".to_string()
            }
            QueryOutcome::Failed(ApiError::QuotaExceeded) => {
                "API quota exceeded. Please try again later or check your plan.".to_string()
            }
            QueryOutcome::Failed(ApiError::Timeout { .. }) => {
                "The travel service took too long to answer. Please try again!".to_string()
            }
            QueryOutcome::Failed(err) => {
                format!("Sorry, I encountered an error: {}. Please try again!", err)
            }
        }
    }
}
