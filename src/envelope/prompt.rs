//! Prompt composition.

use std::fmt;

/// Instruction sent ahead of a query when asking whether it is travel-related.
pub const CLASSIFICATION_PREAMBLE: &str = "You are a classifier for TripMate, a travel assistant. \
Decide whether the user query below is about travel: trips, destinations, itineraries, \
accommodation, transportation, visas, travel tips, local culture or weather at a destination. \
Reply with exactly one word, true or false, and nothing else.";

/// Instruction sent ahead of a travel query when asking for an answer.
pub const GENERATION_PREAMBLE: &str = "You are TripMate, a specialized travel assistant chatbot. \
Your expertise is in helping users with travel planning, destinations, itineraries, accommodations, \
transportation, travel tips, cultural information, and all travel-related queries. Provide detailed, \
helpful, and engaging responses about travel topics. Be enthusiastic about travel and offer practical \
advice, recommendations, and insights to enhance the user's travel experience. If the query is vague, \
suggest popular destinations or ask for clarification.";

/// Standalone instruction used to produce the welcome greeting.
pub const GREETING_INSTRUCTION: &str = "Generate a greeting for a new user of the TripMate app. \
The greeting should be friendly, welcoming, and encourage the user to explore the app's features. \
It should also include a call to action to start planning their next trip.";

/// Immutable prompt text: a fixed preamble followed by the literal user text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn compose(preamble: &str, user_text: &str) -> Self {
        Self(format!("{}\nUser: {}", preamble, user_text))
    }

    pub fn classification(query: &str) -> Self {
        Self::compose(CLASSIFICATION_PREAMBLE, query)
    }

    pub fn generation(query: &str) -> Self {
        Self::compose(GENERATION_PREAMBLE, query)
    }

    pub fn greeting() -> Self {
        Self(GREETING_INSTRUCTION.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_embedded_literally() {
        let query = "  What's \"best\" in Kyoto?\n";
        let prompt = Prompt::generation(query);
        assert!(prompt.as_str().starts_with(GENERATION_PREAMBLE));
        assert!(prompt.as_str().ends_with(&format!("User: {}", query)));
    }

    #[test]
    fn test_classification_and_generation_differ() {
        let q = "Is Lisbon walkable?";
        assert_ne!(Prompt::classification(q), Prompt::generation(q));
        assert!(Prompt::classification(q).as_str().contains("true or false"));
    }
}
