//! Local travel vocabulary check.

/// Words and phrases that mark a query as travel-related without asking upstream.
pub const TRAVEL_KEYWORDS: &[&str] = &[
    "trip", "travel", "vacation", "itinerary", "destination", "tourism", "journey",
    "flight", "hotel", "resort", "booking", "visit", "tour", "cruise", "backpack",
    "sightseeing", "adventure", "explore", "city break", "holiday", "getaway",
    "airport", "visa", "passport", "luggage", "accommodation", "restaurant",
    "tourist", "guide", "map", "transportation", "train", "bus", "rental car",
    "beach", "mountain", "museum", "landmark", "culture", "local", "weather",
    "budget travel", "luxury travel", "backpacking", "road trip", "honeymoon",
    "family vacation", "solo travel", "group travel", "business travel",
];

/// Case-insensitive substring match against [`TRAVEL_KEYWORDS`].
pub fn mentions_travel(query: &str) -> bool {
    let lower = query.to_lowercase();
    TRAVEL_KEYWORDS.iter().any(|kw| lower.contains(kw))
}
