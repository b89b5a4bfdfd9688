//! Wire-level data model for tours and bookings.
//!
//! The tours table tolerates missing optional columns; [`Tour`] is always
//! fully populated, with [`defaults`] applied while mapping rows so callers
//! never see partial records.

use serde::{Deserialize, Serialize};

/// Fallback values applied to optional tour columns when the stored row
/// leaves them empty.
pub mod defaults {
    pub const RATING: f64 = 4.5;
    pub const NIGHTS: i64 = 7;
    pub const DEPARTURE: &str = "Москва";
    pub const DATES: &str = "Уточняйте даты";
    pub const HOTEL: &str = "Hotel";
    pub const HOTEL_STARS: i64 = 4;
    pub const MEAL: &str = "Завтрак";
    pub const INCLUDED: [&str; 2] = ["Перелёт", "Проживание"];

    pub fn included() -> Vec<String> {
        INCLUDED.iter().map(|s| s.to_string()).collect()
    }
}

/// A travel package offering as returned by the catalog endpoints.
///
/// All fields are populated: optional columns are defaulted during row
/// mapping, so consumers can rely on a complete object regardless of how
/// sparse the stored record is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: i64,
    pub title: String,
    pub destination: String,
    pub country: String,
    /// Final price in rubles, minor units stripped.
    pub price: i64,
    pub price_formatted: String,
    pub original_price: Option<i64>,
    pub discount: i64,
    pub nights: i64,
    pub departure: String,
    pub dates: String,
    /// Human-readable duration label from the operator feed, e.g. "7 дней".
    pub duration: String,
    pub image: String,
    pub rating: f64,
    pub reviews: i64,
    pub hotel: String,
    pub hotel_stars: i64,
    pub included: Vec<String>,
    pub category: String,
    pub meal: String,
    pub flight_included: bool,
    pub description: String,
    /// Operator the record was scraped from.
    pub source: String,
}

/// The subset of tour fields shown on a booking confirmation.
///
/// Lookup failures are tolerated: when the referenced tour does not exist
/// the summary falls back to generic placeholder strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TourSummary {
    pub title: String,
    pub destination: String,
    /// Formatted price string, not the numeric amount.
    pub price: String,
}

impl TourSummary {
    /// Placeholder summary used when the booked tour cannot be found.
    pub fn placeholder() -> Self {
        Self {
            title: "Тур".to_string(),
            destination: String::new(),
            price: String::new(),
        }
    }
}

/// Parse the `included` column (a JSON array of strings) with a fallback.
///
/// Rows written by older catalog refreshes may store NULL or malformed
/// JSON here; both degrade to the default included-services list.
pub fn parse_included(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|text| serde_json::from_str::<Vec<String>>(text).ok())
        .unwrap_or_else(defaults::included)
}
