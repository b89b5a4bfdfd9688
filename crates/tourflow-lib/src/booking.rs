//! Booking submissions and confirmations.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::TourSummary;

/// Field names enumerated in the 400 response when validation fails.
pub const REQUIRED_FIELDS: [&str; 4] = ["tourId", "name", "email", "phone"];

/// Tourists description used when the submission leaves it out.
pub const DEFAULT_TOURISTS: &str = "2 человека";

/// Initial status assigned to every new booking.
pub const STATUS_PENDING: &str = "pending";

/// Raw booking submission as posted by the website.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub tour_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub tourists: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// A validated booking ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRecord {
    pub tour_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub tourists: String,
    pub comment: String,
}

impl BookingRequest {
    /// Validate the submission, trimming text fields.
    ///
    /// All of tourId, name, email and phone must be present and non-empty
    /// after trimming. Validation happens strictly before any store
    /// access, and the error always enumerates the full required-field
    /// list rather than just the offender.
    pub fn validate(&self) -> Result<BookingRecord> {
        let name = self.name.as_deref().unwrap_or("").trim();
        let email = self.email.as_deref().unwrap_or("").trim();
        let phone = self.phone.as_deref().unwrap_or("").trim();

        let tour_id = match self.tour_id {
            Some(id) if !name.is_empty() && !email.is_empty() && !phone.is_empty() => id,
            _ => {
                return Err(Error::MissingFields {
                    required: REQUIRED_FIELDS.to_vec(),
                })
            }
        };

        Ok(BookingRecord {
            tour_id,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            tourists: self
                .tourists
                .clone()
                .unwrap_or_else(|| DEFAULT_TOURISTS.to_string()),
            comment: self.comment.clone().unwrap_or_default(),
        })
    }
}

/// Format a store-assigned identifier as a customer-facing booking number.
///
/// Identifiers are sequential, so booking numbers are monotonically
/// increasing across successful submissions: `BK000001`, `BK000002`, ...
pub fn booking_number(id: i64) -> String {
    format!("BK{id:06}")
}

/// Customer echo returned on the confirmation payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerSummary {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Successful booking confirmation payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub success: bool,
    pub booking_number: String,
    pub booking_id: i64,
    pub tour: TourSummary,
    pub customer: CustomerSummary,
    pub message: String,
}

impl BookingConfirmation {
    /// Assemble the confirmation for a persisted booking.
    pub fn new(booking_id: i64, tour: TourSummary, record: &BookingRecord) -> Self {
        let booking_number = booking_number(booking_id);
        let message = format!(
            "Заявка #{booking_number} принята! Мы свяжемся с вами в ближайшее время."
        );
        Self {
            success: true,
            booking_number,
            booking_id,
            tour,
            customer: CustomerSummary {
                name: record.name.clone(),
                email: record.email.clone(),
                phone: record.phone.clone(),
            },
            message,
        }
    }
}
