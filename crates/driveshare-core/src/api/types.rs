//! Wire types for the DriveShare backend.
//!
//! Response shapes mirror the backend's column naming (`ListingID`,
//! `PickUpLocation`, ...) while request shapes use the snake_case field names
//! the endpoints expect. Dates travel as `YYYY-MM-DD` strings on the wire.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a message thread between two users.
pub type ConversationId = i64;

// === Request shapes ===

/// Login payload for `login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// A security question/answer pair, used during registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityQuestion {
    pub question: String,
    pub answer: String,
}

/// Registration payload for `register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub security_questions: Vec<SecurityQuestion>,
}

/// A contiguous range of days a car can be picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// New-listing payload for `create-listing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewListing {
    pub model: String,
    pub year: i32,
    pub mileage: i64,
    pub pickup_location: String,
    pub rental_pricing: f64,
    pub availability: Vec<AvailabilityRange>,
}

/// Search payload for `search-available-cars`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySearch {
    pub pickup_location: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

/// Booking payload for `create-booking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub listing_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Accept/reject decision sent through `respond-to-booking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingReply {
    Accept,
    Reject,
}

/// Full payload for `respond-to-booking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingResponseRequest {
    pub booking_id: i64,
    pub response: BookingReply,
}

/// Payload for `start-conversation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartConversation {
    pub owner_id: i64,
}

// === Response shapes ===

/// A car listing as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "ListingID")]
    pub listing_id: i64,
    #[serde(rename = "OwnerID", default)]
    pub owner_id: Option<i64>,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Mileage")]
    pub mileage: i64,
    #[serde(rename = "PickUpLocation")]
    pub pickup_location: String,
    #[serde(rename = "RentalPricing")]
    pub rental_pricing: f64,
    #[serde(rename = "Class", default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default)]
    pub availability: Vec<AvailabilityRange>,
}

/// Status lifecycle of a booking request.
///
/// The backend writes capitalized values while fetched views compare
/// lowercase ones, so both spellings deserialize; values this client does
/// not know about are preserved rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "Confirmed")]
    Confirmed,
    #[serde(alias = "Rejected")]
    Rejected,
    #[serde(alias = "Canceled", alias = "cancelled", alias = "Cancelled")]
    Canceled,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Rejected => write!(f, "rejected"),
            BookingStatus::Canceled => write!(f, "canceled"),
            BookingStatus::Other(value) => write!(f, "{value}"),
        }
    }
}

/// Which side of a booking the current user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingRole {
    /// The user asked to rent the car
    #[serde(alias = "Requester")]
    Requester,
    /// The user owns the listing being booked
    #[serde(alias = "Requestee")]
    Requestee,
}

impl fmt::Display for BookingRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingRole::Requester => write!(f, "requester"),
            BookingRole::Requestee => write!(f, "requestee"),
        }
    }
}

/// A booking request as returned by `fetch-bookings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "RequestID")]
    pub request_id: i64,
    #[serde(rename = "Status")]
    pub status: BookingStatus,
    #[serde(rename = "Role")]
    pub role: BookingRole,
    #[serde(rename = "StartDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "EndDate")]
    pub end_date: NaiveDate,
}

impl Booking {
    /// Whether the booking still awaits a decision from the listing owner.
    pub fn awaits_decision(&self) -> bool {
        self.status == BookingStatus::Pending && self.role == BookingRole::Requestee
    }
}

/// Descriptor returned by `create-booking`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingReceipt {
    #[serde(rename = "RequestID")]
    pub request_id: i64,
    #[serde(rename = "Status")]
    pub status: BookingStatus,
}

/// Descriptor returned by `start-conversation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
}

/// A message within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
}
