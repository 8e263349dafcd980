//! Typed endpoint wrappers over the request client.
//!
//! One method per backend endpoint. Methods keep the request client's
//! failure-signaling contract: write endpoints hand back a [`WriteOutcome`]
//! (HTTP rejections as values), GET endpoints a [`GetResponse`] (status plus
//! optional data). Bodies are decoded into the types in [`types`]; a 2xx
//! body that does not match the expected shape is a parse error.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::{ClientError, ClientResult, GetResponse, RequestClient, WriteOutcome};

pub mod types;

use types::{
    AvailabilitySearch, Booking, BookingReceipt, BookingReply, BookingResponseRequest,
    Conversation, Credentials, Listing, NewBooking, NewListing, Registration, StartConversation,
};

/// The three registration security prompts, in the order the backend stores
/// them.
pub const SECURITY_QUESTION_PROMPTS: [&str; 3] = [
    "What is your mother's maiden name?",
    "What was the name of your first pet?",
    "What street did you grow up on?",
];

/// Feedback line for a registration form with missing fields.
pub const INCOMPLETE_REGISTRATION: &str = "Please fill in all fields before submitting.";

/// DriveShare API client.
pub struct DriveShareClient {
    client: RequestClient,
}

impl DriveShareClient {
    /// Creates a client for the given base URL.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Ok(Self {
            client: RequestClient::new(base_url)?,
        })
    }

    /// Creates a client with an optional whole-request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> ClientResult<Self> {
        Ok(Self {
            client: RequestClient::with_timeout(base_url, timeout)?,
        })
    }

    /// The underlying request client, for callers that need raw access.
    pub fn request_client(&self) -> &RequestClient {
        &self.client
    }

    /// POST `login`. The session cookie lands in the client's cookie store;
    /// the body is returned untyped since nothing beyond success is used.
    ///
    /// # Errors
    /// Returns an error on transport failure.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<WriteOutcome> {
        self.client.post("login", credentials).await
    }

    /// POST `register`, after validating the form locally.
    ///
    /// # Errors
    /// Returns a validation error, without any network call, when the email,
    /// password, or any of the three security answers is empty. Otherwise
    /// errors only on transport failure.
    pub async fn register(&self, registration: &Registration) -> ClientResult<WriteOutcome> {
        validate_registration(registration)?;
        self.client.post("register", registration).await
    }

    /// POST `create-listing`.
    ///
    /// # Errors
    /// Returns an error on transport failure or an undecodable success body.
    pub async fn create_listing(
        &self,
        listing: &NewListing,
    ) -> ClientResult<WriteOutcome<Listing>> {
        decode(self.client.post("create-listing", listing).await?)
    }

    /// POST `search-available-cars`.
    ///
    /// # Errors
    /// Returns an error on transport failure or an undecodable success body.
    pub async fn search_available_cars(
        &self,
        query: &AvailabilitySearch,
    ) -> ClientResult<WriteOutcome<Vec<Listing>>> {
        decode(self.client.post("search-available-cars", query).await?)
    }

    /// POST `start-conversation` with the listing owner's id.
    ///
    /// # Errors
    /// Returns an error on transport failure or an undecodable success body.
    pub async fn start_conversation(
        &self,
        owner_id: i64,
    ) -> ClientResult<WriteOutcome<Conversation>> {
        let payload = StartConversation { owner_id };
        decode(self.client.post("start-conversation", &payload).await?)
    }

    /// POST `create-booking`.
    ///
    /// # Errors
    /// Returns an error on transport failure or an undecodable success body.
    pub async fn create_booking(
        &self,
        booking: &NewBooking,
    ) -> ClientResult<WriteOutcome<BookingReceipt>> {
        decode(self.client.post("create-booking", booking).await?)
    }

    /// GET `fetch-bookings`.
    ///
    /// # Errors
    /// Returns an error on transport failure or an undecodable success body.
    pub async fn fetch_bookings(&self) -> ClientResult<GetResponse<Vec<Booking>>> {
        decode_get(self.client.get("fetch-bookings").await?)
    }

    /// GET `my-cars`. A non-2xx status yields `data: None`, never a failure.
    ///
    /// # Errors
    /// Returns an error on transport failure or an undecodable success body.
    pub async fn my_cars(&self) -> ClientResult<GetResponse<Vec<Listing>>> {
        decode_get(self.client.get("my-cars").await?)
    }

    /// POST `respond-to-booking` with an accept/reject decision.
    ///
    /// The booking id is always forwarded explicitly.
    ///
    /// # Errors
    /// Returns an error on transport failure.
    pub async fn respond_to_booking(
        &self,
        booking_id: i64,
        reply: BookingReply,
    ) -> ClientResult<WriteOutcome> {
        let payload = BookingResponseRequest {
            booking_id,
            response: reply,
        };
        self.client.post("respond-to-booking", &payload).await
    }

    /// POST `cancel-booking/{id}`. The id rides in the path; no body.
    ///
    /// # Errors
    /// Returns an error on transport failure.
    pub async fn cancel_booking(&self, booking_id: i64) -> ClientResult<WriteOutcome> {
        let endpoint = format!("cancel-booking/{booking_id}");
        self.client.post_empty(&endpoint).await
    }
}

/// Checks the registration form locally: every field and all three security
/// answers must be non-empty before any request goes out.
///
/// # Errors
/// Returns a validation error naming the feedback line shown to the user.
pub fn validate_registration(registration: &Registration) -> ClientResult<()> {
    let complete = !registration.email.trim().is_empty()
        && !registration.password.trim().is_empty()
        && registration.security_questions.len() >= SECURITY_QUESTION_PROMPTS.len()
        && registration
            .security_questions
            .iter()
            .all(|q| !q.answer.trim().is_empty());

    if complete {
        Ok(())
    } else {
        debug!("registration rejected locally: missing fields");
        Err(ClientError::validation(INCOMPLETE_REGISTRATION))
    }
}

fn decode<T: DeserializeOwned>(outcome: WriteOutcome) -> ClientResult<WriteOutcome<T>> {
    match outcome {
        WriteOutcome::Success(value) => serde_json::from_value(value)
            .map(WriteOutcome::Success)
            .map_err(|e| ClientError::parse(format!("unexpected response shape: {e}"))),
        WriteOutcome::HttpError(rejection) => Ok(WriteOutcome::HttpError(rejection)),
    }
}

fn decode_get<T: DeserializeOwned>(response: GetResponse) -> ClientResult<GetResponse<T>> {
    let GetResponse { status, data } = response;
    let data = data
        .map(|value| {
            serde_json::from_value(value)
                .map_err(|e| ClientError::parse(format!("unexpected response shape: {e}")))
        })
        .transpose()?;
    Ok(GetResponse { status, data })
}
